//! Mode registry for conditional compilation
//!
//! A mode is a named enumeration of mutually exclusive compile-time options
//! (`SETMODE LEVEL(LOW, HIGH)`), materialized in the output as preprocessor
//! macros `<mode>_<option>`. DEFINE switches the active option (undefining
//! the previous one); DEFAULT gives one option lowest priority; CHOOSE gates
//! code blocks on the option macros.

use crate::codegen::errors::GenError;
use rustc_hash::FxHashMap;

/// One registered mode: its options in registration order, and the
/// currently selected option if any.
#[derive(Debug, Clone)]
pub struct Mode {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

/// Mode name → registered options and current selection.
#[derive(Default)]
pub struct ModeRegistry {
    map: FxHashMap<String, Mode>,
}

impl ModeRegistry {
    /// Register a mode with its option set; the initial selection is none.
    pub fn register(&mut self, mode: &str, options: Vec<String>) {
        self.map.insert(
            mode.to_string(),
            Mode {
                options,
                selected: None,
            },
        );
    }

    pub fn get(&self, mode: &str, line: usize) -> Result<&Mode, GenError> {
        self.map.get(mode).ok_or_else(|| GenError::UndefinedMode {
            mode: mode.to_string(),
            line,
        })
    }

    /// Check that `option` belongs to `mode`'s registered option set.
    pub fn validate(&self, mode: &str, option: &str, line: usize) -> Result<(), GenError> {
        let entry = self.get(mode, line)?;
        if entry.options.iter().any(|o| o == option) {
            Ok(())
        } else {
            Err(GenError::InvalidOption {
                mode: mode.to_string(),
                option: option.to_string(),
                valid: entry.options.join(", "),
                line,
            })
        }
    }

    /// Make `option` the active selection, returning the previous one.
    pub fn select(
        &mut self,
        mode: &str,
        option: &str,
        line: usize,
    ) -> Result<Option<String>, GenError> {
        self.validate(mode, option, line)?;
        let entry = self
            .map
            .get_mut(mode)
            .ok_or_else(|| GenError::UndefinedMode {
                mode: mode.to_string(),
                line,
            })?;
        Ok(entry.selected.replace(option.to_string()))
    }

    /// Record `option` as the selection only when the mode has none yet.
    /// A default must not displace a selection an earlier DEFINE made
    /// unconditionally, or the next DEFINE would undefine the wrong macro.
    pub fn select_default(
        &mut self,
        mode: &str,
        option: &str,
        line: usize,
    ) -> Result<(), GenError> {
        self.validate(mode, option, line)?;
        let entry = self
            .map
            .get_mut(mode)
            .ok_or_else(|| GenError::UndefinedMode {
                mode: mode.to_string(),
                line,
            })?;
        if entry.selected.is_none() {
            entry.selected = Some(option.to_string());
        }
        Ok(())
    }

    /// The macro name gating one option of a mode.
    pub fn macro_name(mode: &str, option: &str) -> String {
        format!("{}_{}", mode, option)
    }
}
