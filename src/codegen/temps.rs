//! Temporary-name pool for synthesized loop counters
//!
//! REPEAT loops have no user-written counter, so the generator draws one
//! from a fixed pool of scratch names. A slot is held for the lifetime of
//! its loop and released when the loop body has been generated, so nested
//! REPEATs each get a distinct counter and siblings reuse the same one.

use crate::codegen::errors::GenError;

/// Number of scratch counter names available to one generator.
pub const TEMP_POOL_CAPACITY: usize = 8;

/// A pool slot held by one loop; pass it back to [`TempPool::release`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempSlot {
    pub index: usize,
    pub name: String,
}

/// Fixed-capacity allocator of `_temp_N` names.
pub struct TempPool {
    in_use: [bool; TEMP_POOL_CAPACITY],
}

impl TempPool {
    pub fn new() -> Self {
        Self {
            in_use: [false; TEMP_POOL_CAPACITY],
        }
    }

    /// Claim the lowest-numbered free slot.
    pub fn acquire(&mut self, line: usize) -> Result<TempSlot, GenError> {
        for (index, used) in self.in_use.iter_mut().enumerate() {
            if !*used {
                *used = true;
                return Ok(TempSlot {
                    index,
                    name: format!("_temp_{}", index),
                });
            }
        }
        Err(GenError::TempPoolExhausted {
            capacity: TEMP_POOL_CAPACITY,
            line,
        })
    }

    /// Return a slot to the pool.
    pub fn release(&mut self, slot: &TempSlot) {
        self.in_use[slot.index] = false;
    }

    /// Number of slots currently held.
    pub fn in_use(&self) -> usize {
        self.in_use.iter().filter(|used| **used).count()
    }
}

impl Default for TempPool {
    fn default() -> Self {
        Self::new()
    }
}
