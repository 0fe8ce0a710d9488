// Generator-level tests: state tracking, the counter pool, and fatal
// semantic errors.

use cir2c::codegen::errors::GenError;
use cir2c::codegen::generator::Generator;
use cir2c::parser::ast::SyntaxNode;
use cir2c::parser::lexer::Lexer;
use cir2c::parser::parser::Parser;
use cir2c::{compile, CompileError};

fn parse(source: &str) -> Vec<SyntaxNode> {
    let tokens = Lexer::new(source).tokenize().expect("Lexing failed");
    Parser::new(tokens).parse().expect("Parsing failed")
}

/// REPEAT nested `depth` levels deep, innermost body PASS.
fn nested_repeats(depth: usize) -> String {
    let mut source = String::from("METHOD f():\n");
    for level in 0..depth {
        source.push_str(&" ".repeat(4 * (level + 1)));
        source.push_str("REPEAT 2 TIMES:\n");
    }
    source.push_str(&" ".repeat(4 * (depth + 1)));
    source.push_str("PASS\n");
    source
}

#[test]
fn test_pool_supports_eight_nested_repeats() {
    let output = compile(&nested_repeats(8)).expect("Compilation failed");
    assert!(output.contains("_temp_7"), "output:\n{}", output);
}

#[test]
fn test_ninth_nested_repeat_exhausts_pool() {
    match compile(&nested_repeats(9)) {
        Err(CompileError::Gen(GenError::TempPoolExhausted { capacity, .. })) => {
            assert_eq!(capacity, 8);
        }
        other => panic!("Expected pool exhaustion, got {:?}", other),
    }
}

#[test]
fn test_fresh_generators_agree_on_one_tree() {
    let nodes = parse(concat!(
        "SETMODE LEVEL(LOW, HIGH)\n",
        "DEFINE LEVEL = HIGH\n",
        "MUTABLE Int(total)\n",
        "METHOD tally(Int n) -> Int:\n",
        "    REPEAT n TIMES:\n",
        "        total = total + 1\n",
        "    RETURN total\n",
    ));
    let first = Generator::new().generate(&nodes).expect("Generation failed");
    let second = Generator::new().generate(&nodes).expect("Generation failed");
    assert_eq!(first, second);
}

#[test]
fn test_unknown_type_is_fatal() {
    let nodes = parse("METHOD f() -> Float:\n    PASS\n");
    match Generator::new().generate(&nodes) {
        Err(GenError::UnknownType { name, .. }) => assert_eq!(name, "Float"),
        other => panic!("Expected unknown-type error, got {:?}", other),
    }
}

#[test]
fn test_array_declaration_outside_structure_is_fatal() {
    let nodes = parse("Array(buf)\n");
    match Generator::new().generate(&nodes) {
        Err(GenError::Unsupported { what, .. }) => {
            assert!(what.contains("Array"), "{}", what);
        }
        other => panic!("Expected unsupported-shape error, got {:?}", other),
    }
}

#[test]
fn test_parameters_enter_the_type_environment() {
    // A parameter behaves like a declared mutable variable inside the body.
    let output =
        compile("METHOD clamp(Int n):\n    IF n > 9:\n        n = 9\n").expect("Compilation failed");
    assert!(output.contains("n = 9;"), "output:\n{}", output);
    assert!(!output.contains("#define n"), "output:\n{}", output);
}

#[test]
fn test_bare_return_renders_without_expression() {
    let output = compile("METHOD f():\n    RETURN\n").expect("Compilation failed");
    assert!(output.contains("    return;"), "output:\n{}", output);
}

#[test]
fn test_placeholder_statement() {
    let output = compile("METHOD f():\n    TODO\n").expect("Compilation failed");
    assert!(output.contains("    ; /* TODO */"), "output:\n{}", output);
}

#[test]
fn test_nested_bodies_indent_in_steps_of_four() {
    let output = compile("METHOD f(Int x):\n    IF x:\n        beep()\n")
        .expect("Compilation failed");
    assert!(output.contains("    if (x) {"), "output:\n{}", output);
    assert!(output.contains("        beep();"), "output:\n{}", output);
}

#[test]
fn test_byte_type_maps_to_unsigned_char() {
    let output = compile("MUTABLE Byte(b)\n").expect("Compilation failed");
    assert!(output.contains("unsigned char b;"), "output:\n{}", output);
}

#[test]
fn test_structure_element_type_must_resolve() {
    let nodes = parse("STRUCTURE Grid:\n    Array(Float, 4)\n");
    match Generator::new().generate(&nodes) {
        Err(GenError::UnknownType { name, .. }) => assert_eq!(name, "Float"),
        other => panic!("Expected unknown-type error, got {:?}", other),
    }
}

#[test]
fn test_choose_bodies_keep_surrounding_indent() {
    let source = concat!(
        "SETMODE LEVEL(LOW, HIGH)\n",
        "METHOD f():\n",
        "    CHOOSE LEVEL:\n",
        "        LOW:\n",
        "            beep()\n",
    );
    let output = compile(source).expect("Compilation failed");

    // Preprocessor lines sit at column 0; the gated statement keeps the
    // indent of the surrounding body plus one level for the option group.
    assert!(output.contains("\n#ifdef LEVEL_LOW\n"), "output:\n{}", output);
    assert!(output.contains("        beep();"), "output:\n{}", output);
}

#[test]
fn test_default_after_define_still_guards_all_options() {
    let source = "SETMODE M(A, B)\nDEFINE M = A\nDEFAULT M = B\n";
    let output = compile(source).expect("Compilation failed");
    assert!(
        output.contains("#if !defined(M_A) && !defined(M_B)"),
        "output:\n{}",
        output
    );
}

#[test]
fn test_default_between_defines_keeps_exclusivity() {
    // The DEFAULT's guard sees M_A defined and never fires, so the
    // selection to undo is still A, not B.
    let source = "SETMODE M(A, B, C)\nDEFINE M = A\nDEFAULT M = B\nDEFINE M = C\n";
    let output = compile(source).expect("Compilation failed");
    assert!(output.contains("#undef M_A"), "output:\n{}", output);
    assert!(!output.contains("#undef M_B"), "output:\n{}", output);
    assert!(output.contains("#define M_C"), "output:\n{}", output);
}

#[test]
fn test_empty_source_produces_empty_output() {
    assert_eq!(compile("").expect("Compilation failed"), "");
    assert_eq!(compile("\n\n").expect("Compilation failed"), "");
}
