// End-to-end tests for the CIR → C pipeline

use cir2c::{compile, CompileError};

#[test]
fn test_immutable_declaration_becomes_macro() {
    let source = "Int(x)\nx = 5\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("#define x ((int) 5)"), "output:\n{}", output);
    // An immutable "variable" is a compile-time constant: no runtime
    // declaration and no runtime write.
    assert!(!output.contains("int x;"), "output:\n{}", output);
    assert!(!output.contains("x = 5;"), "output:\n{}", output);
}

#[test]
fn test_mutable_declaration_assigns_in_place() {
    let source = "MUTABLE Int(y)\ny = 1\ny = 2\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("int y;"), "output:\n{}", output);
    assert!(output.contains("y = 1;"), "output:\n{}", output);
    assert!(output.contains("y = 2;"), "output:\n{}", output);
    assert!(!output.contains("#define y"), "output:\n{}", output);
}

#[test]
fn test_method_declaration_and_return() {
    let source = "METHOD add(Int a, Int b):\n    RETURN a+b\n";
    let output = compile(source).expect("Compilation failed");

    // Forward declaration in the header, definition in the body; return
    // type defaults to void when unspecified.
    assert!(output.contains("void add(int a, int b);"), "output:\n{}", output);
    assert!(output.contains("void add(int a, int b) {"), "output:\n{}", output);
    assert!(output.contains("    return a + b;"), "output:\n{}", output);
}

#[test]
fn test_method_return_type_and_niladic_form() {
    let source = "METHOD answer() -> Int:\n    RETURN 42\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("int answer(void);"), "output:\n{}", output);
    assert!(output.contains("int answer(void) {"), "output:\n{}", output);
}

#[test]
fn test_array_parameter_collapses() {
    let source = "METHOD blit(Array, Int, 8, buf, Int, n):\n    PASS\n";
    let output = compile(source).expect("Compilation failed");

    assert!(
        output.contains("void blit(int buf[8], int n);"),
        "output:\n{}",
        output
    );
}

#[test]
fn test_mode_default_and_override() {
    let source = "SETMODE LEVEL(LOW, HIGH)\nDEFAULT LEVEL = LOW\nDEFINE LEVEL = HIGH\n";
    let output = compile(source).expect("Compilation failed");

    // The default gets lowest priority: guarded on no option being chosen.
    assert!(
        output.contains("#if !defined(LEVEL_LOW) && !defined(LEVEL_HIGH)"),
        "output:\n{}",
        output
    );
    assert!(output.contains("#define LEVEL_LOW"), "output:\n{}", output);
    // The later DEFINE undefines the default's macro and activates HIGH.
    assert!(output.contains("#undef LEVEL_LOW"), "output:\n{}", output);
    assert!(output.contains("#define LEVEL_HIGH"), "output:\n{}", output);
}

#[test]
fn test_mode_exclusivity() {
    let source = "SETMODE M(A, B, C)\nDEFINE M = A\nDEFINE M = B\nDEFINE M = C\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("#undef M_A"), "output:\n{}", output);
    assert!(output.contains("#undef M_B"), "output:\n{}", output);
    assert!(!output.contains("#undef M_C"), "output:\n{}", output);
    // The last definition wins.
    let undef_count = output.matches("#undef M_").count();
    assert_eq!(undef_count, 2, "output:\n{}", output);
}

#[test]
fn test_top_level_call_is_fatal() {
    let result = compile("beep()\n");
    match result {
        Err(CompileError::Gen(err)) => {
            assert!(err.to_string().contains("top level"), "{}", err);
        }
        other => panic!("Expected a generation error, got {:?}", other),
    }
}

#[test]
fn test_repeat_uses_pool_counter() {
    let source = "METHOD f():\n    REPEAT 3 TIMES:\n        beep()\n";
    let output = compile(source).expect("Compilation failed");

    assert!(
        output.contains("for (int _temp_0 = 0; _temp_0 < 3; _temp_0++) {"),
        "output:\n{}",
        output
    );
    assert!(output.contains("beep();"), "output:\n{}", output);
}

#[test]
fn test_sibling_repeats_reuse_counter() {
    let source = "METHOD f():\n    REPEAT 2 TIMES:\n        PASS\n    REPEAT 4 TIMES:\n        PASS\n";
    let output = compile(source).expect("Compilation failed");

    // The slot is released when a loop finishes, so the sibling gets the
    // same name back.
    assert_eq!(output.matches("_temp_0 = 0").count(), 2, "output:\n{}", output);
    assert!(!output.contains("_temp_1"), "output:\n{}", output);
}

#[test]
fn test_nested_repeats_get_distinct_counters() {
    let source =
        "METHOD f():\n    REPEAT 2 TIMES:\n        REPEAT 3 TIMES:\n            PASS\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("_temp_0"), "output:\n{}", output);
    assert!(output.contains("_temp_1 = 0; _temp_1 < 3"), "output:\n{}", output);
}

#[test]
fn test_structure_array_typedef() {
    let source = "STRUCTURE Grid:\n    Array(Int, 8, 8)\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("typedef int Grid[8][8];"), "output:\n{}", output);
}

#[test]
fn test_structure_placeholder_typedef() {
    let source = "STRUCTURE Handle:\n    PASS\n";
    let output = compile(source).expect("Compilation failed");

    assert!(
        output.contains("typedef struct Handle Handle;"),
        "output:\n{}",
        output
    );
}

#[test]
fn test_structure_name_is_usable_as_type() {
    let source = "STRUCTURE Handle:\n    PASS\nMUTABLE Handle(h)\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("Handle h;"), "output:\n{}", output);
}

#[test]
fn test_choose_gates_on_option_macros() {
    let source = concat!(
        "SETMODE LEVEL(LOW, HIGH)\n",
        "METHOD f():\n",
        "    CHOOSE LEVEL:\n",
        "        LOW:\n",
        "            PASS\n",
        "        HIGH:\n",
        "            beep()\n",
    );
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("#ifdef LEVEL_LOW"), "output:\n{}", output);
    assert!(output.contains("#ifdef LEVEL_HIGH"), "output:\n{}", output);
    assert_eq!(output.matches("#endif").count(), 2, "output:\n{}", output);
    assert!(output.contains("beep();"), "output:\n{}", output);
}

#[test]
fn test_choose_with_unknown_option_is_fatal() {
    let source = concat!(
        "SETMODE LEVEL(LOW, HIGH)\n",
        "METHOD f():\n",
        "    CHOOSE LEVEL:\n",
        "        MEDIUM:\n",
        "            PASS\n",
    );
    match compile(source) {
        Err(CompileError::Gen(err)) => {
            assert!(err.to_string().contains("LOW, HIGH"), "{}", err);
        }
        other => panic!("Expected a generation error, got {:?}", other),
    }
}

#[test]
fn test_define_of_unregistered_mode_is_fatal() {
    match compile("DEFINE SPEED = FAST\n") {
        Err(CompileError::Gen(err)) => {
            assert!(err.to_string().contains("SETMODE"), "{}", err);
        }
        other => panic!("Expected a generation error, got {:?}", other),
    }
}

#[test]
fn test_assignment_to_undeclared_is_fatal() {
    match compile("z = 1\n") {
        Err(CompileError::Gen(err)) => {
            assert!(err.to_string().contains("Undeclared"), "{}", err);
        }
        other => panic!("Expected a generation error, got {:?}", other),
    }
}

#[test]
fn test_branch_chain_and_word_operators() {
    let source = concat!(
        "METHOD f(Int x):\n",
        "    IF x EQUALS 1 AND x > 0:\n",
        "        PASS\n",
        "    ELSEIF x > 2 OR x < 0:\n",
        "        PASS\n",
        "    ELSE:\n",
        "        PASS\n",
    );
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("if (x == 1 && x > 0) {"), "output:\n{}", output);
    assert!(output.contains("else if (x > 2 || x < 0) {"), "output:\n{}", output);
    assert!(output.contains("else {"), "output:\n{}", output);
}

#[test]
fn test_for_loop_is_inclusive() {
    let source = "METHOD f():\n    FOR i = 0 TO 9:\n        beep()\n";
    let output = compile(source).expect("Compilation failed");

    assert!(
        output.contains("for (i = 0; i <= 9; i++) {"),
        "output:\n{}",
        output
    );
}

#[test]
fn test_while_loop() {
    let source = "METHOD f(Int n):\n    WHILE n > 0:\n        n = n - 1\n";
    let output = compile(source).expect("Compilation failed");

    assert!(output.contains("while (n > 0) {"), "output:\n{}", output);
    assert!(output.contains("n = n - 1;"), "output:\n{}", output);
}

#[test]
fn test_indentation_violation_never_misparses() {
    // Unit width fixed at 4 by the first indented line; 6 is not a
    // multiple.
    let source = "METHOD f():\n    IF x:\n      PASS\n";
    match compile(source) {
        Err(CompileError::Parse(err)) => {
            assert!(err.message.contains("not a multiple"), "{}", err);
        }
        other => panic!("Expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_comments_are_elided() {
    let source = "# configuration\nInt(x)\nx = 1\n";
    let output = compile(source).expect("Compilation failed");
    assert!(!output.contains("configuration"), "output:\n{}", output);
}

#[test]
fn test_generation_is_idempotent() {
    let source = concat!(
        "SETMODE LEVEL(LOW, HIGH)\n",
        "DEFAULT LEVEL = LOW\n",
        "STRUCTURE Grid:\n",
        "    Array(Byte, 16)\n",
        "METHOD f(Int n) -> Int:\n",
        "    REPEAT n TIMES:\n",
        "        beep()\n",
        "    RETURN n\n",
    );
    let first = compile(source).expect("Compilation failed");
    let second = compile(source).expect("Compilation failed");
    assert_eq!(first, second);
}

#[test]
fn test_output_section_order() {
    let source = "SETMODE LEVEL(LOW, HIGH)\nMETHOD f():\n    PASS\n";
    let output = compile(source).expect("Compilation failed");

    // Header (mode doc comment, forward declaration) precedes the body.
    let header_at = output.find("/* mode LEVEL:").expect("missing mode doc");
    let fwd_at = output.find("void f(void);").expect("missing forward decl");
    let body_at = output.find("void f(void) {").expect("missing definition");
    assert!(header_at < body_at);
    assert!(fwd_at < body_at);
}
