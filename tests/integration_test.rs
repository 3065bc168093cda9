// Integration tests for the parser front end

use cinc::memory::arena::{Arena, ArenaError};
use cinc::parser::ast::NodeKind;
use cinc::parser::parse::{parse_program, ErrorSite, ParseError, Parser};

fn arena() -> Arena {
    Arena::with_capacity(1024 * 1024).expect("Arena creation failed")
}

/// Statements of the body of the `index`th function
fn body_len(program: &cinc::Node<'_>, index: usize) -> usize {
    let function = program.items().unwrap().get(index).unwrap();
    match &function.kind {
        NodeKind::Function { body, .. } => body.items().unwrap().len(),
        other => panic!("Expected function, found {:?}", other),
    }
}

#[test]
fn test_end_to_end() {
    let source = "int main() { return ((2 + 3) * 5); return 0; }";

    let arena = arena();
    let program = parse_program(source, &arena).expect("Parsing failed");

    assert_eq!(
        program.to_string(),
        "(program (function int main (block (return (* (+ 2 3) 5)) (return 0))))"
    );
    assert!(arena.used() > 0);
}

#[test]
fn test_multiple_functions() {
    let source = r#"
        int first() {
            return 1;
        }

        int main() {
            { 2; }
            return -first;
        }
    "#;

    let arena = arena();
    let result = parse_program(source, &arena);
    // `first` is not an expression in this language
    assert!(result.is_err());

    let source = r#"
        int first() {
            return 1;
        }

        int main() {
            { 2; }
            return -3;
        }
    "#;
    let program = parse_program(source, &arena).expect("Parsing failed");
    assert_eq!(program.items().unwrap().len(), 2);
    assert_eq!(body_len(program, 0), 1);
    assert_eq!(body_len(program, 1), 2);
}

#[test]
fn test_bare_return() {
    let arena = arena();
    let program = parse_program("int main() { return; }", &arena).expect("Parsing failed");
    assert_eq!(program.to_string(), "(program (function int main (block (return))))");
}

#[test]
fn test_comments_are_ignored() {
    let source = r#"
        // entry point
        int main() {
            /* the answer,
               computed */
            return 6 * 7; // done
        }
    "#;

    let arena = arena();
    let program = parse_program(source, &arena).expect("Parsing failed");
    assert_eq!(
        program.to_string(),
        "(program (function int main (block (return (* 6 7)))))"
    );
}

#[test]
fn test_statement_requires_semicolon() {
    let arena = arena();
    let err = parse_program("int main() { return 1 }", &arena).unwrap_err();

    let first = &err.diagnostics()[0];
    assert_eq!(first.message, "Expected ';' after return value");
    assert_eq!(first.site, ErrorSite::Lexeme("}".to_string()));
}

#[test]
fn test_recovery_keeps_following_statements() {
    let source = "int main() { return 1 + ; return 2; return 3; 4; }";

    let arena = arena();
    let output = Parser::new(source, &arena)
        .parse_with_recovery()
        .expect("Arena exhausted");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].message, "Expected expression");
    assert_eq!(body_len(output.program, 0), 3);
    assert!(!output.is_clean());
}

#[test]
fn test_one_error_fails_whole_program() {
    let source = r#"
        int main() { return 1; }
        int broken() { return 2 +; }
    "#;

    let arena = arena();
    match parse_program(source, &arena) {
        Err(ParseError::Syntax(diagnostics)) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].location.line, 3);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_errors_in_separate_functions_all_reported() {
    let source = r#"
        int main() { return +; }
        int other() { return 2; }
        int third() { * 3; }
    "#;

    let arena = arena();
    let output = Parser::new(source, &arena)
        .parse_with_recovery()
        .expect("Arena exhausted");

    let lines: Vec<usize> = output
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.location.line)
        .collect();
    assert_eq!(lines, vec![2, 4]);
    assert_eq!(output.program.items().unwrap().len(), 3);
    assert_eq!(body_len(output.program, 1), 1);
}

#[test]
fn test_bad_character_in_skipped_statement() {
    let source = "int main() { 1 2 $ ; * ; return 3; }";

    let arena = arena();
    let output = Parser::new(source, &arena)
        .parse_with_recovery()
        .expect("Arena exhausted");

    let reported: Vec<(usize, &str)> = output
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.location.column, diagnostic.message.as_str()))
        .collect();
    assert_eq!(
        reported,
        vec![(16, "Expected ';' after expression"), (22, "Expected expression")]
    );
    assert_eq!(
        output.program.to_string(),
        "(program (function int main (block (return 3))))"
    );
}

#[test]
fn test_deep_nesting_is_an_error() {
    let depth = 200_000;
    let source = format!(
        "int main() {{ return {}1{}; }} int ok() {{ return 2; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );

    let arena = Arena::with_capacity(16 * 1024 * 1024).expect("Arena creation failed");
    let output = Parser::new(&source, &arena)
        .parse_with_recovery()
        .expect("Arena exhausted");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].message, "Expression nested too deeply");
    assert_eq!(output.program.items().unwrap().len(), 2);
}

#[test]
fn test_top_level_garbage() {
    let arena = arena();
    let output = Parser::new("return 1; int main() { return 0; }", &arena)
        .parse_with_recovery()
        .expect("Arena exhausted");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].message, "Expected declaration");
    assert_eq!(
        output.program.to_string(),
        "(program (function int main (block (return 0))))"
    );
}

#[test]
fn test_arena_exhaustion() {
    let source = "int main() { return 1 + 2 + 3 + 4 + 5 + 6 + 7 + 8 + 9; }";

    let arena = Arena::with_capacity(512).expect("Arena creation failed");
    let result = parse_program(source, &arena);

    match result {
        Err(ParseError::Arena(ArenaError::Exhausted { .. })) => {}
        other => panic!("Expected arena exhaustion, got {:?}", other),
    }
}

#[test]
fn test_arena_reuse_after_clear() {
    let mut arena = arena();
    {
        let program = parse_program("int a() { return 1; }", &arena).expect("Parsing failed");
        assert_eq!(program.items().unwrap().len(), 1);
    }
    let used = arena.used();
    arena.clear();
    assert_eq!(arena.used(), 0);

    let program = parse_program("int b() { return 2; }", &arena).expect("Parsing failed");
    assert_eq!(program.to_string(), "(program (function int b (block (return 2))))");
    assert_eq!(arena.used(), used);
}

#[test]
fn test_diagnostics_logged() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let arena = arena();
    let err = parse_program("int main() { return (1; }", &arena).unwrap_err();
    assert_eq!(err.diagnostics()[0].message, "Expected ')' after expression");
}
