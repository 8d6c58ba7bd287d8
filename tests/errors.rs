use thompson_regex::{compile, Builder, CompileError};

fn err(pattern: &str) -> CompileError {
    match compile(pattern) {
        Ok(re) => panic!("{:?} unexpectedly compiled: {:?}", pattern, re),
        Err(err) => err,
    }
}

#[test]
fn unbalanced_group() {
    assert_eq!(err("("), CompileError::UnbalancedGroup { index: 0 });
    assert_eq!(err("ab(c"), CompileError::UnbalancedGroup { index: 2 });
    assert_eq!(err("a)"), CompileError::UnbalancedGroup { index: 1 });
    assert_eq!(err("(a))"), CompileError::UnbalancedGroup { index: 3 });
}

#[test]
fn unbalanced_bracket() {
    assert_eq!(err("[a"), CompileError::UnbalancedBracket { index: 0 });
    assert_eq!(err("a]"), CompileError::UnbalancedBracket { index: 1 });
    assert_eq!(err("[[a]"), CompileError::UnbalancedBracket { index: 1 });
}

#[test]
fn malformed_range() {
    assert_eq!(err("[a-z]"), CompileError::MalformedRange { index: 2 });
    assert_eq!(err("[-1]"), CompileError::MalformedRange { index: 1 });
    assert_eq!(err("[1-]"), CompileError::MalformedRange { index: 2 });
    assert_eq!(err("[7-3]"), CompileError::MalformedRange { index: 2 });
    assert_eq!(err("a-b"), CompileError::MalformedRange { index: 1 });
    assert_eq!(err("1-5"), CompileError::MalformedRange { index: 1 });
    assert_eq!(err("x(0-9)*"), CompileError::MalformedRange { index: 3 });
}

#[test]
fn operators_inside_brackets() {
    assert_eq!(err("[a|b]"), CompileError::MalformedRange { index: 2 });
    assert_eq!(err("[(]"), CompileError::MalformedRange { index: 1 });
    assert_eq!(err("ab[c*]"), CompileError::MalformedRange { index: 4 });
    assert_eq!(err("[a[b]"), CompileError::UnbalancedBracket { index: 2 });
    assert_eq!(err("[]]"), CompileError::EmptyPattern { index: 0 });
}

#[test]
fn deeply_nested_groups() {
    let n = 100_000;
    let re = compile(&format!("{}[0-9]{}*", "(".repeat(n), ")".repeat(n))).unwrap();
    assert!(re.is_match("2024"));
    assert_eq!(
        err(&format!("{}a{}", "(".repeat(n), ")".repeat(n + 1))),
        CompileError::UnbalancedGroup { index: 2 * n + 1 }
    );
}

#[test]
fn dangling_operator() {
    assert_eq!(err("|a"), CompileError::DanglingOperator { index: 0 });
    assert_eq!(err("a|"), CompileError::DanglingOperator { index: 1 });
    assert_eq!(err("a||b"), CompileError::DanglingOperator { index: 2 });
    assert_eq!(err("*"), CompileError::DanglingOperator { index: 0 });
    assert_eq!(err("(*a)"), CompileError::DanglingOperator { index: 1 });
}

#[test]
fn empty_pattern() {
    assert_eq!(err(""), CompileError::EmptyPattern { index: 0 });
    assert_eq!(err("a()"), CompileError::EmptyPattern { index: 1 });
    assert_eq!(err("a[]"), CompileError::EmptyPattern { index: 1 });
}

#[test]
fn state_limit_exceeded() {
    let err = Builder::new("(a|b)*a(a|b)(a|b)(a|b)(a|b)")
        .dfa_state_limit(Some(10))
        .build()
        .unwrap_err();
    assert_eq!(err, CompileError::StateLimitExceeded { limit: 10 });
    assert_eq!(err.index(), None);
}

#[test]
fn first_error_wins() {
    // Both a dangling `|` and an unclosed `[`; expansion runs first.
    assert_eq!(err("|[a"), CompileError::UnbalancedBracket { index: 1 });
    // Two unclosed groups; the outer one is found first.
    assert_eq!(err("((a"), CompileError::UnbalancedGroup { index: 0 });
}

#[test]
fn errors_are_std_errors() {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err("[a"));
    assert_eq!(boxed.to_string(), "unbalanced bracket at offset 0");
}
