//! End-to-end tests for reading and printing SMT-LIB scripts.

use sine_core::{Op, Symbol, TermData};
use sine_frontend::{parse_script, Command, ElaborateError};

const AXIOMATIZED: &str = r#"
; a small axiomatization
(set-logic UFLIA)
(set-info :status unsat)
(declare-sort U 0)
(declare-fun f (U) Int)
(declare-fun g (U) Int)
(declare-fun R (U U) Bool)
(declare-const a U)
(declare-const b U)
(assert (forall ((x U)) (! (>= (f x) 0) :pattern ((f x)))))
(assert (forall ((x U) (y U)) (! (=> (R x y) (= (g x) (g y))) :pattern ((R x y)) :qid rg)))
(assert (exists ((z U)) (R z a)))
(assert (< (f a) (- 1)))
(check-sat)
(exit)
"#;

#[test]
fn test_commands_are_kept_in_order() {
    let script = parse_script(AXIOMATIZED).unwrap();
    let kinds: Vec<&str> = script
        .commands()
        .iter()
        .map(|c| match c {
            Command::DeclareSort(_) => "sort",
            Command::DeclareFun(_) => "fun",
            Command::Assert(_) => "assert",
            Command::Verbatim(_) => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "other", "other", "sort", "fun", "fun", "fun", "fun", "fun", "assert", "assert",
            "assert", "assert", "other", "other"
        ]
    );
    assert_eq!(script.assertions().len(), 4);
}

#[test]
fn test_printed_script_reparses_to_same_text() {
    let script = parse_script(AXIOMATIZED).unwrap();
    let printed = script.to_smtlib();
    let reparsed = parse_script(&printed).unwrap();
    assert_eq!(reparsed.to_smtlib(), printed);
    assert!(printed.contains(":pattern ((f x))"));
    assert!(printed.contains("(set-info :status unsat)"));
}

#[test]
fn test_unary_minus_is_builtin_subtraction() {
    let script = parse_script(AXIOMATIZED).unwrap();
    let conjecture = *script.assertions().last().unwrap();
    let TermData::App(Symbol::Builtin(Op::Lt), args) = script.terms().get(conjecture) else {
        panic!("expected <");
    };
    assert!(matches!(
        script.terms().get(args[1]),
        TermData::App(Symbol::Builtin(Op::Sub), operands) if operands.len() == 1
    ));
}

#[test]
fn test_bound_variables_shadow_constants() {
    let script = parse_script(
        "(declare-sort U 0)
         (declare-fun P (U) Bool)
         (declare-const x U)
         (assert (forall ((x U)) (P x)))",
    )
    .unwrap();
    let terms = script.terms();
    let TermData::Quant(q) = terms.get(script.assertions()[0]) else {
        panic!("expected quantifier");
    };
    let TermData::App(_, args) = terms.get(q.body) else {
        panic!("expected application");
    };
    assert!(matches!(terms.get(args[0]), TermData::Var(name, _) if name == "x"));
}

#[test]
fn test_syntax_errors_are_reported_with_position() {
    let Err(ElaborateError::Parse(parse)) = parse_script("(assert (and true)") else {
        panic!("expected a parse error");
    };
    assert_eq!(parse.position, 0);
}

#[test]
fn test_malformed_pattern_is_rejected() {
    let err = parse_script(
        "(declare-fun P (Int) Bool)
         (assert (forall ((x Int)) (! (P x) :pattern (P x) :pattern ())))",
    );
    // `(P x)` parses as a two-term multi-pattern with head `P` applied to
    // nothing, which fails arity checking.
    assert!(matches!(err, Err(ElaborateError::ArityMismatch { .. })));

    let err = parse_script(
        "(declare-fun P (Int) Bool) (assert (forall ((x Int)) (! (P x) :pattern ())))",
    );
    assert!(matches!(err, Err(ElaborateError::Malformed { what: ":pattern", .. })));
}
