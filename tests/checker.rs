//! Checker tests on the six-state lecture model.
//!
//! ```text
//! s1 {p}    -> s1, s2, s3
//! s2 {p,q}  -> s1, s2, s3
//! s3 {p,q}  -> s4, s5
//! s4 {}     -> s1, s6
//! s5 {q}    -> s4, s6
//! s6 {q}    -> s1, s2
//! ```

use std::collections::HashSet;

use ctl_rs::{BoxError, Checker, CtlFormula, Error, Model, SatSet, State, TemporalOp};

fn model() -> Model {
    Model::new(
        [
            State::new("s1", ["p"]),
            State::new("s2", ["p", "q"]),
            State::new("s3", ["p", "q"]),
            State::new("s4", Vec::<String>::new()),
            State::new("s5", ["q"]),
            State::new("s6", ["q"]),
        ],
        [
            ("s1", vec!["s1", "s2", "s3"]),
            ("s2", vec!["s1", "s2", "s3"]),
            ("s3", vec!["s4", "s5"]),
            ("s4", vec!["s1", "s6"]),
            ("s5", vec!["s4", "s6"]),
            ("s6", vec!["s1", "s2"]),
        ],
    )
    .unwrap()
}

fn names(xs: &[&str]) -> HashSet<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn all() -> HashSet<String> {
    names(&["s1", "s2", "s3", "s4", "s5", "s6"])
}

fn p() -> CtlFormula {
    CtlFormula::var("p")
}

fn q() -> CtlFormula {
    CtlFormula::var("q")
}

fn check(f: &CtlFormula) -> HashSet<String> {
    let model = model();
    Checker::new(&model).check(f).unwrap()
}

// ─── Propositional ─────────────────────────────────────────────────────────────

#[test]
fn top_and_bot() {
    assert_eq!(check(&CtlFormula::Top), all());
    assert_eq!(check(&CtlFormula::Bot), names(&[]));
}

#[test]
fn variables() {
    assert_eq!(check(&p()), names(&["s1", "s2", "s3"]));
    assert_eq!(check(&q()), names(&["s2", "s3", "s5", "s6"]));
    assert_eq!(check(&CtlFormula::var("r")), names(&[]));
}

#[test]
fn negation() {
    assert_eq!(check(&p().not()), names(&["s4", "s5", "s6"]));
    assert_eq!(check(&q().not()), names(&["s1", "s4"]));
}

#[test]
fn and_or() {
    assert_eq!(check(&p().and(q())), names(&["s2", "s3"]));
    assert_eq!(check(&p().or(q())), names(&["s1", "s2", "s3", "s5", "s6"]));
}

#[test]
fn implications() {
    assert_eq!(check(&p().implies(q())), names(&["s2", "s3", "s4", "s5", "s6"]));
    assert_eq!(check(&p().implied_by(q())), names(&["s1", "s2", "s3", "s4"]));
    assert_eq!(check(&p().iff(q())), names(&["s2", "s3", "s4"]));
}

// ─── Temporal ──────────────────────────────────────────────────────────────────

#[test]
fn ax() {
    assert_eq!(check(&p().ax()), names(&["s1", "s2", "s6"]));
    assert_eq!(check(&q().ax()), names(&[]));
}

#[test]
fn ex() {
    assert_eq!(check(&p().ex()), names(&["s1", "s2", "s4", "s6"]));
    assert_eq!(check(&q().ex()), all());
}

#[test]
fn au() {
    assert_eq!(check(&q().au(p())), names(&["s1", "s2", "s3", "s6"]));
    // s1 can loop on itself inside p without ever reaching q; s4 is outside p.
    assert_eq!(check(&p().au(q())), names(&["s2", "s3", "s5", "s6"]));
}

#[test]
fn eu() {
    assert_eq!(check(&p().eu(q())), names(&["s1", "s2", "s3", "s5", "s6"]));
    assert_eq!(check(&q().eu(p())), names(&["s1", "s2", "s3", "s5", "s6"]));
}

#[test]
fn af() {
    assert_eq!(check(&q().af()), names(&["s2", "s3", "s5", "s6"]));
    assert_eq!(check(&p().af()), all());
}

#[test]
fn ef() {
    assert_eq!(check(&p().ef()), all());
    assert_eq!(check(&q().ef()), all());
}

#[test]
fn ag() {
    assert_eq!(check(&p().ag()), names(&[]));
    assert_eq!(check(&q().ag()), names(&[]));
}

#[test]
fn eg() {
    assert_eq!(check(&p().eg()), names(&["s1", "s2"]));
    assert_eq!(check(&q().eg()), names(&["s2", "s3", "s5", "s6"]));
}

// ─── Nested formulas ───────────────────────────────────────────────────────────

#[test]
fn nested_until() {
    assert_eq!(check(&p().not().eu(q().not())), names(&["s1", "s4", "s5", "s6"]));
    assert_eq!(check(&p().eu(q().not())), names(&["s1", "s2", "s3", "s4"]));
    assert_eq!(check(&p().au(q().ex())), all());
}

#[test]
fn nested_modalities() {
    assert_eq!(check(&p().ex().ax()), names(&["s4", "s5", "s6"]));
    assert_eq!(check(&p().eg().af()), all());
}

#[test]
fn repeated_checks_agree() {
    let model = model();
    let checker = Checker::new(&model);
    let f = p().implies(q().af()).ag().or(p().eg().not());
    let first = checker.check(&f).unwrap();
    for _ in 0..3 {
        assert_eq!(checker.check(&f).unwrap(), first);
    }
}

// ─── Custom operators ──────────────────────────────────────────────────────────

/// Reference EF: repeatedly add states with a successor already in the set.
fn ef_reference(operands: &[SatSet], model: &Model) -> Result<SatSet, BoxError> {
    let mut states = operands[0].clone();
    loop {
        let mut next = states.clone();
        for s in model.all() {
            if !model.successors(&s)?.is_disjoint(&states) {
                next.insert(s);
            }
        }
        if next == states {
            return Ok(states);
        }
        states = next;
    }
}

#[test]
fn fresh_checker_is_unmodified() {
    let model = model();
    let checker = Checker::new(&model);
    assert!(!checker.is_modified());
    assert!(TemporalOp::ALL.iter().all(|&op| !checker.has_custom(op)));
    assert_eq!(checker.registry().installed().count(), 0);
    assert_eq!(checker.model().len(), 6);
}

#[test]
fn custom_ef_returning_nothing() {
    let model = model();
    let mut checker = Checker::new(&model);
    let f = p().ef();
    assert_eq!(checker.check(&f).unwrap(), all());

    checker.set_custom("EF", |_, _| Ok(SatSet::new())).unwrap();
    assert!(checker.is_modified());
    assert_eq!(checker.registry().installed().collect::<Vec<_>>(), vec![TemporalOp::EF]);
    assert_eq!(checker.check(&f).unwrap(), names(&[]));
}

#[test]
fn custom_ef_matching_default() {
    let model = model();
    let mut checker = Checker::new(&model);
    checker.set_custom("EF", ef_reference).unwrap();
    assert!(checker.is_modified());
    assert_eq!(checker.check(&p().ef()).unwrap(), all());
    assert_eq!(checker.check(&q().ef()).unwrap(), all());
}

#[test]
fn custom_operator_does_not_leak_into_others() {
    let model = model();
    let mut checker = Checker::new(&model);
    // Broken EU; EF and AG must keep their default semantics.
    checker.set_custom("EU", |_, _| Ok(SatSet::new())).unwrap();
    assert_eq!(checker.check(&p().eu(q())).unwrap(), names(&[]));
    assert_eq!(checker.check(&p().ef()).unwrap(), all());
    assert_eq!(checker.check(&p().eg()).unwrap(), names(&["s1", "s2"]));
    assert_eq!(checker.check(&p().ag()).unwrap(), names(&[]));
}

#[test]
fn custom_operator_applies_to_nested_occurrences() {
    let model = model();
    let mut checker = Checker::new(&model);
    checker.set_custom("AX", |_, model| Ok(model.all())).unwrap();
    // EX (AX p) with AX = everything is EX true.
    assert_eq!(checker.check(&p().ax().ex()).unwrap(), all());
    // Custom AX is used for operands of other operators too.
    assert_eq!(checker.check(&p().ax().not()).unwrap(), names(&[]));
}

#[test]
fn modified_flag_is_sticky() {
    let model = model();
    let mut checker = Checker::new(&model);
    checker.set_custom("AX", |_, _| Ok(SatSet::new())).unwrap();
    assert!(checker.check(&p().ax()).unwrap().is_empty());

    // AX φ = ¬EX ¬φ: same result as the default, flag stays set.
    checker
        .set_custom("AX", |ops, model| {
            let not_phi = model.all_except(&ops[0]);
            Ok(model.all_except(&model.pre_e(&not_phi)?))
        })
        .unwrap();
    assert!(checker.is_modified());
    assert_eq!(checker.check(&p().ax()).unwrap(), names(&["s1", "s2", "s6"]));
}

#[test]
fn invalid_operator_name() {
    let model = model();
    let mut checker = Checker::new(&model);
    for name in ["XX", "ef", "And", "Not", ""] {
        let err = checker.set_custom(name, |_, _| Ok(SatSet::new())).unwrap_err();
        assert!(matches!(err, Error::InvalidOperator(ref n) if n == name));
    }
    assert!(!checker.is_modified());
}

#[test]
fn failing_custom_operator_fails_the_check() {
    let model = model();
    let mut checker = Checker::new(&model);
    checker.set_custom("EG", |_, _| Err("not implemented".into())).unwrap();

    let err = checker.check(&p().eg().or(CtlFormula::Top)).unwrap_err();
    assert!(matches!(err, Error::CustomOperator { op: TemporalOp::EG, .. }));
    assert!(err.to_string().contains("not implemented"));
}

#[test]
fn custom_binary_operator_gets_both_operands() {
    let model = model();
    let mut checker = Checker::new(&model);
    checker
        .set_custom("AU", |ops, _| {
            assert_eq!(ops.len(), 2);
            Ok(ops[1].clone())
        })
        .unwrap();
    assert_eq!(checker.check(&q().au(p())).unwrap(), names(&["s1", "s2", "s3"]));
}

// ─── Concurrency ───────────────────────────────────────────────────────────────

#[test]
fn checkers_share_model_across_threads() {
    let model = model();
    let formulas = [p().eg(), q().af(), q().au(p()), p().ag().not()];

    let expected: Vec<_> = formulas.iter().map(|f| Checker::new(&model).check(f).unwrap()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = formulas
            .iter()
            .map(|f| {
                let model = &model;
                scope.spawn(move || {
                    let mut checker = Checker::new(model);
                    checker.set_custom("EX", |_, _| Ok(SatSet::new())).unwrap();
                    (Checker::new(model).check(f).unwrap(), checker.is_modified())
                })
            })
            .collect();

        for (handle, expected) in handles.into_iter().zip(&expected) {
            let (sat, modified) = handle.join().unwrap();
            assert_eq!(&sat, expected);
            assert!(modified);
        }
    });
}
