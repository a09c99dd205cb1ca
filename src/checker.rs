//! CTL model checking over explicit Kripke structures.
//!
//! The [`Checker`] computes the satisfaction set of a formula by structural
//! recursion. Propositional connectives are plain set algebra; the temporal
//! operators go through the checker's [`CustomRegistry`] first and fall back to
//! the default algorithms in [`fixpoint`][crate::fixpoint].
//!
//! # Example
//!
//! ```
//! use ctl_rs::checker::Checker;
//! use ctl_rs::formula::CtlFormula;
//! use ctl_rs::model::{Model, State};
//!
//! let model = Model::new(
//!     [State::new("idle", ["ready"]), State::new("busy", Vec::<String>::new())],
//!     [("idle", vec!["busy"]), ("busy", vec!["idle"])],
//! )
//! .unwrap();
//!
//! let checker = Checker::new(&model);
//! let sat = checker.check(&CtlFormula::var("ready").af()).unwrap();
//! assert_eq!(sat.len(), 2);
//! ```

use std::collections::{HashMap, HashSet};

use log::{debug, log_enabled, trace, Level};

use crate::bitset::StateSet;
use crate::error::{BoxError, Error, Result};
use crate::fixpoint::Fixpoint;
use crate::formula::{CtlFormula, TemporalOp};
use crate::model::Model;
use crate::registry::{CustomOperator, CustomRegistry, SatSet};

/// Options for a single check.
///
/// # Examples
///
/// ```
/// use ctl_rs::checker::CheckOptions;
///
/// let options = CheckOptions {
///     debug: true,
///     ..CheckOptions::default()
/// };
/// assert_eq!(options.max_rounds, None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Log every fixpoint round and subformula result at `debug` level
    /// (default: false). Never affects the result.
    pub debug: bool,
    /// Tighter cap on changing fixpoint passes (default: `None`, i.e. the number
    /// of states). Values above the number of states have no effect.
    pub max_rounds: Option<usize>,
}

/// CTL model checker bound to one model.
///
/// Each checker owns its own [`CustomRegistry`]. Installing a custom operator
/// needs `&mut self`, so it can never race with a running check.
#[derive(Debug)]
pub struct Checker<'m> {
    model: &'m Model,
    registry: CustomRegistry,
}

impl<'m> Checker<'m> {
    pub fn new(model: &'m Model) -> Self {
        Checker {
            model,
            registry: CustomRegistry::new(),
        }
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    pub fn registry(&self) -> &CustomRegistry {
        &self.registry
    }

    /// Compute the set of states satisfying a CTL formula.
    pub fn check(&self, formula: &CtlFormula) -> Result<HashSet<String>> {
        self.check_with(formula, &CheckOptions::default())
    }

    pub fn check_with(&self, formula: &CtlFormula, options: &CheckOptions) -> Result<HashSet<String>> {
        let sat = self.check_ids(formula, options)?;
        Ok(self.model.to_names(&sat))
    }

    /// Same as [`check_with`][Self::check_with], but returns state ids.
    pub fn check_ids(&self, formula: &CtlFormula, options: &CheckOptions) -> Result<StateSet> {
        let model = self.model;
        let debug = options.debug;
        let observer = move |op: TemporalOp, round: usize, set: &StateSet| {
            if debug {
                debug!("{} round {}: {}", op, round, model.display_set(set));
            } else if log_enabled!(Level::Trace) {
                trace!("{} round {}: {}", op, round, model.display_set(set));
            }
        };

        let mut fixpoint = Fixpoint::new(model, observer);
        if let Some(limit) = options.max_rounds {
            fixpoint = fixpoint.with_limit(limit);
        }

        let mut eval = Evaluation {
            checker: self,
            fixpoint,
            memo: HashMap::new(),
            debug,
        };
        let sat = eval.sat(formula)?;
        debug!(
            "check({}): {} of {} states, {} subformulas",
            formula,
            sat.len(),
            model.len(),
            eval.memo.len()
        );
        Ok(sat)
    }

    /// Check whether `formula` holds in the named state.
    pub fn holds_in(&self, formula: &CtlFormula, state: &str) -> Result<bool> {
        let id = self.model.id_of(state)?;
        let sat = self.check_ids(formula, &CheckOptions::default())?;
        Ok(sat.contains(id))
    }

    /// Install a custom implementation for the temporal operator named `op`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperator`] if `op` is not one of
    /// `AX, EX, AF, EF, AG, EG, AU, EU`. The registry is left untouched.
    pub fn set_custom<F>(&mut self, op: &str, f: F) -> Result<()>
    where
        F: Fn(&[SatSet], &Model) -> std::result::Result<SatSet, BoxError> + Send + Sync + 'static,
    {
        let op = op.parse::<TemporalOp>()?;
        self.set_custom_op(op, f);
        Ok(())
    }

    pub fn set_custom_op<C>(&mut self, op: TemporalOp, operator: C)
    where
        C: CustomOperator + 'static,
    {
        self.registry.install(op, Box::new(operator));
    }

    pub fn has_custom(&self, op: TemporalOp) -> bool {
        self.registry.contains(op)
    }

    /// True once any custom operator has been installed on this checker.
    pub fn is_modified(&self) -> bool {
        self.registry.is_modified()
    }
}

/// Check `formula` against `model` with the default semantics.
pub fn evaluate(formula: &CtlFormula, model: &Model) -> Result<HashSet<String>> {
    Checker::new(model).check(formula)
}

/// State of one `check` call: memoised subformula results and the fixpoint engine.
struct Evaluation<'c, 'm, 'f, O> {
    checker: &'c Checker<'m>,
    fixpoint: Fixpoint<'m, O>,
    memo: HashMap<&'f CtlFormula, StateSet>,
    debug: bool,
}

impl<'m, 'f, O> Evaluation<'_, 'm, 'f, O>
where
    O: FnMut(TemporalOp, usize, &StateSet),
{
    fn sat(&mut self, formula: &'f CtlFormula) -> Result<StateSet> {
        if let Some(sat) = self.memo.get(formula) {
            return Ok(sat.clone());
        }

        let model = self.checker.model;
        let sat = match formula {
            CtlFormula::Top => model.all_ids(),
            CtlFormula::Bot => StateSet::new(model.len()),
            CtlFormula::Var(p) => model.all_containing_ids(p),
            CtlFormula::Not(phi) => {
                let sat_phi = self.sat(phi)?;
                model.all_except_ids(&sat_phi)
            }
            CtlFormula::And(phi, psi) => {
                let sat_phi = self.sat(phi)?;
                let sat_psi = self.sat(psi)?;
                sat_phi.intersection(&sat_psi)
            }
            CtlFormula::Or(phi, psi) => {
                let sat_phi = self.sat(phi)?;
                let sat_psi = self.sat(psi)?;
                sat_phi.union(&sat_psi)
            }
            CtlFormula::Implies(phi, psi) => self.implies(phi, psi)?,
            CtlFormula::ImpliedBy(phi, psi) => self.implies(psi, phi)?,
            CtlFormula::Iff(phi, psi) => {
                let forward = self.implies(phi, psi)?;
                let backward = self.implies(psi, phi)?;
                forward.intersection(&backward)
            }
            CtlFormula::AX(phi) => {
                let sat_phi = self.sat(phi)?;
                self.temporal(TemporalOp::AX, &[&sat_phi], |fp| Ok(fp.ax(&sat_phi)))?
            }
            CtlFormula::EX(phi) => {
                let sat_phi = self.sat(phi)?;
                self.temporal(TemporalOp::EX, &[&sat_phi], |fp| Ok(fp.ex(&sat_phi)))?
            }
            CtlFormula::AF(phi) => {
                let sat_phi = self.sat(phi)?;
                self.temporal(TemporalOp::AF, &[&sat_phi], |fp| fp.af(&sat_phi))?
            }
            CtlFormula::EF(phi) => {
                let sat_phi = self.sat(phi)?;
                self.temporal(TemporalOp::EF, &[&sat_phi], |fp| fp.ef(&sat_phi))?
            }
            CtlFormula::AG(phi) => {
                let sat_phi = self.sat(phi)?;
                self.temporal(TemporalOp::AG, &[&sat_phi], |fp| fp.ag(&sat_phi))?
            }
            CtlFormula::EG(phi) => {
                let sat_phi = self.sat(phi)?;
                self.temporal(TemporalOp::EG, &[&sat_phi], |fp| fp.eg(&sat_phi))?
            }
            CtlFormula::AU(phi, psi) => {
                let sat_phi = self.sat(phi)?;
                let sat_psi = self.sat(psi)?;
                self.temporal(TemporalOp::AU, &[&sat_phi, &sat_psi], |fp| fp.au(&sat_phi, &sat_psi))?
            }
            CtlFormula::EU(phi, psi) => {
                let sat_phi = self.sat(phi)?;
                let sat_psi = self.sat(psi)?;
                self.temporal(TemporalOp::EU, &[&sat_phi, &sat_psi], |fp| fp.eu(&sat_phi, &sat_psi))?
            }
        };

        if self.debug {
            debug!("sat({}) = {}", formula, model.display_set(&sat));
        }
        self.memo.insert(formula, sat.clone());
        Ok(sat)
    }

    /// φ → ψ ≡ ¬φ ∨ ψ
    fn implies(&mut self, phi: &'f CtlFormula, psi: &'f CtlFormula) -> Result<StateSet> {
        let sat_phi = self.sat(phi)?;
        let sat_psi = self.sat(psi)?;
        Ok(self.checker.model.all_except_ids(&sat_phi).union(&sat_psi))
    }

    /// Dispatches a temporal operator: the custom implementation if one is
    /// installed, `default` otherwise.
    fn temporal<D>(&mut self, op: TemporalOp, operands: &[&StateSet], default: D) -> Result<StateSet>
    where
        D: FnOnce(&mut Fixpoint<'m, O>) -> Result<StateSet>,
    {
        match self.custom(op, operands) {
            Some(res) => res,
            None => default(&mut self.fixpoint),
        }
    }

    /// Runs the custom implementation of `op`, if one is installed.
    fn custom(&self, op: TemporalOp, operands: &[&StateSet]) -> Option<Result<StateSet>> {
        let checker = self.checker;
        let operator = checker.registry.get(op)?;
        let model = checker.model;

        debug!("{}: using custom operator", op);
        let operands: Vec<SatSet> = operands.iter().map(|s| model.to_names(s)).collect();
        let res = operator
            .apply(&operands, model)
            .map_err(|source| Error::CustomOperator { op, source })
            .and_then(|names| model.to_ids(&names));
        Some(res)
    }
}
