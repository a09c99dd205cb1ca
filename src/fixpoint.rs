//! Default algorithms for the temporal operators.
//!
//! `EX` and `AX` are single predecessor images. `EU`, `AU` and `AF` are least
//! fixpoints, `EG` is a greatest fixpoint; `EF` and `AG` are derived from `EU`:
//!
//! ```text
//! EX φ      = pre∃(φ)
//! AX φ      = pre∀(φ)                         (vacuously true at deadlocks)
//! E[φ U ψ]  = µZ. ψ ∨ (φ ∧ pre∃(Z))
//! A[φ U ψ]  = µZ. ψ ∨ (φ ∧ pre∀⁺(Z))
//! AF φ      = µZ. φ ∨ pre∀⁺(Z)
//! EG φ      = νZ. φ ∧ pre∃(Z)                 (iterated from Z₀ = φ)
//! EF φ      = E[true U φ]
//! AG φ      = ¬EF ¬φ
//! ```
//!
//! where `pre∀⁺(Z) = {s : succ(s) ≠ ∅ ∧ succ(s) ⊆ Z}`.
//!
//! Every fixpoint is iterated from its base set until a pass produces no
//! change. Each changing pass adds (or, for `EG`, removes) at least one state,
//! so at most `|states|` changing passes can happen. The loop is capped at
//! `|states| + 1` passes and reports [`Error::NonConvergence`] beyond that.

use crate::bitset::StateSet;
use crate::error::{Error, Result};
use crate::formula::TemporalOp;
use crate::model::Model;

/// Runs the default temporal algorithms over a model.
///
/// `observer` is called with `(op, round, set)` for the base set (round 0)
/// and after every pass of a fixpoint loop.
pub struct Fixpoint<'m, O> {
    model: &'m Model,
    limit: usize,
    observer: O,
}

impl<'m> Fixpoint<'m, fn(TemporalOp, usize, &StateSet)> {
    /// A fixpoint engine that reports nothing.
    pub fn quiet(model: &'m Model) -> Self {
        fn ignore(_: TemporalOp, _: usize, _: &StateSet) {}
        Fixpoint::new(model, ignore as fn(TemporalOp, usize, &StateSet))
    }
}

impl<'m, O> Fixpoint<'m, O>
where
    O: FnMut(TemporalOp, usize, &StateSet),
{
    pub fn new(model: &'m Model, observer: O) -> Self {
        Fixpoint {
            model,
            limit: model.len(),
            observer,
        }
    }

    /// Lowers the number of changing passes allowed before giving up.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = self.limit.min(limit);
        self
    }

    /// EX φ: states with at least one successor in `sat`.
    pub fn ex(&mut self, sat: &StateSet) -> StateSet {
        let res = self.model.pre_e_ids(sat);
        (self.observer)(TemporalOp::EX, 0, &res);
        res
    }

    /// AX φ: states whose successors all lie in `sat`.
    pub fn ax(&mut self, sat: &StateSet) -> StateSet {
        let res = self.model.pre_a_ids(sat);
        (self.observer)(TemporalOp::AX, 0, &res);
        res
    }

    /// E[φ U ψ], least fixpoint from `rhs`.
    pub fn eu(&mut self, lhs: &StateSet, rhs: &StateSet) -> Result<StateSet> {
        self.exists_until(TemporalOp::EU, lhs, rhs)
    }

    /// A[φ U ψ], least fixpoint from `rhs`.
    pub fn au(&mut self, lhs: &StateSet, rhs: &StateSet) -> Result<StateSet> {
        self.iterate(TemporalOp::AU, rhs.clone(), |model, z| {
            let mut next = model.pre_a_strict_ids(z);
            next.intersect_with(lhs);
            next.union_with(z);
            next
        })
    }

    /// AF φ, least fixpoint from `sat`.
    pub fn af(&mut self, sat: &StateSet) -> Result<StateSet> {
        self.iterate(TemporalOp::AF, sat.clone(), |model, z| {
            let mut next = model.pre_a_strict_ids(z);
            next.union_with(z);
            next
        })
    }

    /// EG φ, greatest fixpoint from `sat`.
    pub fn eg(&mut self, sat: &StateSet) -> Result<StateSet> {
        self.iterate(TemporalOp::EG, sat.clone(), |model, z| {
            let mut next = model.pre_e_ids(z);
            next.intersect_with(z);
            next
        })
    }

    /// EF φ = E[true U φ].
    pub fn ef(&mut self, sat: &StateSet) -> Result<StateSet> {
        let all = self.model.all_ids();
        self.exists_until(TemporalOp::EF, &all, sat)
    }

    /// AG φ = ¬EF ¬φ.
    pub fn ag(&mut self, sat: &StateSet) -> Result<StateSet> {
        let all = self.model.all_ids();
        let not_sat = self.model.all_except_ids(sat);
        let reach_bad = self.exists_until(TemporalOp::AG, &all, &not_sat)?;
        Ok(self.model.all_except_ids(&reach_bad))
    }

    fn exists_until(&mut self, op: TemporalOp, lhs: &StateSet, rhs: &StateSet) -> Result<StateSet> {
        self.iterate(op, rhs.clone(), |model, z| {
            let mut next = model.pre_e_ids(z);
            next.intersect_with(lhs);
            next.union_with(z);
            next
        })
    }

    fn iterate<F>(&mut self, op: TemporalOp, init: StateSet, step: F) -> Result<StateSet>
    where
        F: Fn(&Model, &StateSet) -> StateSet,
    {
        let model = self.model;
        let max_passes = self.limit + 1;

        let mut current = init;
        (self.observer)(op, 0, &current);

        for round in 1..=max_passes {
            let next = step(model, &current);
            (self.observer)(op, round, &next);
            if next == current {
                return Ok(current);
            }
            current = next;
        }

        log::warn!("{}: no fixpoint after {} passes", op, max_passes);
        Err(Error::NonConvergence { op, rounds: max_passes })
    }
}
