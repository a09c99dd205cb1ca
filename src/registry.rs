//! Per-checker table of custom temporal operators.
//!
//! A [`CustomRegistry`] maps each of the eight [`TemporalOp`]s to an optional
//! replacement implementation. When an entry is present, the checker calls it
//! instead of the default algorithm from [`fixpoint`][crate::fixpoint], with the
//! satisfaction sets of the operands already computed. The result is taken as
//! is; nothing checks that it agrees with the default semantics.
//!
//! The registry remembers whether any entry was ever installed. That flag is
//! never cleared, even if a later install restores the default behaviour.

use std::collections::HashSet;
use std::fmt;

use crate::error::BoxError;
use crate::formula::TemporalOp;
use crate::model::Model;

/// A satisfaction set as seen by custom operators: a set of state names.
pub type SatSet = HashSet<String>;

/// A replacement implementation for one temporal operator.
///
/// `operands` holds one set per operand of the operator, left to right
/// (two for `AU`/`EU`, one otherwise).
///
/// Any `Fn(&[SatSet], &Model) -> Result<SatSet, BoxError>` closure implements
/// this trait.
pub trait CustomOperator: Send + Sync {
    fn apply(&self, operands: &[SatSet], model: &Model) -> Result<SatSet, BoxError>;
}

impl<F> CustomOperator for F
where
    F: Fn(&[SatSet], &Model) -> Result<SatSet, BoxError> + Send + Sync,
{
    fn apply(&self, operands: &[SatSet], model: &Model) -> Result<SatSet, BoxError> {
        self(operands, model)
    }
}

#[derive(Default)]
pub struct CustomRegistry {
    slots: [Option<Box<dyn CustomOperator>>; 8],
    modified: bool,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs (or replaces) the implementation of `op`.
    pub fn install(&mut self, op: TemporalOp, operator: Box<dyn CustomOperator>) {
        if self.slots[op.index()].replace(operator).is_some() {
            log::debug!("replacing custom {} operator", op);
        } else {
            log::debug!("installing custom {} operator", op);
        }
        self.modified = true;
    }

    pub fn get(&self, op: TemporalOp) -> Option<&dyn CustomOperator> {
        self.slots[op.index()].as_deref()
    }

    pub fn contains(&self, op: TemporalOp) -> bool {
        self.slots[op.index()].is_some()
    }

    /// Operators that currently have a custom implementation.
    pub fn installed(&self) -> impl Iterator<Item = TemporalOp> + '_ {
        TemporalOp::ALL.into_iter().filter(|&op| self.contains(op))
    }

    /// True once anything has been installed.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

impl fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRegistry")
            .field("installed", &self.installed().collect::<Vec<_>>())
            .field("modified", &self.modified)
            .finish()
    }
}
