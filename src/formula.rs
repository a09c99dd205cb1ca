//! CTL formulas.
//!
//! CTL combines path quantifiers (A = all paths, E = exists a path) with
//! temporal operators (X = next, F = future, G = globally, U = until).
//! Formulas are plain trees: each subformula is exclusively owned by its parent.
//!
//! Textual syntax is not handled here; a parser is expected to produce a
//! [`CtlFormula`] directly.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// CTL formula abstract syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CtlFormula {
    /// True
    Top,
    /// False
    Bot,
    /// Atomic proposition
    Var(String),
    /// Negation
    Not(Box<CtlFormula>),
    /// Conjunction
    And(Box<CtlFormula>, Box<CtlFormula>),
    /// Disjunction
    Or(Box<CtlFormula>, Box<CtlFormula>),
    /// Implication: φ → ψ
    Implies(Box<CtlFormula>, Box<CtlFormula>),
    /// Reverse implication: φ ← ψ
    ImpliedBy(Box<CtlFormula>, Box<CtlFormula>),
    /// Equivalence
    Iff(Box<CtlFormula>, Box<CtlFormula>),

    // CTL-specific operators (path quantifier + temporal operator)
    /// All Next: AX φ
    AX(Box<CtlFormula>),
    /// Exists Next: EX φ
    EX(Box<CtlFormula>),
    /// All Future (Eventually): AF φ
    AF(Box<CtlFormula>),
    /// Exists Future (Eventually): EF φ
    EF(Box<CtlFormula>),
    /// All Globally (Always): AG φ
    AG(Box<CtlFormula>),
    /// Exists Globally (Always): EG φ
    EG(Box<CtlFormula>),
    /// All Until: A[φ U ψ]
    AU(Box<CtlFormula>, Box<CtlFormula>),
    /// Exists Until: E[φ U ψ]
    EU(Box<CtlFormula>, Box<CtlFormula>),
}

impl CtlFormula {
    /// Constructors for convenience
    pub fn var(s: impl Into<String>) -> Self {
        CtlFormula::Var(s.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        CtlFormula::Not(Box::new(self))
    }

    pub fn and(self, other: Self) -> Self {
        CtlFormula::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Self) -> Self {
        CtlFormula::Or(Box::new(self), Box::new(other))
    }

    pub fn implies(self, other: Self) -> Self {
        CtlFormula::Implies(Box::new(self), Box::new(other))
    }

    pub fn implied_by(self, other: Self) -> Self {
        CtlFormula::ImpliedBy(Box::new(self), Box::new(other))
    }

    pub fn iff(self, other: Self) -> Self {
        CtlFormula::Iff(Box::new(self), Box::new(other))
    }

    pub fn ax(self) -> Self {
        CtlFormula::AX(Box::new(self))
    }

    pub fn ex(self) -> Self {
        CtlFormula::EX(Box::new(self))
    }

    pub fn af(self) -> Self {
        CtlFormula::AF(Box::new(self))
    }

    pub fn ef(self) -> Self {
        CtlFormula::EF(Box::new(self))
    }

    pub fn ag(self) -> Self {
        CtlFormula::AG(Box::new(self))
    }

    pub fn eg(self) -> Self {
        CtlFormula::EG(Box::new(self))
    }

    pub fn au(self, other: Self) -> Self {
        CtlFormula::AU(Box::new(self), Box::new(other))
    }

    pub fn eu(self, other: Self) -> Self {
        CtlFormula::EU(Box::new(self), Box::new(other))
    }

    /// Returns the temporal operator at the root, if any.
    pub fn temporal_op(&self) -> Option<TemporalOp> {
        match self {
            CtlFormula::AX(_) => Some(TemporalOp::AX),
            CtlFormula::EX(_) => Some(TemporalOp::EX),
            CtlFormula::AF(_) => Some(TemporalOp::AF),
            CtlFormula::EF(_) => Some(TemporalOp::EF),
            CtlFormula::AG(_) => Some(TemporalOp::AG),
            CtlFormula::EG(_) => Some(TemporalOp::EG),
            CtlFormula::AU(_, _) => Some(TemporalOp::AU),
            CtlFormula::EU(_, _) => Some(TemporalOp::EU),
            _ => None,
        }
    }

    /// Direct subformulas, left to right.
    pub fn children(&self) -> Vec<&CtlFormula> {
        match self {
            CtlFormula::Top | CtlFormula::Bot | CtlFormula::Var(_) => vec![],
            CtlFormula::Not(phi)
            | CtlFormula::AX(phi)
            | CtlFormula::EX(phi)
            | CtlFormula::AF(phi)
            | CtlFormula::EF(phi)
            | CtlFormula::AG(phi)
            | CtlFormula::EG(phi) => vec![phi.as_ref()],
            CtlFormula::And(phi, psi)
            | CtlFormula::Or(phi, psi)
            | CtlFormula::Implies(phi, psi)
            | CtlFormula::ImpliedBy(phi, psi)
            | CtlFormula::Iff(phi, psi)
            | CtlFormula::AU(phi, psi)
            | CtlFormula::EU(phi, psi) => vec![phi.as_ref(), psi.as_ref()],
        }
    }

    /// Total number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().into_iter().map(CtlFormula::size).sum::<usize>()
    }
}

impl fmt::Display for CtlFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtlFormula::Top => write!(f, "true"),
            CtlFormula::Bot => write!(f, "false"),
            CtlFormula::Var(s) => write!(f, "{}", s),
            CtlFormula::Not(phi) => write!(f, "¬{}", phi),
            CtlFormula::And(phi, psi) => write!(f, "({} ∧ {})", phi, psi),
            CtlFormula::Or(phi, psi) => write!(f, "({} ∨ {})", phi, psi),
            CtlFormula::Implies(phi, psi) => write!(f, "({} → {})", phi, psi),
            CtlFormula::ImpliedBy(phi, psi) => write!(f, "({} ← {})", phi, psi),
            CtlFormula::Iff(phi, psi) => write!(f, "({} ↔ {})", phi, psi),
            CtlFormula::AX(phi) => write!(f, "AX {}", phi),
            CtlFormula::EX(phi) => write!(f, "EX {}", phi),
            CtlFormula::AF(phi) => write!(f, "AF {}", phi),
            CtlFormula::EF(phi) => write!(f, "EF {}", phi),
            CtlFormula::AG(phi) => write!(f, "AG {}", phi),
            CtlFormula::EG(phi) => write!(f, "EG {}", phi),
            CtlFormula::AU(phi, psi) => write!(f, "A[{} U {}]", phi, psi),
            CtlFormula::EU(phi, psi) => write!(f, "E[{} U {}]", phi, psi),
        }
    }
}

/// The eight temporal operators, i.e. the ones that can be overridden.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TemporalOp {
    AX,
    EX,
    AF,
    EF,
    AG,
    EG,
    AU,
    EU,
}

impl TemporalOp {
    pub const ALL: [TemporalOp; 8] = [
        TemporalOp::AX,
        TemporalOp::EX,
        TemporalOp::AF,
        TemporalOp::EF,
        TemporalOp::AG,
        TemporalOp::EG,
        TemporalOp::AU,
        TemporalOp::EU,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemporalOp::AX => "AX",
            TemporalOp::EX => "EX",
            TemporalOp::AF => "AF",
            TemporalOp::EF => "EF",
            TemporalOp::AG => "AG",
            TemporalOp::EG => "EG",
            TemporalOp::AU => "AU",
            TemporalOp::EU => "EU",
        }
    }

    /// Number of operands: 2 for the until operators, 1 otherwise.
    pub fn arity(self) -> usize {
        match self {
            TemporalOp::AU | TemporalOp::EU => 2,
            _ => 1,
        }
    }

    /// Position in [`TemporalOp::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TemporalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemporalOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemporalOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::InvalidOperator(s.to_string()))
    }
}
