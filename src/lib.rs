//! # ctl-rs: explicit-state CTL model checking in Rust
//!
//! **`ctl-rs`** evaluates Computation Tree Logic formulas over finite Kripke structures.
//! For every formula it computes the exact set of states that satisfy it.
//!
//! ## What is CTL?
//!
//! CTL is a branching-time temporal logic. Every temporal operator pairs a path quantifier
//! (`A` = on all paths, `E` = on some path) with a temporal modality
//! (`X` = next, `F` = eventually, `G` = always, `U` = until).
//! The satisfaction set of a temporal formula is a least or greatest fixpoint over the
//! transition graph of the model.
//!
//! ## Key Features
//!
//! - **Explicit states**: Models are plain labeled graphs; states are named and enumerable.
//! - **Bit-set satisfaction sets**: Fixpoints run over dense [`StateSet`][crate::bitset::StateSet]s.
//! - **Bounded fixpoints**: Every loop is capped by the number of states and reports
//!   non-convergence instead of spinning.
//! - **Custom operators**: Any of the eight temporal operators can be replaced per checker,
//!   e.g. to compare a hand-written algorithm against the default one.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ctl_rs::checker::Checker;
//! use ctl_rs::formula::CtlFormula;
//! use ctl_rs::model::{Model, State};
//!
//! // 1. Build the model
//! let model = Model::new(
//!     [
//!         State::new("s1", ["p"]),
//!         State::new("s2", ["p", "q"]),
//!         State::new("s3", ["q"]),
//!     ],
//!     [
//!         ("s1", vec!["s2"]),
//!         ("s2", vec!["s3"]),
//!         ("s3", vec!["s3"]),
//!     ],
//! )
//! .unwrap();
//!
//! // 2. Check a formula: E[p U q]
//! let checker = Checker::new(&model);
//! let f = CtlFormula::var("p").eu(CtlFormula::var("q"));
//! let sat = checker.check(&f).unwrap();
//! assert_eq!(sat.len(), 3);
//!
//! // 3. Replace EF with a custom implementation
//! let mut checker = Checker::new(&model);
//! checker.set_custom("EF", |_, _| Ok(Default::default())).unwrap();
//! assert!(checker.is_modified());
//! assert!(checker.check(&CtlFormula::var("q").ef()).unwrap().is_empty());
//! ```
//!
//! ## Core Components
//!
//! - **[`model`]**: States and the Kripke structure.
//! - **[`formula`]**: The CTL abstract syntax tree.
//! - **[`checker`]**: The evaluator.
//! - **[`fixpoint`]**: Default algorithms for the temporal operators.
//! - **[`registry`]**: Custom operator table.

pub mod bitset;
pub mod checker;
pub mod error;
pub mod fixpoint;
pub mod formula;
pub mod model;
pub mod registry;
pub mod types;

pub use checker::{evaluate, CheckOptions, Checker};
pub use error::{BoxError, Error, Result};
pub use formula::{CtlFormula, TemporalOp};
pub use model::{Model, State};
pub use registry::{CustomOperator, SatSet};
