//! Explicit Kripke structures.
//!
//! A [`Model`] is a finite set of labeled [`State`]s together with a total
//! transition relation. It is immutable once constructed and can be shared
//! freely between checkers and threads.
//!
//! # Construction
//!
//! Models are validated eagerly by [`Model::new`]: every transition key and
//! every successor must name a known state, and every state must have an entry
//! in the transition relation (an empty successor list denotes a deadlock
//! state). A successfully constructed model therefore never produces
//! [`Error::UnknownState`] or [`Error::MalformedModel`] during checking.
//!
//! # Example
//!
//! ```
//! use ctl_rs::model::{Model, State};
//!
//! let model = Model::new(
//!     [State::new("s1", ["p"]), State::new("s2", ["q"])],
//!     [("s1", vec!["s2"]), ("s2", vec!["s1", "s2"])],
//! )
//! .unwrap();
//!
//! assert_eq!(model.len(), 2);
//! assert!(model.get_state("s1").unwrap().contains("p"));
//! ```

use std::collections::{HashMap, HashSet};

use crate::bitset::StateSet;
use crate::error::{Error, Result};
use crate::types::StateId;

/// A labeled state: a unique name plus the atomic propositions true there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    name: String,
    labels: HashSet<String>,
}

impl State {
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        State {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &HashSet<String> {
        &self.labels
    }

    /// Returns true if the proposition `prop` holds in this state.
    pub fn contains(&self, prop: &str) -> bool {
        self.labels.contains(prop)
    }
}

/// A finite Kripke structure over named states.
#[derive(Debug, Clone)]
pub struct Model {
    /// States in insertion order; position is the [`StateId`].
    states: Vec<State>,
    /// Name lookup.
    index: HashMap<String, StateId>,
    /// Successor ids of each state, sorted and deduplicated.
    successors: Vec<Vec<StateId>>,
}

impl Model {
    /// Builds a model from its states and transition relation.
    ///
    /// `transitions` maps each state name to the names of its successors.
    /// Duplicate successors are collapsed.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateState`] if two states share a name.
    /// - [`Error::UnknownState`] if a transition key is not a state.
    /// - [`Error::MalformedModel`] if a successor is not a state.
    /// - [`Error::MissingTransitions`] if a state has no transition entry.
    pub fn new<S, T, K, I, N>(states: S, transitions: T) -> Result<Self>
    where
        S: IntoIterator<Item = State>,
        T: IntoIterator<Item = (K, I)>,
        K: AsRef<str>,
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let states: Vec<State> = states.into_iter().collect();

        let mut index = HashMap::with_capacity(states.len());
        for (i, state) in states.iter().enumerate() {
            if index.insert(state.name.clone(), StateId::new(i)).is_some() {
                return Err(Error::DuplicateState(state.name.clone()));
            }
        }

        let mut successors: Vec<Option<Vec<StateId>>> = vec![None; states.len()];
        for (from, targets) in transitions {
            let from = from.as_ref();
            let src = *index.get(from).ok_or_else(|| Error::UnknownState(from.to_string()))?;
            let mut succ = Vec::new();
            for to in targets {
                let to = to.as_ref();
                let dst = index.get(to).ok_or_else(|| Error::MalformedModel {
                    from: from.to_string(),
                    to: to.to_string(),
                })?;
                succ.push(*dst);
            }
            // Repeated keys accumulate.
            successors[src.index()].get_or_insert_with(Vec::new).extend(succ);
        }

        let successors = successors
            .into_iter()
            .zip(&states)
            .map(|(succ, state)| match succ {
                Some(mut succ) => {
                    succ.sort_unstable();
                    succ.dedup();
                    Ok(succ)
                }
                None => Err(Error::MissingTransitions(state.name.clone())),
            })
            .collect::<Result<Vec<_>>>()?;

        let deadlocks = successors.iter().filter(|s| s.is_empty()).count();
        log::debug!(
            "Model::new: {} states, {} transitions, {} deadlock states",
            states.len(),
            successors.iter().map(Vec::len).sum::<usize>(),
            deadlocks
        );

        Ok(Model {
            states,
            index,
            successors,
        })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over the states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Looks up a state by name.
    pub fn get_state(&self, name: &str) -> Result<&State> {
        let id = self.id_of(name)?;
        Ok(&self.states[id.index()])
    }

    /// All state names.
    pub fn all(&self) -> HashSet<String> {
        self.states.iter().map(|s| s.name.clone()).collect()
    }

    /// Names of the states labeled with `prop`.
    ///
    /// A proposition that labels no state yields the empty set.
    pub fn all_containing(&self, prop: &str) -> HashSet<String> {
        self.to_names(&self.all_containing_ids(prop))
    }

    /// All state names except `excluded`.
    ///
    /// Names in `excluded` that are not states of the model are ignored.
    pub fn all_except(&self, excluded: &HashSet<String>) -> HashSet<String> {
        self.states
            .iter()
            .filter(|s| !excluded.contains(&s.name))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Names of the successors of `name` (possibly empty).
    pub fn successors(&self, name: &str) -> Result<HashSet<String>> {
        let id = self.id_of(name)?;
        Ok(self.successor_ids(id).iter().map(|&s| self.name_of(s).to_string()).collect())
    }

    /// States with at least one successor in `names`.
    pub fn pre_e(&self, names: &HashSet<String>) -> Result<HashSet<String>> {
        let set = self.to_ids(names)?;
        Ok(self.to_names(&self.pre_e_ids(&set)))
    }

    /// States whose successors all lie in `names` (vacuously true for deadlocks).
    pub fn pre_a(&self, names: &HashSet<String>) -> Result<HashSet<String>> {
        let set = self.to_ids(names)?;
        Ok(self.to_names(&self.pre_a_ids(&set)))
    }

    // ─── Index-level API ───

    /// Resolves a state name to its id.
    pub fn id_of(&self, name: &str) -> Result<StateId> {
        self.index.get(name).copied().ok_or_else(|| Error::UnknownState(name.to_string()))
    }

    /// Name of the state with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this model.
    pub fn name_of(&self, id: StateId) -> &str {
        &self.states[id.index()].name
    }

    /// Sorted successor ids of `id`.
    pub fn successor_ids(&self, id: StateId) -> &[StateId] {
        &self.successors[id.index()]
    }

    /// The set of all state ids.
    pub fn all_ids(&self) -> StateSet {
        StateSet::full(self.len())
    }

    /// Ids of the states labeled with `prop`.
    pub fn all_containing_ids(&self, prop: &str) -> StateSet {
        let mut set = StateSet::new(self.len());
        for (i, state) in self.states.iter().enumerate() {
            if state.contains(prop) {
                set.insert(StateId::new(i));
            }
        }
        set
    }

    /// Complement of `excluded` relative to the full state space.
    pub fn all_except_ids(&self, excluded: &StateSet) -> StateSet {
        self.all_ids().difference(excluded)
    }

    /// Existential predecessor image: `{s : succ(s) ∩ set ≠ ∅}`.
    pub fn pre_e_ids(&self, set: &StateSet) -> StateSet {
        self.collect_ids(|succ| succ.iter().any(|&t| set.contains(t)))
    }

    /// Universal predecessor image: `{s : succ(s) ⊆ set}`.
    pub fn pre_a_ids(&self, set: &StateSet) -> StateSet {
        self.collect_ids(|succ| succ.iter().all(|&t| set.contains(t)))
    }

    /// Universal predecessor image restricted to non-deadlock states:
    /// `{s : succ(s) ≠ ∅ ∧ succ(s) ⊆ set}`.
    pub fn pre_a_strict_ids(&self, set: &StateSet) -> StateSet {
        self.collect_ids(|succ| !succ.is_empty() && succ.iter().all(|&t| set.contains(t)))
    }

    fn collect_ids(&self, pred: impl Fn(&[StateId]) -> bool) -> StateSet {
        let mut res = StateSet::new(self.len());
        for (i, succ) in self.successors.iter().enumerate() {
            if pred(succ) {
                res.insert(StateId::new(i));
            }
        }
        res
    }

    /// Converts a set of ids to state names.
    pub fn to_names(&self, set: &StateSet) -> HashSet<String> {
        set.iter().map(|id| self.name_of(id).to_string()).collect()
    }

    /// Converts a set of names to ids.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownState`] for the first name that is not a state.
    pub fn to_ids<'a, I>(&self, names: I) -> Result<StateSet>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut set = StateSet::new(self.len());
        for name in names {
            set.insert(self.id_of(name)?);
        }
        Ok(set)
    }

    /// Formats a set as `{a, b, c}` with names in insertion order.
    pub fn display_set(&self, set: &StateSet) -> String {
        let names: Vec<&str> = set.iter().map(|id| self.name_of(id)).collect();
        format!("{{{}}}", names.join(", "))
    }
}
