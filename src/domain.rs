//! The domain store and node consistency.

use std::fmt::{Debug, Formatter};

use bit_set::BitSet;

use crate::puzzle::Puzzle;
use crate::{VariableId, WordId};

/// The candidate words still available to each variable, stored as a set of word ids per
/// variable. Domains only ever shrink, except when search restores a snapshot it took itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Domains {
    sets: Vec<BitSet>,
}

impl Debug for Domains {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sets.iter().map(BitSet::len)).finish()
    }
}

impl Domains {
    /// Give every variable the entire word list.
    pub fn new(puzzle: &Puzzle) -> Domains {
        let word_count = puzzle.words().len();
        let full: BitSet = (0..word_count).collect();

        Domains { sets: vec![full; puzzle.variable_count()] }
    }

    pub fn get(&self, variable_id: VariableId) -> &BitSet {
        &self.sets[variable_id]
    }

    pub fn size(&self, variable_id: VariableId) -> usize {
        self.sets[variable_id].len()
    }

    /// Candidate word ids for a variable, in word list order.
    pub fn words(&self, variable_id: VariableId) -> impl Iterator<Item = WordId> + '_ {
        self.sets[variable_id].iter()
    }

    /// The first variable (in enumeration order) with no candidates left.
    pub fn first_empty(&self) -> Option<VariableId> {
        self.sets.iter().position(BitSet::is_empty)
    }

    /// Swap in a pruned domain for a variable.
    pub(crate) fn replace(&mut self, variable_id: VariableId, pruned: BitSet) {
        debug_assert!(pruned.is_subset(&self.sets[variable_id]), "domains never grow");
        self.sets[variable_id] = pruned;
    }

    /// Collapse a variable's domain to a single word.
    pub(crate) fn restrict_to(&mut self, variable_id: VariableId, word_id: WordId) {
        let mut single = BitSet::with_capacity(word_id + 1);
        single.insert(word_id);
        self.replace(variable_id, single);
    }
}

/// Remove every candidate whose length differs from its variable's length. Returns the number of
/// candidates removed; running it again removes nothing.
pub fn enforce_node_consistency(puzzle: &Puzzle, domains: &mut Domains) -> usize {
    let mut removed = 0;

    for (variable_id, variable) in puzzle.variables().iter().enumerate() {
        let before = domains.size(variable_id);
        let pruned: BitSet = domains
            .words(variable_id)
            .filter(|&word_id| puzzle.word(word_id).len() == variable.length)
            .collect();

        removed += before - pruned.len();
        domains.replace(variable_id, pruned);
    }

    log::debug!("Node consistency removed {} candidates", removed);

    removed
}
