//! Partial assignments and the consistency check run on every candidate during search.

use std::collections::HashMap;

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::puzzle::{Puzzle, Variable};
use crate::{VariableId, WordId, MAX_SLOT_COUNT};

/// A partial mapping from variables to words, built and unwound during search.
#[derive(Debug, Clone)]
pub struct Assignment {
    words: Vec<Option<WordId>>,

    /// Assigned variables in the order they were assigned. Search unassigns in reverse, so
    /// removal is almost always from the end.
    order: SmallVec<[VariableId; MAX_SLOT_COUNT]>,
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl Eq for Assignment {}

impl Assignment {
    /// An empty assignment over `variable_count` variables.
    pub fn new(variable_count: usize) -> Assignment {
        Assignment { words: vec![None; variable_count], order: SmallVec::new() }
    }

    pub fn for_puzzle(puzzle: &Puzzle) -> Assignment {
        Assignment::new(puzzle.variable_count())
    }

    /// Assign a word to an unassigned variable.
    ///
    /// # Panics
    /// If the variable already holds a word; search always unassigns before trying another.
    pub fn assign(&mut self, variable_id: VariableId, word_id: WordId) {
        assert!(
            self.words[variable_id].is_none(),
            "variable {} assigned twice without being unassigned",
            variable_id
        );
        self.words[variable_id] = Some(word_id);
        self.order.push(variable_id);
    }

    /// Remove a variable's word, returning it.
    pub fn unassign(&mut self, variable_id: VariableId) -> Option<WordId> {
        let word_id = self.words[variable_id].take()?;
        let position = self
            .order
            .iter()
            .rposition(|&assigned_id| assigned_id == variable_id)
            .expect("assigned variable missing from assignment order");
        self.order.remove(position);
        Some(word_id)
    }

    pub fn word_id(&self, variable_id: VariableId) -> Option<WordId> {
        self.words[variable_id]
    }

    pub fn is_assigned(&self, variable_id: VariableId) -> bool {
        self.words[variable_id].is_some()
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True once every variable holds a word. An assignment over zero variables is complete.
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.words.len()
    }

    /// Assigned `(variable, word)` id pairs, in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.order.iter().map(move |&variable_id| {
            let word_id = self.words[variable_id].expect("ordered variable is assigned");
            (variable_id, word_id)
        })
    }

    /// The word assigned to `variable`, looked up structurally.
    pub fn get<'p>(&self, puzzle: &'p Puzzle, variable: &Variable) -> Option<&'p str> {
        let word_id = self.word_id(puzzle.variable_id(variable)?)?;
        Some(puzzle.word(word_id).as_str())
    }

    /// Copy out a map from variable to word.
    pub fn to_map(&self, puzzle: &Puzzle) -> HashMap<Variable, String> {
        self.iter()
            .map(|(variable_id, word_id)| {
                (puzzle.variable(variable_id).clone(), puzzle.word(word_id).string.clone())
            })
            .collect()
    }
}

/// Return whether `assignment` fits the puzzle: every word has its variable's length, no word is
/// used twice, and every pair of assigned neighbors agrees on their shared letter.
pub fn is_consistent(puzzle: &Puzzle, assignment: &Assignment) -> bool {
    let mut used = BitSet::with_capacity(puzzle.words().len());

    for (variable_id, word_id) in assignment.iter() {
        if puzzle.word(word_id).len() != puzzle.variable(variable_id).length {
            return false;
        }
        if !used.insert(word_id) {
            return false;
        }
    }

    // Lengths are known to match, so overlap offsets index safely from here on.
    for (variable_id, word_id) in assignment.iter() {
        let word = puzzle.word(word_id);

        for &neighbor_id in puzzle.neighbors(variable_id) {
            let neighbor_word_id = match assignment.word_id(neighbor_id) {
                Some(neighbor_word_id) => neighbor_word_id,
                None => continue,
            };
            if let Some(overlap) = puzzle.overlap(variable_id, neighbor_id) {
                let neighbor_word = puzzle.word(neighbor_word_id);
                if word.glyphs[overlap.cell] != neighbor_word.glyphs[overlap.other_cell] {
                    return false;
                }
            }
        }
    }

    true
}
