//! Variable and value ordering for backtracking search.

use std::cmp::Reverse;
use std::collections::HashMap;

use smallvec::SmallVec;

use crate::consistency::Assignment;
use crate::domain::Domains;
use crate::puzzle::{Overlap, Puzzle};
use crate::{VariableId, WordId, MAX_SLOT_LENGTH};

/// Pick the next variable to fill: fewest remaining candidates first, then the most neighbors,
/// then the earliest in the puzzle's enumeration order. Returns `None` once everything is
/// assigned.
pub fn select_unassigned_variable(
    puzzle: &Puzzle,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<VariableId> {
    (0..puzzle.variable_count())
        .filter(|&variable_id| !assignment.is_assigned(variable_id))
        .min_by_key(|&variable_id| {
            (domains.size(variable_id), Reverse(puzzle.degree(variable_id)), variable_id)
        })
}

/// Per-neighbor letter counts at the shared cell, used to count how many of the neighbor's
/// candidates a given letter would rule out.
struct NeighborGlyphCounts {
    overlap: Overlap,
    total: usize,
    counts: HashMap<char, usize>,
}

impl NeighborGlyphCounts {
    fn ruled_out_by(&self, glyph: Option<char>) -> usize {
        let compatible = glyph.and_then(|glyph| self.counts.get(&glyph)).copied().unwrap_or(0);
        self.total - compatible
    }
}

/// Return the candidates for `variable_id` ordered so that the one ruling out the fewest values
/// among unassigned neighbors comes first. Counts are taken against the neighbors' current
/// domains; ties go to the word appearing earlier in the word list.
pub fn order_domain_values(
    puzzle: &Puzzle,
    domains: &Domains,
    assignment: &Assignment,
    variable_id: VariableId,
) -> Vec<WordId> {
    let neighbor_counts: SmallVec<[NeighborGlyphCounts; MAX_SLOT_LENGTH]> = puzzle
        .neighbors(variable_id)
        .iter()
        .filter(|&&neighbor_id| !assignment.is_assigned(neighbor_id))
        .filter_map(|&neighbor_id| {
            let overlap = puzzle.overlap(variable_id, neighbor_id)?;
            let mut counts: HashMap<char, usize> = HashMap::new();
            for word_id in domains.words(neighbor_id) {
                if let Some(&glyph) = puzzle.word(word_id).glyphs.get(overlap.other_cell) {
                    *counts.entry(glyph).or_insert(0) += 1;
                }
            }
            Some(NeighborGlyphCounts { overlap, total: domains.size(neighbor_id), counts })
        })
        .collect();

    let mut values: Vec<WordId> = domains.words(variable_id).collect();
    values.sort_by_cached_key(|&word_id| {
        let word = puzzle.word(word_id);
        let ruled_out: usize = neighbor_counts
            .iter()
            .map(|neighbor| neighbor.ruled_out_by(word.glyphs.get(neighbor.overlap.cell).copied()))
            .sum();
        (ruled_out, word_id)
    });
    values
}
