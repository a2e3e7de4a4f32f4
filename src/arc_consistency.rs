//! Binary constraint propagation: `revise` and AC-3.

use std::collections::{HashSet, VecDeque};

use bit_set::BitSet;

use crate::domain::Domains;
use crate::puzzle::Puzzle;
use crate::VariableId;

/// An ordered pair `(x, y)`: revising it makes `x` consistent with `y`.
pub type Arc = (VariableId, VariableId);

/// Worklist of arcs still to revise. An arc is never queued twice at once.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<Arc>,
    queued: HashSet<Arc>,
}

impl ArcQueue {
    fn with_initial_arcs<Arcs>(arcs: Arcs) -> ArcQueue
    where
        Arcs: IntoIterator<Item = Arc>,
    {
        let mut queue = ArcQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in arcs {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// Total number of candidates removed across all domains.
    pub removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The variable whose domain was emptied.
    pub emptied_variable_id: VariableId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Every ordered pair of distinct variables that overlap, in enumeration order.
pub fn all_arcs(puzzle: &Puzzle) -> Vec<Arc> {
    (0..puzzle.variable_count())
        .flat_map(|x| puzzle.neighbors(x).iter().map(move |&y| (x, y)))
        .collect()
}

/// Make `x` arc consistent with `y` by removing every candidate of `x` whose letter at the shared
/// cell matches no candidate of `y`. Returns whether anything was removed.
pub fn revise(puzzle: &Puzzle, domains: &mut Domains, x: VariableId, y: VariableId) -> bool {
    let overlap = match puzzle.overlap(x, y) {
        Some(overlap) => overlap,
        None => return false,
    };

    // Letters that some candidate of `y` places in the shared cell.
    let supported: HashSet<char> = domains
        .words(y)
        .filter_map(|word_id| puzzle.word(word_id).glyphs.get(overlap.other_cell).copied())
        .collect();

    let before = domains.size(x);
    let pruned: BitSet = domains
        .words(x)
        .filter(|&word_id| {
            puzzle
                .word(word_id)
                .glyphs
                .get(overlap.cell)
                .map_or(false, |glyph| supported.contains(glyph))
        })
        .collect();

    let revised = pruned.len() < before;
    if revised {
        domains.replace(x, pruned);
    }
    revised
}

/// AC-3. Starts from `arcs`, or from every overlapping pair if `None`, and revises until the
/// worklist drains. Fails as soon as any domain becomes empty.
pub fn enforce_arc_consistency(
    puzzle: &Puzzle,
    domains: &mut Domains,
    arcs: Option<&[Arc]>,
) -> ArcConsistencyResult {
    let mut queue = match arcs {
        Some(arcs) => ArcQueue::with_initial_arcs(arcs.iter().copied()),
        None => ArcQueue::with_initial_arcs(all_arcs(puzzle)),
    };
    let mut removed = 0;

    while let Some((x, y)) = queue.pop_front() {
        let before = domains.size(x);
        if !revise(puzzle, domains, x, y) {
            continue;
        }
        removed += before - domains.size(x);

        if domains.size(x) == 0 {
            log::debug!("Arc consistency emptied the domain of {}", puzzle.variable(x));
            return Err(ArcConsistencyFailure { emptied_variable_id: x });
        }

        // Shrinking `x` may break arcs pointing into it that were previously fine.
        for &z in puzzle.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    log::debug!("Arc consistency removed {} candidates", removed);

    Ok(ArcConsistencySuccess { removed })
}

/// Check that every candidate of every variable has support in each overlapping neighbor.
pub fn is_arc_consistent(puzzle: &Puzzle, domains: &Domains) -> bool {
    all_arcs(puzzle).into_iter().all(|(x, y)| {
        let mut scratch = domains.clone();
        !revise(puzzle, &mut scratch, x, y)
    })
}
