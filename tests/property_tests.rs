use crossfill::arc_consistency::{all_arcs, enforce_arc_consistency};
use crossfill::consistency::{is_consistent, Assignment};
use crossfill::domain::{enforce_node_consistency, Domains};
use crossfill::{Puzzle, SolveFailure, Solver, SolverConfig, WordList};

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

// Small grids over a three-letter alphabet, so that crossings frequently do and don't line up.
fn arb_template() -> BoxedStrategy<String> {
    (2usize..=4, 2usize..=4)
        .prop_flat_map(|(height, width)| {
            prop::collection::vec(prop::bool::weighted(0.75), height * width).prop_map(move |cells| {
                cells
                    .chunks(width)
                    .map(|row| row.iter().map(|&open| if open { '_' } else { '#' }).collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        })
        .boxed()
}

fn arb_words() -> BoxedStrategy<Vec<String>> {
    prop::collection::vec("[ABC]{1,4}", 0..14).boxed()
}

fn arb_puzzle() -> BoxedStrategy<Puzzle> {
    (arb_template(), arb_words())
        .prop_map(|(template, words)| {
            Puzzle::from_template(&template, WordList::new(words)).expect("generated template is valid")
        })
        .boxed()
}

/// Exhaustive search in enumeration order with no heuristics, for cross-checking the solver.
fn brute_force_solvable(puzzle: &Puzzle, domains: &Domains, assignment: &mut Assignment, next: usize) -> bool {
    if next == puzzle.variable_count() {
        return true;
    }
    for word_id in domains.words(next) {
        assignment.assign(next, word_id);
        let found = is_consistent(puzzle, assignment) && brute_force_solvable(puzzle, domains, assignment, next + 1);
        if found {
            return true;
        }
        assignment.unassign(next);
    }
    false
}

proptest! {
    #[test]
    fn test_node_consistency_keeps_only_matching_lengths(puzzle in arb_puzzle()) {
        let mut domains = Domains::new(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);

        for (variable_id, variable) in puzzle.variables().iter().enumerate() {
            for word_id in domains.words(variable_id) {
                prop_assert_eq!(puzzle.word(word_id).len(), variable.length);
            }
        }

        let once = domains.clone();
        prop_assert_eq!(enforce_node_consistency(&puzzle, &mut domains), 0);
        prop_assert_eq!(domains, once);
    }

    #[test]
    fn test_arc_consistency_postcondition(puzzle in arb_puzzle()) {
        let mut domains = Domains::new(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);
        let before = domains.clone();

        match enforce_arc_consistency(&puzzle, &mut domains, None) {
            Ok(_) => {
                prop_assert_eq!(domains.first_empty().filter(|&id| before.size(id) > 0), None);

                for (x, y) in all_arcs(&puzzle) {
                    let overlap = puzzle.overlap(x, y).expect("arcs only join overlapping variables");
                    for u in domains.words(x) {
                        let letter = puzzle.word(u).glyphs[overlap.cell];
                        prop_assert!(
                            domains.words(y).any(|v| puzzle.word(v).glyphs[overlap.other_cell] == letter)
                        );
                    }
                }
            }
            Err(failure) => {
                prop_assert_eq!(domains.size(failure.emptied_variable_id), 0);
            }
        }

        // Domains only shrink.
        for variable_id in 0..puzzle.variable_count() {
            prop_assert!(domains.get(variable_id).is_subset(before.get(variable_id)));
        }
    }

    #[test]
    fn test_solver_agrees_with_brute_force(puzzle in arb_puzzle()) {
        let mut domains = Domains::new(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);
        let mut scratch = Assignment::for_puzzle(&puzzle);
        let solvable = brute_force_solvable(&puzzle, &domains, &mut scratch, 0);

        for maintain_arc_consistency in [false, true] {
            let config = SolverConfig { maintain_arc_consistency, ..SolverConfig::default() };
            match Solver::with_config(&puzzle, config).solve() {
                Ok(solution) => {
                    prop_assert!(solvable);
                    prop_assert!(solution.assignment.is_complete());
                    prop_assert!(is_consistent(&puzzle, &solution.assignment));
                }
                Err(failure) => {
                    prop_assert!(!solvable);
                    // No limits are configured, so only a proof of unsatisfiability may end the solve.
                    let definitive = matches!(
                        failure,
                        SolveFailure::UnsatisfiableDomain { .. } | SolveFailure::SearchExhausted
                    );
                    prop_assert!(definitive, "unexpected failure {:?}", failure);
                }
            }
        }
    }
}
