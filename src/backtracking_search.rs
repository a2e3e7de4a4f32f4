//! The solver: node and arc consistency up front, then depth-first backtracking search.

use instant::{Duration, Instant};

use crate::arc_consistency::{
    enforce_arc_consistency, is_arc_consistent, revise, Arc, ArcConsistencyFailure, ArcConsistencyResult,
};
use crate::consistency::{is_consistent, Assignment};
use crate::domain::{enforce_node_consistency, Domains};
use crate::errors::SolveFailure;
use crate::heuristics::{order_domain_values, select_unassigned_variable};
use crate::puzzle::Puzzle;
use crate::{VariableId, WordId, CHECK_INVARIANTS};

/// Knobs for a single solve.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Give up once this much time has passed since the solve started.
    pub deadline: Option<Duration>,

    /// Give up after entering this many search states.
    pub max_states: Option<u64>,

    /// Re-run arc consistency after each tentative assignment, restoring the domains when that
    /// branch is abandoned. Changes how fast a fill is found, not whether one exists.
    pub maintain_arc_consistency: bool,
}

/// A struct tracking statistics about the solving process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub consistency_checks: u64,
    pub duration: Duration,
}

/// A struct representing the results of a successful solve.
#[derive(Debug)]
pub struct Solution {
    pub assignment: Assignment,
    pub statistics: Statistics,
}

/// Owns the domain store for one in-flight solve. The puzzle is only borrowed, so several solvers
/// can share one puzzle, each with its own domains and assignment.
#[derive(Debug)]
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    domains: Domains,
    config: SolverConfig,
    statistics: Statistics,
    start: Instant,
}

impl<'a> Solver<'a> {
    pub fn new(puzzle: &'a Puzzle) -> Solver<'a> {
        Solver::with_config(puzzle, SolverConfig::default())
    }

    pub fn with_config(puzzle: &'a Puzzle, config: SolverConfig) -> Solver<'a> {
        Solver {
            puzzle,
            domains: Domains::new(puzzle),
            config,
            statistics: Statistics::default(),
            start: Instant::now(),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Drop every candidate whose length doesn't match its variable.
    pub fn enforce_node_consistency(&mut self) -> usize {
        enforce_node_consistency(self.puzzle, &mut self.domains)
    }

    /// Make `x` arc consistent with `y`. Returns whether `x`'s domain changed.
    pub fn revise(&mut self, x: VariableId, y: VariableId) -> bool {
        revise(self.puzzle, &mut self.domains, x, y)
    }

    /// Run AC-3 from `arcs`, or from every overlapping pair.
    pub fn ac3(&mut self, arcs: Option<&[Arc]>) -> ArcConsistencyResult {
        enforce_arc_consistency(self.puzzle, &mut self.domains, arcs)
    }

    /// Enforce node and arc consistency, then search for the first complete, consistent
    /// assignment.
    pub fn solve(mut self) -> Result<Solution, SolveFailure> {
        self.start = Instant::now();

        self.enforce_node_consistency();
        if let Some(variable_id) = self.domains.first_empty() {
            return Err(self.unsatisfiable(variable_id));
        }

        if let Err(ArcConsistencyFailure { emptied_variable_id }) = self.ac3(None) {
            return Err(self.unsatisfiable(emptied_variable_id));
        }
        if CHECK_INVARIANTS {
            assert!(is_arc_consistent(self.puzzle, &self.domains), "AC-3 left an unsupported value");
        }

        log::info!(
            "Searching {} variables after propagation ({} candidates remain)",
            self.puzzle.variable_count(),
            (0..self.puzzle.variable_count()).map(|id| self.domains.size(id)).sum::<usize>()
        );

        let mut assignment = Assignment::for_puzzle(self.puzzle);
        let found = self.backtrack(&mut assignment);
        self.statistics.duration = self.start.elapsed();

        log::info!(
            "Search finished in {:?}: {} states, {} backtracks",
            self.statistics.duration,
            self.statistics.states,
            self.statistics.backtracks
        );

        match found {
            Ok(true) => {
                if CHECK_INVARIANTS {
                    assert!(assignment.is_complete(), "search returned a partial assignment");
                    assert!(is_consistent(self.puzzle, &assignment), "search returned an invalid fill");
                }
                Ok(Solution { assignment, statistics: self.statistics })
            }
            Ok(false) => Err(SolveFailure::SearchExhausted),
            Err(failure) => Err(failure),
        }
    }

    fn unsatisfiable(&self, variable_id: VariableId) -> SolveFailure {
        let variable = self.puzzle.variable(variable_id).clone();
        log::info!("No candidates remain for {} before search", variable);
        SolveFailure::UnsatisfiableDomain { variable }
    }

    /// Check the configured budgets. Called on entry to every search state.
    fn check_limits(&self) -> Result<(), SolveFailure> {
        if let Some(max_states) = self.config.max_states {
            if self.statistics.states > max_states {
                return Err(SolveFailure::StepLimitReached { states: max_states });
            }
        }
        if let Some(deadline) = self.config.deadline {
            let elapsed = self.start.elapsed();
            if elapsed >= deadline {
                return Err(SolveFailure::TimedOut { elapsed });
            }
        }
        Ok(())
    }

    /// Extend `assignment` to a complete one. On `Ok(true)` the assignment is complete; on any
    /// other return it is exactly what it was on entry.
    fn backtrack(&mut self, assignment: &mut Assignment) -> Result<bool, SolveFailure> {
        self.statistics.states += 1;
        self.check_limits()?;

        let variable_id = match select_unassigned_variable(self.puzzle, &self.domains, assignment) {
            Some(variable_id) => variable_id,
            None => return Ok(true),
        };

        for word_id in order_domain_values(self.puzzle, &self.domains, assignment, variable_id) {
            log::trace!(
                "Trying {} for {}",
                self.puzzle.word(word_id).as_str(),
                self.puzzle.variable(variable_id)
            );

            assignment.assign(variable_id, word_id);
            self.statistics.consistency_checks += 1;

            let outcome = if is_consistent(self.puzzle, assignment) {
                if self.config.maintain_arc_consistency {
                    self.backtrack_with_propagation(assignment, variable_id, word_id)
                } else {
                    self.backtrack(assignment)
                }
            } else {
                Ok(false)
            };

            match outcome {
                Ok(true) => return Ok(true),
                Ok(false) => {
                    assignment.unassign(variable_id);
                    self.statistics.backtracks += 1;
                }
                Err(failure) => {
                    assignment.unassign(variable_id);
                    return Err(failure);
                }
            }
        }

        Ok(false)
    }

    /// Propagate a tentative assignment through the unassigned neighbors before recursing. The
    /// domains are restored unless the recursion succeeds.
    fn backtrack_with_propagation(
        &mut self,
        assignment: &mut Assignment,
        variable_id: VariableId,
        word_id: WordId,
    ) -> Result<bool, SolveFailure> {
        let snapshot = self.domains.clone();
        self.domains.restrict_to(variable_id, word_id);

        let arcs: Vec<Arc> = self
            .puzzle
            .neighbors(variable_id)
            .iter()
            .filter(|&&neighbor_id| !assignment.is_assigned(neighbor_id))
            .map(|&neighbor_id| (neighbor_id, variable_id))
            .collect();

        let outcome = match self.ac3(Some(arcs.as_slice())) {
            Ok(_) => self.backtrack(assignment),
            Err(_) => Ok(false),
        };

        if !matches!(outcome, Ok(true)) {
            self.domains = snapshot;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use instant::Duration;

    use super::{Solver, SolverConfig};
    use crate::consistency::is_consistent;
    use crate::errors::SolveFailure;
    use crate::puzzle::{Direction, Puzzle, Variable};
    use crate::word_list::WordList;

    fn corner_puzzle(words: &[&str]) -> Puzzle {
        Puzzle::new(
            3,
            3,
            vec![Variable::new(0, 0, Direction::Across, 3), Variable::new(0, 2, Direction::Down, 3)],
            WordList::new(words),
        )
        .expect("valid puzzle")
    }

    #[test]
    fn test_zero_variables_is_trivially_solved() {
        let puzzle = Puzzle::from_template("#_#\n", WordList::new(["cat"])).expect("valid template");

        let solution = Solver::new(&puzzle).solve().expect("empty puzzle is solved");

        assert!(solution.assignment.is_empty());
        assert!(solution.assignment.is_complete());
        assert_eq!(solution.statistics.states, 1);
    }

    #[test]
    fn test_single_valid_pairing() {
        let puzzle = corner_puzzle(&["cat", "dog", "tin", "ape"]);

        let solution = Solver::new(&puzzle).solve().expect("one fill exists");

        let across = Variable::new(0, 0, Direction::Across, 3);
        let down = Variable::new(0, 2, Direction::Down, 3);
        assert_eq!(solution.assignment.get(&puzzle, &across), Some("CAT"));
        assert_eq!(solution.assignment.get(&puzzle, &down), Some("TIN"));
    }

    #[test]
    fn test_statistics_come_back_with_the_solution() {
        // AC-3 leaves one candidate per slot, so search walks straight down.
        let puzzle = corner_puzzle(&["cat", "dog", "tin", "ape"]);

        let statistics = Solver::new(&puzzle).solve().expect("one fill exists").statistics;

        assert_eq!(statistics.states, 3);
        assert_eq!(statistics.consistency_checks, 2);
        assert_eq!(statistics.backtracks, 0);
    }

    #[test]
    fn test_no_valid_pairing_fails_before_search() {
        let puzzle = corner_puzzle(&["cat", "dog"]);

        let failure = Solver::new(&puzzle).solve().expect_err("no fill exists");

        assert_eq!(
            failure,
            SolveFailure::UnsatisfiableDomain { variable: Variable::new(0, 0, Direction::Across, 3) }
        );
        assert!(failure.is_definitive());
    }

    #[test]
    fn test_length_mismatch_fails_before_search() {
        let puzzle = corner_puzzle(&["cats", "dogs"]);

        let failure = Solver::new(&puzzle).solve().expect_err("no word fits");

        assert!(matches!(failure, SolveFailure::UnsatisfiableDomain { .. }));
    }

    #[test]
    fn test_distinct_words_exhaust_search() {
        // Arc consistent, but the only way to fill both slots is with the same palindrome.
        let puzzle = corner_puzzle(&["tot"]);

        let failure = Solver::new(&puzzle).solve().expect_err("word can't be reused");

        assert_eq!(failure, SolveFailure::SearchExhausted);
    }

    #[test]
    fn test_step_limit() {
        let puzzle = corner_puzzle(&["cat", "tin"]);
        let config = SolverConfig { max_states: Some(1), ..SolverConfig::default() };

        let failure = Solver::with_config(&puzzle, config).solve().expect_err("budget too small");

        assert_eq!(failure, SolveFailure::StepLimitReached { states: 1 });
        assert!(!failure.is_definitive());
    }

    #[test]
    fn test_zero_deadline_times_out() {
        let puzzle = corner_puzzle(&["cat", "tin"]);
        let config = SolverConfig { deadline: Some(Duration::ZERO), ..SolverConfig::default() };

        let failure = Solver::with_config(&puzzle, config).solve().expect_err("no time to search");

        assert!(matches!(failure, SolveFailure::TimedOut { .. }));
    }

    #[test]
    fn test_propagation_finds_same_fill() {
        let words = ["cat", "dog", "tin", "gnu", "ape", "toe", "nap"];
        let puzzle = Puzzle::from_template("___\n_#_\n___\n", WordList::new(words)).expect("valid template");

        let plain = Solver::new(&puzzle).solve();
        let config = SolverConfig { maintain_arc_consistency: true, ..SolverConfig::default() };
        let propagated = Solver::with_config(&puzzle, config).solve();

        match (plain, propagated) {
            (Ok(plain), Ok(propagated)) => {
                assert!(is_consistent(&puzzle, &plain.assignment));
                assert!(is_consistent(&puzzle, &propagated.assignment));
                assert!(plain.assignment.is_complete());
                assert!(propagated.assignment.is_complete());
            }
            (Err(plain), Err(propagated)) => {
                assert!(plain.is_definitive());
                assert!(propagated.is_definitive());
            }
            (plain, propagated) => panic!("solvers disagree: {:?} vs {:?}", plain, propagated),
        }
    }

    #[test]
    fn test_revise_and_ac3_through_solver() {
        let puzzle = corner_puzzle(&["cat", "dog", "tin", "ape"]);
        let mut solver = Solver::new(&puzzle);

        solver.enforce_node_consistency();
        assert!(solver.revise(0, 1));
        assert_eq!(solver.domains().size(0), 1);
        assert!(solver.ac3(None).is_ok());
        assert_eq!(solver.domains().size(1), 1);
    }
}
