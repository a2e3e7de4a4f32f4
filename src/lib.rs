//! Fill crossword-style grids by treating each slot as a variable in a constraint satisfaction
//! problem: words must fit their slot's length, crossing slots must agree on shared letters, and
//! no word may appear twice.
//!
//! ```
//! use crossfill::{Puzzle, Solver, WordList};
//!
//! let words = WordList::new(["cat", "tin", "dog"]);
//! let puzzle = Puzzle::from_template("___\n##_\n##_\n", words).unwrap();
//!
//! let solution = Solver::new(&puzzle).solve().unwrap();
//! assert_eq!(puzzle.render(&solution.assignment), "CAT\n██I\n██N");
//! ```

pub mod arc_consistency;
pub mod backtracking_search;
pub mod consistency;
pub mod domain;
pub mod errors;
pub mod heuristics;
pub mod log;
pub mod puzzle;
pub mod word_list;

pub use backtracking_search::{Solution, Solver, SolverConfig, Statistics};
pub use consistency::Assignment;
pub use errors::{PuzzleError, SolveFailure, WordListError};
pub use puzzle::{Direction, Overlap, Puzzle, Variable};
pub use word_list::{Word, WordList};

/// Should we run extra checks to validate that we're never in an invalid state during search? This
/// can be enabled with `--features check_invariants` when debugging or making risky algorithm
/// changes.
pub const CHECK_INVARIANTS: bool = cfg!(feature = "check_invariants");

/// The expected maximum number of slots appearing in a grid.
pub const MAX_SLOT_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given variable, based on its index in the puzzle's enumeration order.
pub type VariableId = usize;

/// An identifier for a given word, based on its index in the word list.
pub type WordId = usize;
