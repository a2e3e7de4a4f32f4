//! Error types for building puzzles, loading word lists, and solving.

use std::io;
use std::path::PathBuf;

use instant::Duration;

use crate::puzzle::Variable;

/// Problems with the grid geometry supplied to [`crate::Puzzle`].
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("structure template has no rows")]
    EmptyTemplate,

    #[error("structure row {row} has width {found}, expected {expected}")]
    RaggedTemplate {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized cell {cell:?} at row {row}, column {column}")]
    InvalidCell { cell: char, row: usize, column: usize },

    #[error("{variable} does not fit in a {height}x{width} grid")]
    VariableOutOfBounds {
        variable: Variable,
        height: usize,
        width: usize,
    },

    #[error("{0} appears more than once")]
    DuplicateVariable(Variable),

    #[error("{first} and {second} share more than one cell")]
    MultipleOverlap { first: Variable, second: Variable },
}

/// Problems reading a word list.
#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("failed to read word list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("non-numeric score {score:?} on line {line}")]
    InvalidScore { line: usize, score: String },
}

/// The ways a call to [`crate::Solver::solve`] can end without a complete assignment.
///
/// `SearchExhausted` is the ordinary "no solution" answer, not a malfunction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveFailure {
    /// Node or arc consistency emptied this variable's domain before search started.
    #[error("no candidate words remain for {variable}")]
    UnsatisfiableDomain { variable: Variable },

    #[error("search exhausted every candidate without finding a fill")]
    SearchExhausted,

    #[error("search timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },

    #[error("search stopped after visiting {states} states")]
    StepLimitReached { states: u64 },
}

impl SolveFailure {
    /// True for failures that prove the puzzle has no fill, as opposed to giving up early.
    pub fn is_definitive(&self) -> bool {
        matches!(
            self,
            SolveFailure::UnsatisfiableDomain { .. } | SolveFailure::SearchExhausted
        )
    }
}
