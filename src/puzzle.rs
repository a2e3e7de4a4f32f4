//! The puzzle model: grid geometry, slot variables, overlaps, and the word list.

use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Display, Formatter};

use smallvec::SmallVec;

use crate::consistency::Assignment;
use crate::errors::PuzzleError;
use crate::word_list::{Word, WordList};
use crate::{VariableId, WordId, MAX_SLOT_LENGTH};

/// Zero-indexed row and column for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// A slot in the grid. Two variables are equal when all four fields are equal, so independently
/// constructed values can be used to look each other up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub row: usize,
    pub column: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, column: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, column, direction, length }
    }

    /// Generate the coords for each cell of this variable.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |cell_idx| match self.direction {
            Direction::Across => (self.row, self.column + cell_idx),
            Direction::Down => (self.row + cell_idx, self.column),
        })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        write!(f, "({}, {}) {} : {}", self.row, self.column, direction, self.length)
    }
}

/// The cell shared by two variables: `cell` is the character index within the first variable's
/// word and `other_cell` the index within the second's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub cell: usize,
    pub other_cell: usize,
}

impl Overlap {
    fn reversed(self) -> Overlap {
        Overlap { cell: self.other_cell, other_cell: self.cell }
    }
}

/// A struct representing the aspects of a puzzle that are static during solving.
pub struct Puzzle {
    height: usize,
    width: usize,
    fillable: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    ids_by_variable: HashMap<Variable, VariableId>,
    overlaps: HashMap<(VariableId, VariableId), Overlap>,
    neighbors: Vec<SmallVec<[VariableId; MAX_SLOT_LENGTH]>>,
    words: WordList,
}

impl Debug for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puzzle")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("words", &self.words)
            .finish()
    }
}

impl Puzzle {
    /// Build a puzzle from explicit variables. Every cell covered by a variable is fillable.
    pub fn new(
        height: usize,
        width: usize,
        variables: Vec<Variable>,
        words: WordList,
    ) -> Result<Puzzle, PuzzleError> {
        let mut fillable = vec![vec![false; width]; height];

        for variable in &variables {
            let fits = variable.cells().all(|(row, column)| row < height && column < width);
            if !fits {
                return Err(PuzzleError::VariableOutOfBounds {
                    variable: variable.clone(),
                    height,
                    width,
                });
            }
            for (row, column) in variable.cells() {
                fillable[row][column] = true;
            }
        }

        Puzzle::build(height, width, fillable, variables, words)
    }

    /// Generate a puzzle from a structure template, with `_` or `.` representing fillable cells
    /// and `#` or `█` representing blocks.
    pub fn from_template(template: &str, words: WordList) -> Result<Puzzle, PuzzleError> {
        let rows: Vec<Vec<char>> = template
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let width = rows.first().map(Vec::len).ok_or(PuzzleError::EmptyTemplate)?;
        let height = rows.len();

        let mut fillable = Vec::with_capacity(height);
        for (row, line) in rows.iter().enumerate() {
            if line.len() != width {
                return Err(PuzzleError::RaggedTemplate { row, expected: width, found: line.len() });
            }
            let cells = line
                .iter()
                .enumerate()
                .map(|(column, &cell)| match cell {
                    '_' | '.' => Ok(true),
                    '#' | '█' => Ok(false),
                    _ => Err(PuzzleError::InvalidCell { cell, row, column }),
                })
                .collect::<Result<Vec<bool>, PuzzleError>>()?;
            fillable.push(cells);
        }

        // Scan in row-major order, across before down at the same cell. This fixes the variable
        // enumeration order.
        let is_open = |row: usize, column: usize| -> bool {
            row < height && column < width && fillable[row][column]
        };
        let run_length = |row: usize, column: usize, direction: Direction| -> usize {
            let mut length = 0;
            loop {
                let open = match direction {
                    Direction::Across => is_open(row, column + length),
                    Direction::Down => is_open(row + length, column),
                };
                if !open {
                    return length;
                }
                length += 1;
            }
        };

        let mut variables = vec![];
        for row in 0..height {
            for column in 0..width {
                if !fillable[row][column] {
                    continue;
                }
                if column == 0 || !fillable[row][column - 1] {
                    let length = run_length(row, column, Direction::Across);
                    if length > 1 {
                        variables.push(Variable::new(row, column, Direction::Across, length));
                    }
                }
                if row == 0 || !fillable[row - 1][column] {
                    let length = run_length(row, column, Direction::Down);
                    if length > 1 {
                        variables.push(Variable::new(row, column, Direction::Down, length));
                    }
                }
            }
        }

        Puzzle::build(height, width, fillable, variables, words)
    }

    fn build(
        height: usize,
        width: usize,
        fillable: Vec<Vec<bool>>,
        variables: Vec<Variable>,
        words: WordList,
    ) -> Result<Puzzle, PuzzleError> {
        let mut ids_by_variable: HashMap<Variable, VariableId> = HashMap::with_capacity(variables.len());
        for (variable_id, variable) in variables.iter().enumerate() {
            if ids_by_variable.insert(variable.clone(), variable_id).is_some() {
                return Err(PuzzleError::DuplicateVariable(variable.clone()));
            }
        }

        // Build a map from cell location to the variables covering it, which we can then use to
        // calculate overlaps.
        let mut cells_by_loc: HashMap<GridCoord, Vec<(VariableId, usize)>> = HashMap::new();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cells().enumerate() {
                cells_by_loc.entry(loc).or_default().push((variable_id, cell_idx));
            }
        }

        let mut overlaps: HashMap<(VariableId, VariableId), Overlap> = HashMap::new();
        let mut seen_pairs: HashSet<(VariableId, VariableId)> = HashSet::new();
        let mut locs: Vec<&GridCoord> = cells_by_loc.keys().collect();
        locs.sort();

        for loc in locs {
            let covering = &cells_by_loc[loc];
            for (a, &(first_id, first_cell)) in covering.iter().enumerate() {
                for &(second_id, second_cell) in &covering[a + 1..] {
                    let (x, y, overlap) = if first_id < second_id {
                        (first_id, second_id, Overlap { cell: first_cell, other_cell: second_cell })
                    } else {
                        (second_id, first_id, Overlap { cell: second_cell, other_cell: first_cell })
                    };
                    if !seen_pairs.insert((x, y)) {
                        return Err(PuzzleError::MultipleOverlap {
                            first: variables[x].clone(),
                            second: variables[y].clone(),
                        });
                    }
                    overlaps.insert((x, y), overlap);
                    overlaps.insert((y, x), overlap.reversed());
                }
            }
        }

        let neighbors = (0..variables.len())
            .map(|variable_id| {
                (0..variables.len())
                    .filter(|&other_id| overlaps.contains_key(&(variable_id, other_id)))
                    .collect()
            })
            .collect();

        log::debug!(
            "Built {}x{} puzzle with {} variables and {} overlaps",
            height,
            width,
            variables.len(),
            overlaps.len() / 2
        );

        Ok(Puzzle {
            height,
            width,
            fillable,
            variables,
            ids_by_variable,
            overlaps,
            neighbors,
            words,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_fillable(&self, row: usize, column: usize) -> bool {
        self.fillable.get(row).and_then(|cells| cells.get(column)).copied().unwrap_or(false)
    }

    /// All variables, in enumeration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.ids_by_variable.get(variable).copied()
    }

    /// The overlap between `x` and `y`, oriented so that `cell` indexes into `x`.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// Like [`Puzzle::overlap`], keyed by the variables themselves.
    pub fn overlap_between(&self, x: &Variable, y: &Variable) -> Option<Overlap> {
        self.overlap(self.variable_id(x)?, self.variable_id(y)?)
    }

    /// Variables sharing a cell with `variable_id`, in enumeration order.
    pub fn neighbors(&self, variable_id: VariableId) -> &[VariableId] {
        &self.neighbors[variable_id]
    }

    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.neighbors[variable_id].len()
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        self.words.get(word_id)
    }

    /// Turn an assignment into a rendered letter grid. Blocks print as `█`; fillable cells with no
    /// assigned letter print as a space.
    pub fn render(&self, assignment: &Assignment) -> String {
        let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; self.width]; self.height];

        for (variable_id, word_id) in assignment.iter() {
            let word = self.word(word_id);
            for ((row, column), &glyph) in self.variables[variable_id].cells().zip(&word.glyphs) {
                letters[row][column] = Some(glyph);
            }
        }

        letters
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(column, letter)| {
                        if self.fillable[row][column] {
                            letter.unwrap_or(' ')
                        } else {
                            '█'
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
