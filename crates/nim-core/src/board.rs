//! The 28-cell Nim board.
//!
//! Layout is row-major, seven cells per row:
//!
//! ```text
//! row 1: cells  0..7    heap of 1
//! row 2: cells  7..14   heap of 3
//! row 3: cells 14..21   heap of 5
//! row 4: cells 21..28   heap of 7
//! ```
//!
//! Within a row the occupied cells always form a left-aligned prefix:
//! a move removes a cell and everything to its right, so a heap can only
//! shrink and never develops a gap.

use std::fmt;

use crate::error::{BoardError, MoveError};
use crate::moves::Move;

/// Number of heaps (rows).
pub const ROWS: usize = 4;

/// Cells per row.
pub const COLS: usize = 7;

/// Total number of cells on the board.
pub const BOARD_CELLS: usize = ROWS * COLS;

/// Starting heap sizes, top row first.
pub const HEAP_SIZES: [usize; ROWS] = [1, 3, 5, 7];

/// State of a single board cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell {
    Occupied,
    Removed,
}

impl Cell {
    /// Wire marker for this cell (`'O'` / `'X'`).
    pub fn as_byte(self) -> u8 {
        match self {
            Cell::Occupied => b'O',
            Cell::Removed => b'X',
        }
    }

    /// Parse a wire marker.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'O' => Some(Cell::Occupied),
            b'X' => Some(Cell::Removed),
            _ => None,
        }
    }
}

/// A Misère Nim board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// The canonical starting board: heaps of 1, 3, 5 and 7.
    pub fn new() -> Self {
        Board::filled(HEAP_SIZES)
    }

    /// Build a board with the given number of stones left in each heap.
    ///
    /// Fails if a heap is larger than its starting size.
    pub fn from_heaps(heaps: [usize; ROWS]) -> Result<Self, BoardError> {
        for (r, &size) in heaps.iter().enumerate() {
            if size > HEAP_SIZES[r] {
                return Err(BoardError::OutsideHeap {
                    row: r as u8 + 1,
                    col: HEAP_SIZES[r] as u8 + 1,
                });
            }
        }
        Ok(Board::filled(heaps))
    }

    /// Heaps must already be known to fit their rows.
    fn filled(heaps: [usize; ROWS]) -> Self {
        let mut cells = [Cell::Removed; BOARD_CELLS];
        for (r, &size) in heaps.iter().enumerate() {
            for cell in &mut cells[r * COLS..r * COLS + size] {
                *cell = Cell::Occupied;
            }
        }
        Board { cells }
    }

    /// Build a board from a raw cell array, checking it is reachable.
    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Result<Self, BoardError> {
        for r in 0..ROWS {
            let row = &cells[r * COLS..(r + 1) * COLS];
            let mut seen_removed = false;
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Occupied if c >= HEAP_SIZES[r] => {
                        return Err(BoardError::OutsideHeap {
                            row: r as u8 + 1,
                            col: c as u8 + 1,
                        });
                    }
                    Cell::Occupied if seen_removed => {
                        return Err(BoardError::Gap { row: r as u8 + 1 });
                    }
                    Cell::Occupied => {}
                    Cell::Removed => seen_removed = true,
                }
            }
        }
        Ok(Board { cells })
    }

    /// Raw cell array, row-major.
    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    /// Cell at a 1-based `(row, col)`, or `None` if off the board.
    pub fn cell(&self, row: u8, col: u8) -> Option<Cell> {
        cell_index(row, col).map(|i| self.cells[i])
    }

    /// Stones left in a 1-based row.
    pub fn heap(&self, row: u8) -> usize {
        if row == 0 || row as usize > ROWS {
            return 0;
        }
        let start = (row as usize - 1) * COLS;
        self.cells[start..start + COLS]
            .iter()
            .take_while(|c| **c == Cell::Occupied)
            .count()
    }

    /// Stones left in every heap, top row first.
    pub fn heaps(&self) -> [usize; ROWS] {
        [self.heap(1), self.heap(2), self.heap(3), self.heap(4)]
    }

    /// Total stones left.
    pub fn stones(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Occupied).count()
    }

    /// True once every stone has been taken.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| *c == Cell::Removed)
    }

    /// Check a move against this board without applying it.
    ///
    /// Resignation is always acceptable.
    pub fn validate(&self, mv: Move) -> Result<(), MoveError> {
        let (row, col) = match mv {
            Move::Resign => return Ok(()),
            Move::Take { row, col } => (row, col),
        };
        if row < 1 || row as usize > ROWS {
            return Err(MoveError::RowOutOfRange(row));
        }
        if col < 1 || col as usize > COLS {
            return Err(MoveError::ColumnOutOfRange(col));
        }
        match self.cell(row, col) {
            Some(Cell::Occupied) => Ok(()),
            _ => Err(MoveError::CellRemoved { row, col }),
        }
    }

    /// Validate and apply a move.
    ///
    /// Taking `(row, col)` removes every cell from `col` to the end of the
    /// row, leaving `col - 1` stones in that heap. Resignation leaves the
    /// board untouched.
    pub fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        self.validate(mv)?;
        if let Move::Take { row, col } = mv {
            let start = (row as usize - 1) * COLS + col as usize - 1;
            let end = row as usize * COLS;
            for cell in &mut self.cells[start..end] {
                *cell = Cell::Removed;
            }
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// Plain-text rendering used by the terminal client and in logs.
///
/// ```text
/// row
/// 1| O
/// 2| O O O
/// 3| O O O O O
/// 4| O O O O O O O
///  +-----------------
///    1 2 3 4 5 6 7 col
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "row")?;
        for r in 0..ROWS {
            write!(f, "{}|", r + 1)?;
            for cell in &self.cells[r * COLS..(r + 1) * COLS] {
                match cell {
                    Cell::Occupied => write!(f, " O")?,
                    Cell::Removed => write!(f, "  ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, " +-----------------")?;
        write!(f, "   1 2 3 4 5 6 7 col")
    }
}

/// Zero-based cell index for a 1-based `(row, col)`.
pub fn cell_index(row: u8, col: u8) -> Option<usize> {
    if row < 1 || row as usize > ROWS || col < 1 || col as usize > COLS {
        return None;
    }
    Some((row as usize - 1) * COLS + col as usize - 1)
}
