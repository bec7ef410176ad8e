use thiserror::Error;

use crate::{pos, Pos};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimensions must be at least 1x1")]
    ZeroDimension,
    #[error("could not allocate cell storage")]
    Allocation,
    #[error("got {actual} cells, board holds {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    alive: bool,
}

impl Cell {
    pub fn alive() -> Self {
        Self { alive: true }
    }

    pub fn dead() -> Self {
        Self { alive: false }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A bounded life board backed by one row-major cell buffer.
///
/// The buffer always holds exactly `width * height` cells and the dimensions
/// never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board of dead cells.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension);
        }
        let len = width.checked_mul(height).ok_or(BoardError::Allocation)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| BoardError::Allocation)?;
        cells.resize(len, Cell::dead());
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat index of a position, `x + y * width`. Pure arithmetic, no bounds
    /// check; callers keep positions inside the board, see [`Self::contains`].
    pub fn index_of(&self, pos: Pos) -> usize {
        pos.x as usize + pos.y as usize * self.width
    }

    /// Inverse of [`Self::index_of`] for indices below `width * height`.
    pub fn pos_of(&self, index: usize) -> Pos {
        let y = index / self.width;
        let x = index - y * self.width;
        pos!(x as i32, y as i32)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (0..self.width as i32).contains(&pos.x) && (0..self.height as i32).contains(&pos.y)
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.index_of(pos)]
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let index = self.index_of(pos);
        self.cells[index] = cell;
    }

    /// Positions of the up to eight cells bordering `pos`, row by row from
    /// the top left. Offsets falling outside the board are skipped, so a
    /// corner has three neighbors and an edge cell five; the board has hard
    /// edges, no wraparound.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        (-1..=1)
            .map(|dy| (-1..=1).map(move |dx| pos!(dx, dy)))
            .flatten()
            .filter(|offset| *offset != pos!(0, 0))
            .map(move |offset| pos + offset)
            .filter(move |neighbor| self.contains(*neighbor))
    }

    pub fn alive_neighbors(&self, pos: Pos) -> usize {
        self.neighbors(pos)
            .filter(|neighbor| self.get(*neighbor).is_alive())
            .count()
    }

    /// Advances the whole board one generation.
    ///
    /// Neighbor counts for every cell are gathered into a scratch buffer
    /// before any cell changes, so each new value derives from the previous
    /// generation only.
    pub fn advance(&mut self) -> Result<(), BoardError> {
        let mut counts = Vec::new();
        counts
            .try_reserve_exact(self.cells.len())
            .map_err(|_| BoardError::Allocation)?;
        counts.extend((0..self.cells.len()).map(|index| self.alive_neighbors(self.pos_of(index))));

        for (cell, count) in self.cells.iter_mut().zip(counts) {
            *cell = match (cell.is_alive(), count) {
                (true, count) if count < 2 || count > 3 => Cell::dead(), // under/overpopulation
                (true, _) => Cell::alive(),                              // survives
                (false, 3) => Cell::alive(),                             // birth
                _ => Cell::dead(),                                       // stays dead
            };
        }
        Ok(())
    }

    /// The whole board, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Replaces every cell at once. The slice length must match the board,
    /// otherwise the board is left unchanged.
    pub fn write_all(&mut self, cells: &[Cell]) -> Result<(), BoardError> {
        if cells.len() != self.cells.len() {
            return Err(BoardError::ShapeMismatch {
                expected: self.cells.len(),
                actual: cells.len(),
            });
        }
        self.cells.copy_from_slice(cells);
        Ok(())
    }
}

#[cfg(test)]
fn board_with(width: usize, height: usize, alive: &[Pos]) -> Board {
    let mut board = Board::new(width, height).unwrap();
    for pos in alive {
        board.set(*pos, Cell::alive());
    }
    board
}

#[cfg(test)]
fn alive_positions(board: &Board) -> Vec<Pos> {
    (0..board.cells().len())
        .filter(|index| board.cells()[*index].is_alive())
        .map(|index| board.pos_of(index))
        .collect()
}

#[test]
fn test_rejects_zero_dimension() {
    assert_eq!(Board::new(0, 3).unwrap_err(), BoardError::ZeroDimension);
    assert_eq!(Board::new(3, 0).unwrap_err(), BoardError::ZeroDimension);
}

#[test]
fn test_index_round_trip() {
    let board = Board::new(4, 3).unwrap();
    for y in 0..3 {
        for x in 0..4 {
            let pos = pos!(x, y);
            assert_eq!(board.pos_of(board.index_of(pos)), pos);
        }
    }
    assert_eq!(board.index_of(pos!(3, 2)), 11);
}

#[test]
fn test_neighbor_clipping() {
    let board = Board::new(5, 5).unwrap();
    assert_eq!(board.neighbors(pos!(0, 0)).count(), 3);
    assert_eq!(board.neighbors(pos!(2, 0)).count(), 5);
    assert_eq!(board.neighbors(pos!(2, 2)).count(), 8);

    let single = Board::new(1, 1).unwrap();
    assert_eq!(single.neighbors(pos!(0, 0)).count(), 0);
}

#[test]
fn test_neighbor_order() {
    let board = Board::new(3, 3).unwrap();
    let neighbors: Vec<_> = board.neighbors(pos!(1, 1)).collect();
    assert_eq!(
        neighbors,
        [
            pos!(0, 0),
            pos!(1, 0),
            pos!(2, 0),
            pos!(0, 1),
            pos!(2, 1),
            pos!(0, 2),
            pos!(1, 2),
            pos!(2, 2),
        ]
    );
}

#[test]
fn test_neighbors_of_dead_board() {
    let board = Board::new(3, 3).unwrap();
    let neighbors: Vec<_> = board.neighbors(pos!(1, 1)).collect();
    assert_eq!(neighbors.len(), 8);
    assert!(neighbors.iter().all(|pos| !board.get(*pos).is_alive()));
    assert_eq!(board.alive_neighbors(pos!(1, 1)), 0);
}

#[test]
fn test_isolated_cell_dies() {
    let mut board = board_with(3, 3, &[pos!(1, 1)]);
    board.advance().unwrap();
    assert!(alive_positions(&board).is_empty());
}

#[test]
fn test_survives_with_two_or_three() {
    // a row of three, the middle cell has two alive neighbors
    let mut board = board_with(3, 3, &[pos!(0, 0), pos!(1, 0), pos!(2, 0)]);
    board.advance().unwrap();
    assert!(board.get(pos!(1, 0)).is_alive());
    assert!(!board.get(pos!(0, 0)).is_alive()); // only one neighbor, starves

    // the center of a square has three alive neighbors
    let mut board = board_with(3, 3, &[pos!(0, 0), pos!(1, 0), pos!(0, 1), pos!(1, 1)]);
    board.advance().unwrap();
    assert!(board.get(pos!(1, 1)).is_alive());
}

#[test]
fn test_dies_with_four() {
    let mut board = board_with(
        3,
        3,
        &[pos!(1, 1), pos!(0, 0), pos!(2, 0), pos!(0, 2), pos!(2, 2)],
    );
    board.advance().unwrap();
    assert!(!board.get(pos!(1, 1)).is_alive());
}

#[test]
fn test_birth_on_exactly_three() {
    let mut board = board_with(3, 3, &[pos!(0, 0), pos!(1, 0), pos!(2, 0)]);
    assert_eq!(board.alive_neighbors(pos!(1, 1)), 3);
    board.advance().unwrap();
    assert!(board.get(pos!(1, 1)).is_alive());

    let mut board = board_with(3, 3, &[pos!(0, 0), pos!(2, 0)]);
    board.advance().unwrap();
    assert!(!board.get(pos!(1, 1)).is_alive());
}

#[test]
fn test_blinker_oscillates() {
    let horizontal = [pos!(1, 2), pos!(2, 2), pos!(3, 2)];
    let vertical = [pos!(2, 1), pos!(2, 2), pos!(2, 3)];
    let mut board = board_with(5, 5, &horizontal);

    board.advance().unwrap();
    assert_eq!(alive_positions(&board), vertical);

    board.advance().unwrap();
    assert_eq!(alive_positions(&board), horizontal);
}

#[test]
fn test_write_all_round_trip() {
    let mut board = board_with(4, 4, &[pos!(1, 1), pos!(2, 3)]);
    let before = board.clone();
    let cells = board.cells().to_vec();
    board.write_all(&cells).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_write_all_shape_mismatch() {
    let mut board = board_with(2, 2, &[pos!(0, 0)]);
    let before = board.clone();
    let err = board.write_all(&[Cell::alive(); 3]).unwrap_err();
    assert_eq!(
        err,
        BoardError::ShapeMismatch {
            expected: 4,
            actual: 3
        }
    );
    assert_eq!(board, before);
}
