use crate::error::Error;
use crate::level::GameLevel;
use bit_set::BitSet;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::VecDeque;

pub(crate) type Coordinate = (usize, usize);

/// What a cell holds, assigned once at first-click initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Content {
    Mine,
    Empty(u8),
}

/// How a cell presents itself. Covered and Flagged toggle into each other;
/// Revealed is one-way, and only reachable from Covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellState {
    Covered,
    Flagged,
    Revealed,
}

#[derive(Debug)]
pub(crate) struct Cell {
    adjacent_cells: BitSet,
    pub(crate) content: Content,
    pub(crate) state: CellState,
}

/// Result of a mutating move, polled by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Continue,
    Win,
    Lose,
}

/// The two flavors of clicking an already-revealed numbered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChordIntent {
    Open,
    Flag,
}

/// Message state, derived from the board rather than stored on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Start,
    Count { mines: usize, flagged: usize },
    Win,
    Lose,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Increment {
    One,
    NegOne,
    Zero,
}

impl Increment {
    fn offset(&self, value: usize) -> usize {
        match *self {
            Self::One => value + 1,
            Self::NegOne => value.saturating_sub(1),
            Self::Zero => value,
        }
    }
}

fn adjacent((row, column): Coordinate, rows: usize, columns: usize) -> impl Iterator<Item = usize> {
    const INCREMENTS: [Increment; 3] = [Increment::One, Increment::NegOne, Increment::Zero];

    INCREMENTS
        .iter()
        .copied()
        .flat_map(|row_incr| std::iter::repeat(row_incr).zip(INCREMENTS))
        .filter_map(move |(row_incr, column_incr)| {
            let row_offset = row_incr.offset(row);
            let column_offset = column_incr.offset(column);

            // saturating_sub pins edge cells to themselves
            if row_offset == row && column_offset == column {
                return None;
            }

            match (row_incr, column_incr) {
                (Increment::Zero, Increment::Zero) => None,
                (_, _) if row_offset < rows && column_offset < columns => {
                    Some(index_from_coord((row_offset, column_offset), columns))
                }
                _ => None,
            }
        })
}

fn index_from_coord((r, c): Coordinate, columns: usize) -> usize {
    r * columns + c
}

pub(crate) struct Board {
    cells: Vec<Cell>,
    // number of rows on the board
    pub(crate) rows: usize,
    // number of columns on the board
    pub(crate) columns: usize,
    // the total number of mines
    mines: usize,
    flagged_cells: usize,
    // whether mines have been placed, which happens on the first reveal
    initialized: bool,
    game_over: bool,
    // the revealed mine that ended the game, kept for highlighting
    hit_mine: Option<usize>,
    rng: StdRng,
}

impl Board {
    /// An empty board: every cell covered, no mines placed yet. Placement is
    /// deferred to the first reveal so that the first click is never a mine.
    pub(crate) fn new(level: &GameLevel, seed: Option<u64>) -> Self {
        let GameLevel {
            rows,
            columns,
            mines,
            ..
        } = *level;

        let cells = (0..rows)
            .flat_map(|row| std::iter::repeat(row).zip(0..columns))
            .map(|point| Cell {
                adjacent_cells: adjacent(point, rows, columns).collect::<BitSet>(),
                content: Content::Empty(0),
                state: CellState::Covered,
            })
            .collect::<Vec<_>>();

        Self {
            cells,
            rows,
            columns,
            mines,
            flagged_cells: Default::default(),
            initialized: false,
            game_over: false,
            hit_mine: None,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn index_from_coord(&self, coord: Coordinate) -> usize {
        index_from_coord(coord, self.columns)
    }

    pub(crate) fn game_over(&self) -> bool {
        self.game_over
    }

    pub(crate) fn available_flags(&self) -> usize {
        assert!(self.flagged_cells <= self.mines);
        self.mines - self.flagged_cells
    }

    pub(crate) fn tile(&self, i: usize, j: usize) -> Result<&Cell, Error> {
        // a row-major index alone would let an oversized column wrap into
        // the next row
        if j >= self.columns {
            return Err(Error::GetCell((i, j)));
        }
        self.cells
            .get(self.index_from_coord((i, j)))
            .ok_or(Error::GetCell((i, j)))
    }

    pub(crate) fn is_hit_mine(&self, index: usize) -> bool {
        self.hit_mine == Some(index)
    }

    /// Place `mines` mines uniformly at random on every cell but the one
    /// that was clicked, then give each remaining cell its exact count of
    /// adjacent mines.
    fn place_mines(&mut self, excluding: usize) {
        // sample from a board with the clicked cell removed, then shift the
        // sampled indices at or past it back into place
        let mines = rand::seq::index::sample(&mut self.rng, self.cells.len() - 1, self.mines)
            .into_iter()
            .map(|index| index + usize::from(index >= excluding))
            .collect::<BitSet>();

        for (index, cell) in self.cells.iter_mut().enumerate() {
            if mines.contains(index) {
                cell.content = Content::Mine;
            } else {
                // sum the adjacent cells that landed in the mine set
                let adjacent_mines = cell
                    .adjacent_cells
                    .iter()
                    .fold(0, |total, index| total + u8::from(mines.contains(index)));
                assert!(adjacent_mines <= 8);
                cell.content = Content::Empty(adjacent_mines);
            }
        }

        self.initialized = true;
    }

    /// Reveal a covered cell. Revealing a mine ends the game; revealing a
    /// zero cell cascades through its connected zero region. Anything that
    /// is not a covered cell on a live board is a no-op.
    pub(crate) fn reveal(&mut self, index: usize) -> Outcome {
        if self.game_over
            || index >= self.cells.len()
            || self.cells[index].state != CellState::Covered
        {
            return Outcome::Continue;
        }

        if !self.initialized {
            self.place_mines(index);
        }

        if self.cells[index].content == Content::Mine {
            self.cells[index].state = CellState::Revealed;
            self.hit_mine = Some(index);
            self.reveal_all();
            return Outcome::Lose;
        }

        let mut queue = [index].into_iter().collect::<VecDeque<_>>();

        while let Some(index) = queue.pop_front() {
            let cell = &mut self.cells[index];

            // already-revealed cells stop the cascade, flagged cells stay put
            if cell.state != CellState::Covered {
                continue;
            }

            cell.state = CellState::Revealed;

            if cell.content == Content::Empty(0) {
                queue.extend(cell.adjacent_cells.iter());
            }
        }

        if self.covered_or_flagged() == self.mines {
            self.reveal_all();
            return Outcome::Win;
        }

        Outcome::Continue
    }

    /// Toggle the flag on a covered cell. Flags are capped at the mine
    /// count, a display constraint only: they never enter win detection.
    pub(crate) fn toggle_flag(&mut self, index: usize) {
        if self.game_over || index >= self.cells.len() {
            return;
        }

        match self.cells[index].state {
            CellState::Flagged => {
                self.cells[index].state = CellState::Covered;
                self.flagged_cells -= 1;
            }
            CellState::Covered if self.flagged_cells < self.mines => {
                self.cells[index].state = CellState::Flagged;
                self.flagged_cells += 1;
            }
            _ => {}
        }
    }

    /// Chord on a revealed numbered cell:
    ///
    /// - `Open`: when its flagged neighbors match its number, reveal every
    ///   covered neighbor;
    /// - `Flag`: when its flagged plus covered neighbors match its number,
    ///   flag every covered neighbor.
    ///
    /// Any other combination leaves the board untouched.
    pub(crate) fn chord(&mut self, index: usize, intent: ChordIntent) -> Outcome {
        if self.game_over || index >= self.cells.len() {
            return Outcome::Continue;
        }

        let cell = &self.cells[index];
        let number = match (cell.state, cell.content) {
            (CellState::Revealed, Content::Empty(n)) if n > 0 => usize::from(n),
            _ => return Outcome::Continue,
        };

        let neighbors = cell.adjacent_cells.iter().collect::<Vec<_>>();
        let flagged = neighbors
            .iter()
            .filter(|&&index| self.cells[index].state == CellState::Flagged)
            .count();
        let covered = neighbors
            .iter()
            .filter(|&&index| self.cells[index].state == CellState::Covered)
            .count();

        match intent {
            ChordIntent::Open if flagged == number => {
                let mut outcome = Outcome::Continue;
                for index in neighbors {
                    match self.reveal(index) {
                        Outcome::Lose => return Outcome::Lose,
                        Outcome::Win => outcome = Outcome::Win,
                        Outcome::Continue => {}
                    }
                }
                outcome
            }
            ChordIntent::Flag if flagged + covered == number => {
                for index in neighbors {
                    if self.cells[index].state == CellState::Covered {
                        self.toggle_flag(index);
                    }
                }
                Outcome::Continue
            }
            _ => Outcome::Continue,
        }
    }

    /// Cover the whole board again while keeping the mine layout, so the
    /// same game can be replayed.
    pub(crate) fn restart(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.state = CellState::Covered;
        }
        self.flagged_cells = 0;
        self.hit_mine = None;
        self.game_over = false;
    }

    pub(crate) fn status(&self) -> Status {
        if self.game_over {
            if self.hit_mine.is_some() {
                Status::Lose
            } else {
                Status::Win
            }
        } else if self.flagged_cells == 0 && self.covered_or_flagged() == self.cells.len() {
            // untouched board, fresh or replayed
            Status::Start
        } else {
            Status::Count {
                mines: self.mines,
                flagged: self.flagged_cells,
            }
        }
    }

    fn covered_or_flagged(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.state != CellState::Revealed)
            .count()
    }

    fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.state = CellState::Revealed;
        }
        self.game_over = true;
    }
}
