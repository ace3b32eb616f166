use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// Player marker on an unrevealed cell. Flagged and questioned share one slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    None,
    Flagged,
    Questioned,
}

impl Default for Mark {
    fn default() -> Self {
        Self::None
    }
}

/// One grid square as stored by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    mine: bool,
    revealed: bool,
    mark: Mark,
    adjacent_mines: u8,
}

impl Cell {
    pub(crate) const fn new(row: Coord, col: Coord) -> Self {
        Self {
            row,
            col,
            mine: false,
            revealed: false,
            mark: Mark::None,
            adjacent_mines: 0,
        }
    }

    pub const fn row(self) -> Coord {
        self.row
    }

    pub const fn col(self) -> Coord {
        self.col
    }

    pub const fn coords(self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn is_mine(self) -> bool {
        self.mine
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn mark(self) -> Mark {
        self.mark
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.mark, Mark::Flagged)
    }

    pub const fn is_questioned(self) -> bool {
        matches!(self.mark, Mark::Questioned)
    }

    /// Mines among the clipped 8-neighbourhood, always 0 for mine cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn set_mine(&mut self, mine: bool, adjacent_mines: u8) {
        self.mine = mine;
        self.adjacent_mines = if mine { 0 } else { adjacent_mines };
    }

    pub(crate) fn set_revealed(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }
}

/// Collaborator-side display policy for finished games.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// After a loss, show flagged mines as mines instead of keeping the flag.
    pub show_flagged_mines: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_flagged_mines: false,
        }
    }
}

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Hidden,
    Flagged,
    Questioned,
    Open(u8),
    Mine,
    Exploded,
    IncorrectFlag,
}

impl Tile {
    // whether the tile is visually closed
    pub const fn is_closed(self) -> bool {
        use Tile::*;
        match self {
            Hidden => true,
            Flagged => true,
            Questioned => true,
            Open(_) => false,
            Mine => false,
            Exploded => false,
            IncorrectFlag => true,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::Hidden
    }
}
