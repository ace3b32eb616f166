use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Per-cell state needed to rebuild a field; neighbour counts are recomputed on restore.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCell {
    pub mine: bool,
    pub revealed: bool,
    pub mark: Mark,
}

/// Serializable save of a field in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub config: GameConfig,
    pub options: FieldOptions,
    pub seed: u64,
    pub mines_placed: bool,
    pub outcome: GameOutcome,
    pub triggered_mine: Option<Coord2>,
    pub score: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cells: Array2<SavedCell>,
}

impl FieldSnapshot {
    pub fn from_field(field: &Field) -> Self {
        let cells = field.cells.map(|cell| SavedCell {
            mine: cell.is_mine(),
            revealed: cell.is_revealed(),
            mark: cell.mark(),
        });

        Self {
            config: field.config,
            options: field.options,
            seed: field.seed,
            mines_placed: field.mines_placed,
            outcome: field.outcome,
            triggered_mine: field.triggered_mine,
            score: field.score,
            started_at: field.started_at,
            ended_at: field.ended_at,
            cells,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let config = GameConfig::new(self.config.size(), self.config.mines())?;
        let (rows, cols) = config.size();
        if self.cells.dim() != (rows as usize, cols as usize) {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = self.cells.iter().filter(|cell| cell.mine).count() as CellCount;
        let expected_mines = if self.mines_placed { config.mines() } else { 0 };
        if mine_count != expected_mines {
            return Err(GameError::InconsistentSnapshot);
        }

        let revealed_safe = self
            .cells
            .iter()
            .filter(|cell| cell.revealed && !cell.mine)
            .count() as CellCount;
        let revealed_mines = self
            .cells
            .iter()
            .filter(|cell| cell.revealed && cell.mine)
            .count();
        // nothing can be revealed before the first reveal places the mines
        if !self.mines_placed && revealed_safe > 0 {
            return Err(GameError::InconsistentSnapshot);
        }
        // revealing a safe cell clears its mark, and flagged cells are never revealed
        if self
            .cells
            .iter()
            .any(|cell| cell.revealed && !cell.mine && cell.mark != Mark::None)
        {
            return Err(GameError::InconsistentSnapshot);
        }

        let consistent = match self.outcome {
            GameOutcome::Ongoing => revealed_mines == 0 && revealed_safe < config.safe_cells(),
            GameOutcome::Won => revealed_mines == 0 && revealed_safe == config.safe_cells(),
            GameOutcome::Lost => self.triggered_mine.is_some_and(|coords| {
                coords.0 < rows && coords.1 < cols && {
                    let cell = self.cells[coords.to_nd_index()];
                    cell.mine && cell.revealed
                }
            }),
        };
        if !consistent {
            return Err(GameError::InconsistentSnapshot);
        }

        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Field {
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot::from_field(self)
    }

    /// Rebuilds a field from a snapshot, recomputing neighbour counts and counters
    pub fn restore(snapshot: &FieldSnapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut field = Self::with_seed(snapshot.config, snapshot.options, snapshot.seed);
        if snapshot.mines_placed {
            let layout = MineLayout::from_mine_mask(snapshot.cells.map(|cell| cell.mine));
            field.apply_layout(&layout);
        }

        for (cell, saved) in field.cells.iter_mut().zip(snapshot.cells.iter()) {
            cell.set_mark(saved.mark);
            if saved.revealed {
                cell.set_revealed();
            }
        }

        field.revealed_count = field
            .cells
            .iter()
            .filter(|cell| cell.is_revealed() && !cell.is_mine())
            .count() as CellCount;
        field.flagged_count = field
            .cells
            .iter()
            .filter(|cell| cell.is_flagged())
            .count() as CellCount;
        field.outcome = snapshot.outcome;
        field.triggered_mine = snapshot.triggered_mine;
        field.score = snapshot.score;
        field.started_at = snapshot.started_at;
        field.ended_at = snapshot.ended_at;

        log::debug!(
            "Restored {:?} field, {} safe cells revealed, outcome {:?}",
            field.config,
            field.revealed_count,
            field.outcome
        );
        Ok(field)
    }
}
