use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::*;

const REVEAL_POINTS: u32 = 10;
const WIN_BONUS: u32 = 1000;

/// Engine-side options chosen when a field is created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    pub start_area: StartArea,
}

/// Result of a reveal request: every cell that changed, in the order it changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealReport {
    pub updated: Vec<Cell>,
    pub outcome: GameOutcome,
}

impl RevealReport {
    fn unchanged(outcome: GameOutcome) -> Self {
        Self {
            updated: Vec::new(),
            outcome,
        }
    }

    /// Whether this report could have caused an update to the game
    pub fn has_update(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Result of a flag toggle or mark cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagReport {
    pub cell: Cell,
    pub outcome: MarkOutcome,
    pub mines_remaining: isize,
}

/// Represents a game from start to finish
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub(crate) config: GameConfig,
    pub(crate) options: FieldOptions,
    pub(crate) seed: u64,
    pub(crate) cells: Array2<Cell>,
    pub(crate) mines_placed: bool,
    pub(crate) revealed_count: CellCount,
    pub(crate) flagged_count: CellCount,
    pub(crate) outcome: GameOutcome,
    pub(crate) triggered_mine: Option<Coord2>,
    pub(crate) score: u32,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
}

impl Field {
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = GameConfig::new((rows, cols), mines)?;
        Ok(Self::with_options(config, FieldOptions::default()))
    }

    pub fn with_options(config: GameConfig, options: FieldOptions) -> Self {
        Self::with_seed(config, options, rand::random())
    }

    pub fn with_seed(config: GameConfig, options: FieldOptions, seed: u64) -> Self {
        log::debug!("New {:?} field, seed {}", config, seed);
        Self {
            config,
            options,
            seed,
            cells: blank_cells(config.size()),
            mines_placed: false,
            revealed_count: 0,
            flagged_count: 0,
            outcome: GameOutcome::Ongoing,
            triggered_mine: None,
            score: 0,
            started_at: None,
            ended_at: None,
        }
    }

    /// Builds a field whose mines are already placed, the first reveal is not protected.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let layout = MineLayout::from_mine_coords(size, mine_coords)?;
        let config = GameConfig::new(size, layout.mine_count())?;
        let mut field = Self::with_seed(config, FieldOptions::default(), 0);
        field.apply_layout(&layout);
        Ok(field)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn options(&self) -> FieldOptions {
        self.options
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// How many mines have not been flagged yet, negative when over-flagged, 0 once won
    pub fn mines_remaining(&self) -> isize {
        if matches!(self.outcome, GameOutcome::Won) {
            return 0;
        }
        (self.config.mines() as isize) - (self.flagged_count as isize)
    }

    /// Safe cells still to be revealed before the game is won
    pub fn safe_cells_remaining(&self) -> CellCount {
        self.config.safe_cells().saturating_sub(self.revealed_count)
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// How many seconds have passed since game started, 0 if it hasn't started
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn tile_at(&self, coords: Coord2, display: DisplayOptions) -> Result<Tile> {
        let cell = self.cell_at(coords)?;
        let lost = matches!(self.outcome, GameOutcome::Lost);

        Ok(match (cell.is_revealed(), cell.is_mine(), cell.mark()) {
            (true, true, _) if self.triggered_mine == Some(coords) => Tile::Exploded,
            (true, true, Mark::Flagged) if !display.show_flagged_mines => Tile::Flagged,
            (true, true, _) => Tile::Mine,
            (true, false, _) => Tile::Open(cell.adjacent_mines()),
            (false, false, Mark::Flagged) if lost => Tile::IncorrectFlag,
            (false, _, Mark::Flagged) => Tile::Flagged,
            (false, _, Mark::Questioned) => Tile::Questioned,
            (false, _, Mark::None) => Tile::Hidden,
        })
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        let (row, col) = coords;
        if row < rows && col < cols {
            Ok(coords)
        } else {
            log::warn!("Rejected coordinates {:?} on {:?} board", coords, (rows, cols));
            Err(GameError::OutOfBounds { row, col })
        }
    }

    /// Flag or unflag a cell, a question mark is replaced by a flag
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        self.do_mark(coords, false)
    }

    /// Cycle through unmarked, flagged and questioned
    pub fn cycle_mark(&mut self, coords: Coord2) -> Result<FlagReport> {
        self.do_mark(coords, true)
    }

    fn do_mark(&mut self, coords: Coord2, use_question: bool) -> Result<FlagReport> {
        use MarkOutcome::*;

        let coords = self.validate_coords(coords)?;
        let cell = self.cells[coords.to_nd_index()];

        let outcome = if self.is_terminal() {
            log::debug!("Ignoring mark at {:?}, game is {:?}", coords, self.outcome);
            NoChange
        } else if cell.is_revealed() {
            NoChange
        } else {
            let next = match cell.mark() {
                Mark::None => {
                    self.flagged_count += 1;
                    Mark::Flagged
                }
                Mark::Flagged => {
                    self.flagged_count = self.flagged_count.saturating_sub(1);
                    if use_question {
                        Mark::Questioned
                    } else {
                        Mark::None
                    }
                }
                Mark::Questioned if use_question => Mark::None,
                Mark::Questioned => {
                    self.flagged_count += 1;
                    Mark::Flagged
                }
            };
            self.cells[coords.to_nd_index()].set_mark(next);
            Changed
        };

        Ok(FlagReport {
            cell: self.cells[coords.to_nd_index()],
            outcome,
            mines_remaining: self.mines_remaining(),
        })
    }

    /// Reveal a cell, cascading through connected zero-count cells
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.validate_coords(coords)?;

        if self.is_terminal() {
            log::debug!("Ignoring reveal at {:?}, game is {:?}", coords, self.outcome);
            return Ok(RevealReport::unchanged(self.outcome));
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealReport::unchanged(self.outcome));
        }

        if !self.mines_placed {
            self.place_mines(coords);
        }
        self.mark_started();

        let mut updated = Vec::new();
        if self.cells[coords.to_nd_index()].is_mine() {
            self.open_cell(coords, &mut updated);
            self.triggered_mine = Some(coords);
            self.mark_ended(false, &mut updated);
        } else {
            self.flood_reveal(coords, &mut updated);
            if self.revealed_count == self.config.safe_cells() {
                self.mark_ended(true, &mut updated);
            }
        }

        Ok(RevealReport {
            updated,
            outcome: self.outcome,
        })
    }

    fn place_mines(&mut self, start: Coord2) {
        let generator = RandomMineGenerator::new(self.seed, self.options.start_area);
        let layout = generator.generate(self.config, start);
        self.apply_layout(&layout);
    }

    /// Marks mines and computes every neighbour count in one pass
    pub(crate) fn apply_layout(&mut self, layout: &MineLayout) {
        for cell in self.cells.iter_mut() {
            let coords = cell.coords();
            cell.set_mine(layout[coords], layout.adjacent_mine_count(coords));
        }
        self.mines_placed = true;
    }

    fn open_cell(&mut self, coords: Coord2, updated: &mut Vec<Cell>) {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.set_revealed();
        if cell.is_questioned() {
            cell.set_mark(Mark::None);
        }
        if !cell.is_mine() {
            self.revealed_count += 1;
            self.score += REVEAL_POINTS;
        }
        updated.push(*cell);
    }

    fn flood_reveal(&mut self, coords: Coord2, updated: &mut Vec<Cell>) {
        self.open_cell(coords, updated);
        let count = self.cells[coords.to_nd_index()].adjacent_mines();
        log::debug!("Revealed cell at {:?}, mine count: {}", coords, count);

        if count != 0 {
            return;
        }

        let mut visited = HashSet::from([coords]);
        let mut to_visit: VecDeque<_> = self.closed_neighbors(coords).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            coords,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            let cell = self.cells[visit_coords.to_nd_index()];
            // skip flagged or already revealed cells
            if cell.is_revealed() || cell.is_flagged() {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }
            // only neighbours of zero-count cells are queued
            debug_assert!(!cell.is_mine());

            self.open_cell(visit_coords, updated);
            log::trace!(
                "Flood revealed cell at {:?}, mine count: {}",
                visit_coords,
                cell.adjacent_mines()
            );

            if cell.adjacent_mines() == 0 {
                to_visit.extend(
                    self.closed_neighbors(visit_coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn closed_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.cells.iter_neighbors(coords).filter(|&pos| {
            let cell = self.cells[pos.to_nd_index()];
            !cell.is_revealed() && !cell.is_flagged()
        })
    }

    fn mark_started(&mut self) {
        if self.started_at.is_none() {
            let now = Utc::now();
            log::debug!("started at {}", now);
            self.started_at = Some(now);
        }
    }

    /// Moves to a terminal outcome, exposing every mine on a loss
    fn mark_ended(&mut self, won: bool, updated: &mut Vec<Cell>) {
        if self.is_terminal() {
            return;
        }

        self.outcome = if won {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        };
        let now = Utc::now();
        self.ended_at = Some(now);
        log::debug!("ended at {} with {:?}", now, self.outcome);

        if won {
            self.score += WIN_BONUS;
            self.triggered_mine = None;
            return;
        }

        for cell in self.cells.iter_mut() {
            if cell.is_mine() && !cell.is_revealed() {
                cell.set_revealed();
                updated.push(*cell);
            }
        }
    }
}

fn blank_cells(size: Coord2) -> Array2<Cell> {
    Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
        Cell::new(row as Coord, col as Coord)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: Coord2, mines: &[Coord2]) -> Field {
        Field::from_mine_coords(size, mines).unwrap()
    }

    fn revealed(field: &Field) -> Vec<Coord2> {
        field
            .cells()
            .filter(|cell| cell.is_revealed())
            .map(Cell::coords)
            .collect()
    }

    #[test]
    fn new_field_is_blank() {
        let field = Field::new(9, 7, 10).unwrap();

        assert_eq!(field.size(), (9, 7));
        assert!(!field.mines_placed());
        assert!(field.cells().all(|cell| !cell.is_mine() && !cell.is_revealed()));
        assert!(field.cells().all(|cell| cell.mark() == Mark::None));
        assert_eq!(field.outcome(), GameOutcome::Ongoing);
        assert_eq!(field.elapsed_secs(), 0);
    }

    #[test]
    fn new_field_rejects_bad_config() {
        assert_eq!(
            Field::new(0, 3, 0),
            Err(GameError::InvalidConfig(ConfigError::EmptyBoard))
        );
        assert!(matches!(
            Field::new(2, 2, 4),
            Err(GameError::InvalidConfig(ConfigError::TooManyMines { .. }))
        ));
    }

    #[test]
    fn neighbor_counts_on_hand_built_field() {
        let field = field((3, 3), &[(0, 0)]);

        assert_eq!(field.cell_at((1, 1)).unwrap().adjacent_mines(), 1);
        assert_eq!(field.cell_at((2, 2)).unwrap().adjacent_mines(), 0);
        assert_eq!(field.cell_at((0, 1)).unwrap().adjacent_mines(), 1);
        assert!(field.cell_at((0, 0)).unwrap().is_mine());
    }

    #[test]
    fn first_reveal_places_mines_away_from_click() {
        for seed in 0..10 {
            let config = GameConfig::new((10, 10), 30).unwrap();
            let mut field = Field::with_seed(config, FieldOptions::default(), seed);

            let report = field.reveal((4, 6)).unwrap();

            assert!(field.mines_placed());
            assert_eq!(field.cells().filter(|cell| cell.is_mine()).count(), 30);
            assert!(!field.cell_at((4, 6)).unwrap().is_mine());
            assert_eq!(field.cell_at((4, 6)).unwrap().adjacent_mines(), 0);
            assert_ne!(report.outcome, GameOutcome::Lost);
            assert!(field.started_at().is_some());
        }
    }

    #[test]
    fn single_cell_start_area_only_protects_the_click() {
        let config = GameConfig::new((2, 2), 3).unwrap();
        let options = FieldOptions {
            start_area: StartArea::Cell,
        };
        let mut field = Field::with_seed(config, options, 3);

        let report = field.reveal((0, 1)).unwrap();

        assert_eq!(report.outcome, GameOutcome::Won);
        assert!(!field.cell_at((0, 1)).unwrap().is_mine());
        assert_eq!(field.cell_at((0, 1)).unwrap().adjacent_mines(), 3);
    }

    #[test]
    fn flood_fill_opens_zero_region_and_border() {
        // mine column on the right edge
        let mut field = field((4, 4), &[(0, 3), (1, 3), (2, 3), (3, 3)]);

        let report = field.reveal((0, 0)).unwrap();

        let mut opened = revealed(&field);
        opened.sort();
        let expected: Vec<Coord2> = (0..4)
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .collect();
        assert_eq!(opened, expected);
        assert_eq!(report.updated.len(), 12);
        assert!(report.updated.iter().all(|cell| cell.is_revealed()));
        assert_eq!(report.outcome, GameOutcome::Won);
        assert_eq!(field.cell_at((0, 2)).unwrap().adjacent_mines(), 2);
        assert_eq!(field.cell_at((0, 0)).unwrap().adjacent_mines(), 0);
    }

    #[test]
    fn flood_fill_stops_at_numbered_cells() {
        // wall of mines splits the board, the right side stays hidden
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut field = field((5, 5), &mines);

        let report = field.reveal((2, 0)).unwrap();

        assert_eq!(report.outcome, GameOutcome::Ongoing);
        assert_eq!(report.updated.len(), 10);
        for row in 0..5 {
            assert!(field.cell_at((row, 0)).unwrap().is_revealed());
            assert!(field.cell_at((row, 1)).unwrap().is_revealed());
            assert!(!field.cell_at((row, 3)).unwrap().is_revealed());
            assert!(!field.cell_at((row, 4)).unwrap().is_revealed());
        }
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut field = field((3, 4), &[(0, 3)]);
        field.toggle_flag((2, 0)).unwrap();

        field.reveal((2, 2)).unwrap();

        let flagged = field.cell_at((2, 0)).unwrap();
        assert!(!flagged.is_revealed());
        assert!(flagged.is_flagged());
        assert_eq!(field.outcome(), GameOutcome::Ongoing);
        assert_eq!(field.safe_cells_remaining(), 1);
    }

    #[test]
    fn flood_fill_clears_question_marks() {
        let mut field = field((3, 4), &[(0, 3)]);
        field.cycle_mark((2, 0)).unwrap();
        field.cycle_mark((2, 0)).unwrap();
        assert!(field.cell_at((2, 0)).unwrap().is_questioned());

        let report = field.reveal((2, 2)).unwrap();

        let cell = field.cell_at((2, 0)).unwrap();
        assert!(cell.is_revealed());
        assert_eq!(cell.mark(), Mark::None);
        assert_eq!(report.outcome, GameOutcome::Won);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut field = field((5, 5), &[(4, 4)]);
        field.reveal((3, 4)).unwrap();
        let before = field.clone();

        let report = field.reveal((3, 4)).unwrap();

        assert!(!report.has_update());
        assert_eq!(field, before);
    }

    #[test]
    fn reveal_on_flag_is_noop() {
        let mut field = field((3, 3), &[(0, 0)]);
        field.toggle_flag((2, 2)).unwrap();

        let report = field.reveal((2, 2)).unwrap();

        assert!(!report.has_update());
        assert!(!field.cell_at((2, 2)).unwrap().is_revealed());
    }

    #[test]
    fn numbered_cell_reveals_only_itself() {
        let mut field = field((3, 3), &[(0, 0)]);

        let report = field.reveal((1, 1)).unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].coords(), (1, 1));
        assert_eq!(report.updated[0].adjacent_mines(), 1);
        assert_eq!(field.score(), REVEAL_POINTS);
    }

    #[test]
    fn hitting_mine_loses_and_exposes_mines() {
        let mut field = field((3, 3), &[(0, 0), (2, 2)]);
        field.toggle_flag((2, 2)).unwrap();

        let report = field.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, GameOutcome::Lost);
        assert!(field.is_terminal());
        assert_eq!(field.triggered_mine(), Some((0, 0)));
        assert!(field.cell_at((0, 0)).unwrap().is_revealed());
        assert!(field.cell_at((2, 2)).unwrap().is_revealed());
        assert!(field.cell_at((2, 2)).unwrap().is_flagged());
        assert_eq!(report.updated.len(), 2);
        assert!(field.ended_at().is_some());
    }

    #[test]
    fn lost_field_rejects_further_moves() {
        let mut field = field((3, 3), &[(0, 0)]);
        field.reveal((0, 0)).unwrap();
        let before = field.clone();

        let reveal = field.reveal((2, 2)).unwrap();
        let flag = field.toggle_flag((1, 1)).unwrap();
        let cycle = field.cycle_mark((1, 1)).unwrap();

        assert!(!reveal.has_update());
        assert_eq!(reveal.outcome, GameOutcome::Lost);
        assert_eq!(flag.outcome, MarkOutcome::NoChange);
        assert_eq!(cycle.outcome, MarkOutcome::NoChange);
        assert_eq!(field, before);
    }

    #[test]
    fn win_requires_revealing_every_safe_cell() {
        let mut field = field((2, 2), &[(0, 0)]);
        field.toggle_flag((0, 0)).unwrap();

        assert_eq!(field.mines_remaining(), 0);
        assert_eq!(field.outcome(), GameOutcome::Ongoing);

        assert_eq!(field.reveal((0, 1)).unwrap().outcome, GameOutcome::Ongoing);
        assert_eq!(field.reveal((1, 0)).unwrap().outcome, GameOutcome::Ongoing);
        assert_eq!(field.reveal((1, 1)).unwrap().outcome, GameOutcome::Won);
        assert_eq!(field.score(), 3 * REVEAL_POINTS + WIN_BONUS);
    }

    #[test]
    fn win_leaves_unflagged_mines_untouched() {
        let mut field = field((1, 3), &[(0, 0)]);

        let report = field.reveal((0, 2)).unwrap();

        assert_eq!(report.outcome, GameOutcome::Won);
        let mine = field.cell_at((0, 0)).unwrap();
        assert_eq!(mine.mark(), Mark::None);
        assert!(!mine.is_revealed());
        assert_eq!(report.updated.len(), 2);
        assert!(report.updated.iter().all(|cell| !cell.is_mine()));
        assert_eq!(field.mines_remaining(), 0);
    }

    #[test]
    fn won_field_rejects_further_moves() {
        let mut field = field((2, 3), &[(0, 0)]);
        for coords in [(0, 1), (0, 2), (1, 0), (1, 1), (1, 2)] {
            field.reveal(coords).unwrap();
        }
        assert_eq!(field.outcome(), GameOutcome::Won);
        let before = field.clone();

        let reveal = field.reveal((0, 0)).unwrap();
        let flag = field.toggle_flag((0, 0)).unwrap();
        let cycle = field.cycle_mark((0, 0)).unwrap();

        assert!(!reveal.has_update());
        assert_eq!(reveal.outcome, GameOutcome::Won);
        assert_eq!(flag.outcome, MarkOutcome::NoChange);
        assert_eq!(cycle.outcome, MarkOutcome::NoChange);
        assert_eq!(flag.mines_remaining, 0);
        assert_eq!(field, before);
    }

    #[test]
    fn zero_mine_field_wins_on_first_reveal() {
        let mut field = Field::new(4, 5, 0).unwrap();

        let report = field.reveal((2, 2)).unwrap();

        assert_eq!(report.outcome, GameOutcome::Won);
        assert_eq!(report.updated.len(), 20);
    }

    #[test]
    fn toggle_flag_tracks_mines_remaining() {
        let mut field = Field::new(3, 3, 1).unwrap();

        let first = field.toggle_flag((0, 0)).unwrap();
        let second = field.toggle_flag((0, 1)).unwrap();

        assert_eq!(first.outcome, MarkOutcome::Changed);
        assert!(first.cell.is_flagged());
        assert_eq!(first.mines_remaining, 0);
        assert_eq!(second.mines_remaining, -1);

        let undo = field.toggle_flag((0, 1)).unwrap();
        assert!(!undo.cell.is_flagged());
        assert_eq!(undo.mines_remaining, 0);
    }

    #[test]
    fn toggle_flag_ignores_revealed_cells() {
        let mut field = field((3, 3), &[(0, 0)]);
        field.reveal((1, 1)).unwrap();

        let report = field.toggle_flag((1, 1)).unwrap();

        assert_eq!(report.outcome, MarkOutcome::NoChange);
        assert!(!report.cell.is_flagged());
        assert_eq!(report.mines_remaining, 1);
    }

    #[test]
    fn cycle_mark_goes_through_question() {
        let mut field = Field::new(3, 3, 1).unwrap();

        assert_eq!(field.cycle_mark((1, 1)).unwrap().cell.mark(), Mark::Flagged);
        assert_eq!(field.mines_remaining(), 0);
        assert_eq!(field.cycle_mark((1, 1)).unwrap().cell.mark(), Mark::Questioned);
        assert_eq!(field.mines_remaining(), 1);
        assert_eq!(field.cycle_mark((1, 1)).unwrap().cell.mark(), Mark::None);
    }

    #[test]
    fn toggle_flag_flags_questioned_cell() {
        let mut field = Field::new(3, 3, 1).unwrap();
        field.cycle_mark((1, 1)).unwrap();
        field.cycle_mark((1, 1)).unwrap();
        assert_eq!(field.mines_remaining(), 1);

        let report = field.toggle_flag((1, 1)).unwrap();

        assert_eq!(report.outcome, MarkOutcome::Changed);
        assert!(report.cell.is_flagged());
        assert_eq!(report.mines_remaining, 0);

        let undo = field.toggle_flag((1, 1)).unwrap();
        assert_eq!(undo.cell.mark(), Mark::None);
        assert_eq!(undo.mines_remaining, 1);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut field = Field::new(3, 4, 2).unwrap();

        assert_eq!(
            field.reveal((3, 0)),
            Err(GameError::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(
            field.toggle_flag((0, 4)),
            Err(GameError::OutOfBounds { row: 0, col: 4 })
        );
        assert!(field.cell_at((5, 5)).is_err());
        assert!(!field.mines_placed());
    }

    #[test]
    fn tiles_follow_display_options() {
        let mut field = field((2, 3), &[(0, 0), (0, 2)]);
        field.toggle_flag((0, 2)).unwrap();
        field.toggle_flag((1, 2)).unwrap();
        field.reveal((0, 0)).unwrap();

        let keep = DisplayOptions::default();
        let show = DisplayOptions {
            show_flagged_mines: true,
        };
        assert_eq!(field.tile_at((0, 0), keep).unwrap(), Tile::Exploded);
        assert_eq!(field.tile_at((0, 2), keep).unwrap(), Tile::Flagged);
        assert_eq!(field.tile_at((0, 2), show).unwrap(), Tile::Mine);
        assert_eq!(field.tile_at((1, 2), keep).unwrap(), Tile::IncorrectFlag);
        assert_eq!(field.tile_at((1, 0), keep).unwrap(), Tile::Hidden);
    }

    #[test]
    fn tiles_during_play() {
        let mut field = field((2, 3), &[(0, 0)]);
        field.reveal((1, 1)).unwrap();
        field.cycle_mark((0, 0)).unwrap();
        field.cycle_mark((1, 2)).unwrap();
        field.cycle_mark((1, 2)).unwrap();

        let display = DisplayOptions::default();
        assert_eq!(field.tile_at((1, 1), display).unwrap(), Tile::Open(1));
        assert_eq!(field.tile_at((0, 0), display).unwrap(), Tile::Flagged);
        assert_eq!(field.tile_at((1, 2), display).unwrap(), Tile::Questioned);
        assert_eq!(field.tile_at((0, 2), display).unwrap(), Tile::Hidden);
        assert!(field.tile_at((0, 2), display).unwrap().is_closed());
    }
}
