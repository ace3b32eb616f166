use rand::prelude::*;

use super::*;

/// Generation strategy that keeps the start area free and is otherwise purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    start_area: StartArea,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, start_area: StartArea) -> Self {
        Self { seed, start_area }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig, start: Coord2) -> MineLayout {
        let size = config.size();
        let total_cells = config.total_cells();
        let neighborhood_cells = NeighborIter::new(start, size).count() as CellCount + 1;

        let actual_start_area = match self.start_area {
            StartArea::Neighborhood if config.mines() + neighborhood_cells > total_cells => {
                log::warn!("Cannot keep start neighborhood clear, fallback to single safe cell");
                StartArea::Cell
            }
            start_area => start_area,
        };

        let mut excluded: Array2<bool> = Array2::default(size.to_nd_index());
        excluded[start.to_nd_index()] = true;
        let mut free_cells = total_cells - 1;
        if actual_start_area == StartArea::Neighborhood {
            for coords in NeighborIter::new(start, size) {
                excluded[coords.to_nd_index()] = true;
            }
            free_cells = total_cells - neighborhood_cells;
        }

        let mut mines = config.mines();
        if mines > free_cells {
            log::warn!(
                "Not enough free cells, requested {} mines but only {} fit",
                mines,
                free_cells
            );
            mines = free_cells;
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut mines_placed = 0;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let cols = CellCount::from(config.cols());

        // rejection sampling, mine density is a small fraction of the board in practice
        while mines_placed < mines {
            let index = rng.random_range(0..total_cells);
            let coords = ((index / cols) as Coord, (index % cols) as Coord);
            let nd_index = coords.to_nd_index();
            if excluded[nd_index] || mine_mask[nd_index] {
                continue;
            }
            mine_mask[nd_index] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines on {:?} board, start {:?} ({:?})",
            mines_placed,
            size,
            start,
            actual_start_area
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}
