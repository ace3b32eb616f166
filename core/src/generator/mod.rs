use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    /// Lays out `config.mines()` mines, keeping the first revealed cell at `start` safe.
    fn generate(self, config: GameConfig, start: Coord2) -> MineLayout;
}

/// Which cells around the first reveal are kept free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartArea {
    /// Only the revealed cell is safe.
    Cell,
    /// The revealed cell and its neighbours are safe, so the first reveal always opens a region.
    Neighborhood,
}

impl Default for StartArea {
    fn default() -> Self {
        Self::Neighborhood
    }
}
