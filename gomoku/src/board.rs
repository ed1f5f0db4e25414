mod bbox;
mod position;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub use bbox::*;
pub use position::*;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CellOccupied, Move};

/// One of the two players. Also what a non-empty cell is occupied by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A sparse board: only occupied cells are stored, everything else is empty.
///
/// Boards are snapshots. [`Self::place()`] returns a new board and leaves
/// the old one untouched, so a board can be handed to a replay frame or a
/// game record while the live game goes on.
//
// The map is shared between clones, which makes cloning cheap. It is only
// ever copied when a new board is derived from an existing one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    /// There is exactly one entry in this map for every cell with a mark on it.
    cells: Arc<HashMap<Position, Player>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstructs the board after the given moves, in order.
    ///
    /// Fails on the first move that targets an already occupied cell.
    pub fn from_moves(moves: &[Move]) -> Result<Self, CellOccupied> {
        Self::from_cells(moves.iter().map(|mv| (mv.position, mv.player)))
    }

    /// Builds a board from `(position, occupant)` pairs, which must all be distinct cells.
    pub fn from_cells(
        cells: impl IntoIterator<Item = (Position, Player)>,
    ) -> Result<Self, CellOccupied> {
        let mut map = HashMap::new();
        for (position, player) in cells {
            if let Some(&occupant) = map.get(&position) {
                return Err(CellOccupied { position, occupant });
            }
            map.insert(position, player);
        }
        Ok(Self {
            cells: Arc::new(map),
        })
    }

    /// Like [`Self::from_moves()`], but a move onto an occupied cell is skipped
    /// instead of failing.
    ///
    /// Only used on move logs that have been validated already, where both
    /// functions agree.
    pub(crate) fn from_validated_moves(moves: &[Move]) -> Self {
        let mut map = HashMap::with_capacity(moves.len());
        for mv in moves {
            map.entry(mv.position).or_insert(mv.player);
        }
        Self {
            cells: Arc::new(map),
        }
    }

    /// Like [`Self::place()`], but changes this board.
    ///
    /// The map is only copied if it is shared with another board.
    pub(crate) fn place_mut(
        &mut self,
        position: Position,
        player: Player,
    ) -> Result<(), CellOccupied> {
        if let Some(occupant) = self.get(position) {
            return Err(CellOccupied { position, occupant });
        }
        Arc::make_mut(&mut self.cells).insert(position, player);
        Ok(())
    }

    /// Returns the player whose mark is at `position`, or `None` if the cell is empty.
    pub fn get(&self, position: Position) -> Option<Player> {
        self.cells.get(&position).copied()
    }

    /// Returns a new board with `player`'s mark at `position`.
    ///
    /// Marks are never overwritten: if the cell is occupied, an error is
    /// returned instead.
    pub fn place(&self, position: Position, player: Player) -> Result<Board, CellOccupied> {
        if let Some(occupant) = self.get(position) {
            return Err(CellOccupied { position, occupant });
        }
        let mut cells = (*self.cells).clone();
        cells.insert(position, player);
        Ok(Board {
            cells: Arc::new(cells),
        })
    }

    /// The number of marks on the board.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All marks, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Player)> + '_ {
        self.cells.iter().map(|(&position, &player)| (position, player))
    }

    /// All marks, sorted by position.
    pub fn to_sorted_vec(&self) -> Vec<(Position, Player)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_unstable_by_key(|&(position, _)| position);
        cells
    }

    /// The smallest area enclosing all marks, or `None` if the board is empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions_iter(self.cells.keys().copied())
    }
}

// Boards are stored as a plain JSON object from position key to player.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.to_sorted_vec()
                .into_iter()
                .map(|(position, player)| (String::from(encode(position)), player)),
        )
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let entries = BTreeMap::<String, Player>::deserialize(deserializer)?;
        let mut cells = Vec::with_capacity(entries.len());
        for (key, player) in entries {
            cells.push((decode(&key).map_err(D::Error::custom)?, player));
        }
        // Distinct keys decode to distinct positions, so this cannot fail.
        Board::from_cells(cells).map_err(D::Error::custom)
    }
}
