use crate::{Player, Position, Winner};

/// The error type for [`Board::place()`](crate::Board::place), i.e. for putting a single mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellOccupied {
    pub position: Position,
    pub occupant: Player,
}

impl std::error::Error for CellOccupied {}

impl std::fmt::Display for CellOccupied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The cell {} is already occupied by {}",
            self.position, self.occupant
        )
    }
}

/// The error type for [`GameState::apply_move()`](crate::GameState::apply_move).
///
/// The game state is never modified when one of these is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    CellOccupied(CellOccupied),
    GameOver,
}

impl From<CellOccupied> for IllegalMove {
    fn from(err: CellOccupied) -> Self {
        IllegalMove::CellOccupied(err)
    }
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::CellOccupied(err) => Some(err),
            IllegalMove::GameOver => None,
        }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::CellOccupied(CellOccupied { position, .. }) => {
                write!(f, "Tried to place a mark on the occupied cell {}", position)
            }
            IllegalMove::GameOver => write!(f, "Tried to place a mark after the game ended"),
        }
    }
}

/// A string that was not produced by [`encode()`](crate::encode).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedKey {
    pub key: String,
}

impl std::error::Error for MalformedKey {}

impl std::fmt::Display for MalformedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a valid position key", self.key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidPlayerNames {
    /// At least one of the names is empty after trimming whitespace.
    Empty,
    /// Both players have the same name.
    Duplicate,
}

impl std::error::Error for InvalidPlayerNames {}

impl std::fmt::Display for InvalidPlayerNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidPlayerNames::Empty => write!(f, "Both players need a name"),
            InvalidPlayerNames::Duplicate => write!(f, "The players' names must differ"),
        }
    }
}

/// Why a stored [`GameRecord`](crate::GameRecord) was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorruptRecord {
    /// Two moves in the log target the same cell.
    ConflictingMoves(CellOccupied),
    /// The move at this index was made by the wrong player.
    OutOfTurn { move_idx: usize },
    /// The game was already won before the move at this index.
    MoveAfterWin { move_idx: usize },
    /// Replaying the move log does not give the stored final board.
    FinalBoardMismatch,
    /// The stored result is not the one the move log leads to.
    ///
    /// A draw is accepted for any move log without a win.
    WinnerMismatch {
        stored: Option<Winner>,
        replayed: Option<Player>,
    },
}

impl std::error::Error for CorruptRecord {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorruptRecord::ConflictingMoves(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for CorruptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptRecord::ConflictingMoves(err) => {
                write!(f, "The move log places two marks on one cell: {}", err)
            }
            CorruptRecord::OutOfTurn { move_idx } => {
                write!(f, "Move {} was made by the wrong player", move_idx + 1)
            }
            CorruptRecord::MoveAfterWin { move_idx } => {
                write!(f, "Move {} was made after the game was won", move_idx + 1)
            }
            CorruptRecord::FinalBoardMismatch => {
                write!(f, "The final board does not match the move log")
            }
            CorruptRecord::WinnerMismatch { stored, replayed } => write!(
                f,
                "The stored result {:?} does not match the move log, whose winner is {:?}",
                stored, replayed
            ),
        }
    }
}
