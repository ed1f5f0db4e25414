use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{check_winner, Board, IllegalMove, Player, Position};

/// A single placed mark. The index of the move is its position in the move log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub position: Position,
    pub player: Player,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

impl Winner {
    /// The winning player, or `None` for a draw.
    pub fn player(self) -> Option<Player> {
        match self {
            Winner::X => Some(Player::X),
            Winner::O => Some(Player::O),
            Winner::Draw => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Drawn,
}

/// A game in progress, or one that just ended.
///
/// Every method takes `&self`; moves produce a new state. The caller keeps
/// whichever state is current and hands terminal ones to the history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    /// One entry per mark on the board, in the order they were placed.
    moves: Vec<Move>,
    winner: Option<Winner>,
    is_over: bool,
}

pub fn new_game() -> GameState {
    GameState::new()
}

/// The current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// An empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            moves: Vec::new(),
            winner: None,
            is_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player who places the next mark.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn status(&self) -> GameStatus {
        match self.winner {
            None => GameStatus::InProgress,
            Some(Winner::Draw) => GameStatus::Drawn,
            Some(Winner::X) => GameStatus::Won(Player::X),
            Some(Winner::O) => GameStatus::Won(Player::O),
        }
    }

    /// Places the current player's mark at `position`, stamped with the current time.
    pub fn apply_move(&self, position: Position) -> Result<GameState, IllegalMove> {
        self.apply_move_at(position, now_millis())
    }

    /// Places the current player's mark at `position`.
    ///
    /// Checks whether this completed a line, which ends the game, and passes
    /// the turn to the other player.
    pub fn apply_move_at(
        &self,
        position: Position,
        timestamp: u64,
    ) -> Result<GameState, IllegalMove> {
        if self.is_over {
            return Err(IllegalMove::GameOver);
        }
        let player = self.current_player;
        let board = self.board.place(position, player)?;

        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(Move {
            position,
            player,
            timestamp,
        });
        debug!(
            %player,
            x = position.x,
            y = position.y,
            move_idx = moves.len() - 1,
            "Move applied"
        );

        let winner = check_winner(&board, position).map(Winner::from);
        if winner.is_some() {
            info!(%player, num_moves = moves.len(), "Game won");
        }

        Ok(GameState {
            board,
            current_player: player.opponent(),
            moves,
            winner,
            is_over: winner.is_some(),
        })
    }

    /// Ends the game without a winner.
    ///
    /// Nothing in the rules leads to a draw on an unbounded board. This exists
    /// for callers that impose their own limit, e.g. on the number of moves.
    pub fn declare_draw(&self) -> Result<GameState, IllegalMove> {
        if self.is_over {
            return Err(IllegalMove::GameOver);
        }
        info!(num_moves = self.moves.len(), "Game declared a draw");
        Ok(GameState {
            winner: Some(Winner::Draw),
            is_over: true,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::DistinctPositions;
    use crate::CellOccupied;

    fn play(moves: &[(i64, i64)]) -> GameState {
        let mut state = new_game();
        for (idx, &(x, y)) in moves.iter().enumerate() {
            state = state
                .apply_move_at(Position::new(x, y), idx as u64)
                .unwrap();
        }
        state
    }

    quickcheck! {
        fn players_alternate_starting_with_x(positions: DistinctPositions) -> bool {
            let mut state = new_game();
            for &position in &positions.0 {
                if state.is_over() {
                    break;
                }
                state = match state.apply_move(position) {
                    Ok(state) => state,
                    Err(_) => return false,
                };
            }
            state.moves().iter().enumerate().all(|(idx, mv)| {
                mv.player == if idx % 2 == 0 { Player::X } else { Player::O }
            }) && state.moves().len() == state.board().len()
        }
    }

    #[test]
    fn new_game_is_empty() {
        let state = new_game();
        assert!(state.board().is_empty());
        assert!(state.moves().is_empty());
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.winner(), None);
        assert!(!state.is_over());
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn x_wins_horizontally() {
        let state = play(&[
            (0, 0),
            (0, 1),
            (1, 0),
            (0, 2),
            (2, 0),
            (0, 3),
            (3, 0),
            (0, 4),
        ]);
        assert!(!state.is_over());
        assert_eq!(state.current_player(), Player::X);

        let state = state.apply_move_at(Position::new(4, 0), 8).unwrap();
        assert_eq!(check_winner(state.board(), Position::new(4, 0)), Some(Player::X));
        assert_eq!(state.winner(), Some(Winner::X));
        assert_eq!(state.status(), GameStatus::Won(Player::X));
        assert!(state.is_over());
        assert_eq!(state.moves().len(), 9);
        assert_eq!(
            state.apply_move(Position::new(10, 10)),
            Err(IllegalMove::GameOver)
        );
        assert_eq!(state.declare_draw(), Err(IllegalMove::GameOver));
    }

    #[test]
    fn occupied_cell_is_rejected_without_changes() {
        let state = play(&[(0, 0), (5, 5)]);
        let before = state.clone();
        assert_eq!(
            state.apply_move(Position::new(5, 5)),
            Err(IllegalMove::CellOccupied(CellOccupied {
                position: Position::new(5, 5),
                occupant: Player::O
            }))
        );
        assert_eq!(state, before);
        assert_eq!(state.current_player(), Player::X);
    }

    #[test]
    fn apply_move_leaves_previous_state_untouched() {
        let first = play(&[(0, 0)]);
        let second = first.apply_move_at(Position::new(1, 1), 1).unwrap();
        assert_eq!(first.moves().len(), 1);
        assert_eq!(first.board().get(Position::new(1, 1)), None);
        assert_eq!(second.board().get(Position::new(1, 1)), Some(Player::O));
        assert_eq!(second.last_move().map(|mv| mv.timestamp), Some(1));
    }

    #[test]
    fn o_can_win_far_from_the_origin() {
        let state = play(&[
            (0, 0),
            (-1_000_000, 1_000_000),
            (2, 0),
            (-999_999, 999_999),
            (4, 0),
            (-999_998, 999_998),
            (6, 0),
            (-999_997, 999_997),
            (8, 0),
            (-999_996, 999_996),
        ]);
        assert_eq!(state.winner(), Some(Winner::O));
        assert_eq!(
            state.board().get(Position::new(-1_000_000, 1_000_000)),
            Some(Player::O)
        );
    }

    #[test]
    fn draw_only_when_declared() {
        let state = play(&[(0, 0), (1, 0)]).declare_draw().unwrap();
        assert_eq!(state.status(), GameStatus::Drawn);
        assert!(state.is_over());
        assert_eq!(state.winner().and_then(Winner::player), None);
        assert_eq!(
            state.apply_move(Position::new(2, 0)),
            Err(IllegalMove::GameOver)
        );
    }
}
