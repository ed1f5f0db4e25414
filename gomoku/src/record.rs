use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{check_winner, Board, CorruptRecord, GameState, Move, Player, Players, Winner};

/// A finished game, as stored in the history.
///
/// Records are created once, when a game ends, and never change afterwards.
/// A record always satisfies the following:
/// - the moves alternate between the players, starting with X,
/// - no two moves target the same cell,
/// - replaying all moves gives `final_board`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredGameRecord")]
pub struct GameRecord {
    id: String,
    player_x: String,
    player_o: String,
    winner: Option<Winner>,
    /// Milliseconds since the Unix epoch.
    completed_at: u64,
    moves: Vec<Move>,
    /// Stored as a plain object from position key to player.
    final_board: Board,
}

// The unvalidated form, as found in storage.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGameRecord {
    id: String,
    player_x: String,
    player_o: String,
    winner: Option<Winner>,
    completed_at: u64,
    moves: Vec<Move>,
    final_board: Board,
}

impl TryFrom<StoredGameRecord> for GameRecord {
    type Error = CorruptRecord;

    fn try_from(stored: StoredGameRecord) -> Result<Self, Self::Error> {
        // Replay the game, stopping at the first move the rules would have rejected
        let mut replayed = Board::new();
        let mut replayed_winner = None;
        for (move_idx, mv) in stored.moves.iter().enumerate() {
            if replayed_winner.is_some() {
                return Err(CorruptRecord::MoveAfterWin { move_idx });
            }
            let expected = if move_idx % 2 == 0 { Player::X } else { Player::O };
            if mv.player != expected {
                return Err(CorruptRecord::OutOfTurn { move_idx });
            }
            replayed
                .place_mut(mv.position, mv.player)
                .map_err(CorruptRecord::ConflictingMoves)?;
            replayed_winner = check_winner(&replayed, mv.position);
        }
        if replayed != stored.final_board {
            return Err(CorruptRecord::FinalBoardMismatch);
        }
        let winner_matches = match (stored.winner, replayed_winner) {
            (Some(Winner::Draw), None) => true,
            (Some(winner), Some(player)) => winner == Winner::from(player),
            _ => false,
        };
        if !winner_matches {
            return Err(CorruptRecord::WinnerMismatch {
                stored: stored.winner,
                replayed: replayed_winner,
            });
        }
        Ok(GameRecord {
            id: stored.id,
            player_x: stored.player_x,
            player_o: stored.player_o,
            winner: stored.winner,
            completed_at: stored.completed_at,
            moves: stored.moves,
            final_board: stored.final_board,
        })
    }
}

impl GameRecord {
    /// Creates the record for a game that just ended.
    ///
    /// Returns `None` if the game is still in progress.
    pub fn from_finished_game(
        state: &GameState,
        players: &Players,
        completed_at: u64,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        if !state.is_over() {
            return None;
        }
        Some(Self {
            id: format!("{}-{:08x}", completed_at, rng.gen::<u32>()),
            player_x: String::from(players.player_x()),
            player_o: String::from(players.player_o()),
            winner: state.winner(),
            completed_at,
            moves: state.moves().to_vec(),
            final_board: state.board().clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn player_x(&self) -> &str {
        &self.player_x
    }

    pub fn player_o(&self) -> &str {
        &self.player_o
    }

    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::X => &self.player_x,
            Player::O => &self.player_o,
        }
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn completed_at(&self) -> u64 {
        self.completed_at
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn final_board(&self) -> &Board {
        &self.final_board
    }

    /// A one-line description, e.g. `Alice vs Bob: Alice won after 9 moves`.
    pub fn summary(&self) -> String {
        let result = match self.winner {
            Some(Winner::X) => format!("{} won", self.player_x),
            Some(Winner::O) => format!("{} won", self.player_o),
            Some(Winner::Draw) => String::from("draw"),
            None => String::from("unfinished"),
        };
        format!(
            "{} vs {}: {} after {} moves",
            self.player_x,
            self.player_o,
            result,
            self.moves.len()
        )
    }
}
