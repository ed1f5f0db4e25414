use std::time::Duration;

use tracing::debug;

use crate::{Board, GameRecord, Move, Player, Winner};

/// How many moves [`Replay::jump_forward()`] and [`Replay::jump_back()`] skip.
pub const REPLAY_JUMP_STRIDE: usize = 10;

/// The time between two moves during auto-play.
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(800);

/// The board of a finished game after its first `index` moves.
///
/// An `index` past the end of the game gives the final board.
pub fn board_at(record: &GameRecord, index: usize) -> Board {
    let index = index.min(record.moves().len());
    Board::from_validated_moves(&record.moves()[..index])
}

/// Steps through a finished game.
///
/// The cursor is the number of moves on the displayed board, from 0 (empty
/// board) to the number of moves in the game (final board). A new replay
/// shows the final board.
///
/// Auto-play is driven by the caller's event loop through [`Self::tick()`].
/// Any manual navigation stops it.
#[derive(Clone, Debug)]
pub struct Replay {
    record: GameRecord,
    cursor: usize,
    playing: bool,
    /// Playing time since the last auto-play step.
    elapsed: Duration,
    interval: Duration,
}

impl Replay {
    pub fn new(record: GameRecord) -> Self {
        Self {
            cursor: record.moves().len(),
            record,
            playing: false,
            elapsed: Duration::ZERO,
            interval: AUTOPLAY_INTERVAL,
        }
    }

    /// Use a different auto-play interval. Intervals below one millisecond are rounded up.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The number of moves in the game, which is also the largest cursor value.
    pub fn len(&self) -> usize {
        self.record.moves().len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.moves().is_empty()
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.len()
    }

    /// The board at the cursor. Recomputed on every call.
    pub fn board(&self) -> Board {
        board_at(&self.record, self.cursor)
    }

    /// The most recent move on the board at the cursor.
    pub fn last_move(&self) -> Option<&Move> {
        self.cursor
            .checked_sub(1)
            .and_then(|idx| self.record.moves().get(idx))
    }

    /// Whose turn it is at the cursor. Players alternate, starting with X.
    pub fn player_to_move(&self) -> Player {
        if self.cursor % 2 == 0 {
            Player::X
        } else {
            Player::O
        }
    }

    /// The result of the game, but only once the cursor reached the final board.
    pub fn outcome_at_cursor(&self) -> Option<Winner> {
        if self.is_at_end() {
            self.record.winner()
        } else {
            None
        }
    }

    pub fn step_forward(&mut self) {
        self.navigate("step_forward", self.cursor.saturating_add(1));
    }

    pub fn step_back(&mut self) {
        self.navigate("step_back", self.cursor.saturating_sub(1));
    }

    pub fn jump_forward(&mut self) {
        self.navigate("jump_forward", self.cursor.saturating_add(REPLAY_JUMP_STRIDE));
    }

    pub fn jump_back(&mut self) {
        self.navigate("jump_back", self.cursor.saturating_sub(REPLAY_JUMP_STRIDE));
    }

    pub fn go_to_start(&mut self) {
        self.navigate("go_to_start", 0);
    }

    pub fn go_to_end(&mut self) {
        self.navigate("go_to_end", self.len());
    }

    /// Moves the cursor to `index`, clamped to the length of the game.
    pub fn jump_to(&mut self, index: usize) {
        self.navigate("jump_to", index);
    }

    /// Shows the board right after the move with index `move_idx` (0-based).
    pub fn go_to_move(&mut self, move_idx: usize) {
        self.navigate("go_to_move", move_idx.saturating_add(1));
    }

    fn navigate(&mut self, action: &'static str, target: usize) {
        self.pause();
        let from = self.cursor;
        self.cursor = target.min(self.len());
        debug!(action, from, to = self.cursor, "Replay cursor moved");
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starts auto-play. At the final board, the replay restarts from the empty board.
    pub fn play(&mut self) {
        if self.is_at_end() {
            self.cursor = 0;
        }
        self.elapsed = Duration::ZERO;
        // An empty game has nothing to play.
        self.playing = !self.is_at_end();
        debug!(cursor = self.cursor, playing = self.playing, "Auto-play started");
    }

    /// Stops auto-play. Time accumulated towards the next step is discarded.
    pub fn pause(&mut self) {
        if self.playing {
            debug!(cursor = self.cursor, "Auto-play stopped");
        }
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advances auto-play by `elapsed` time.
    ///
    /// Performs one step per full interval and stops at the final board.
    /// Returns the number of steps taken.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        if !self.playing {
            return 0;
        }
        self.elapsed = self.elapsed.saturating_add(elapsed);
        let mut steps = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.cursor += 1;
            steps += 1;
            if self.is_at_end() {
                self.pause();
                break;
            }
        }
        steps
    }

    /// The time until the next auto-play step, or `None` if not playing.
    pub fn time_to_next_step(&self) -> Option<Duration> {
        self.playing.then(|| self.interval.saturating_sub(self.elapsed))
    }
}
