mod session;
mod viewer;
pub use session::*;
pub use viewer::*;

use gomoku::{winning_line, Board, Position};

/// Settings shared by all commands.
pub struct Config {
    /// Used for the ids of recorded games
    pub rng: rand::rngs::StdRng,
    pub view_radius: u32,
}

/// The cells to put in brackets: the whole line if `last_move` won the game,
/// otherwise just `last_move`.
pub fn highlighted_cells(board: &Board, last_move: Option<Position>) -> Vec<Position> {
    let Some(anchor) = last_move else {
        return Vec::new();
    };
    match winning_line(board, anchor) {
        Some(line) => line.positions,
        None => vec![anchor],
    }
}
