pub use board::*;
pub use errors::*;
pub use game::*;
pub use players::*;
pub use record::*;
pub use replay::*;
pub use storage::*;
pub use viewport::*;
pub use visualization::*;
pub use win::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod errors;
mod game;
mod players;
mod record;
mod replay;
mod storage;
mod viewport;
mod visualization;
mod win;
