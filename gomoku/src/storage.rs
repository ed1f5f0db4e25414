//! Saving and loading the game history and the current players.
//!
//! Values are stored as JSON strings under fixed keys in a [`Storage`].
//! Loading never fails: missing or unreadable data is logged and treated as
//! absent.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{GameRecord, Players};

pub const HISTORY_KEY: &str = "gomoku-history";
pub const PLAYERS_KEY: &str = "gomoku-players";

/// A simple string key-value store.
pub trait Storage {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores every key in its own JSON file inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates the directory if it does not exist yet.
    pub fn new(directory: impl Into<PathBuf>) -> io::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        // Write to a temporary file first, so that a crash never leaves half a file behind
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(tmp_path, path)
    }
}

/// Keeps everything in memory. Useful for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(String::from(key), String::from(value));
        Ok(())
    }
}

/// Stores the history, which should be ordered most recent game first.
pub fn save_game_history(storage: &mut impl Storage, games: &[GameRecord]) -> io::Result<()> {
    let json = serde_json::to_string(games)?;
    storage.set(HISTORY_KEY, &json)?;
    info!(num_games = games.len(), "Saved game history");
    Ok(())
}

/// Loads the history, most recent game first.
///
/// Returns an empty history if there is none or it can't be read. Single
/// records that are corrupt are skipped.
pub fn load_game_history(storage: &impl Storage) -> Vec<GameRecord> {
    let Some(json) = read_key(storage, HISTORY_KEY) else {
        return Vec::new();
    };
    let entries: Vec<serde_json::Value> = match serde_json::from_str(&json) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%err, "Game history is not valid JSON, starting with an empty history");
            return Vec::new();
        }
    };
    let mut games = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<GameRecord>(entry) {
            Ok(record) => games.push(record),
            Err(err) => warn!(idx, %err, "Skipping corrupt game record"),
        }
    }
    games
}

/// Puts a newly finished game at the front of the history and saves it.
///
/// The in-memory history is updated even if saving fails.
pub fn record_finished_game(
    storage: &mut impl Storage,
    history: &mut Vec<GameRecord>,
    record: GameRecord,
) -> io::Result<()> {
    info!(id = record.id(), summary = %record.summary(), "Recording finished game");
    history.insert(0, record);
    save_game_history(storage, history)
}

pub fn save_current_players(storage: &mut impl Storage, players: &Players) -> io::Result<()> {
    let json = serde_json::to_string(players)?;
    storage.set(PLAYERS_KEY, &json)
}

/// Loads the current players, or `None` if there are none or they can't be read.
pub fn load_current_players(storage: &impl Storage) -> Option<Players> {
    let json = read_key(storage, PLAYERS_KEY)?;
    match serde_json::from_str(&json) {
        Ok(players) => Some(players),
        Err(err) => {
            warn!(%err, "Stored players are invalid, ignoring them");
            None
        }
    }
}

fn read_key(storage: &impl Storage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, %err, "Could not read from storage");
            None
        }
    }
}
