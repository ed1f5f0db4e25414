use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{bail, Context};
use gomoku::{
    load_current_players, load_game_history, new_game, now_millis, record_finished_game,
    save_current_players, visualize_window, GameRecord, GameState, GameStatus, Players, Position,
    Storage, Viewport, ViewportController,
};
use tracing::{debug, info};

use crate::{highlighted_cells, Config};

/// One line of input during a hot-seat game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Place(Position),
    Pan { dx: i64, dy: i64 },
    /// Center the view on the origin
    Center,
    /// Center the view on the last move
    Last,
    NewGame,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["center"] => Ok(SessionCommand::Center),
            ["last"] => Ok(SessionCommand::Last),
            ["new"] => Ok(SessionCommand::NewGame),
            ["quit"] | ["q"] => Ok(SessionCommand::Quit),
            ["pan", dx, dy] => Ok(SessionCommand::Pan {
                dx: parse_coordinate(dx)?,
                dy: parse_coordinate(dy)?,
            }),
            [x, y] => Ok(SessionCommand::Place(Position::new(
                parse_coordinate(x)?,
                parse_coordinate(y)?,
            ))),
            _ => bail!("Unknown command '{}'", line.trim()),
        }
    }
}

fn parse_coordinate(word: &str) -> anyhow::Result<i64> {
    word.parse()
        .with_context(|| format!("'{}' is not a whole number", word))
}

/// Picks the players for a session and stores them as the current players.
///
/// Names that are not given fall back to the stored current players.
pub fn resolve_players(
    storage: &mut impl Storage,
    player_x: Option<String>,
    player_o: Option<String>,
) -> anyhow::Result<Players> {
    let stored = load_current_players(storage);
    let player_x = player_x.or_else(|| stored.as_ref().map(|p| String::from(p.player_x())));
    let player_o = player_o.or_else(|| stored.as_ref().map(|p| String::from(p.player_o())));
    let (Some(player_x), Some(player_o)) = (player_x, player_o) else {
        bail!("No players are stored yet, pass --player-x and --player-o");
    };
    let players = Players::new(&player_x, &player_o)?;
    save_current_players(storage, &players).context("Could not save the current players")?;
    Ok(players)
}

/// Plays hot-seat games, reading commands from `input` until it ends or `quit`.
///
/// Every finished game is added to the stored history. Returns the number of
/// games that were recorded.
pub fn run_session(
    config: &mut Config,
    storage: &mut impl Storage,
    players: &Players,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<usize> {
    let mut history = load_game_history(storage);
    let mut state = new_game();
    let mut view = ViewportController::new(Viewport::new(Position::ORIGIN, config.view_radius));
    let mut num_recorded = 0;
    info!(
        player_x = players.player_x(),
        player_o = players.player_o(),
        "Session started"
    );

    write_frame(&mut output, &state, players, view.viewport())?;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{:#}", err)?;
                continue;
            }
        };
        debug!(?command, "Session command");

        match command {
            SessionCommand::Place(position) => match state.apply_move(position) {
                Ok(new_state) => {
                    state = new_state;
                    let record = GameRecord::from_finished_game(
                        &state,
                        players,
                        now_millis(),
                        &mut config.rng,
                    );
                    if let Some(record) = record {
                        record_finished_game(storage, &mut history, record)
                            .context("Could not save the game history")?;
                        num_recorded += 1;
                    }
                }
                Err(err) => {
                    writeln!(output, "{}", err)?;
                    continue;
                }
            },
            SessionCommand::Pan { dx, dy } => {
                view.pan_by(dx, dy);
            }
            SessionCommand::Center => {
                view.center_on_origin();
            }
            SessionCommand::Last => {
                view.center_on_last_move(state.moves());
            }
            SessionCommand::NewGame => state = new_game(),
            SessionCommand::Quit => break,
        }
        write_frame(&mut output, &state, players, view.viewport())?;
    }

    info!(num_recorded, "Session ended");
    Ok(num_recorded)
}

fn write_frame(
    output: &mut impl Write,
    state: &GameState,
    players: &Players,
    viewport: Viewport,
) -> std::io::Result<()> {
    let highlights = highlighted_cells(state.board(), state.last_move().map(|mv| mv.position));
    writeln!(output, "{}", visualize_window(state.board(), &viewport, &highlights))?;
    match state.status() {
        GameStatus::Drawn => writeln!(output, "The game is a draw. Type 'new' for another one."),
        GameStatus::Won(player) => writeln!(
            output,
            "{} ({}) wins! Type 'new' for another game.",
            players.name_of(player),
            player
        ),
        GameStatus::InProgress => {
            let player = state.current_player();
            writeln!(output, "{} ({}) to move", players.name_of(player), player)
        }
    }
}
