use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use gomoku::{visualize_window, GameRecord, Position, Replay, Viewport, ViewportController, Winner};
use tracing::debug;

use crate::{highlighted_cells, Config};

/// One line of input while viewing a replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Previous,
    JumpForward,
    JumpBack,
    Start,
    End,
    /// Show the board after this many moves
    GoTo(usize),
    /// Show the board right after the move with this (0-based) index
    GoToMove(usize),
    /// List all moves with their index
    Moves,
    Pan { dx: i64, dy: i64 },
    /// Center the view on the origin
    Center,
    Play,
    Quit,
}

impl FromStr for ViewerCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["n"] => Ok(ViewerCommand::Next),
            ["p"] => Ok(ViewerCommand::Previous),
            ["nn"] => Ok(ViewerCommand::JumpForward),
            ["pp"] => Ok(ViewerCommand::JumpBack),
            ["s"] => Ok(ViewerCommand::Start),
            ["e"] => Ok(ViewerCommand::End),
            ["g", index] => Ok(ViewerCommand::GoTo(parse_index(index)?)),
            ["m", index] => Ok(ViewerCommand::GoToMove(parse_index(index)?)),
            ["moves"] => Ok(ViewerCommand::Moves),
            ["pan", dx, dy] => Ok(ViewerCommand::Pan {
                dx: parse_offset(dx)?,
                dy: parse_offset(dy)?,
            }),
            ["center"] => Ok(ViewerCommand::Center),
            ["play"] => Ok(ViewerCommand::Play),
            ["quit"] | ["q"] => Ok(ViewerCommand::Quit),
            _ => bail!("Unknown command '{}'", line.trim()),
        }
    }
}

fn parse_index(word: &str) -> anyhow::Result<usize> {
    word.parse()
        .with_context(|| format!("'{}' is not a move number", word))
}

fn parse_offset(word: &str) -> anyhow::Result<i64> {
    word.parse()
        .with_context(|| format!("'{}' is not a whole number", word))
}

/// Lists the games, most recent first, with the index to pass to `replay`.
pub fn write_history(games: &[GameRecord], mut output: impl Write) -> std::io::Result<()> {
    if games.is_empty() {
        return writeln!(output, "No games played yet");
    }
    for (idx, game) in games.iter().enumerate() {
        writeln!(output, "{:>4}  {}  {}", idx, game.id(), game.summary())?;
    }
    Ok(())
}

/// Sleeps for `delay` and returns how long that actually took.
pub fn sleep_for(delay: Duration) -> Duration {
    let started = Instant::now();
    std::thread::sleep(delay);
    started.elapsed()
}

/// Plays the replay from the start until the end, printing every board.
///
/// `wait` blocks for the given time and returns how much time passed.
pub fn autoplay(
    config: &Config,
    replay: &mut Replay,
    output: impl Write,
    wait: impl FnMut(Duration) -> Duration,
) -> anyhow::Result<()> {
    let mut view = initial_view(replay, config.view_radius);
    play_to_end(replay, &mut view, output, wait)
}

/// Steps through the replay, reading commands from `input` until it ends or `quit`.
///
/// The view follows the last move shown, unless the cursor is back at the start.
pub fn run_viewer(
    config: &Config,
    replay: &mut Replay,
    input: impl BufRead,
    mut output: impl Write,
    mut wait: impl FnMut(Duration) -> Duration,
) -> anyhow::Result<()> {
    let mut view = initial_view(replay, config.view_radius);
    let record = replay.record();
    writeln!(output, "{}", record.summary())?;
    if let Some(bbox) = record.final_board().bounds() {
        writeln!(
            output,
            "Marks between x = {}..={} and y = {}..={}",
            bbox.x_min, bbox.x_max, bbox.y_min, bbox.y_max
        )?;
    }
    write_frame(&mut output, replay, view.viewport())?;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ViewerCommand>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{:#}", err)?;
                continue;
            }
        };
        debug!(?command, "Viewer command");

        let follow = match command {
            ViewerCommand::Next => {
                replay.step_forward();
                true
            }
            ViewerCommand::Previous => {
                replay.step_back();
                true
            }
            ViewerCommand::JumpForward => {
                replay.jump_forward();
                true
            }
            ViewerCommand::JumpBack => {
                replay.jump_back();
                true
            }
            ViewerCommand::Start => {
                replay.go_to_start();
                true
            }
            ViewerCommand::End => {
                replay.go_to_end();
                true
            }
            ViewerCommand::GoTo(index) => {
                replay.jump_to(index);
                true
            }
            ViewerCommand::GoToMove(move_idx) => {
                replay.go_to_move(move_idx);
                true
            }
            ViewerCommand::Pan { dx, dy } => {
                view.pan_by(dx, dy);
                false
            }
            ViewerCommand::Center => {
                view.center_on_origin();
                false
            }
            ViewerCommand::Moves => {
                write_moves(&mut output, replay.record())?;
                continue;
            }
            ViewerCommand::Play => {
                play_to_end(replay, &mut view, &mut output, &mut wait)?;
                continue;
            }
            ViewerCommand::Quit => break,
        };
        if follow {
            follow_cursor(replay, &mut view);
        }
        write_frame(&mut output, replay, view.viewport())?;
    }
    Ok(())
}

/// Starts centered on the last move shown, or on the origin before the first one.
fn initial_view(replay: &Replay, view_radius: u32) -> ViewportController {
    let center = replay.last_move().map_or(Position::ORIGIN, |mv| mv.position);
    ViewportController::new(Viewport::new(center, view_radius))
}

fn follow_cursor(replay: &Replay, view: &mut ViewportController) {
    if let Some(mv) = replay.last_move() {
        view.recenter_on(mv.position);
    }
}

fn play_to_end(
    replay: &mut Replay,
    view: &mut ViewportController,
    mut output: impl Write,
    mut wait: impl FnMut(Duration) -> Duration,
) -> anyhow::Result<()> {
    replay.play();
    write_frame(&mut output, replay, view.viewport())?;
    while let Some(delay) = replay.time_to_next_step() {
        if replay.tick(wait(delay)) > 0 {
            follow_cursor(replay, view);
            write_frame(&mut output, replay, view.viewport())?;
        }
    }
    Ok(())
}

fn write_moves(output: &mut impl Write, record: &GameRecord) -> std::io::Result<()> {
    for (move_idx, mv) in record.moves().iter().enumerate() {
        writeln!(output, "{:>4}  {}  {}", move_idx, mv.player, mv.position)?;
    }
    Ok(())
}

fn write_frame(
    output: &mut impl Write,
    replay: &Replay,
    viewport: Viewport,
) -> std::io::Result<()> {
    let board = replay.board();
    let highlights = highlighted_cells(&board, replay.last_move().map(|mv| mv.position));
    writeln!(output, "{}", visualize_window(&board, &viewport, &highlights))?;
    let record = replay.record();
    let status = match replay.outcome_at_cursor().map(Winner::player) {
        Some(Some(player)) => format!("{} ({}) won", record.name_of(player), player),
        Some(None) => String::from("draw"),
        None => {
            let player = replay.player_to_move();
            format!("{} ({}) to move", record.name_of(player), player)
        }
    };
    writeln!(output, "Move {}/{}: {}", replay.cursor(), replay.len(), status)
}
