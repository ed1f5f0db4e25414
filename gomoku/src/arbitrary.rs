use std::collections::HashSet;

use quickcheck::{Arbitrary, Gen};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{Board, GameRecord, GameState, Player, Players, Position, Replay};

/// Corners of the areas that generated positions are drawn from.
///
/// Most tests happen around the origin, but the far corners make sure that
/// overflow at the edge of the coordinate range is handled.
const REGION_ORIGINS: [(i64, i64); 5] = [
    (-4, -4),
    (-4, -4),
    (1_000_000, -1_000_000),
    (i64::MAX - 4, i64::MAX - 4),
    (i64::MIN, i64::MIN + 2),
];

/// Side length of the generated areas. Small, so that cells collide and lines form.
const REGION_SIZE: u8 = 8;

fn region_origin(g: &mut Gen) -> (i64, i64) {
    *g.choose(&REGION_ORIGINS).unwrap()
}

/// A random cell in the area with the given corner, or `None` past the coordinate range.
fn position_in_region(g: &mut Gen, (x0, y0): (i64, i64)) -> Option<Position> {
    let dx = i64::from(u8::arbitrary(g) % REGION_SIZE);
    let dy = i64::from(u8::arbitrary(g) % REGION_SIZE);
    Position::new(x0, y0).checked_offset(dx, dy)
}

impl Arbitrary for Player {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[Player::X, Player::O]).unwrap()
    }
}

impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        if u8::arbitrary(g) % 8 == 0 {
            Position::new(i64::arbitrary(g), i64::arbitrary(g))
        } else {
            let origin = region_origin(g);
            position_in_region(g, origin).unwrap_or(Position::new(origin.0, origin.1))
        }
    }
}

#[derive(Clone, Debug)]
pub struct BoardInput {
    pub board: Board,
    // Always occupied
    pub anchor: Position,
}

impl Arbitrary for BoardInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let origin = region_origin(g);
        // Skew the occupants towards one player, so that lines of five are common
        let x_share = *g.choose(&[2u8, 5, 8]).unwrap();
        let num_marks = usize::from(u8::arbitrary(g) % 48) + 1;

        let mut cells = Vec::with_capacity(num_marks);
        let mut seen = HashSet::new();
        for _ in 0..num_marks {
            let Some(position) = position_in_region(g, origin) else {
                continue;
            };
            if seen.insert(position) {
                let player = if u8::arbitrary(g) % 10 < x_share {
                    Player::X
                } else {
                    Player::O
                };
                cells.push((position, player));
            }
        }
        if cells.is_empty() {
            cells.push((Position::new(origin.0, origin.1), Player::arbitrary(g)));
        }

        let anchor = g.choose(&cells).unwrap().0;
        let board = Board::from_cells(cells).unwrap();
        BoardInput { board, anchor }
    }
}

/// Positions without duplicates, in the order they should be played.
#[derive(Clone, Debug)]
pub struct DistinctPositions(pub Vec<Position>);

impl Arbitrary for DistinctPositions {
    fn arbitrary(g: &mut Gen) -> Self {
        let origin = region_origin(g);
        let num_positions = usize::from(u8::arbitrary(g) % 64);
        let mut seen = HashSet::new();
        let positions = (0..num_positions)
            .filter_map(|_| position_in_region(g, origin))
            .filter(|&position| seen.insert(position))
            .collect();
        DistinctPositions(positions)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(DistinctPositions))
    }
}

/// X builds a horizontal line at y = 0 while O plays at x = 0, and X wins with the 9th move.
pub fn finished_game() -> GameState {
    let moves = [
        (0, 0),
        (0, 1),
        (1, 0),
        (0, 2),
        (2, 0),
        (0, 3),
        (3, 0),
        (0, 4),
        (4, 0),
    ];
    let mut state = GameState::new();
    for (idx, (x, y)) in moves.into_iter().enumerate() {
        state = state
            .apply_move_at(Position::new(x, y), 1000 + idx as u64)
            .unwrap();
    }
    state
}

pub fn sample_record() -> GameRecord {
    let players = Players::new("Alice", "Bob").unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    GameRecord::from_finished_game(&finished_game(), &players, 2000, &mut rng).unwrap()
}

#[derive(Clone, Copy, Debug)]
pub enum ReplayCommand {
    StepForward,
    StepBack,
    JumpForward,
    JumpBack,
    GoToStart,
    GoToEnd,
    JumpTo(usize),
    GoToMove(usize),
    Pause,
    TogglePlay,
    Play,
    /// Milliseconds
    Tick(u64),
}

impl ReplayCommand {
    pub fn apply(self, replay: &mut Replay) {
        match self {
            ReplayCommand::StepForward => replay.step_forward(),
            ReplayCommand::StepBack => replay.step_back(),
            ReplayCommand::JumpForward => replay.jump_forward(),
            ReplayCommand::JumpBack => replay.jump_back(),
            ReplayCommand::GoToStart => replay.go_to_start(),
            ReplayCommand::GoToEnd => replay.go_to_end(),
            ReplayCommand::JumpTo(index) => replay.jump_to(index),
            ReplayCommand::GoToMove(move_idx) => replay.go_to_move(move_idx),
            ReplayCommand::Pause => replay.pause(),
            ReplayCommand::TogglePlay => replay.toggle_play(),
            ReplayCommand::Play => replay.play(),
            ReplayCommand::Tick(millis) => {
                replay.tick(std::time::Duration::from_millis(millis));
            }
        }
    }
}

impl Arbitrary for ReplayCommand {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 12 {
            0 => ReplayCommand::StepForward,
            1 => ReplayCommand::StepBack,
            2 => ReplayCommand::JumpForward,
            3 => ReplayCommand::JumpBack,
            4 => ReplayCommand::GoToStart,
            5 => ReplayCommand::GoToEnd,
            6 => ReplayCommand::JumpTo(usize::from(u8::arbitrary(g) % 80)),
            7 => ReplayCommand::GoToMove(usize::from(u8::arbitrary(g) % 80)),
            8 => ReplayCommand::Pause,
            9 => ReplayCommand::TogglePlay,
            10 => ReplayCommand::Play,
            _ => ReplayCommand::Tick(u64::from(u16::arbitrary(g) % 4000)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReplayInput {
    pub record: GameRecord,
    pub commands: Vec<ReplayCommand>,
}

impl Arbitrary for ReplayInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let DistinctPositions(positions) = DistinctPositions::arbitrary(g);
        let mut state = GameState::new();
        for (idx, position) in positions.into_iter().enumerate() {
            if state.is_over() {
                break;
            }
            state = state.apply_move_at(position, idx as u64).unwrap();
        }
        // Games that nobody won still need to end before they can be recorded
        if !state.is_over() {
            state = state.declare_draw().unwrap();
        }

        let players = Players::new("Alice", "Bob").unwrap();
        let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
        let record = GameRecord::from_finished_game(&state, &players, 0, &mut rng).unwrap();
        ReplayInput {
            record,
            commands: Vec::arbitrary(g),
        }
    }
}
