use crate::{Board, Player, Position};

/// How many marks in a row are needed to win.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical, and the two diagonals. The opposite directions are
/// covered by walking each of these backwards.
pub const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// A run of at least [`WIN_LENGTH`] marks of one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinningLine {
    pub player: Player,
    pub direction: (i64, i64),
    /// Ordered from the negative end of the run to the positive end.
    pub positions: Vec<Position>,
}

/// Returns the winner if the mark at `anchor` is part of a line of five or more.
///
/// The last placed mark is the only one that can have just completed a line,
/// so this only looks at the four lines through `anchor` instead of scanning
/// the whole board.
pub fn check_winner(board: &Board, anchor: Position) -> Option<Player> {
    winning_line(board, anchor).map(|line| line.player)
}

/// Like [`check_winner()`], but also returns all positions of the line.
///
/// If several lines go through the anchor, the first one in [`DIRECTIONS`]
/// order is returned.
pub fn winning_line(board: &Board, anchor: Position) -> Option<WinningLine> {
    let player = board.get(anchor)?;
    for (dx, dy) in DIRECTIONS {
        let forward = run_length(board, anchor, player, (dx, dy));
        let backward = run_length(board, anchor, player, (-dx, -dy));
        if 1 + forward + backward < WIN_LENGTH {
            continue;
        }
        // Every cell of the run exists on the board, so the walk can't leave the numeric range.
        let mut positions = Vec::with_capacity(1 + forward + backward);
        let mut pos = anchor;
        for _ in 0..backward {
            pos = pos.checked_offset(-dx, -dy)?;
        }
        positions.push(pos);
        for _ in 0..(forward + backward) {
            pos = pos.checked_offset(dx, dy)?;
            positions.push(pos);
        }
        return Some(WinningLine {
            player,
            direction: (dx, dy),
            positions,
        });
    }
    None
}

/// Counts the consecutive marks of `player` next to `anchor` in one direction,
/// not counting the anchor itself.
fn run_length(board: &Board, anchor: Position, player: Player, (dx, dy): (i64, i64)) -> usize {
    let mut count = 0;
    let mut pos = anchor;
    while let Some(next) = pos.checked_offset(dx, dy) {
        if board.get(next) != Some(player) {
            break;
        }
        count += 1;
        pos = next;
    }
    count
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::BoardInput;

    /// Looks for any window of five cells through the anchor that is fully occupied.
    fn has_five_through(board: &Board, anchor: Position) -> bool {
        let Some(player) = board.get(anchor) else {
            return false;
        };
        DIRECTIONS.iter().any(|&(dx, dy)| {
            (-4..=0).any(|start: i64| {
                (start..start + 5).all(|k| {
                    anchor
                        .checked_offset(k * dx, k * dy)
                        .is_some_and(|pos| board.get(pos) == Some(player))
                })
            })
        })
    }

    fn board_with(player: Player, positions: &[(i64, i64)]) -> Board {
        Board::from_cells(positions.iter().map(|&(x, y)| (Position::new(x, y), player))).unwrap()
    }

    quickcheck! {
        fn agrees_with_window_search(input: BoardInput) -> bool {
            check_winner(&input.board, input.anchor).is_some()
                == has_five_through(&input.board, input.anchor)
        }

        fn line_contains_anchor(input: BoardInput) -> bool {
            match winning_line(&input.board, input.anchor) {
                Some(line) => {
                    line.positions.len() >= WIN_LENGTH
                        && line.positions.contains(&input.anchor)
                        && line
                            .positions
                            .iter()
                            .all(|&pos| input.board.get(pos) == Some(line.player))
                }
                None => true,
            }
        }
    }

    #[test]
    fn five_wins_in_every_direction() {
        for (dx, dy) in DIRECTIONS {
            let cells: Vec<_> = (0..5).map(|k| (k * dx, k * dy)).collect();
            let board = board_with(Player::O, &cells);
            for &(x, y) in &cells {
                assert_eq!(
                    check_winner(&board, Position::new(x, y)),
                    Some(Player::O),
                    "direction ({}, {}), anchor ({}, {})",
                    dx,
                    dy,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn four_does_not_win() {
        let board = board_with(Player::X, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(check_winner(&board, Position::new(3, 3)), None);
        assert_eq!(check_winner(&board, Position::new(0, 0)), None);
    }

    #[test]
    fn gap_or_opponent_breaks_the_line() {
        let board = board_with(Player::X, &[(0, 0), (1, 0), (3, 0), (4, 0), (5, 0)]);
        assert_eq!(check_winner(&board, Position::new(1, 0)), None);
        let board = board.place(Position::new(2, 0), Player::O).unwrap();
        assert_eq!(check_winner(&board, Position::new(4, 0)), None);
        assert_eq!(check_winner(&board, Position::new(2, 0)), None);
    }

    #[test]
    fn anchor_in_the_middle_joins_both_halves() {
        let board = board_with(Player::X, &[(0, 4), (1, 3), (3, 1), (4, 0), (2, 2)]);
        let line = winning_line(&board, Position::new(2, 2)).unwrap();
        assert_eq!(line.direction, (1, -1));
        assert_eq!(
            line.positions,
            vec![
                Position::new(0, 4),
                Position::new(1, 3),
                Position::new(2, 2),
                Position::new(3, 1),
                Position::new(4, 0),
            ]
        );
    }

    #[test]
    fn long_runs_win() {
        let board = board_with(Player::O, &(0..9).map(|y| (7, y)).collect::<Vec<_>>());
        let line = winning_line(&board, Position::new(7, 4)).unwrap();
        assert_eq!(line.positions.len(), 9);
    }

    #[test]
    fn empty_anchor_never_wins() {
        let board = board_with(Player::X, &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
        assert_eq!(check_winner(&board, Position::new(5, 0)), None);
    }

    #[test]
    fn far_away_and_at_the_edge_of_the_range() {
        let far: Vec<_> = (0..5).map(|k| (-1_000_000 + k, 1_000_000 - k)).collect();
        let board = board_with(Player::X, &far);
        assert_eq!(
            check_winner(&board, Position::new(-1_000_000, 1_000_000)),
            Some(Player::X)
        );

        let edge: Vec<_> = (0..5).map(|k| (i64::MAX - k, i64::MIN)).collect();
        let board = board_with(Player::O, &edge);
        assert_eq!(
            check_winner(&board, Position::new(i64::MAX, i64::MIN)),
            Some(Player::O)
        );
        let board = board_with(Player::O, &edge[..4]);
        assert_eq!(check_winner(&board, Position::new(i64::MAX, i64::MIN)), None);
    }
}
