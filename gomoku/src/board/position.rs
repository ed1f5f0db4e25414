use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MalformedKey;

/// A cell of the unbounded board.
///
/// Both coordinates may take any `i64` value. The x axis grows to the right,
/// the y axis grows downwards.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The position `(x + dx, y + dy)`, if it is representable.
    pub fn checked_offset(self, dx: i64, dy: i64) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = MalformedKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// The canonical string form of a [`Position`], `"x,y"`.
///
/// This is the key format of the persisted final boards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<Position, MalformedKey> {
        decode(&self.0)
    }
}

impl std::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PositionKey> for String {
    fn from(key: PositionKey) -> String {
        key.0
    }
}

pub fn encode(position: Position) -> PositionKey {
    PositionKey(format!("{},{}", position.x, position.y))
}

/// Inverse of [`encode()`].
///
/// Only accepts the exact output of `encode()`: no whitespace, no `+` sign
/// and no leading zeros, so that every position has exactly one key.
pub fn decode(key: &str) -> Result<Position, MalformedKey> {
    let malformed = || MalformedKey {
        key: String::from(key),
    };
    let (x, y) = key.split_once(',').ok_or_else(malformed)?;
    let x = parse_canonical(x).ok_or_else(malformed)?;
    let y = parse_canonical(y).ok_or_else(malformed)?;
    Ok(Position { x, y })
}

fn parse_canonical(s: &str) -> Option<i64> {
    let n: i64 = s.parse().ok()?;
    (n.to_string() == s).then_some(n)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn decode_inverts_encode(position: Position) -> bool {
            decode(encode(position).as_str()) == Ok(position)
        }

        fn encode_is_injective(a: Position, b: Position) -> bool {
            (a == b) == (encode(a) == encode(b))
        }
    }

    #[test]
    fn encodes_as_comma_separated_pair() {
        assert_eq!(encode(Position::new(3, -7)).as_str(), "3,-7");
        assert_eq!(encode(Position::ORIGIN).as_str(), "0,0");
        assert_eq!(
            encode(Position::new(i64::MIN, i64::MAX)).as_str(),
            "-9223372036854775808,9223372036854775807"
        );
    }

    #[test]
    fn rejects_non_canonical_keys() {
        for key in [
            "", ",", "1", "1,", ",1", "1,2,3", "a,b", "+1,2", "01,2", "-0,0", " 1,2", "1, 2",
            "1.0,2", "99999999999999999999,0",
        ] {
            assert_eq!(
                decode(key),
                Err(MalformedKey {
                    key: String::from(key)
                }),
                "{:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn offsets_stop_at_the_numeric_range() {
        let edge = Position::new(i64::MAX, 0);
        assert_eq!(edge.checked_offset(1, 0), None);
        assert_eq!(edge.checked_offset(-1, 1), Some(Position::new(i64::MAX - 1, 1)));
    }
}
