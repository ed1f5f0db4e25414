use crate::Position;

/// A 2D area represented by a min + max coordinate pair.
///
/// The two coordinates form an _inclusive_ 2D range, i.e. unlike in a
/// half-open range, it's possible for a point with `x == x_max`
/// to be contained in the area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

impl BoundingBox {
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x_min
            && position.y >= self.y_min
            && position.x <= self.x_max
            && position.y <= self.y_max
    }

    pub fn singleton(position: Position) -> Self {
        Self {
            x_min: position.x,
            y_min: position.y,
            x_max: position.x,
            y_max: position.y,
        }
    }

    pub fn from_positions_iter(mut iter: impl Iterator<Item = Position>) -> Option<Self> {
        let mut bbox = Self::singleton(iter.next()?);
        for position in iter {
            bbox.update(position);
        }
        Some(bbox)
    }

    /// Expands the bounding box to cover `position`.
    pub fn update(&mut self, position: Position) {
        self.x_min = self.x_min.min(position.x);
        self.x_max = self.x_max.max(position.x);
        self.y_min = self.y_min.min(position.y);
        self.y_max = self.y_max.max(position.y);
    }

    /// Grows the box by `padding` cells on every side, stopping at the
    /// numeric range.
    pub fn padded(self, padding: i64) -> Self {
        Self {
            x_min: self.x_min.saturating_sub(padding),
            y_min: self.y_min.saturating_sub(padding),
            x_max: self.x_max.saturating_add(padding),
            y_max: self.y_max.saturating_add(padding),
        }
    }

    /// Number of columns. Saturates for boxes spanning most of the `i64` range.
    pub fn width(&self) -> u64 {
        self.x_max.abs_diff(self.x_min).saturating_add(1)
    }

    /// Number of rows. Saturates for boxes spanning most of the `i64` range.
    pub fn height(&self) -> u64 {
        self.y_max.abs_diff(self.y_min).saturating_add(1)
    }
}
