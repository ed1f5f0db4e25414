use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Board, BoundingBox, Move, Player, Position};

/// Half the side length of the window shown when nothing else is configured.
pub const DEFAULT_VIEW_RADIUS: u32 = 10;

/// The largest visible radius. Larger radii are treated as this one.
pub const MAX_VIEW_RADIUS: u32 = 200;

/// Minimum time between two committed viewports while dragging.
pub const PAN_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

/// Side length of one cell in pointer units.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

/// How many cells the view moves per cell of pointer movement.
pub const DEFAULT_MOVE_SPEED: f64 = 0.18;

/// The part of the unbounded board that is shown.
///
/// The window is the square of `2 * visible_radius + 1` cells on each side,
/// centered on `center`. The radius is capped at [`MAX_VIEW_RADIUS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub center: Position,
    pub visible_radius: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Position::ORIGIN, DEFAULT_VIEW_RADIUS)
    }
}

impl Viewport {
    pub fn new(center: Position, visible_radius: u32) -> Self {
        Self {
            center,
            visible_radius: visible_radius.min(MAX_VIEW_RADIUS),
        }
    }

    /// The window, clipped to the representable coordinates.
    pub fn bbox(&self) -> BoundingBox {
        // The field is public, so it may have been set past the cap
        let radius = self.visible_radius.min(MAX_VIEW_RADIUS);
        BoundingBox::singleton(self.center).padded(i64::from(radius))
    }

    pub fn contains(&self, position: Position) -> bool {
        self.bbox().contains(position)
    }

    /// All cells of the window, column by column.
    ///
    /// Cells outside of the `i64` range are left out.
    pub fn visible_window(&self) -> Vec<Position> {
        let BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        } = self.bbox();
        let mut cells = Vec::new();
        for x in x_min..=x_max {
            for y in y_min..=y_max {
                cells.push(Position { x, y });
            }
        }
        cells
    }

    /// The cells of the window together with their occupants.
    pub fn visible_cells(&self, board: &Board) -> Vec<(Position, Option<Player>)> {
        self.visible_window()
            .into_iter()
            .map(|position| (position, board.get(position)))
            .collect()
    }

    /// The viewport moved by `(dx, dy)` cells.
    ///
    /// A move that would leave the representable coordinates is ignored.
    pub fn pan_by(self, dx: i64, dy: i64) -> Viewport {
        match self.center.checked_offset(dx, dy) {
            Some(center) => Viewport { center, ..self },
            None => self,
        }
    }

    pub fn recenter_on(self, position: Position) -> Viewport {
        Viewport {
            center: position,
            ..self
        }
    }
}

/// Turns continuous pointer movement into whole-cell pan steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPan {
    anchor: (f64, f64),
    cell_size: f64,
    move_speed: f64,
}

impl DragPan {
    pub fn new(pointer: (f64, f64), cell_size: f64, move_speed: f64) -> Self {
        Self {
            anchor: pointer,
            cell_size,
            move_speed,
        }
    }

    /// The number of cells to pan by for the pointer now being at `pointer`.
    ///
    /// Dragging moves the content along with the pointer, so the view moves
    /// the opposite way. Returns `None` while the movement since the last
    /// step is less than half a cell; otherwise, the anchor moves to `pointer`.
    pub fn drag_to(&mut self, pointer: (f64, f64)) -> Option<(i64, i64)> {
        let to_cells = |from: f64, to: f64| {
            // `as` saturates, which is what we want for absurd pointer values.
            ((from - to) / self.cell_size * self.move_speed).round() as i64
        };
        let dx = to_cells(self.anchor.0, pointer.0);
        let dy = to_cells(self.anchor.1, pointer.1);
        if dx == 0 && dy == 0 {
            return None;
        }
        self.anchor = pointer;
        Some((dx, dy))
    }
}

/// Rate limits a stream of values.
///
/// At most one value is committed per interval. Values arriving in between
/// replace each other, and the latest one is committed once the interval
/// has passed. The caller provides the clock.
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_commit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_commit: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offers a new value. Returns it if it may be committed right away.
    pub fn update(&mut self, value: T, now: Instant) -> Option<T> {
        if self.is_ready(now) {
            self.pending = None;
            self.last_commit = Some(now);
            Some(value)
        } else {
            trace!("Throttled");
            self.pending = Some(value);
            None
        }
    }

    /// Returns the pending value, if there is one and the interval has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.is_ready(now) {
            self.last_commit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Returns the pending value regardless of the interval.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let value = self.pending.take()?;
        self.last_commit = Some(now);
        Some(value)
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_ready(&self, now: Instant) -> bool {
        self.last_commit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }
}

/// The viewport state of a board view.
///
/// There are two viewports: the live one follows every drag step, and the
/// committed one is what should be rendered. During a drag, commits are
/// throttled; everything else commits immediately.
#[derive(Clone, Debug)]
pub struct ViewportController {
    live: Viewport,
    committed: Viewport,
    throttle: Throttle<Viewport>,
    drag: Option<DragPan>,
    cell_size: f64,
    move_speed: f64,
}

impl ViewportController {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            live: viewport,
            committed: viewport,
            throttle: Throttle::new(PAN_THROTTLE_INTERVAL),
            drag: None,
            cell_size: DEFAULT_CELL_SIZE,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }

    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle = Throttle::new(interval);
        self
    }

    pub fn with_drag_params(mut self, cell_size: f64, move_speed: f64) -> Self {
        self.cell_size = cell_size;
        self.move_speed = move_speed;
        self
    }

    /// The committed viewport, i.e. the one to render.
    pub fn viewport(&self) -> Viewport {
        self.committed
    }

    /// The viewport including drag steps that have not been committed yet.
    pub fn live_viewport(&self) -> Viewport {
        self.live
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn begin_drag(&mut self, pointer: (f64, f64)) {
        self.drag = Some(DragPan::new(pointer, self.cell_size, self.move_speed));
    }

    /// Follows the pointer. Returns the new committed viewport, if there is one.
    pub fn drag_to(&mut self, pointer: (f64, f64), now: Instant) -> Option<Viewport> {
        let (dx, dy) = self.drag.as_mut()?.drag_to(pointer)?;
        self.live = self.live.pan_by(dx, dy);
        let committed = self.throttle.update(self.live, now)?;
        self.committed = committed;
        Some(committed)
    }

    /// Commits a throttled drag step once its interval has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Viewport> {
        let committed = self.throttle.poll(now)?;
        self.committed = committed;
        Some(committed)
    }

    /// Ends the drag and commits where it ended up.
    pub fn end_drag(&mut self, now: Instant) -> Viewport {
        self.drag = None;
        self.throttle.flush(now);
        self.committed = self.live;
        self.committed
    }

    pub fn pan_by(&mut self, dx: i64, dy: i64) -> Viewport {
        self.commit_now(self.live.pan_by(dx, dy))
    }

    pub fn recenter_on(&mut self, position: Position) -> Viewport {
        self.commit_now(self.live.recenter_on(position))
    }

    pub fn center_on_origin(&mut self) -> Viewport {
        self.recenter_on(Position::ORIGIN)
    }

    /// Centers on the last of `moves`. Does nothing if there are none.
    pub fn center_on_last_move(&mut self, moves: &[Move]) -> Viewport {
        match moves.last() {
            Some(mv) => self.recenter_on(mv.position),
            None => self.committed,
        }
    }

    fn commit_now(&mut self, viewport: Viewport) -> Viewport {
        self.throttle.cancel();
        self.live = viewport;
        self.committed = viewport;
        viewport
    }
}
