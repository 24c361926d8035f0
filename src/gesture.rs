//! Single-pointer swipe recognition
//!
//! Tracks one primary pointer from press to release and classifies the
//! drag offset into a [`Direction`] once it travels far enough.

use crate::domain::Direction;

/// Distance, in gesture units, a drag must travel before it counts as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// A pointer sample in gesture units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub is_primary: bool,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn primary(pointer_id: u32, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            is_primary: true,
            x,
            y,
        }
    }
}

/// Terminal event of one gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEnd {
    /// `None` when the drag stayed below the threshold
    pub direction: Option<Direction>,
    pub offset: Offset,
}

/// Classifies an offset. The larger axis wins; ties go to the horizontal axis.
pub fn classify(offset: Offset, threshold: f32) -> Option<Direction> {
    if offset.distance() < threshold {
        return None;
    }

    if offset.x.abs() >= offset.y.abs() {
        if offset.x > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if offset.y > 0.0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    pointer_id: u32,
    start_x: f32,
    start_y: f32,
}

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    threshold: f32,
    tracked: Option<Tracked>,
    offset: Offset,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl GestureRecognizer {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            tracked: None,
            offset: Offset::ZERO,
        }
    }

    /// Starts tracking a primary pointer. Returns false when the press was ignored.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if !event.is_primary || self.tracked.is_some() {
            return false;
        }

        self.tracked = Some(Tracked {
            pointer_id: event.pointer_id,
            start_x: event.x,
            start_y: event.y,
        });
        self.offset = Offset::ZERO;
        true
    }

    /// Updates the live offset. Returns false for pointers that are not tracked.
    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        match self.tracked {
            Some(tracked) if tracked.pointer_id == event.pointer_id => {
                self.offset = Offset::new(event.x - tracked.start_x, event.y - tracked.start_y);
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> Option<GestureEnd> {
        self.finish(event)
    }

    pub fn pointer_cancel(&mut self, event: PointerEvent) -> Option<GestureEnd> {
        self.finish(event)
    }

    fn finish(&mut self, event: PointerEvent) -> Option<GestureEnd> {
        let tracked = self.tracked?;
        if tracked.pointer_id != event.pointer_id {
            return None;
        }

        // Final offset comes from the release position
        self.offset = Offset::new(event.x - tracked.start_x, event.y - tracked.start_y);
        self.tracked = None;
        Some(GestureEnd {
            direction: classify(self.offset, self.threshold),
            offset: self.offset,
        })
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Classification of the live offset, for hint highlighting
    pub fn active_direction(&self) -> Option<Direction> {
        classify(self.offset, self.threshold)
    }

    pub fn is_dragging(&self) -> bool {
        self.tracked.is_some()
    }

    /// Zeroes the offset without ending the gesture or emitting an event
    pub fn reset(&mut self) {
        self.offset = Offset::ZERO;
    }

    /// Drops the tracked pointer and the offset without emitting an event
    pub fn abort(&mut self) {
        self.tracked = None;
        self.offset = Offset::ZERO;
    }
}
