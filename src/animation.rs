//! Card animation state machine
//!
//! Consumes gesture output, owns the offset the card is drawn at, and
//! sequences the decision callback behind a fixed exit delay.

use crate::domain::Direction;
use crate::error::Result;
use crate::gesture::{GestureEnd, GestureRecognizer, Offset, PointerEvent};
use crate::timer::Timers;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// How long the card is shown flying out before the decision runs
pub const EXIT_DELAY: Duration = Duration::from_millis(200);

/// How long a rejected gesture shakes the card
pub const SHAKE_DURATION: Duration = Duration::from_millis(180);

const HORIZONTAL_EXIT_FRACTION: f32 = 0.85;
const VERTICAL_EXIT_FRACTION: f32 = 0.65;
const MIN_OPACITY: f32 = 0.7;
const FADE_DISTANCE: f32 = 520.0;
const ROTATION_PER_UNIT: f32 = 0.035;

/// Receives committed decisions once the exit animation has played
#[async_trait]
pub trait DecisionHandler: Send {
    type Outcome: Send;

    async fn on_decision(&mut self, direction: Direction) -> Result<Self::Outcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Idle,
    Dragging,
    ExitAnimating(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardTimer {
    Exit,
    Shake,
}

#[derive(Debug)]
pub struct CardAnimator {
    recognizer: GestureRecognizer,
    state: CardState,
    shaking: bool,
    disabled: bool,
    display_offset: Offset,
    viewport: (f32, f32),
    timers: Timers<CardTimer>,
}

impl CardAnimator {
    /// Creates an animator for a surface of `width` x `height` gesture units
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_recognizer(GestureRecognizer::default(), width, height)
    }

    pub fn with_recognizer(recognizer: GestureRecognizer, width: f32, height: f32) -> Self {
        Self {
            recognizer,
            state: CardState::Idle,
            shaking: false,
            disabled: false,
            display_offset: Offset::ZERO,
            viewport: (width, height),
            timers: Timers::new(),
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    /// While disabled the card ignores pointer input entirely.
    /// Disabling mid-drag abandons the gesture without a terminal event.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && self.state == CardState::Dragging {
            self.recognizer.abort();
            self.display_offset = Offset::ZERO;
            self.state = CardState::Idle;
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.disabled || matches!(self.state, CardState::ExitAnimating(_)) {
            return;
        }

        if self.recognizer.pointer_down(event) {
            self.state = CardState::Dragging;
            self.display_offset = Offset::ZERO;
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.disabled {
            return;
        }

        if self.recognizer.pointer_move(event) && self.state == CardState::Dragging {
            self.display_offset = self.recognizer.offset();
        }
    }

    pub fn pointer_up(&mut self, event: PointerEvent, now: Instant) {
        if let Some(end) = self.recognizer.pointer_up(event) {
            self.finish_gesture(end, now);
        }
    }

    pub fn pointer_cancel(&mut self, event: PointerEvent, now: Instant) {
        if let Some(end) = self.recognizer.pointer_cancel(event) {
            self.finish_gesture(end, now);
        }
    }

    fn finish_gesture(&mut self, end: GestureEnd, now: Instant) {
        if self.disabled {
            self.settle();
            return;
        }

        match end.direction {
            Some(direction) => self.start_exit(direction, end.offset, now),
            None => {
                self.state = CardState::Idle;
                self.start_shake(now);
            }
        }
    }

    /// Commits a decision without a drag, as the keyboard does.
    ///
    /// Returns false when the card is busy or disabled; a disabled card shakes.
    pub fn fling(&mut self, direction: Direction, now: Instant) -> bool {
        if self.disabled {
            self.start_shake(now);
            return false;
        }

        if self.state != CardState::Idle {
            return false;
        }

        self.start_exit(direction, Offset::ZERO, now);
        true
    }

    fn start_exit(&mut self, direction: Direction, from: Offset, now: Instant) {
        self.display_offset = self.exit_offset(direction, from);
        self.state = CardState::ExitAnimating(direction);
        self.timers.schedule(CardTimer::Exit, now, EXIT_DELAY);
    }

    fn start_shake(&mut self, now: Instant) {
        self.shaking = true;
        self.timers.schedule(CardTimer::Shake, now, SHAKE_DURATION);
    }

    /// Off-screen target for a committed direction; the other axis keeps `from`
    fn exit_offset(&self, direction: Direction, from: Offset) -> Offset {
        let (width, height) = self.viewport;
        match direction {
            Direction::Left => Offset::new(-width * HORIZONTAL_EXIT_FRACTION, from.y),
            Direction::Right => Offset::new(width * HORIZONTAL_EXIT_FRACTION, from.y),
            Direction::Up => Offset::new(from.x, -height * VERTICAL_EXIT_FRACTION),
            Direction::Down => Offset::new(from.x, height * VERTICAL_EXIT_FRACTION),
        }
    }

    /// Fires every timer due at `now`.
    ///
    /// When the exit timer fires, the handler runs with the committed
    /// direction and its result is returned. The card settles back to
    /// idle whether or not the handler succeeded.
    pub async fn tick<H>(&mut self, now: Instant, handler: &mut H) -> Option<Result<H::Outcome>>
    where
        H: DecisionHandler + ?Sized,
    {
        let mut outcome = None;

        for timer in self.timers.take_due(now) {
            match timer {
                CardTimer::Shake => {
                    self.shaking = false;
                    if self.state == CardState::Idle {
                        self.settle();
                    }
                }
                CardTimer::Exit => {
                    if let CardState::ExitAnimating(direction) = self.state {
                        let result = handler.on_decision(direction).await;
                        self.settle();
                        outcome = Some(result);
                    }
                }
            }
        }

        outcome
    }

    fn settle(&mut self) {
        self.recognizer.reset();
        self.display_offset = Offset::ZERO;
        self.state = CardState::Idle;
    }

    /// Drops pending timers and any live gesture; no decision fires afterwards
    pub fn cancel_pending(&mut self) {
        self.timers.clear();
        self.recognizer.abort();
        self.shaking = false;
        self.settle();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn is_animating_out(&self) -> bool {
        matches!(self.state, CardState::ExitAnimating(_))
    }

    pub fn display_offset(&self) -> Offset {
        self.display_offset
    }

    /// Direction to highlight: the live classification while dragging,
    /// the committed one while flying out
    pub fn active_direction(&self) -> Option<Direction> {
        match self.state {
            CardState::Idle => None,
            CardState::Dragging => self.recognizer.active_direction(),
            CardState::ExitAnimating(direction) => Some(direction),
        }
    }

    pub fn opacity(&self) -> f32 {
        match self.state {
            CardState::Idle => 1.0,
            CardState::Dragging | CardState::ExitAnimating(_) => {
                let fade = (self.display_offset.distance() / FADE_DISTANCE).min(1.0 - MIN_OPACITY);
                (1.0 - fade).max(MIN_OPACITY)
            }
        }
    }

    pub fn rotation_degrees(&self) -> f32 {
        match self.state {
            CardState::Idle => 0.0,
            CardState::Dragging | CardState::ExitAnimating(_) => {
                self.display_offset.x * ROTATION_PER_UNIT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SortieError;

    #[derive(Default)]
    struct RecordingHandler {
        calls: Vec<Direction>,
        fail: bool,
    }

    #[async_trait]
    impl DecisionHandler for RecordingHandler {
        type Outcome = usize;

        async fn on_decision(&mut self, direction: Direction) -> Result<usize> {
            self.calls.push(direction);
            if self.fail {
                Err(SortieError::EffectError("disk full".to_string()))
            } else {
                Ok(self.calls.len())
            }
        }
    }

    fn animator() -> CardAnimator {
        CardAnimator::new(800.0, 600.0)
    }

    fn drag(card: &mut CardAnimator, dx: f32, dy: f32, now: Instant) {
        card.pointer_down(PointerEvent::primary(1, 400.0, 300.0));
        card.pointer_move(PointerEvent::primary(1, 400.0 + dx, 300.0 + dy));
        card.pointer_up(PointerEvent::primary(1, 400.0 + dx, 300.0 + dy), now);
    }

    mod gesture_tests {
        use super::*;

        #[test]
        fn test_drag_updates_display() {
            let mut card = animator();
            card.pointer_down(PointerEvent::primary(1, 100.0, 100.0));
            assert_eq!(card.state(), CardState::Dragging);

            card.pointer_move(PointerEvent::primary(1, 250.0, 120.0));

            assert_eq!(card.display_offset(), Offset::new(150.0, 20.0));
            assert_eq!(card.active_direction(), Some(Direction::Right));
            assert!((card.rotation_degrees() - 5.25).abs() < 1e-4);
        }

        #[test]
        fn test_exit_offsets() {
            let now = Instant::now();

            let mut card = animator();
            drag(&mut card, 150.0, 30.0, now);
            assert_eq!(card.state(), CardState::ExitAnimating(Direction::Right));
            assert_eq!(card.display_offset(), Offset::new(680.0, 30.0));

            let mut card = animator();
            drag(&mut card, -150.0, -40.0, now);
            assert_eq!(card.display_offset(), Offset::new(-680.0, -40.0));

            let mut card = animator();
            drag(&mut card, 20.0, -160.0, now);
            assert_eq!(card.display_offset(), Offset::new(20.0, -390.0));

            let mut card = animator();
            drag(&mut card, -20.0, 160.0, now);
            assert_eq!(card.display_offset(), Offset::new(-20.0, 390.0));
        }

        #[test]
        fn test_short_drag_shakes() {
            let now = Instant::now();
            let mut card = animator();

            drag(&mut card, 40.0, 30.0, now);

            assert_eq!(card.state(), CardState::Idle);
            assert!(card.is_shaking());
            assert_eq!(card.next_deadline(), Some(now + SHAKE_DURATION));
        }

        #[test]
        fn test_moves_suppressed_while_exiting() {
            let now = Instant::now();
            let mut card = animator();
            drag(&mut card, 150.0, 0.0, now);
            let exit = card.display_offset();

            card.pointer_down(PointerEvent::primary(2, 0.0, 0.0));
            card.pointer_move(PointerEvent::primary(2, 50.0, 50.0));

            assert_eq!(card.display_offset(), exit);
            assert_eq!(card.state(), CardState::ExitAnimating(Direction::Right));
        }

        #[test]
        fn test_opacity_floor() {
            let mut card = animator();
            assert_eq!(card.opacity(), 1.0);

            card.pointer_down(PointerEvent::primary(1, 0.0, 0.0));
            card.pointer_move(PointerEvent::primary(1, 52.0, 0.0));
            assert!((card.opacity() - 0.9).abs() < 1e-4);

            card.pointer_move(PointerEvent::primary(1, 2000.0, 0.0));
            assert!((card.opacity() - MIN_OPACITY).abs() < 1e-4);
        }
    }

    mod disabled_tests {
        use super::*;

        #[test]
        fn test_disabled_ignores_pointer() {
            let mut card = animator();
            card.set_disabled(true);

            card.pointer_down(PointerEvent::primary(1, 0.0, 0.0));
            card.pointer_move(PointerEvent::primary(1, 300.0, 0.0));

            assert_eq!(card.state(), CardState::Idle);
            assert_eq!(card.display_offset(), Offset::ZERO);
            assert!(!card.is_shaking());
        }

        #[test]
        fn test_disable_mid_drag_abandons_gesture() {
            let now = Instant::now();
            let mut card = animator();
            card.pointer_down(PointerEvent::primary(1, 0.0, 0.0));
            card.pointer_move(PointerEvent::primary(1, 300.0, 0.0));

            card.set_disabled(true);
            card.pointer_up(PointerEvent::primary(1, 300.0, 0.0), now);

            assert_eq!(card.state(), CardState::Idle);
            assert_eq!(card.display_offset(), Offset::ZERO);
            assert!(card.next_deadline().is_none());
        }

        #[test]
        fn test_fling_while_disabled_shakes() {
            let now = Instant::now();
            let mut card = animator();
            card.set_disabled(true);

            assert!(!card.fling(Direction::Left, now));
            assert!(card.is_shaking());
            assert_eq!(card.state(), CardState::Idle);
        }
    }

    mod timing_tests {
        use super::*;

        #[tokio::test]
        async fn test_decision_fires_after_exit_delay() {
            let now = Instant::now();
            let mut card = animator();
            let mut handler = RecordingHandler::default();

            drag(&mut card, 0.0, 200.0, now);

            let early = card
                .tick(now + Duration::from_millis(199), &mut handler)
                .await;
            assert!(early.is_none());
            assert!(handler.calls.is_empty());

            let fired = card.tick(now + EXIT_DELAY, &mut handler).await;
            assert_eq!(fired.unwrap().unwrap(), 1);
            assert_eq!(handler.calls, vec![Direction::Down]);
            assert_eq!(card.state(), CardState::Idle);
            assert_eq!(card.display_offset(), Offset::ZERO);
        }

        #[tokio::test]
        async fn test_failed_decision_still_settles() {
            let now = Instant::now();
            let mut card = animator();
            let mut handler = RecordingHandler {
                fail: true,
                ..Default::default()
            };

            assert!(card.fling(Direction::Up, now));
            let fired = card.tick(now + EXIT_DELAY, &mut handler).await;

            assert!(fired.unwrap().is_err());
            assert_eq!(card.state(), CardState::Idle);
            assert!(card.fling(Direction::Up, now + EXIT_DELAY));
        }

        #[tokio::test]
        async fn test_one_decision_in_flight() {
            let now = Instant::now();
            let mut card = animator();
            let mut handler = RecordingHandler::default();

            assert!(card.fling(Direction::Left, now));
            assert!(!card.fling(Direction::Right, now));

            card.tick(now + EXIT_DELAY, &mut handler).await;
            assert_eq!(handler.calls, vec![Direction::Left]);
        }

        #[tokio::test]
        async fn test_shake_clears() {
            let now = Instant::now();
            let mut card = animator();
            let mut handler = RecordingHandler::default();

            drag(&mut card, 10.0, 0.0, now);
            assert!(card.is_shaking());

            let fired = card.tick(now + SHAKE_DURATION, &mut handler).await;

            assert!(fired.is_none());
            assert!(!card.is_shaking());
            assert!(handler.calls.is_empty());
            assert_eq!(card.display_offset(), Offset::ZERO);
        }

        #[tokio::test]
        async fn test_cancel_pending_drops_decision() {
            let now = Instant::now();
            let mut card = animator();
            let mut handler = RecordingHandler::default();

            card.fling(Direction::Right, now);
            card.cancel_pending();

            assert!(card
                .tick(now + Duration::from_secs(1), &mut handler)
                .await
                .is_none());
            assert!(handler.calls.is_empty());
            assert_eq!(card.state(), CardState::Idle);
        }
    }
}
