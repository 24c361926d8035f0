//! Sortie - a terminal review-and-sort tool for video clips
//!
//! This crate provides the core functionality for the Sortie application:
//! clip discovery, the review queue with undo, swipe gestures and card
//! animation, and the file effects behind each decision.

pub mod animation;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod effects;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod session;
pub mod timer;
pub mod tui;

// Re-export primary types for convenience
pub use animation::{CardAnimator, CardState, DecisionHandler};
pub use config::{SwipeConfig, UserConfig};
pub use domain::{
    discover_clips, discover_clips_with_options, Action, DecisionStatistics, Direction,
    DiscoveryOptions, Item, QueueSnapshot, ReviewQueue, SortBy, UndoEntry,
};
pub use effects::{EffectExecutor, FsExecutor};
pub use error::{Result, SortieError};
pub use gesture::{GestureRecognizer, Offset, PointerEvent};
pub use session::Session;
