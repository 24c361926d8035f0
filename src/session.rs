//! The decision pipeline: config lookup, physical effect, then queue mutation

use crate::animation::DecisionHandler;
use crate::config::SwipeConfig;
use crate::domain::{Direction, Item, ReviewQueue, UndoEntry};
use crate::effects::{EffectExecutor, FsExecutor};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

/// One review session over a directory of clips.
///
/// The queue is only mutated after the executor reports success, so a
/// failed move or restore leaves the session exactly as it was.
#[derive(Debug)]
pub struct Session<E: EffectExecutor> {
    queue: ReviewQueue,
    executor: E,
    swipe: SwipeConfig,
}

impl<E: EffectExecutor> Session<E> {
    pub fn new(executor: E, swipe: SwipeConfig) -> Self {
        Self {
            queue: ReviewQueue::new(),
            executor,
            swipe,
        }
    }

    pub fn load(&mut self, source_dir: impl Into<PathBuf>, items: Vec<Item>) {
        self.queue.set_source_dir(source_dir);
        self.queue.set_clips(items);
    }

    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn swipe(&self) -> &SwipeConfig {
        &self.swipe
    }

    pub fn set_swipe(&mut self, swipe: SwipeConfig) {
        self.swipe = swipe;
    }

    /// Runs the effect for the current clip, then records the decision.
    ///
    /// `Ok(None)` means there was nothing to decide on.
    pub async fn decide(&mut self, direction: Direction) -> Result<Option<UndoEntry>> {
        let item = match self.queue.current() {
            Some(item) => item.clone(),
            None => return Ok(None),
        };

        let action = self.swipe.action_for(direction).clone();

        let new_path = match self.executor.process(&item, &action).await {
            Ok(path) => path,
            Err(e) => {
                warn!("{} on {} failed: {}", action.label(), item.filename, e);
                return Err(e);
            }
        };

        let entry = self
            .queue
            .record_decision(action, Some(item.path.clone()), Some(new_path));
        if let Some(ref entry) = entry {
            info!(
                "{} -> {} ({})",
                entry.item.filename,
                entry.action.label(),
                direction.label()
            );
        }
        Ok(entry)
    }

    /// Reverses the most recent decision on disk, then in the queue.
    ///
    /// On failure the entry stays on the stack so the undo can be retried.
    pub async fn undo(&mut self) -> Result<Option<UndoEntry>> {
        let (current, original) = match self.queue.last_undo() {
            Some(entry) => (entry.current_path.clone(), entry.original_path.clone()),
            None => return Ok(None),
        };

        if let Err(e) = self.executor.restore(&current, &original).await {
            warn!("Undo of {} failed: {}", original.display(), e);
            return Err(e);
        }

        Ok(self.queue.undo())
    }
}

impl Session<FsExecutor> {
    /// Sends this session's deleted clips to the system trash
    pub fn commit_deleted(&self) -> Result<usize> {
        self.executor.commit_deleted(self.queue.undo_stack())
    }
}

#[async_trait]
impl<E: EffectExecutor> DecisionHandler for Session<E> {
    type Outcome = Option<UndoEntry>;

    async fn on_decision(&mut self, direction: Direction) -> Result<Self::Outcome> {
        self.decide(direction).await
    }
}
