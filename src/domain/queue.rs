use super::{Action, Item};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::debug;

/// Everything needed to reverse one applied decision
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub item: Item,
    pub action: Action,
    /// Where the clip lived before the effect ran
    pub original_path: PathBuf,
    /// Where the effect put the clip
    pub current_path: PathBuf,
    /// Queue position the item occupied when it was removed
    pub removed_index: usize,
}

/// Point-in-time view of the queue published to subscribers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub remaining: usize,
    pub current_index: usize,
    pub processed_count: usize,
    pub undo_depth: usize,
}

impl QueueSnapshot {
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.remaining
    }

    /// Clips seen this session, decided or not
    pub fn total(&self) -> usize {
        self.remaining + self.processed_count
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionStatistics {
    pub total: usize,
    pub moved: usize,
    pub deleted: usize,
    pub skipped: usize,
}

/// Ordered review queue with a LIFO undo stack.
///
/// Items are consumed from the front: applying a decision removes the
/// current item and the next one slides into its slot. Undo puts the most
/// recently removed item back where it was, clamped to the current length.
#[derive(Debug)]
pub struct ReviewQueue {
    items: Vec<Item>,
    current_index: usize,
    processed_count: usize,
    undo_stack: Vec<UndoEntry>,
    source_dir: Option<PathBuf>,
    notifier: watch::Sender<QueueSnapshot>,
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewQueue {
    pub fn new() -> Self {
        let (notifier, _) = watch::channel(QueueSnapshot::default());
        Self {
            items: Vec::new(),
            current_index: 0,
            processed_count: 0,
            undo_stack: Vec::new(),
            source_dir: None,
            notifier,
        }
    }

    /// Replaces the queue and starts a fresh review session
    pub fn set_clips(&mut self, items: Vec<Item>) {
        debug!("Queue replaced with {} clips", items.len());
        self.items = items;
        self.current_index = 0;
        self.processed_count = 0;
        self.undo_stack.clear();
        self.publish();
    }

    pub fn set_source_dir(&mut self, dir: impl Into<PathBuf>) {
        self.source_dir = Some(dir.into());
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn current(&self) -> Option<&Item> {
        self.items.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    pub fn undo_stack(&self) -> &[UndoEntry] {
        &self.undo_stack
    }

    pub fn last_undo(&self) -> Option<&UndoEntry> {
        self.undo_stack.last()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Removes the current item and records how to put it back.
    ///
    /// Returns `None` without touching anything when there is no current item.
    /// `resolved_path` is the clip's location before the effect ran; it
    /// defaults to the item's own path.
    pub fn apply_decision(
        &mut self,
        action: Action,
        resolved_path: Option<PathBuf>,
    ) -> Option<UndoEntry> {
        self.record_decision(action, resolved_path, None)
    }

    /// Like [`ReviewQueue::apply_decision`], with the clip's location after
    /// the effect as reported by the executor. Without it the location is
    /// derived with [`Action::destination`].
    pub fn record_decision(
        &mut self,
        action: Action,
        resolved_path: Option<PathBuf>,
        new_path: Option<PathBuf>,
    ) -> Option<UndoEntry> {
        let item = self.current()?.clone();
        let removed_index = self.current_index;

        let original_path = resolved_path.unwrap_or_else(|| item.path.clone());
        let current_path = new_path.unwrap_or_else(|| action.destination(&original_path));

        let entry = UndoEntry {
            item,
            action,
            original_path,
            current_path,
            removed_index,
        };

        self.items.remove(removed_index);
        self.current_index = removed_index.min(self.items.len());
        self.processed_count += 1;
        self.undo_stack.push(entry.clone());

        debug!(
            "Applied {} to {} (index {}, {} left)",
            entry.action.label(),
            entry.item.filename,
            removed_index,
            self.items.len()
        );
        self.publish();

        Some(entry)
    }

    /// Reverses the most recent decision. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<UndoEntry> {
        let entry = self.undo_stack.pop()?;

        let insert_at = entry.removed_index.min(self.items.len());
        self.items.insert(insert_at, entry.item.clone());
        self.current_index = insert_at;
        self.processed_count = self.processed_count.saturating_sub(1);

        debug!("Undid {} on {}", entry.action.label(), entry.item.filename);
        self.publish();

        Some(entry)
    }

    /// Clears the queue, counters, undo stack and source directory
    pub fn reset(&mut self) {
        self.items.clear();
        self.current_index = 0;
        self.processed_count = 0;
        self.undo_stack.clear();
        self.source_dir = None;
        self.publish();
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            remaining: self.items.len(),
            current_index: self.current_index,
            processed_count: self.processed_count,
            undo_depth: self.undo_stack.len(),
        }
    }

    /// Receiver that observes a fresh snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.notifier.subscribe()
    }

    /// Counts the decisions still on the undo stack, by action
    pub fn statistics(&self) -> DecisionStatistics {
        let mut stats = DecisionStatistics {
            total: self.items.len() + self.processed_count,
            ..Default::default()
        };

        for entry in &self.undo_stack {
            match entry.action {
                Action::Move { .. } => stats.moved += 1,
                Action::Delete => stats.deleted += 1,
                Action::Skip => stats.skipped += 1,
            }
        }

        stats
    }

    fn publish(&self) {
        self.notifier.send_replace(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_item(name: &str) -> Item {
        let path = PathBuf::from("/clips").join(name);
        Item {
            id: path.to_string_lossy().into_owned(),
            path,
            filename: name.to_string(),
            size: 1024,
            duration_secs: 0.0,
            format: "mp4".to_string(),
        }
    }

    fn queue_of(names: &[&str]) -> ReviewQueue {
        let mut queue = ReviewQueue::new();
        queue.set_clips(names.iter().map(|n| create_test_item(n)).collect());
        queue
    }

    fn names(queue: &ReviewQueue) -> Vec<&str> {
        queue.items().iter().map(|i| i.filename.as_str()).collect()
    }

    mod apply_tests {
        use super::*;

        #[test]
        fn test_apply_removes_front_item() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4"]);
            let a_path = queue.current().unwrap().path.clone();

            let entry = queue.apply_decision(Action::Skip, Some(a_path)).unwrap();

            assert_eq!(entry.item.filename, "a.mp4");
            assert_eq!(entry.removed_index, 0);
            assert_eq!(names(&queue), vec!["b.mp4", "c.mp4"]);
            assert_eq!(queue.current_index(), 0);
            assert_eq!(queue.processed_count(), 1);
            assert_eq!(queue.undo_stack().len(), 1);
            assert_eq!(queue.current().unwrap().filename, "b.mp4");
        }

        #[test]
        fn test_apply_counts_match_decisions() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);

            for applied in 1..=4 {
                assert!(queue.apply_decision(Action::Delete, None).is_some());
                assert_eq!(queue.processed_count(), applied);
                assert_eq!(queue.items().len(), 4 - applied);
            }

            assert!(queue.is_exhausted());
            assert!(queue.apply_decision(Action::Delete, None).is_none());
            assert_eq!(queue.processed_count(), 4);
        }

        #[test]
        fn test_apply_on_empty_queue_is_noop() {
            let mut queue = ReviewQueue::new();
            queue.set_clips(vec![]);

            assert!(queue.apply_decision(Action::Skip, None).is_none());
            assert_eq!(queue.processed_count(), 0);
            assert!(queue.undo_stack().is_empty());
        }

        #[test]
        fn test_apply_records_paths() {
            let mut queue = queue_of(&["a.mp4"]);

            let entry = queue
                .apply_decision(Action::move_to("A-Roll"), None)
                .unwrap();

            assert_eq!(entry.original_path, PathBuf::from("/clips/a.mp4"));
            assert_eq!(entry.current_path, PathBuf::from("/clips/A-Roll/a.mp4"));
        }

        #[test]
        fn test_apply_prefers_resolved_path() {
            let mut queue = queue_of(&["a.mp4"]);

            let entry = queue
                .apply_decision(Action::Delete, Some(PathBuf::from("/elsewhere/a.mp4")))
                .unwrap();

            assert_eq!(entry.original_path, PathBuf::from("/elsewhere/a.mp4"));
            assert_eq!(entry.current_path, PathBuf::from("/elsewhere/_Trash/a.mp4"));
        }

        #[test]
        fn test_record_keeps_reported_location() {
            let mut queue = queue_of(&["a.mp4", "b.mp4"]);

            let entry = queue
                .record_decision(
                    Action::move_to("A-Roll"),
                    None,
                    Some(PathBuf::from("/clips/A-Roll/a (1).mp4")),
                )
                .unwrap();

            assert_eq!(entry.original_path, PathBuf::from("/clips/a.mp4"));
            assert_eq!(entry.current_path, PathBuf::from("/clips/A-Roll/a (1).mp4"));
            assert_eq!(queue.last_undo(), Some(&entry));
        }
    }

    mod undo_tests {
        use super::*;

        #[test]
        fn test_undo_scenario() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4"]);

            let a_path = queue.current().unwrap().path.clone();
            queue.apply_decision(Action::Skip, Some(a_path)).unwrap();
            let b_path = queue.current().unwrap().path.clone();
            queue.apply_decision(Action::Skip, Some(b_path)).unwrap();

            assert_eq!(names(&queue), vec!["c.mp4"]);
            assert_eq!(queue.processed_count(), 2);

            let entry = queue.undo().unwrap();

            assert_eq!(entry.item.filename, "b.mp4");
            assert_eq!(names(&queue), vec!["b.mp4", "c.mp4"]);
            assert_eq!(queue.current_index(), 0);
            assert_eq!(queue.processed_count(), 1);
        }

        #[test]
        fn test_apply_then_undo_restores_sequence() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4"]);
            let before = queue.items().to_vec();

            queue.apply_decision(Action::Delete, None).unwrap();
            queue.undo().unwrap();

            assert_eq!(queue.items(), before.as_slice());
            assert_eq!(queue.current().unwrap().filename, "a.mp4");
            assert_eq!(queue.processed_count(), 0);
        }

        #[test]
        fn test_undo_is_lifo() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4"]);

            queue.apply_decision(Action::Skip, None).unwrap();
            queue.apply_decision(Action::Delete, None).unwrap();
            queue.apply_decision(Action::move_to("A-Roll"), None).unwrap();
            assert!(queue.is_exhausted());

            assert_eq!(queue.undo().unwrap().item.filename, "c.mp4");
            assert_eq!(queue.undo().unwrap().item.filename, "b.mp4");
            assert_eq!(queue.undo().unwrap().item.filename, "a.mp4");
            assert_eq!(names(&queue), vec!["a.mp4", "b.mp4", "c.mp4"]);
        }

        #[test]
        fn test_undo_empty_stack() {
            let mut queue = queue_of(&["a.mp4"]);

            assert!(queue.undo().is_none());
            assert_eq!(queue.processed_count(), 0);

            queue.apply_decision(Action::Skip, None).unwrap();
            assert!(queue.undo().is_some());
            assert!(queue.undo().is_none());
            assert_eq!(queue.processed_count(), 0);
        }

        #[test]
        fn test_undo_from_exhausted_queue() {
            let mut queue = queue_of(&["a.mp4"]);

            queue.apply_decision(Action::Skip, None).unwrap();
            assert!(queue.is_exhausted());
            assert!(queue.current().is_none());

            queue.undo().unwrap();
            assert!(!queue.is_exhausted());
            assert_eq!(queue.current().unwrap().filename, "a.mp4");
        }

        #[test]
        fn test_undo_stack_never_exceeds_processed() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4"]);

            queue.apply_decision(Action::Skip, None).unwrap();
            queue.apply_decision(Action::Skip, None).unwrap();
            queue.undo().unwrap();
            queue.apply_decision(Action::Delete, None).unwrap();

            assert!(queue.undo_stack().len() <= queue.processed_count());
            assert_eq!(queue.processed_count(), 2);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_set_clips_clears_session() {
            let mut queue = queue_of(&["a.mp4", "b.mp4"]);
            queue.apply_decision(Action::Skip, None).unwrap();

            queue.set_clips(vec![create_test_item("x.mp4")]);

            assert_eq!(queue.processed_count(), 0);
            assert_eq!(queue.current_index(), 0);
            assert!(queue.undo_stack().is_empty());
            assert!(queue.undo().is_none());
        }

        #[test]
        fn test_reset_clears_source_dir() {
            let mut queue = queue_of(&["a.mp4"]);
            queue.set_source_dir("/clips");
            queue.apply_decision(Action::Skip, None).unwrap();

            queue.reset();

            assert!(queue.items().is_empty());
            assert!(queue.source_dir().is_none());
            assert_eq!(queue.processed_count(), 0);
            assert!(queue.last_undo().is_none());
        }

        #[test]
        fn test_statistics_by_action() {
            let mut queue = queue_of(&["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);

            queue.apply_decision(Action::move_to("A-Roll"), None).unwrap();
            queue.apply_decision(Action::Delete, None).unwrap();
            queue.apply_decision(Action::Skip, None).unwrap();

            let stats = queue.statistics();
            assert_eq!(stats.total, 4);
            assert_eq!(stats.moved, 1);
            assert_eq!(stats.deleted, 1);
            assert_eq!(stats.skipped, 1);
        }
    }

    mod notification_tests {
        use super::*;

        #[test]
        fn test_subscriber_sees_mutations() {
            let mut queue = queue_of(&["a.mp4", "b.mp4"]);
            let mut rx = queue.subscribe();

            queue.apply_decision(Action::Skip, None).unwrap();

            assert!(rx.has_changed().unwrap());
            let snapshot = *rx.borrow_and_update();
            assert_eq!(snapshot.remaining, 1);
            assert_eq!(snapshot.processed_count, 1);
            assert_eq!(snapshot.undo_depth, 1);
            assert_eq!(snapshot.total(), 2);
            assert!(!rx.has_changed().unwrap());
        }

        #[test]
        fn test_noop_does_not_notify() {
            let mut queue = ReviewQueue::new();
            let mut rx = queue.subscribe();
            rx.borrow_and_update();

            assert!(queue.undo().is_none());
            assert!(queue.apply_decision(Action::Skip, None).is_none());

            assert!(!rx.has_changed().unwrap());
        }

        #[test]
        fn test_snapshot_exhausted() {
            let mut queue = queue_of(&["a.mp4"]);
            assert!(!queue.snapshot().is_exhausted());

            queue.apply_decision(Action::Skip, None).unwrap();
            assert!(queue.snapshot().is_exhausted());
        }
    }
}
