//! Physical effects of decisions on the file system

use crate::domain::{Action, Item, UndoEntry};
use crate::error::{Result, SortieError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Performs and reverses the file operation behind a decision
#[async_trait]
pub trait EffectExecutor: Send + Sync {
    /// Applies `action` to `item` and returns the clip's new path
    async fn process(&self, item: &Item, action: &Action) -> Result<PathBuf>;

    /// Moves a clip from `current` back to `original`
    async fn restore(&self, current: &Path, original: &Path) -> Result<()>;
}

/// Executor that renames files on the local file system
#[derive(Debug, Clone, Default)]
pub struct FsExecutor {
    dry_run: bool,
}

impl FsExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Sends clips still sitting in `_Trash` folders to the system trash.
    /// Returns how many were sent.
    pub fn commit_deleted(&self, entries: &[UndoEntry]) -> Result<usize> {
        if self.dry_run {
            return Ok(0);
        }

        let mut sent = 0;
        for entry in entries {
            if entry.action != Action::Delete || !entry.current_path.exists() {
                continue;
            }

            trash::delete(&entry.current_path).map_err(|e| {
                SortieError::EffectError(format!(
                    "Failed to move {} to the system trash: {}",
                    entry.current_path.display(),
                    e
                ))
            })?;
            sent += 1;
        }

        info!("Sent {} deleted clips to the system trash", sent);
        Ok(sent)
    }
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

#[async_trait]
impl EffectExecutor for FsExecutor {
    async fn process(&self, item: &Item, action: &Action) -> Result<PathBuf> {
        let source = item.path.as_path();
        if !exists(source).await {
            return Err(SortieError::EffectError(format!(
                "Source file not found: {}",
                source.display()
            )));
        }

        if *action == Action::Skip {
            return Ok(source.to_path_buf());
        }

        let target = action.destination(source);

        if self.dry_run {
            info!(
                "[dry-run] Would move {} to {}",
                source.display(),
                target.display()
            );
            return Ok(target);
        }

        if let Some(target_dir) = target.parent() {
            fs::create_dir_all(target_dir).await.map_err(|e| {
                SortieError::EffectError(format!("Failed to create target directory: {}", e))
            })?;
        }

        if exists(&target).await {
            return Err(SortieError::EffectError(format!(
                "Target file already exists: {}",
                target.display()
            )));
        }

        fs::rename(source, &target)
            .await
            .map_err(|e| SortieError::EffectError(format!("Failed to move file: {}", e)))?;

        info!("Moved {} to {}", source.display(), target.display());
        Ok(target)
    }

    async fn restore(&self, current: &Path, original: &Path) -> Result<()> {
        if current == original {
            return Ok(());
        }

        if self.dry_run {
            info!(
                "[dry-run] Would restore {} to {}",
                current.display(),
                original.display()
            );
            return Ok(());
        }

        if !exists(current).await {
            return Err(SortieError::UndoError(format!(
                "File not found at current path: {}",
                current.display()
            )));
        }

        if let Some(parent) = original.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                SortieError::UndoError(format!("Failed to recreate original directory: {}", e))
            })?;
        }

        if exists(original).await {
            warn!(
                "Refusing to overwrite {} while undoing",
                original.display()
            );
            return Err(SortieError::UndoError(format!(
                "A file already exists at the original location: {}",
                original.display()
            )));
        }

        fs::rename(current, original)
            .await
            .map_err(|e| SortieError::UndoError(format!("Failed to restore file: {}", e)))?;

        info!("Restored {} to {}", current.display(), original.display());
        Ok(())
    }
}
