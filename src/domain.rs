// Core review types and clip discovery

pub mod queue;

pub use queue::{DecisionStatistics, QueueSnapshot, ReviewQueue, UndoEntry};

use crate::error::{Result, SortieError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

/// Extensions the loader treats as reviewable clips
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];

/// Folder, next to the clip, that deleted clips are moved into
pub const TRASH_DIR_NAME: &str = "_Trash";

#[cfg(unix)]
const BLOCKED_PATH_PREFIXES: &[&str] = &["/usr", "/etc", "/bin", "/sbin", "/lib", "/System"];
#[cfg(windows)]
const BLOCKED_PATH_PREFIXES: &[&str] = &[
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
];
#[cfg(not(any(unix, windows)))]
const BLOCKED_PATH_PREFIXES: &[&str] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
        }
    }

    pub fn is_horizontal(self) -> bool {
        match self {
            Direction::Left | Direction::Right => true,
            Direction::Up | Direction::Down => false,
        }
    }
}

/// What happens to a clip once a decision lands on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Move into a folder, relative to the clip's directory unless absolute
    Move { target: String },
    /// Move into the `_Trash` folder next to the clip
    Delete,
    /// Leave the clip where it is
    Skip,
}

impl Action {
    pub fn move_to(target: impl Into<String>) -> Self {
        Action::Move {
            target: target.into(),
        }
    }

    /// Short label used for hints and toasts
    pub fn label(&self) -> String {
        match self {
            Action::Move { target } => target.clone(),
            Action::Delete => "Delete".to_string(),
            Action::Skip => "Skip".to_string(),
        }
    }

    /// Where a clip currently at `original` ends up after this action runs
    pub fn destination(&self, original: &Path) -> PathBuf {
        let parent = original.parent().unwrap_or_else(|| Path::new(""));

        let target_dir = match self {
            Action::Move { target } => {
                let target = PathBuf::from(target);
                if target.is_absolute() {
                    target
                } else {
                    parent.join(target)
                }
            }
            Action::Delete => parent.join(TRASH_DIR_NAME),
            Action::Skip => return original.to_path_buf(),
        };

        match original.file_name() {
            Some(name) => target_dir.join(name),
            None => target_dir,
        }
    }

    /// Parses a settings field: `skip`, `delete`, `move:<folder>` or a bare folder name
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        match input.to_lowercase().as_str() {
            "skip" => return Some(Action::Skip),
            "delete" => return Some(Action::Delete),
            _ => {}
        }

        let target = match input.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("move:") => input[5..].trim(),
            _ => input,
        };

        if target.is_empty() {
            None
        } else {
            Some(Action::move_to(target))
        }
    }

    /// Inverse of [`Action::parse`], used to pre-fill settings fields
    pub fn to_field(&self) -> String {
        match self {
            Action::Move { target } => match target.to_lowercase().as_str() {
                "skip" | "delete" => format!("move:{}", target),
                _ if target.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("move:")) => {
                    format!("move:{}", target)
                }
                _ => target.clone(),
            },
            Action::Delete => "delete".to_string(),
            Action::Skip => "skip".to_string(),
        }
    }
}

/// One clip waiting for a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
    /// Duration in seconds; `0.0` when not probed
    pub duration_secs: f64,
    /// Lower-cased extension, e.g. "mp4"
    pub format: String,
}

impl Item {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let id = path.to_string_lossy().into_owned();

        Ok(Item {
            id,
            path: path.to_path_buf(),
            filename,
            size: metadata.len(),
            duration_secs: 0.0,
            format,
        })
    }
}

pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Prefix match on the path text, so `/lib64` counts as `/lib`.
/// Callers pass a canonical path.
pub fn is_blocked_directory(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    BLOCKED_PATH_PREFIXES
        .iter()
        .any(|prefix| path_str.starts_with(prefix))
}

/// Options for clip discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Include files whose name starts with '.'
    pub show_hidden: bool,
    /// Minimum file size in bytes
    pub min_size: Option<u64>,
    /// Maximum file size in bytes
    pub max_size: Option<u64>,
    pub sort_by: SortBy,
    pub reverse: bool,
}

/// Review order for discovered clips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Sort by file name
    #[default]
    Name,
    /// Sort by modification date, oldest first
    Date,
    /// Sort by file size, smallest first
    Size,
}

/// Discovers clips in a directory with default options.
///
/// An empty `Ok` list means there is nothing to review; it is not an error.
pub fn discover_clips(dir_path: &Path) -> Result<Vec<Item>> {
    discover_clips_with_options(dir_path, &DiscoveryOptions::default())
}

/// Discovers clips with custom options
///
/// # Errors
/// * `LoadError` if the path is not a directory, is a system directory, or cannot be read
/// * `Io` if the path cannot be canonicalized
///
/// # Behavior
/// - Only regular files with a video extension (case-insensitive)
/// - Does not recurse into subdirectories
/// - Entries that cannot be inspected are skipped
pub fn discover_clips_with_options(
    dir_path: &Path,
    options: &DiscoveryOptions,
) -> Result<Vec<Item>> {
    if !dir_path.is_dir() {
        return Err(SortieError::LoadError(format!(
            "Path is not a directory: {}",
            dir_path.display()
        )));
    }

    let canonical = dir_path.canonicalize()?;
    if is_blocked_directory(&canonical) {
        return Err(SortieError::LoadError(
            "Access to system directories is not allowed".to_string(),
        ));
    }

    let entries = fs::read_dir(dir_path)
        .map_err(|e| SortieError::LoadError(format!("Failed to read directory: {}", e)))?;

    let mut found: Vec<(Item, SystemTime)> = Vec::new();

    for entry_result in entries {
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        if !options.show_hidden && file_name.starts_with('.') {
            continue;
        }

        if !has_video_extension(&path) {
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(_) => continue,
        };

        if !metadata.is_file() {
            continue;
        }

        if let Some(min_size) = options.min_size {
            if metadata.len() < min_size {
                continue;
            }
        }

        if let Some(max_size) = options.max_size {
            if metadata.len() > max_size {
                continue;
            }
        }

        let item = match Item::from_path(&path) {
            Ok(item) => item,
            Err(_) => continue,
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((item, modified));
    }

    match options.sort_by {
        SortBy::Name => found.sort_by(|a, b| a.0.filename.cmp(&b.0.filename)),
        SortBy::Date => found.sort_by(|a, b| a.1.cmp(&b.1)),
        SortBy::Size => found.sort_by(|a, b| a.0.size.cmp(&b.0.size)),
    }

    if options.reverse {
        found.reverse();
    }

    let clips: Vec<Item> = found.into_iter().map(|(item, _)| item).collect();
    info!(
        "Loaded {} video clips from {}",
        clips.len(),
        dir_path.display()
    );
    Ok(clips)
}
