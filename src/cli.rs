// CLI module for argument parsing and configuration

use crate::domain::{DiscoveryOptions, SortBy};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Sortie - review video clips one at a time and sort them with a swipe
///
/// Drag the card with the mouse or use the arrow keys: each direction
/// moves the clip to a folder, deletes it, or skips it.
#[derive(Parser, Debug, Clone)]
#[command(name = "sortie")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the clips to review
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Dry run mode - show what would happen without moving any file
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Review order
    #[arg(short = 's', long = "sort", value_enum, default_value = "name")]
    pub sort_by: SortOrder,

    /// Reverse sort order
    #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
    pub reverse: bool,

    /// Include hidden clips (names starting with .)
    #[arg(long = "hidden", action = ArgAction::SetTrue)]
    pub show_hidden: bool,

    /// Minimum clip size (e.g., "1KB", "5MB", "1GB")
    #[arg(long = "min-size")]
    pub min_size: Option<String>,

    /// Maximum clip size (e.g., "100MB", "1GB")
    #[arg(long = "max-size")]
    pub max_size: Option<String>,

    /// On exit, send clips deleted this session from `_Trash` to the system trash
    #[arg(long = "system-trash", action = ArgAction::SetTrue)]
    pub system_trash: bool,

    /// Show the welcome screen even if it was seen before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,

    /// Write logs here instead of the default data directory
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortOrder {
    /// Sort by file name (alphabetical)
    #[default]
    Name,
    /// Sort by modification date (oldest first)
    Date,
    /// Sort by file size (smallest first)
    Size,
}

impl From<SortOrder> for SortBy {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Name => SortBy::Name,
            SortOrder::Date => SortBy::Date,
            SortOrder::Size => SortBy::Size,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Parse a size string (e.g., "5MB", "100KB") into bytes
    pub fn parse_size(size_str: &str) -> Option<u64> {
        let size_str = size_str.trim().to_uppercase();

        let (num_str, multiplier): (&str, u64) = if let Some(n) = size_str.strip_suffix("GB") {
            (n, 1024 * 1024 * 1024)
        } else if let Some(n) = size_str.strip_suffix("MB") {
            (n, 1024 * 1024)
        } else if let Some(n) = size_str.strip_suffix("KB") {
            (n, 1024)
        } else if let Some(n) = size_str.strip_suffix('B') {
            (n, 1)
        } else {
            (size_str.as_str(), 1)
        };

        let num: f64 = num_str.trim().parse().ok()?;
        if num < 0.0 {
            return None;
        }

        Some((num * multiplier as f64) as u64)
    }

    /// Get minimum size in bytes
    pub fn get_min_size(&self) -> Option<u64> {
        self.min_size.as_ref().and_then(|s| Self::parse_size(s))
    }

    /// Get maximum size in bytes
    pub fn get_max_size(&self) -> Option<u64> {
        self.max_size.as_ref().and_then(|s| Self::parse_size(s))
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        for (flag, value) in [("min-size", &self.min_size), ("max-size", &self.max_size)] {
            if let Some(value) = value {
                if Self::parse_size(value).is_none() {
                    return Err(format!(
                        "Invalid {} format: '{}'. Use format like '5MB', '100KB', '1GB'",
                        flag, value
                    ));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.get_min_size(), self.get_max_size()) {
            if min > max {
                return Err(format!(
                    "min-size ({}) cannot be greater than max-size ({})",
                    self.min_size.as_deref().unwrap_or_default(),
                    self.max_size.as_deref().unwrap_or_default()
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub sort_by: SortOrder,
    pub reverse: bool,
    pub show_hidden: bool,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub system_trash: bool,
    pub force_welcome: bool,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            show_hidden: self.show_hidden,
            min_size: self.min_size,
            max_size: self.max_size,
            sort_by: self.sort_by.into(),
            reverse: self.reverse,
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            min_size: args.get_min_size(),
            max_size: args.get_max_size(),
            directory: args.directory,
            dry_run: args.dry_run,
            sort_by: args.sort_by,
            reverse: args.reverse,
            show_hidden: args.show_hidden,
            system_trash: args.system_trash,
            force_welcome: args.welcome,
            log_file: args.log_file,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            dry_run: false,
            sort_by: SortOrder::Name,
            reverse: false,
            show_hidden: false,
            min_size: None,
            max_size: None,
            system_trash: false,
            force_welcome: false,
            log_file: None,
        }
    }
}
