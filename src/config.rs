//! Configuration for gene models.
//!
//! Settings can be built in code with the `with_*` setters or loaded from
//! the `[gene-model]` section of a `.ferro.toml` file.
//!
//! # Example Configuration
//!
//! ```toml
//! [gene-model]
//! splice-window = 2
//! far-splice-window = 10
//! readthrough-utr = true
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro.toml` in current directory
//! 2. `~/.config/ferro/config.toml`

use crate::error::FerroError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default distance (bases) within which an intronic edit is a splice variant.
pub const DEFAULT_SPLICE_WINDOW: u32 = 2;

/// Default distance (bases) within which an intronic edit is a far splice variant.
pub const DEFAULT_FAR_SPLICE_WINDOW: u32 = 10;

/// Settings that control effect classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneModelConfig {
    /// Intronic edits within this many bases of a coding base are `Splice`.
    pub splice_window: u32,
    /// Intronic edits within this many bases are `FarSplice`.
    pub far_splice_window: u32,
    /// Whether frameshift retranslation may continue into the 3'UTR.
    pub readthrough_utr: bool,
}

impl Default for GeneModelConfig {
    fn default() -> Self {
        Self {
            splice_window: DEFAULT_SPLICE_WINDOW,
            far_splice_window: DEFAULT_FAR_SPLICE_WINDOW,
            readthrough_utr: true,
        }
    }
}

impl GeneModelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the splice window
    pub fn with_splice_window(mut self, window: u32) -> Self {
        self.splice_window = window;
        self
    }

    /// Set the far splice window
    pub fn with_far_splice_window(mut self, window: u32) -> Self {
        self.far_splice_window = window;
        self
    }

    /// Allow or forbid 3'UTR read-through after a frameshift
    pub fn with_readthrough_utr(mut self, readthrough: bool) -> Self {
        self.readthrough_utr = readthrough;
        self
    }

    /// Check that the windows are ordered
    pub fn validate(&self) -> Result<(), FerroError> {
        if self.splice_window > self.far_splice_window {
            return Err(FerroError::Config {
                msg: format!(
                    "splice-window ({}) must not exceed far-splice-window ({})",
                    self.splice_window, self.far_splice_window
                ),
            });
        }
        Ok(())
    }

    /// Load configuration from the default locations.
    ///
    /// Returns `None` when no config file exists or none can be parsed.
    pub fn load() -> Option<Self> {
        Self::load_from_dirs(Path::new("."), dirs_home().as_deref())
    }

    /// Load configuration from the default locations, falling back to the
    /// built-in defaults.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Search `cwd` for `.ferro.toml`, then `home` for
    /// `.config/ferro/config.toml`.
    fn load_from_dirs(cwd: &Path, home: Option<&Path>) -> Option<Self> {
        let candidates = std::iter::once(cwd.join(".ferro.toml")).chain(
            home.map(|home| home.join(".config").join("ferro").join("config.toml")),
        );

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    log::debug!("Loaded gene-model settings from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, FerroError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    ///
    /// Only the `[gene-model]` section is read; other sections belong to
    /// other ferro tools and are skipped.
    pub fn parse(content: &str) -> Result<Self, FerroError> {
        let mut config = GeneModelConfig::default();
        let mut in_section = false;

        for (line_no, line) in content.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_section = &line[1..line.len() - 1] == "gene-model";
                continue;
            }

            if !in_section {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(parse_error(line_no, format!("expected key = value, got {line:?}")));
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');

            match key {
                "splice-window" => config.splice_window = parse_u32(line_no, key, value)?,
                "far-splice-window" => config.far_splice_window = parse_u32(line_no, key, value)?,
                "readthrough-utr" => {
                    config.readthrough_utr = match value {
                        "true" => true,
                        "false" => false,
                        _ => {
                            return Err(parse_error(
                                line_no,
                                format!("{key} must be true or false, got {value:?}"),
                            ))
                        }
                    }
                }
                _ => log::debug!("Unknown gene-model setting {key:?} ignored"),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_u32(line_no: usize, key: &str, value: &str) -> Result<u32, FerroError> {
    value
        .parse()
        .map_err(|_| parse_error(line_no, format!("{key} must be a non-negative integer, got {value:?}")))
}

fn parse_error(line_no: usize, msg: String) -> FerroError {
    FerroError::Config {
        msg: format!("line {}: {}", line_no + 1, msg),
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
