//! Document metadata and load-time configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    Crlf,
    Cr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub file_path: Option<String>,
    pub encoding: String,
    pub line_ending: LineEnding,
    pub is_dirty: bool,
    pub last_saved: Option<u64>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata {
            file_path: None,
            encoding: "utf-8".to_string(),
            line_ending: LineEnding::Lf,
            is_dirty: false,
            last_saved: None,
        }
    }
}

/// Configuration accepted when a document is first loaded.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub content: String,
    pub history_limit: usize,
    pub chunk_size: usize,
    pub encoding: String,
    pub line_ending: LineEnding,
    pub undo_group_timeout_ms: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            content: String::new(),
            history_limit: 1000,
            chunk_size: 65536,
            encoding: "utf-8".to_string(),
            line_ending: LineEnding::Lf,
            undo_group_timeout_ms: 0,
        }
    }
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod metadata_test;
