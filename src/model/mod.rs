//! Outline model - the interactive-thread state of the engine
//!
//! This module contains all the state types following the Elm Architecture pattern.
//! Only the update functions mutate it; the worker thread sees snapshots.

pub mod cache;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ropey::Rope;

pub use cache::DocumentCache;

use crate::config::OutlineConfig;
use crate::outline::{BuildOptions, CancelToken, CodeDocument};
use crate::syntax::{ElementIndex, LanguageId};
use crate::theme::OutlinePalette;

/// A caret position in the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number in characters (0-indexed)
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The document the outline currently follows
#[derive(Debug, Clone)]
pub struct ActiveDocument {
    pub path: PathBuf,
    pub language: LanguageId,
    pub text: Rope,
    /// Bumped on every edit
    pub revision: u64,
}

impl ActiveDocument {
    pub fn new(path: PathBuf, language: LanguageId, text: &str) -> Self {
        Self {
            path,
            language,
            text: Rope::from_str(text),
            revision: 0,
        }
    }

    /// Byte offset of `position`, clamped to the line and to the text
    pub fn offset_of(&self, position: Position) -> usize {
        let rope = &self.text;
        if position.line >= rope.len_lines() {
            return rope.len_bytes();
        }
        let line = rope.line(position.line);
        let mut line_len = line.len_chars();
        // The caret never sits past the line break
        for br in ['\n', '\r'] {
            if line_len > 0 && line.char(line_len - 1) == br {
                line_len -= 1;
            }
        }
        let line_start = rope.line_to_char(position.line);
        let char_idx = (line_start + position.column.min(line_len)).min(rope.len_chars());
        rope.char_to_byte(char_idx)
    }
}

/// Refresh scheduler states
#[derive(Debug, Clone, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    /// One build in flight
    Running { generation: u64, cancel: CancelToken },
    /// The in-flight build was asked to stop; its result will be discarded
    CancelPending { generation: u64, cancel: CancelToken },
}

#[derive(Debug, Default)]
pub struct RefreshScheduler {
    pub state: RefreshState,
    /// A refresh was requested while a build was in flight
    pub owed: bool,
    /// Publish the next completed build even if it is structurally equal
    pub force_publish: bool,
    next_generation: u64,
}

impl RefreshScheduler {
    pub fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, RefreshState::Idle)
    }

    /// Generation of the in-flight build, if any
    pub fn in_flight(&self) -> Option<u64> {
        match &self.state {
            RefreshState::Idle => None,
            RefreshState::Running { generation, .. }
            | RefreshState::CancelPending { generation, .. } => Some(*generation),
        }
    }
}

/// The complete outline engine state
#[derive(Debug)]
pub struct OutlineModel {
    pub active: Option<ActiveDocument>,
    /// Published outline
    pub document: CodeDocument,
    pub cache: DocumentCache,
    pub scheduler: RefreshScheduler,
    /// Element index from the latest build of the active document
    pub elements: Option<Arc<ElementIndex>>,
    /// Full names highlighted by the last caret move, innermost first
    pub highlighted: Vec<String>,
    pub config: OutlineConfig,
    pub palette: OutlinePalette,
    /// Current panel width; zero while the outline is empty
    pub panel_width: u32,
}

impl OutlineModel {
    pub fn new(config: OutlineConfig) -> Self {
        let palette = config.outline_palette();
        Self {
            active: None,
            document: CodeDocument::empty(0),
            cache: DocumentCache::new(),
            scheduler: RefreshScheduler::default(),
            elements: None,
            highlighted: Vec::new(),
            panel_width: config.panel_width,
            config,
            palette,
        }
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|doc| doc.path.as_path())
    }

    pub fn build_options(&self) -> BuildOptions {
        self.config.build_options(&self.palette)
    }
}

impl Default for OutlineModel {
    fn default() -> Self {
        Self::new(OutlineConfig::default())
    }
}
