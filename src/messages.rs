//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;
use std::sync::Arc;

use crate::model::Position;
use crate::outline::CodeDocument;
use crate::syntax::{ElementIndex, LanguageId};

/// Result of one worker build
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// Outline and element index for the source snapshot
    Built {
        document: CodeDocument,
        elements: Arc<ElementIndex>,
    },
    /// The build saw its cancellation flag
    Cancelled,
}

/// Outline pipeline messages
#[derive(Debug, Clone)]
pub enum OutlineMsg {
    /// A document became the active one
    DocumentActivated {
        path: PathBuf,
        language: LanguageId,
        text: String,
    },
    /// The active document's text changed
    DocumentEdited { text: String },
    /// The active document was saved
    DocumentSaved,
    /// Explicit refresh request
    Refresh,
    /// The worker finished a build
    BuildCompleted {
        generation: u64,
        path: PathBuf,
        outcome: BuildOutcome,
    },
    /// Toggle doc-comment tooltips (forces a republish)
    SetUseXmlComments(bool),
}

/// Caret messages, handled synchronously
#[derive(Debug, Clone, Copy)]
pub enum CaretMsg {
    Moved(Position),
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// Refresh pipeline messages
    Outline(OutlineMsg),
    /// Caret tracking messages
    Caret(CaretMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn activate(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let language = LanguageId::from_path(&path);
        Msg::Outline(OutlineMsg::DocumentActivated {
            path,
            language,
            text: text.into(),
        })
    }

    pub fn edit(text: impl Into<String>) -> Self {
        Msg::Outline(OutlineMsg::DocumentEdited { text: text.into() })
    }

    pub fn caret(line: usize, column: usize) -> Self {
        Msg::Caret(CaretMsg::Moved(Position::new(line, column)))
    }
}
