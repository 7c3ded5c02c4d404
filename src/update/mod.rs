//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod highlight;
mod refresh;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::OutlineModel;

#[cfg(debug_assertions)]
use crate::messages::{CaretMsg, OutlineMsg};
#[cfg(debug_assertions)]
use crate::tracing::HighlightSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use highlight::{on_caret_moved, set_highlight_chain, update_caret};
pub use refresh::{request_refresh, update_outline};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut OutlineModel, msg: Msg) -> Cmd {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut OutlineModel, msg: Msg) -> Cmd {
    match msg {
        Msg::Outline(m) => update_outline(model, m),
        Msg::Caret(m) => update_caret(model, m),
    }
}

#[cfg(debug_assertions)]
fn update_traced(model: &mut OutlineModel, msg: Msg) -> Cmd {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = HighlightSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = HighlightSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "highlight", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Leaves out document text and outline payloads.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Outline(OutlineMsg::DocumentActivated { path, .. }) => {
            format!("Outline::DocumentActivated({})", path.display())
        }
        Msg::Outline(OutlineMsg::DocumentEdited { text }) => {
            format!("Outline::DocumentEdited({} bytes)", text.len())
        }
        Msg::Outline(OutlineMsg::DocumentSaved) => "Outline::DocumentSaved".to_string(),
        Msg::Outline(OutlineMsg::Refresh) => "Outline::Refresh".to_string(),
        Msg::Outline(OutlineMsg::BuildCompleted { generation, .. }) => {
            format!("Outline::BuildCompleted({})", generation)
        }
        Msg::Outline(OutlineMsg::SetUseXmlComments(enabled)) => {
            format!("Outline::SetUseXmlComments({})", enabled)
        }
        Msg::Caret(CaretMsg::Moved(position)) => {
            format!("Caret::Moved({}:{})", position.line, position.column)
        }
    }
}
