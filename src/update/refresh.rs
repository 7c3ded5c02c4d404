//! Refresh scheduler update handlers
//!
//! At most one build is in flight. A request during a build cancels it and
//! owes a follow-up build, which starts once the cancelled build reports
//! back. Completed builds are diffed against the published document and
//! only republished when the structure changed.

use std::path::{Path, PathBuf};

use ropey::Rope;

use super::highlight::reapply_highlight;
use crate::commands::Cmd;
use crate::messages::{BuildOutcome, OutlineMsg};
use crate::model::{ActiveDocument, OutlineModel, RefreshState};
use crate::outline::{structurally_equal, CancelToken, CodeDocument};
use crate::syntax::LanguageId;

/// Handle outline pipeline messages
pub fn update_outline(model: &mut OutlineModel, msg: OutlineMsg) -> Cmd {
    match msg {
        OutlineMsg::DocumentActivated {
            path,
            language,
            text,
        } => activate(model, path, language, &text),

        OutlineMsg::DocumentEdited { text } => {
            let Some(active) = model.active.as_mut() else {
                tracing::debug!("Edit without an active document, ignoring");
                return Cmd::None;
            };
            active.text = Rope::from_str(&text);
            active.revision += 1;
            request_refresh(model)
        }

        OutlineMsg::DocumentSaved | OutlineMsg::Refresh => request_refresh(model),

        OutlineMsg::BuildCompleted {
            generation,
            path,
            outcome,
        } => on_build_completed(model, generation, &path, outcome),

        OutlineMsg::SetUseXmlComments(enabled) => {
            if model.config.use_xml_comments == enabled {
                return Cmd::None;
            }
            model.config.use_xml_comments = enabled;
            // Tooltips are not part of structural equality
            model.scheduler.force_publish = true;
            request_refresh(model)
        }
    }
}

/// Switch to `path`: publish the cached outline (or a placeholder) right
/// away, then rebuild
fn activate(model: &mut OutlineModel, path: PathBuf, language: LanguageId, text: &str) -> Cmd {
    let mut document = match model.cache.get(&path) {
        Some(cached) => {
            tracing::debug!("Outline cache hit for {}", path.display());
            cached.clone()
        }
        None => CodeDocument::loading(&model.palette),
    };
    document.reset_visual_state(&model.palette);
    document.revision = model.document.revision + 1;
    let _previous = std::mem::replace(&mut model.document, document);

    model.active = Some(ActiveDocument::new(path, language, text));
    model.elements = None;
    model.highlighted.clear();

    Cmd::batch(vec![
        Cmd::Redraw,
        sync_panel_width(model),
        request_refresh(model),
    ])
}

/// Start a build, or cancel the running one and owe a follow-up
pub fn request_refresh(model: &mut OutlineModel) -> Cmd {
    if model.active.is_none() {
        tracing::debug!("Refresh requested without an active document");
        return Cmd::None;
    }

    match std::mem::take(&mut model.scheduler.state) {
        RefreshState::Running { generation, cancel } => {
            tracing::debug!("Cancelling outline build {}", generation);
            cancel.cancel();
            model.scheduler.state = RefreshState::CancelPending { generation, cancel };
            model.scheduler.owed = true;
            Cmd::None
        }
        pending @ RefreshState::CancelPending { .. } => {
            model.scheduler.state = pending;
            model.scheduler.owed = true;
            Cmd::None
        }
        RefreshState::Idle => start_build(model),
    }
}

fn start_build(model: &mut OutlineModel) -> Cmd {
    let options = model.build_options();
    let Some(active) = &model.active else {
        return Cmd::None;
    };

    let generation = model.scheduler.next_generation();
    let cancel = CancelToken::new();
    model.scheduler.state = RefreshState::Running {
        generation,
        cancel: cancel.clone(),
    };
    tracing::debug!(
        "Starting outline build {} for {} (rev {})",
        generation,
        active.path.display(),
        active.revision
    );

    Cmd::RunOutlineBuild {
        generation,
        path: active.path.clone(),
        language: active.language,
        source: active.text.to_string(),
        options,
        cancel,
    }
}

fn on_build_completed(
    model: &mut OutlineModel,
    generation: u64,
    path: &Path,
    outcome: BuildOutcome,
) -> Cmd {
    let cancel = match std::mem::take(&mut model.scheduler.state) {
        RefreshState::Running {
            generation: expected,
            cancel,
        }
        | RefreshState::CancelPending {
            generation: expected,
            cancel,
        } if expected == generation => cancel,
        other => {
            tracing::warn!("Ignoring result of unknown outline build {}", generation);
            model.scheduler.state = other;
            return Cmd::None;
        }
    };

    let mut cmds = Vec::new();
    if cancel.is_cancelled() {
        tracing::debug!("Discarding cancelled outline build {}", generation);
    } else {
        match outcome {
            BuildOutcome::Cancelled => {
                tracing::debug!("Outline build {} reported cancellation", generation);
            }
            BuildOutcome::Built { .. } if model.active_path() != Some(path) => {
                tracing::debug!(
                    "Discarding outline for inactive document {}",
                    path.display()
                );
            }
            BuildOutcome::Built { document, elements } => {
                model.elements = Some(elements);
                cmds.push(publish_if_changed(model, path, document));
            }
        }
    }

    if std::mem::take(&mut model.scheduler.owed) {
        cmds.push(start_build(model));
    }
    Cmd::batch(cmds)
}

fn publish_if_changed(model: &mut OutlineModel, path: &Path, mut document: CodeDocument) -> Cmd {
    let forced = std::mem::take(&mut model.scheduler.force_publish);
    if !forced && structurally_equal(&model.document, &document) {
        tracing::debug!("Outline for {} unchanged, not publishing", path.display());
        return Cmd::None;
    }

    document.revision = model.document.revision + 1;
    model.cache.insert(path.to_path_buf(), document.clone());
    let _previous = std::mem::replace(&mut model.document, document);
    reapply_highlight(model);
    tracing::debug!(
        "Published outline rev {} for {} ({} items)",
        model.document.revision,
        path.display(),
        model.document.len()
    );

    Cmd::batch(vec![Cmd::Redraw, sync_panel_width(model)])
}

/// Collapse the panel while the outline is empty, restore it afterwards
fn sync_panel_width(model: &mut OutlineModel) -> Cmd {
    let width = if model.document.is_empty() {
        0
    } else {
        model.config.panel_width
    };
    if width == model.panel_width {
        return Cmd::None;
    }
    model.panel_width = width;
    Cmd::ResizePanel { width }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::outline::{CodeItem, CodeKind, ItemCore, VisualState};
    use crate::syntax::{Access, ElementIndex, SourceFile, TextSpan};

    fn leaf(name: &str) -> CodeItem {
        CodeItem::Leaf(ItemCore {
            id: 0,
            name: name.to_string(),
            full_name: name.to_string(),
            kind: CodeKind::Field,
            access: Access::Public,
            tooltip: String::new(),
            span: TextSpan::default(),
            visual: VisualState::new(&Default::default()),
        })
    }

    fn built(names: &[&str]) -> BuildOutcome {
        BuildOutcome::Built {
            document: CodeDocument {
                revision: 0,
                items: names.iter().map(|n| leaf(n)).collect(),
            },
            elements: Arc::new(ElementIndex::new(&SourceFile::default())),
        }
    }

    fn run_generation(cmd: &Cmd) -> Option<u64> {
        cmd.clone().into_vec().into_iter().find_map(|c| match c {
            Cmd::RunOutlineBuild { generation, .. } => Some(generation),
            _ => None,
        })
    }

    fn activated() -> (OutlineModel, u64) {
        let mut model = OutlineModel::default();
        let cmd = activate(&mut model, PathBuf::from("a.cs"), LanguageId::CSharp, "class A {}");
        let generation = run_generation(&cmd).unwrap();
        (model, generation)
    }

    fn complete(model: &mut OutlineModel, generation: u64, outcome: BuildOutcome) -> Cmd {
        update_outline(
            model,
            OutlineMsg::BuildCompleted {
                generation,
                path: PathBuf::from("a.cs"),
                outcome,
            },
        )
    }

    #[test]
    fn test_activation_publishes_placeholder_and_starts_build() {
        let (model, _) = activated();
        assert!(model.document.is_placeholder());
        assert!(matches!(model.scheduler.state, RefreshState::Running { .. }));
    }

    #[test]
    fn test_request_while_running_cancels_and_owes() {
        let (mut model, first) = activated();
        let cmd = request_refresh(&mut model);
        assert!(run_generation(&cmd).is_none());
        assert!(model.scheduler.owed);
        let RefreshState::CancelPending { cancel, .. } = &model.scheduler.state else {
            panic!("expected CancelPending");
        };
        assert!(cancel.is_cancelled());

        // Even a completed result is discarded; the owed build starts
        let cmd = complete(&mut model, first, built(&["A"]));
        assert!(model.document.is_placeholder());
        let second = run_generation(&cmd).unwrap();
        assert!(second > first);
        assert!(!model.scheduler.owed);
    }

    #[test]
    fn test_unchanged_rebuild_does_not_publish() {
        let (mut model, first) = activated();
        complete(&mut model, first, built(&["A"]));
        let revision = model.document.revision;
        assert_eq!(model.cache.get(Path::new("a.cs")).map(|d| d.revision), Some(revision));

        let cmd = request_refresh(&mut model);
        let second = run_generation(&cmd).unwrap();
        let cmd = complete(&mut model, second, built(&["A"]));
        assert!(matches!(cmd, Cmd::None));
        assert_eq!(model.document.revision, revision);
        assert!(model.scheduler.is_idle());
    }

    #[test]
    fn test_empty_outline_collapses_panel_and_restores() {
        let (mut model, first) = activated();
        let cmd = complete(&mut model, first, built(&[]));
        assert!(cmd
            .into_vec()
            .iter()
            .any(|c| matches!(c, Cmd::ResizePanel { width: 0 })));

        let second = run_generation(&request_refresh(&mut model)).unwrap();
        let cmd = complete(&mut model, second, built(&["A"]));
        assert!(cmd
            .into_vec()
            .iter()
            .any(|c| matches!(c, Cmd::ResizePanel { width: 200 })));
    }

    #[test]
    fn test_unknown_generation_is_ignored() {
        let (mut model, first) = activated();
        let cmd = complete(&mut model, first + 10, built(&["A"]));
        assert!(matches!(cmd, Cmd::None));
        assert_eq!(model.scheduler.in_flight(), Some(first));
    }

    #[test]
    fn test_xml_comment_toggle_forces_publish() {
        let (mut model, first) = activated();
        complete(&mut model, first, built(&["A"]));
        let revision = model.document.revision;

        let cmd = update_outline(&mut model, OutlineMsg::SetUseXmlComments(true));
        let second = run_generation(&cmd).unwrap();
        complete(&mut model, second, built(&["A"]));
        assert_eq!(model.document.revision, revision + 1);
        assert!(!model.scheduler.force_publish);
    }
}
