//! Caret-to-outline highlight tracking
//!
//! Runs synchronously on every caret move and only touches visual state.

use std::collections::HashSet;

use crate::commands::Cmd;
use crate::messages::CaretMsg;
use crate::model::{OutlineModel, Position};
use crate::syntax::ElementLocator;

/// Handle caret messages
pub fn update_caret(model: &mut OutlineModel, msg: CaretMsg) -> Cmd {
    match msg {
        CaretMsg::Moved(position) => on_caret_moved(model, position),
    }
}

/// Highlight the element enclosing `position` and all of its ancestors.
///
/// No-op until the active document has been parsed at least once.
pub fn on_caret_moved(model: &mut OutlineModel, position: Position) -> Cmd {
    let (Some(active), Some(elements)) = (&model.active, model.elements.clone()) else {
        return Cmd::None;
    };
    let offset = active.offset_of(position);

    let chain = match elements.element_at(offset) {
        Some(element) => elements.ancestor_chain(element),
        None => Vec::new(),
    };
    set_highlight_chain(model, chain)
}

/// Replace the highlighted set with `chain`, restoring previous items
pub fn set_highlight_chain(model: &mut OutlineModel, chain: Vec<String>) -> Cmd {
    if chain == model.highlighted {
        return Cmd::None;
    }

    let previous: HashSet<&str> = model.highlighted.iter().map(String::as_str).collect();
    model
        .document
        .set_highlighted(&previous, false, &model.palette);

    let next: HashSet<&str> = chain.iter().map(String::as_str).collect();
    model.document.set_highlighted(&next, true, &model.palette);

    tracing::trace!("Highlight chain: {:?}", chain);
    model.highlighted = chain;
    Cmd::Redraw
}

/// Apply the stored chain to a freshly published document
pub(crate) fn reapply_highlight(model: &mut OutlineModel) {
    if model.highlighted.is_empty() {
        return;
    }
    let names: HashSet<&str> = model.highlighted.iter().map(String::as_str).collect();
    model.document.set_highlighted(&names, true, &model.palette);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{CodeDocument, CodeItem, CodeKind, ContainerItem, ItemCore, VisualState};
    use crate::syntax::{Access, TextSpan};

    fn core(name: &str, kind: CodeKind) -> ItemCore {
        ItemCore {
            id: 0,
            name: name.to_string(),
            full_name: name.to_string(),
            kind,
            access: Access::Public,
            tooltip: String::new(),
            span: TextSpan::default(),
            visual: VisualState::new(&Default::default()),
        }
    }

    fn model() -> OutlineModel {
        let mut model = OutlineModel::default();
        let mut class = ContainerItem::new(core("Foo", CodeKind::Class), &model.palette);
        class.members = vec![
            CodeItem::Leaf(core("Foo.A()", CodeKind::Method)),
            CodeItem::Leaf(core("Foo.B()", CodeKind::Method)),
        ];
        model.document = CodeDocument {
            revision: 1,
            items: vec![CodeItem::Container(class)],
        };
        model
    }

    #[test]
    fn test_chain_replaces_previous_highlight() {
        let mut model = model();
        set_highlight_chain(&mut model, vec!["Foo.A()".into(), "Foo".into()]);
        assert_eq!(model.document.highlighted(), vec!["Foo", "Foo.A()"]);

        set_highlight_chain(&mut model, vec!["Foo.B()".into(), "Foo".into()]);
        assert_eq!(model.document.highlighted(), vec!["Foo", "Foo.B()"]);
        let a = model.document.find("Foo.A()").unwrap();
        assert_eq!(a.core().visual.foreground, model.palette.foreground);
    }

    #[test]
    fn test_empty_chain_clears() {
        let mut model = model();
        set_highlight_chain(&mut model, vec!["Foo".into()]);
        let cmd = set_highlight_chain(&mut model, Vec::new());
        assert!(matches!(cmd, Cmd::Redraw));
        assert!(model.document.highlighted().is_empty());
    }

    #[test]
    fn test_same_chain_is_noop() {
        let mut model = model();
        set_highlight_chain(&mut model, vec!["Foo".into()]);
        assert!(matches!(
            set_highlight_chain(&mut model, vec!["Foo".into()]),
            Cmd::None
        ));
    }

    #[test]
    fn test_caret_without_parsed_elements_is_noop() {
        let mut model = model();
        assert!(matches!(
            on_caret_moved(&mut model, Position::new(0, 0)),
            Cmd::None
        ));
    }
}
