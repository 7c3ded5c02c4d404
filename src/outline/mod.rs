//! Code outline model and construction
//!
//! An outline is a forest of [`CodeItem`]s. Containers (types, namespaces,
//! regions and interface groups) own their members exclusively; nothing is
//! shared between nodes.
//!
//! Construction lives in [`builder`], which combines:
//! - [`mapper`]: one declaration → one item
//! - [`regions`]: folding regions that absorb items by span
//! - [`interfaces`]: groups of members implementing one declared interface

pub mod builder;
pub mod diff;
pub mod interfaces;
pub mod mapper;
pub mod regions;

use std::collections::HashSet;

use serde::Serialize;

pub use builder::{build_outline, BuildOptions, CancelToken, Cancelled};
pub use diff::structurally_equal;

use crate::syntax::{Access, DeclKind, TextSpan};
use crate::theme::{Color, OutlinePalette};

/// Item kind for display and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CodeKind {
    Namespace,
    Class,
    Interface,
    Struct,
    Record,
    Module,
    Enum,
    EnumMember,
    Delegate,
    Method,
    Constructor,
    Destructor,
    Operator,
    Indexer,
    Property,
    Field,
    Constant,
    Event,
    Region,
    InterfaceGroup,
    Placeholder,
}

impl CodeKind {
    /// Short label for rendering in the outline tree
    pub fn label(&self) -> &'static str {
        match self {
            CodeKind::Namespace => "ns",
            CodeKind::Class => "class",
            CodeKind::Interface => "iface",
            CodeKind::Struct => "struct",
            CodeKind::Record => "record",
            CodeKind::Module => "mod",
            CodeKind::Enum => "enum",
            CodeKind::EnumMember => "var",
            CodeKind::Delegate => "delegate",
            CodeKind::Method => "fn",
            CodeKind::Constructor => "ctor",
            CodeKind::Destructor => "dtor",
            CodeKind::Operator => "op",
            CodeKind::Indexer => "this",
            CodeKind::Property => "prop",
            CodeKind::Field => "field",
            CodeKind::Constant => "const",
            CodeKind::Event => "event",
            CodeKind::Region => "region",
            CodeKind::InterfaceGroup => "impl",
            CodeKind::Placeholder => "",
        }
    }

    /// Keyword used in synthesized signatures
    pub fn keyword(&self) -> &'static str {
        match self {
            CodeKind::Namespace => "namespace",
            CodeKind::Class => "class",
            CodeKind::Interface => "interface",
            CodeKind::Struct => "struct",
            CodeKind::Record => "record",
            CodeKind::Module => "module",
            CodeKind::Enum => "enum",
            CodeKind::Delegate => "delegate",
            CodeKind::Event => "event",
            _ => "",
        }
    }
}

impl From<DeclKind> for CodeKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Namespace => CodeKind::Namespace,
            DeclKind::Class => CodeKind::Class,
            DeclKind::Interface => CodeKind::Interface,
            DeclKind::Struct => CodeKind::Struct,
            DeclKind::Record => CodeKind::Record,
            DeclKind::Enum => CodeKind::Enum,
            DeclKind::Delegate => CodeKind::Delegate,
            DeclKind::EnumMember => CodeKind::EnumMember,
            DeclKind::Method => CodeKind::Method,
            DeclKind::Constructor => CodeKind::Constructor,
            DeclKind::Destructor => CodeKind::Destructor,
            DeclKind::Operator => CodeKind::Operator,
            DeclKind::Indexer => CodeKind::Indexer,
            DeclKind::Property => CodeKind::Property,
            DeclKind::Field => CodeKind::Field,
            DeclKind::Constant => CodeKind::Constant,
            DeclKind::Event => CodeKind::Event,
        }
    }
}

/// Mutable presentation state, observed by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisualState {
    pub foreground: Color,
    pub highlighted: bool,
}

impl VisualState {
    pub fn new(palette: &OutlinePalette) -> Self {
        Self {
            foreground: palette.foreground,
            highlighted: false,
        }
    }
}

/// Fields shared by every item variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCore {
    pub id: u32,
    pub name: String,
    /// Unique within one document; join key for diffing and highlighting
    pub full_name: String,
    pub kind: CodeKind,
    pub access: Access,
    pub tooltip: String,
    pub span: TextSpan,
    pub visual: VisualState,
}

/// Container-only state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerItem {
    pub core: ItemCore,
    pub members: Vec<CodeItem>,
    /// Inheritance suffix such as ` : IFoo, IBar`
    pub parameters: String,
    pub border: Color,
}

impl ContainerItem {
    pub fn new(core: ItemCore, palette: &OutlinePalette) -> Self {
        Self {
            core,
            members: Vec::new(),
            parameters: String::new(),
            border: palette.border,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant")]
pub enum CodeItem {
    Leaf(ItemCore),
    /// Types and namespaces
    Container(ContainerItem),
    /// User-delimited folding region
    Region(ContainerItem),
    /// Members implementing one interface
    InterfaceGroup(ContainerItem),
}

impl CodeItem {
    pub fn core(&self) -> &ItemCore {
        match self {
            CodeItem::Leaf(core) => core,
            CodeItem::Container(c) | CodeItem::Region(c) | CodeItem::InterfaceGroup(c) => &c.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut ItemCore {
        match self {
            CodeItem::Leaf(core) => core,
            CodeItem::Container(c) | CodeItem::Region(c) | CodeItem::InterfaceGroup(c) => {
                &mut c.core
            }
        }
    }

    pub fn container(&self) -> Option<&ContainerItem> {
        match self {
            CodeItem::Leaf(_) => None,
            CodeItem::Container(c) | CodeItem::Region(c) | CodeItem::InterfaceGroup(c) => Some(c),
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut ContainerItem> {
        match self {
            CodeItem::Leaf(_) => None,
            CodeItem::Container(c) | CodeItem::Region(c) | CodeItem::InterfaceGroup(c) => Some(c),
        }
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    pub fn full_name(&self) -> &str {
        &self.core().full_name
    }

    pub fn kind(&self) -> CodeKind {
        self.core().kind
    }

    pub fn span(&self) -> TextSpan {
        self.core().span
    }

    pub fn members(&self) -> &[CodeItem] {
        self.container().map(|c| c.members.as_slice()).unwrap_or(&[])
    }

    /// Icon moniker derived from kind and access, e.g. `MethodPrivate`
    pub fn icon(&self) -> String {
        let core = self.core();
        match core.kind {
            CodeKind::Region | CodeKind::InterfaceGroup | CodeKind::Namespace => {
                format!("{:?}", core.kind)
            }
            kind => format!("{:?}{:?}", kind, core.access),
        }
    }

    /// Apply default or highlighted colors
    pub fn set_highlighted(&mut self, highlighted: bool, palette: &OutlinePalette) {
        let core = self.core_mut();
        core.visual.highlighted = highlighted;
        core.visual.foreground = if highlighted {
            palette.highlight_foreground
        } else {
            palette.foreground
        };
        if let Some(container) = self.container_mut() {
            container.border = if highlighted {
                palette.highlight_border
            } else {
                palette.border
            };
        }
    }

    /// Depth-first walk over this item and everything below it
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut CodeItem)) {
        f(self);
        if let Some(container) = self.container_mut() {
            for member in &mut container.members {
                member.walk_mut(f);
            }
        }
    }
}

/// Complete outline for one file
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CodeDocument {
    pub revision: u64,
    pub items: Vec<CodeItem>,
}

impl CodeDocument {
    pub fn empty(revision: u64) -> Self {
        Self {
            revision,
            items: Vec::new(),
        }
    }

    /// Single "Loading…" entry shown until the first build for a file lands
    pub fn loading(palette: &OutlinePalette) -> Self {
        Self {
            revision: 0,
            items: vec![CodeItem::Leaf(ItemCore {
                id: 0,
                name: "Loading…".to_string(),
                full_name: "Loading…".to_string(),
                kind: CodeKind::Placeholder,
                access: Access::Public,
                tooltip: String::new(),
                span: TextSpan::default(),
                visual: VisualState::new(palette),
            })],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.items.as_slice(), [item] if item.kind() == CodeKind::Placeholder)
    }

    /// Depth-first search by exact full name
    pub fn find(&self, full_name: &str) -> Option<&CodeItem> {
        fn find_in<'a>(items: &'a [CodeItem], full_name: &str) -> Option<&'a CodeItem> {
            for item in items {
                if item.full_name() == full_name {
                    return Some(item);
                }
                if let Some(found) = find_in(item.members(), full_name) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&self.items, full_name)
    }

    pub fn walk_mut(&mut self, mut f: impl FnMut(&mut CodeItem)) {
        for item in &mut self.items {
            item.walk_mut(&mut f);
        }
    }

    /// Set highlight state on every item whose full name is in `names`
    pub fn set_highlighted(&mut self, names: &HashSet<&str>, highlighted: bool, palette: &OutlinePalette) {
        self.walk_mut(|item| {
            if names.contains(item.full_name()) {
                item.set_highlighted(highlighted, palette);
            }
        });
    }

    /// Reset every item to the default palette
    pub fn reset_visual_state(&mut self, palette: &OutlinePalette) {
        self.walk_mut(|item| item.set_highlighted(false, palette));
    }

    /// Full names of highlighted items, in tree order
    pub fn highlighted(&self) -> Vec<&str> {
        fn collect<'a>(items: &'a [CodeItem], out: &mut Vec<&'a str>) {
            for item in items {
                if item.core().visual.highlighted {
                    out.push(item.full_name());
                }
                collect(item.members(), out);
            }
        }
        let mut out = Vec::new();
        collect(&self.items, &mut out);
        out
    }

    /// Total number of items at all depths
    pub fn len(&self) -> usize {
        fn count(items: &[CodeItem]) -> usize {
            items.iter().map(|i| 1 + count(i.members())).sum()
        }
        count(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, kind: CodeKind) -> CodeItem {
        CodeItem::Leaf(ItemCore {
            id: 0,
            name: name.to_string(),
            full_name: name.to_string(),
            kind,
            access: Access::Public,
            tooltip: String::new(),
            span: TextSpan::default(),
            visual: VisualState::new(&OutlinePalette::default()),
        })
    }

    fn doc() -> CodeDocument {
        let palette = OutlinePalette::default();
        let mut class = ContainerItem::new(
            match leaf("Foo", CodeKind::Class) {
                CodeItem::Leaf(core) => core,
                _ => unreachable!(),
            },
            &palette,
        );
        class.members.push(leaf("Foo.Bar()", CodeKind::Method));
        CodeDocument {
            revision: 1,
            items: vec![CodeItem::Container(class)],
        }
    }

    #[test]
    fn test_find_depth_first() {
        let doc = doc();
        assert_eq!(doc.find("Foo.Bar()").map(|i| i.kind()), Some(CodeKind::Method));
        assert!(doc.find("Foo.Baz()").is_none());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_highlight_sets_border_on_containers_only() {
        let palette = OutlinePalette::default();
        let mut doc = doc();
        let names: HashSet<&str> = ["Foo", "Foo.Bar()"].into_iter().collect();
        doc.set_highlighted(&names, true, &palette);

        let class = doc.items[0].container().unwrap();
        assert_eq!(class.border, palette.highlight_border);
        assert_eq!(class.core.visual.foreground, palette.highlight_foreground);
        assert_eq!(doc.highlighted(), vec!["Foo", "Foo.Bar()"]);

        doc.reset_visual_state(&palette);
        assert!(doc.highlighted().is_empty());
        assert_eq!(doc.items[0].container().unwrap().border, palette.border);
    }

    #[test]
    fn test_loading_placeholder() {
        let doc = CodeDocument::loading(&OutlinePalette::default());
        assert!(doc.is_placeholder());
        assert!(!CodeDocument::empty(0).is_placeholder());
    }

    #[test]
    fn test_icon_moniker() {
        assert_eq!(leaf("x", CodeKind::Method).icon(), "MethodPublic");
        assert_eq!(leaf("r", CodeKind::Region).icon(), "Region");
    }
}
