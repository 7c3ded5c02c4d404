//! Declaration → outline item conversion
//!
//! Pure functions; the only state is the id counter carried by
//! [`MapContext`]. Nested types are turned into empty containers here and
//! filled by the builder.

use super::{BuildOptions, CodeItem, CodeKind, ContainerItem, ItemCore, VisualState};
use crate::syntax::{compact, Access, DeclKind, Declaration, TextSpan};

/// Per-build mapping state
pub struct MapContext<'a> {
    pub options: &'a BuildOptions,
    next_id: u32,
}

impl<'a> MapContext<'a> {
    pub fn new(options: &'a BuildOptions) -> Self {
        Self {
            options,
            next_id: 1,
        }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Core for a synthetic item (region or interface group)
    pub fn synthetic_core(
        &mut self,
        name: &str,
        full_name: String,
        kind: CodeKind,
        span: TextSpan,
    ) -> ItemCore {
        ItemCore {
            id: self.next_id(),
            name: name.to_string(),
            full_name,
            kind,
            access: Access::Public,
            tooltip: name.to_string(),
            span,
            visual: VisualState::new(&self.options.palette),
        }
    }
}

/// Map an executable or data member to a leaf item.
///
/// Returns `None` for declarations the outline does not show as leaves:
/// types and namespaces (use [`map_container`]) and nameless declarations
/// left behind by syntax errors.
pub fn map_member(decl: &Declaration, parent: &str, ctx: &mut MapContext) -> Option<CodeItem> {
    if decl.kind.is_type() || decl.kind == DeclKind::Namespace || decl.name.is_empty() {
        return None;
    }
    Some(CodeItem::Leaf(core(decl, parent, ctx)))
}

/// Map a type or namespace to an empty container
pub fn map_container(
    decl: &Declaration,
    parent: &str,
    ctx: &mut MapContext,
) -> Option<ContainerItem> {
    if !(decl.kind.is_type() || decl.kind == DeclKind::Namespace) || decl.name.is_empty() {
        return None;
    }
    let mut container = ContainerItem::new(core(decl, parent, ctx), &ctx.options.palette);
    container.parameters = inheritance_suffix(decl);
    Some(container)
}

fn core(decl: &Declaration, parent: &str, ctx: &mut MapContext) -> ItemCore {
    ItemCore {
        id: ctx.next_id(),
        name: display_name(decl),
        full_name: decl.full_name(parent),
        kind: decl.kind.into(),
        access: decl.access,
        tooltip: tooltip(decl, ctx.options),
        span: decl.span,
        visual: VisualState::new(&ctx.options.palette),
    }
}

/// Name shown in the tree: invocables carry their parameter types
fn display_name(decl: &Declaration) -> String {
    let mut name = String::new();
    if let Some(iface) = &decl.explicit_interface {
        name.push_str(&compact(iface));
        name.push('.');
    }
    name.push_str(&decl.name);
    name.push_str(&decl.generic_suffix());
    if decl.kind == DeclKind::Indexer {
        let types = decl.parameter_types();
        name.push('[');
        name.push_str(&types[1..types.len() - 1]);
        name.push(']');
    } else if decl.kind.is_invocable() {
        name.push_str(&decl.parameter_types());
    }
    name
}

/// ` : Base, IFoo` or empty
pub fn inheritance_suffix(decl: &Declaration) -> String {
    if decl.bases.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = decl.bases.iter().map(|b| b.name.as_str()).collect();
    format!(" : {}", names.join(", "))
}

pub fn tooltip(decl: &Declaration, options: &BuildOptions) -> String {
    if options.use_xml_comments {
        if let Some(doc) = decl.doc_comment.as_deref().filter(|d| !d.is_empty()) {
            return doc.to_string();
        }
    }
    signature(decl)
}

/// Synthesized one-line signature, e.g. `public static int Parse(string text)`
pub fn signature(decl: &Declaration) -> String {
    let mut parts: Vec<String> = Vec::new();
    let access = decl.access.keyword();
    if !access.is_empty() {
        parts.push(access.to_string());
    }
    parts.extend(decl.modifiers.iter().cloned());
    let keyword = CodeKind::from(decl.kind).keyword();
    if !keyword.is_empty() {
        parts.push(keyword.to_string());
    }
    if let Some(ty) = &decl.return_type {
        parts.push(ty.clone());
    }

    let mut name = String::new();
    if let Some(iface) = &decl.explicit_interface {
        name.push_str(iface);
        name.push('.');
    }
    name.push_str(&decl.name);
    if !decl.type_parameters.is_empty() {
        name.push('<');
        name.push_str(&decl.type_parameters.join(", "));
        name.push('>');
    }
    match decl.kind {
        DeclKind::Indexer => {
            name.push('[');
            name.push_str(&parameter_list(decl));
            name.push(']');
        }
        kind if kind.is_invocable() => {
            name.push('(');
            name.push_str(&parameter_list(decl));
            name.push(')');
        }
        _ => {}
    }
    parts.push(name);

    let mut signature = parts.join(" ");
    signature.push_str(&inheritance_suffix(decl));
    signature
}

fn parameter_list(decl: &Declaration) -> String {
    decl.parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}
