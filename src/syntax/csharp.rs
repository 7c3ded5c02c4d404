//! C# declaration normalizer
//!
//! Walks a tree-sitter-c-sharp tree and produces [`Declaration`]s. Only
//! declarations are visited; method bodies are never entered.

use tree_sitter::Node;

use super::{
    collapse_whitespace, node_span, node_text, scan_region_markers, strip_tags,
    type_parameter_names, Access, BaseRole, BaseType, DeclKind, Declaration, FoldingRegion,
    Parameter, TextSpan,
};

/// Where a declaration sits; drives the default accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    TopLevel,
    Type,
    Interface,
    Enum,
}

/// Normalize a `compilation_unit`
pub fn normalize(root: Node, source: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut file_namespace: Option<Declaration> = None;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "file_scoped_namespace_declaration" {
            if let Some(name) = child.child_by_field_name("name") {
                // Everything after `namespace X;` belongs to X
                let span = TextSpan::new(child.start_byte(), root.end_byte());
                let ns = Declaration::new(DeclKind::Namespace, node_text(&name, source), span);
                file_namespace = Some(ns);
            }
            // Older grammars nest the members inside the node itself
            collect_declarations(child, source, Scope::TopLevel, &mut declarations);
            continue;
        }
        if let Some(decl) = map_declaration(child, source, Scope::TopLevel) {
            declarations.extend(decl);
        }
    }

    match file_namespace {
        Some(mut ns) => {
            ns.members = declarations;
            vec![ns]
        }
        None => declarations,
    }
}

/// Folding regions delimited by `#region` / `#endregion`
pub fn scan_regions(source: &str) -> Vec<FoldingRegion> {
    scan_region_markers(
        source,
        |line| {
            let rest = line.strip_prefix('#')?.trim_start();
            let title = rest.strip_prefix("region")?;
            if title.starts_with(|c: char| c.is_alphanumeric()) {
                return None;
            }
            Some(title.trim().to_string())
        },
        |line| {
            line.strip_prefix('#')
                .map(|rest| rest.trim_start().starts_with("endregion"))
                .unwrap_or(false)
        },
    )
}

fn collect_declarations(node: Node, source: &str, scope: Scope, out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(decls) = map_declaration(child, source, scope) {
            out.extend(decls);
        }
    }
}

/// Map one syntax node; field declarations can yield several declarations
fn map_declaration(node: Node, source: &str, scope: Scope) -> Option<Vec<Declaration>> {
    let decl = match node.kind() {
        "namespace_declaration" => {
            let name = node.child_by_field_name("name")?;
            let mut ns =
                Declaration::new(DeclKind::Namespace, node_text(&name, source), node_span(&node));
            if let Some(body) = node.child_by_field_name("body") {
                collect_declarations(body, source, Scope::TopLevel, &mut ns.members);
            }
            ns
        }
        "class_declaration" => type_declaration(node, source, DeclKind::Class, scope)?,
        "struct_declaration" => type_declaration(node, source, DeclKind::Struct, scope)?,
        "interface_declaration" => type_declaration(node, source, DeclKind::Interface, scope)?,
        "record_declaration" | "record_struct_declaration" => {
            type_declaration(node, source, DeclKind::Record, scope)?
        }
        "enum_declaration" => type_declaration(node, source, DeclKind::Enum, scope)?,
        "enum_member_declaration" => {
            let name = node.child_by_field_name("name").or_else(|| first_identifier(node))?;
            let mut member =
                Declaration::new(DeclKind::EnumMember, node_text(&name, source), node_span(&node));
            member.access = Access::Public;
            member.doc_comment = doc_comment(node, source);
            member
        }
        "delegate_declaration" => {
            let mut decl = member(node, source, DeclKind::Delegate, scope)?;
            decl.return_type = field_text(node, "type", source);
            decl
        }
        "method_declaration" => {
            let mut decl = member(node, source, DeclKind::Method, scope)?;
            decl.return_type =
                field_text(node, "returns", source).or_else(|| field_text(node, "type", source));
            decl
        }
        "constructor_declaration" => member(node, source, DeclKind::Constructor, scope)?,
        "destructor_declaration" => {
            let mut decl = member(node, source, DeclKind::Destructor, scope)?;
            decl.name = format!("~{}", decl.name);
            decl
        }
        "operator_declaration" | "conversion_operator_declaration" => {
            operator_declaration(node, source, scope)
        }
        "indexer_declaration" => {
            let mut decl = Declaration::new(DeclKind::Indexer, "this", node_span(&node));
            apply_modifiers(&mut decl, node, source, scope);
            decl.return_type = field_text(node, "type", source);
            decl.explicit_interface = explicit_interface(node, source);
            decl.parameters = parameters(node, source);
            decl.doc_comment = doc_comment(node, source);
            decl
        }
        "property_declaration" | "event_declaration" => {
            let kind = if node.kind() == "event_declaration" {
                DeclKind::Event
            } else {
                DeclKind::Property
            };
            let mut decl = member(node, source, kind, scope)?;
            decl.return_type = field_text(node, "type", source);
            decl
        }
        "field_declaration" | "event_field_declaration" => {
            return Some(field_declarations(node, source, scope));
        }
        _ => return None,
    };
    Some(vec![decl])
}

fn type_declaration(node: Node, source: &str, kind: DeclKind, scope: Scope) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(kind, node_text(&name, source), node_span(&node));
    decl.type_parameters = type_parameter_names(&node, source);
    apply_modifiers(&mut decl, node, source, scope);
    decl.doc_comment = doc_comment(node, source);
    decl.bases = base_list(node, source);

    let body_scope = match kind {
        DeclKind::Interface => Scope::Interface,
        DeclKind::Enum => Scope::Enum,
        _ => Scope::Type,
    };
    let body = node.child_by_field_name("body").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "declaration_list" || c.kind() == "enum_member_declaration_list");
        found
    });
    if let Some(body) = body {
        collect_declarations(body, source, body_scope, &mut decl.members);
    }
    Some(decl)
}

/// Named member with a parameter list (methods, constructors, properties, ...)
fn member(node: Node, source: &str, kind: DeclKind, scope: Scope) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(kind, node_text(&name, source), node_span(&node));
    decl.type_parameters = type_parameter_names(&node, source);
    apply_modifiers(&mut decl, node, source, scope);
    decl.explicit_interface = explicit_interface(node, source);
    decl.parameters = parameters(node, source);
    decl.doc_comment = doc_comment(node, source);
    Some(decl)
}

fn operator_declaration(node: Node, source: &str, scope: Scope) -> Declaration {
    let name = if node.kind() == "conversion_operator_declaration" {
        let target = field_text(node, "type", source).unwrap_or_default();
        format!("operator {}", target)
    } else {
        let op = node
            .child_by_field_name("operator")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_default();
        format!("operator {}", op)
    };
    let mut decl = Declaration::new(DeclKind::Operator, name.trim_end(), node_span(&node));
    apply_modifiers(&mut decl, node, source, scope);
    decl.return_type = field_text(node, "type", source);
    decl.parameters = parameters(node, source);
    decl.doc_comment = doc_comment(node, source);
    decl
}

/// `int a, b;` and `event EventHandler A, B;` declare one member per declarator
fn field_declarations(node: Node, source: &str, scope: Scope) -> Vec<Declaration> {
    let mut template = Declaration::new(DeclKind::Field, "", node_span(&node));
    apply_modifiers(&mut template, node, source, scope);
    template.doc_comment = doc_comment(node, source);
    if node.kind() == "event_field_declaration" {
        template.kind = DeclKind::Event;
    } else if template.has_modifier("const") {
        template.kind = DeclKind::Constant;
    }

    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "variable_declaration" {
            continue;
        }
        let ty = field_text(child, "type", source);
        let mut inner = child.walk();
        for declarator in child.named_children(&mut inner) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = declarator
                .child_by_field_name("name")
                .or_else(|| first_identifier(declarator))
            else {
                continue;
            };
            let mut decl = template.clone();
            decl.name = node_text(&name, source).to_string();
            decl.return_type = ty.clone();
            out.push(decl);
        }
    }
    out
}

fn apply_modifiers(decl: &mut Declaration, node: Node, source: &str, scope: Scope) {
    let mut keywords = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifier" {
            keywords.push(node_text(&child, source).to_string());
        }
    }

    let has = |k: &str| keywords.iter().any(|m| m == k);
    decl.access = if has("public") {
        Access::Public
    } else if has("protected") && has("internal") {
        Access::ProtectedInternal
    } else if has("private") && has("protected") {
        Access::PrivateProtected
    } else if has("protected") {
        Access::Protected
    } else if has("internal") {
        Access::Internal
    } else if has("private") {
        Access::Private
    } else {
        match scope {
            Scope::TopLevel => Access::Internal,
            Scope::Interface | Scope::Enum => Access::Public,
            Scope::Type => Access::Private,
        }
    };

    decl.modifiers = keywords
        .into_iter()
        .filter(|k| !matches!(k.as_str(), "public" | "protected" | "internal" | "private"))
        .collect();
}

fn base_list(node: Node, source: &str) -> Vec<BaseType> {
    let mut bases = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "base_list" {
            continue;
        }
        let mut inner = child.walk();
        for entry in child.named_children(&mut inner) {
            let ty = match entry.kind() {
                "argument_list" => continue,
                // `class B(int x) : A(x)` wraps the base type
                "primary_constructor_base_type" => {
                    let mut c = entry.walk();
                    let first = entry.named_children(&mut c).next();
                    match first {
                        Some(first) => first,
                        None => continue,
                    }
                }
                _ => entry,
            };
            bases.push(BaseType {
                name: collapse_whitespace(node_text(&ty, source)),
                role: BaseRole::Unspecified,
            });
        }
    }
    bases
}

fn parameters(node: Node, source: &str) -> Vec<Parameter> {
    let list = node.child_by_field_name("parameters").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "parameter_list" | "bracketed_parameter_list"));
        found
    });
    let Some(list) = list else {
        return Vec::new();
    };

    let mut params = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        if param.kind() != "parameter" {
            continue;
        }
        let name_node = param.child_by_field_name("name");
        let ty = field_text(param, "type", source)
            .or_else(|| {
                // Fall back to the text between modifiers and the name
                let end = name_node?.start_byte();
                let text = source.get(param.start_byte()..end)?;
                let ty = text
                    .split_whitespace()
                    .filter(|w| !matches!(*w, "this" | "ref" | "out" | "in" | "params" | "scoped"))
                    .collect::<Vec<_>>()
                    .join(" ");
                (!ty.is_empty()).then_some(ty)
            })
            .unwrap_or_default();
        let name = name_node
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_default();
        params.push(Parameter { ty, name });
    }
    params
}

fn explicit_interface(node: Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let spec = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "explicit_interface_specifier")?;
    let text = node_text(&spec, source).trim().trim_end_matches('.').trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn field_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| collapse_whitespace(node_text(&n, source)))
        .filter(|t| !t.is_empty())
}

fn first_identifier(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "identifier");
    found
}

/// `///` comment block directly above the declaration
fn doc_comment(node: Node, source: &str) -> Option<String> {
    let mut lines = Vec::new();
    let mut current = node.prev_sibling();
    let mut next_start_row = node.start_position().row;
    while let Some(comment) = current {
        if comment.kind() != "comment" || comment.end_position().row + 1 < next_start_row {
            break;
        }
        let text = node_text(&comment, source).trim();
        let Some(body) = text.strip_prefix("///") else {
            break;
        };
        lines.push(body.to_string());
        next_start_row = comment.start_position().row;
        current = comment.prev_sibling();
    }
    if lines.is_empty() {
        return None;
    }
    lines.reverse();
    xml_doc_text(&lines.join("\n"))
}

/// Summary text of an XML documentation comment
pub fn xml_doc_text(xml: &str) -> Option<String> {
    let summary = match (xml.find("<summary>"), xml.find("</summary>")) {
        (Some(start), Some(end)) if start < end => &xml[start + "<summary>".len()..end],
        _ => xml,
    };
    let text = collapse_whitespace(&strip_tags(summary));
    (!text.is_empty()).then_some(text)
}
