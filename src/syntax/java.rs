//! Java declaration normalizer
//!
//! Walks a tree-sitter-java tree and produces [`Declaration`]s.

use tree_sitter::Node;

use super::{
    collapse_whitespace, node_span, node_text, scan_region_markers, strip_tags,
    type_parameter_names, Access, BaseRole, BaseType, DeclKind, Declaration, FoldingRegion,
    Parameter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Type,
    Interface,
}

/// Normalize a `program`
pub fn normalize(root: Node, source: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    collect_declarations(root, source, Scope::Type, &mut declarations);
    declarations
}

/// Name from `package a.b.c;`, if any
pub fn package_name(root: Node, source: &str) -> Option<String> {
    let mut cursor = root.walk();
    let package = root
        .named_children(&mut cursor)
        .find(|c| c.kind() == "package_declaration")?;
    let mut inner = package.walk();
    let name = package
        .named_children(&mut inner)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
        .map(|n| node_text(&n, source).to_string());
    name
}

/// Folding regions from `//region Title` / `//endregion` and NetBeans-style
/// `// <editor-fold desc="Title">` / `// </editor-fold>` markers
pub fn scan_regions(source: &str) -> Vec<FoldingRegion> {
    scan_region_markers(
        source,
        |line| {
            let comment = line.strip_prefix("//")?.trim_start();
            if let Some(title) = comment.strip_prefix("region") {
                if title.starts_with(|c: char| c.is_alphanumeric()) {
                    return None;
                }
                return Some(title.trim().to_string());
            }
            let fold = comment.strip_prefix("<editor-fold")?;
            let desc = fold
                .find("desc=\"")
                .and_then(|start| {
                    let rest = &fold[start + "desc=\"".len()..];
                    rest.find('"').map(|end| rest[..end].to_string())
                })
                .unwrap_or_default();
            Some(desc)
        },
        |line| {
            line.strip_prefix("//")
                .map(|c| {
                    let c = c.trim_start();
                    c.starts_with("endregion") || c.starts_with("</editor-fold")
                })
                .unwrap_or(false)
        },
    )
}

fn collect_declarations(node: Node, source: &str, scope: Scope, out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "field_declaration" | "constant_declaration" => {
                out.extend(field_declarations(child, source, scope));
            }
            // Enum constants and the members after them share the enum body
            "enum_body_declarations" => collect_declarations(child, source, scope, out),
            _ => {
                if let Some(decl) = map_declaration(child, source, scope) {
                    out.push(decl);
                }
            }
        }
    }
}

fn map_declaration(node: Node, source: &str, scope: Scope) -> Option<Declaration> {
    let decl = match node.kind() {
        "class_declaration" => type_declaration(node, source, DeclKind::Class, scope)?,
        "interface_declaration" | "annotation_type_declaration" => {
            type_declaration(node, source, DeclKind::Interface, scope)?
        }
        "enum_declaration" => type_declaration(node, source, DeclKind::Enum, scope)?,
        "record_declaration" => type_declaration(node, source, DeclKind::Record, scope)?,
        "enum_constant" => {
            let name = node.child_by_field_name("name")?;
            let mut decl =
                Declaration::new(DeclKind::EnumMember, node_text(&name, source), node_span(&node));
            decl.access = Access::Public;
            decl.doc_comment = doc_comment(node, source);
            decl
        }
        "method_declaration" => {
            let mut decl = member(node, source, DeclKind::Method, scope)?;
            decl.return_type = field_text(node, "type", source);
            decl
        }
        "constructor_declaration" | "compact_constructor_declaration" => {
            member(node, source, DeclKind::Constructor, scope)?
        }
        _ => return None,
    };
    Some(decl)
}

fn type_declaration(node: Node, source: &str, kind: DeclKind, scope: Scope) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(kind, node_text(&name, source), node_span(&node));
    decl.type_parameters = type_parameter_names(&node, source);
    apply_modifiers(&mut decl, node, source, scope);
    decl.doc_comment = doc_comment(node, source);

    if let Some(superclass) = node.child_by_field_name("superclass") {
        decl.bases.extend(type_list(superclass, source, BaseRole::Extends));
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "super_interfaces" => decl
                .bases
                .extend(type_list(child, source, BaseRole::Implements)),
            // `interface A extends B` inherits interfaces
            "extends_interfaces" => decl
                .bases
                .extend(type_list(child, source, BaseRole::Implements)),
            _ => {}
        }
    }

    let body_scope = if kind == DeclKind::Interface {
        Scope::Interface
    } else {
        Scope::Type
    };
    if let Some(body) = node.child_by_field_name("body") {
        collect_declarations(body, source, body_scope, &mut decl.members);
    }
    Some(decl)
}

/// Types named by `extends X` / `implements A, B`
fn type_list(node: Node, source: &str, role: BaseRole) -> Vec<BaseType> {
    let mut types = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            let mut inner = child.walk();
            for ty in child.named_children(&mut inner) {
                types.push(BaseType {
                    name: collapse_whitespace(node_text(&ty, source)),
                    role,
                });
            }
        } else {
            types.push(BaseType {
                name: collapse_whitespace(node_text(&child, source)),
                role,
            });
        }
    }
    types
}

fn member(node: Node, source: &str, kind: DeclKind, scope: Scope) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(kind, node_text(&name, source), node_span(&node));
    decl.type_parameters = type_parameter_names(&node, source);
    apply_modifiers(&mut decl, node, source, scope);
    decl.parameters = parameters(node, source);
    decl.doc_comment = doc_comment(node, source);
    Some(decl)
}

fn field_declarations(node: Node, source: &str, scope: Scope) -> Vec<Declaration> {
    let mut template = Declaration::new(DeclKind::Field, "", node_span(&node));
    apply_modifiers(&mut template, node, source, scope);
    template.doc_comment = doc_comment(node, source);
    template.return_type = field_text(node, "type", source);
    if node.kind() == "constant_declaration"
        || (template.has_modifier("static") && template.has_modifier("final"))
    {
        template.kind = DeclKind::Constant;
    }

    let mut out = Vec::new();
    let mut cursor = node.walk();
    for declarator in node.children_by_field_name("declarator", &mut cursor) {
        let Some(name) = declarator.child_by_field_name("name") else {
            continue;
        };
        let mut decl = template.clone();
        decl.name = node_text(&name, source).to_string();
        out.push(decl);
    }
    out
}

fn apply_modifiers(decl: &mut Declaration, node: Node, source: &str, scope: Scope) {
    let mut keywords = Vec::new();
    let mut cursor = node.walk();
    let modifiers = node
        .children(&mut cursor)
        .find(|c| c.kind() == "modifiers");
    if let Some(modifiers) = modifiers {
        let mut inner = modifiers.walk();
        for child in modifiers.children(&mut inner) {
            if matches!(child.kind(), "marker_annotation" | "annotation") {
                continue;
            }
            keywords.push(node_text(&child, source).to_string());
        }
    }

    let has = |k: &str| keywords.iter().any(|m| m == k);
    decl.access = if has("public") {
        Access::Public
    } else if has("protected") {
        Access::Protected
    } else if has("private") {
        Access::Private
    } else if scope == Scope::Interface {
        Access::Public
    } else {
        Access::Package
    };

    decl.modifiers = keywords
        .into_iter()
        .filter(|k| !matches!(k.as_str(), "public" | "protected" | "private"))
        .collect();
}

fn parameters(node: Node, source: &str) -> Vec<Parameter> {
    let Some(list) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => params.push(Parameter {
                ty: field_text(param, "type", source).unwrap_or_default(),
                name: field_text(param, "name", source).unwrap_or_default(),
            }),
            "spread_parameter" => {
                let mut inner = param.walk();
                let mut ty = String::new();
                let mut name = String::new();
                for child in param.named_children(&mut inner) {
                    match child.kind() {
                        "modifiers" => {}
                        "variable_declarator" => {
                            name = field_text(child, "name", source).unwrap_or_default();
                        }
                        _ if ty.is_empty() => ty = node_text(&child, source).to_string(),
                        _ => {}
                    }
                }
                params.push(Parameter {
                    ty: format!("{}...", ty),
                    name,
                });
            }
            _ => {}
        }
    }
    params
}

fn field_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| collapse_whitespace(node_text(&n, source)))
        .filter(|t| !t.is_empty())
}

/// `/** ... */` comment directly above the declaration
fn doc_comment(node: Node, source: &str) -> Option<String> {
    let comment = node.prev_sibling()?;
    if !matches!(comment.kind(), "block_comment" | "comment") {
        return None;
    }
    let text = node_text(&comment, source);
    if !text.starts_with("/**") {
        return None;
    }
    javadoc_text(text)
}

/// Description part of a Javadoc comment (everything before the first block tag)
pub fn javadoc_text(comment: &str) -> Option<String> {
    let body = comment
        .trim()
        .trim_start_matches("/**")
        .trim_end_matches("*/");

    let mut description = Vec::new();
    for line in body.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if line.starts_with('@') {
            break;
        }
        description.push(line);
    }

    let joined = description.join(" ");
    let text = collapse_whitespace(&strip_tags(&inline_tags(&joined)));
    (!text.is_empty()).then_some(text)
}

/// `{@code x}` / `{@link Foo#bar}` → `x` / `Foo#bar`
fn inline_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{@") {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let inner = &rest[start + 2..start + len];
        let value = inner.split_once(char::is_whitespace).map(|(_, v)| v).unwrap_or("");
        out.push_str(value.trim());
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Option<String>, Vec<Declaration>) {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .expect("set java parser");
        let tree = parser.parse(source, None).expect("parse java");
        (
            package_name(tree.root_node(), source),
            normalize(tree.root_node(), source),
        )
    }

    #[test]
    fn test_class_with_members() {
        let source = r#"
package demo.app;

public class Service extends Base implements Runnable, Comparable<Service> {
    private int count, total;
    static final String NAME = "svc";
    public Service() {}
    public void run() {}
    int compareTo(Service other) { return 0; }
}
"#;
        let (package, decls) = parse(source);
        assert_eq!(package.as_deref(), Some("demo.app"));
        let class = &decls[0];
        assert_eq!(class.kind, DeclKind::Class);
        assert_eq!(class.access, Access::Public);

        let bases: Vec<(&str, BaseRole)> = class
            .bases
            .iter()
            .map(|b| (b.name.as_str(), b.role))
            .collect();
        assert_eq!(
            bases,
            vec![
                ("Base", BaseRole::Extends),
                ("Runnable", BaseRole::Implements),
                ("Comparable<Service>", BaseRole::Implements),
            ]
        );

        let names: Vec<&str> = class.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["count", "total", "NAME", "Service", "run", "compareTo"]
        );
        assert_eq!(class.members[2].kind, DeclKind::Constant);
        assert_eq!(class.members[5].access, Access::Package);
        assert_eq!(class.members[5].parameters[0].ty, "Service");
    }

    #[test]
    fn test_interface_methods_are_public() {
        let (_, decls) = parse("interface Shape { double area(); }");
        assert_eq!(decls[0].kind, DeclKind::Interface);
        assert_eq!(decls[0].members[0].access, Access::Public);
    }

    #[test]
    fn test_enum_constants_and_body() {
        let (_, decls) = parse("enum Level { LOW, HIGH; int weight() { return 1; } }");
        let names: Vec<&str> = decls[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["LOW", "HIGH", "weight"]);
    }

    #[test]
    fn test_generic_class_and_method() {
        let (_, decls) =
            parse("class Box<T extends Comparable<T>> { <R> R map(T value) { return null; } }");
        assert_eq!(decls[0].type_parameters, vec!["T"]);
        assert_eq!(decls[0].members[0].type_parameters, vec!["R"]);
        assert_eq!(decls[0].members[0].full_name("Box<T>"), "Box<T>.map<R>(T)");
    }

    #[test]
    fn test_javadoc_description() {
        let comment = "/**\n * Runs the {@code job} now.\n *\n * @param job the job\n */";
        assert_eq!(javadoc_text(comment).as_deref(), Some("Runs the job now."));
    }

    #[test]
    fn test_scan_regions() {
        let source = "class A {\n  //region Getters\n  int a() { return 1; }\n  //endregion\n  // <editor-fold desc=\"Setup\">\n  void b() {}\n  // </editor-fold>\n}\n";
        let titles: Vec<String> = scan_regions(source).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Getters", "Setup"]);
    }
}
