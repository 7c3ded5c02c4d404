//! Syntax layer
//!
//! Normalizes parse trees from the supported dialects into one declaration
//! shape and exposes the queries the outline needs from a semantic model:
//!
//! - [`SemanticModel`]: interface checks and implementation matching
//! - [`RegionSource`]: folding regions inside a span
//! - [`ElementLocator`]: innermost declaration at an offset and its parents
//!
//! ## Architecture
//!
//! ```text
//! source text → ParserState (tree-sitter, per dialect)
//!             → csharp::normalize / java::normalize → SourceFile
//!             → FileSemantics + ElementIndex
//! ```

pub mod csharp;
mod elements;
pub mod java;
mod languages;
mod parser;
mod semantics;

use std::collections::HashMap;
use std::path::PathBuf;

pub use elements::{ElementId, ElementIndex};
pub use languages::LanguageId;
pub use parser::{ParseError, ParserState};
pub use semantics::FileSemantics;

/// Byte range `[start, end)` in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Smallest span covering both
    pub fn cover(&self, other: TextSpan) -> TextSpan {
        TextSpan::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Declaration kinds shared by all dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Namespace,
    Class,
    Interface,
    Struct,
    Record,
    Enum,
    Delegate,
    EnumMember,
    Method,
    Constructor,
    Destructor,
    Operator,
    Indexer,
    Property,
    Field,
    Constant,
    Event,
}

impl DeclKind {
    /// Kinds whose declarations own a member list
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclKind::Class
                | DeclKind::Interface
                | DeclKind::Struct
                | DeclKind::Record
                | DeclKind::Enum
        )
    }

    /// Kinds whose full name carries the parameter list
    pub fn is_invocable(&self) -> bool {
        matches!(
            self,
            DeclKind::Method
                | DeclKind::Constructor
                | DeclKind::Destructor
                | DeclKind::Operator
                | DeclKind::Indexer
                | DeclKind::Delegate
        )
    }
}

/// Declared accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Access {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    /// Java's default (package-private) access
    Package,
    Private,
}

impl Access {
    pub fn keyword(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Internal => "internal",
            Access::ProtectedInternal => "protected internal",
            Access::PrivateProtected => "private protected",
            Access::Package => "",
            Access::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

/// How a base-list entry was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRole {
    /// `extends` in Java
    Extends,
    /// `implements` in Java
    Implements,
    /// C# base lists mix classes and interfaces
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseType {
    pub name: String,
    pub role: BaseRole,
}

/// One declaration, normalized from either dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    /// Generic parameter names, `["K", "V"]` for `Map<K, V>`
    pub type_parameters: Vec<String>,
    /// Earlier siblings with the same full name (repeated `partial` parts)
    pub occurrence: usize,
    pub access: Access,
    /// Non-access modifiers in source order (`static`, `abstract`, ...)
    pub modifiers: Vec<String>,
    pub span: TextSpan,
    pub parameters: Vec<Parameter>,
    /// Return type for methods, declared type for properties/fields/events
    pub return_type: Option<String>,
    /// `IFoo` in `void IFoo.Bar()`
    pub explicit_interface: Option<String>,
    pub bases: Vec<BaseType>,
    pub members: Vec<Declaration>,
    /// Extracted documentation comment text
    pub doc_comment: Option<String>,
}

impl Declaration {
    pub fn new(kind: DeclKind, name: impl Into<String>, span: TextSpan) -> Self {
        Self {
            kind,
            name: name.into(),
            type_parameters: Vec::new(),
            occurrence: 0,
            access: Access::Private,
            modifiers: Vec::new(),
            span,
            parameters: Vec::new(),
            return_type: None,
            explicit_interface: None,
            bases: Vec::new(),
            members: Vec::new(),
            doc_comment: None,
        }
    }

    /// Formatted parameter types, e.g. `(int, string)`
    pub fn parameter_types(&self) -> String {
        let types: Vec<String> = self.parameters.iter().map(|p| compact(&p.ty)).collect();
        format!("({})", types.join(", "))
    }

    /// `<K,V>`, or empty for non-generic declarations
    pub fn generic_suffix(&self) -> String {
        if self.type_parameters.is_empty() {
            return String::new();
        }
        format!("<{}>", self.type_parameters.join(","))
    }

    /// Qualified name of this declaration under `parent` (empty for the root)
    ///
    /// Repeated siblings get `~N` appended, so `partial class Foo` split
    /// over two blocks yields `Foo` and `Foo~1`.
    pub fn full_name(&self, parent: &str) -> String {
        let mut name = String::with_capacity(parent.len() + self.name.len() + 8);
        if !parent.is_empty() {
            name.push_str(parent);
            name.push('.');
        }
        if let Some(iface) = &self.explicit_interface {
            name.push_str(&compact(iface));
            name.push('.');
        }
        name.push_str(&self.name);
        name.push_str(&self.generic_suffix());
        if self.kind.is_invocable() {
            name.push_str(&self.parameter_types());
        }
        if self.occurrence > 0 {
            name.push('~');
            name.push_str(&self.occurrence.to_string());
        }
        name
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

/// Number siblings that would otherwise share a full name, recursively
pub(crate) fn number_duplicates(decls: &mut [Declaration]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for decl in decls.iter_mut() {
        let key = decl.full_name("");
        let count = seen.entry(key).or_insert(0);
        decl.occurrence = *count;
        *count += 1;
        number_duplicates(&mut decl.members);
    }
}

/// Strip all whitespace from a type expression (`Dictionary<int, string>` → `Dictionary<int,string>`)
pub fn compact(ty: &str) -> String {
    ty.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A user-delimited folding region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldingRegion {
    pub title: String,
    pub span: TextSpan,
}

/// A parsed file in normalized form
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: LanguageId,
    /// Java package, used as the qualifier of top-level types
    pub package: Option<String>,
    pub declarations: Vec<Declaration>,
    /// All folding regions in the file, ordered by start offset
    pub regions: Vec<FoldingRegion>,
    pub len: usize,
}

impl SourceFile {
    /// Qualifier for top-level declarations
    pub fn root_name(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Helpers shared by the dialect normalizers
// =============================================================================

pub(crate) fn node_text<'a>(node: &tree_sitter::Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Names from a `type_parameters` field (`<in T, U>` → `["T", "U"]`)
pub(crate) fn type_parameter_names(node: &tree_sitter::Node, source: &str) -> Vec<String> {
    let list = node.child_by_field_name("type_parameters").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "type_parameter_list" | "type_parameters"));
        found
    });
    let Some(list) = list else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        if param.kind() != "type_parameter" {
            continue;
        }
        let name = param.child_by_field_name("name").or_else(|| {
            let mut inner = param.walk();
            let found = param
                .named_children(&mut inner)
                .find(|c| matches!(c.kind(), "identifier" | "type_identifier"));
            found
        });
        if let Some(name) = name {
            names.push(node_text(&name, source).to_string());
        }
    }
    names
}

pub(crate) fn node_span(node: &tree_sitter::Node) -> TextSpan {
    TextSpan::new(node.start_byte(), node.end_byte())
}

/// Scan line-based region markers.
///
/// `open` returns the title when a trimmed line starts a region, `close`
/// recognizes the end marker. Stray end markers are ignored; a region left
/// open runs to the end of the source.
pub(crate) fn scan_region_markers(
    source: &str,
    open: impl Fn(&str) -> Option<String>,
    close: impl Fn(&str) -> bool,
) -> Vec<FoldingRegion> {
    let mut regions = Vec::new();
    let mut stack: Vec<(String, usize)> = Vec::new();
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim();

        if let Some(title) = open(trimmed) {
            let title = if title.is_empty() {
                "Region".to_string()
            } else {
                title
            };
            stack.push((title, start));
        } else if close(trimmed) {
            if let Some((title, region_start)) = stack.pop() {
                regions.push(FoldingRegion {
                    title,
                    span: TextSpan::new(region_start, offset),
                });
            }
        }
    }

    while let Some((title, region_start)) = stack.pop() {
        regions.push(FoldingRegion {
            title,
            span: TextSpan::new(region_start, source.len()),
        });
    }

    regions.sort_by_key(|r| (r.span.start, std::cmp::Reverse(r.span.end)));
    regions
}

/// Remove `<...>` markup, keeping `cref`/`name` attribute values of
/// self-closing references such as `<see cref="Foo"/>`
pub(crate) fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let tag = &rest[open + 1..open + close];
        if tag.ends_with('/') {
            if let Some(value) = attribute_value(tag, "cref").or_else(|| attribute_value(tag, "name"))
            {
                out.push_str(value.rsplit(':').next().unwrap_or(value));
            }
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

fn attribute_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let key = format!("{}=\"", attr);
    let start = tag.find(&key)? + key.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Semantic queries the interface resolver relies on
pub trait SemanticModel {
    /// Whether `type_name` (as written in a base list) names an interface
    fn is_interface(&self, type_name: &str) -> bool;

    /// Whether `member` implements a member of `interface`
    fn implements(&self, member: &Declaration, interface: &str) -> bool;
}

/// Folding-region enumeration
pub trait RegionSource {
    /// Regions lying entirely inside `span`, ordered by start offset
    fn regions_in(&self, span: TextSpan) -> Vec<FoldingRegion>;
}

impl RegionSource for SourceFile {
    fn regions_in(&self, span: TextSpan) -> Vec<FoldingRegion> {
        self.regions
            .iter()
            .filter(|region| span.contains(region.span))
            .cloned()
            .collect()
    }
}

/// Caret-to-element queries used by the highlight tracker
pub trait ElementLocator {
    /// Innermost declaration whose span contains `offset`
    fn element_at(&self, offset: usize) -> Option<ElementId>;

    /// Lexically enclosing declaration
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn full_name(&self, element: ElementId) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_containment() {
        let outer = TextSpan::new(10, 100);
        assert!(outer.contains(TextSpan::new(10, 100)));
        assert!(outer.contains(TextSpan::new(20, 30)));
        assert!(!outer.contains(TextSpan::new(5, 30)));
        assert!(!outer.contains(TextSpan::new(90, 101)));
        assert!(outer.contains_offset(10));
        assert!(!outer.contains_offset(100));
    }

    #[test]
    fn test_full_name_for_overloads() {
        let mut method = Declaration::new(DeclKind::Method, "Run", TextSpan::new(0, 1));
        method.parameters = vec![
            Parameter {
                ty: "Dictionary<int, string>".to_string(),
                name: "map".to_string(),
            },
            Parameter {
                ty: "int".to_string(),
                name: "count".to_string(),
            },
        ];
        assert_eq!(
            method.full_name("App.Service"),
            "App.Service.Run(Dictionary<int,string>, int)"
        );

        let field = Declaration::new(DeclKind::Field, "count", TextSpan::new(0, 1));
        assert_eq!(field.full_name(""), "count");
    }

    #[test]
    fn test_full_name_carries_type_parameters() {
        let mut class = Declaration::new(DeclKind::Class, "Map", TextSpan::new(0, 1));
        class.type_parameters = vec!["K".to_string(), "V".to_string()];
        assert_eq!(class.full_name("App"), "App.Map<K,V>");

        let mut method = Declaration::new(DeclKind::Method, "Get", TextSpan::new(0, 1));
        method.type_parameters = vec!["T".to_string()];
        assert_eq!(method.full_name("App.Map<K,V>"), "App.Map<K,V>.Get<T>()");
    }

    #[test]
    fn test_number_duplicates_marks_repeated_siblings() {
        let part = |start| {
            let mut decl = Declaration::new(DeclKind::Class, "Foo", TextSpan::new(start, start + 1));
            decl.members = vec![
                Declaration::new(DeclKind::Field, "a", TextSpan::new(start, start + 1)),
                Declaration::new(DeclKind::Field, "a", TextSpan::new(start, start + 1)),
            ];
            decl
        };
        let mut decls = vec![part(0), part(10), part(20)];
        number_duplicates(&mut decls);

        let names: Vec<String> = decls.iter().map(|d| d.full_name("")).collect();
        assert_eq!(names, vec!["Foo", "Foo~1", "Foo~2"]);
        assert_eq!(decls[1].members[1].full_name("Foo~1"), "Foo~1.a~1");
    }

    #[test]
    fn test_full_name_for_explicit_implementation() {
        let mut method = Declaration::new(DeclKind::Method, "Dispose", TextSpan::new(0, 1));
        method.explicit_interface = Some("IDisposable".to_string());
        assert_eq!(method.full_name("Foo"), "Foo.IDisposable.Dispose()");
    }

    #[test]
    fn test_scan_region_markers_nested_and_unbalanced() {
        let source = "a\n#region Outer\nb\n#region\nc\n#endregion\n#endregion\n#endregion\n#region Tail\nd\n";
        let regions = scan_region_markers(
            source,
            |line| line.strip_prefix("#region").map(|t| t.trim().to_string()),
            |line| line.starts_with("#endregion"),
        );
        let titles: Vec<&str> = regions.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Outer", "Region", "Tail"]);
        assert!(regions[0].span.contains(regions[1].span));
        assert_eq!(regions[2].span.end, source.len());
    }

    #[test]
    fn test_strip_tags_keeps_references() {
        let text = "Gets the <see cref=\"T:App.Foo\"/> for <paramref name=\"id\"/>.";
        assert_eq!(strip_tags(text), "Gets the App.Foo for id.");
        assert_eq!(collapse_whitespace("  a \n b  "), "a b");
    }

    #[test]
    fn test_regions_in_span() {
        let file = SourceFile {
            regions: vec![
                FoldingRegion {
                    title: "A".to_string(),
                    span: TextSpan::new(5, 20),
                },
                FoldingRegion {
                    title: "B".to_string(),
                    span: TextSpan::new(50, 80),
                },
            ],
            ..Default::default()
        };
        let inside = file.regions_in(TextSpan::new(0, 40));
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].title, "A");
    }
}
