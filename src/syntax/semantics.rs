//! Single-file semantic model
//!
//! Answers interface questions from the declarations of one file plus a
//! table of well-known platform interfaces. Names are compared without
//! namespace qualifiers or type arguments, so `System.IEquatable<Foo>`
//! and `IEquatable` refer to the same interface.

use std::collections::{HashMap, HashSet};

use super::{Access, BaseRole, DeclKind, Declaration, LanguageId, SemanticModel, SourceFile};

/// Shape of one interface member used for signature matching
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberShape {
    kind: DeclKind,
    name: String,
    /// `None` for members without a parameter list (properties, events)
    arity: Option<usize>,
}

impl MemberShape {
    fn method(name: &str, arity: usize) -> Self {
        Self {
            kind: DeclKind::Method,
            name: name.to_string(),
            arity: Some(arity),
        }
    }

    fn of(kind: DeclKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            arity: None,
        }
    }
}

/// Well-known interfaces that are never declared in user files
fn builtin_interfaces(language: LanguageId) -> Vec<(&'static str, Vec<MemberShape>)> {
    match language {
        LanguageId::CSharp => vec![
            ("IDisposable", vec![MemberShape::method("Dispose", 0)]),
            ("IAsyncDisposable", vec![MemberShape::method("DisposeAsync", 0)]),
            ("IEnumerable", vec![MemberShape::method("GetEnumerator", 0)]),
            ("IComparable", vec![MemberShape::method("CompareTo", 1)]),
            ("IEquatable", vec![MemberShape::method("Equals", 1)]),
            ("ICloneable", vec![MemberShape::method("Clone", 0)]),
            ("IFormattable", vec![MemberShape::method("ToString", 2)]),
            (
                "INotifyPropertyChanged",
                vec![MemberShape::of(DeclKind::Event, "PropertyChanged")],
            ),
        ],
        LanguageId::Java => vec![
            ("Runnable", vec![MemberShape::method("run", 0)]),
            ("AutoCloseable", vec![MemberShape::method("close", 0)]),
            ("Closeable", vec![MemberShape::method("close", 0)]),
            ("Comparable", vec![MemberShape::method("compareTo", 1)]),
            ("Iterable", vec![MemberShape::method("iterator", 0)]),
            ("Comparator", vec![MemberShape::method("compare", 2)]),
            ("Callable", vec![MemberShape::method("call", 0)]),
            ("Supplier", vec![MemberShape::method("get", 0)]),
            ("Cloneable", Vec::new()),
            ("Serializable", Vec::new()),
        ],
        LanguageId::PlainText => Vec::new(),
    }
}

/// `System.Collections.Generic.IEquatable<Foo>` → `IEquatable`
pub fn simple_name(type_name: &str) -> &str {
    let without_args = type_name.split('<').next().unwrap_or(type_name).trim();
    without_args
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(without_args)
        .trim()
}

#[derive(Debug, Clone, Default)]
pub struct FileSemantics {
    language: LanguageId,
    /// Interface name → members, including inherited interface members
    interfaces: HashMap<String, Vec<MemberShape>>,
    /// Names declared in the file as classes, structs, records or enums
    non_interfaces: HashSet<String>,
}

impl FileSemantics {
    pub fn new(file: &SourceFile) -> Self {
        let mut semantics = Self {
            language: file.language,
            ..Default::default()
        };
        for (name, members) in builtin_interfaces(file.language) {
            semantics.interfaces.insert(name.to_string(), members);
        }

        let mut declared = Vec::new();
        collect_types(&file.declarations, &mut declared);

        let mut inherits: HashMap<String, Vec<String>> = HashMap::new();
        for decl in &declared {
            let name = simple_name(&decl.name).to_string();
            if decl.kind == DeclKind::Interface {
                let shapes = decl.members.iter().filter_map(shape_of).collect();
                semantics.interfaces.insert(name.clone(), shapes);
                inherits.insert(
                    name,
                    decl.bases
                        .iter()
                        .map(|b| simple_name(&b.name).to_string())
                        .collect(),
                );
            } else {
                semantics.non_interfaces.insert(name);
            }
        }

        // Java `implements` lists are interfaces by construction, even when
        // the interface lives in another file
        for decl in &declared {
            for base in decl.bases.iter().filter(|b| b.role == BaseRole::Implements) {
                semantics
                    .interfaces
                    .entry(simple_name(&base.name).to_string())
                    .or_default();
            }
        }

        semantics.flatten_inherited(&inherits);
        semantics
    }

    /// Copy members of base interfaces into derived ones
    fn flatten_inherited(&mut self, inherits: &HashMap<String, Vec<String>>) {
        for name in inherits.keys() {
            let mut seen = HashSet::new();
            let mut stack: Vec<&String> = inherits[name].iter().collect();
            let mut extra = Vec::new();
            while let Some(base) = stack.pop() {
                if !seen.insert(base.clone()) || base == name {
                    continue;
                }
                if let Some(members) = self.interfaces.get(base) {
                    extra.extend(members.iter().cloned());
                }
                if let Some(grand) = inherits.get(base) {
                    stack.extend(grand.iter());
                }
            }
            if let Some(members) = self.interfaces.get_mut(name) {
                members.extend(extra);
            }
        }
    }

    fn matches_shape(&self, member: &Declaration, shape: &MemberShape) -> bool {
        if shape.name != member.name {
            return false;
        }
        if shape.kind != member.kind {
            return false;
        }
        match shape.arity {
            Some(arity) => arity == member.parameters.len(),
            None => true,
        }
    }
}

fn collect_types<'a>(decls: &'a [Declaration], out: &mut Vec<&'a Declaration>) {
    for decl in decls {
        if decl.kind.is_type() {
            out.push(decl);
        }
        collect_types(&decl.members, out);
    }
}

fn shape_of(decl: &Declaration) -> Option<MemberShape> {
    match decl.kind {
        DeclKind::Method => Some(MemberShape::method(&decl.name, decl.parameters.len())),
        DeclKind::Indexer => Some(MemberShape {
            kind: DeclKind::Indexer,
            name: decl.name.clone(),
            arity: Some(decl.parameters.len()),
        }),
        DeclKind::Property | DeclKind::Event => Some(MemberShape::of(decl.kind, &decl.name)),
        _ => None,
    }
}

impl SemanticModel for FileSemantics {
    fn is_interface(&self, type_name: &str) -> bool {
        let name = simple_name(type_name);
        if self.interfaces.contains_key(name) {
            return true;
        }
        if self.non_interfaces.contains(name) {
            return false;
        }
        // C# naming convention for interfaces declared elsewhere
        self.language == LanguageId::CSharp && {
            let mut chars = name.chars();
            chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        }
    }

    fn implements(&self, member: &Declaration, interface: &str) -> bool {
        let iface = simple_name(interface);

        if let Some(explicit) = &member.explicit_interface {
            return simple_name(explicit) == iface;
        }
        if !matches!(
            member.kind,
            DeclKind::Method | DeclKind::Property | DeclKind::Event | DeclKind::Indexer
        ) {
            return false;
        }
        // Implicit implementations must be public
        if member.access != Access::Public {
            return false;
        }
        if member.has_modifier("static") {
            return false;
        }
        self.interfaces
            .get(iface)
            .is_some_and(|shapes| shapes.iter().any(|s| self.matches_shape(member, s)))
    }
}
