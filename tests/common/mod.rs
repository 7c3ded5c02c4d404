//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::Path;

use codenav::config::OutlineConfig;
use codenav::outline::{build_outline, BuildOptions, CancelToken, CodeDocument, CodeItem};
use codenav::runtime::OutlineEngine;
use codenav::syntax::{FileSemantics, LanguageId, ParserState};

pub const CACHE_CS: &str = include_str!("../../samples/Cache.cs");
pub const SCHEDULER_JAVA: &str = include_str!("../../samples/Scheduler.java");

/// Build an outline synchronously with default options
pub fn outline(source: &str, language: LanguageId) -> CodeDocument {
    outline_with(source, language, &BuildOptions::default())
}

pub fn outline_with(source: &str, language: LanguageId, options: &BuildOptions) -> CodeDocument {
    let path = match language {
        LanguageId::Java => Path::new("Test.java"),
        _ => Path::new("Test.cs"),
    };
    let mut parser = ParserState::new();
    let file = parser
        .parse(path, source, language)
        .expect("test source should parse");
    let semantics = FileSemantics::new(&file);
    build_outline(&file, &semantics, options, &CancelToken::new()).expect("build not cancelled")
}

pub fn csharp(source: &str) -> CodeDocument {
    outline(source, LanguageId::CSharp)
}

pub fn java(source: &str) -> CodeDocument {
    outline(source, LanguageId::Java)
}

/// Display names of `items`, in order
pub fn names(items: &[CodeItem]) -> Vec<&str> {
    items.iter().map(|item| item.name()).collect()
}

/// Display names of the members of the item called `full_name`
pub fn member_names<'a>(doc: &'a CodeDocument, full_name: &str) -> Vec<&'a str> {
    let item = doc
        .find(full_name)
        .unwrap_or_else(|| panic!("no outline item named {}", full_name));
    names(item.members())
}

/// Every full name in the document, depth-first
pub fn all_full_names(doc: &CodeDocument) -> Vec<String> {
    fn walk(items: &[CodeItem], out: &mut Vec<String>) {
        for item in items {
            out.push(item.full_name().to_string());
            walk(item.members(), out);
        }
    }
    let mut out = Vec::new();
    walk(&doc.items, &mut out);
    out
}

/// Engine with default config and a settled outline for `source`
pub fn settled_engine(path: &str, source: &str) -> OutlineEngine {
    let mut engine = OutlineEngine::new(OutlineConfig::default()).expect("engine starts");
    engine.activate(path, source).expect("engine is live");
    engine.settle().expect("worker is alive");
    engine
}
