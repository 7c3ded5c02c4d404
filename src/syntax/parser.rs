//! Tree-sitter parser state
//!
//! Owns one parser per dialect and the last tree per file so re-parses after
//! an edit are incremental. Lives on the outline worker thread (tree-sitter
//! parsers are !Sync).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tree_sitter::{InputEdit, Parser, Point, Tree};

use super::languages::LanguageId;
use super::{csharp, java, number_duplicates, SourceFile};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no outline support for {}", .0.display_name())]
    Unsupported(LanguageId),
    #[error("tree-sitter produced no tree for {}", .0.display_name())]
    NoTree(LanguageId),
}

/// Cached parse state for a file (enables incremental parsing)
struct DocParseState {
    language: LanguageId,
    tree: Tree,
    source: String,
}

/// Convert a byte offset to a tree-sitter Point (row, column in bytes)
fn byte_to_point(text: &str, byte_offset: usize) -> Point {
    let mut row = 0usize;
    let mut col = 0usize;

    for &byte in text.as_bytes().iter().take(byte_offset) {
        if byte == b'\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    Point { row, column: col }
}

/// Compute an InputEdit by diffing old and new source text.
/// Returns None if the sources are identical.
fn compute_incremental_edit(old_src: &str, new_src: &str) -> Option<InputEdit> {
    if old_src == new_src {
        return None;
    }

    let old_bytes = old_src.as_bytes();
    let new_bytes = new_src.as_bytes();

    // Common prefix length (in bytes)
    let mut start = 0;
    let max_start = old_bytes.len().min(new_bytes.len());
    while start < max_start && old_bytes[start] == new_bytes[start] {
        start += 1;
    }

    // Common suffix length (in bytes), not overlapping prefix
    let mut old_end = old_bytes.len();
    let mut new_end = new_bytes.len();
    while old_end > start && new_end > start && old_bytes[old_end - 1] == new_bytes[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }

    Some(InputEdit {
        start_byte: start,
        old_end_byte: old_end,
        new_end_byte: new_end,
        start_position: byte_to_point(old_src, start),
        old_end_position: byte_to_point(old_src, old_end),
        new_end_position: byte_to_point(new_src, new_end),
    })
}

pub struct ParserState {
    parsers: HashMap<LanguageId, Parser>,
    doc_cache: HashMap<PathBuf, DocParseState>,
}

impl ParserState {
    pub fn new() -> Self {
        let mut state = Self {
            parsers: HashMap::new(),
            doc_cache: HashMap::new(),
        };
        state.init_language(LanguageId::CSharp);
        state.init_language(LanguageId::Java);
        state
    }

    fn init_language(&mut self, lang: LanguageId) {
        let ts_lang: tree_sitter::Language = match lang {
            LanguageId::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
            LanguageId::PlainText => return,
        };

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&ts_lang) {
            tracing::error!("Failed to set language for {:?}: {}", lang, e);
            return;
        }
        self.parsers.insert(lang, parser);
    }

    /// Parse `source` and normalize it into a [`SourceFile`]
    pub fn parse(
        &mut self,
        path: &Path,
        source: &str,
        language: LanguageId,
    ) -> Result<SourceFile, ParseError> {
        let tree = self.parse_tree(path, source, language)?;
        let root = tree.root_node();

        let mut file = SourceFile {
            path: path.to_path_buf(),
            language,
            len: source.len(),
            ..Default::default()
        };
        match language {
            LanguageId::CSharp => {
                file.declarations = csharp::normalize(root, source);
                file.regions = csharp::scan_regions(source);
            }
            LanguageId::Java => {
                file.package = java::package_name(root, source);
                file.declarations = java::normalize(root, source);
                file.regions = java::scan_regions(source);
            }
            LanguageId::PlainText => return Err(ParseError::Unsupported(language)),
        }
        number_duplicates(&mut file.declarations);
        Ok(file)
    }

    /// Parse, reusing the cached tree for `path` when the language matches
    fn parse_tree(
        &mut self,
        path: &Path,
        source: &str,
        language: LanguageId,
    ) -> Result<Tree, ParseError> {
        let parser = self
            .parsers
            .get_mut(&language)
            .ok_or(ParseError::Unsupported(language))?;

        let old_tree = match self.doc_cache.get_mut(path) {
            Some(cached) if cached.language == language => {
                match compute_incremental_edit(&cached.source, source) {
                    Some(edit) => {
                        tracing::trace!(
                            "Incremental parse: edit at byte {}..{} -> {}..{}",
                            edit.start_byte,
                            edit.old_end_byte,
                            edit.start_byte,
                            edit.new_end_byte
                        );
                        cached.tree.edit(&edit);
                        Some(cached.tree.clone())
                    }
                    None => {
                        tracing::trace!("Source unchanged, reusing cached tree");
                        return Ok(cached.tree.clone());
                    }
                }
            }
            _ => None,
        };

        let tree = match parser.parse(source, old_tree.as_ref()) {
            Some(tree) => tree,
            None if old_tree.is_some() => {
                tracing::warn!(
                    "Incremental parse failed for {:?}, falling back to full parse",
                    language
                );
                parser
                    .parse(source, None)
                    .ok_or(ParseError::NoTree(language))?
            }
            None => return Err(ParseError::NoTree(language)),
        };

        self.doc_cache.insert(
            path.to_path_buf(),
            DocParseState {
                language,
                tree: tree.clone(),
                source: source.to_owned(),
            },
        );
        Ok(tree)
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}
