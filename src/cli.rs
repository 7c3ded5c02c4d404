//! Command-line argument parsing and outline printing
//!
//! Supports:
//! - Outlining one C# or Java file
//! - Placing the caret to see the highlighted chain
//! - Plain tree or JSON output

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;

use crate::model::Position;
use crate::outline::{CodeDocument, CodeItem};

/// Print the code outline of a source file
#[derive(Parser, Debug)]
#[command(name = "codenav", version, about = "Print the code outline of a source file")]
pub struct CliArgs {
    /// Source file to outline (.cs, .java)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Place the caret on line N (1-indexed)
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Place the caret on column N (1-indexed, used with --line)
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,

    /// Use doc comments as tooltips
    #[arg(long)]
    pub xml_comments: bool,

    /// Print the outline as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    /// Caret position, converted to 0-indexed
    pub caret: Option<Position>,
    /// `Some` only when the flag was given, so the config file can decide
    pub use_xml_comments: Option<bool>,
    pub format: OutputFormat,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.column.is_some() && self.line.is_none() {
            return Err("--column requires --line".to_string());
        }

        // Convert from 1-indexed (user input) to 0-indexed (internal)
        let caret = self.line.map(|line| {
            let line_0 = line.saturating_sub(1);
            let col_0 = self.column.unwrap_or(1).saturating_sub(1);
            Position::new(line_0, col_0)
        });

        Ok(RunConfig {
            file: self.file,
            caret,
            use_xml_comments: self.xml_comments.then_some(true),
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Tree
            },
        })
    }
}

/// Indented tree, one item per line; highlighted items are marked with `*`
pub fn render_tree(document: &CodeDocument) -> String {
    let mut out = String::new();
    for item in &document.items {
        render_item(item, 0, &mut out);
    }
    out
}

fn render_item(item: &CodeItem, depth: usize, out: &mut String) {
    let core = item.core();
    let marker = if core.visual.highlighted { '*' } else { ' ' };
    let suffix = item.container().map(|c| c.parameters.as_str()).unwrap_or("");
    let _ = writeln!(
        out,
        "{}{} {:<8} {}{}",
        marker,
        "  ".repeat(depth),
        core.kind.label(),
        core.name,
        suffix
    );
    for member in item.members() {
        render_item(member, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: Option<usize>, column: Option<usize>) -> CliArgs {
        CliArgs {
            file: PathBuf::from("Demo.cs"),
            line,
            column,
            xml_comments: false,
            json: false,
        }
    }

    #[test]
    fn test_line_column_conversion() {
        let config = args(Some(42), Some(10)).into_config().unwrap();
        assert_eq!(config.caret, Some(Position::new(41, 9)));
        assert_eq!(config.format, OutputFormat::Tree);
        assert_eq!(config.use_xml_comments, None);
    }

    #[test]
    fn test_line_without_column_uses_first_column() {
        let config = args(Some(1), None).into_config().unwrap();
        assert_eq!(config.caret, Some(Position::new(0, 0)));
    }

    #[test]
    fn test_column_without_line_is_rejected() {
        assert!(args(None, Some(3)).into_config().is_err());
    }

    #[test]
    fn test_parses_flags() {
        let args = CliArgs::parse_from(["codenav", "Demo.java", "--json", "--xml-comments"]);
        let config = args.into_config().unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.use_xml_comments, Some(true));
        assert_eq!(config.caret, None);
    }

    #[test]
    fn test_render_tree_indents_members() {
        use crate::outline::{CodeKind, ContainerItem, ItemCore, VisualState};
        use crate::syntax::{Access, TextSpan};
        use crate::theme::OutlinePalette;

        let palette = OutlinePalette::default();
        let core = |name: &str, kind| ItemCore {
            id: 0,
            name: name.to_string(),
            full_name: name.to_string(),
            kind,
            access: Access::Public,
            tooltip: String::new(),
            span: TextSpan::default(),
            visual: VisualState::new(&palette),
        };
        let mut class = ContainerItem::new(core("Foo", CodeKind::Class), &palette);
        class.parameters = " : IBar".to_string();
        class.members.push(CodeItem::Leaf(core("Bar()", CodeKind::Method)));
        let mut doc = CodeDocument {
            revision: 1,
            items: vec![CodeItem::Container(class)],
        };
        doc.items[0].set_highlighted(true, &palette);

        let text = render_tree(&doc);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "* class    Foo : IBar");
        assert_eq!(lines[1], "    fn       Bar()");
    }
}
