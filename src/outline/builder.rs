//! Outline construction
//!
//! Assembles one [`CodeDocument`] from a normalized [`SourceFile`]. Inside a
//! type every mapped member lands in exactly one place, tried in order:
//!
//! 1. the first interface group whose interface it implements
//! 2. the innermost region containing it
//! 3. the type's own member list
//!
//! Non-empty groups are then offered to the regions, and the regions are
//! appended last. Namespaces and the file root run the region step only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::interfaces::InterfaceResolver;
use super::mapper::{map_container, map_member, MapContext};
use super::regions::RegionResolver;
use super::{CodeDocument, CodeItem};
use crate::syntax::{DeclKind, Declaration, SemanticModel, SourceFile, TextSpan};
use crate::theme::OutlinePalette;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Use extracted doc comments as tooltips instead of signatures
    pub use_xml_comments: bool,
    pub palette: OutlinePalette,
}

/// The build observed its cancellation flag and stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("outline build cancelled")]
pub struct Cancelled;

/// Shared cancellation flag for one build
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Build the outline for `file`.
///
/// Checks `cancel` before every type and every member.
pub fn build_outline(
    file: &SourceFile,
    semantics: &dyn SemanticModel,
    options: &BuildOptions,
    cancel: &CancelToken,
) -> Result<CodeDocument, Cancelled> {
    let mut builder = OutlineBuilder {
        file,
        semantics,
        cancel,
        ctx: MapContext::new(options),
    };
    let root = TextSpan::new(0, usize::MAX);
    let items = builder.build_scope(root, &file.declarations, file.root_name())?;
    Ok(CodeDocument { revision: 0, items })
}

struct OutlineBuilder<'a> {
    file: &'a SourceFile,
    semantics: &'a dyn SemanticModel,
    cancel: &'a CancelToken,
    ctx: MapContext<'a>,
}

impl OutlineBuilder<'_> {
    fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Children of the file root or a namespace: regions, no interface step
    fn build_scope(
        &mut self,
        span: TextSpan,
        decls: &[Declaration],
        parent: &str,
    ) -> Result<Vec<CodeItem>, Cancelled> {
        let nested = container_spans(decls);
        let mut regions = RegionResolver::resolve(span, self.file, &nested, parent, &mut self.ctx);

        let mut items = Vec::new();
        for decl in decls {
            self.checkpoint()?;
            let Some(item) = self.map(decl, parent)? else {
                continue;
            };
            if let Some(item) = regions.try_absorb(item) {
                items.push(item);
            }
        }
        items.extend(regions.finish());
        Ok(items)
    }

    fn map(&mut self, decl: &Declaration, parent: &str) -> Result<Option<CodeItem>, Cancelled> {
        if decl.kind == DeclKind::Namespace {
            let Some(mut container) = map_container(decl, parent, &mut self.ctx) else {
                return Ok(None);
            };
            let full_name = container.core.full_name.clone();
            container.members = self.build_scope(decl.span, &decl.members, &full_name)?;
            return Ok(Some(CodeItem::Container(container)));
        }
        if decl.kind.is_type() {
            return self.build_type(decl, parent);
        }
        Ok(map_member(decl, parent, &mut self.ctx))
    }

    fn build_type(
        &mut self,
        decl: &Declaration,
        parent: &str,
    ) -> Result<Option<CodeItem>, Cancelled> {
        self.checkpoint()?;
        let Some(mut container) = map_container(decl, parent, &mut self.ctx) else {
            return Ok(None);
        };
        let full_name = container.core.full_name.clone();

        let nested = container_spans(&decl.members);
        let mut regions =
            RegionResolver::resolve(decl.span, self.file, &nested, &full_name, &mut self.ctx);
        let mut groups = InterfaceResolver::resolve(decl, self.semantics, &full_name, &mut self.ctx);

        for member in &decl.members {
            self.checkpoint()?;
            let Some(item) = self.map(member, &full_name)? else {
                continue;
            };
            let Some(item) = groups.claim(member, item) else {
                continue;
            };
            if let Some(item) = regions.try_absorb(item) {
                container.members.push(item);
            }
        }

        for group in groups.finish() {
            if let Some(group) = regions.try_absorb(group) {
                container.members.push(group);
            }
        }
        container.members.extend(regions.finish());

        Ok(Some(CodeItem::Container(container)))
    }
}

/// Spans of nested types and namespaces, which own their regions
fn container_spans(decls: &[Declaration]) -> Vec<TextSpan> {
    decls
        .iter()
        .filter(|d| d.kind.is_type() || d.kind == DeclKind::Namespace)
        .map(|d| d.span)
        .collect()
}
