//! Flat index of declarations for caret lookups

use super::{Declaration, ElementLocator, SourceFile, TextSpan};

/// Handle to a declaration inside an [`ElementIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Element {
    full_name: String,
    span: TextSpan,
    parent: Option<usize>,
}

/// Declarations of one file in pre-order, with parent links
///
/// Full names are computed with [`Declaration::full_name`], so they match
/// the names the outline builder assigns.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    elements: Vec<Element>,
}

impl ElementIndex {
    pub fn new(file: &SourceFile) -> Self {
        let mut index = Self::default();
        for decl in &file.declarations {
            index.push(decl, file.root_name(), None);
        }
        index
    }

    fn push(&mut self, decl: &Declaration, parent_name: &str, parent: Option<usize>) {
        let full_name = decl.full_name(parent_name);
        let id = self.elements.len();
        self.elements.push(Element {
            full_name,
            span: decl.span,
            parent,
        });
        for member in &decl.members {
            // Borrow ends before the recursive push mutates the vector
            let name = self.elements[id].full_name.clone();
            self.push(member, &name, Some(id));
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Full names from `element` up to the outermost declaration
    pub fn ancestor_chain(&self, element: ElementId) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(element);
        while let Some(id) = current {
            chain.push(self.full_name(id).to_string());
            current = self.parent(id);
        }
        chain
    }
}

impl ElementLocator for ElementIndex {
    fn element_at(&self, offset: usize) -> Option<ElementId> {
        // Spans nest, so the shortest containing span is the innermost
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.span.contains_offset(offset))
            .min_by_key(|(_, e)| e.span.len())
            .map(|(i, _)| ElementId(i))
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.elements
            .get(element.0)
            .and_then(|e| e.parent)
            .map(ElementId)
    }

    fn full_name(&self, element: ElementId) -> &str {
        self.elements
            .get(element.0)
            .map(|e| e.full_name.as_str())
            .unwrap_or("")
    }
}
