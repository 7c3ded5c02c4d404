//! Structural comparison of outline trees
//!
//! Two trees are equal when they have the same shape and every pair of
//! corresponding items agrees on full name and kind. Tooltips, spans and
//! visual state are ignored, so edits that only move text or reword a
//! comment do not republish.

use super::{CodeDocument, CodeItem};

pub fn structurally_equal(a: &CodeDocument, b: &CodeDocument) -> bool {
    items_equal(&a.items, &b.items)
}

fn items_equal(a: &[CodeItem], b: &[CodeItem]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.full_name() == y.full_name()
                && x.kind() == y.kind()
                && items_equal(x.members(), y.members())
        })
}
