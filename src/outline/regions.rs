//! Folding-region grouping
//!
//! A scope (type, namespace or file root) gets one region item per folding
//! region that lies inside its span but not inside one of its nested
//! containers. Items are absorbed by span: the innermost containing region
//! wins.

use std::collections::HashMap;

use super::mapper::MapContext;
use super::{CodeItem, CodeKind, ContainerItem};
use crate::syntax::{RegionSource, TextSpan};

struct RegionSlot {
    span: TextSpan,
    item: ContainerItem,
    /// Index of the innermost enclosing region in the same scope
    parent: Option<usize>,
}

pub struct RegionResolver {
    slots: Vec<RegionSlot>,
}

impl RegionResolver {
    /// Collect regions inside `span`, skipping those owned by a nested
    /// container whose span is listed in `nested`
    pub fn resolve(
        span: TextSpan,
        source: &dyn RegionSource,
        nested: &[TextSpan],
        parent: &str,
        ctx: &mut MapContext,
    ) -> Self {
        let regions: Vec<_> = source
            .regions_in(span)
            .into_iter()
            .filter(|r| !nested.iter().any(|n| n.contains(r.span)))
            .collect();

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut slots = Vec::with_capacity(regions.len());
        for region in &regions {
            let repeat = seen.entry(region.title.as_str()).or_insert(0);
            let full_name = if *repeat == 0 {
                format!("{}#{}", parent, region.title)
            } else {
                format!("{}#{}~{}", parent, region.title, repeat)
            };
            *repeat += 1;

            let core = ctx.synthetic_core(&region.title, full_name, CodeKind::Region, region.span);
            slots.push(RegionSlot {
                span: region.span,
                item: ContainerItem::new(core, &ctx.options.palette),
                parent: None,
            });
        }

        for i in 0..slots.len() {
            let parent = innermost_enclosing(&slots, i);
            slots[i].parent = parent;
        }
        Self { slots }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append `item` to the innermost region containing its span.
    ///
    /// Hands the item back when no region contains it.
    pub fn try_absorb(&mut self, item: CodeItem) -> Option<CodeItem> {
        let span = item.span();
        let target = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.span.contains(span))
            .min_by_key(|(_, slot)| slot.span.len())
            .map(|(i, _)| i);

        match target {
            Some(i) => {
                self.slots[i].item.members.push(item);
                None
            }
            None => Some(item),
        }
    }

    /// Nest non-empty regions into their enclosing regions and return the
    /// outermost non-empty ones in source order. Empty regions are dropped.
    pub fn finish(self) -> Vec<CodeItem> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        // Innermost first; for identical spans the later region is the inner one
        order.sort_by_key(|&i| (self.slots[i].span.len(), std::cmp::Reverse(i)));

        let mut slots: Vec<Option<RegionSlot>> = self.slots.into_iter().map(Some).collect();
        let mut pending: Vec<Vec<(usize, ContainerItem)>> = vec![Vec::new(); slots.len()];
        let mut roots = Vec::new();

        for i in order {
            let Some(mut slot) = slots[i].take() else {
                continue;
            };
            let mut children = std::mem::take(&mut pending[i]);
            children.sort_by_key(|(index, _)| *index);
            slot.item
                .members
                .extend(children.into_iter().map(|(_, item)| CodeItem::Region(item)));

            if slot.item.members.is_empty() {
                continue;
            }
            match slot.parent {
                Some(parent) => pending[parent].push((i, slot.item)),
                None => roots.push((i, slot.item)),
            }
        }

        roots.sort_by_key(|(index, _)| *index);
        roots
            .into_iter()
            .map(|(_, item)| CodeItem::Region(item))
            .collect()
    }
}

fn innermost_enclosing(slots: &[RegionSlot], i: usize) -> Option<usize> {
    let span = slots[i].span;
    slots
        .iter()
        .enumerate()
        .filter(|&(j, slot)| {
            j != i && slot.span.contains(span) && (slot.span.len() > span.len() || j < i)
        })
        .min_by_key(|(j, slot)| (slot.span.len(), std::cmp::Reverse(*j)))
        .map(|(j, _)| j)
}
