//! Interface-implementation grouping
//!
//! One group per interface in a type's base list. A member implementing
//! several of them goes to the first in declared order.

use super::mapper::MapContext;
use super::{CodeItem, CodeKind, ContainerItem};
use crate::syntax::{compact, BaseRole, DeclKind, Declaration, SemanticModel, TextSpan};

struct GroupSlot {
    interface: String,
    item: ContainerItem,
    /// Cover of the members' spans, `None` until the first claim
    span: Option<TextSpan>,
}

pub struct InterfaceResolver<'a> {
    semantics: &'a dyn SemanticModel,
    groups: Vec<GroupSlot>,
}

impl<'a> InterfaceResolver<'a> {
    /// Groups for every interface `decl` declares, in base-list order.
    ///
    /// Interfaces themselves get no groups; their base list only extends the
    /// contract.
    pub fn resolve(
        decl: &Declaration,
        semantics: &'a dyn SemanticModel,
        type_full_name: &str,
        ctx: &mut MapContext,
    ) -> Self {
        let mut groups: Vec<GroupSlot> = Vec::new();
        if decl.kind != DeclKind::Interface {
            for base in &decl.bases {
                if base.role == BaseRole::Extends || !semantics.is_interface(&base.name) {
                    continue;
                }
                let interface = compact(&base.name);
                if groups.iter().any(|g| g.interface == interface) {
                    continue;
                }
                let full_name = format!("{}:{}", type_full_name, interface);
                let core = ctx.synthetic_core(
                    &interface,
                    full_name,
                    CodeKind::InterfaceGroup,
                    TextSpan::default(),
                );
                groups.push(GroupSlot {
                    interface,
                    item: ContainerItem::new(core, &ctx.options.palette),
                    span: None,
                });
            }
        }
        Self { semantics, groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Offer a mapped member to the groups; the first group whose interface
    /// `decl` implements takes it. Hands the item back otherwise.
    pub fn claim(&mut self, decl: &Declaration, item: CodeItem) -> Option<CodeItem> {
        let semantics = self.semantics;
        let Some(group) = self
            .groups
            .iter_mut()
            .find(|g| semantics.implements(decl, &g.interface))
        else {
            return Some(item);
        };

        let span = item.span();
        group.span = Some(match group.span {
            Some(covered) => covered.cover(span),
            None => span,
        });
        group.item.members.push(item);
        None
    }

    /// Non-empty groups in declared order, spans set to their members' cover
    pub fn finish(self) -> Vec<CodeItem> {
        self.groups
            .into_iter()
            .filter_map(|mut group| {
                let span = group.span?;
                group.item.core.span = span;
                Some(CodeItem::InterfaceGroup(group.item))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::mapper::map_member;
    use crate::outline::BuildOptions;
    use crate::syntax::{Access, BaseType};

    /// Every `I*` name is an interface; members implement an interface when
    /// their name starts with the interface name minus the `I`
    struct NamingModel;

    impl SemanticModel for NamingModel {
        fn is_interface(&self, type_name: &str) -> bool {
            type_name.starts_with('I')
        }

        fn implements(&self, member: &Declaration, interface: &str) -> bool {
            member.name.starts_with(&interface[1..])
        }
    }

    fn class(bases: &[&str]) -> Declaration {
        let mut decl = Declaration::new(DeclKind::Class, "Foo", TextSpan::new(0, 500));
        decl.bases = bases
            .iter()
            .map(|name| BaseType {
                name: name.to_string(),
                role: BaseRole::Unspecified,
            })
            .collect();
        decl
    }

    fn method(name: &str, start: usize) -> Declaration {
        let mut decl = Declaration::new(DeclKind::Method, name, TextSpan::new(start, start + 10));
        decl.access = Access::Public;
        decl
    }

    #[test]
    fn test_groups_follow_base_list_and_skip_classes() {
        let options = BuildOptions::default();
        let mut ctx = MapContext::new(&options);
        let resolver =
            InterfaceResolver::resolve(&class(&["Base", "IRead", "IWrite"]), &NamingModel, "Foo", &mut ctx);
        let names: Vec<&str> = resolver.groups.iter().map(|g| g.interface.as_str()).collect();
        assert_eq!(names, vec!["IRead", "IWrite"]);
    }

    #[test]
    fn test_first_interface_in_declared_order_wins() {
        let options = BuildOptions::default();
        let mut ctx = MapContext::new(&options);
        let mut resolver =
            InterfaceResolver::resolve(&class(&["IRead", "IReadAll"]), &NamingModel, "Foo", &mut ctx);

        let decl = method("ReadAll", 100);
        let item = map_member(&decl, "Foo", &mut ctx).unwrap();
        assert!(resolver.claim(&decl, item).is_none());

        let groups = resolver.finish();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].full_name(), "Foo:IRead");
        assert_eq!(groups[0].members()[0].name(), "ReadAll()");
    }

    #[test]
    fn test_group_span_covers_members_and_unclaimed_items_return() {
        let options = BuildOptions::default();
        let mut ctx = MapContext::new(&options);
        let mut resolver =
            InterfaceResolver::resolve(&class(&["IRead"]), &NamingModel, "Foo", &mut ctx);

        for (name, start) in [("ReadA", 200), ("ReadB", 50)] {
            let decl = method(name, start);
            let item = map_member(&decl, "Foo", &mut ctx).unwrap();
            assert!(resolver.claim(&decl, item).is_none());
        }
        let other = method("Write", 300);
        let item = map_member(&other, "Foo", &mut ctx).unwrap();
        assert!(resolver.claim(&other, item).is_some());

        let groups = resolver.finish();
        assert_eq!(groups[0].span(), TextSpan::new(50, 210));
    }

    #[test]
    fn test_interfaces_do_not_group_their_own_bases() {
        let options = BuildOptions::default();
        let mut ctx = MapContext::new(&options);
        let mut iface = class(&["IRead"]);
        iface.kind = DeclKind::Interface;
        let resolver = InterfaceResolver::resolve(&iface, &NamingModel, "IFoo", &mut ctx);
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let options = BuildOptions::default();
        let mut ctx = MapContext::new(&options);
        let resolver = InterfaceResolver::resolve(&class(&["IRead"]), &NamingModel, "Foo", &mut ctx);
        assert!(resolver.finish().is_empty());
    }
}
