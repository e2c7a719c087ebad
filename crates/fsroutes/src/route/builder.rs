//! Route tree builder: folds sorted source entries into the route forest
//!
//! Entries are consumed shortest identifier first, so a file declaring a
//! parent route is always linked before the files nested beneath it. Each
//! entry walks its segments from the root, reusing sibling nodes with the
//! same path and creating the ones that are missing.

use tracing::{debug, trace};

use crate::config::RouteConventions;
use crate::module::{ModuleLoader, SourceEntry};
use crate::path::normalize_identifier;
use crate::route::node::{PathMatch, RouteNode, RouteNodeKind};
use crate::route::pattern::{classify_segment, precedes_wildcards, Segment};

/// Node under construction
struct DraftNode {
    path: String,
    path_match: PathMatch,
    loader: ModuleLoader,
    kind: DraftKind,
}

enum DraftKind {
    Leaf,
    Parent(Vec<DraftNode>),
}

impl DraftNode {
    fn new(segment: &Segment, terminal: bool, loader: &ModuleLoader) -> Self {
        Self {
            path: segment.path.clone(),
            path_match: segment.path_match(terminal),
            loader: loader.clone(),
            kind: DraftKind::Leaf,
        }
    }

    /// Turns a leaf into a parent on first use and borrows its children
    fn children_mut(&mut self) -> &mut Vec<DraftNode> {
        if let DraftKind::Leaf = self.kind {
            trace!(path = %self.path, "route gains children");
            self.kind = DraftKind::Parent(Vec::new());
        }

        match &mut self.kind {
            DraftKind::Parent(children) => children,
            DraftKind::Leaf => unreachable!("leaf promoted to parent above"),
        }
    }

    fn freeze(self) -> RouteNode {
        let kind = match self.kind {
            DraftKind::Leaf => RouteNodeKind::Leaf,
            DraftKind::Parent(children) => {
                RouteNodeKind::Parent(children.into_iter().map(DraftNode::freeze).collect())
            }
        };

        RouteNode {
            path: self.path,
            path_match: self.path_match,
            loader: self.loader,
            kind,
        }
    }
}

/// Inserts a node into a sibling list, returning its index
///
/// Static and multi-level paths go to the front, everything else to the back.
fn insert_ordered(siblings: &mut Vec<DraftNode>, node: DraftNode) -> usize {
    if precedes_wildcards(&node.path) {
        siblings.insert(0, node);
        0
    } else {
        siblings.push(node);
        siblings.len() - 1
    }
}

/// Stateful fold producing the route forest
///
/// Callers must feed entries in ascending identifier length;
/// [`get_routes`](crate::get_routes) takes care of that.
pub(crate) struct RouteTreeBuilder<'a> {
    conventions: &'a RouteConventions,
    roots: Vec<DraftNode>,
}

impl<'a> RouteTreeBuilder<'a> {
    pub(crate) fn new(conventions: &'a RouteConventions) -> Self {
        Self {
            conventions,
            roots: Vec::new(),
        }
    }

    /// Links one source entry into the tree
    pub(crate) fn insert(&mut self, entry: SourceEntry) {
        let segments: Vec<Segment> = normalize_identifier(&entry.id, self.conventions)
            .iter()
            .map(|raw| classify_segment(raw))
            .collect();

        let Some((last, ancestors)) = segments.split_last() else {
            debug!(id = %entry.id, "skipping source without route segments");
            return;
        };

        // A top-level route cannot consist of a parameter alone
        if segments[0].is_dynamic() {
            debug!(id = %entry.id, "dropping source rooted at a dynamic segment");
            return;
        }

        let loader = entry.loader.into_module_loader();
        let mut siblings = &mut self.roots;

        for segment in ancestors {
            let index = match siblings.iter().position(|node| node.path == segment.path) {
                Some(index) => {
                    siblings[index].path_match = segment.path_match(false);
                    index
                }
                None => {
                    trace!(id = %entry.id, path = %segment.path, "creating intermediate route");
                    insert_ordered(siblings, DraftNode::new(segment, false, &loader))
                }
            };
            siblings = siblings[index].children_mut();
        }

        trace!(id = %entry.id, path = %last.path, "adding route");
        insert_ordered(siblings, DraftNode::new(last, true, &loader));
    }

    /// Freezes the tree; nodes never change after this point
    pub(crate) fn build(self) -> Vec<RouteNode> {
        debug!(routes = self.roots.len(), "route tree built");
        self.roots.into_iter().map(DraftNode::freeze).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Component, ModuleRecord};

    fn entry(id: &str) -> SourceEntry {
        SourceEntry::record(id, ModuleRecord::new(Component::named(id.to_string())))
    }

    fn build(ids: &[&str]) -> Vec<RouteNode> {
        let conventions = RouteConventions::default();
        let mut builder = RouteTreeBuilder::new(&conventions);
        for id in ids {
            builder.insert(entry(id));
        }
        builder.build()
    }

    fn paths(nodes: &[RouteNode]) -> Vec<&str> {
        nodes.iter().map(RouteNode::path).collect()
    }

    #[test]
    fn test_single_static_route() {
        let routes = build(&["/app/routes/about.ts"]);
        assert_eq!(paths(&routes), vec!["about"]);
        assert_eq!(routes[0].path_match(), PathMatch::Prefix);
        assert!(!routes[0].is_parent());
    }

    #[test]
    fn test_root_dynamic_route_is_dropped() {
        let routes = build(&["/app/routes/[id].ts", "/app/routes/[id]/edit.ts"]);
        assert!(routes.is_empty());
    }

    #[test]
    fn test_existing_parent_is_promoted() {
        let routes = build(&["/app/routes/products.ts", "/app/routes/products/[id].ts"]);
        assert_eq!(routes.len(), 1);

        let children = routes[0].children().unwrap();
        assert_eq!(paths(children), vec![":id"]);
        assert_eq!(children[0].path_match(), PathMatch::Prefix);
    }

    #[test]
    fn test_missing_ancestors_are_created() {
        let routes = build(&["/app/routes/docs/guides/intro.ts"]);
        assert_eq!(paths(&routes), vec!["docs"]);

        let guides = routes[0].children().unwrap();
        assert_eq!(paths(guides), vec!["guides"]);
        assert_eq!(paths(guides[0].children().unwrap()), vec!["intro"]);
    }

    #[test]
    fn test_group_directory_matches_by_prefix() {
        let routes = build(&["/app/routes/(auth).ts", "/app/routes/(auth)/login.ts"]);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "");
        assert_eq!(routes[0].path_match(), PathMatch::Prefix);
        assert_eq!(paths(routes[0].children().unwrap()), vec!["login"]);
    }

    #[test]
    fn test_sibling_order_static_first() {
        let routes = build(&[
            "/app/routes/shop.ts",
            "/app/routes/shop/[...rest].ts",
            "/app/routes/shop/[id].ts",
            "/app/routes/shop/index.ts",
            "/app/routes/shop/cart.ts",
        ]);

        let children = routes[0].children().unwrap();
        assert_eq!(paths(children), vec!["cart", "**", ":id", ""]);
    }
}
