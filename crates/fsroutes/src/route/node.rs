//! Route nodes produced by the tree builder and the configs they resolve to

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::meta::{merge_route_meta, Guard, Resolvers, RouteData};
use crate::module::{BoxFuture, Component, ModuleLoader, ModuleRecord};

/// Whether a route matches only the exact remaining path or any path below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMatch {
    Exact,
    Prefix,
}

/// Shape of a [`RouteNode`]
///
/// A node starts out as a leaf serving its own view. The first time another
/// source file nests beneath it, it becomes a parent that hosts those files.
#[derive(Clone)]
pub enum RouteNodeKind {
    Leaf,
    Parent(Arc<[RouteNode]>),
}

/// One entry of the compiled route forest
///
/// Nodes are cheap to clone: the loader and the child list are shared.
#[derive(Clone)]
pub struct RouteNode {
    pub(crate) path: String,
    pub(crate) path_match: PathMatch,
    pub(crate) loader: ModuleLoader,
    pub(crate) kind: RouteNodeKind,
}

impl RouteNode {
    /// Path segment contributed by this node, empty for index and group files
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_match(&self) -> PathMatch {
        self.path_match
    }

    pub fn kind(&self) -> &RouteNodeKind {
        &self.kind
    }

    /// Nested routes, or `None` for a leaf
    pub fn children(&self) -> Option<&[RouteNode]> {
        match &self.kind {
            RouteNodeKind::Leaf => None,
            RouteNodeKind::Parent(children) => Some(children),
        }
    }

    pub fn is_parent(&self) -> bool {
        matches!(self.kind, RouteNodeKind::Parent(_))
    }

    /// Runs the node's own module loader
    pub fn module(&self) -> BoxFuture<'static, Result<ModuleRecord>> {
        (self.loader)()
    }

    /// Resolves the configs nested under this node
    ///
    /// - A leaf yields one synthetic route `{ path: "", component, ..meta }`.
    /// - A parent yields one wrapper route `{ path: "", children, ..meta }`
    ///   whose metadata comes from the parent's own module.
    ///
    /// Every call runs the module loader again; nothing is cached.
    pub fn load_children(&self) -> BoxFuture<'static, Result<Vec<RouteConfig>>> {
        let load = (self.loader)();
        let kind = self.kind.clone();

        Box::pin(async move {
            let record = load.await?;
            let config = match kind {
                RouteNodeKind::Leaf => RouteConfig::for_component(record.default),
                RouteNodeKind::Parent(children) => RouteConfig::for_children(children),
            };
            Ok(vec![merge_route_meta(config, record.route_meta.as_ref())])
        })
    }

    /// Resolves the view hosting this node's children
    ///
    /// Leaves render through [`load_children`](Self::load_children) and have
    /// no view of their own, so this yields `None` for them.
    pub fn load_component(&self) -> BoxFuture<'static, Result<Option<Component>>> {
        match self.kind {
            RouteNodeKind::Leaf => Box::pin(async { Ok(None) }),
            RouteNodeKind::Parent(_) => {
                let load = (self.loader)();
                Box::pin(async move { Ok(Some(load.await?.default)) })
            }
        }
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("path", &self.path)
            .field("path_match", &self.path_match)
            .field("children", &self.children())
            .finish_non_exhaustive()
    }
}

/// What a resolved route renders
#[derive(Clone)]
pub enum RouteTarget {
    Component(Component),
    Children(Arc<[RouteNode]>),
}

/// A route config returned by [`RouteNode::load_children`]
#[derive(Clone)]
pub struct RouteConfig {
    pub path: String,
    /// Set only when the module's metadata overrides the match mode
    pub path_match: Option<PathMatch>,
    pub target: RouteTarget,
    pub title: Option<String>,
    pub data: Option<Arc<RouteData>>,
    pub resolve: Option<Arc<Resolvers>>,
    pub can_activate: Vec<Guard>,
    pub redirect_to: Option<String>,
}

impl RouteConfig {
    fn new(target: RouteTarget) -> Self {
        Self {
            path: String::new(),
            path_match: None,
            target,
            title: None,
            data: None,
            resolve: None,
            can_activate: Vec::new(),
            redirect_to: None,
        }
    }

    /// Pathless config rendering `component`
    pub fn for_component(component: Component) -> Self {
        Self::new(RouteTarget::Component(component))
    }

    /// Pathless config hosting `children`
    pub fn for_children(children: Arc<[RouteNode]>) -> Self {
        Self::new(RouteTarget::Children(children))
    }

    pub fn component(&self) -> Option<&Component> {
        match &self.target {
            RouteTarget::Component(component) => Some(component),
            RouteTarget::Children(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[RouteNode]> {
        match &self.target {
            RouteTarget::Component(_) => None,
            RouteTarget::Children(children) => Some(children),
        }
    }
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("RouteConfig");
        out.field("path", &self.path);
        match &self.target {
            RouteTarget::Component(component) => out.field("component", component),
            RouteTarget::Children(children) => out.field("children", children),
        };
        out.field("title", &self.title)
            .field("data", &self.data)
            .field(
                "resolve",
                &self.resolve.as_ref().map(|r| r.keys().collect::<Vec<_>>()),
            )
            .field("redirect_to", &self.redirect_to)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::module_loader;

    fn loader(name: &'static str) -> ModuleLoader {
        module_loader(move || async move { Ok(ModuleRecord::new(Component::named(name))) })
    }

    fn leaf(path: &str) -> RouteNode {
        RouteNode {
            path: path.to_string(),
            path_match: PathMatch::Prefix,
            loader: loader("Leaf"),
            kind: RouteNodeKind::Leaf,
        }
    }

    #[tokio::test]
    async fn test_leaf_loads_single_component_route() {
        let node = leaf("about");
        let routes = node.load_children().await.unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "");
        assert_eq!(routes[0].component().unwrap().name(), "Leaf");
        assert!(node.load_component().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_parent_loads_wrapper_route() {
        let node = RouteNode {
            path: "products".to_string(),
            path_match: PathMatch::Prefix,
            loader: loader("Products"),
            kind: RouteNodeKind::Parent(vec![leaf(":id")].into()),
        };
        let routes = node.load_children().await.unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "");
        let children = routes[0].children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path(), ":id");

        let component = node.load_component().await.unwrap().unwrap();
        assert_eq!(component.name(), "Products");
    }

    #[test]
    fn test_path_match_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PathMatch::Exact).unwrap(), "\"exact\"");
        assert_eq!(serde_json::to_string(&PathMatch::Prefix).unwrap(), "\"prefix\"");
    }
}
