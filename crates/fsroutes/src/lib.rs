//! # fsroutes
//!
//! Compiles a flat set of file-system route identifiers into a nested,
//! lazily loaded route configuration tree:
//! - Static routes (`about.ts` → `about`)
//! - Dynamic parameters (`[id].ts` → `:id`)
//! - Catch-all routes (`[...slug].ts` → `**`)
//! - Index and group files (`index.ts`, `(home).ts` → exact, empty path)
//! - Dot-joined nesting in one file (`blog.[slug].ts` → `blog/:slug`)
//! - Markdown content files with YAML front matter
//!
//! The compiler never loads modules itself. Each [`RouteNode`] keeps the
//! loader it was given and resolves its configuration on demand through
//! [`RouteNode::load_children`].
//!
//! ## Example
//!
//! ```
//! use fsroutes::{get_routes, Component, ModuleRecord, PathMatch, SourceSet};
//!
//! let mut sources = SourceSet::new();
//! sources
//!     .insert_record("/src/app/routes/index.ts", ModuleRecord::new(Component::named("Home")))
//!     .insert_record("/src/app/routes/products.ts", ModuleRecord::new(Component::named("Products")))
//!     .insert_record(
//!         "/src/app/routes/products/[productId].ts",
//!         ModuleRecord::new(Component::named("Product")),
//!     );
//!
//! let routes = get_routes(sources);
//! assert_eq!(routes.len(), 2);
//! assert_eq!(routes[0].path(), "products");
//! assert_eq!(routes[1].path(), "");
//! assert_eq!(routes[1].path_match(), PathMatch::Exact);
//! assert_eq!(routes[0].children().unwrap()[0].path(), ":productId");
//! ```

pub mod config;
pub mod content;
pub mod discover;
pub mod meta;
pub mod module;
pub mod path;
pub mod route;

pub use config::{RouteConventions, RoutesFile};
pub use content::{markdown_component, to_markdown_module, MarkdownRouteComponent, CONTENT_DATA_KEY};
pub use discover::SourceSet;
pub use meta::{
    guard, merge_route_meta, resolver, Guard, MetaTag, PageMeta, Resolver, Resolvers, RouteData,
    RouteMeta, RouteMetaTags, ROUTE_META_TAGS_KEY,
};
pub use module::{
    content_loader, module_loader, BoxFuture, Component, ContentLoader, ModuleLoader,
    ModuleRecord, RouteParams, SourceEntry, SourceLoader,
};
pub use route::{PathMatch, RouteConfig, RouteNode, RouteNodeKind, RouteTarget};

use route::builder::RouteTreeBuilder;

/// Compiles source entries into the route forest using default conventions
pub fn get_routes<I>(sources: I) -> Vec<RouteNode>
where
    I: IntoIterator<Item = SourceEntry>,
{
    get_routes_with(sources, &RouteConventions::default())
}

/// Compiles source entries into the route forest
///
/// Entries are processed shortest identifier first (stable for equal
/// lengths), so files declaring a parent route are linked before the files
/// nested beneath them. The result does not depend on input order beyond
/// ties in identifier length.
pub fn get_routes_with<I>(sources: I, conventions: &RouteConventions) -> Vec<RouteNode>
where
    I: IntoIterator<Item = SourceEntry>,
{
    let mut entries: Vec<SourceEntry> = sources.into_iter().collect();
    entries.sort_by_key(|entry| entry.id.len());

    entries
        .into_iter()
        .fold(RouteTreeBuilder::new(conventions), |mut builder, entry| {
            builder.insert(entry);
            builder
        })
        .build()
}
