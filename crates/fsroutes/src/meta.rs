//! Declarative route metadata and its merge into resolved route configs
//!
//! A module may declare a title, an arbitrary `data` dictionary, a
//! dictionary of `resolve` functions, guards and a list of meta tags. The
//! router consumes only `data` and `resolve`, so meta tags are folded into
//! one of them under [`ROUTE_META_TAGS_KEY`]:
//!
//! - a static tag list extends a fresh copy of `data`
//! - a tag resolver extends a fresh copy of `resolve`
//!
//! The dictionary that is not extended is handed through as the same `Arc`,
//! so `Arc::ptr_eq` tells whether a dictionary was rewritten.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::module::{BoxFuture, RouteParams};
use crate::route::node::{PathMatch, RouteConfig};

/// Well-known key under which meta tags are stored in `data` or `resolve`
pub const ROUTE_META_TAGS_KEY: &str = "__fsroutes_meta_tags__";

/// Arbitrary static data attached to a route
pub type RouteData = serde_json::Map<String, Value>;

/// Async function producing one value of route data at navigation time
pub type Resolver = Arc<dyn Fn(&RouteParams) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Named resolvers attached to a route
pub type Resolvers = BTreeMap<String, Resolver>;

/// Async predicate deciding whether a route may be activated
pub type Guard = Arc<dyn Fn(&RouteParams) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// Wraps an async function into a [`Resolver`]
pub fn resolver<F, Fut>(resolve: F) -> Resolver
where
    F: Fn(&RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |params: &RouteParams| -> BoxFuture<'static, Result<Value>> {
        Box::pin(resolve(params))
    })
}

/// Wraps an async function into a [`Guard`]
pub fn guard<F, Fut>(check: F) -> Guard
where
    F: Fn(&RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    Arc::new(move |params: &RouteParams| -> BoxFuture<'static, Result<bool>> {
        Box::pin(check(params))
    })
}

/// One HTML `<meta>` tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_equiv: Option<String>,
}

impl MetaTag {
    /// `<meta name=".." content="..">`
    pub fn name(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// `<meta property=".." content="..">`
    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// `<meta charset="..">`
    pub fn charset(charset: impl Into<String>) -> Self {
        Self {
            charset: Some(charset.into()),
            ..Default::default()
        }
    }

    /// JSON object holding only the attributes that are set
    pub fn to_json(&self) -> Value {
        let attributes = [
            ("charset", &self.charset),
            ("name", &self.name),
            ("content", &self.content),
            ("property", &self.property),
            ("httpEquiv", &self.http_equiv),
        ];

        Value::Object(
            attributes
                .into_iter()
                .filter_map(|(key, value)| {
                    value
                        .as_ref()
                        .map(|v| (key.to_string(), Value::String(v.clone())))
                })
                .collect(),
        )
    }
}

/// JSON array form of a tag list, as stored under [`ROUTE_META_TAGS_KEY`]
pub fn meta_tags_value(tags: &[MetaTag]) -> Value {
    Value::Array(tags.iter().map(MetaTag::to_json).collect())
}

/// Meta tags declared by a route: fixed, or computed at navigation time
#[derive(Clone)]
pub enum RouteMetaTags {
    Static(Vec<MetaTag>),
    Resolver(Resolver),
}

impl RouteMetaTags {
    /// Builds the resolver form from an async function returning tags
    pub fn resolver<F, Fut>(resolve: F) -> Self
    where
        F: Fn(&RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<MetaTag>>> + Send + 'static,
    {
        RouteMetaTags::Resolver(resolver(move |params| {
            let tags = resolve(params);
            async move { Ok(meta_tags_value(&tags.await?)) }
        }))
    }
}

impl fmt::Debug for RouteMetaTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMetaTags::Static(tags) => f.debug_tuple("Static").field(tags).finish(),
            RouteMetaTags::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Metadata of a page route
#[derive(Clone, Default)]
pub struct PageMeta {
    pub title: Option<String>,
    pub data: Option<Arc<RouteData>>,
    pub resolve: Option<Arc<Resolvers>>,
    pub meta: Option<RouteMetaTags>,
    pub can_activate: Vec<Guard>,
}

impl PageMeta {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_data(mut self, data: RouteData) -> Self {
        self.data = Some(Arc::new(data));
        self
    }

    pub fn with_resolve(mut self, resolve: Resolvers) -> Self {
        self.resolve = Some(Arc::new(resolve));
        self
    }

    pub fn with_meta(mut self, meta: RouteMetaTags) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.can_activate.push(guard);
        self
    }
}

impl fmt::Debug for PageMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageMeta")
            .field("title", &self.title)
            .field("data", &self.data)
            .field(
                "resolve",
                &self.resolve.as_ref().map(|r| r.keys().collect::<Vec<_>>()),
            )
            .field("meta", &self.meta)
            .field("can_activate", &self.can_activate.len())
            .finish()
    }
}

/// Metadata a route module may export
#[derive(Debug, Clone)]
pub enum RouteMeta {
    /// Regular page metadata
    Page(PageMeta),
    /// The route only redirects elsewhere
    Redirect {
        redirect_to: String,
        path_match: PathMatch,
    },
}

impl RouteMeta {
    pub fn redirect(redirect_to: impl Into<String>, path_match: PathMatch) -> Self {
        RouteMeta::Redirect {
            redirect_to: redirect_to.into(),
            path_match,
        }
    }
}

impl From<PageMeta> for RouteMeta {
    fn from(meta: PageMeta) -> Self {
        RouteMeta::Page(meta)
    }
}

/// Merges declarative metadata into a freshly built route config
///
/// The caller's metadata is only borrowed. At most one of `data` and
/// `resolve` becomes a new dictionary; the other keeps the caller's `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fsroutes::{merge_route_meta, Component, MetaTag, PageMeta, RouteConfig, RouteData,
///     RouteMeta, RouteMetaTags, ROUTE_META_TAGS_KEY};
///
/// let meta = RouteMeta::Page(
///     PageMeta::default()
///         .with_title("About")
///         .with_data(RouteData::new())
///         .with_meta(RouteMetaTags::Static(vec![MetaTag::charset("utf-8")])),
/// );
///
/// let config = merge_route_meta(RouteConfig::for_component(Component::named("About")), Some(&meta));
/// assert_eq!(config.title.as_deref(), Some("About"));
/// assert!(config.data.unwrap().contains_key(ROUTE_META_TAGS_KEY));
/// ```
pub fn merge_route_meta(mut config: RouteConfig, meta: Option<&RouteMeta>) -> RouteConfig {
    let page = match meta {
        None => return config,
        Some(RouteMeta::Redirect {
            redirect_to,
            path_match,
        }) => {
            config.redirect_to = Some(redirect_to.clone());
            config.path_match = Some(*path_match);
            return config;
        }
        Some(RouteMeta::Page(page)) => page,
    };

    config.title = page.title.clone();
    config.can_activate = page.can_activate.clone();
    config.data = page.data.clone();
    config.resolve = page.resolve.clone();

    match &page.meta {
        Some(RouteMetaTags::Static(tags)) => {
            let mut data = page.data.as_deref().cloned().unwrap_or_default();
            data.insert(ROUTE_META_TAGS_KEY.to_string(), meta_tags_value(tags));
            config.data = Some(Arc::new(data));
        }
        Some(RouteMetaTags::Resolver(resolve_tags)) => {
            let mut resolve = page.resolve.as_deref().cloned().unwrap_or_default();
            resolve.insert(ROUTE_META_TAGS_KEY.to_string(), Arc::clone(resolve_tags));
            config.resolve = Some(Arc::new(resolve));
        }
        None => {}
    }

    config
}
