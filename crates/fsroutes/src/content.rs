//! Markdown adapter: presents a content file as a route module
//!
//! Content files resolve to raw text. The adapter splits off YAML front
//! matter and produces a [`ModuleRecord`] whose default view is the shared
//! [`MarkdownRouteComponent`]; the body travels in the route's `data`.

use std::sync::Arc;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use crate::meta::{MetaTag, PageMeta, RouteData, RouteMeta, RouteMetaTags};
use crate::module::{BoxFuture, Component, ContentLoader, ModuleLoader, ModuleRecord};

/// `data` key holding the markdown body
pub const CONTENT_DATA_KEY: &str = "_routeContent";

/// `data` key holding the remaining front matter attributes
pub const CONTENT_ATTRIBUTES_KEY: &str = "_routeContentAttributes";

/// View rendering the markdown body found under [`CONTENT_DATA_KEY`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownRouteComponent;

static MARKDOWN_COMPONENT: Lazy<Component> =
    Lazy::new(|| Component::new("MarkdownRouteComponent", MarkdownRouteComponent));

/// The component every content route renders with
pub fn markdown_component() -> Component {
    MARKDOWN_COMPONENT.clone()
}

/// Front matter attributes understood by the adapter
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    meta: Option<Vec<MetaTag>>,
    #[serde(flatten)]
    attributes: serde_json::Map<String, Value>,
}

/// Splits raw content into `(front matter, body)`
///
/// Front matter is the block between a leading `---` line and the next
/// `---` line. Without it the whole input is the body.
///
/// # Examples
///
/// ```
/// use fsroutes::content::split_front_matter;
///
/// let (front, body) = split_front_matter("---\ntitle: Intro\n---\n# Intro\n");
/// assert_eq!(front, Some("title: Intro\n"));
/// assert_eq!(body, "# Intro\n");
///
/// let (front, body) = split_front_matter("# No front matter");
/// assert_eq!(front, None);
/// assert_eq!(body, "# No front matter");
/// ```
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Parses raw content into the module record the router consumes
pub fn parse_content(raw: &str) -> Result<ModuleRecord> {
    let (front, body) = split_front_matter(raw);

    let front: FrontMatter = match front {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str(yaml).context("Failed to parse content front matter")?
        }
        _ => FrontMatter::default(),
    };

    let mut data = RouteData::new();
    data.insert(CONTENT_DATA_KEY.to_string(), Value::String(body.to_string()));
    if !front.attributes.is_empty() {
        data.insert(
            CONTENT_ATTRIBUTES_KEY.to_string(),
            Value::Object(front.attributes),
        );
    }

    let meta = PageMeta {
        title: front.title,
        data: Some(Arc::new(data)),
        meta: front.meta.map(RouteMetaTags::Static),
        ..PageMeta::default()
    };

    Ok(ModuleRecord::new(markdown_component()).with_meta(RouteMeta::Page(meta)))
}

/// Wraps a content loader so it yields a module record
///
/// Parsing happens on every invocation, after the content has loaded.
pub fn to_markdown_module(loader: ContentLoader) -> ModuleLoader {
    Arc::new(move || -> BoxFuture<'static, Result<ModuleRecord>> {
        let load = loader();
        Box::pin(async move {
            let raw = load.await?;
            parse_content(&raw)
        })
    })
}
