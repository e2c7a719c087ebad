//! Identifier normalization: source file identifier → raw route segments
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RouteConventions;
use crate::route::pattern::WILDCARD;

static CATCH_ALL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\.{3}[^\]]+\]").expect("catch-all token regex"));

static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("param token regex"));

/// Strips everything up to and including the route root directory
///
/// The route root is the first path component named like one of the
/// configured route directories, provided at least one directory precedes
/// it (`/app/routes`, `/src/app/pages`, ...). Identifiers without a route
/// root are returned unchanged.
///
/// # Examples
///
/// ```
/// use fsroutes::path::strip_route_root;
/// use fsroutes::RouteConventions;
///
/// let conventions = RouteConventions::default();
/// assert_eq!(strip_route_root("/app/routes/about.ts", &conventions), "/about.ts");
/// assert_eq!(strip_route_root("/src/app/pages/blog/index.page.ts", &conventions), "/blog/index.page.ts");
/// assert_eq!(strip_route_root("/routes/about.ts", &conventions), "/routes/about.ts");
/// ```
pub fn strip_route_root<'a>(identifier: &'a str, conventions: &RouteConventions) -> &'a str {
    let trimmed = identifier.trim_start_matches('/');
    let mut offset = identifier.len() - trimmed.len();

    for (index, part) in trimmed.split('/').enumerate() {
        let end = offset + part.len();
        if index > 0 && conventions.is_route_dir(part) {
            return &identifier[end..];
        }
        offset = end + 1;
    }

    identifier
}

/// Strips a known module or content extension, then the page suffix
///
/// # Examples
///
/// ```
/// use fsroutes::path::strip_extension;
/// use fsroutes::RouteConventions;
///
/// let conventions = RouteConventions::default();
/// assert_eq!(strip_extension("/about.page.ts", &conventions), "/about");
/// assert_eq!(strip_extension("/intro.md", &conventions), "/intro");
/// assert_eq!(strip_extension("/styles.css", &conventions), "/styles.css");
/// ```
pub fn strip_extension<'a>(path: &'a str, conventions: &RouteConventions) -> &'a str {
    let stem = match path.rsplit_once('.') {
        Some((stem, ext))
            if conventions.is_module_extension(ext) || conventions.is_content_extension(ext) =>
        {
            stem
        }
        _ => return path,
    };

    conventions
        .page_suffix
        .as_deref()
        .and_then(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(stem)
}

/// Rewrites bracket tokens into route syntax
///
/// **Pure function** with zero-copy optimization using `Cow<'_, str>`:
/// paths without brackets are returned borrowed.
///
/// - `[...name]` → `**` (first occurrence)
/// - `[name]` → `:name`
///
/// # Examples
///
/// ```
/// use fsroutes::path::replace_param_tokens;
/// use std::borrow::Cow;
///
/// assert!(matches!(replace_param_tokens("/about"), Cow::Borrowed("/about")));
/// assert_eq!(replace_param_tokens("/products/[productId]"), "/products/:productId");
/// assert_eq!(replace_param_tokens("/[...not-found]"), "/**");
/// assert_eq!(replace_param_tokens("/blog.[slug]"), "/blog.:slug");
/// ```
pub fn replace_param_tokens(path: &str) -> Cow<'_, str> {
    // Fast path: nothing to rewrite
    if !path.contains('[') {
        return Cow::Borrowed(path);
    }

    let with_wildcard = CATCH_ALL_TOKEN.replace(path, WILDCARD);
    Cow::Owned(PARAM_TOKEN.replace_all(&with_wildcard, ":$1").into_owned())
}

/// Normalizes a source identifier into its ordered raw segments
///
/// Functional pipeline: strip root → strip extension → rewrite tokens →
/// split on `/` → drop empty pieces.
///
/// # Examples
///
/// ```
/// use fsroutes::path::normalize_identifier;
/// use fsroutes::RouteConventions;
///
/// let conventions = RouteConventions::default();
/// assert_eq!(
///     normalize_identifier("/src/app/routes/products/[productId].ts", &conventions),
///     vec!["products", ":productId"]
/// );
/// assert_eq!(
///     normalize_identifier("/app/routes/categories.[categoryId].ts", &conventions),
///     vec!["categories.:categoryId"]
/// );
/// ```
pub fn normalize_identifier(identifier: &str, conventions: &RouteConventions) -> Vec<String> {
    let relative = strip_route_root(identifier, conventions);
    let stem = strip_extension(relative, conventions);

    replace_param_tokens(stem)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
