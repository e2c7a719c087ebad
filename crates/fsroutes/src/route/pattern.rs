//! Segment classification for file-based route identifiers
//!
//! Pure functional parsing of normalized path segments into typed segments.
//! All functions are **pure**: same input → same output, no side effects.

use crate::route::node::PathMatch;

/// Path text contributed by a catch-all segment
pub const WILDCARD: &str = "**";

/// Prefix marking a dynamic parameter in a normalized segment
pub const PARAM_MARKER: char = ':';

/// Filename that contributes no path of its own
pub const INDEX_SEGMENT: &str = "index";

/// Kind of a route segment
///
/// Functional sum type for pattern matching route segments.
///
/// # Examples
///
/// ```
/// use fsroutes::route::pattern::{classify_segment, SegmentKind};
///
/// assert_eq!(classify_segment("about").kind, SegmentKind::Static);
/// assert_eq!(classify_segment(":id").kind, SegmentKind::Dynamic("id".to_string()));
/// assert_eq!(classify_segment("**").kind, SegmentKind::CatchAll);
/// assert_eq!(classify_segment("index").kind, SegmentKind::Index);
/// assert_eq!(classify_segment("(home)").kind, SegmentKind::Group("home".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal text, possibly spanning several levels (`blog.:slug`)
    Static,
    /// Dynamic parameter: `:id`, carrying the parameter name
    Dynamic(String),
    /// Catch-all: `**`
    CatchAll,
    /// `index` file
    Index,
    /// Parenthesized group: `(name)`
    Group(String),
}

/// One classified segment of a route identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment text as produced by the path normalizer
    pub raw: String,
    pub kind: SegmentKind,
    /// Route path contributed by the segment; `.` already expanded to `/`
    pub path: String,
}

impl Segment {
    /// Index and group segments contribute no path text
    pub fn is_pathless(&self) -> bool {
        matches!(self.kind, SegmentKind::Index | SegmentKind::Group(_))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, SegmentKind::Dynamic(_))
    }

    pub fn is_catch_all(&self) -> bool {
        self.kind == SegmentKind::CatchAll
    }

    /// Matching mode of the segment at a given position
    ///
    /// Only a pathless segment that ends its identifier matches exactly; one
    /// that hosts further segments must match by prefix to reach them.
    ///
    /// ```
    /// use fsroutes::{route::pattern::classify_segment, PathMatch};
    ///
    /// assert_eq!(classify_segment("index").path_match(true), PathMatch::Exact);
    /// assert_eq!(classify_segment("(auth)").path_match(false), PathMatch::Prefix);
    /// assert_eq!(classify_segment("about").path_match(true), PathMatch::Prefix);
    /// ```
    pub fn path_match(&self, terminal: bool) -> PathMatch {
        if terminal && self.is_pathless() {
            PathMatch::Exact
        } else {
            PathMatch::Prefix
        }
    }
}

/// Checks whether a segment is a parenthesized group token: `(name)`
fn group_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('(').and_then(|s| s.strip_suffix(')'))
}

/// Classifies a normalized segment (pure function)
///
/// # Rules (evaluated in order)
///
/// 1. **Index / group**: `index` or `(name)` → empty path
/// 2. **Catch-all**: `**` → path `**`
/// 3. **Dynamic**: starts with `:` → path kept
/// 4. **Static**: any other text
///
/// Internal `.` characters become `/`, so `categories.:categoryId` expands
/// to the two-level path `categories/:categoryId`.
///
/// # Examples
///
/// ```
/// use fsroutes::route::pattern::classify_segment;
///
/// let seg = classify_segment("categories.:categoryId.products.:productId");
/// assert_eq!(seg.path, "categories/:categoryId/products/:productId");
///
/// let seg = classify_segment("(home)");
/// assert_eq!(seg.path, "");
/// ```
pub fn classify_segment(segment: &str) -> Segment {
    let raw = segment.to_string();

    if segment == INDEX_SEGMENT {
        return Segment {
            raw,
            kind: SegmentKind::Index,
            path: String::new(),
        };
    }

    if let Some(name) = group_name(segment) {
        return Segment {
            raw,
            kind: SegmentKind::Group(name.to_string()),
            path: String::new(),
        };
    }

    let path = segment.replace('.', "/");

    let kind = if path == WILDCARD {
        SegmentKind::CatchAll
    } else if let Some(rest) = path.strip_prefix(PARAM_MARKER) {
        let name = rest.split('/').next().unwrap_or(rest);
        SegmentKind::Dynamic(name.to_string())
    } else {
        SegmentKind::Static
    };

    Segment { raw, kind, path }
}

/// Whether a node with this path is placed ahead of its siblings
///
/// Static paths (starting with a word character) and multi-level paths are
/// inserted at the front; catch-all, dynamic and empty paths go to the back.
/// This keeps static routes ahead of wildcards in every sibling list.
///
/// ```
/// use fsroutes::route::pattern::precedes_wildcards;
///
/// assert!(precedes_wildcards("about"));
/// assert!(precedes_wildcards(":id/edit"));
/// assert!(!precedes_wildcards(":id"));
/// assert!(!precedes_wildcards("**"));
/// assert!(!precedes_wildcards(""));
/// ```
pub fn precedes_wildcards(path: &str) -> bool {
    if path.is_empty() || path == WILDCARD {
        return false;
    }

    let starts_with_word = path
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');

    starts_with_word || path.contains('/')
}
