//! Module records, views and the deferred loaders that produce them
//!
//! The compiler never loads anything itself. It only stores loaders and
//! wires them into route nodes; the consuming runtime decides when they run.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;

use crate::content::to_markdown_module;
use crate::meta::RouteMeta;

/// Boxed, sendable future returned by every loader in this crate
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters extracted from the URL by the consuming router
pub type RouteParams = HashMap<String, String>;

/// Deferred loader resolving a source file to its module record
pub type ModuleLoader = Arc<dyn Fn() -> BoxFuture<'static, Result<ModuleRecord>> + Send + Sync>;

/// Deferred loader resolving a content file to its raw text
pub type ContentLoader = Arc<dyn Fn() -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Opaque handle to a view component
///
/// Two handles are equal when they point at the same registered view, which
/// lets callers check that a route resolved to the component they supplied.
///
/// # Examples
///
/// ```
/// use fsroutes::Component;
///
/// struct AboutPage;
///
/// let about = Component::new("AboutPage", AboutPage);
/// assert_eq!(about.name(), "AboutPage");
/// assert!(about.downcast_ref::<AboutPage>().is_some());
/// assert_eq!(about, about.clone());
/// assert_ne!(about, Component::new("AboutPage", AboutPage));
/// ```
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    view: Arc<dyn Any + Send + Sync>,
}

impl Component {
    /// Registers a view under a display name
    pub fn new<T: Any + Send + Sync>(name: impl Into<Arc<str>>, view: T) -> Self {
        Self {
            name: name.into(),
            view: Arc::new(view),
        }
    }

    /// Creates a component carrying no view value, identified by name only
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, ())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrows the registered view if it has type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.view.downcast_ref::<T>()
    }

    /// Whether both handles point at the same registered view
    pub fn ptr_eq(&self, other: &Component) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.view), Arc::as_ptr(&other.view))
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// What a source file resolves to: a default view plus optional route metadata
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// The view rendered for the route
    pub default: Component,
    /// Declarative metadata attached to the route
    pub route_meta: Option<RouteMeta>,
}

impl ModuleRecord {
    pub fn new(default: Component) -> Self {
        Self {
            default,
            route_meta: None,
        }
    }

    /// Attaches route metadata
    pub fn with_meta(mut self, meta: impl Into<RouteMeta>) -> Self {
        self.route_meta = Some(meta.into());
        self
    }
}

/// Wraps an async function into a [`ModuleLoader`]
///
/// # Examples
///
/// ```
/// use fsroutes::{module_loader, Component, ModuleRecord};
///
/// let loader = module_loader(|| async { Ok(ModuleRecord::new(Component::named("Home"))) });
/// let _pending = loader();
/// ```
pub fn module_loader<F, Fut>(load: F) -> ModuleLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ModuleRecord>> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<'static, Result<ModuleRecord>> { Box::pin(load()) })
}

/// Wraps an async function into a [`ContentLoader`]
pub fn content_loader<F, Fut>(load: F) -> ContentLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<'static, Result<String>> { Box::pin(load()) })
}

/// The loader supplied for one source file
///
/// Code modules resolve straight to a [`ModuleRecord`]; content files
/// resolve to raw text and pass through the markdown adapter first.
#[derive(Clone)]
pub enum SourceLoader {
    Module(ModuleLoader),
    Content(ContentLoader),
}

impl SourceLoader {
    /// Converts the loader into one that always yields a module record
    pub fn into_module_loader(self) -> ModuleLoader {
        match self {
            SourceLoader::Module(loader) => loader,
            SourceLoader::Content(loader) => to_markdown_module(loader),
        }
    }
}

impl fmt::Debug for SourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLoader::Module(_) => f.write_str("SourceLoader::Module(..)"),
            SourceLoader::Content(_) => f.write_str("SourceLoader::Content(..)"),
        }
    }
}

/// One virtual file identifier plus its deferred loader
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Identifier in the virtual file system, e.g. `/src/app/routes/about.ts`
    pub id: String,
    pub loader: SourceLoader,
}

impl SourceEntry {
    pub fn new(id: impl Into<String>, loader: SourceLoader) -> Self {
        Self {
            id: id.into(),
            loader,
        }
    }

    /// Entry for a code module resolved by an async function
    pub fn module<F, Fut>(id: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ModuleRecord>> + Send + 'static,
    {
        Self::new(id, SourceLoader::Module(module_loader(load)))
    }

    /// Entry for a content file resolved by an async function
    pub fn content<F, Fut>(id: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self::new(id, SourceLoader::Content(content_loader(load)))
    }

    /// Entry whose loader always yields a clone of `record`
    pub fn record(id: impl Into<String>, record: ModuleRecord) -> Self {
        Self::module(id, move || {
            let record = record.clone();
            async move { Ok(record) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_entry_yields_same_component() {
        let component = Component::named("About");
        let entry = SourceEntry::record("/app/routes/about.ts", ModuleRecord::new(component.clone()));
        let loader = entry.loader.into_module_loader();

        let first = loader().await.unwrap();
        let second = loader().await.unwrap();
        assert_eq!(first.default, component);
        assert_eq!(second.default, component);
    }

    #[tokio::test]
    async fn test_content_entry_goes_through_markdown_adapter() {
        let entry = SourceEntry::content("/src/app/routes/intro.md", || async {
            Ok("# Intro".to_string())
        });
        let record = entry.loader.into_module_loader()().await.unwrap();
        assert_eq!(record.default.name(), "MarkdownRouteComponent");
        assert!(record.route_meta.is_some());
    }

    #[test]
    fn test_component_identity() {
        let a = Component::named("A");
        let b = Component::named("A");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(format!("{:?}", a), "Component(\"A\")");
    }
}
