//! Source sets: the identifier → loader mapping handed to the compiler
//!
//! Besides manual registration, content files can be discovered on disk.
//! Code modules cannot be loaded from Rust, so hosts register those
//! themselves.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::RouteConventions;
use crate::module::{BoxFuture, ModuleRecord, SourceEntry, SourceLoader};
use crate::path::strip_route_root;

/// Ordered collection of source entries, unique by identifier
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    entries: Vec<SourceEntry>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any entry with the same identifier in place
    pub fn insert(&mut self, entry: SourceEntry) -> &mut Self {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn insert_module<F, Fut>(&mut self, id: impl Into<String>, load: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ModuleRecord>> + Send + 'static,
    {
        self.insert(SourceEntry::module(id, load))
    }

    pub fn insert_content<F, Fut>(&mut self, id: impl Into<String>, load: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        self.insert(SourceEntry::content(id, load))
    }

    pub fn insert_record(&mut self, id: impl Into<String>, record: ModuleRecord) -> &mut Self {
        self.insert(SourceEntry::record(id, record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Registers every content file found under a route directory
    ///
    /// Identifiers are the file paths relative to `project_root`, with a
    /// leading `/` (e.g. `/src/app/routes/docs/intro.md`). Each loader reads
    /// the file asynchronously when invoked. Returns the number of files added.
    pub fn discover_content(
        &mut self,
        project_root: impl AsRef<Path>,
        conventions: &RouteConventions,
    ) -> Result<usize> {
        let root = project_root.as_ref();
        let mut added = 0;

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !conventions.is_ignored_dir(&entry.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry =
                entry.with_context(|| format!("Failed to walk content directory: {:?}", root))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .with_context(|| format!("Path outside project root: {:?}", entry.path()))?;
            let id = to_identifier(relative);

            if !conventions.is_content_file(&id) {
                continue;
            }
            if strip_route_root(&id, conventions).len() == id.len() {
                trace!(id = %id, "skipping content outside route directories");
                continue;
            }

            self.insert(SourceEntry::new(
                id,
                SourceLoader::Content(read_file_loader(entry.into_path())),
            ));
            added += 1;
        }

        debug!(root = ?root, added, "discovered content files");
        Ok(added)
    }
}

/// `/`-separated identifier for a project-relative path
fn to_identifier(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .fold(String::new(), |mut id, part| {
            id.push('/');
            id.push_str(&part);
            id
        })
}

fn read_file_loader(path: PathBuf) -> crate::module::ContentLoader {
    Arc::new(move || -> BoxFuture<'static, Result<String>> {
        let path = path.clone();
        Box::pin(async move {
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read content file: {:?}", path))
        })
    })
}

impl IntoIterator for SourceSet {
    type Item = SourceEntry;
    type IntoIter = std::vec::IntoIter<SourceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<SourceEntry> for SourceSet {
    fn from_iter<I: IntoIterator<Item = SourceEntry>>(iter: I) -> Self {
        let mut set = SourceSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl Extend<SourceEntry> for SourceSet {
    fn extend<I: IntoIterator<Item = SourceEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Component;
    use std::fs;

    #[test]
    fn test_insert_replaces_same_identifier() {
        let mut set = SourceSet::new();
        set.insert_record("/app/routes/a.ts", ModuleRecord::new(Component::named("A")))
            .insert_record("/app/routes/b.ts", ModuleRecord::new(Component::named("B")))
            .insert_record("/app/routes/a.ts", ModuleRecord::new(Component::named("A2")));

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.ids().collect::<Vec<_>>(),
            vec!["/app/routes/a.ts", "/app/routes/b.ts"]
        );
    }

    #[test]
    fn test_to_identifier() {
        let id = to_identifier(Path::new("src/app/routes/intro.md"));
        assert_eq!(id, "/src/app/routes/intro.md");
    }

    #[tokio::test]
    async fn test_discover_content() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("src/app/routes/docs");
        fs::create_dir_all(&routes).unwrap();
        fs::write(routes.join("intro.md"), "---\ntitle: Intro\n---\nHello").unwrap();
        fs::write(routes.join("about.ts"), "export default {}").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let ignored = dir.path().join("node_modules/pkg/src/routes");
        fs::create_dir_all(&ignored).unwrap();
        fs::write(ignored.join("skip.md"), "skip").unwrap();

        let mut set = SourceSet::new();
        let added = set
            .discover_content(dir.path(), &RouteConventions::default())
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(
            set.ids().collect::<Vec<_>>(),
            vec!["/src/app/routes/docs/intro.md"]
        );

        let entry = set.into_iter().next().unwrap();
        let record = entry.loader.into_module_loader()().await.unwrap();
        assert_eq!(record.default.name(), "MarkdownRouteComponent");
    }

    #[tokio::test]
    async fn test_discovered_loader_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("app/pages");
        fs::create_dir_all(&routes).unwrap();
        fs::write(routes.join("gone.md"), "bye").unwrap();

        let mut set = SourceSet::new();
        set.discover_content(dir.path(), &RouteConventions::default())
            .unwrap();
        fs::remove_file(routes.join("gone.md")).unwrap();

        let entry = set.into_iter().next().unwrap();
        let err = entry.loader.into_module_loader()().await.unwrap_err();
        assert!(err.to_string().contains("gone.md"));
    }
}
