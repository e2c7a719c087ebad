// File: src/config.rs
// Purpose: Identifier conventions, optionally loaded from a TOML file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Conventions used to turn source identifiers into route segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConventions {
    /// Directory names that mark a route root (default: "routes", "pages")
    #[serde(default = "default_route_dirs")]
    pub route_dirs: Vec<String>,

    /// Filename suffix removed after the extension (default: ".page")
    #[serde(default = "default_page_suffix")]
    pub page_suffix: Option<String>,

    /// Extensions of code modules (default: "ts", "js")
    #[serde(default = "default_module_extensions")]
    pub module_extensions: Vec<String>,

    /// Extensions of content files wrapped by the markdown adapter (default: "md")
    #[serde(default = "default_content_extensions")]
    pub content_extensions: Vec<String>,

    /// Directories never entered by content discovery
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

/// Layout of a config file: conventions live under a `[routes]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesFile {
    #[serde(default)]
    pub routes: RouteConventions,
}

// Default values
fn default_route_dirs() -> Vec<String> {
    vec!["routes".to_string(), "pages".to_string()]
}

fn default_page_suffix() -> Option<String> {
    Some(".page".to_string())
}

fn default_module_extensions() -> Vec<String> {
    vec!["ts".to_string(), "js".to_string()]
}

fn default_content_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_ignored_dirs() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "target".to_string(),
        "dist".to_string(),
    ]
}

impl Default for RouteConventions {
    fn default() -> Self {
        Self {
            route_dirs: default_route_dirs(),
            page_suffix: default_page_suffix(),
            module_extensions: default_module_extensions(),
            content_extensions: default_content_extensions(),
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

impl RouteConventions {
    /// Load conventions from the `[routes]` table of a TOML file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routes config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse routes config: {:?}", path))
    }

    /// Parse conventions from TOML text holding a `[routes]` table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: RoutesFile = toml::from_str(content)?;
        Ok(file.routes)
    }

    pub fn is_route_dir(&self, name: &str) -> bool {
        self.route_dirs.iter().any(|dir| dir == name)
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.ignored_dirs.iter().any(|dir| dir == name)
    }

    pub fn is_module_extension(&self, ext: &str) -> bool {
        self.module_extensions.iter().any(|e| e == ext)
    }

    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.content_extensions.iter().any(|e| e == ext)
    }

    /// Whether an identifier names a content file
    pub fn is_content_file(&self, identifier: &str) -> bool {
        identifier
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.is_content_extension(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_conventions() {
        let conventions = RouteConventions::default();
        assert!(conventions.is_route_dir("routes"));
        assert!(conventions.is_route_dir("pages"));
        assert_eq!(conventions.page_suffix.as_deref(), Some(".page"));
        assert!(conventions.is_module_extension("ts"));
        assert!(conventions.is_content_file("/src/app/routes/intro.md"));
        assert!(!conventions.is_content_file("/src/app/routes/intro.ts"));
    }

    #[test]
    fn test_empty_config() {
        let conventions = RouteConventions::from_toml_str("").unwrap();
        assert_eq!(conventions, RouteConventions::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml = r#"
            [project]
            name = "docs"

            [routes]
            route_dirs = ["views"]
            content_extensions = ["md", "markdown"]
        "#;
        let conventions = RouteConventions::from_toml_str(toml).unwrap();
        assert_eq!(conventions.route_dirs, vec!["views"]);
        assert!(conventions.is_content_extension("markdown"));
        assert_eq!(conventions.module_extensions, vec!["ts", "js"]);
        assert_eq!(conventions.page_suffix.as_deref(), Some(".page"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let conventions = RouteConventions::load(dir.path().join("fsroutes.toml")).unwrap();
        assert_eq!(conventions, RouteConventions::default());
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fsroutes.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[routes]\nroute_dirs = 3").unwrap();

        let err = RouteConventions::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("fsroutes.toml"));
    }
}
