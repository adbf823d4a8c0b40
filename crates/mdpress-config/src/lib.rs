use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base public path the site is served under.
    #[serde(default = "default_base")]
    pub base: String,
    /// Root of the markdown sources.
    pub docs_path: PathBuf,
    #[serde(default)]
    pub nav: Vec<NavItem>,
    #[serde(default)]
    pub sidebar: Vec<SidebarGroup>,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarGroup {
    pub text: String,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Overrides the engine's long inline code threshold when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_code_threshold: Option<usize>,
}

fn default_base() -> String {
    "/".to_string()
}

impl SiteConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: SiteConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded docs path
        config.docs_path = Self::expand_path(&config.docs_path).unwrap_or(config.docs_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::default_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::default_path())
    }

    /// The site config lives next to the content it describes.
    pub fn default_path() -> PathBuf {
        PathBuf::from("mdpress.toml")
    }

    /// Nav entries followed by every sidebar item, in declaration order.
    pub fn links(&self) -> impl Iterator<Item = &NavItem> {
        self.nav
            .iter()
            .chain(self.sidebar.iter().flat_map(|group| group.items.iter()))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

impl NavItem {
    /// Markdown source this link refers to, relative to `docs_path`, or
    /// `None` for links that leave the site.
    pub fn page_path(&self) -> Option<RelativePathBuf> {
        link_page_path(&self.link)
    }
}

/// `/guide/` maps to `guide/index.md`, `/guide/intro` and
/// `/guide/intro.html` both map to `guide/intro.md`. Fragments and queries
/// never select the page. External and pure-fragment links have no source.
fn link_page_path(link: &str) -> Option<RelativePathBuf> {
    if link.is_empty()
        || link.starts_with("http://")
        || link.starts_with("https://")
        || link.starts_with("mailto:")
        || link.starts_with('#')
    {
        return None;
    }

    let link = link.split(['#', '?']).next().unwrap_or(link);
    let link = link.strip_prefix("./").unwrap_or(link);
    let link = link.trim_start_matches('/');

    let path = if link.is_empty() || link.ends_with('/') {
        format!("{link}index.md")
    } else if let Some(stem) = link.strip_suffix(".html") {
        format!("{stem}.md")
    } else if link.ends_with(".md") {
        link.to_string()
    } else {
        format!("{link}.md")
    };

    Some(RelativePathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::env;
    use tempfile::TempDir;

    fn sample_config() -> SiteConfig {
        SiteConfig {
            title: "mdpress docs".to_string(),
            description: Some("Documentation for mdpress".to_string()),
            base: "/docs/".to_string(),
            docs_path: PathBuf::from("/tmp/test-docs"),
            nav: vec![
                NavItem {
                    text: "Guide".to_string(),
                    link: "/guide/".to_string(),
                },
                NavItem {
                    text: "GitHub".to_string(),
                    link: "https://github.com/mdpress/mdpress".to_string(),
                },
            ],
            sidebar: vec![SidebarGroup {
                text: "Guide".to_string(),
                collapsed: true,
                items: vec![NavItem {
                    text: "Introduction".to_string(),
                    link: "/guide/intro".to_string(),
                }],
            }],
            markdown: MarkdownConfig {
                long_code_threshold: Some(30),
            },
        }
    }

    #[test]
    fn test_default_path() {
        assert_eq!(SiteConfig::default_path(), PathBuf::from("mdpress.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = sample_config();

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: SiteConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
title = "Docs"
docs_path = "docs"
"#,
        )
        .unwrap();

        assert_eq!(config.base, "/");
        assert!(config.description.is_none());
        assert!(config.nav.is_empty());
        assert!(config.sidebar.is_empty());
        assert!(config.markdown.long_code_threshold.is_none());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = SiteConfig::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("mdpress.toml");
        let test_config = sample_config();

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = SiteConfig::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_parse_error_reports_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("mdpress.toml");
        std::fs::write(&config_file, "title = ").unwrap();

        let err = SiteConfig::load_from_path(&config_file).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("parse"));
        assert!(message.contains("mdpress.toml"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = SiteConfig::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("MDPRESS_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$MDPRESS_TEST_VAR/subdir");
        let expanded = SiteConfig::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("MDPRESS_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = SiteConfig::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_expands_docs_path() {
        unsafe {
            env::set_var("MDPRESS_DOCS_ROOT", "/custom/docs");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("mdpress.toml");
        std::fs::write(
            &config_file,
            r#"
title = "Docs"
docs_path = "$MDPRESS_DOCS_ROOT/pages"
"#,
        )
        .unwrap();

        let config = SiteConfig::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.docs_path, PathBuf::from("/custom/docs/pages"));

        unsafe {
            env::remove_var("MDPRESS_DOCS_ROOT");
        }
    }

    #[rstest]
    #[case::section_index("/guide/", "guide/index.md")]
    #[case::plain_page("/guide/intro", "guide/intro.md")]
    #[case::html_extension("/guide/intro.html", "guide/intro.md")]
    #[case::md_extension("/guide/intro.md", "guide/intro.md")]
    #[case::site_root("/", "index.md")]
    #[case::fragment_stripped("/reference#flags", "reference.md")]
    #[case::query_stripped("/search?q=x", "search.md")]
    #[case::dot_slash_prefix("./local", "local.md")]
    fn test_page_path_mapping(#[case] link: &str, #[case] expected: &str) {
        let item = NavItem {
            text: "t".to_string(),
            link: link.to_string(),
        };

        assert_eq!(item.page_path(), Some(RelativePathBuf::from(expected)));
    }

    #[rstest]
    #[case::https("https://example.com/docs")]
    #[case::http("http://example.com")]
    #[case::mailto("mailto:docs@example.com")]
    #[case::pure_fragment("#install")]
    #[case::empty("")]
    fn test_external_links_have_no_page(#[case] link: &str) {
        let item = NavItem {
            text: "t".to_string(),
            link: link.to_string(),
        };

        assert!(item.page_path().is_none());
    }

    #[test]
    fn test_links_covers_nav_and_sidebar_in_order() {
        let config = sample_config();

        let links: Vec<&str> = config.links().map(|item| item.link.as_str()).collect();

        assert_eq!(
            links,
            vec![
                "/guide/",
                "https://github.com/mdpress/mdpress",
                "/guide/intro"
            ]
        );
    }
}
