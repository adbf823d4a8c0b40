//! Site-level operations: scanning the docs tree, validating a configuration
//! against it, and building the renderer the way the site pipeline does.

use anyhow::{Context, Result, bail};
use mdpress_config::SiteConfig;
use mdpress_engine::render::inline_code;
use mdpress_engine::{RenderOptions, Renderer, render_html};
use relative_path::RelativePathBuf;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Renderer and options as the site build configures them: defaults, the
/// long-code rule installed once, config overrides applied.
pub fn page_renderer(config: Option<&SiteConfig>) -> (Renderer, RenderOptions) {
    let mut renderer = Renderer::new();
    inline_code::install(&mut renderer);

    let mut options = RenderOptions::default();
    if let Some(threshold) = config.and_then(|config| config.markdown.long_code_threshold) {
        options.long_code_threshold = threshold;
    }

    (renderer, options)
}

/// Render one markdown file to an HTML fragment.
pub fn render_page(path: &Path, renderer: &Renderer, options: &RenderOptions) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read page {}", path.display()))?;
    Ok(render_html(&source, renderer, options))
}

/// Scan for markdown files under the docs root.
pub fn scan_markdown_files(docs_root: &Path) -> Result<Vec<PathBuf>> {
    if !docs_root.is_dir() {
        bail!("docs directory not found: {}", docs_root.display());
    }

    let mut files = Vec::new();
    scan_directory_recursive(docs_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

/// Outcome of validating a configuration against the docs tree.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Markdown pages found under the docs root.
    pub pages: usize,
    /// Nav/sidebar links whose markdown source does not exist.
    pub missing: Vec<MissingLink>,
    /// Markdown sources no nav or sidebar entry points at.
    pub orphans: Vec<RelativePathBuf>,
}

#[derive(Debug)]
pub struct MissingLink {
    pub link: String,
    pub page: RelativePathBuf,
}

impl CheckReport {
    /// Orphans are informational; only missing link targets fail a check.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve every nav and sidebar link to its markdown source and compare
/// against what the docs tree actually contains.
pub fn check_site(config: &SiteConfig) -> Result<CheckReport> {
    let docs_root = &config.docs_path;
    let files = scan_markdown_files(docs_root)?;

    let mut pages: BTreeSet<RelativePathBuf> = BTreeSet::new();
    for file in &files {
        if let Ok(stripped) = file.strip_prefix(docs_root) {
            pages.insert(RelativePathBuf::from_path(stripped)?);
        }
    }

    let mut report = CheckReport {
        pages: pages.len(),
        ..CheckReport::default()
    };
    let mut referenced = BTreeSet::new();

    for item in config.links() {
        let Some(page) = item.page_path() else {
            continue;
        };
        if pages.contains(&page) {
            referenced.insert(page);
        } else {
            report.missing.push(MissingLink {
                link: item.link.clone(),
                page,
            });
        }
    }

    report.orphans = pages
        .into_iter()
        .filter(|page| !referenced.contains(page))
        .collect();

    Ok(report)
}
