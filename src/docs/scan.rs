//! Docs directory scanning.
//!
//! Walks the docs directory, then parses every document in parallel:
//!
//! ```text
//! docs/intro.md            -> id intro          permalink /docs/intro
//! docs/guides/index.md     -> id guides/index   permalink /docs/guides
//! docs/guides/setup.mdx    -> id guides/setup   permalink /docs/guides/setup
//! docs/_drafts/wip.md      -> skipped
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use rayon::prelude::*;
use serde::Deserialize;

use crate::config::{DocsConfig, SiteConfig};
use crate::plugin::DocMetadata;

/// Optional `+++` TOML block at the top of a document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    id: Option<String>,
    slug: Option<String>,
    tags: Vec<String>,
}

/// Everything needed to turn docs files into [`DocMetadata`].
#[derive(Debug, Clone)]
pub struct DocScanner {
    pub site_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub alias: String,
    pub docs: DocsConfig,
}

impl DocScanner {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            site_dir: config.get_root().to_path_buf(),
            docs_dir: config.docs_dir().to_path_buf(),
            alias: config.site.alias.clone(),
            docs: config.docs.clone(),
        }
    }

    /// Scan the docs directory; documents come back sorted by id.
    pub fn scan(&self) -> Result<Vec<DocMetadata>> {
        if !self.docs_dir.is_dir() {
            bail!("docs directory not found: {}", self.docs_dir.display());
        }

        let files = self.collect_files();
        let mut docs = files
            .par_iter()
            .map(|path| self.read_doc(path))
            .collect::<Result<Vec<_>>>()?;

        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }

    /// Document files under the docs dir, relative paths with no `_`/`.` segment.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = WalkDir::new(&self.docs_dir)
            .skip_hidden(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|path| self.is_doc_file(path))
            .collect();
        files.sort();
        files
    }

    fn is_doc_file(&self, path: &Path) -> bool {
        let Ok(rel) = path.strip_prefix(&self.docs_dir) else {
            return false;
        };
        let visible = rel.components().all(|c| {
            let name = c.as_os_str().to_string_lossy();
            !name.starts_with('_') && !name.starts_with('.')
        });
        visible
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| self.docs.is_doc_extension(e))
    }

    fn read_doc(&self, path: &Path) -> Result<DocMetadata> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let (front, body) = split_front_matter(&content)
            .with_context(|| format!("invalid front matter in {}", path.display()))?;

        let rel = path.strip_prefix(&self.docs_dir).unwrap_or(path);
        let stem = rel
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = rel
            .parent()
            .map(to_slash)
            .filter(|d| !d.is_empty());

        if let Some(id) = &front.id
            && (id.is_empty() || id.contains(['/', '\\']))
        {
            bail!(
                "front matter id {id:?} in {} must be a single path segment",
                path.display()
            );
        }
        let name = front.id.clone().unwrap_or_else(|| stem.clone());
        let id = join_segments(dir.as_deref(), &name);
        let permalink = self.permalink(dir.as_deref(), &stem, front.slug.as_deref());
        let title = front
            .title
            .or_else(|| first_heading(body))
            .unwrap_or(stem);

        Ok(DocMetadata {
            id,
            source: self.source_path(path),
            permalink,
            title,
            tags: front.tags,
        })
    }

    /// Aliased source path: `@site/docs/intro.md`.
    fn source_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.site_dir).unwrap_or(path);
        format!("{}/{}", self.alias, to_slash(rel))
    }

    fn permalink(&self, dir: Option<&str>, stem: &str, slug: Option<&str>) -> String {
        let base = self.docs.docs_route_path();
        let rel = match slug {
            Some(slug) if slug.starts_with('/') => slug.trim_matches('/').to_string(),
            Some(slug) => join_segments(dir, slug.trim_matches('/')),
            None if is_index_stem(stem) => dir.unwrap_or_default().to_string(),
            None => join_segments(dir, stem),
        };
        join_route(&base, &rel)
    }
}

/// `index` and `README` documents stand for their directory.
fn is_index_stem(stem: &str) -> bool {
    stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("readme")
}

/// Join a route base and a relative path without doubling slashes.
pub fn join_route(base: &str, rel: &str) -> String {
    let base = base.trim_end_matches('/');
    match (base.is_empty(), rel.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{rel}"),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{rel}"),
    }
}

fn join_segments(dir: Option<&str>, name: &str) -> String {
    match dir {
        Some(dir) if !name.is_empty() => format!("{dir}/{name}"),
        Some(dir) => dir.to_string(),
        None => name.to_string(),
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a leading `+++` TOML block from the body.
fn split_front_matter(content: &str) -> Result<(FrontMatter, &str)> {
    let trimmed = content.trim_start();
    if trimmed.starts_with("+++")
        && let Some(end) = trimmed[3..].find("\n+++")
    {
        let block = trimmed[3..3 + end].trim();
        let body = trimmed[3 + end + 4..].trim_start_matches('\n');
        let front = toml::from_str(block)?;
        return Ok((front, body));
    }
    Ok((FrontMatter::default(), content))
}

/// Text of the first level-one heading.
fn first_heading(body: &str) -> Option<String> {
    let mut heading: Option<String> = None;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => heading = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(h) = heading.as_mut() {
                    h.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                return heading.map(|h| h.trim().to_string()).filter(|h| !h.is_empty());
            }
            _ => {}
        }
    }
    None
}
