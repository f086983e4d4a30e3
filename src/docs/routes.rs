//! Route tree and global data for one docs version.
//!
//! ```text
//! /docs                         DocPage
//! ├── /docs/intro               DocItem   modules: content, metadata
//! ├── /docs/guides/setup        DocItem
//! └── /docs/category/guides     DocCategoryGeneratedIndexPage  (no guides/index)
//! /docs/tags                    DocTagsListPage
//! └ /docs/tags/rust             DocTagDocListPage  (top-level, one per tag)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Value, json};

use super::scan::join_route;
use crate::config::DocsConfig;
use crate::plugin::{ArtifactRef, DocMetadata, LoadedVersion, RouteConfig};
use crate::utils::hash::kebab_case;

/// One tag and the docs carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry<'a> {
    pub label: &'a str,
    pub permalink: String,
    pub docs: Vec<&'a DocMetadata>,
}

impl TagEntry<'_> {
    /// Payload of the tag's data module.
    pub fn to_json(&self) -> Value {
        json!({
            "label": self.label,
            "permalink": self.permalink,
            "docs": self.docs.iter().map(|d| json!({
                "id": d.id,
                "title": d.title,
                "permalink": d.permalink,
            })).collect::<Vec<_>>(),
        })
    }
}

/// Group a version's docs by tag, tags in label order.
pub fn collect_tags(version: &LoadedVersion) -> Vec<TagEntry<'_>> {
    let mut by_label: BTreeMap<&str, Vec<&DocMetadata>> = BTreeMap::new();
    for doc in &version.docs {
        for tag in &doc.tags {
            by_label.entry(tag.as_str()).or_default().push(doc);
        }
    }
    by_label
        .into_iter()
        .map(|(label, docs)| TagEntry {
            label,
            permalink: join_route(&version.tags_path, &kebab_case(label)),
            docs,
        })
        .collect()
}

/// Directories that have docs but no index doc of their own.
pub fn category_dirs(version: &LoadedVersion) -> Vec<String> {
    let permalinks: BTreeSet<&str> = version.docs.iter().map(|d| d.permalink.as_str()).collect();

    let mut dirs = BTreeSet::new();
    for doc in &version.docs {
        let mut id = doc.id.as_str();
        while let Some((parent, _)) = id.rsplit_once('/') {
            dirs.insert(parent);
            id = parent;
        }
    }

    dirs.into_iter()
        .filter(|dir| !permalinks.contains(join_route(&version.path, dir).as_str()))
        .map(str::to_string)
        .collect()
}

/// Build the docs root route.
///
/// `metadata` maps each doc's source to its metadata artifact.
pub fn docs_root_route(
    version: &LoadedVersion,
    metadata: &BTreeMap<String, ArtifactRef>,
    components: &DocsConfig,
) -> RouteConfig {
    let mut children: Vec<RouteConfig> = version
        .docs
        .iter()
        .map(|doc| {
            let mut route = RouteConfig::new(&doc.permalink, &components.doc_item_component)
                .exact()
                .with_module("content", ArtifactRef::new(&doc.source));
            if let Some(meta) = metadata.get(&doc.source) {
                route = route.with_module("metadata", meta.clone());
            }
            route
        })
        .collect();

    children.extend(category_dirs(version).into_iter().map(|dir| {
        let path = join_route(&version.path, &format!("category/{dir}"));
        RouteConfig::new(path, &components.doc_category_component).exact()
    }));

    RouteConfig::new(&version.path, &components.doc_page_component).with_routes(children)
}

/// Plugin global data: `{path, versions: [{name, path, docs: [{id, path}]}]}`.
pub fn global_data(docs_path: &str, versions: &[LoadedVersion]) -> Value {
    json!({
        "path": docs_path,
        "versions": versions.iter().map(|v| json!({
            "name": v.version_name,
            "path": v.path,
            "docs": v.docs.iter().map(|d| json!({
                "id": d.id,
                "path": d.permalink,
            })).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}
