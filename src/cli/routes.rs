//! `rawdocs routes`: build, then print the emitted route table.

use anyhow::Result;
use owo_colors::OwoColorize;

use super::build::build_site;
use crate::config::SiteConfig;
use crate::plugin::RouteConfig;

pub fn print_routes(config: &SiteConfig, json: bool) -> Result<()> {
    build_site(config)?;
    let content = std::fs::read_to_string(config.generated_dir().join("routes.json"))?;
    let routes: Vec<RouteConfig> = serde_json::from_str(&content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
    } else {
        print!("{}", render_tree(&routes));
    }
    Ok(())
}

/// Render routes as an indented tree, modules in brackets.
///
/// ```text
/// /docs  @theme/DocPage
/// ├── /docs/intro  @theme/DocItem  [content, metadata, rawContent]
/// └── /docs/category/guides  @theme/DocCategoryGeneratedIndexPage
/// ```
pub fn render_tree(routes: &[RouteConfig]) -> String {
    let mut out = String::new();
    for route in routes {
        render_node(route, "", None, &mut out);
    }
    out
}

fn render_node(route: &RouteConfig, indent: &str, last: Option<bool>, out: &mut String) {
    let branch = match last {
        None => "",
        Some(true) => "└── ",
        Some(false) => "├── ",
    };
    let modules = if route.modules.is_empty() {
        String::new()
    } else {
        let names: Vec<_> = route.modules.keys().map(String::as_str).collect();
        format!("  [{}]", names.join(", "))
    };
    out.push_str(&format!(
        "{indent}{branch}{}  {}{}\n",
        route.path,
        route.component.dimmed(),
        modules
    ));

    let child_indent = match last {
        None => String::new(),
        Some(true) => format!("{indent}    "),
        Some(false) => format!("{indent}│   "),
    };
    let count = route.routes.len();
    for (i, child) in route.routes.iter().enumerate() {
        render_node(child, &child_indent, Some(i + 1 == count), out);
    }
}
