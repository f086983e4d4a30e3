//! Configuration section definitions.
//!
//! Each module corresponds to a section in `rawdocs.toml`:
//!
//! | Module   | TOML Section | Purpose                                    |
//! |----------|--------------|--------------------------------------------|
//! | `site`   | `[site]`     | Site alias used in document source paths   |
//! | `docs`   | `[docs]`     | Docs directory, route paths, components    |
//! | `editor` | `[editor]`   | Raw source module settings                 |
//! | `build`  | `[build]`    | Output directory, clean builds             |
//! | `watch`  | `[watch]`    | Watch mode debounce                        |

pub mod build;
mod docs;
mod editor;
pub mod site;
mod watch;

pub use build::BuildSectionConfig;
pub use docs::DocsConfig;
pub use editor::EditorConfig;
pub use site::SiteSectionConfig;
pub use watch::WatchConfig;
