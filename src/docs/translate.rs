//! Translatable doc titles.
//!
//! Each version yields one translation file named after the version, with a
//! `doc.<id>.title` message per document.

use std::collections::BTreeMap;

use crate::plugin::{LoadedContent, TranslationFile, TranslationMessage};

fn title_key(id: &str) -> String {
    format!("doc.{id}.title")
}

pub fn translation_files(content: &LoadedContent) -> Vec<TranslationFile> {
    content
        .loaded_versions
        .iter()
        .map(|version| TranslationFile {
            path: version.version_name.clone(),
            content: version
                .docs
                .iter()
                .map(|doc| {
                    let message = TranslationMessage {
                        message: doc.title.clone(),
                        description: Some(format!("The title of doc {}", doc.id)),
                    };
                    (title_key(&doc.id), message)
                })
                .collect::<BTreeMap<_, _>>(),
        })
        .collect()
}

/// Replace doc titles that have a message in the version's file.
pub fn translate_content(mut content: LoadedContent, files: &[TranslationFile]) -> LoadedContent {
    for version in &mut content.loaded_versions {
        let Some(file) = files.iter().find(|f| f.path == version.version_name) else {
            continue;
        };
        for doc in &mut version.docs {
            if let Some(translated) = file.content.get(&title_key(&doc.id)) {
                doc.title = translated.message.clone();
            }
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{DocMetadata, LoadedVersion};

    fn content() -> LoadedContent {
        let doc = |id: &str, title: &str| DocMetadata {
            id: id.into(),
            source: format!("@site/docs/{id}.md"),
            permalink: format!("/docs/{id}"),
            title: title.into(),
            tags: vec![],
        };
        LoadedContent {
            loaded_versions: vec![LoadedVersion {
                version_name: "current".into(),
                path: "/docs".into(),
                tags_path: "/docs/tags".into(),
                docs: vec![doc("intro", "Introduction"), doc("guides/setup", "Setup")],
            }],
        }
    }

    #[test]
    fn test_translation_files_cover_titles() {
        let files = translation_files(&content());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "current");
        assert_eq!(files[0].content["doc.intro.title"].message, "Introduction");
        assert_eq!(files[0].content["doc.guides/setup.title"].message, "Setup");
    }

    #[test]
    fn test_translate_replaces_known_titles() {
        let mut files = translation_files(&content());
        files[0].content.remove("doc.guides/setup.title");
        files[0]
            .content
            .get_mut("doc.intro.title")
            .unwrap()
            .message = "Einführung".into();

        let translated = translate_content(content(), &files);
        let docs = &translated.loaded_versions[0].docs;
        assert_eq!(docs[0].title, "Einführung");
        assert_eq!(docs[1].title, "Setup");
    }

    #[test]
    fn test_translate_without_files_is_identity() {
        assert_eq!(translate_content(content(), &[]), content());
    }
}
