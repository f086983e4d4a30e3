//! Test doubles shared by the editor tests.

use anyhow::Result;
use parking_lot::Mutex;

use crate::plugin::{Actions, ArtifactRef, DocMetadata, RouteConfig};

/// Records every action; `create_data` returns `@generated/<filename>`.
#[derive(Default)]
pub struct RecordingActions {
    data: Mutex<Vec<(String, String)>>,
    routes: Mutex<Vec<RouteConfig>>,
    global_data: Mutex<Option<serde_json::Value>>,
}

impl RecordingActions {
    pub fn data(&self) -> Vec<(String, String)> {
        self.data.lock().clone()
    }

    pub fn routes(&self) -> Vec<RouteConfig> {
        self.routes.lock().clone()
    }

    pub fn global_data(&self) -> Option<serde_json::Value> {
        self.global_data.lock().clone()
    }
}

impl Actions for RecordingActions {
    async fn create_data(&self, filename: &str, payload: &str) -> Result<ArtifactRef> {
        self.data
            .lock()
            .push((filename.to_string(), payload.to_string()));
        Ok(ArtifactRef::new(format!("@generated/{filename}")))
    }

    fn add_route(&self, route: RouteConfig) {
        self.routes.lock().push(route);
    }

    fn set_global_data(&self, data: serde_json::Value) {
        *self.global_data.lock() = Some(data);
    }
}

/// Minimal document metadata for `source` served at `permalink`.
pub fn doc(source: &str, permalink: &str) -> DocMetadata {
    let id = permalink
        .trim_start_matches("/docs/")
        .trim_start_matches('/')
        .to_string();
    DocMetadata {
        title: id.clone(),
        id,
        source: source.to_string(),
        permalink: permalink.to_string(),
        tags: Vec::new(),
    }
}
