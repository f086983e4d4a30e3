//! Actions wrapper that augments routes on their way to the host.
//!
//! Routes are held back until the wrapped pipeline has finished, then
//! rewritten in one [`augment_all`] pass. A pipeline that fails halfway never
//! hands a partial route table to the host.

use anyhow::Result;
use parking_lot::Mutex;

use super::augment::{AugmentStats, AugmentTarget, augment_all};
use super::key::PathMapping;
use crate::plugin::{Actions, ArtifactRef, RouteConfig};

/// Forwards data and global data to `inner` and buffers added routes.
pub struct AugmentingActions<'a, A: Actions> {
    inner: &'a A,
    mapping: &'a PathMapping,
    target: &'a AugmentTarget,
    routes: Mutex<Vec<RouteConfig>>,
}

impl<'a, A: Actions> AugmentingActions<'a, A> {
    pub fn new(inner: &'a A, mapping: &'a PathMapping, target: &'a AugmentTarget) -> Self {
        Self {
            inner,
            mapping,
            target,
            routes: Mutex::new(Vec::new()),
        }
    }

    /// Augment every buffered route, in emission order.
    pub fn finish(self) -> (Vec<RouteConfig>, AugmentStats) {
        augment_all(self.routes.into_inner(), self.mapping, self.target)
    }
}

impl<A: Actions> Actions for AugmentingActions<'_, A> {
    async fn create_data(&self, filename: &str, payload: &str) -> Result<ArtifactRef> {
        self.inner.create_data(filename, payload).await
    }

    fn add_route(&self, route: RouteConfig) {
        self.routes.lock().push(route);
    }

    fn set_global_data(&self, data: serde_json::Value) {
        self.inner.set_global_data(data);
    }
}
