//! Per-document cache of live media elements.

use crate::document::model::{Asset, ProjectDocument};
use crate::media::element::MediaElement;
use std::collections::HashMap;

/// Builds an element for an asset, or declines it.
pub type ElementFactory = Box<dyn Fn(&Asset) -> Option<Box<dyn MediaElement>> + Send>;

/// Keeps exactly one live element per asset in the document.
///
/// Elements are created lazily on sync and torn down when their asset
/// disappears. Assets the factory declines (text, or video without a
/// decoder) simply have no entry.
pub struct MediaCache {
    factory: ElementFactory,
    elements: HashMap<String, Box<dyn MediaElement>>,
    declined: std::collections::HashSet<String>,
}

impl MediaCache {
    /// Create a cache with the default element factory.
    pub fn new() -> Self {
        Self::with_factory(Box::new(crate::media::default_factory))
    }

    /// Create a cache with a custom element factory.
    pub fn with_factory(factory: ElementFactory) -> Self {
        Self { factory, elements: HashMap::new(), declined: std::collections::HashSet::new() }
    }

    /// Reconcile live elements with the document's asset list.
    ///
    /// New assets get an element and start loading; elements whose asset was
    /// removed are unloaded and dropped.
    pub fn sync_assets(&mut self, doc: &ProjectDocument) {
        for asset in &doc.assets {
            if self.elements.contains_key(&asset.id) || self.declined.contains(&asset.id) {
                continue;
            }
            match (self.factory)(asset) {
                Some(mut el) => {
                    tracing::debug!(asset_id = %asset.id, "creating media element");
                    el.load();
                    self.elements.insert(asset.id.clone(), el);
                }
                None => {
                    self.declined.insert(asset.id.clone());
                }
            }
        }

        let live: std::collections::HashSet<&str> =
            doc.assets.iter().map(|a| a.id.as_str()).collect();
        self.elements.retain(|id, el| {
            let keep = live.contains(id.as_str());
            if !keep {
                tracing::debug!(asset_id = %id, "tearing down media element");
                el.unload();
            }
            keep
        });
        self.declined.retain(|id| live.contains(id.as_str()));
    }

    /// Advance all playing elements by `dt` seconds.
    pub fn advance_all(&mut self, dt: f64) {
        for el in self.elements.values_mut() {
            el.advance(dt);
        }
    }

    /// Borrow the element for an asset.
    pub fn get(&self, asset_id: &str) -> Option<&dyn MediaElement> {
        self.elements.get(asset_id).map(|b| b.as_ref())
    }

    /// Mutably borrow the element for an asset.
    pub fn get_mut(&mut self, asset_id: &str) -> Option<&mut (dyn MediaElement + '_)> {
        match self.elements.get_mut(asset_id) {
            Some(el) => Some(el.as_mut()),
            None => None,
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no elements are live.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for MediaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/cache.rs"]
mod tests;
