//! Dashboard wiring
//!
//! Owns the registry, the current selection and a renderer. Updates to the
//! selected asset are pushed to the renderer; a selection change pulls the
//! newly selected asset.

use crate::feed::PriceFrame;
use crate::registry::{AssetSnapshot, PriceRegistry};
use crate::render::Renderer;
use thiserror::Error;

/// Dashboard errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Selection names an asset the registry does not track
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
}

/// Price registry plus the asset currently on display
pub struct Dashboard<R: Renderer> {
    registry: PriceRegistry,
    selected: String,
    renderer: R,
}

impl<R: Renderer> Dashboard<R> {
    /// Create a dashboard showing `selected`, or the first tracked asset
    pub fn new(
        registry: PriceRegistry,
        selected: Option<&str>,
        renderer: R,
    ) -> Result<Self, DashboardError> {
        let selected = match selected {
            Some(id) => Self::resolve(&registry, id)?,
            None => registry
                .identifiers()
                .next()
                .map(str::to_string)
                .ok_or_else(|| DashboardError::UnknownAsset(String::new()))?,
        };

        Ok(Self {
            registry,
            selected,
            renderer,
        })
    }

    fn resolve(registry: &PriceRegistry, identifier: &str) -> Result<String, DashboardError> {
        let identifier = identifier.trim().to_lowercase();
        if registry.contains(&identifier) {
            Ok(identifier)
        } else {
            Err(DashboardError::UnknownAsset(identifier))
        }
    }

    /// Apply a decoded frame and redraw if the selected asset changed
    ///
    /// Returns whether a render was triggered.
    pub fn handle_frame(&mut self, frame: &PriceFrame) -> bool {
        let updated = self.registry.apply_frame(frame);
        tracing::trace!(count = updated.len(), "Applied price frame");

        if updated.iter().any(|id| *id == self.selected) {
            self.render_selected();
            true
        } else {
            false
        }
    }

    /// Switch the displayed asset and redraw it
    ///
    /// Nothing is drawn for an asset that has not received a price yet.
    pub fn select(&mut self, identifier: &str) -> Result<(), DashboardError> {
        self.selected = Self::resolve(&self.registry, identifier)?;
        tracing::info!(asset = %self.selected, "Selection changed");

        if self
            .registry
            .get(&self.selected)
            .is_some_and(|model| model.observation_count() > 0)
        {
            self.render_selected();
        }
        Ok(())
    }

    /// Draw the selected asset; render errors are logged and swallowed
    fn render_selected(&mut self) {
        let Some(snapshot) = self.registry.snapshot(&self.selected) else {
            return;
        };
        if let Err(e) = self.renderer.render(&snapshot) {
            tracing::warn!(error = %e, asset = %self.selected, "Render failed");
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn registry(&self) -> &PriceRegistry {
        &self.registry
    }

    /// Snapshots of every tracked asset in configured order
    pub fn snapshots(&self) -> Vec<AssetSnapshot> {
        self.registry.assets().map(|model| model.snapshot()).collect()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
