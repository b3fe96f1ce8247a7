//! Render boundary
//!
//! Renderers receive owned snapshots and never see the live registry.

mod chart;
mod text;

pub use chart::ChartFrame;
pub use text::{display_name, format_usd, summary_line, TextRenderer};

use crate::registry::AssetSnapshot;

/// Something that can draw one asset's state
pub trait Renderer {
    /// Redraw for the given snapshot
    fn render(&mut self, snapshot: &AssetSnapshot) -> anyhow::Result<()>;
}
