//! Chart layout helpers: time axes, number formats, label sampling, and legends.
//!
//! - Adaptive date axes (decade down to day ticks, latest date always labeled)
//! - Range-based K/M/B axis formatting and per-value data labels
//! - Label down-sampling for dense axes
//! - Greedy multi-row legend packing, drawn to **SVG** or **PNG** via plotters
//! - Pluggable text measurement (heuristic, plotters fonts, cached)

pub mod color;
pub mod format;
pub mod labels;
pub mod legend;
pub mod text;
pub mod time_axis;
pub mod types;

// Re-export types for public API
pub use color::{ColorScheme, OFFICE10, Palette, Rgba};
pub use format::{RangeFormatter, ValueUnit, format_general, format_value};
pub use labels::{MAX_VISIBLE_LABELS, sample_label_indices, sampled_labels};
pub use legend::{LegendLayout, LegendSize, draw_legend, layout_legend, render_legend};
pub use text::{
    CachedTextMetrics, FontSpec, FontWeight, HeuristicTextMetrics, PlottersTextMetrics,
    TextMetrics,
};
pub use time_axis::{DEFAULT_TIME_PADDING, TickInterval, TimeAxis, TimeScale, compute_time_axis};
pub use types::{LegendAlign, LegendConfig, SymbolShape};

use crate::error::PayloadError;
use crate::models::ChartPayload;

/// Legend for a payload's `group` column, using the payload's colors and legend knobs.
pub fn payload_legend<M: TextMetrics + ?Sized>(
    payload: &ChartPayload,
    dark: bool,
    metrics: &M,
) -> Result<(LegendLayout, LegendConfig), PayloadError> {
    let group = payload.require_role("group")?;
    let labels = payload.group_labels(&group.name);
    let scheme = payload.color_scheme(dark);
    let config = LegendConfig::from_payload(payload, dark);
    let layout = layout_legend(&labels, &scheme, &config, metrics);
    Ok((layout, config))
}
