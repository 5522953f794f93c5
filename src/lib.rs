//! chartkit
//!
//! Layout and formatting heuristics shared by chart renderers, plus a small CLI.
//!
//! ### Features
//! - Parse loose date values (`2020`, `"2020-03"`, `"2020-03-15"`) and filter temporal rows
//! - Adaptive time axes with calendar-aligned ticks and a guaranteed label for the latest date
//! - Range-based K/M/B axis formatting and per-value data labels
//! - Label down-sampling for dense axes
//! - Multi-row legend packing, rendered to SVG/PNG
//!
//! ### Example
//! ```no_run
//! use chartkit::viz::{self, HeuristicTextMetrics};
//!
//! let payload = chartkit::storage::load_payload("chart.json")?;
//! payload.validate(&["x", "y"])?;
//! let x = payload.require_role("x")?;
//! let axis = viz::compute_time_axis(payload.records(), &x.name, (0.0, 800.0), 0.05)?;
//! for (px, label) in axis.tick_labels() {
//!     println!("{px:>7.1}  {label}");
//! }
//! let (legend, cfg) = viz::payload_legend(&payload, false, &HeuristicTextMetrics)?;
//! viz::render_legend("legend.svg", 800, 120, viz::Rgba::rgb(255, 255, 255), &legend, &cfg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod dates;
pub mod error;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use dates::{filter_temporal, parse_date, parse_date_or, parse_date_or_today};
pub use error::{DateParseError, LayoutError, PayloadError};
pub use models::{ChartPayload, ColumnSpec, DateLike, Record};
