//! Multi-row legend layout (greedy first-fit row packing) and drawing.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

use super::color::{ColorScheme, Rgba};
use super::text::{FontWeight, TextMetrics};
use super::types::{LegendAlign, LegendConfig, SYMBOL_LABEL_GAP, SymbolShape};

/// One placed legend item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
    /// Symbol + gap + label text
    pub width: f64,
    /// Left edge of the symbol
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendRow {
    pub entries: Vec<LegendEntry>,
    pub x: f64,
    /// Top edge of the row
    pub y: f64,
    /// Entry widths plus the spacing between them
    pub width: f64,
}

/// Realized bounding box of a legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub rows: Vec<LegendRow>,
    /// Widest row
    pub width: f64,
    pub height: f64,
}

impl LegendLayout {
    pub fn size(&self) -> LegendSize {
        LegendSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Labels per row, in order.
    pub fn row_labels(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|r| r.entries.iter().map(|e| e.label.as_str()).collect())
            .collect()
    }
}

/// Partition item widths into rows no wider than `max_width`.
///
/// Items keep their order. An item joins the current row when
/// `row_width + spacing + item_width <= max_width`; the first item of a row is always
/// accepted, so a single oversized item gets a row of its own.
pub fn pack_rows(widths: &[f64], max_width: f64, spacing: f64) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0usize;
    let mut row_w = 0.0f64;
    for (i, w) in widths.iter().enumerate() {
        if i > start && row_w + w + spacing > max_width {
            rows.push(start..i);
            start = i;
            row_w = 0.0;
        }
        row_w += if i > start { spacing + w } else { *w };
    }
    if start < widths.len() {
        rows.push(start..widths.len());
    }
    rows
}

/// Realized width of a packed row.
fn row_width(widths: &[f64], spacing: f64) -> f64 {
    if widths.is_empty() {
        return 0.0;
    }
    widths.iter().sum::<f64>() + spacing * (widths.len() - 1) as f64
}

/// Lay out legend items for `groups` (in order) without drawing anything.
pub fn layout_legend<M: TextMetrics + ?Sized>(
    groups: &[String],
    scheme: &ColorScheme,
    config: &LegendConfig,
    metrics: &M,
) -> LegendLayout {
    let symbol_w = 2.0 * config.symbol_size + SYMBOL_LABEL_GAP;
    let widths: Vec<f64> = groups
        .iter()
        .map(|g| metrics.measure(g, &config.font) + symbol_w)
        .collect();

    let ranges = pack_rows(&widths, config.max_width, config.item_spacing);
    let mut rows = Vec::with_capacity(ranges.len());
    for (ri, range) in ranges.into_iter().enumerate() {
        let w = row_width(&widths[range.clone()], config.item_spacing);
        let row_x = match config.align {
            LegendAlign::Left => config.x,
            LegendAlign::Center => config.x + (config.max_width - w) / 2.0,
            LegendAlign::Right => config.x + config.max_width - w,
        };
        let row_y = config.y + ri as f64 * (config.item_height + config.row_spacing);

        let mut cursor = row_x;
        let mut entries = Vec::with_capacity(range.len());
        for i in range {
            entries.push(LegendEntry {
                label: groups[i].clone(),
                color: scheme.resolve(&groups[i], i),
                width: widths[i],
                x: cursor,
            });
            cursor += widths[i] + config.item_spacing;
        }
        rows.push(LegendRow {
            entries,
            x: row_x,
            y: row_y,
            width: w,
        });
    }

    let width = rows.iter().map(|r| r.width).fold(0.0, f64::max);
    let height = if rows.is_empty() {
        0.0
    } else {
        rows.len() as f64 * config.item_height + (rows.len() - 1) as f64 * config.row_spacing
    };
    log::debug!(
        "legend: {} items in {} rows, {width:.1}x{height:.1}px",
        groups.len(),
        rows.len()
    );

    LegendLayout {
        rows,
        width,
        height,
    }
}

/// Draw a laid-out legend onto `area`. Returns the legend's bounding box.
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    layout: &LegendLayout,
    config: &LegendConfig,
) -> Result<LegendSize> {
    let font_style = match config.font.weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold => FontStyle::Bold,
    };
    let text_color = config.text_color.to_plotters();
    let label_style = TextStyle::from(FontDesc::new(
        FontFamily::from(config.font.family.as_str()),
        config.font.size,
        font_style,
    ))
    .color(&text_color)
    .pos(Pos::new(HPos::Left, VPos::Center));

    let s = config.symbol_size.round() as i32;
    for row in &layout.rows {
        let cy = (row.y + config.item_height / 2.0).round() as i32;
        for entry in &row.entries {
            let x = entry.x.round() as i32;
            let color = entry.color.to_plotters();
            match config.shape {
                SymbolShape::Circle => {
                    area.draw(&Circle::new((x + s, cy), s, color.filled()))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
                SymbolShape::Rect => {
                    area.draw(&Rectangle::new(
                        [(x, cy - s), (x + 2 * s, cy + s)],
                        color.filled(),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                }
                SymbolShape::Line => {
                    area.draw(&PathElement::new(
                        vec![(x, cy), (x + 2 * s, cy)],
                        color.stroke_width(2),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                }
            }

            let text_x = (entry.x + 2.0 * config.symbol_size + SYMBOL_LABEL_GAP).round() as i32;
            area.draw(&Text::new(
                entry.label.as_str(),
                (text_x, cy),
                label_style.clone(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    Ok(layout.size())
}

/// Render a legend on its own canvas: `.svg` paths get SVG, anything else a bitmap.
pub fn render_legend<P: AsRef<Path>>(
    out_path: P,
    width: u32,
    height: u32,
    background: Rgba,
    layout: &LegendLayout,
    config: &LegendConfig,
) -> Result<LegendSize> {
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let bg = background.to_plotters();

    let size = if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        root.fill(&bg).map_err(|e| anyhow!("{:?}", e))?;
        let size = draw_legend(&root, layout, config)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
        size
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        root.fill(&bg).map_err(|e| anyhow!("{:?}", e))?;
        let size = draw_legend(&root, layout, config)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
        size
    };
    Ok(size)
}
