//! Public types and constants for the visualization module.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::color::Rgba;
use super::text::{DEFAULT_FONT_FAMILY, FontSpec, FontWeight};
use crate::models::ChartPayload;

/// Horizontal placement of each legend row inside the legend box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for LegendAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(LegendAlign::Left),
            "center" | "middle" => Ok(LegendAlign::Center),
            "right" | "end" => Ok(LegendAlign::Right),
            other => Err(format!("unknown legend alignment `{other}` (left, center, right)")),
        }
    }
}

/// Marker drawn in front of each legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymbolShape {
    #[default]
    Circle,
    Rect,
    Line,
}

impl FromStr for SymbolShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(SymbolShape::Circle),
            "rect" | "square" => Ok(SymbolShape::Rect),
            "line" => Ok(SymbolShape::Line),
            other => Err(format!("unknown legend symbol `{other}` (circle, rect, line)")),
        }
    }
}

/// Gap between a legend symbol and its label, in pixels.
pub const SYMBOL_LABEL_GAP: f64 = 5.0;

/// Legend geometry and text styling. All lengths are pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    pub max_width: f64,
    /// Origin of the legend box
    pub x: f64,
    pub y: f64,
    pub item_height: f64,
    pub item_spacing: f64,
    pub row_spacing: f64,
    /// Symbol radius; a symbol occupies `2 * symbol_size` horizontally
    pub symbol_size: f64,
    pub text_color: Rgba,
    pub font: FontSpec,
    pub align: LegendAlign,
    pub shape: SymbolShape,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            max_width: 400.0,
            x: 0.0,
            y: 0.0,
            item_height: 20.0,
            item_spacing: 20.0,
            row_spacing: 10.0,
            symbol_size: 6.0,
            text_color: Rgba::rgb(0x33, 0x33, 0x33),
            font: FontSpec::default(),
            align: LegendAlign::Left,
            shape: SymbolShape::Circle,
        }
    }
}

impl LegendConfig {
    /// Read legend knobs from a payload.
    ///
    /// `variables`: `legend_max_width` (else `width` minus `margin_left`/`margin_right`),
    /// `legend_x` (else `margin_left`), `legend_y`, `legend_item_height`, `legend_item_spacing`,
    /// `legend_row_spacing`, `legend_symbol_size`, `legend_align`, `legend_shape`,
    /// `legend_text_color`. Typography class `legend`, else `label`.
    /// Anything missing or malformed keeps its default.
    pub fn from_payload(payload: &ChartPayload, dark: bool) -> Self {
        let mut cfg = Self::default();
        if dark {
            cfg.text_color = Rgba::rgb(0xDD, 0xDD, 0xDD);
        }
        let var = |k: &str| payload.variable_f64(k);
        let margin_left = var("margin_left").unwrap_or(0.0);
        let margin_right = var("margin_right").unwrap_or(0.0);

        if let Some(w) = var("legend_max_width") {
            cfg.max_width = w;
        } else if let Some(w) = var("width") {
            cfg.max_width = (w - margin_left - margin_right).max(0.0);
        }
        cfg.x = var("legend_x").unwrap_or(margin_left);
        cfg.y = var("legend_y").unwrap_or(cfg.y);
        cfg.item_height = var("legend_item_height").unwrap_or(cfg.item_height);
        cfg.item_spacing = var("legend_item_spacing").unwrap_or(cfg.item_spacing);
        cfg.row_spacing = var("legend_row_spacing").unwrap_or(cfg.row_spacing);
        cfg.symbol_size = var("legend_symbol_size").unwrap_or(cfg.symbol_size);

        if let Some(a) = payload.variable_str("legend_align") {
            match a.parse() {
                Ok(a) => cfg.align = a,
                Err(e) => log::warn!("{e}; keeping {:?}", cfg.align),
            }
        }
        if let Some(s) = payload.variable_str("legend_shape") {
            match s.parse() {
                Ok(s) => cfg.shape = s,
                Err(e) => log::warn!("{e}; keeping {:?}", cfg.shape),
            }
        }
        if let Some(c) = payload.variable_str("legend_text_color").and_then(Rgba::from_hex) {
            cfg.text_color = c;
        }

        let typo = payload
            .typography
            .get("legend")
            .or_else(|| payload.typography.get("label"));
        if let Some(t) = typo {
            cfg.font = FontSpec::new(
                t.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
                t.font_size.unwrap_or(cfg.font.size),
                t.font_weight
                    .as_deref()
                    .map(FontWeight::parse)
                    .unwrap_or(cfg.font.weight),
            );
        }
        cfg
    }
}
