//! Colors, the fallback series palette, and per-label color resolution.

use plotters::style::RGBAColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let h = s.trim().trim_start_matches('#');
        if !h.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
        match h.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(&h[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_plotters(&self) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, self.a as f64 / 255.0)
    }
}

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
pub const OFFICE10: [Rgba; 10] = [
    Rgba::rgb(68, 114, 196),  // blue      (#4472C4)
    Rgba::rgb(237, 125, 49),  // orange    (#ED7D31)
    Rgba::rgb(165, 165, 165), // gray      (#A5A5A5)
    Rgba::rgb(255, 192, 0),   // gold      (#FFC000)
    Rgba::rgb(91, 155, 213),  // light blue(#5B9BD5)
    Rgba::rgb(112, 173, 71),  // green     (#70AD47)
    Rgba::rgb(38, 68, 120),   // dark blue (#264478)
    Rgba::rgb(158, 72, 14),   // dark org. (#9E480E)
    Rgba::rgb(99, 99, 99),    // dark gray (#636363)
    Rgba::rgb(153, 115, 0),   // brownish  (#997300)
];

/// Ordered fallback colors, picked by index and wrapping around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: OFFICE10.to_vec(),
        }
    }
}

impl Palette {
    /// An empty list yields the default palette.
    pub fn new(colors: Vec<Rgba>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    #[inline]
    pub fn color(&self, idx: usize) -> Rgba {
        self.colors[idx % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Label -> color lookup with an index-keyed palette fallback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorScheme {
    by_label: BTreeMap<String, Rgba>,
    palette: Palette,
}

impl ColorScheme {
    pub fn new(by_label: BTreeMap<String, Rgba>, palette: Palette) -> Self {
        Self { by_label, palette }
    }

    /// Scheme with no explicit colors, only a palette.
    pub fn from_palette(palette: Palette) -> Self {
        Self::new(BTreeMap::new(), palette)
    }

    pub fn with_color(mut self, label: impl Into<String>, color: Rgba) -> Self {
        self.by_label.insert(label.into(), color);
        self
    }

    /// Explicit color for `label`, else the palette entry for its position.
    pub fn resolve(&self, label: &str, index: usize) -> Rgba {
        self.by_label
            .get(label)
            .copied()
            .unwrap_or_else(|| self.palette.color(index))
    }
}
