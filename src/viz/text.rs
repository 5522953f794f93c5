//! Text measurement.
//!
//! Layout code only needs widths, so measurement sits behind [`TextMetrics`]:
//! - [`HeuristicTextMetrics`]: fixed em-ratio estimate, no fonts needed
//! - [`PlottersTextMetrics`]: real glyph advances from the plotters font stack
//! - [`CachedTextMetrics`]: memoizes any of the above across one layout pass

use ahash::AHashMap;
use anyhow::{Result, anyhow};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;

/// Family used when a payload does not name one.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS-ish weight names: `bold`, `bolder`, or a numeric weight of 600+ count as bold.
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "bold" | "bolder" => FontWeight::Bold,
            other => match other.parse::<u32>() {
                Ok(w) if w >= 600 => FontWeight::Bold,
                _ => FontWeight::Normal,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Pixels
    pub size: f64,
    pub weight: FontWeight,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: 12.0,
            weight: FontWeight::Normal,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
        }
    }

    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    fn plotters_style(&self) -> FontStyle {
        match self.weight {
            FontWeight::Normal => FontStyle::Normal,
            FontWeight::Bold => FontStyle::Bold,
        }
    }
}

/// Anything that can tell how wide a string renders.
pub trait TextMetrics {
    /// Rendered width of `text` in pixels.
    fn measure(&self, text: &str, font: &FontSpec) -> f64;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        (**self).measure(text, font)
    }
}

/// Average glyph width of 0.6em; ignores family and weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMetrics;

impl TextMetrics for HeuristicTextMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size * 0.6
    }
}

/// Measures with plotters' font backend.
///
/// With the `ab_glyph` text path only registered fonts resolve (see [`register_font_file`]);
/// unresolvable fonts fall back to [`HeuristicTextMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersTextMetrics;

impl TextMetrics for PlottersTextMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let desc = FontDesc::new(
            FontFamily::from(font.family.as_str()),
            font.size,
            font.plotters_style(),
        );
        match desc.box_size(text) {
            Ok((w, _h)) => w as f64,
            Err(e) => {
                log::debug!("font {:?} unavailable ({e:?}); estimating width", font.family);
                HeuristicTextMetrics.measure(text, font)
            }
        }
    }
}

type CacheKey = (String, String, u64, FontWeight);

/// Memoizing wrapper. Not `Sync`; create one per layout pass.
#[derive(Debug, Default)]
pub struct CachedTextMetrics<M> {
    inner: M,
    cache: RefCell<AHashMap<CacheKey, f64>>,
}

impl<M: TextMetrics> CachedTextMetrics<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: RefCell::new(AHashMap::new()),
        }
    }

    /// Number of distinct (text, font) pairs measured so far.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<M: TextMetrics> TextMetrics for CachedTextMetrics<M> {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        let key = (
            text.to_string(),
            font.family.clone(),
            font.size.to_bits(),
            font.weight,
        );
        if let Some(w) = self.cache.borrow().get(&key) {
            return *w;
        }
        let w = self.inner.measure(text, font);
        self.cache.borrow_mut().insert(key, w);
        w
    }
}

/// Register a TTF/OTF file under `family` for the plotters text path.
///
/// `ab_glyph` does not discover OS fonts, so bitmap output needs at least one registered font.
/// The font bytes live for the rest of the process.
pub fn register_font_file<P: AsRef<Path>>(family: &str, path: P) -> Result<()> {
    let bytes = fs::read(path.as_ref())?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    for style in [FontStyle::Normal, FontStyle::Bold] {
        plotters::style::register_font(family, style, bytes)
            .map_err(|_| anyhow!("invalid font {}", path.as_ref().display()))?;
    }
    Ok(())
}
