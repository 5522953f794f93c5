use chartkit::viz::color::{ColorScheme, OFFICE10, Palette, Rgba};
use chartkit::viz::legend::pack_rows;
use chartkit::viz::{
    FontSpec, HeuristicTextMetrics, LegendAlign, LegendConfig, TextMetrics, layout_legend,
};

/// Every character is the same fixed number of pixels wide.
struct FixedWidth(f64);

impl TextMetrics for FixedWidth {
    fn measure(&self, text: &str, _font: &FontSpec) -> f64 {
        text.chars().count() as f64 * self.0
    }
}

fn config() -> LegendConfig {
    LegendConfig {
        max_width: 200.0,
        item_height: 20.0,
        item_spacing: 10.0,
        row_spacing: 10.0,
        symbol_size: 5.0,
        ..LegendConfig::default()
    }
}

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("ab{i:02}")).collect()
}

#[test]
fn greedy_rows_and_bounding_box() {
    // each item: 4 chars * 10px + 2*5 symbol + 5 gap = 55px
    let layout = layout_legend(&labels(7), &ColorScheme::default(), &config(), &FixedWidth(10.0));
    let sizes: Vec<usize> = layout.rows.iter().map(|r| r.entries.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
    assert_eq!(layout.width, 185.0);
    assert_eq!(layout.height, 3.0 * 20.0 + 2.0 * 10.0);
    let ys: Vec<f64> = layout.rows.iter().map(|r| r.y).collect();
    assert_eq!(ys, vec![0.0, 30.0, 60.0]);
    let xs: Vec<f64> = layout.rows[0].entries.iter().map(|e| e.x).collect();
    assert_eq!(xs, vec![0.0, 65.0, 130.0]);
}

#[test]
fn rows_fit_unless_a_single_item_is_too_wide() {
    let groups: Vec<String> = [
        "a", "a much longer label than the rest", "bb", "ccc", "dddd", "eeeeeeeeeeeeeeeeeeeeeeeeeeee",
        "f", "gg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let cfg = LegendConfig {
        max_width: 150.0,
        ..config()
    };
    let layout = layout_legend(&groups, &ColorScheme::default(), &cfg, &FixedWidth(6.0));
    for row in &layout.rows {
        if row.width > cfg.max_width {
            assert_eq!(row.entries.len(), 1, "oversized row {row:?}");
        }
    }
    let flat: Vec<&str> = layout.row_labels().into_iter().flatten().collect();
    let expected: Vec<&str> = groups.iter().map(String::as_str).collect();
    assert_eq!(flat, expected, "order preserved");
}

#[test]
fn packing_is_idempotent() {
    let groups = labels(13);
    let cfg = config();
    let a = layout_legend(&groups, &ColorScheme::default(), &cfg, &HeuristicTextMetrics);
    let b = layout_legend(&groups, &ColorScheme::default(), &cfg, &HeuristicTextMetrics);
    assert_eq!(a, b);
    assert_eq!(a.size(), b.size());
}

#[test]
fn alignment_offsets_rows() {
    let groups = labels(4);
    let scheme = ColorScheme::default();
    let at = |align| {
        let cfg = LegendConfig {
            align,
            x: 10.0,
            ..config()
        };
        let layout = layout_legend(&groups, &scheme, &cfg, &FixedWidth(10.0));
        layout.rows.iter().map(|r| r.x).collect::<Vec<f64>>()
    };
    // rows: 185px, 55px inside a 200px box starting at x=10
    assert_eq!(at(LegendAlign::Left), vec![10.0, 10.0]);
    assert_eq!(at(LegendAlign::Center), vec![17.5, 82.5]);
    assert_eq!(at(LegendAlign::Right), vec![25.0, 155.0]);
}

#[test]
fn empty_groups_give_an_empty_box() {
    let layout = layout_legend(&[], &ColorScheme::default(), &config(), &HeuristicTextMetrics);
    assert!(layout.rows.is_empty());
    assert_eq!((layout.width, layout.height), (0.0, 0.0));
}

#[test]
fn colors_come_from_scheme_then_palette_by_index() {
    let red = Rgba::rgb(200, 0, 0);
    let scheme = ColorScheme::from_palette(Palette::default()).with_color("ab01", red);
    let layout = layout_legend(&labels(3), &scheme, &config(), &FixedWidth(10.0));
    let colors: Vec<Rgba> = layout.rows[0].entries.iter().map(|e| e.color).collect();
    assert_eq!(colors, vec![OFFICE10[0], red, OFFICE10[2]]);
}

#[test]
fn pack_rows_widths_never_exceed_max_for_multi_item_rows() {
    let widths: Vec<f64> = (0..60).map(|i| 10.0 + ((i * 37) % 90) as f64).collect();
    for max in [50.0, 120.0, 300.0] {
        for r in pack_rows(&widths, max, 8.0) {
            let w: f64 = widths[r.clone()].iter().sum::<f64>() + 8.0 * (r.len() - 1) as f64;
            assert!(r.len() == 1 || w <= max, "row {r:?} is {w}px > {max}");
        }
    }
}
