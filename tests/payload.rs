use chartkit::PayloadError;
use chartkit::models::ChartPayload;
use chartkit::viz::color::{OFFICE10, Rgba};
use chartkit::viz::{FontWeight, LegendAlign, LegendConfig, SymbolShape};
use serde_json::json;

fn sample() -> ChartPayload {
    serde_json::from_value(json!({
        "data": {
            "data": [
                {"date": "2020-01", "sales": 10, "region": "North"},
                {"date": "2020-02", "sales": 12, "region": "South"},
                {"date": "2020-03", "sales": 9,  "region": "North"},
                {"date": "2020-04", "sales": 14, "region": "East"}
            ],
            "columns": [
                {"name": "date", "role": "x"},
                {"name": "sales", "role": "y", "unit": "EUR"},
                {"name": "region", "role": "group"}
            ]
        },
        "variables": {
            "width": "640px",
            "margin_left": 20,
            "margin_right": 20,
            "legend_align": "right",
            "legend_shape": "rect",
            "legend_row_spacing": 4
        },
        "typography": {
            "label": {"font_family": "Inter", "font_size": "11px", "font_weight": "600"}
        },
        "colors": {
            "field": {"North": "#123456", "South": "not-a-color"},
            "available_colors": ["#000000", "#ffffff"]
        },
        "colors_dark": {"field": {"North": "#abcdef"}}
    }))
    .expect("payload")
}

#[test]
fn roles_and_units() {
    let p = sample();
    assert_eq!(p.require_role("y").unwrap().unit.as_deref(), Some("EUR"));
    assert!(matches!(p.require_role("size"), Err(PayloadError::MissingRole(r)) if r == "size"));
    p.validate(&["x", "y", "group"]).unwrap();
}

#[test]
fn validation_catches_missing_fields_and_rows() {
    let mut p = sample();
    p.data.columns[1].name = "revenue".into();
    assert!(matches!(
        p.validate(&["y"]),
        Err(PayloadError::MissingField { column, .. }) if column == "revenue"
    ));

    p.data.data.clear();
    assert!(matches!(p.validate(&["x"]), Err(PayloadError::NoRecords)));
}

#[test]
fn malformed_json_is_a_payload_error() {
    assert!(matches!(
        ChartPayload::from_json_str("{\"data\": 3}"),
        Err(PayloadError::Json(_))
    ));
}

#[test]
fn group_labels_first_seen_order() {
    assert_eq!(sample().group_labels("region"), vec!["North", "South", "East"]);
}

#[test]
fn color_scheme_light_and_dark() {
    let p = sample();
    let light = p.color_scheme(false);
    assert_eq!(light.resolve("North", 0), Rgba::rgb(0x12, 0x34, 0x56));
    // invalid hex falls back to the payload palette
    assert_eq!(light.resolve("South", 1), Rgba::rgb(255, 255, 255));
    assert_eq!(light.resolve("East", 2), Rgba::rgb(0, 0, 0));

    let dark = p.color_scheme(true);
    assert_eq!(dark.resolve("North", 0), Rgba::rgb(0xAB, 0xCD, 0xEF));
    assert_eq!(dark.resolve("East", 2), OFFICE10[2]);
}

#[test]
fn legend_config_from_variables_and_typography() {
    let cfg = LegendConfig::from_payload(&sample(), false);
    assert_eq!(cfg.max_width, 600.0);
    assert_eq!(cfg.x, 20.0);
    assert_eq!(cfg.row_spacing, 4.0);
    assert_eq!(cfg.align, LegendAlign::Right);
    assert_eq!(cfg.shape, SymbolShape::Rect);
    assert_eq!(cfg.font.family, "Inter");
    assert_eq!(cfg.font.size, 11.0);
    assert_eq!(cfg.font.weight, FontWeight::Bold);
    assert_eq!(cfg.item_height, LegendConfig::default().item_height);
}
