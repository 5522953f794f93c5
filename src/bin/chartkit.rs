use anyhow::{Context, Result};
use chartkit::models::ChartPayload;
use chartkit::viz::legend::layout_legend;
use chartkit::viz::text::register_font_file;
use chartkit::viz::{
    self, CachedTextMetrics, HeuristicTextMetrics, LegendAlign, LegendConfig, PlottersTextMetrics,
    RangeFormatter, Rgba, SymbolShape, TextMetrics,
};
use chartkit::{stats, storage};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "chartkit",
    version,
    about = "Compute chart axes, number formats, and legends from a JSON chart payload"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the adaptive time axis (ticks and labels) for the x column.
    Axis(AxisArgs),
    /// Print the range-based unit and formatted values for the y column.
    Format(FormatArgs),
    /// Lay out and render the legend for the group column (.svg or .png).
    Legend(LegendArgs),
    /// Check that the payload declares the given roles and that their fields exist.
    Validate(ValidateArgs),
    /// Write the computed layout (axis, labels, units, legend rows) as JSON.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Chart payload (JSON with data.data, data.columns, variables, ...)
    #[arg(short, long)]
    input: PathBuf,
    /// Replace the payload's records with rows from a CSV file (header row required).
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AxisArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Date field (defaults to the column with role `x`).
    #[arg(long)]
    field: Option<String>,
    /// Axis length in pixels (default 800).
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    /// Domain padding as a fraction of the date span.
    #[arg(long, default_value_t = viz::DEFAULT_TIME_PADDING)]
    padding: f64,
}

#[derive(Args, Debug)]
struct FormatArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Numeric field (defaults to the column with role `y`).
    #[arg(long)]
    field: Option<String>,
    /// Locale tag for digit grouping (en, de, fr, es, it, pt, nl).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Args, Debug)]
struct LegendArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output image (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Use `colors_dark` and a dark background.
    #[arg(long, default_value_t = false)]
    dark: bool,
    /// Row alignment: left, center, right.
    #[arg(long)]
    align: Option<LegendAlign>,
    /// Symbol shape: circle, rect, line.
    #[arg(long)]
    shape: Option<SymbolShape>,
    /// Maximum row width in pixels.
    #[arg(long)]
    max_width: Option<f64>,
    /// TTF/OTF file to measure and draw labels with (required for .png text).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Required roles separated by comma or semicolon.
    #[arg(long, default_value = "x,y")]
    roles: String,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Axis length in pixels (default 800).
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    #[arg(long, default_value_t = false)]
    dark: bool,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn load(args: &InputArgs) -> Result<ChartPayload> {
    let mut payload = storage::load_payload(&args.input)?;
    if let Some(csv) = args.csv.as_ref() {
        payload.data.data = storage::load_records_csv(csv)?;
    }
    Ok(payload)
}

fn field_for(payload: &ChartPayload, explicit: Option<&String>, role: &str) -> Result<String> {
    match explicit {
        Some(f) => Ok(f.clone()),
        None => Ok(payload.require_role(role)?.name.clone()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Axis(args) => cmd_axis(args),
        Command::Format(args) => cmd_format(args),
        Command::Legend(args) => cmd_legend(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_axis(args: AxisArgs) -> Result<()> {
    let payload = load(&args.input)?;
    let field = field_for(&payload, args.field.as_ref(), "x")?;
    let axis = viz::compute_time_axis(payload.records(), &field, (0.0, args.width), args.padding)?;
    println!(
        "{field}: {} .. {}  span={:.2}y  interval={:?}",
        axis.extent.0, axis.extent.1, axis.span.years, axis.interval
    );
    for (px, label) in axis.tick_labels() {
        println!("{px:>9.1}  {label}");
    }
    Ok(())
}

fn cmd_format(args: FormatArgs) -> Result<()> {
    let payload = load(&args.input)?;
    let field = field_for(&payload, args.field.as_ref(), "y")?;
    let extent = stats::numeric_extent(payload.records(), &field)
        .with_context(|| format!("no numeric values in `{field}`"))?;
    let mut fmt = RangeFormatter::for_range(extent.min, extent.max);
    if let Some(tag) = args.locale.as_deref() {
        fmt = fmt.with_locale(tag);
    }
    println!(
        "{field}: unit={:?}  min={}  max={}  (per-value: {} / {})",
        fmt.unit(),
        fmt.format(extent.min),
        fmt.format(extent.max),
        viz::format_value(extent.min),
        viz::format_value(extent.max)
    );
    Ok(())
}

fn legend_config(payload: &ChartPayload, args: &LegendArgs) -> LegendConfig {
    let mut cfg = LegendConfig::from_payload(payload, args.dark);
    if let Some(a) = args.align {
        cfg.align = a;
    }
    if let Some(s) = args.shape {
        cfg.shape = s;
    }
    if let Some(w) = args.max_width {
        cfg.max_width = w;
    }
    cfg
}

fn render(
    payload: &ChartPayload,
    cfg: &LegendConfig,
    metrics: &dyn TextMetrics,
    out: &Path,
    dark: bool,
) -> Result<viz::LegendSize> {
    let group = payload.require_role("group")?;
    let labels = payload.group_labels(&group.name);
    let scheme = payload.color_scheme(dark);
    let layout = layout_legend(&labels, &scheme, cfg, &CachedTextMetrics::new(metrics));

    let canvas_w = (2.0 * cfg.x + cfg.max_width.max(layout.width)).ceil().max(1.0) as u32;
    let canvas_h = (2.0 * cfg.y + layout.height).ceil().max(1.0) as u32;
    let background = if dark {
        Rgba::rgb(0x1E, 0x1E, 0x1E)
    } else {
        Rgba::rgb(0xFF, 0xFF, 0xFF)
    };
    viz::render_legend(out, canvas_w, canvas_h, background, &layout, cfg)
}

fn cmd_legend(args: LegendArgs) -> Result<()> {
    let payload = load(&args.input)?;
    let cfg = legend_config(&payload, &args);

    let size = match args.font.as_ref() {
        Some(font) => {
            register_font_file(&cfg.font.family, font)?;
            render(&payload, &cfg, &PlottersTextMetrics, &args.out, args.dark)?
        }
        None => render(&payload, &cfg, &HeuristicTextMetrics, &args.out, args.dark)?,
    };
    eprintln!(
        "Wrote legend ({:.0}x{:.0}px) to {}",
        size.width,
        size.height,
        args.out.display()
    );
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let payload = load(&args.input)?;
    let roles = parse_list(&args.roles);
    let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
    payload
        .validate(&roles)
        .with_context(|| format!("{} is not a valid chart payload", args.input.input.display()))?;
    println!("ok: {} records, roles {}", payload.records().len(), roles.join(", "));
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let payload = load(&args.input)?;
    let records = payload.records();

    let range = (0.0, args.width);
    let axis = match payload.column_for_role("x") {
        Some(col) => match viz::compute_time_axis(records, &col.name, range, viz::DEFAULT_TIME_PADDING) {
            Ok(axis) => {
                let labels: Vec<_> = axis
                    .tick_labels()
                    .into_iter()
                    .map(|(px, label)| json!({"px": px, "label": label}))
                    .collect();
                json!({"field": col.name, "axis": axis, "labels": labels})
            }
            Err(e) => {
                log::warn!("{e}");
                serde_json::Value::Null
            }
        },
        None => serde_json::Value::Null,
    };

    let values = match payload.column_for_role("y") {
        Some(col) => {
            let fmt = RangeFormatter::for_field(records, &col.name);
            let formatted: Vec<String> = records
                .iter()
                .filter_map(|r| stats::numeric_value(r, &col.name))
                .map(|v| fmt.format(v))
                .collect();
            json!({"field": col.name, "unit": fmt.unit(), "formatted": formatted})
        }
        None => serde_json::Value::Null,
    };

    let legend = match viz::payload_legend(&payload, args.dark, &HeuristicTextMetrics) {
        Ok((layout, _cfg)) => serde_json::to_value(&layout)?,
        Err(e) => {
            log::warn!("no legend: {e}");
            serde_json::Value::Null
        }
    };

    let report = json!({
        "records": records.len(),
        "label_indices": viz::sample_label_indices(records.len()),
        "x": axis,
        "y": values,
        "legend": legend,
    });

    match args.out.as_ref() {
        Some(path) => {
            storage::save_json(&report, path)?;
            eprintln!("Wrote layout to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
