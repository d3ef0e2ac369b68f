use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use hexdash::models::{ATTRIBUTE_CATALOG, RegionId};
use hexdash::viz::{EstimatedMetrics, SceneRecorder, svg};
use hexdash::{AnimationDriver, Dashboard, DashboardConfig, Dataset, ManualClock, Point};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hexdash",
    version,
    about = "Hex-grid choropleth and linked time-series chart, exported as SVG"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the map and the chart for one state of the controls.
    Render(RenderArgs),
    /// Step the year animation and print what each tick shows.
    Play(PlayArgs),
    /// List the attributes offered by the selector.
    Attributes,
}

#[derive(Args, Debug)]
struct Inputs {
    /// Tidy CSV with `State`, `Year` and one column per attribute.
    #[arg(long)]
    data: PathBuf,
    /// GeoJSON FeatureCollection of hex polygons.
    #[arg(long)]
    geo: PathBuf,
    /// Optional JSON config overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Attribute to color by (defaults to the config's initial attribute).
    #[arg(short, long)]
    attribute: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    inputs: Inputs,
    /// Year to show (defaults to the last year).
    #[arg(short, long)]
    year: Option<i32>,
    /// Color by the extent over all years instead of the current year.
    #[arg(long, default_value_t = false)]
    all_years: bool,
    /// Region ids to select, separated by comma or semicolon (e.g., CA,NV).
    #[arg(long)]
    select: Option<String>,
    /// Lasso path in map pixels: `x,y;x,y;...`. Overrides --select.
    #[arg(long)]
    lasso: Option<String>,
    /// Directory for map.svg and chart.svg.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    inputs: Inputs,
    /// Year to start from (defaults to the first year).
    #[arg(long)]
    from: Option<i32>,
    /// Number of ticks to run.
    #[arg(long, default_value_t = 5)]
    ticks: u32,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_path(s: &str) -> Result<Vec<Point>> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| -> Result<Point> {
            let (x, y) = p
                .split_once(',')
                .ok_or_else(|| anyhow!("invalid lasso point `{}`, expected x,y", p))?;
            Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
        })
        .collect()
}

fn open(inputs: &Inputs) -> Result<Dashboard<SceneRecorder>> {
    let mut config = match &inputs.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(attr) = &inputs.attribute {
        config.initial_attribute = attr.clone();
    }
    let data = Dataset::open(&inputs.data, &inputs.geo)?;
    eprintln!(
        "Loaded {} rows and {} regions",
        data.records().len(),
        data.regions().len()
    );
    Ok(Dashboard::new(data, config, SceneRecorder::new(EstimatedMetrics))?)
}

fn fmt_domain(dash: &Dashboard<SceneRecorder>) -> String {
    match dash.last_report().and_then(|r| r.domain) {
        Some(d) => format!("[{}, {}]", d.min, d.max),
        None => "no data".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Play(args) => cmd_play(args),
        Command::Attributes => {
            for (name, desc) in ATTRIBUTE_CATALOG {
                println!("{}\n    {}", name, desc);
            }
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut dash = open(&args.inputs)?;
    dash.dispatch_render();
    if let Some(year) = args.year {
        dash.set_year(year)?;
    }
    dash.set_scale_mode(args.all_years);

    if let Some(lasso) = &args.lasso {
        let path = parse_path(lasso)?;
        dash.lasso_start();
        for p in path {
            dash.lasso_move(p);
        }
        let selected = dash.lasso_end().unwrap_or_default();
        eprintln!(
            "Lasso selected: {}",
            selected.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
        );
    } else if let Some(select) = &args.select {
        let ids: BTreeSet<RegionId> = parse_list(select).into_iter().map(RegionId).collect();
        dash.set_selection(ids)?;
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let map_path = args.out_dir.join("map.svg");
    let chart_path = args.out_dir.join("chart.svg");
    svg::write_map_svg(&dash.port().scene, dash.config(), &map_path)?;
    svg::write_chart_svg(&dash.port().scene, dash.config(), &chart_path)?;

    let state = dash.state();
    eprintln!(
        "{} • {}  domain={}  selected={}",
        state.attribute(),
        state.year(),
        fmt_domain(&dash),
        state.selection().len()
    );
    if let Some(report) = dash.last_report()
        && !report.placeholder
    {
        eprintln!(
            "Chart: {} series, labels settled after {} iteration(s){}",
            report.series,
            report.layout_iterations,
            if report.layout_converged { "" } else { " (not converged)" }
        );
    }
    eprintln!("Wrote {} and {}", map_path.display(), chart_path.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> Result<()> {
    let mut dash = open(&args.inputs)?;
    let from = args.from.unwrap_or(dash.bounds().min);
    if !dash.bounds().contains(from) {
        bail!(
            "--from {} outside {}..={}",
            from,
            dash.bounds().min,
            dash.bounds().max
        );
    }
    dash.dispatch_render();
    dash.set_year(from)?;

    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), dash.config().animation_period());
    driver.start();
    println!("{}  domain={}", dash.state().year(), fmt_domain(&dash));
    for _ in 0..args.ticks {
        clock.advance(driver.period());
        dash.pump_animation(&mut driver);
        println!("{}  domain={}", dash.state().year(), fmt_domain(&dash));
    }
    driver.stop();
    Ok(())
}
