mod tui;

use clap::{Parser, Subcommand, ValueEnum};
use colplot_common::Config;
use colplot_core::{
    load_table, resolve_paths, Dimension, PlotKind, PlotObject, PlotOrchestrator, PlotRequest, RetainedPlot, Table,
};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use std::sync::Mutex;
use std::{io, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui::app::{summarize_columns, App};
use tui::events::handle_key;
use tui::session::Session;
use tui::ui::render;

#[derive(Parser)]
#[command(name = "colplot", version, about = "Plot numeric columns of Parquet and CSV tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Histogram,
    Scatter,
}

#[derive(Clone, Copy, ValueEnum)]
enum DimArg {
    #[value(name = "1d")]
    One,
    #[value(name = "2d")]
    Two,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive plot browser
    View { path: String },
    /// Build one plot and print it
    Plot {
        path: String,
        /// X column, by name or index
        #[arg(long)] x: String,
        /// Y column, by name or index
        #[arg(long)] y: Option<String>,
        #[arg(long, value_enum, default_value = "histogram")] kind: KindArg,
        #[arg(long, value_enum, default_value = "1d")] dim: DimArg,
        #[arg(long)] json: bool,
    },
    /// List columns with units and numeric row counts
    Columns { path: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Commands::View { .. }))?;
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Config::default()
        }
    };
    match cli.command {
        Commands::View { path } => run_view(path, config)?,
        Commands::Plot { path, x, y, kind, dim, json } => run_plot(&path, &x, y.as_deref(), kind, dim, json, &config)?,
        Commands::Columns { path } => run_columns(&path, &config)?,
    }
    Ok(())
}

fn log_path() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".")).join("colplot").join("colplot.log")
}

/// The TUI owns the terminal, so its events go to a file instead of stderr.
fn init_logging(to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("COLPLOT_LOG").unwrap_or_else(|_| EnvFilter::new("colplot_core=info,warn"));
    if to_file {
        let path = log_path();
        if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)?; }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

fn load(input: &str, config: &Config) -> anyhow::Result<Table> {
    let paths = resolve_paths(input)?;
    if paths.is_empty() { anyhow::bail!("No Parquet or CSV files found: {input}"); }
    Ok(load_table(&paths, &config.source)?)
}

/// A column given by exact name, or else by zero-based index.
fn column_arg(table: &Table, arg: &str) -> anyhow::Result<usize> {
    if let Some(i) = table.column_index(arg) { return Ok(i); }
    arg.parse::<usize>().map_err(|_| anyhow::anyhow!("no column named {arg:?} (available: {})", table.header.join(", ")))
}

fn run_columns(input: &str, config: &Config) -> anyhow::Result<()> {
    let table = load(input, config)?;
    println!("{:<4} {:<32} {:<10} {:>10}", "#", "column", "unit", "numeric");
    for (i, s) in summarize_columns(&table).iter().enumerate() {
        let unit = if s.label.unit.is_empty() { "-" } else { s.label.unit.as_str() };
        println!("{:<4} {:<32} {:<10} {:>10}", i, s.name, unit, format!("{}/{}", s.numeric, table.row_count()));
    }
    Ok(())
}

fn run_plot(input: &str, x: &str, y: Option<&str>, kind: KindArg, dim: DimArg, json: bool, config: &Config) -> anyhow::Result<()> {
    let table = load(input, config)?;
    let request = PlotRequest {
        x_index: column_arg(&table, x)?,
        y_index: y.map(|y| column_arg(&table, y)).transpose()?,
        kind: match kind { KindArg::Histogram => PlotKind::Histogram, KindArg::Scatter => PlotKind::Scatter },
        dimension: match dim { DimArg::One => Dimension::One, DimArg::Two => Dimension::Two },
    };
    let mut orchestrator = PlotOrchestrator::from_config(config);
    let retained = orchestrator.plot(&table, &request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(retained)?);
    } else {
        print_plot(retained);
    }
    Ok(())
}

fn print_plot(r: &RetainedPlot) {
    println!("{:<12} {}", "surface:", r.surface);
    println!("{:<12} {:?}", "kind:", r.plot.kind());
    println!("{:<12} {}", "title:", r.plot.title());
    match r.y_dropped {
        Some(y) => println!("{:<12} x={} y={}", "skipped:", r.x_dropped, y),
        None => println!("{:<12} {}", "skipped:", r.x_dropped),
    }
    match &r.plot {
        PlotObject::Histogram1D(h) => {
            println!("{:<12} {} | {}", "axes:", h.x_title, h.y_title);
            println!("{:<12} {} x {} over [{}, {}]", "bins:", h.bins.count, h.bins.width, h.bins.lower, h.bins.upper);
            let max = h.max_count().max(1);
            let edges = h.bins.edges();
            for (i, &c) in h.counts.iter().enumerate() {
                let bar = "█".repeat((c as f64 / max as f64 * 40.0) as usize);
                println!("  {:>12.4} {:<40} {}", edges[i], bar, c);
            }
        }
        PlotObject::Histogram2D(h) => {
            println!("{:<12} {} | {}", "axes:", h.x_title, h.y_title);
            println!("{:<12} {} x {}", "bins:", h.x_bins.count, h.y_bins.count);
            println!("{:<12} {}", "max cell:", h.max_count());
        }
        PlotObject::Scatter(s) => {
            println!("{:<12} {} | {}", "axes:", s.x_title, s.y_title);
            println!("{:<12} {} ({:?})", "points:", s.points.len(), s.mode);
        }
    }
    if let Some(stats) = r.plot.stats_box() {
        for line in &stats.lines {
            println!("{:<12} {}", format!("{}:", line.label), line.value);
        }
    }
}

fn run_view(input_path: String, config: Config) -> anyhow::Result<()> {
    let table = load(&input_path, &config)?;
    let mut app = App::new(input_path, table, config);
    if let Some(s) = Session::load() { app.restore_from_session(&s); }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick = Duration::from_millis(66); // 15Hz
    let result = (|| -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| render(f, &app))?;
            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? { handle_key(&mut app, key); }
            }
            if app.should_quit { break; }
        }
        Ok(())
    })();
    if let Err(e) = app.to_session().save() {
        tracing::warn!(error = %e, "session not saved");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
