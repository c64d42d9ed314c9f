use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt};

mod cache;
mod model;
mod render;
mod schema;
mod table;

pub type Result<T> = anyhow::Result<T>;

/// Spreadsheet shipped alongside the panel.
const DEFAULT_DATAFILE: &str = "sisdepen_baseunica_18_28102025_173932_csv.xlsx";

#[derive(Parser)]
#[command(name = "sisdepen-panel")]
#[command(about = "Painel SISDEPEN: prison-system statistics panel", long_about = None)]
struct Cli {
    /// Input spreadsheet (.xlsx, .xls, .xlsb, .ods or .csv).
    #[arg(long, default_value = DEFAULT_DATAFILE)]
    data: PathBuf,

    /// Output HTML file.
    #[arg(short = 'o', long, default_value = "painel_sisdepen.html")]
    out: PathBuf,

    /// Show only this UF ("Todos" for all).
    #[arg(long)]
    uf: Option<String>,

    /// Show only this year ("Todos" for all).
    #[arg(long)]
    ano: Option<String>,

    /// Rows in the filtered-data sample table.
    #[arg(long, default_value_t = 200)]
    sample_rows: usize,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).with_target(false).init();

    let cli = Cli::parse();

    // 1) Load + resolve + normalize (memoized per input path).
    let datasets = cache::DatasetCache::new();
    let dataset = match datasets.get_or_load(&cli.data) {
        Ok(ds) => ds,
        Err(err) => {
            error!(path = %cli.data.display(), "{}", err);
            return Err(err).with_context(|| format!("load {}", cli.data.display()));
        }
    };

    debug!(entries = datasets.len(), "dataset cache ready");

    // 2) Filter + aggregate.
    let filter = model::view::Filter::new(cli.uf, cli.ano);
    let source = cli
        .data
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.data.display().to_string());
    let data = model::build_report_data(&source, &dataset, &filter, cli.sample_rows)?;

    // 3) Render HTML.
    let html = render::render_html_report(&data)?;
    std::fs::write(&cli.out, html).with_context(|| format!("write {}", cli.out.display()))?;
    info!(
        out = %cli.out.display(),
        rows = data.totals.filtered_rows,
        "panel written"
    );
    println!("Wrote {}", cli.out.display());

    Ok(())
}
