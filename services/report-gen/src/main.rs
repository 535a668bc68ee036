//! Report figure generator.
//!
//! Fetches the daily SST grid and renders the report's figures to PNG
//! files. The dataset map degrades gracefully: a fetch failure logs the
//! reason and the static figures still render; a day with no valid
//! samples skips the map silently.

mod config;

use anyhow::{Context, Result};
use chart_renderer::{
    png, render_bullet, render_colorbar, render_combo, render_heatmap, render_lollipop,
    render_waffle, BulletSpec, ChartFonts, ComboSpec, HeatmapSpec, LollipopSpec, WaffleSpec,
};
use clap::Parser;
use image::RgbaImage;
use oisst_client::{FetchError, OisstConfig, SstFetcher};
use rayon::prelude::*;
use sst_common::time::date_label;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::ReportConfig;

#[derive(Parser, Debug)]
#[command(name = "report-gen", about = "Render the SST report figures to PNG files")]
struct Args {
    /// Figure configuration (YAML); the built-in report set when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for rendered PNGs
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// TrueType font for labels (falls back to system fonts)
    #[arg(long, env = "REPORT_FONT")]
    font: Option<PathBuf>,

    /// Skip the dataset fetch and render only the static figures
    #[arg(long)]
    offline: bool,
}

enum Figure {
    Bullet(BulletSpec),
    Lollipop(LollipopSpec),
    Combo(ComboSpec),
    Waffle(WaffleSpec),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::builtin(),
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let fonts = ChartFonts::load(args.font.as_deref());

    if !args.offline {
        render_dataset_map(&config, &fonts, &args.out_dir).await?;
    }

    render_static_figures(&config, &fonts, &args.out_dir)?;

    info!(out_dir = %args.out_dir.display(), "report figures written");
    Ok(())
}

/// Fetch the daily grid and render the map + colorbar.
///
/// The two failure shapes are deliberately distinct: `DataUnavailable`
/// is surfaced as an error message, an absent day is skipped silently.
async fn render_dataset_map(
    config: &ReportConfig,
    fonts: &ChartFonts,
    out_dir: &std::path::Path,
) -> Result<()> {
    let window = config.dataset.window.to_window()?;
    let date = config.dataset.date;

    let fetcher = SstFetcher::new(OisstConfig::default()).context("building dataset client")?;
    match fetcher.fetch(date, &window).await {
        Ok(outcome) => {
            if let Some(grid) = outcome.grid() {
                let spec = HeatmapSpec::new(format!("Sea surface temperature {}", date_label(date)));
                let map = render_heatmap(grid, &spec, fonts);
                png::write_file(&map, &out_dir.join("sst_map.png"))?;

                let bar = render_colorbar(&spec.norm, "°C", 90, spec.height, fonts);
                png::write_file(&bar, &out_dir.join("sst_colorbar.png"))?;
            } else {
                info!(%date, "no valid samples in window, skipping the map");
            }
        }
        Err(err @ FetchError::InvalidWindow) => return Err(err.into()),
        Err(FetchError::DataUnavailable { message }) => {
            error!(%date, message, "dataset fetch failed, skipping the map");
        }
    }

    Ok(())
}

/// Render every configured chart figure in parallel.
fn render_static_figures(
    config: &ReportConfig,
    fonts: &ChartFonts,
    out_dir: &std::path::Path,
) -> Result<()> {
    let mut jobs: Vec<(String, Figure)> = Vec::new();

    for (i, figure) in config.bullets.iter().enumerate() {
        jobs.push((format!("bullet_{}", i + 1), Figure::Bullet(figure.to_spec()?)));
    }
    for (i, figure) in config.lollipops.iter().enumerate() {
        jobs.push((
            format!("lollipop_{}", i + 1),
            Figure::Lollipop(figure.to_spec()?),
        ));
    }
    if let Some(figure) = &config.combo {
        jobs.push(("combo".to_string(), Figure::Combo(figure.to_spec())));
    }
    for (i, figure) in config.waffles.iter().enumerate() {
        jobs.push((format!("waffle_{}", i + 1), Figure::Waffle(figure.to_spec())));
    }

    let rendered: Vec<(String, Result<RgbaImage>)> = jobs
        .par_iter()
        .map(|(name, figure)| {
            let img = match figure {
                Figure::Bullet(spec) => Ok(render_bullet(spec, fonts)),
                Figure::Lollipop(spec) => render_lollipop(spec, fonts).map_err(Into::into),
                Figure::Combo(spec) => render_combo(spec, fonts).map_err(Into::into),
                Figure::Waffle(spec) => render_waffle(spec, fonts).map_err(Into::into),
            };
            (name.clone(), img)
        })
        .collect();

    for (name, result) in rendered {
        let img = result.with_context(|| format!("rendering {name}"))?;
        let path = out_dir.join(format!("{name}.png"));
        png::write_file(&img, &path).with_context(|| format!("writing {}", path.display()))?;
        info!(figure = %name, "figure rendered");
    }

    if config.bullets.is_empty() && config.lollipops.is_empty() && config.waffles.is_empty() {
        warn!("configuration defines no static figures");
    }

    Ok(())
}
