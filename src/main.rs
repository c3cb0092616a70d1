// SPDX-License-Identifier: MIT
//
// navtone: scroll through a page and watch the navbar adapt.
//
// This binary wires together the workspace crates:
//
//   navtone-color    → color types and CSS parsing
//   navtone-contrast → text color, weight, shadow, tracking
//   navtone-monitor  → page model, background sampler, frame-driven monitor
//
// It loads a site file (page layout + monitor + simulation settings),
// scrolls from top to bottom on a virtual clock and prints the navbar
// style every time a new one is published:
//
//   site.toml → Page + MonitorConfig → Simulation::run → text or JSON lines

mod navbar;
mod simulate;
mod site;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use navtone_monitor::Page;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::simulate::{Report, Simulation};
use crate::site::SiteFile;

/// Simulate the adaptive navbar over a page description.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Site file (TOML) describing the page
    #[arg(default_value = "pages/restaurant.toml")]
    page: PathBuf,

    /// Minimum milliseconds between frame-driven updates
    #[arg(long)]
    interval: Option<u64>,

    /// Pin the navbar to its default style
    #[arg(long)]
    disabled: bool,

    /// Frames per second of the virtual display
    #[arg(long)]
    fps: Option<u32>,

    /// Pixels scrolled per frame
    #[arg(long)]
    step: Option<f64>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print one JSON object per report
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let site = SiteFile::load(&args.page)?;

    let mut monitor = site.monitor;
    if let Some(interval) = args.interval {
        monitor.update_interval_ms = interval;
    }
    if args.disabled {
        monitor.enabled = false;
    }

    let mut simulation = site.simulation;
    if let Some(fps) = args.fps {
        simulation.fps = fps;
    }
    if let Some(step) = args.step {
        simulation.scroll_step = step;
    }
    if args.frames.is_some() {
        simulation.frames = args.frames;
    }
    simulation.validate()?;

    let page = Page::from_spec(&site.page)
        .with_context(|| format!("Invalid page layout: {}", args.page.display()))?;
    info!(
        page = %args.page.display(),
        sections = site.page.sections.len(),
        height = page.document_height(),
        "page loaded"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut result = Ok(());
    let summary = Simulation::new(page, monitor, simulation).run(|report| {
        if result.is_ok() {
            result = if args.json {
                write_json(&mut out, report)
            } else {
                write_text(&mut out, report)
            };
        }
    });
    result.context("Failed to write report")?;

    if !args.json {
        writeln!(
            out,
            "{} frames, {} styles published, stopped at {}px",
            summary.frames, summary.revisions, summary.final_scroll_y
        )?;
    }
    Ok(())
}

fn write_json(out: &mut impl Write, report: &Report) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn write_text(out: &mut impl Write, report: &Report) -> anyhow::Result<()> {
    let style = &report.style;
    writeln!(
        out,
        "{:>7.3}s  scroll {:>6.0}px  {:<8}  rev {:<3}  bg {}  text {}  hover {}  weight {}  spacing {}  contrast {:.2}:1",
        Duration::from_millis(report.time_ms).as_secs_f64(),
        report.scroll_y,
        report.chrome.active_label().unwrap_or("-"),
        report.revision,
        style.background_color,
        style.text_color,
        style.hover_color,
        style.font_weight,
        style.letter_spacing_css(),
        style.contrast_ratio,
    )?;
    writeln!(out, "{:>9}link {{ {} }}", "", report.chrome.link.to_css())?;
    Ok(())
}
