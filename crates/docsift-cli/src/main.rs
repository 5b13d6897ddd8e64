// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docsift — classify an image as document or photo and, for documents,
// write a binarized copy ready for OCR.
//
// Entry point. Initialises logging, loads the configuration, runs the
// pipeline and writes the result.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use docsift_core::{ClassificationParams, ClassificationReport, DetectorConfig, OcrParams};
use docsift_vision::image::{open_image, save_image};
use docsift_vision::{DocumentPipeline, ProcessedImage};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "docsift", version, about)]
struct Cli {
    /// Image to classify (any format the `image` crate decodes).
    input: PathBuf,

    /// Where to write the processed image; format follows the extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON detector configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Global threshold separating paper from ink (0-255).
    #[arg(long, default_value_t = ClassificationParams::default().tolerance)]
    tolerance: i32,

    /// Minimum share of white pixels, in percent.
    #[arg(long, default_value_t = ClassificationParams::default().white_percent)]
    white_percent: f32,

    /// The image must contain strictly more regions than this.
    #[arg(long, default_value_t = ClassificationParams::default().min_regions)]
    min_regions: i64,

    /// White frame over the edges, in percent of the larger side.
    #[arg(long, default_value_t = OcrParams::default().border_percent)]
    border_percent: i32,

    /// Binarization clarity level (0-16).
    #[arg(long, default_value_t = OcrParams::default().clarity_level)]
    clarity: i32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(input = %cli.input.display(), "docsift starting");

    let config = match &cli.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    let image = open_image(&cli.input)
        .with_context(|| format!("decoding {}", cli.input.display()))?;

    let pipeline = DocumentPipeline::new(config)?.with_observer(Arc::new(
        |report: &ClassificationReport| {
            tracing::info!(
                white_pixel_percent = report.white_pixel_percent,
                region_count = ?report.region_count,
                "Classification signals"
            );
        },
    ));

    let processed = pipeline.process(
        image,
        &ClassificationParams::new(cli.tolerance, cli.white_percent, cli.min_regions),
        &OcrParams::new(cli.border_percent, cli.clarity),
    )?;

    let verdict = match &processed {
        ProcessedImage::Document(_) => "document",
        ProcessedImage::Photo(_) => "photo",
    };
    println!("{}: {verdict}", cli.input.display());

    if let Some(output) = &cli.output {
        save_image(&processed.into_dynamic(), output)
            .with_context(|| format!("writing {}", output.display()))?;
        tracing::info!(output = %output.display(), "Result written");
    }

    Ok(())
}
