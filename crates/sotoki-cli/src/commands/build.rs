//! `sotoki build <TEMPLATES_DIR> <DATABASE_DIR> <OUTPUT_DIR>`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sotoki_cli::{build, render::RenderError, CliError, TemplateRenderer};
use sotoki_core::SotokiConfig;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory holding post.html and index.html
    pub templates: PathBuf,

    /// Store directory written by `sotoki load`
    pub database: PathBuf,

    /// Output directory; posts/ inside it must not exist
    pub output: PathBuf,

    /// Render at most this many question pages (overrides build.max_pages)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_pages: Option<u64>,
}

pub fn handle_build(args: BuildArgs, config: &SotokiConfig) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(max_pages) = args.max_pages {
        config.build.max_pages = Some(usize::try_from(max_pages).unwrap_or(usize::MAX));
    }

    let renderer = TemplateRenderer::from_dir(&args.templates)
        .map_err(|e: RenderError| CliError::Build(e.into()))
        .with_context(|| format!("reading templates from {}", args.templates.display()))?;

    let report = build(&args.database, &args.output, &config, &renderer)
        .map_err(CliError::from)
        .with_context(|| format!("building into {}", args.output.display()))?;

    println!("rendered {} question pages", report.rendered.len());
    if report.skipped > 0 {
        println!("skipped {} questions (page cap)", report.skipped);
    }
    Ok(())
}
