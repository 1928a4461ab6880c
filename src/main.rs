//! frame2html CLI
//!
//! Usage:
//!   frame2html [OPTIONS] [FILE]
//!   frame2html --mobile m.json --desktop d.json
//!
//! Options:
//!   -c, --config <FILE>   Pipeline configuration (TOML format)
//!   --raw                 Skip the contract passes
//!   --mobile <FILE>       Mobile export (responsive mode)
//!   --tablet <FILE>       Tablet export (responsive mode)
//!   --desktop <FILE>      Desktop export (responsive mode)
//!   --decide              Print the responsive strategy decision as JSON
//!   -d, --debug           Emit data-name debug attributes
//!   -v, --verbose         Log pipeline decisions to stderr
//!   -h, --help            Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use frame2html::{
    compile_with_config, parse_export, reconcile, render_raw, CompileError, PipelineConfig,
    ReconcileError, ResponsiveFragments, Viewport,
};

#[derive(Parser)]
#[command(name = "frame2html")]
#[command(about = "Compile design tree exports into utility-class HTML")]
struct Cli {
    /// Input export (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Pipeline configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the inferred markup without running the contract passes
    #[arg(long)]
    raw: bool,

    /// Mobile export for responsive reconciliation
    #[arg(long)]
    mobile: Option<PathBuf>,

    /// Tablet export for responsive reconciliation
    #[arg(long)]
    tablet: Option<PathBuf>,

    /// Desktop export for responsive reconciliation
    #[arg(long)]
    desktop: Option<PathBuf>,

    /// Print the responsive strategy decision as JSON instead of markup
    #[arg(long)]
    decide: bool,

    /// Emit data-name debug attributes
    #[arg(short, long)]
    debug: bool,

    /// Log pipeline decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path.display(), e)))
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buffer) {
        fail(format!("reading from stdin: {}", e));
    }
    buffer
}

fn compile_source(source: &str, config: &PipelineConfig, raw: bool) -> Result<String, CompileError> {
    let export = parse_export(source)?;
    if raw {
        render_raw(&export, config)
    } else {
        compile_with_config(&export, config)
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("frame2html=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .unwrap_or_else(|e| fail(format!("loading config '{}': {}", path.display(), e))),
        None => PipelineConfig::default(),
    };
    if cli.debug {
        config.inference.debug_attributes = true;
    }

    let frames = [
        (Viewport::Mobile, &cli.mobile),
        (Viewport::Tablet, &cli.tablet),
        (Viewport::Desktop, &cli.desktop),
    ];
    let responsive = frames.iter().any(|(_, path)| path.is_some());

    if !responsive {
        if cli.decide {
            fail("--decide needs at least one of --mobile, --tablet, --desktop");
        }
        let source = match &cli.input {
            Some(path) => read_file(path),
            None => read_stdin(),
        };
        match compile_source(&source, &config, cli.raw) {
            Ok(html) => println!("{}", html),
            Err(e) => fail(e),
        }
        return;
    }

    let mut fragments = ResponsiveFragments::new();
    for (viewport, path) in frames {
        let Some(path) = path else { continue };
        let html = compile_source(&read_file(path), &config, cli.raw)
            .unwrap_or_else(|e| fail(format!("{} export: {}", viewport, e)));
        fragments = match viewport {
            Viewport::Mobile => fragments.with_mobile(html),
            Viewport::Tablet => fragments.with_tablet(html),
            Viewport::Desktop => fragments.with_desktop(html),
        };
    }

    let (reconciled, decision) = match reconcile(&fragments, &config.responsive) {
        Ok(result) => result,
        Err(ReconcileError::Markup { viewport, source }) => {
            let html = fragments.get(viewport).unwrap_or_default();
            eprint!("{}", source.format(html, &format!("{}.html", viewport)));
            std::process::exit(1);
        }
    };
    if cli.decide {
        match serde_json::to_string_pretty(&decision) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
    } else {
        println!("{}", reconciled.to_html());
    }
}
