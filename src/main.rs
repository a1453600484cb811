//! Layout View CLI
//!
//! Usage:
//!   layout-view [OPTIONS] <VIEW>
//!
//! Options:
//!   -c, --config <FILE>      View configuration (TOML format)
//!   -t, --templates <DIR>    Template directory
//!   -l, --layout <NAME>      Default layout template
//!   -s, --set <KEY=VALUE>    Set a context variable
//!   --check                  Only check that the templates resolve
//!   -h, --help               Print help

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use layout_view::{EngineError, LayoutRenderer, RenderContext, ViewConfig};

#[derive(Parser)]
#[command(name = "layout-view")]
#[command(about = "Render a content template wrapped in its layout")]
struct Cli {
    /// Content template to render
    view: String,

    /// View configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (defaults to the current directory)
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Default layout template
    #[arg(short, long, conflicts_with = "no_layout")]
    layout: Option<String>,

    /// Do not apply a default layout
    #[arg(long)]
    no_layout: bool,

    /// JSON file with initial context variables
    #[arg(long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// Set a context variable (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Only check that the content and default layout templates resolve
    #[arg(long)]
    check: bool,

    /// Fail on undefined references
    #[arg(long)]
    strict: bool,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => match ViewConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => ViewConfig::default(),
    };
    if let Some(dir) = cli.templates {
        config.templates.dir = Some(dir);
    }
    if config.templates.dir.is_none() {
        config.templates.dir = Some(PathBuf::from("."));
    }
    if let Some(layout) = cli.layout {
        config.layout.default = Some(layout);
    }
    if cli.no_layout {
        config.layout.default = None;
    }
    if cli.strict {
        config.templates.strict = true;
    }

    let renderer = LayoutRenderer::with_config(config.registry(), config.renderer_config());

    if cli.check {
        match renderer.validate(&cli.view) {
            Ok(()) => return,
            Err(e) => fail(&e),
        }
    }

    // Build context
    let mut context = match &cli.context {
        Some(path) => match load_context(path) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("Error loading context '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => RenderContext::new(),
    };
    for (key, value) in cli.set {
        context.insert(key, value);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = renderer.render(&cli.view, &mut context, &mut out) {
        let _ = out.flush();
        fail(&e);
    }
    if let Err(e) = out.flush() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_context(path: &Path) -> Result<RenderContext, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(RenderContext::from_json(value)?)
}

/// Print an error, with source reports for syntax errors, and exit
fn fail(err: &(dyn Error + 'static)) -> ! {
    eprintln!("Error: {}", err);
    let mut cause = err.source();
    while let Some(e) = cause {
        if let Some(EngineError::Syntax(syntax)) = e.downcast_ref::<EngineError>() {
            eprintln!("{}", syntax.report());
        }
        cause = e.source();
    }
    process::exit(1);
}
