use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kissmetrics_tag::context::Context;
use kissmetrics_tag::settings::Settings;
use kissmetrics_tag::{errors::Result, Library, Node};
use tracing_subscriber::EnvFilter;

/// Render the KISSmetrics tracking snippet for a settings file and a context.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Settings document (JSON, Django-style names such as KISS_METRICS_API_KEY)
    settings: PathBuf,
    /// Template context document (JSON); empty context when omitted
    #[arg(long)]
    context: Option<PathBuf>,
    /// Tag token to compile (optional)
    #[arg(long, default_value = "{% kiss_metrics %}")]
    tag: String,
    /// Force tracking off, as METRICS_DISABLED would
    #[arg(long)]
    disabled: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("KISSMETRICS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    match run(&args) {
        Ok(html) => {
            println!("{html}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let mut settings = Settings::from_path(&args.settings)?;
    if args.disabled {
        settings.metrics_disabled = Some(true);
    }
    let context: Context = match &args.context {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Context::default(),
    };
    let node = Library::with_builtins().compile(&args.tag, &settings)?;
    node.render(&context)
}
