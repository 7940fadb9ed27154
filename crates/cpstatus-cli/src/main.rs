#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Context;
use clap::Parser;
use cpstatus_core::{InboundEvent, RelayConfig, StatusUpdate};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "cpstatus",
    version,
    about = "Report CodePipeline execution status to GitHub"
)]
struct Cli {
    /// Log format: text or json
    #[arg(long, env = "CPSTATUS_LOG_FORMAT", default_value = "text", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Look up an execution and post its commit status
    Relay(RelayArgs),
    /// Resolve a revision URL to owner/repo
    Resolve(ResolveArgs),
}

#[derive(clap::Args)]
struct RelayArgs {
    /// Trigger event JSON file (default: stdin)
    #[arg(long)]
    event: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, env = "CPSTATUS_OUTPUT_FORMAT", default_value = "text")]
    output: String,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Revision URL as reported by CodePipeline
    url: String,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Console region used for deep links and connection redirects
    #[arg(long, env = "CPSTATUS_CONSOLE_REGION", default_value = cpstatus_core::config::DEFAULT_REGION)]
    region: String,

    /// Console domain
    #[arg(long, env = "CPSTATUS_CONSOLE_DOMAIN", default_value = "aws.amazon.com")]
    console_domain: String,

    /// Source repository web host
    #[arg(long, env = "CPSTATUS_SOURCE_HOST", default_value = "github.com")]
    source_host: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = cpstatus_core::config::DEFAULT_API_URL)]
    api_url: String,

    /// Status check context
    #[arg(long, env = "CPSTATUS_CONTEXT", default_value = cpstatus_core::config::DEFAULT_CONTEXT)]
    context: String,

    /// Status description
    #[arg(long, env = "CPSTATUS_DESCRIPTION")]
    description: Option<String>,
}

impl ConfigArgs {
    fn into_config(self) -> anyhow::Result<RelayConfig> {
        let config = RelayConfig {
            region: self.region,
            console_domain: self.console_domain,
            source_host: self.source_host,
            api_url: self.api_url,
            context: self.context,
            // Unset env inputs may arrive as empty strings
            description: self.description.filter(|d| !d.is_empty()),
        };
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("Warning: failed to install log subscriber: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_format);
    let code = match cli.command {
        Commands::Relay(args) => run_relay(args),
        Commands::Resolve(args) => run_resolve(args),
    };
    std::process::exit(code);
}

fn read_event(path: Option<&Path>) -> anyhow::Result<InboundEvent> {
    let bytes = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading event {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading event from stdin")?;
            buf
        }
    };
    Ok(InboundEvent::from_json(&bytes)?)
}

fn run_relay(args: RelayArgs) -> i32 {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let rt = match rt {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {e}");
            return 1;
        }
    };

    let result = (|| -> anyhow::Result<StatusUpdate> {
        let config = args.config.into_config()?;
        let event = read_event(args.event.as_deref())?;
        Ok(rt.block_on(cpstatus_core::relay(&event, config))?)
    })();

    let update = match result {
        Ok(update) => update,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "relay failed");
            return 1;
        }
    };

    if let Err(e) = write_update(&mut std::io::stdout().lock(), &update, args.output == "json") {
        tracing::error!(error = %e, "failed to write result");
        return 1;
    }
    0
}

fn write_update(w: &mut impl Write, update: &StatusUpdate, json: bool) -> std::io::Result<()> {
    if json {
        serde_json::to_writer(&mut *w, update).map_err(std::io::Error::from)?;
        writeln!(w)?;
    } else {
        writeln!(
            w,
            "{} {} -> {}",
            update.repository, update.commit, update.report.state
        )?;
    }
    w.flush()
}

fn run_resolve(args: ResolveArgs) -> i32 {
    let hosts = match args.config.into_config() {
        Ok(config) => config.locator_hosts(),
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return 1;
        }
    };

    let repo = match cpstatus_core::resolve_str(&args.url, &hosts) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!(url = %args.url, error = %e, "cannot resolve repository");
            return 1;
        }
    };

    let mut w = std::io::stdout().lock();
    if let Err(e) = writeln!(w, "{repo}").and_then(|()| w.flush()) {
        tracing::error!(error = %e, "failed to write result");
        return 1;
    }
    0
}
