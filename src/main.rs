use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use inner_voice::api::ApiServerBuilder;
use inner_voice::client::{GatewayApi, GatewayReply, HttpGateway, console};
use inner_voice::persona::DEFAULT_PERSONA;
use inner_voice::{Config, GeminiClient, InnerVoice};

/// Inner Voice - speak a thought, hear it answered by a persona
#[derive(Parser)]
#[command(name = "inner-voice", version, about)]
struct Cli {
    /// Port to listen on (overrides PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the browser client
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gateway (default)
    Serve,
    /// Send one thought to a running gateway and print the answer
    Ask {
        /// Persona to answer as
        #[arg(short, long, default_value = DEFAULT_PERSONA)]
        persona: String,
        /// Gateway base URL
        #[arg(long, env = "INNER_VOICE_URL", default_value = "http://localhost:3000")]
        url: String,
        /// The thought
        text: String,
    },
    /// Talk to a running gateway from the terminal, one line per thought
    Chat {
        /// Persona to answer as
        #[arg(short, long, default_value = DEFAULT_PERSONA)]
        persona: String,
        /// Gateway base URL
        #[arg(long, env = "INNER_VOICE_URL", default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,inner_voice=info",
        1 => "info,inner_voice=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None | Some(Command::Serve) => serve(cli.port, cli.static_dir).await,
        Some(Command::Ask { persona, url, text }) => ask(&url, &persona, &text).await,
        Some(Command::Chat { persona, url }) => {
            console::run_chat(HttpGateway::new(&url), persona).await?;
            Ok(())
        }
    }
}

async fn serve(port: Option<u16>, static_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = static_dir {
        config.server.static_dir = dir;
    }

    tracing::info!(
        port = config.server.port,
        model = %config.generation.model,
        temperature = config.generation.temperature,
        "starting Inner Voice gateway"
    );

    let settings = config.gateway_settings();
    let generator = GeminiClient::with_base_url(config.api_key, config.generation.base_url)?;
    let service = InnerVoice::new(Arc::new(generator), settings);

    let static_dir = config.server.static_dir;
    let static_dir = if static_dir.is_dir() {
        Some(static_dir)
    } else {
        tracing::warn!(path = %static_dir.display(), "static directory not found, browser client disabled");
        None
    };

    ApiServerBuilder::new(service, config.server.port)
        .static_dir(static_dir)
        .build()
        .run()
        .await?;

    Ok(())
}

async fn ask(url: &str, persona: &str, text: &str) -> anyhow::Result<()> {
    match HttpGateway::new(url).process_text(text, persona).await? {
        GatewayReply::Answer(answer) => {
            println!("{answer}");
            Ok(())
        }
        GatewayReply::Rejected {
            status,
            error,
            details,
        } => {
            let details = details.map(|d| format!(" ({d})")).unwrap_or_default();
            anyhow::bail!("gateway returned {status}: {error}{details}")
        }
    }
}
