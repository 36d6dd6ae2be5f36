use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use weatherdash::{
    DashboardService, JsonRenderer, RenderTarget, Session, TerminalRenderer, WeatherDashConfig,
    logging, web,
};

#[derive(Parser, Debug)]
#[command(
    name = "weatherdash",
    version,
    about = "Weather dashboard: current conditions, forecast, air quality and climate news"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full dashboard for a city (default city when omitted)
    Search {
        city: Option<String>,
        /// Print the bundle as JSON
        #[arg(long)]
        json: bool,
        /// Skip UV, visibility, alerts and sun times
        #[arg(long)]
        basic: bool,
        /// Also print the shareable summary
        #[arg(long)]
        share: bool,
    },
    /// Current temperature via Open-Meteo, no API key needed
    Quick {
        city: String,
        #[arg(long)]
        json: bool,
    },
    /// Current temperatures for several cities
    Compare {
        /// Cities to compare; the configured list when omitted
        cities: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Serve the JSON API
    Serve {
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

fn renderer(json: bool, service: &DashboardService) -> Box<dyn RenderTarget> {
    if json {
        Box::new(JsonRenderer::new(io::stdout()))
    } else {
        Box::new(
            TerminalRenderer::new(io::stdout())
                .with_timezone(service.timezone())
                .with_forecast_window(service.settings().forecast_window),
        )
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config =
        WeatherDashConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Search {
            city,
            json,
            basic,
            share,
        } => {
            if basic {
                config.dashboard.enhanced = false;
            }
            let service = DashboardService::from_config(&config)?;
            let mut target = renderer(json, &service);
            let mut session = Session::new();

            match session.search(&service, city.as_deref().unwrap_or_default()).await {
                Ok(bundle) => target.render(bundle)?,
                Err(e) => {
                    target.render_error(&e)?;
                    return Ok(ExitCode::FAILURE);
                }
            }
            if share {
                if let Some(text) = session.share_text() {
                    println!("\n{text}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Quick { city, json } => {
            let service = DashboardService::from_config(&config)?;
            let mut target = renderer(json, &service);
            match service.quick_lookup(&city).await {
                Ok(conditions) => {
                    target.render_quick(&conditions)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    target.render_error(&e)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Compare { cities, json } => {
            if config.openweather.api_key.is_none() {
                bail!(
                    "OpenWeatherMap API key is missing. Set openweather.api_key or WEATHERDASH_OPENWEATHER__API_KEY"
                );
            }
            let service = DashboardService::from_config(&config)?;
            let rows = service.compare(&cities).await;
            renderer(json, &service).render_comparison(&rows)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { port } => {
            let service = DashboardService::from_config(&config)?;
            info!("Starting WeatherDash API v{}", weatherdash::VERSION);
            web::run(service, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
