use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use moorea_schedules::config::Config;
use moorea_schedules::logging;
use moorea_schedules::pipeline::Pipeline;
use moorea_schedules::render;
use moorea_schedules::week::fetch_weeks;

#[derive(Parser)]
#[command(name = "moorea_schedules")]
#[command(about = "Tahiti-Moorea ferry schedule fetcher")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch schedules from all configured companies and write horaires.json
    Fetch {
        /// Path to the companies configuration file
        #[arg(long, default_value = "companies.json")]
        config: PathBuf,
        /// Directory receiving horaires.json and the data/ snapshots
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Render index.html from a previously written horaires.json
    Render {
        /// Directory holding horaires.json; index.html is written next to it
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Fetch then render in one pass
    Run {
        /// Path to the companies configuration file
        #[arg(long, default_value = "companies.json")]
        config: PathBuf,
        /// Directory receiving all output artifacts
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

async fn fetch(config_path: &Path, output_dir: &Path) -> moorea_schedules::error::Result<usize> {
    println!("📋 Chargement de la configuration des compagnies...");
    let config = Config::load(config_path)?;

    let today = Local::now().date_naive();
    let summary = Pipeline::fetch_all(&config, output_dir, today).await?;

    if !summary.errors.is_empty() {
        println!("\n⚠️  {} erreur(s) rencontrée(s):", summary.errors.len());
        for error in &summary.errors {
            println!("   - {error}");
        }
    }
    Ok(summary.departures)
}

fn render_page(output_dir: &Path) -> moorea_schedules::error::Result<()> {
    let departures = Pipeline::load_unified(output_dir)?;
    let now = Local::now().naive_local();
    let [(current_week, year), (next_week, _)] = fetch_weeks(now.date());
    render::write_schedule_page(&departures, output_dir, current_week, next_week, year, now)?;
    println!("✅ Page HTML multi-compagnies générée: index.html");
    Ok(())
}

/// Total failure: write the error page instead of the schedule and signal
/// the scheduler through the exit code.
fn fail(message: &str, output_dir: &Path) -> ExitCode {
    error!("Run failed: {}", message);
    println!("❌ Erreur générale: {message}");
    let now = Local::now().naive_local();
    if let Err(e) = render::write_error_page(message, output_dir, now) {
        error!("Could not write error page: {}", e);
    } else {
        println!("⚠️  Page HTML d'erreur générée: index.html");
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { config, output_dir } => match fetch(&config, &output_dir).await {
            Ok(count) => {
                info!("Fetch finished with {} departures", count);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e.to_string(), &output_dir),
        },
        Commands::Render { output_dir } => match render_page(&output_dir) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&e.to_string(), &output_dir),
        },
        Commands::Run { config, output_dir } => {
            let departures = match fetch(&config, &output_dir).await {
                Ok(count) => count,
                Err(e) => return fail(&e.to_string(), &output_dir),
            };
            if departures == 0 {
                return fail(
                    "Aucune compagnie n'a fourni de données pour ces semaines",
                    &output_dir,
                );
            }
            match render_page(&output_dir) {
                Ok(()) => {
                    println!("\n✅ Processus terminé avec succès!");
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e.to_string(), &output_dir),
            }
        }
    }
}
