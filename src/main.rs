//! Folio CLI - serve, seed and inspect a portfolio database

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio::config::{self, FolioConfig, Settings};
use folio::query::QueryEngine;
use folio::seed::{self, SeedDocument};
use folio::storage::PortfolioStore;
use folio::ui::{self, Icons};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Personal portfolio content API backed by SQLite")]
#[command(long_about = r#"
Folio stores a profile with its skills, projects and work history, and serves
them as a JSON API with project filtering, skill usage ranking and search.

Example usage:
  folio init
  folio seed --file seed.toml
  folio serve --port 3001
  folio search --query "blog"
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Replace the database contents with a TOML seed document
    Seed {
        /// Seed document
        #[arg(short, long)]
        file: PathBuf,

        /// Path to the database file (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a folio.toml with every default spelled out
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show row counts for every table
    Stats {
        /// Path to the database file (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Rank skills by how many projects use them
    TopSkills {
        /// Path to the database file (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search projects, skills and work history
    Search {
        /// Search query
        #[arg(short, long)]
        query: String,

        /// Path to the database file (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool, settings: &Settings) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn open_store(settings: &Settings, database: Option<PathBuf>) -> anyhow::Result<PortfolioStore> {
    let path = database.unwrap_or_else(|| settings.database_path.clone());
    config::ensure_db_dir(&path)?;
    tracing::debug!("Opening database {}", path.display());
    Ok(PortfolioStore::open(&path)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = config::load_config(cli.config.as_deref())?;
    let mut settings = Settings::from_env(file_config.as_ref())?;

    init_logging(cli.verbose, &settings);

    match cli.command {
        Commands::Serve { port, database } => {
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(database) = database {
                settings.database_path = database;
            }

            ui::header(&format!("Folio API on port {}", settings.port));
            folio::server::start_server(settings).await?;
        }

        Commands::Seed { file, database } => {
            let doc = SeedDocument::load(&file)?;
            let mut store = open_store(&settings, database)?;

            ui::header(&format!("Seeding from {}", file.display()));
            let summary = seed::seed(&mut store, &doc)?;

            ui::success(&format!("Created profile: {}", doc.profile.name));
            ui::summary_row("Skills:", &summary.skills.to_string());
            ui::summary_row("Projects:", &summary.projects.to_string());
            ui::summary_row("Work entries:", &summary.work.to_string());
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &FolioConfig::with_defaults(), force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }

        Commands::Stats { database } => {
            let store = open_store(&settings, database)?;
            let stats = store.stats()?;

            ui::section(Icons::STATS, "Folio Statistics");
            println!("{}", ui::stats_table(&stats));
        }

        Commands::TopSkills { database, json } => {
            let store = open_store(&settings, database)?;
            let top = QueryEngine::new(&store).top_skills()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&top)?);
            } else if top.is_empty() {
                ui::warn("No project lists any skills.");
            } else {
                ui::section(Icons::STAR, "Top Skills");
                println!("{}", ui::top_skills_table(&top));
            }
        }

        Commands::Search { query, database, json } => {
            let store = open_store(&settings, database)?;
            let results = QueryEngine::new(&store).search(Some(&query))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                ui::warn(&format!("Nothing matches '{}'.", query));
            } else {
                println!("{} Results for '{}'", Icons::SEARCH, query);

                if !results.projects.is_empty() {
                    ui::section(Icons::FOLDER, "Projects");
                    for project in &results.projects {
                        ui::info(&project.title, &project.skills_used.join(", "));
                    }
                }
                if !results.skills.is_empty() {
                    ui::section(Icons::STAR, "Skills");
                    for skill in &results.skills {
                        ui::info(&skill.name, skill.proficiency.as_deref().unwrap_or("-"));
                    }
                }
                if !results.work.is_empty() {
                    ui::section(Icons::BRIEFCASE, "Work");
                    for work in &results.work {
                        ui::info(&work.company, &work.role);
                    }
                }
            }
        }
    }

    Ok(())
}
