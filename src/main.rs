use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::Config;
use core_types::{SortColumn, SortOrder};
use database::{connect, run_migrations, DbRepository};
use std::path::PathBuf;

/// The main entry point for the student registry.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; settings may come from config.toml or the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => {
            if let Some(port) = args.port {
                config.server.port = port;
            }
            web_server::run_server(&config).await?;
        }
        Commands::Migrate => handle_migrate(&config).await?,
        Commands::List(args) => handle_list(&config, args).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small web application for managing student records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
    /// Print all students as a table.
    List(ListArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.port` from the configuration.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ListArgs {
    /// Column to sort by: id, nim, nama, nilai.
    #[arg(long, default_value = "id")]
    sort_by: String,

    /// Sort direction: asc or desc.
    #[arg(long, default_value = "asc")]
    order: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    run_migrations(&pool).await?;
    println!("Migrations applied to '{}'.", config.database.dbname);
    Ok(())
}

async fn handle_list(config: &Config, args: ListArgs) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    let db_repo = DbRepository::new(pool);

    let sort = SortColumn::parse_or_default(&args.sort_by);
    let order = SortOrder::parse_or_default(&args.order);
    let students = db_repo.list_students(sort, order).await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "NIM", "Name", "GPA"]);
    for student in &students {
        table.add_row(vec![
            student.id.to_string(),
            student.nim.clone(),
            student.name.clone(),
            format!("{:.2}", student.score),
        ]);
    }

    println!("{table}");
    println!("{} student(s)", students.len());
    Ok(())
}
