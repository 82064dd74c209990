use clap::{Parser, Subcommand};
use products_api::{
    config::AppConfig,
    db::{establish_connection_with_config, DbConfig},
    migrator::Migrator,
};
use sea_orm::DbErr;
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// Manage the products database schema
#[derive(Debug, Parser)]
#[command(name = "migration", version, about)]
struct Cli {
    /// Database URL; falls back to DATABASE_URL, then the built-in default
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations (default)
    Up {
        /// Number of migrations to apply
        #[arg(short = 'n', long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table and re-apply all migrations
    Fresh,
    /// List applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| AppConfig::default().database_url);

    info!("Connecting to database: {}", database_url);

    let db = establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 1,
        ..Default::default()
    })
    .await?;

    match cli.command.unwrap_or(Command::Up { steps: None }) {
        Command::Up { steps } => {
            Migrator::up(&db, steps).await?;
            info!("Migration completed successfully");
        }
        Command::Down { steps } => {
            Migrator::down(&db, Some(steps)).await?;
            info!("Rolled back {} migration(s)", steps);
        }
        Command::Fresh => {
            Migrator::fresh(&db).await?;
            info!("Schema recreated");
        }
        Command::Status => {
            for migration in Migrator::get_applied_migrations(&db).await? {
                println!("applied  {}", migration.name());
            }
            for migration in Migrator::get_pending_migrations(&db).await? {
                println!("pending  {}", migration.name());
            }
        }
    }

    Ok(())
}
