//! CLI administration tool for shortlink.
//!
//! Provides commands for inspecting links, running expiry sweeps, and
//! checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Store-wide statistics
//! cargo run --bin admin -- stats
//!
//! # One link
//! cargo run --bin admin -- show promo
//!
//! # Remove expired links now
//! cargo run --bin admin -- sweep --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL`
//! is used to invalidate cached entries during sweeps.

use shortlink::application::services::ExpirySweeper;
use shortlink::config::{Config, StorageBackend};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;
use shortlink::server;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show store-wide statistics
    Stats,

    /// Show one short link
    Show {
        /// Short code to look up
        code: String,
    },

    /// Delete every expired link now
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin works on the postgres backend only, STORAGE_BACKEND is 'memory'");
    }

    let pool = server::connect_database(&config).await?;
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Stats => handle_stats(repo.as_ref()).await?,
        Commands::Show { code } => handle_show(repo.as_ref(), &config, &code).await?,
        Commands::Sweep { yes } => handle_sweep(repo, &config, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Displays link and click totals.
async fn handle_stats(repo: &PgLinkRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = repo
        .summary(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Links:         {}",
        summary.total_links.to_string().bright_green().bold()
    );
    println!(
        "  Active links:  {}",
        summary.active_links.to_string().bright_green().bold()
    );
    println!(
        "  Expired:       {}",
        (summary.total_links - summary.active_links)
            .to_string()
            .yellow()
    );
    println!(
        "  Clicks:        {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Prints one stored link, expired or not.
async fn handle_show(repo: &PgLinkRepository, config: &Config, code: &str) -> Result<()> {
    let link = repo
        .get(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Short code '{code}' not found"))?;

    let short_url = format!("{}/{}", config.base_url.trim_end_matches('/'), link.code);
    let status = if link.is_expired() {
        "expired".red()
    } else {
        "active".green()
    };

    println!("{}", "🔗 Short link".bright_blue().bold());
    println!();
    println!("  Code:      {}", link.code.cyan());
    println!("  Short URL: {}", short_url.bright_white());
    println!("  Target:    {}", link.target_url);
    println!("  Created:   {}", link.created_at.to_rfc3339().bright_black());
    match link.expires_at {
        Some(at) => println!("  Expires:   {}", at.to_rfc3339()),
        None => println!("  Expires:   {}", "never".bright_black()),
    }
    println!("  Custom:    {}", if link.is_custom { "yes" } else { "no" });
    println!(
        "  Clicks:    {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!("  Status:    {}", status);
    println!();

    Ok(())
}

/// Runs one expiry sweep after confirmation.
async fn handle_sweep(repo: Arc<PgLinkRepository>, config: &Config, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Expiry sweep".bright_blue().bold());
    println!();

    let now = Utc::now();
    let pending = repo
        .list_expired(now)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if pending.is_empty() {
        println!("{}", "Nothing to do, no expired links".green());
        return Ok(());
    }

    println!("  Expired links: {}", pending.len().to_string().yellow().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete them now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let cache = server::build_cache(config).await;
    let sweeper = ExpirySweeper::new(repo, cache, config.sweep_interval());
    let report = sweeper
        .sweep_once(now)
        .await
        .map_err(|e| anyhow::anyhow!("Sweep failed: {}", e))?;

    println!();
    println!(
        "{} {} deleted, {} failed",
        "✅ Sweep finished:".green().bold(),
        report.deleted.to_string().bright_green(),
        report.failed.to_string().red()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
