//! CLI administration tool for tag-stats.
//!
//! Provides commands for managing API tokens, inspecting and maintaining
//! tags, and performing database checks without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an unrestricted API token
//! cargo run --bin admin -- token create --name "Production API"
//!
//! # Create a token limited to one domain, or to its own short URLs
//! cargo run --bin admin -- token create --name "Blog" --domain 3
//! cargo run --bin admin -- token create --name "Mobile App" --authored
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Production API"
//!
//! # Inspect tags
//! cargo run --bin admin -- tag list --stats --search foo --desc
//!
//! # Check a tag under a domain scope
//! cargo run --bin admin -- tag exists foo --domain 3
//!
//! # Maintain tags
//! cargo run --bin admin -- tag rename foo bar
//! cargo run --bin admin -- tag delete foo bar -y
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use tag_stats::application::services::TagService;
use tag_stats::domain::entities::AccessScope;
use tag_stats::domain::repositories::{
    OrderDirection, TagsListFilter, TokenRepository, TokenRole,
};
use tag_stats::infrastructure::persistence::{PgTagRepository, PgTokenRepository};
use tag_stats::utils::token::{generate_token, hash_token};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tag-stats.
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
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect and maintain tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Production API", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Restrict the token to short URLs of this domain id
        #[arg(long, conflicts_with = "authored")]
        domain: Option<i64>,

        /// Restrict the token to short URLs it created itself
        #[arg(long)]
        authored: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Tag subcommands. Only `exists` can be scoped; everything else runs unrestricted.
#[derive(Subcommand)]
enum TagAction {
    /// List tags
    List {
        /// Include short URL and visit counts
        #[arg(short, long)]
        stats: bool,

        /// Case-insensitive substring filter
        #[arg(long)]
        search: Option<String>,

        /// Sort names descending
        #[arg(long)]
        desc: bool,

        /// Page size, at least 1
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        limit: Option<i64>,

        /// Rows to skip, at least 0
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        offset: Option<i64>,
    },

    /// Check whether a tag is visible, optionally under a restricted scope
    Exists {
        name: String,

        /// Only count short URLs of this domain id
        #[arg(long, conflicts_with = "author")]
        domain: Option<i64>,

        /// Only count short URLs created by this API token id
        #[arg(long)]
        author: Option<i64>,
    },

    /// Delete tags by name
    Delete {
        #[arg(required = true)]
        names: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Rename a tag
    Rename { old_name: String, new_name: String },
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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Tag { action } => handle_tag_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            name,
            token,
            domain,
            authored,
            yes,
        } => {
            let role = match (domain, authored) {
                (Some(domain_id), _) => TokenRole::DomainSpecific(domain_id),
                (None, true) => TokenRole::AuthoredShortUrls,
                (None, false) => TokenRole::Admin,
            };
            create_token(repo, name, token, role, yes).await?;
        }
        TokenAction::List => {
            list_tokens(repo).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(repo, name_or_id).await?;
        }
    }

    Ok(())
}

fn describe_role(role: TokenRole) -> String {
    match role {
        TokenRole::Admin => "all".to_string(),
        TokenRole::DomainSpecific(domain_id) => format!("domain {domain_id}"),
        TokenRole::AuthoredShortUrls => "authored".to_string(),
    }
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC-SHA256 hash is stored, keyed by `TOKEN_SIGNING_SECRET`.
/// The raw token is displayed once and cannot be retrieved later.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    name: Option<String>,
    token: Option<String>,
    role: TokenRole,
    skip_confirm: bool,
) -> Result<()> {
    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to create tokens")?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token();
            println!("{}", "✨ Generated new token".green());
            generated
        }
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Scope: {}", describe_role(role).cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&secret, &token_value);

    repo.create_token(&token_name, &token_hash, role)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/tags?withStats=true",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with scope and status.
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<12} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Scope".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<5} {:<30} {:<12} {:<20} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            describe_role(token.role),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID with confirmation prompt.
///
/// Numeric input is looked up by ID, anything else by exact name.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .find_by_id(id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Dispatches tag commands through the same service the API uses.
async fn handle_tag_action(action: TagAction, pool: &PgPool) -> Result<()> {
    let service = TagService::new(Arc::new(PgTagRepository::new(Arc::new(pool.clone()))));

    match action {
        TagAction::List {
            stats,
            search,
            desc,
            limit,
            offset,
        } => {
            let order = if desc {
                OrderDirection::Desc
            } else {
                OrderDirection::Asc
            };
            let filter = TagsListFilter::new()
                .with_search_term(search)
                .with_order(order)
                .with_window(limit, offset);

            list_tags(&service, filter, stats).await?;
        }
        TagAction::Exists {
            name,
            domain,
            author,
        } => {
            let scope = match (domain, author) {
                (Some(domain_id), _) => AccessScope::Domain(domain_id),
                (None, Some(token_id)) => AccessScope::Author(token_id),
                (None, None) => AccessScope::Unrestricted,
            };

            let exists = service
                .tag_exists(&name, scope)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to check tag: {}", e))?;

            if exists {
                println!("{} {} ({})", "✅ Tag exists:".green().bold(), name.cyan(), scope);
            } else {
                println!("{} {} ({})", "❌ Tag not found:".red().bold(), name.cyan(), scope);
            }
        }
        TagAction::Delete { names, yes } => {
            delete_tags(&service, names, yes).await?;
        }
        TagAction::Rename { old_name, new_name } => {
            service
                .rename_tag(&old_name, &new_name, AccessScope::Unrestricted)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to rename tag: {}", e))?;

            println!(
                "{} {} → {}",
                "✅ Tag renamed:".green().bold(),
                old_name.cyan(),
                new_name.cyan()
            );
        }
    }

    Ok(())
}

/// Prints tags, optionally with their counts.
///
/// # Output Format
///
/// ```text
/// 🏷️  Tags
///
///   Tag                            Short URLs   Visits
///   ──────────────────────────────────────────────────
///   bar                            0            0
///   foo                            2            5
/// ```
async fn list_tags(
    service: &TagService<PgTagRepository>,
    filter: TagsListFilter,
    with_stats: bool,
) -> Result<()> {
    println!("{}", "🏷️  Tags".bright_blue().bold());
    println!();

    let (rows, total) = if with_stats {
        let page = service
            .tags_info(filter)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list tags: {}", e))?;
        let rows: Vec<_> = page
            .items
            .into_iter()
            .map(|s| (s.name, Some((s.short_urls_count, s.visits_count))))
            .collect();
        (rows, page.total)
    } else {
        let page = service
            .list_tags(filter)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list tags: {}", e))?;
        let rows: Vec<_> = page.items.into_iter().map(|t| (t.name, None)).collect();
        (rows, page.total)
    };

    if rows.is_empty() {
        println!("{}", "  No tags found".yellow());
        println!();
        return Ok(());
    }

    if with_stats {
        println!(
            "  {:<30} {:<12} {:<10}",
            "Tag".bright_white().bold(),
            "Short URLs".bright_white().bold(),
            "Visits".bright_white().bold()
        );
        println!("  {}", "─".repeat(50).bright_black());
    }

    for (name, counts) in &rows {
        match counts {
            Some((short_urls, visits)) => println!(
                "  {:<30} {:<12} {}",
                name.cyan(),
                short_urls.to_string().bright_green(),
                visits.to_string().bright_green()
            ),
            None => println!("  {}", name.cyan()),
        }
    }

    println!();
    println!(
        "  Showing {} of {}",
        rows.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes tags after confirmation. Short URLs keep existing.
async fn delete_tags(
    service: &TagService<PgTagRepository>,
    names: Vec<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Tags".bright_blue().bold());
    println!();
    println!("  Tags: {}", names.join(", ").cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these tags?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = service
        .delete_tags(&names, AccessScope::Unrestricted)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete tags: {}", e))?;

    println!(
        "{} {}",
        "✅ Deleted tags:".green().bold(),
        deleted.to_string().bright_white().bold()
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

            let (tags, short_urls, visits): (i64, i64, i64) = sqlx::query_as(
                "SELECT (SELECT COUNT(*) FROM tags), (SELECT COUNT(*) FROM short_urls), (SELECT COUNT(*) FROM visits)",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Tags:       {}", tags.to_string().bright_green().bold());
            println!("  Short URLs: {}", short_urls.to_string().bright_green().bold());
            println!("  Visits:     {}", visits.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
