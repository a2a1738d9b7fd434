//! Admin CLI for the 3125 Media backend.
//!
//! Spot checks against the hosted database: the kind operators run after
//! imports or cleanup passes to confirm the content looks sane.

use std::collections::HashMap;

use chrono::Utc;
use clap::{Parser, Subcommand};
use media_core::db::Db;
use media_core::ranking::{RankingPeriod, RANKING_LIMIT};
use media_core::{categories, usage, CoreConfig};

#[derive(Parser)]
#[command(name = "media")]
#[command(about = "3125 Media admin checks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the latest published articles with engagement counts
    Articles,
    /// Check the category tree and report duplicate slugs
    Categories,
    /// Show the article ranking for a period
    Ranking {
        /// daily, weekly or monthly
        period: String,
    },
    /// Summarise AI usage and estimated cost
    Usage,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = CoreConfig::from_env()?;
    let db = Db::new(&cfg);

    match cli.command {
        Some(Commands::Articles) => {
            let articles = db.latest_articles(20).await?;
            if articles.is_empty() {
                println!("No published articles found.");
            }
            for joined in &articles {
                let counts = db
                    .engagement_counts(joined.article.id)
                    .await
                    .unwrap_or_default();
                println!(
                    "{} | {} | {} views | {} likes | {} comments",
                    joined.article.slug,
                    joined.article.title,
                    joined.article.views.unwrap_or(0),
                    counts.likes,
                    counts.comments
                );
            }
        }
        Some(Commands::Categories) => {
            let rows = db.categories_ordered().await?;
            println!("{} categories", rows.len());

            let mut by_slug: HashMap<&str, u32> = HashMap::new();
            for row in &rows {
                *by_slug.entry(row.slug.as_str()).or_default() += 1;
            }
            let mut duplicates: Vec<(&str, u32)> =
                by_slug.into_iter().filter(|(_, n)| *n > 1).collect();
            duplicates.sort();
            for (slug, n) in &duplicates {
                println!("duplicate slug: {} ({} rows)", slug, n);
            }
            if duplicates.is_empty() {
                println!("No duplicate slugs.");
            }

            let linkable = categories::ascii_roots(&rows, usize::MAX).len();
            let tree = categories::build_tree(rows);
            println!("{} roots ({} linkable from the home page)", tree.len(), linkable);
            for node in &tree {
                println!("  {} ({} children)", node.category.slug, node.children.len());
            }
        }
        Some(Commands::Ranking { period }) => {
            let period: RankingPeriod = period.parse()?;
            let articles = db
                .popular_articles(period, Utc::now(), RANKING_LIMIT)
                .await?;
            println!("{} ranking:", period);
            for (index, joined) in articles.iter().enumerate() {
                println!(
                    "{:>2}. {} | {} views",
                    index + 1,
                    joined.article.title,
                    joined.article.views.unwrap_or(0)
                );
            }
        }
        Some(Commands::Usage) => {
            let rows = db.all_ai_usage().await?;
            let stats = usage::summarize(&rows, Utc::now());
            println!("Requests: {}", stats.total_requests);
            println!("Tokens:   {}", stats.total_tokens);
            println!("Cost:     ${:.4}", stats.total_cost);
            println!("Today:    ${:.4}", stats.today_cost);
            println!("Month:    ${:.4}", stats.month_cost);
        }
        None => {
            println!("No command given. Try `media --help`.");
        }
    }

    Ok(())
}
