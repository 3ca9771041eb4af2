use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snip::config::Config;
use snip::shortener::{short_url, Shortener, ShortenerError};
use snip::storage;

#[derive(Parser)]
#[command(name = "snip-admin")]
#[command(about = "snip maintenance CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Shorten a URL and print the short URL
    Shorten {
        /// Long URL to shorten
        url: String,
    },
    /// Print the long URL behind a short ID
    Resolve {
        /// Short ID to look up
        short_id: String,
    },
    /// List stored URLs
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Print the number of stored URLs
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let storage = storage::connect(&config.database)
        .await
        .context("failed to open storage")?;

    // Ensure database is initialized
    storage.init().await.context("failed to create schema")?;

    match cli.command {
        Commands::Init => {
            println!("✓ Initialized the database.");
        }
        Commands::Shorten { url } => {
            let shortener = Shortener::new(
                storage,
                config.short_id.length,
                config.short_id.max_attempts,
            );
            let shortened = shortener.shorten(&url).await?;
            let verb = if shortened.created { "Created" } else { "Existing" };
            println!(
                "✓ {}: {}",
                verb,
                short_url(&config.base_url, &shortened.record.short_id)
            );
        }
        Commands::Resolve { short_id } => {
            let shortener = Shortener::new(
                storage,
                config.short_id.length,
                config.short_id.max_attempts,
            );
            match shortener.resolve(&short_id).await {
                Ok(long_url) => println!("{}", long_url),
                Err(ShortenerError::NotFound(_)) => {
                    eprintln!("⚠ Short id '{}' not found", short_id);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::List { limit, offset } => {
            let urls = storage.list(limit, offset).await?;
            if urls.is_empty() {
                println!("No URLs found.");
            } else {
                println!("{:<8} {:<12} {}", "ID", "Short ID", "Long URL");
                println!("{}", "-".repeat(80));
                for url in urls {
                    println!("{:<8} {:<12} {}", url.id, url.short_id, url.long_url);
                }
            }
        }
        Commands::Stats => {
            let count = storage.count().await?;
            println!("{} URLs stored", count);
        }
    }

    Ok(())
}
