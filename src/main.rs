use clap::Parser;
use finsent::cli::commands::{Cli, Commands};
use finsent::domain::entities::news_article::NewsArticle;
use finsent::domain::error::DomainError;
use finsent::FinSent;
use std::io::Read;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finsent=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let fs = match FinSent::new() {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("Error initializing finsent: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(fs, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(fs: FinSent, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Analyze {
            text,
            categories,
            important,
            context,
        } => {
            if text.trim().is_empty() {
                return Err(DomainError::InvalidInput("text must not be empty".into()).into());
            }
            let result = match context {
                Some(ctx) => fs.analyze_llm(&text, Some(&ctx)).await,
                None => {
                    fs.analyze(&text, Some(categories.as_slice()), Some(important))
                        .await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Batch { file, aggregate } => {
            let raw = if file.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&file)?
            };
            let articles: Vec<NewsArticle> = serde_json::from_str(&raw)?;
            let results = fs.analyze_articles(&articles).await?;

            if aggregate {
                let summary = fs.aggregate(&articles, &results);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let rows: Vec<serde_json::Value> = articles
                    .iter()
                    .zip(&results)
                    .map(|(a, r)| {
                        serde_json::json!({
                            "title": a.title,
                            "symbols": a.symbols,
                            "sentiment": r,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        }
        Commands::Providers => {
            println!("{}", serde_json::to_string_pretty(&fs.provider_status())?);
        }
    }
    Ok(())
}
