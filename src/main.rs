use bomb_catalog::config::Config;
use bomb_catalog::home::{self, HomeSection};
use bomb_catalog::{CatalogClient, ResumeCache};
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "loaded configuration");
    let client = CatalogClient::new(config.api_client()?, ResumeCache::new());

    client.prefetch().await?;
    let today = Local::now().date_naive();
    let sections = home::build(&client, today, config.recently_watched_limit).await?;

    for section in &sections {
        println!("{}", section.title());
        match section {
            HomeSection::Highlights(highlights) => {
                for highlight in highlights {
                    println!("  {}", highlight.prompt());
                }
            }
            HomeSection::Row { items, .. } => {
                for item in items {
                    match item.progress(&client) {
                        Some(progress) => {
                            println!("  {} ({:.0}%)", item.title(), progress * 100.0);
                        }
                        None => println!("  {}", item.title()),
                    }
                }
            }
        }
    }
    Ok(())
}
