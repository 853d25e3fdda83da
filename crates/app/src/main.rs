use brew_search_core::{
    BreweryConfig, DataLoader, FoodPairingsConfig, LoaderConfig, ProductConfig, ProductLoadConfig,
    RediSearchStore, StageOutcome, StoreConfig, TextNormalizer,
};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "brew-search-loader", version)]
struct Cli {
    /// Engine connection URL
    #[arg(long, env = "BREW_REDIS_URL", default_value = "redis://localhost:6379")]
    redis_url: String,

    /// Stopword list, one word per line
    #[arg(long, default_value = "assets/english_stopwords.txt")]
    stopwords: PathBuf,

    /// Store index name
    #[arg(long, default_value = "stores")]
    store_index: String,

    /// Store source file: local path or http(s) URL
    #[arg(long, default_value = "data/stores.csv")]
    store_url: String,

    /// Skip the store load when the index already holds this many documents
    #[arg(long, default_value = "1")]
    store_count: u64,

    /// Product index name
    #[arg(long, default_value = "products")]
    product_index: String,

    /// Product source file: local path or http(s) URL
    #[arg(long, default_value = "data/products.csv")]
    product_url: String,

    /// Skip the product load when the index already holds this many documents
    #[arg(long, default_value = "1")]
    product_load_count: u64,

    /// Optional delay in milliseconds between product records
    #[arg(long)]
    product_load_sleep: Option<u64>,

    /// Brewery suggestion dictionary name
    #[arg(long, default_value = "breweries")]
    brewery_index: String,

    /// Food-pairing suggestion dictionary name
    #[arg(long, default_value = "foodPairings")]
    food_pairings_index: String,

    /// Number of top pairing groups mined for suggestion phrases
    #[arg(long, default_value = "50")]
    food_pairings_limit: usize,
}

impl Cli {
    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            store: StoreConfig {
                index: self.store_index.clone(),
                url: self.store_url.clone(),
                count: self.store_count,
            },
            product: ProductConfig {
                index: self.product_index.clone(),
                url: self.product_url.clone(),
                load: ProductLoadConfig {
                    count: self.product_load_count,
                    sleep: self.product_load_sleep,
                },
                brewery: BreweryConfig {
                    index: self.brewery_index.clone(),
                },
                food_pairings: FoodPairingsConfig {
                    index: self.food_pairings_index.clone(),
                    limit: self.food_pairings_limit,
                },
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let normalizer = TextNormalizer::from_file(&cli.stopwords)?;
    let engine = RediSearchStore::connect(&cli.redis_url).await?;
    let loader = DataLoader::new(engine, cli.loader_config(), normalizer);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "brew-search loader boot"
    );

    let report = loader.execute(&cancel).await?;

    for (stage, outcome) in &report.stages {
        match outcome {
            StageOutcome::Skipped { existing } => {
                println!("[{stage}] skipped, {existing} entries already present");
            }
            StageOutcome::Loaded { written } => {
                println!("[{stage}] loaded {written} entries");
            }
        }
    }
    println!("{} categories", report.facets.categories.len());
    for category in &report.facets.categories {
        let style_count = report
            .facets
            .styles
            .get(&category.id)
            .map(Vec::len)
            .unwrap_or(0);
        println!(
            "  {} ({} styles)",
            category.name.as_deref().unwrap_or("-"),
            style_count
        );
    }
    println!(
        "finished in {}ms",
        (report.finished_at - report.started_at).num_milliseconds()
    );

    Ok(())
}
