use serde::Deserialize;

/// Pipeline configuration, supplied out-of-band at construction. Every
/// knob the loader reads lives here; nothing is re-read mid-run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub store: StoreConfig,
    pub product: ProductConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub index: String,
    /// Source file: a local path or an http(s) URL.
    pub url: String,
    /// Skip the load once the index holds at least this many documents.
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub index: String,
    pub url: String,
    pub load: ProductLoadConfig,
    pub brewery: BreweryConfig,
    #[serde(rename = "foodPairings")]
    pub food_pairings: FoodPairingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductLoadConfig {
    pub count: u64,
    /// Optional delay between records, in milliseconds, for throttled
    /// loading against a busy engine.
    pub sleep: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BreweryConfig {
    /// Suggestion dictionary that receives brewery names.
    pub index: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FoodPairingsConfig {
    /// Suggestion dictionary that receives food-pairing phrases.
    pub index: String,
    /// Only the top-N pairing groups by product count are mined for
    /// phrases.
    pub limit: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            product: ProductConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index: "stores".to_string(),
            url: "data/stores.csv".to_string(),
            count: 1,
        }
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            index: "products".to_string(),
            url: "data/products.csv".to_string(),
            load: ProductLoadConfig::default(),
            brewery: BreweryConfig::default(),
            food_pairings: FoodPairingsConfig::default(),
        }
    }
}

impl Default for ProductLoadConfig {
    fn default() -> Self {
        Self {
            count: 1,
            sleep: None,
        }
    }
}

impl Default for BreweryConfig {
    fn default() -> Self {
        Self {
            index: "breweries".to_string(),
        }
    }
}

impl Default for FoodPairingsConfig {
    fn default() -> Self {
        Self {
            index: "foodPairings".to_string(),
            limit: 50,
        }
    }
}
