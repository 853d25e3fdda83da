pub mod config;
pub mod derive;
pub mod error;
pub mod facets;
pub mod import;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod schema;
pub mod stores;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::{
    BreweryConfig, FoodPairingsConfig, LoaderConfig, ProductConfig, ProductLoadConfig, StoreConfig,
};
pub use derive::{product_derivations, store_derivations, Derivation, DerivedField, Row};
pub use error::{LoadError, Result, SearchError};
pub use facets::{load_breweries, load_categories_and_styles, load_food_pairings};
pub use import::{import_file, ImportRequest};
pub use loader::DataLoader;
pub use models::{
    AggregateRequest, AggregateRow, BrewerySuggestionPayload, Category, FacetCatalog, LoadReport,
    SortBy, SortOrder, Stage, StageOutcome, Style,
};
pub use normalizer::TextNormalizer;
pub use schema::{
    fields, product_schema, store_schema, FieldKind, FieldSchema, IndexSchema, Phonetic,
};
pub use stores::RediSearchStore;
pub use traits::{IndexInfo, SearchEngine};
