use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A navigation facet derived from the product index. The name is whatever
/// the aggregation returned for the group; a group can legitimately carry
/// no name, and ordering puts those entries last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Style {
    pub id: String,
    pub name: Option<String>,
}

/// Payload attached to a brewery autocomplete entry, serialized to JSON
/// before it is handed to the suggestion dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrewerySuggestionPayload {
    pub id: Option<String>,
    pub icon: Option<String>,
}

/// Category and per-category style lists, rebuilt in full every run.
/// Returned as a value from the load so whichever component serves read
/// traffic owns it outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetCatalog {
    pub categories: Vec<Category>,
    pub styles: HashMap<String, Vec<Style>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stores,
    Products,
    Breweries,
    CategoriesStyles,
    FoodPairings,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Stores => "stores",
            Stage::Products => "products",
            Stage::Breweries => "breweries",
            Stage::CategoriesStyles => "categories-styles",
            Stage::FoodPairings => "food-pairings",
        };
        f.write_str(name)
    }
}

/// What happened to a stage: left alone because the target already held
/// enough entries, or rebuilt with the given number written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Skipped { existing: u64 },
    Loaded { written: u64 },
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stages: Vec<(Stage, StageOutcome)>,
    pub facets: FacetCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct SortBy {
    pub property: String,
    pub order: SortOrder,
}

/// A server-side aggregation over an index: group-by with a
/// distinct-count reducer, then optional sort and limit stages. Plain
/// data; the engine client translates it into the wire command.
#[derive(Debug, Clone)]
pub struct AggregateRequest {
    pub filter: String,
    pub load: Vec<String>,
    pub group_by: Vec<String>,
    pub count_distinct: String,
    pub count_alias: String,
    pub sort: Option<SortBy>,
    pub limit: Option<usize>,
}

/// One aggregation group, as field name to value. Fields the engine
/// returned as null are absent from the map.
pub type AggregateRow = HashMap<String, String>;

impl AggregateRequest {
    /// Group documents matching `filter` by `group_by`, counting distinct
    /// values of `count_distinct` into the `count` alias.
    pub fn grouped(filter: impl Into<String>, group_by: &[&str], count_distinct: &str) -> Self {
        Self {
            filter: filter.into(),
            load: Vec::new(),
            group_by: group_by.iter().map(|p| p.to_string()).collect(),
            count_distinct: count_distinct.to_string(),
            count_alias: crate::schema::fields::COUNT.to_string(),
            sort: None,
            limit: None,
        }
    }

    pub fn load(mut self, properties: &[&str]) -> Self {
        self.load = properties.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn sorted(mut self, property: &str, order: SortOrder) -> Self {
        self.sort = Some(SortBy {
            property: property.to_string(),
            order,
        });
        self
    }

    pub fn limited(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
