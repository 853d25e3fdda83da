//! Read-side aggregations over the populated product index: category and
//! style facets, brewery name suggestions, and food-pairing suggestions.
//! All three run only after the product load; an empty index yields empty
//! facet sets, not errors.

use crate::error::SearchError;
use crate::models::{
    AggregateRequest, BrewerySuggestionPayload, Category, FacetCatalog, SortOrder, StageOutcome,
    Style,
};
use crate::normalizer::TextNormalizer;
use crate::schema::fields;
use crate::traits::SearchEngine;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, error, info};

fn tag_filter(field: &str, value: &str) -> String {
    format!("@{field}:{{{value}}}")
}

fn compare_names(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct categories with their per-category style lists, both ordered
/// by name ascending with unnamed entries last. Rebuilt in full on every
/// call; groups without an id are dropped.
pub async fn load_categories_and_styles(
    engine: &dyn SearchEngine,
    index: &str,
) -> Result<FacetCatalog, SearchError> {
    info!("loading categories");
    let request = AggregateRequest::grouped(
        "*",
        &[fields::CATEGORY_ID, fields::CATEGORY_NAME],
        fields::PRODUCT_ID,
    )
    .load(&[fields::CATEGORY_NAME]);
    let rows = engine.aggregate(index, &request).await?;

    let mut categories: Vec<Category> = rows
        .iter()
        .filter_map(|row| {
            row.get(fields::CATEGORY_ID).map(|id| Category {
                id: id.clone(),
                name: row.get(fields::CATEGORY_NAME).cloned(),
            })
        })
        .collect();
    categories.sort_by(|a, b| compare_names(a.name.as_deref(), b.name.as_deref()));

    info!("loading styles");
    let mut styles: HashMap<String, Vec<Style>> = HashMap::new();
    for category in &categories {
        let request = AggregateRequest::grouped(
            tag_filter(fields::CATEGORY_ID, &category.id),
            &[fields::STYLE_ID, fields::STYLE_NAME],
            fields::PRODUCT_ID,
        )
        .load(&[fields::STYLE_NAME]);
        let rows = engine.aggregate(index, &request).await?;

        let mut list: Vec<Style> = rows
            .iter()
            .filter_map(|row| {
                row.get(fields::STYLE_ID).map(|id| Style {
                    id: id.clone(),
                    name: row.get(fields::STYLE_NAME).cloned(),
                })
            })
            .collect();
        list.sort_by(|a, b| compare_names(a.name.as_deref(), b.name.as_deref()));
        styles.insert(category.id.clone(), list);
    }

    Ok(FacetCatalog { categories, styles })
}

/// Populate the brewery suggestion dictionary from a (brewery id, name,
/// icon) aggregation, weighting each name by its distinct product count.
/// Skipped wholly when the dictionary already has entries; a failing
/// probe means "not loaded yet" and the load proceeds.
pub async fn load_breweries(
    engine: &dyn SearchEngine,
    index: &str,
    dictionary: &str,
) -> Result<StageOutcome, SearchError> {
    match engine.suggestion_len(dictionary).await {
        Ok(len) if len > 0 => {
            info!(existing = len, "found breweries, skipping load");
            return Ok(StageOutcome::Skipped { existing: len });
        }
        Ok(_) => {}
        Err(probe_error) => {
            debug!(%probe_error, "brewery dictionary probe failed, loading");
        }
    }

    info!("loading breweries");
    let request = AggregateRequest::grouped(
        "*",
        &[fields::BREWERY_ID, fields::BREWERY_NAME, fields::BREWERY_ICON],
        fields::PRODUCT_ID,
    )
    .load(&[fields::BREWERY_NAME, fields::BREWERY_ICON]);
    let rows = engine.aggregate(index, &request).await?;

    let mut added = 0u64;
    for row in &rows {
        // Unnamed breweries have no usable display text.
        let Some(name) = row.get(fields::BREWERY_NAME) else {
            continue;
        };
        let payload = BrewerySuggestionPayload {
            id: row.get(fields::BREWERY_ID).cloned(),
            icon: row.get(fields::BREWERY_ICON).cloned(),
        };
        let payload = match serde_json::to_string(&payload) {
            Ok(payload) => payload,
            Err(serialize_error) => {
                error!(%serialize_error, brewery = %name, "could not serialize brewery payload");
                continue;
            }
        };
        let weight = row
            .get(fields::COUNT)
            .and_then(|count| count.parse::<f64>().ok())
            .unwrap_or(0.0);
        engine
            .add_suggestion(dictionary, name, weight, Some(&payload), false)
            .await?;
        added += 1;
    }
    info!(loaded = added, "loaded breweries");
    Ok(StageOutcome::Loaded { written: added })
}

/// Rebuild the food-pairing suggestion dictionary: clear it, take the top
/// `limit` pairing groups by distinct product count, split each group's
/// text on commas and newlines, and keep cleaned fragments of at most two
/// words as deduplicated weight-1.0 entries.
pub async fn load_food_pairings(
    engine: &dyn SearchEngine,
    normalizer: &TextNormalizer,
    index: &str,
    dictionary: &str,
    limit: usize,
) -> Result<u64, SearchError> {
    engine.delete(dictionary).await?;
    info!("loading food pairings");
    let request = AggregateRequest::grouped("*", &[fields::FOOD_PAIRINGS], fields::PRODUCT_ID)
        .sorted(fields::COUNT, SortOrder::Desc)
        .limited(limit);
    let rows = engine.aggregate(index, &request).await?;

    let mut added = 0u64;
    for row in &rows {
        let Some(pairings) = row.get(fields::FOOD_PAIRINGS) else {
            continue;
        };
        if pairings.trim().is_empty() {
            continue;
        }
        for fragment in pairings.split(['\n', ',']) {
            let cleaned = normalizer.clean(fragment);
            if cleaned.is_empty() || cleaned.split(' ').count() > 2 {
                continue;
            }
            engine
                .add_suggestion(dictionary, &cleaned, 1.0, None, true)
                .await?;
            added += 1;
        }
    }
    info!(groups = rows.len(), "loaded food pairings");
    Ok(added)
}
