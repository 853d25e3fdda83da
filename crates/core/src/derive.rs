//! Per-field derivations applied to source rows during bulk import. A
//! small closed set of named operations replaces the expression language
//! the import tool would otherwise evaluate per row.

use crate::schema::fields;
use serde_json::Value;
use std::collections::HashMap;

/// One source row, keyed by header column name. Columns that were empty
/// in the file are absent.
pub type Row = HashMap<String, String>;

#[derive(Debug, Clone)]
pub enum Derivation {
    /// Copy a source column as-is.
    Column(&'static str),
    /// "true"/"false" depending on whether the source column is present.
    HasColumn(&'static str),
    /// Parse the column as embedded JSON and walk a dot path. Absent
    /// column, unparsable value, or missing path all yield no value.
    NestedPath {
        source: &'static str,
        path: &'static str,
    },
    /// Parse the column as a JSON array, take element 0, then walk a dot
    /// path inside it. An absent or empty list yields no value.
    FirstElementPath {
        source: &'static str,
        path: &'static str,
    },
    /// Synthesize a "lon,lat" geo point from two scalar columns.
    GeoPoint {
        longitude: &'static str,
        latitude: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct DerivedField {
    pub target: &'static str,
    pub op: Derivation,
}

impl DerivedField {
    pub fn new(target: &'static str, op: Derivation) -> Self {
        Self { target, op }
    }

    pub fn apply(&self, row: &Row) -> Option<String> {
        self.op.apply(row)
    }
}

impl Derivation {
    pub fn apply(&self, row: &Row) -> Option<String> {
        match self {
            Derivation::Column(source) => row.get(*source).cloned(),
            Derivation::HasColumn(source) => Some(row.contains_key(*source).to_string()),
            Derivation::NestedPath { source, path } => {
                let value = parse_json(row.get(*source)?)?;
                walk(&value, path)
            }
            Derivation::FirstElementPath { source, path } => {
                let value = parse_json(row.get(*source)?)?;
                let first = value.as_array()?.first()?;
                walk(first, path)
            }
            Derivation::GeoPoint {
                longitude,
                latitude,
            } => {
                let lon = row.get(*longitude)?;
                let lat = row.get(*latitude)?;
                Some(format!("{lon},{lat}"))
            }
        }
    }
}

fn parse_json(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

fn walk(value: &Value, path: &str) -> Option<String> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    match current {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Store rows are loaded verbatim, plus the synthesized geo point.
pub fn store_derivations() -> Vec<DerivedField> {
    vec![DerivedField::new(
        fields::LOCATION,
        Derivation::GeoPoint {
            longitude: "longitude",
            latitude: "latitude",
        },
    )]
}

/// Product rows are flattened: the nested style/category structure and
/// the first brewery of the nested list (when present) become top-level
/// fields.
pub fn product_derivations() -> Vec<DerivedField> {
    vec![
        DerivedField::new(fields::PRODUCT_ID, Derivation::Column("id")),
        DerivedField::new(fields::PRODUCT_LABEL, Derivation::HasColumn("labels")),
        DerivedField::new(
            fields::CATEGORY_ID,
            Derivation::NestedPath {
                source: "style",
                path: "category.id",
            },
        ),
        DerivedField::new(
            fields::CATEGORY_NAME,
            Derivation::NestedPath {
                source: "style",
                path: "category.name",
            },
        ),
        DerivedField::new(
            fields::STYLE_NAME,
            Derivation::NestedPath {
                source: "style",
                path: "shortName",
            },
        ),
        DerivedField::new(
            fields::STYLE_ID,
            Derivation::NestedPath {
                source: "style",
                path: "id",
            },
        ),
        DerivedField::new(
            fields::BREWERY_ID,
            Derivation::FirstElementPath {
                source: "breweries",
                path: "id",
            },
        ),
        DerivedField::new(
            fields::BREWERY_NAME,
            Derivation::FirstElementPath {
                source: "breweries",
                path: "nameShortDisplay",
            },
        ),
        DerivedField::new(
            fields::BREWERY_ICON,
            Derivation::FirstElementPath {
                source: "breweries",
                path: "images.icon",
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, &str)]) -> Row {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn column_copies_source_value() {
        let op = Derivation::Column("id");
        assert_eq!(op.apply(&row(&[("id", "1234")])), Some("1234".to_string()));
        assert_eq!(op.apply(&row(&[])), None);
    }

    #[test]
    fn has_column_reports_presence() {
        let op = Derivation::HasColumn("labels");
        assert_eq!(op.apply(&row(&[("labels", "x")])), Some("true".to_string()));
        assert_eq!(op.apply(&row(&[])), Some("false".to_string()));
    }

    #[test]
    fn nested_path_walks_embedded_json() {
        let op = Derivation::NestedPath {
            source: "style",
            path: "category.id",
        };
        let style = r#"{"id":"3","category":{"id":"1","name":"Ales"}}"#;
        assert_eq!(op.apply(&row(&[("style", style)])), Some("1".to_string()));
        assert_eq!(op.apply(&row(&[("style", "{}")])), None);
        assert_eq!(op.apply(&row(&[("style", "not json")])), None);
    }

    #[test]
    fn first_element_takes_head_of_list() {
        let op = Derivation::FirstElementPath {
            source: "breweries",
            path: "nameShortDisplay",
        };
        let breweries = r#"[{"id":"b-1","nameShortDisplay":"Deschutes"},{"id":"b-2"}]"#;
        assert_eq!(
            op.apply(&row(&[("breweries", breweries)])),
            Some("Deschutes".to_string())
        );
        assert_eq!(op.apply(&row(&[("breweries", "[]")])), None);
        assert_eq!(op.apply(&row(&[])), None);
    }

    #[test]
    fn first_element_walks_nested_images() {
        let op = Derivation::FirstElementPath {
            source: "breweries",
            path: "images.icon",
        };
        let with_icon = r#"[{"id":"b-1","images":{"icon":"http://x/icon.png"}}]"#;
        let without_images = r#"[{"id":"b-1"}]"#;
        assert_eq!(
            op.apply(&row(&[("breweries", with_icon)])),
            Some("http://x/icon.png".to_string())
        );
        assert_eq!(op.apply(&row(&[("breweries", without_images)])), None);
    }

    #[test]
    fn geo_point_joins_longitude_and_latitude() {
        let op = Derivation::GeoPoint {
            longitude: "longitude",
            latitude: "latitude",
        };
        assert_eq!(
            op.apply(&row(&[("longitude", "-122.67"), ("latitude", "45.52")])),
            Some("-122.67,45.52".to_string())
        );
        assert_eq!(op.apply(&row(&[("longitude", "-122.67")])), None);
    }
}
