//! Index schemas as plain data. Translating a schema into the engine's
//! create-index command is the engine client's job; nothing here touches
//! the wire.

/// Index field names shared between schemas, derivations, and the facet
/// aggregations.
pub mod fields {
    pub const STORE_ID: &str = "store";
    pub const LOCATION: &str = "location";

    pub const PRODUCT_ID: &str = "sku";
    pub const PRODUCT_NAME: &str = "name";
    pub const PRODUCT_DESCRIPTION: &str = "description";
    pub const PRODUCT_LABEL: &str = "label";
    pub const CATEGORY_ID: &str = "category";
    pub const CATEGORY_NAME: &str = "categoryName";
    pub const STYLE_ID: &str = "style";
    pub const STYLE_NAME: &str = "styleName";
    pub const BREWERY_ID: &str = "brewery";
    pub const BREWERY_NAME: &str = "breweryName";
    pub const BREWERY_ICON: &str = "breweryIcon";
    pub const FOOD_PAIRINGS: &str = "foodPairings";

    pub const COUNT: &str = "count";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phonetic {
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Exact-match, enumerable field for identifiers and enums.
    Tag,
    /// Tokenized full-text field, optionally phonetic.
    Text { phonetic: Option<Phonetic> },
    /// Range-queryable numeric field.
    Numeric,
    /// Radius-queryable geo point. Never imported directly; the loader
    /// synthesizes it from longitude/latitude columns.
    Geo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub sortable: bool,
}

impl FieldSchema {
    pub fn tag(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Tag,
            sortable: false,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text { phonetic: None },
            sortable: false,
        }
    }

    pub fn phonetic_text(name: &'static str, matcher: Phonetic) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                phonetic: Some(matcher),
            },
            sortable: false,
        }
    }

    pub fn numeric(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Numeric,
            sortable: false,
        }
    }

    pub fn geo(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Geo,
            sortable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    /// Keyspace for documents of this index; keys are `<prefix>:<id>`.
    pub key_prefix: &'static str,
    pub fields: Vec<FieldSchema>,
}

/// Searchable fields of the store collection.
pub fn store_schema() -> IndexSchema {
    IndexSchema {
        key_prefix: "store",
        fields: vec![
            FieldSchema::tag(fields::STORE_ID).sortable(),
            FieldSchema::text("description"),
            FieldSchema::tag("market").sortable(),
            FieldSchema::tag("parent").sortable(),
            FieldSchema::text("address"),
            FieldSchema::text("city").sortable(),
            FieldSchema::tag("country").sortable(),
            FieldSchema::tag("inventoryAvailableToSell").sortable(),
            FieldSchema::tag("isDefault").sortable(),
            FieldSchema::tag("preferred").sortable(),
            FieldSchema::numeric("latitude").sortable(),
            FieldSchema::geo(fields::LOCATION),
            FieldSchema::numeric("longitude").sortable(),
            FieldSchema::tag("rollupInventory").sortable(),
            FieldSchema::tag("state").sortable(),
            FieldSchema::tag("type").sortable(),
            FieldSchema::tag("postalCode").sortable(),
        ],
    }
}

/// Searchable fields of the product collection.
pub fn product_schema() -> IndexSchema {
    IndexSchema {
        key_prefix: "product",
        fields: vec![
            FieldSchema::tag(fields::PRODUCT_ID).sortable(),
            FieldSchema::text(fields::PRODUCT_NAME).sortable(),
            FieldSchema::phonetic_text(fields::PRODUCT_DESCRIPTION, Phonetic::English),
            FieldSchema::tag(fields::PRODUCT_LABEL),
            FieldSchema::tag(fields::CATEGORY_ID).sortable(),
            FieldSchema::text(fields::CATEGORY_NAME),
            FieldSchema::tag(fields::STYLE_ID).sortable(),
            FieldSchema::text(fields::STYLE_NAME),
            FieldSchema::tag(fields::BREWERY_ID).sortable(),
            FieldSchema::text(fields::BREWERY_NAME),
            FieldSchema::text(fields::FOOD_PAIRINGS).sortable(),
            FieldSchema::tag("isOrganic").sortable(),
            FieldSchema::numeric("abv").sortable(),
            FieldSchema::numeric("ibu").sortable(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_schema_synthesizes_geo_from_scalars() {
        let schema = store_schema();
        let location = schema
            .fields
            .iter()
            .find(|f| f.name == fields::LOCATION)
            .expect("store schema should carry a location field");
        assert_eq!(location.kind, FieldKind::Geo);

        // The scalar source columns stay indexed as numerics.
        for scalar in ["latitude", "longitude"] {
            let field = schema.fields.iter().find(|f| f.name == scalar).unwrap();
            assert_eq!(field.kind, FieldKind::Numeric);
        }
    }

    #[test]
    fn product_description_is_phonetic() {
        let schema = product_schema();
        let description = schema
            .fields
            .iter()
            .find(|f| f.name == fields::PRODUCT_DESCRIPTION)
            .unwrap();
        assert_eq!(
            description.kind,
            FieldKind::Text {
                phonetic: Some(Phonetic::English)
            }
        );
    }
}
