use crate::error::SearchError;
use crate::models::{AggregateRequest, AggregateRow, SortOrder};
use crate::schema::{FieldKind, IndexSchema, Phonetic};
use crate::traits::{IndexInfo, SearchEngine};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Value;
use std::collections::HashMap;

/// Engine client speaking the RediSearch module commands over a managed
/// async connection. This is the only place that knows the wire protocol;
/// everything above it works against [`SearchEngine`].
pub struct RediSearchStore {
    conn: ConnectionManager,
}

impl RediSearchStore {
    pub async fn connect(url: &str) -> Result<Self, SearchError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SearchEngine for RediSearchStore {
    async fn index_info(&self, index: &str) -> Result<IndexInfo, SearchError> {
        let mut conn = self.conn.clone();
        let reply: Value = redis::cmd("FT.INFO")
            .arg(index)
            .query_async(&mut conn)
            .await
            .map_err(|error| classify(index, error))?;
        parse_index_info(&reply)
    }

    async fn drop_index(&self, index: &str) -> Result<(), SearchError> {
        let mut conn = self.conn.clone();
        // DD drops the documents along with the definition, so a rebuild
        // starts from an empty keyspace.
        let reply: Result<(), redis::RedisError> = redis::cmd("FT.DROPINDEX")
            .arg(index)
            .arg("DD")
            .query_async(&mut conn)
            .await;
        reply.map_err(|error| classify(index, error))
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), SearchError> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("FT.CREATE");
        cmd.arg(index)
            .arg("ON")
            .arg("HASH")
            .arg("PREFIX")
            .arg(1)
            .arg(format!("{}:", schema.key_prefix))
            .arg("SCHEMA");
        for field in &schema.fields {
            cmd.arg(field.name);
            match field.kind {
                FieldKind::Tag => {
                    cmd.arg("TAG");
                }
                FieldKind::Text { phonetic } => {
                    cmd.arg("TEXT");
                    if let Some(Phonetic::English) = phonetic {
                        cmd.arg("PHONETIC").arg("dm:en");
                    }
                }
                FieldKind::Numeric => {
                    cmd.arg("NUMERIC");
                }
                FieldKind::Geo => {
                    cmd.arg("GEO");
                }
            }
            if field.sortable {
                cmd.arg("SORTABLE");
            }
        }
        let reply: Result<(), redis::RedisError> = cmd.query_async(&mut conn).await;
        reply.map_err(SearchError::from)
    }

    async fn write_document(
        &self,
        key: &str,
        fields: &HashMap<String, String>,
        _index: &str,
    ) -> Result<(), SearchError> {
        // Prefix-based indexing registers the hash for the index as a
        // side effect of the write.
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for (field, value) in fields {
            cmd.arg(field).arg(value);
        }
        let reply: Result<i64, redis::RedisError> = cmd.query_async(&mut conn).await;
        reply.map(|_| ()).map_err(SearchError::from)
    }

    async fn aggregate(
        &self,
        index: &str,
        request: &AggregateRequest,
    ) -> Result<Vec<AggregateRow>, SearchError> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("FT.AGGREGATE");
        cmd.arg(index).arg(&request.filter);
        if !request.load.is_empty() {
            cmd.arg("LOAD").arg(request.load.len());
            for property in &request.load {
                cmd.arg(format!("@{property}"));
            }
        }
        cmd.arg("GROUPBY").arg(request.group_by.len());
        for property in &request.group_by {
            cmd.arg(format!("@{property}"));
        }
        cmd.arg("REDUCE")
            .arg("COUNT_DISTINCT")
            .arg(1)
            .arg(format!("@{}", request.count_distinct))
            .arg("AS")
            .arg(&request.count_alias);
        if let Some(sort) = &request.sort {
            cmd.arg("SORTBY").arg(2).arg(format!("@{}", sort.property));
            cmd.arg(match sort.order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            });
        }
        if let Some(limit) = request.limit {
            cmd.arg("LIMIT").arg(0).arg(limit);
        }
        let reply: Value = cmd
            .query_async(&mut conn)
            .await
            .map_err(|error| classify(index, error))?;
        parse_aggregate_rows(&reply)
    }

    async fn suggestion_len(&self, dictionary: &str) -> Result<u64, SearchError> {
        let mut conn = self.conn.clone();
        let reply: Result<u64, redis::RedisError> = redis::cmd("FT.SUGLEN")
            .arg(dictionary)
            .query_async(&mut conn)
            .await;
        reply.map_err(SearchError::from)
    }

    async fn add_suggestion(
        &self,
        dictionary: &str,
        text: &str,
        weight: f64,
        payload: Option<&str>,
        dedupe: bool,
    ) -> Result<(), SearchError> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("FT.SUGADD");
        cmd.arg(dictionary).arg(text).arg(weight);
        if dedupe {
            cmd.arg("INCR");
        }
        if let Some(payload) = payload {
            cmd.arg("PAYLOAD").arg(payload);
        }
        let reply: Result<i64, redis::RedisError> = cmd.query_async(&mut conn).await;
        reply.map(|_| ()).map_err(SearchError::from)
    }

    async fn delete(&self, key: &str) -> Result<(), SearchError> {
        let mut conn = self.conn.clone();
        let reply: Result<i64, redis::RedisError> = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await;
        reply.map(|_| ()).map_err(SearchError::from)
    }
}

/// Map the engine's "no such index" reply onto the structured variant so
/// callers can match on kind instead of parsing messages.
fn classify(index: &str, error: redis::RedisError) -> SearchError {
    let message = error.to_string().to_lowercase();
    if message.contains("unknown index") || message.contains("no such index") {
        SearchError::IndexNotFound(index.to_string())
    } else {
        SearchError::Engine(error)
    }
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(text) => Some(text.clone()),
        Value::VerbatimString { text, .. } => Some(text.clone()),
        Value::Int(number) => Some(number.to_string()),
        Value::Double(number) => Some(number.to_string()),
        _ => None,
    }
}

/// FT.INFO replies with alternating name/value entries (a map under
/// RESP3); only num_docs matters here.
fn parse_index_info(reply: &Value) -> Result<IndexInfo, SearchError> {
    let pairs: Vec<(&Value, &Value)> = match reply {
        Value::Array(items) => items.chunks(2).filter_map(pair_of).collect(),
        Value::Map(entries) => entries.iter().map(|(k, v)| (k, v)).collect(),
        _ => {
            return Err(SearchError::Reply {
                command: "FT.INFO",
                details: "expected an array or map reply".to_string(),
            })
        }
    };
    let mut info = IndexInfo::default();
    for (name, value) in pairs {
        if string_value(name).as_deref() == Some("num_docs") {
            info.num_docs = string_value(value)
                .and_then(|raw| raw.parse::<f64>().ok())
                .map(|docs| docs as u64)
                .unwrap_or(0);
        }
    }
    Ok(info)
}

fn pair_of(chunk: &[Value]) -> Option<(&Value, &Value)> {
    match chunk {
        [name, value] => Some((name, value)),
        _ => None,
    }
}

/// FT.AGGREGATE replies with the group total followed by one entry per
/// group, each an alternating field/value listing. Fields the engine
/// returned as null are left out of the row.
fn parse_aggregate_rows(reply: &Value) -> Result<Vec<AggregateRow>, SearchError> {
    let Value::Array(items) = reply else {
        return Err(SearchError::Reply {
            command: "FT.AGGREGATE",
            details: "expected an array reply".to_string(),
        });
    };
    let mut rows = Vec::new();
    for item in items.iter().skip(1) {
        let pairs: Vec<(&Value, &Value)> = match item {
            Value::Array(entries) => entries.chunks(2).filter_map(pair_of).collect(),
            Value::Map(entries) => entries.iter().map(|(k, v)| (k, v)).collect(),
            _ => continue,
        };
        let mut row = AggregateRow::new();
        for (name, value) in pairs {
            if let (Some(name), Some(value)) = (string_value(name), string_value(value)) {
                row.insert(name, value);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::ErrorKind;

    fn bulk(text: &str) -> Value {
        Value::BulkString(text.as_bytes().to_vec())
    }

    #[test]
    fn classifies_unknown_index_replies() {
        let error = redis::RedisError::from((
            ErrorKind::ResponseError,
            "response error",
            "Unknown index name".to_string(),
        ));
        assert!(matches!(
            classify("products", error),
            SearchError::IndexNotFound(index) if index == "products"
        ));

        let other = redis::RedisError::from((
            ErrorKind::ResponseError,
            "response error",
            "OOM command not allowed".to_string(),
        ));
        assert!(matches!(classify("products", other), SearchError::Engine(_)));
    }

    #[test]
    fn parses_num_docs_from_info_reply() {
        let reply = Value::Array(vec![
            bulk("index_name"),
            bulk("products"),
            bulk("num_docs"),
            bulk("2211"),
            bulk("max_doc_id"),
            bulk("2211"),
        ]);
        let info = parse_index_info(&reply).unwrap();
        assert_eq!(info.num_docs, 2211);
    }

    #[test]
    fn info_reply_of_wrong_shape_is_an_error() {
        assert!(parse_index_info(&Value::Int(3)).is_err());
    }

    #[test]
    fn parses_aggregate_groups_and_drops_null_fields() {
        let reply = Value::Array(vec![
            Value::Int(2),
            Value::Array(vec![
                bulk("category"),
                bulk("1"),
                bulk("categoryName"),
                bulk("Ales"),
                bulk("count"),
                bulk("12"),
            ]),
            Value::Array(vec![
                bulk("category"),
                bulk("2"),
                bulk("categoryName"),
                Value::Nil,
                bulk("count"),
                Value::Int(3),
            ]),
        ]);
        let rows = parse_aggregate_rows(&reply).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("categoryName"), Some(&"Ales".to_string()));
        assert_eq!(rows[1].get("categoryName"), None);
        assert_eq!(rows[1].get("count"), Some(&"3".to_string()));
    }
}
