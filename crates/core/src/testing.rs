//! In-memory engine fake shared by the import, facet, and loader tests.
//! Scripts aggregation replies in FIFO order and records every mutating
//! call for assertions.

use crate::error::SearchError;
use crate::models::{AggregateRequest, AggregateRow};
use crate::schema::IndexSchema;
use crate::traits::{IndexInfo, SearchEngine};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub dictionary: String,
    pub text: String,
    pub weight: f64,
    pub payload: Option<String>,
    pub dedupe: bool,
}

#[derive(Default)]
struct State {
    indexes: HashMap<String, u64>,
    dictionaries: HashMap<String, u64>,
    aggregate_replies: VecDeque<Vec<AggregateRow>>,
    aggregate_filters: Vec<String>,
    calls: Vec<String>,
    written: Vec<(String, HashMap<String, String>)>,
    suggestions: Vec<Suggestion>,
    deleted: Vec<String>,
    fail_create_for: Option<String>,
    fail_suggestion_len: bool,
}

#[derive(Default)]
pub struct FakeSearchEngine {
    state: Mutex<State>,
}

impl FakeSearchEngine {
    pub fn seed_index(&self, index: &str, num_docs: u64) {
        self.state
            .lock()
            .unwrap()
            .indexes
            .insert(index.to_string(), num_docs);
    }

    pub fn seed_dictionary(&self, dictionary: &str, len: u64) {
        self.state
            .lock()
            .unwrap()
            .dictionaries
            .insert(dictionary.to_string(), len);
    }

    pub fn queue_aggregate(&self, rows: Vec<AggregateRow>) {
        self.state.lock().unwrap().aggregate_replies.push_back(rows);
    }

    pub fn fail_create_of(&self, index: &str) {
        self.state.lock().unwrap().fail_create_for = Some(index.to_string());
    }

    pub fn fail_suggestion_probe(&self) {
        self.state.lock().unwrap().fail_suggestion_len = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn written(&self) -> Vec<(String, HashMap<String, String>)> {
        self.state.lock().unwrap().written.clone()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.state.lock().unwrap().suggestions.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn aggregate_filters(&self) -> Vec<String> {
        self.state.lock().unwrap().aggregate_filters.clone()
    }

    pub fn row(entries: &[(&str, &str)]) -> AggregateRow {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[async_trait]
impl SearchEngine for FakeSearchEngine {
    async fn index_info(&self, index: &str) -> Result<IndexInfo, SearchError> {
        let state = self.state.lock().unwrap();
        match state.indexes.get(index) {
            Some(num_docs) => Ok(IndexInfo {
                num_docs: *num_docs,
            }),
            None => Err(SearchError::IndexNotFound(index.to_string())),
        }
    }

    async fn drop_index(&self, index: &str) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("drop {index}"));
        match state.indexes.remove(index) {
            Some(_) => Ok(()),
            None => Err(SearchError::IndexNotFound(index.to_string())),
        }
    }

    async fn create_index(&self, index: &str, _schema: &IndexSchema) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create_for.as_deref() == Some(index) {
            return Err(SearchError::Reply {
                command: "FT.CREATE",
                details: format!("scripted failure for {index}"),
            });
        }
        state.calls.push(format!("create {index}"));
        state.indexes.insert(index.to_string(), 0);
        Ok(())
    }

    async fn write_document(
        &self,
        key: &str,
        fields: &HashMap<String, String>,
        index: &str,
    ) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        state.written.push((key.to_string(), fields.clone()));
        *state.indexes.entry(index.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn aggregate(
        &self,
        index: &str,
        request: &AggregateRequest,
    ) -> Result<Vec<AggregateRow>, SearchError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("aggregate {index}"));
        state.aggregate_filters.push(request.filter.clone());
        Ok(state.aggregate_replies.pop_front().unwrap_or_default())
    }

    async fn suggestion_len(&self, dictionary: &str) -> Result<u64, SearchError> {
        let state = self.state.lock().unwrap();
        if state.fail_suggestion_len {
            return Err(SearchError::Reply {
                command: "FT.SUGLEN",
                details: "scripted probe failure".to_string(),
            });
        }
        Ok(*state.dictionaries.get(dictionary).unwrap_or(&0))
    }

    async fn add_suggestion(
        &self,
        dictionary: &str,
        text: &str,
        weight: f64,
        payload: Option<&str>,
        dedupe: bool,
    ) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        state.suggestions.push(Suggestion {
            dictionary: dictionary.to_string(),
            text: text.to_string(),
            weight,
            payload: payload.map(|p| p.to_string()),
            dedupe,
        });
        *state
            .dictionaries
            .entry(dictionary.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        state.deleted.push(key.to_string());
        state.dictionaries.remove(key);
        Ok(())
    }
}
