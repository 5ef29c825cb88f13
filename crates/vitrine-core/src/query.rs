//! Content query data model.
//!
//! A [`ContentQuery`] is a GROQ string plus named parameters. The backend
//! answers with a [`QueryResult`]; only the `result` member is meaningful to
//! this layer and its shape is never validated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Message returned when a query string is missing or empty.
pub const QUERY_REQUIRED: &str = "Query is required";

/// A structured query with named parameter substitutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentQuery {
    /// GROQ query text.
    pub query: String,

    /// Values for `$name` placeholders in the query.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ContentQuery {
    /// Create a query without parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Map::new(),
        }
    }

    /// Add a named parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Reject queries the backend would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(CoreError::invalid_query(QUERY_REQUIRED));
        }
        Ok(())
    }
}

/// Backend response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The query result, `None` when the backend returned `null` or nothing.
    #[serde(default)]
    pub result: Option<Value>,
}

impl QueryResult {
    /// Extract the envelope from an arbitrary backend response.
    ///
    /// Anything that is not an object with a non-null `result` yields an
    /// empty result.
    pub fn from_response(response: &Value) -> Self {
        let result = response
            .get("result")
            .filter(|value| !value.is_null())
            .cloned();
        Self { result }
    }

    /// Consume the envelope, returning the inner document.
    pub fn into_document(self) -> Option<Value> {
        self.result
    }
}
