use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// One annotation value on a word, e.g. a part-of-speech flag or a count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PartValue {
    fn from_json(key: &str, value: serde_json::Value) -> Result<Self, ServiceError> {
        match value {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).ok_or_else(|| {
                ServiceError::invalid_argument(format!("word part `{key}` is not a finite number"))
            }),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(ServiceError::invalid_argument(format!(
                    "word part `{key}` must be a string, number, bool or null"
                )))
            }
        }
    }
}

/// Structured annotation map attached to a word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordParts(BTreeMap<String, PartValue>);

impl WordParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: PartValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PartValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates raw JSON coming from outside: `null` or an object of scalar values.
    pub fn from_json_str(raw: &str) -> Result<Self, ServiceError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| ServiceError::invalid_argument(format!("word parts are not JSON: {e}")))?;
        Self::from_json(value)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, ServiceError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(map) => {
                let mut parts = BTreeMap::new();
                for (key, value) in map {
                    let part = PartValue::from_json(&key, value)?;
                    parts.insert(key, part);
                }
                Ok(Self(parts))
            }
            other => Err(ServiceError::invalid_argument(format!(
                "word parts must be a JSON object, got {other}"
            ))),
        }
    }

    /// Text form stored in the `parts` column. Non-finite numbers have no JSON form and are rejected.
    pub fn to_json_string(&self) -> Result<String, ServiceError> {
        if let Some((key, _)) = self
            .0
            .iter()
            .find(|(_, value)| matches!(value, PartValue::Number(n) if !n.is_finite()))
        {
            return Err(ServiceError::invalid_argument(format!(
                "word part `{key}` is not a finite number"
            )));
        }
        serde_json::to_string(&self.0)
            .map_err(|e| ServiceError::invalid_argument(format!("word parts cannot be encoded: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub japanese: String,
    pub romaji: String,
    pub english: String,
    pub parts: WordParts,
}

#[derive(Debug, Clone)]
pub struct NewWord {
    pub japanese: String,
    pub romaji: String,
    pub english: String,
    pub parts: WordParts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyActivity {
    pub id: i64,
    pub group_id: i64,
    pub activity_type: String,
    pub created_at: DateTime<Utc>,
}
