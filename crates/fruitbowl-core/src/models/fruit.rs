use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog entry. Fields beyond `id` and `name` are kept as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Fruit {
    /// Extra fields rendered as `key=value`, sorted by key.
    pub fn details_display(&self) -> String {
        let mut pairs: Vec<String> = self
            .details
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect();
        pairs.sort();
        pairs.join(" ")
    }
}

/// Body for `POST /fruits` and `PUT /fruits/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitInput {
    pub name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl FruitInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: Map::new(),
        }
    }

    /// Add a detail field. Numbers and booleans are stored typed.
    pub fn with_detail(mut self, key: impl Into<String>, value: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(value)
            .ok()
            .filter(|v| v.is_number() || v.is_boolean())
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.details.insert(key.into(), parsed);
        self
    }
}
