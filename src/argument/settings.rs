use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Final key to value map produced by one resolution pass.
///
/// Entries keep the declaration order of their definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSettings {
    values: IndexMap<String, Value>,
}

impl ResolvedSettings {
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// `true` only for a boolean `true` value.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(Value::Bool(true)))
    }

    /// Whether the value is present and neither `null` nor `false`.
    pub fn is_enabled(&self, key: &str) -> bool {
        !matches!(
            self.values.get(key),
            None | Some(Value::Null) | Some(Value::Bool(false))
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for ResolvedSettings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
