//! A dynamic message whose field order tracks assignment history.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::oneof::FieldSet;

/// Field values keyed by name, ordered by most recent assignment.
///
/// `Value::Null` counts as absent for presence checks, matching how generated
/// code treats unset optional fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicMessage {
    fields: IndexMap<String, Value>,
}

impl DynamicMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field, moving it to the end of the assignment order.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.fields.shift_remove(&name);
        self.fields.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FieldSet for DynamicMessage {
    fn field_names(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn is_present(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|v| !v.is_null())
    }

    fn clear_field(&mut self, name: &str) {
        self.fields.shift_remove(name);
    }
}
