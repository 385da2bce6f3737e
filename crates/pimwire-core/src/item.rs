//! In-memory PIM record used at the codec boundary.
//!
//! A record is a code-keyed, multi-valued store of typed field values
//! plus a category list and (for events) an optional repeat rule. The
//! codecs populate records on decode and iterate them on encode; the
//! host store owns everything beyond that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::RecordKind;
use crate::repeat::RepeatRule;

/// One typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Single text value.
    Text(String),
    /// Structured multi-part text (e.g. name, address); absent parts are `None`.
    TextArray(Vec<Option<String>>),
    /// Timestamp in milliseconds since the Unix epoch, UTC.
    Date(i64),
    /// Integer value (class codes, priorities, alarm offsets in seconds).
    Int(i64),
    /// Boolean flag.
    Bool(bool),
    /// Raw binary payload.
    Binary(Vec<u8>),
}

impl FieldValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<i64> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// A field value together with its attribute qualifier mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Bitmask of `fields::attr` flags; zero for none.
    pub attributes: u32,
    pub value: FieldValue,
}

/// One contact, event or to-do record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PimRecord {
    kind: RecordKind,
    /// Values keyed by field code; iteration order is code order.
    fields: BTreeMap<u32, Vec<FieldEntry>>,
    categories: Vec<String>,
    repeat: Option<RepeatRule>,
}

impl PimRecord {
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            categories: Vec::new(),
            repeat: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Appends a value to a field.
    pub fn add_value(&mut self, field: u32, attributes: u32, value: FieldValue) {
        self.fields.entry(field).or_default().push(FieldEntry {
            attributes,
            value,
        });
    }

    pub fn add_text(&mut self, field: u32, attributes: u32, value: impl Into<String>) {
        self.add_value(field, attributes, FieldValue::Text(value.into()));
    }

    pub fn add_text_array(&mut self, field: u32, attributes: u32, value: Vec<Option<String>>) {
        self.add_value(field, attributes, FieldValue::TextArray(value));
    }

    pub fn add_date(&mut self, field: u32, attributes: u32, value: i64) {
        self.add_value(field, attributes, FieldValue::Date(value));
    }

    pub fn add_int(&mut self, field: u32, attributes: u32, value: i64) {
        self.add_value(field, attributes, FieldValue::Int(value));
    }

    pub fn add_bool(&mut self, field: u32, attributes: u32, value: bool) {
        self.add_value(field, attributes, FieldValue::Bool(value));
    }

    pub fn add_binary(&mut self, field: u32, attributes: u32, value: Vec<u8>) {
        self.add_value(field, attributes, FieldValue::Binary(value));
    }

    /// Field codes with at least one value, in ascending code order.
    #[must_use]
    pub fn field_codes(&self) -> Vec<u32> {
        self.fields.keys().copied().collect()
    }

    #[must_use]
    pub fn count_values(&self, field: u32) -> usize {
        self.fields.get(&field).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn values(&self, field: u32) -> &[FieldEntry] {
        self.fields.get(&field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn first_value(&self, field: u32) -> Option<&FieldValue> {
        self.fields.get(&field)?.first().map(|e| &e.value)
    }

    /// Replaces the value at `index`, keeping its position.
    pub fn set_value(&mut self, field: u32, index: usize, attributes: u32, value: FieldValue) {
        if let Some(entries) = self.fields.get_mut(&field)
            && let Some(entry) = entries.get_mut(index)
        {
            *entry = FieldEntry { attributes, value };
        }
    }

    /// Removes the value at `index`; drops the field when it empties.
    pub fn remove_value(&mut self, field: u32, index: usize) {
        if let Some(entries) = self.fields.get_mut(&field) {
            if index < entries.len() {
                entries.remove(index);
            }
            if entries.is_empty() {
                self.fields.remove(&field);
            }
        }
    }

    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.push(category.into());
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn repeat(&self) -> Option<&RepeatRule> {
        self.repeat.as_ref()
    }

    pub fn set_repeat(&mut self, rule: RepeatRule) {
        self.repeat = Some(rule);
    }

    pub fn repeat_mut(&mut self) -> Option<&mut RepeatRule> {
        self.repeat.as_mut()
    }
}
