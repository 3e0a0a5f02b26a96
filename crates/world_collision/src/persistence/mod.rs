//! Named-field state records
//!
//! A [`Record`] is an ordered list of keyed values. Keys may repeat; nested
//! records with the same key are read back in the order they were written,
//! which is how a shape stores its list of cubes.

use serde::{Deserialize, Serialize};

use crate::foundation::math::WorldVec;

/// Errors raised while restoring state from a [`Record`]
#[derive(thiserror::Error, Debug)]
pub enum StateError {
    /// A required field is absent
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A field is present but holds another kind of value
    #[error("field '{key}' is not a {expected}")]
    WrongType {
        /// Key of the field
        key: String,
        /// Kind of value that was expected
        expected: &'static str,
    },

    /// The shape offset string could not be parsed
    #[error("malformed offset '{0}'")]
    MalformedOffset(String),

    /// Fewer nested records than announced
    #[error("expected {expected} '{key}' records, found {found}")]
    MissingRecords {
        /// Key of the nested records
        key: String,
        /// Announced count
        expected: usize,
        /// Records actually present
        found: usize,
    },

    /// A count field is negative or too large
    #[error("invalid count {value} in field '{key}'")]
    InvalidCount {
        /// Key of the field
        key: String,
        /// Stored value
        value: i64,
    },

    /// RON encoding or decoding failed
    #[error("RON error: {0}")]
    Ron(String),
}

/// A single stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Free-form text
    Str(String),
    /// Integer 3D vector
    Vector(WorldVec),
    /// Nested record
    Record(Record),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Vector(_) => "vector",
            Self::Record(_) => "record",
        }
    }
}

/// Ordered collection of keyed values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored fields, nested records included
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record holds no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a field with this key exists
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    fn put(&mut self, key: &str, value: Value) {
        self.fields.push((key.to_string(), value));
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn require(&self, key: &str) -> Result<&Value, StateError> {
        self.get(key).ok_or_else(|| StateError::MissingField(key.to_string()))
    }

    fn wrong_type(key: &str, expected: &'static str, found: &Value) -> StateError {
        log::debug!("field '{}' holds a {}, expected {}", key, found.kind(), expected);
        StateError::WrongType {
            key: key.to_string(),
            expected,
        }
    }

    /// Append a boolean
    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, Value::Bool(value));
    }

    /// Append an integer
    pub fn put_int(&mut self, key: &str, value: i64) {
        self.put(key, Value::Int(value));
    }

    /// Append a string
    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.put(key, Value::Str(value.into()));
    }

    /// Append a vector
    pub fn put_vector(&mut self, key: &str, value: WorldVec) {
        self.put(key, Value::Vector(value));
    }

    /// Append a nested record
    pub fn put_record(&mut self, key: &str, value: Record) {
        self.put(key, Value::Record(value));
    }

    /// Read a boolean
    pub fn get_bool(&self, key: &str) -> Result<bool, StateError> {
        match self.require(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(Self::wrong_type(key, "bool", other)),
        }
    }

    /// Read a boolean that may be absent
    pub fn get_bool_opt(&self, key: &str) -> Result<Option<bool>, StateError> {
        if self.contains(key) {
            self.get_bool(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Read an integer
    pub fn get_int(&self, key: &str) -> Result<i64, StateError> {
        match self.require(key)? {
            Value::Int(i) => Ok(*i),
            other => Err(Self::wrong_type(key, "int", other)),
        }
    }

    /// Read a string
    pub fn get_string(&self, key: &str) -> Result<&str, StateError> {
        match self.require(key)? {
            Value::Str(s) => Ok(s.as_str()),
            other => Err(Self::wrong_type(key, "string", other)),
        }
    }

    /// Read a string that may be absent
    pub fn get_string_opt(&self, key: &str) -> Result<Option<&str>, StateError> {
        if self.contains(key) {
            self.get_string(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Read a vector
    pub fn get_vector(&self, key: &str) -> Result<WorldVec, StateError> {
        match self.require(key)? {
            Value::Vector(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "vector", other)),
        }
    }

    /// Read the first nested record stored under `key`
    pub fn get_record(&self, key: &str) -> Result<&Record, StateError> {
        match self.require(key)? {
            Value::Record(r) => Ok(r),
            other => Err(Self::wrong_type(key, "record", other)),
        }
    }

    /// All nested records stored under `key`, in write order
    pub fn records<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.fields.iter().filter_map(move |(k, v)| match v {
            Value::Record(r) if k == key => Some(r),
            _ => None,
        })
    }

    /// Encode as pretty-printed RON
    pub fn to_ron(&self) -> Result<String, StateError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| StateError::Ron(e.to_string()))
    }

    /// Decode from RON text
    pub fn from_ron(text: &str) -> Result<Self, StateError> {
        ron::from_str(text).map_err(|e| StateError::Ron(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let mut record = Record::new();
        record.put_bool("flag", true);
        record.put_int("num", 3);
        record.put_string("name", "crate");
        record.put_vector("corner", WorldVec::new(1, 2, 3));

        assert!(record.get_bool("flag").unwrap());
        assert_eq!(record.get_int("num").unwrap(), 3);
        assert_eq!(record.get_string("name").unwrap(), "crate");
        assert_eq!(record.get_vector("corner").unwrap(), WorldVec::new(1, 2, 3));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_missing_and_wrong_type() {
        let mut record = Record::new();
        record.put_int("num", 1);

        assert!(matches!(record.get_int("other"), Err(StateError::MissingField(_))));
        assert!(matches!(record.get_bool("num"), Err(StateError::WrongType { .. })));
        assert_eq!(record.get_bool_opt("flag").unwrap(), None);
        assert!(record.get_string_opt("num").is_err());
    }

    #[test]
    fn test_repeated_records_keep_order() {
        let mut record = Record::new();
        for i in 0..3 {
            let mut nested = Record::new();
            nested.put_int("index", i);
            record.put_record("cube", nested);
        }

        let indices: Vec<i64> = record
            .records("cube")
            .map(|r| r.get_int("index").unwrap())
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(record.get_record("cube").unwrap().get_int("index").unwrap(), 0);
    }

    #[test]
    fn test_ron_text_preserves_fields() {
        let mut nested = Record::new();
        nested.put_vector("p", WorldVec::new(-4, 0, 9));
        let mut record = Record::new();
        record.put_string("offset", "3 -2");
        record.put_record("cube", nested);

        let text = record.to_ron().unwrap();
        let decoded = Record::from_ron(&text).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_bad_ron_is_an_error() {
        assert!(matches!(Record::from_ron("not ron ("), Err(StateError::Ron(_))));
    }
}
