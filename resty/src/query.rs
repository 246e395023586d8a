//! Filter vocabulary carried from the request to `selectMany`
//!
//! The router never evaluates a [`Query`]; it is produced by the configured
//! query extractor and handed to the adapter as is.
//!
//! # Example
//!
//! ```rust
//! use resty::query::{Condition, Filter, Query};
//! use serde_json::json;
//!
//! let query = Query::new()
//!     .with_condition(Condition::new("name", Filter::StringStartsWith, json!("mar")))
//!     .with_condition(Condition::new("age", Filter::NumberGreaterThan, json!(18)));
//!
//! assert_eq!(query.conditions().len(), 2);
//! assert_eq!(Filter::StringStartsWith.to_string(), "stringStartsWith");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::ExtractorError;

/// Predicate kinds a condition can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    /// String field contains the value
    StringContains,
    /// String field does not contain the value
    StringDoesNotContain,
    /// String field equals the value
    StringExactlyMatches,
    /// String field differs from the value
    StringDoesNotExactlyMatch,
    /// String field starts with the value
    StringStartsWith,
    /// String field does not start with the value
    StringDoesNotStartWith,
    /// String field ends with the value
    StringEndsWith,
    /// String field does not end with the value
    StringDoesNotEndWith,
    /// Number field is greater than the value
    NumberGreaterThan,
    /// Number field is less than the value
    NumberLessThan,
    /// Number field equals the value
    NumberEquals,
    /// Number field differs from the value
    NumberDoesNotEqual,
    /// Date/time field is after the value
    DateTimeAfter,
    /// Date/time field is before the value
    DateTimeBefore,
    /// Date/time field equals the value
    DateTimeEquals,
    /// Boolean field is true
    BooleanTrue,
    /// Boolean field is false
    BooleanFalse,
    /// Field is present
    Exists,
    /// Field is absent
    DoesNotExist,
}

impl Filter {
    /// Every filter, in declaration order
    pub const ALL: [Filter; 19] = [
        Self::StringContains,
        Self::StringDoesNotContain,
        Self::StringExactlyMatches,
        Self::StringDoesNotExactlyMatch,
        Self::StringStartsWith,
        Self::StringDoesNotStartWith,
        Self::StringEndsWith,
        Self::StringDoesNotEndWith,
        Self::NumberGreaterThan,
        Self::NumberLessThan,
        Self::NumberEquals,
        Self::NumberDoesNotEqual,
        Self::DateTimeAfter,
        Self::DateTimeBefore,
        Self::DateTimeEquals,
        Self::BooleanTrue,
        Self::BooleanFalse,
        Self::Exists,
        Self::DoesNotExist,
    ];

    /// Wire name, as accepted by serde
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StringContains => "stringContains",
            Self::StringDoesNotContain => "stringDoesNotContain",
            Self::StringExactlyMatches => "stringExactlyMatches",
            Self::StringDoesNotExactlyMatch => "stringDoesNotExactlyMatch",
            Self::StringStartsWith => "stringStartsWith",
            Self::StringDoesNotStartWith => "stringDoesNotStartWith",
            Self::StringEndsWith => "stringEndsWith",
            Self::StringDoesNotEndWith => "stringDoesNotEndWith",
            Self::NumberGreaterThan => "numberGreaterThan",
            Self::NumberLessThan => "numberLessThan",
            Self::NumberEquals => "numberEquals",
            Self::NumberDoesNotEqual => "numberDoesNotEqual",
            Self::DateTimeAfter => "dateTimeAfter",
            Self::DateTimeBefore => "dateTimeBefore",
            Self::DateTimeEquals => "dateTimeEquals",
            Self::BooleanTrue => "booleanTrue",
            Self::BooleanFalse => "booleanFalse",
            Self::Exists => "exists",
            Self::DoesNotExist => "doesNotExist",
        }
    }

    /// Label suitable for a filter picker
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StringContains => "(String) Contains",
            Self::StringDoesNotContain => "(String) Does not contain",
            Self::StringExactlyMatches => "(String) Exactly matches",
            Self::StringDoesNotExactlyMatch => "(String) Does not exactly match",
            Self::StringStartsWith => "(String) Starts with",
            Self::StringDoesNotStartWith => "(String) Does not start with",
            Self::StringEndsWith => "(String) Ends with",
            Self::StringDoesNotEndWith => "(String) Does not end with",
            Self::NumberGreaterThan => "(Number) Greater than",
            Self::NumberLessThan => "(Number) Less than",
            Self::NumberEquals => "(Number) Equals",
            Self::NumberDoesNotEqual => "(Number) Does not equal",
            Self::DateTimeAfter => "(Date/time) After",
            Self::DateTimeBefore => "(Date/time) Before",
            Self::DateTimeEquals => "(Date/time) Equals",
            Self::BooleanTrue => "(Boolean) Is true",
            Self::BooleanFalse => "(Boolean) Is false",
            Self::Exists => "Exists",
            Self::DoesNotExist => "Does not exist",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filter predicate, optionally chained to a nested predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field the predicate applies to
    pub field: String,
    /// Operand; ignored by value-less filters such as [`Filter::Exists`]
    #[serde(default)]
    pub value: Value,
    /// Predicate kind
    pub condition: Filter,
    /// Nested predicate, interpreted by the adapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<Condition>>,
}

impl Condition {
    /// Create a condition without a nested predicate
    pub fn new(field: impl Into<String>, condition: Filter, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
            condition,
            nested: None,
        }
    }

    /// Attach a nested predicate
    #[must_use]
    pub fn with_nested(mut self, nested: Condition) -> Self {
        self.nested = Some(Box::new(nested));
        self
    }

    /// Depth of the nested chain, 1 for a lone condition
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.nested.as_ref().map_or(0, |n| n.depth())
    }
}

/// Ordered filter conditions for `selectMany`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Conditions in evaluation order, `None` when the client sent none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

impl Query {
    /// An empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.get_or_insert_with(Vec::new).push(condition);
        self
    }

    /// The conditions in order, empty when none were given
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        self.conditions.as_deref().unwrap_or_default()
    }

    /// Whether the query carries no condition
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions().is_empty()
    }
}

/// Query extractor that reads the raw source as a serialized [`Query`]
///
/// Suited to a JSON body or a header carrying a JSON document. A source
/// without a `conditions` key yields an empty query.
///
/// # Example
///
/// ```rust
/// use resty::query;
/// use serde_json::json;
///
/// let parsed = query::identity(&json!({
///     "conditions": [{ "field": "name", "value": "marco", "condition": "stringExactlyMatches" }]
/// }))
/// .unwrap();
/// assert_eq!(parsed.conditions().len(), 1);
///
/// assert!(query::identity(&json!({ "conditions": "name=marco" })).is_err());
/// ```
pub fn identity(raw: &Value) -> Result<Query, ExtractorError> {
    match raw {
        Value::Null => Ok(Query::default()),
        _ => Query::deserialize(raw)
            .map_err(|e| ExtractorError::new(format!("invalid query: {e}"))),
    }
}
