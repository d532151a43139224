//! Trace record schema and line-level parse/serialize helpers.
//!
//! Each line of a trace file is one standalone JSON object describing a
//! single stored-procedure invocation. Parameter slots are nullable: a JSON
//! `null` means the value was never captured. Fields we do not interpret
//! (timestamps, weights, site ids) are carried through a flattened map so a
//! reconstructed record round-trips without losing them.

use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One top-level procedure invocation with its nested query invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Procedure identifier
    #[serde(rename = "CATALOG_NAME")]
    pub catalog_name: String,

    /// Trace identifier (not guaranteed unique across files)
    #[serde(rename = "ID")]
    pub id: i64,

    /// Ordered, index-addressed parameter slots; `Value::Null` = unset
    #[serde(default)]
    pub params: Vec<Value>,

    /// Nested query invocations, insertion order = execution order
    #[serde(default)]
    pub queries: Vec<Query>,

    /// Uninterpreted fields, preserved verbatim across a round trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One nested statement invocation within a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Statement identifier
    pub name: String,

    /// Ordered parameter slots; `Value::Null` = unset
    #[serde(default)]
    pub params: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The two fields every record carries, used as a cheap pre-filter
/// before deciding whether a full parse is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordHeader {
    #[serde(rename = "CATALOG_NAME")]
    pub catalog_name: String,

    #[serde(rename = "ID")]
    pub id: i64,
}

impl Transaction {
    /// Parse one trace line into a full transaction record
    ///
    /// **Public** - used by commands that inspect or mutate parameters
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(line)?)
    }

    /// All nested queries with the given name, in execution order
    ///
    /// A transaction may invoke the same statement several times; callers
    /// that care about which instance supplied a value must respect the
    /// iteration order here.
    pub fn queries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Query> + 'a {
        self.queries.iter().filter(move |q| q.name == name)
    }

    /// Serialize back to a single-line JSON document
    pub fn to_line(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON for human inspection
    pub fn to_pretty(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl RecordHeader {
    /// Parse only the header fields of a trace line
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Whether a parameter slot holds a captured value
///
/// **Public** - shared definition of "set" for the whole crate
pub fn is_set(slot: &Value) -> bool {
    !slot.is_null()
}
