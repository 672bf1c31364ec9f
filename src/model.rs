// src/model.rs
// Index and shard records, plus dataset decoding and validation

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReportError, Result};

/// One logical index in the target cluster.
///
/// Records are built once during ingestion and never mutated afterwards.
/// Deserialization goes through [`RawIndex`] so every decoded record has
/// `total_shards` filled in and satisfies the per-record rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndex")]
pub struct IndexInfo {
    pub name: String,
    pub primaries: u32,
    pub replicas: u32,
    pub total_shards: u32,
    pub size_bytes: u64,
    pub doc_count: u64,
    pub shards: Vec<ShardInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShard")]
pub struct ShardInfo {
    pub id: i64,
    pub primary: bool,
    pub size_bytes: u64,
    pub doc_count: u64,
}

impl IndexInfo {
    /// Shard sizes in reported order
    pub fn shard_sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.shards.iter().map(|s| s.size_bytes)
    }
}

// Wire shape. Accepts the canonical field names as well as the
// `_cat/indices` column names, with numbers encoded either way.
#[derive(Deserialize)]
struct RawIndex {
    #[serde(alias = "index")]
    name: String,
    #[serde(default, alias = "pri", deserialize_with = "lenient::number")]
    primaries: Option<u32>,
    #[serde(default, alias = "rep", deserialize_with = "lenient::number")]
    replicas: Option<u32>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_shards: Option<u32>,
    #[serde(default, alias = "store.size", deserialize_with = "lenient::number")]
    size_bytes: Option<u64>,
    #[serde(default, alias = "docs.count", deserialize_with = "lenient::number")]
    doc_count: Option<u64>,
    #[serde(default)]
    shards: Option<Vec<ShardInfo>>,
}

#[derive(Deserialize)]
struct RawShard {
    #[serde(deserialize_with = "lenient::required")]
    id: i64,
    #[serde(default)]
    primary: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    size_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::number")]
    doc_count: Option<u64>,
}

impl TryFrom<RawShard> for ShardInfo {
    type Error = String;

    fn try_from(raw: RawShard) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id,
            primary: raw.primary,
            size_bytes: raw.size_bytes.unwrap_or(0),
            doc_count: raw.doc_count.unwrap_or(0),
        })
    }
}

impl TryFrom<RawIndex> for IndexInfo {
    type Error = String;

    fn try_from(raw: RawIndex) -> std::result::Result<Self, Self::Error> {
        if raw.name.is_empty() {
            return Err("index name must not be empty".to_string());
        }
        let name = raw.name;
        let primaries = raw.primaries.unwrap_or(0);
        let replicas = raw.replicas.unwrap_or(0);

        let total_shards = match raw.total_shards {
            Some(n) => n,
            None => replicas
                .checked_add(1)
                .and_then(|copies| primaries.checked_mul(copies))
                .ok_or_else(|| format!("index {name:?}: shard count overflows"))?,
        };

        let shards = raw.shards.unwrap_or_default();
        let mut ids = HashSet::with_capacity(shards.len());
        for shard in &shards {
            if !ids.insert(shard.id) {
                return Err(format!("index {name:?}: duplicate shard id {}", shard.id));
            }
        }

        let size_bytes = raw.size_bytes.unwrap_or(0);
        let shard_total: u128 = shards.iter().map(|s| u128::from(s.size_bytes)).sum();
        if shard_total > u128::from(size_bytes) {
            return Err(format!(
                "index {name:?}: shards add up to {shard_total} bytes but size_bytes is {size_bytes}"
            ));
        }

        Ok(Self {
            name,
            primaries,
            replicas,
            total_shards,
            size_bytes,
            doc_count: raw.doc_count.unwrap_or(0),
            shards,
        })
    }
}

/// Decode a bare JSON array of index records (the file format).
pub fn decode_array(bytes: &[u8], input: &str) -> Result<Vec<IndexInfo>> {
    let indexes: Vec<IndexInfo> =
        serde_json::from_slice(bytes).map_err(|e| ReportError::json(input, e))?;
    validate_dataset(indexes, input)
}

/// Decode an endpoint response: either a bare array or `{"indexes": [...]}`.
pub fn decode_payload(bytes: &[u8], input: &str) -> Result<Vec<IndexInfo>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ReportError::json(input, e))?;

    let records = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("indexes") {
            Some(Value::Array(items)) => Value::Array(items),
            Some(_) => {
                return Err(ReportError::invalid(input, "`indexes` is not an array"));
            }
            None => {
                return Err(ReportError::invalid(
                    input,
                    "expected an array or an object with an `indexes` array",
                ));
            }
        },
        _ => {
            return Err(ReportError::invalid(
                input,
                "expected an array or an object with an `indexes` array",
            ));
        }
    };

    let indexes: Vec<IndexInfo> =
        serde_json::from_value(records).map_err(|e| ReportError::json(input, e))?;
    validate_dataset(indexes, input)
}

/// Dataset-level rules that a single record cannot check: names are unique.
pub fn validate_dataset(indexes: Vec<IndexInfo>, input: &str) -> Result<Vec<IndexInfo>> {
    let mut seen = HashSet::with_capacity(indexes.len());
    for index in &indexes {
        if !seen.insert(index.name.as_str()) {
            return Err(ReportError::invalid(
                input,
                format!("duplicate index name {:?}", index.name),
            ));
        }
    }
    Ok(indexes)
}

mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    /// JSON number, decimal string, or null. Blank strings count as absent.
    pub fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match Option::<NumberOrText<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(n)) => Ok(Some(n)),
            Some(NumberOrText::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse()
                    .map(Some)
                    .map_err(|e| de::Error::custom(format!("invalid number {text:?}: {e}")))
            }
        }
    }

    pub fn required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        number(deserializer)?.ok_or_else(|| de::Error::custom("missing number"))
    }
}
