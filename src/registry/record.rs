use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use std::io::Write;

use super::doi::Doi;
use super::RegistryError;

/// Top-level key of the mandatory identification block
pub const META_INFO_KEY: &str = "meta_info";

/// Keys `meta_info` must contain, and nothing else
pub const META_INFO_KEYS: [&str; 3] = ["version", "doi", "Archived time"];

/// Timestamp layout of `Archived time`
pub const ARCHIVED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identification block stored at the top of every warehouse record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    /// Record version, 0 for the first registration
    pub version: u64,

    /// Record identifier
    pub doi: Doi,

    /// Local time the record was archived, second precision
    #[serde(rename = "Archived time", with = "archived_time")]
    pub archived_time: NaiveDateTime,
}

impl MetaInfo {
    /// Version 0 identification archived now
    pub fn new(doi: Doi) -> Self {
        Self {
            version: 0,
            doi,
            archived_time: now(),
        }
    }

    /// Validate a raw `meta_info` value and convert it
    pub fn from_value(value: &Value) -> Result<Self, RegistryError> {
        let map = value
            .as_object()
            .ok_or_else(|| RegistryError::invalid("'meta_info' must be an object"))?;

        let mut problems = Vec::new();
        for key in META_INFO_KEYS {
            if !map.contains_key(key) {
                problems.push(format!("'meta_info' is missing '{}'", key));
            }
        }
        for key in map.keys() {
            if !META_INFO_KEYS.contains(&key.as_str()) {
                problems.push(format!("'meta_info' has unexpected key '{}'", key));
            }
        }
        if !problems.is_empty() {
            return Err(RegistryError::Validation(problems));
        }

        let version = map["version"]
            .as_u64()
            .ok_or_else(|| RegistryError::invalid("'version' must be a non-negative integer"))?;
        let doi = map["doi"]
            .as_str()
            .ok_or_else(|| RegistryError::invalid("'doi' must be a string"))?
            .parse::<Doi>()
            .map_err(|e| RegistryError::invalid(e.to_string()))?;
        let archived_time = map["Archived time"]
            .as_str()
            .and_then(|s| NaiveDateTime::parse_from_str(s, ARCHIVED_TIME_FORMAT).ok())
            .ok_or_else(|| {
                RegistryError::invalid("'Archived time' must be formatted as YYYY-MM-DD HH:MM:SS")
            })?;

        Ok(Self {
            version,
            doi,
            archived_time,
        })
    }
}

/// Current local time truncated to whole seconds
pub(crate) fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// A metadata document: `meta_info` followed by caller-supplied sections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    /// Identification block
    pub meta_info: MetaInfo,

    /// Domain metadata, written at the top level next to `meta_info`
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl MetadataRecord {
    /// New version 0 record for `body`.
    ///
    /// Any `meta_info` key already present in `body` is dropped.
    pub fn new(doi: Doi, body: Map<String, Value>) -> Self {
        Self {
            meta_info: MetaInfo::new(doi),
            body: strip_meta_info(body),
        }
    }

    /// Identifier
    pub fn doi(&self) -> &Doi {
        &self.meta_info.doi
    }

    /// Version
    pub fn version(&self) -> u64 {
        self.meta_info.version
    }

    /// Validate a parsed JSON document and convert it
    pub fn from_value(value: Value) -> Result<Self, RegistryError> {
        let Value::Object(map) = value else {
            return Err(RegistryError::invalid("record must be a JSON object"));
        };

        let mut meta_info = None;
        let mut body = Map::new();
        for (key, value) in map {
            if key == META_INFO_KEY {
                meta_info = Some(value);
            } else {
                body.insert(key, value);
            }
        }

        let meta_info = meta_info
            .ok_or_else(|| RegistryError::invalid("record has no 'meta_info' block"))?;
        Ok(Self {
            meta_info: MetaInfo::from_value(&meta_info)?,
            body,
        })
    }

    /// Copy with the next version number, same identifier, archived now
    pub fn next_version(&self, body: Map<String, Value>) -> Self {
        Self {
            meta_info: MetaInfo {
                version: self.meta_info.version + 1,
                doi: self.meta_info.doi.clone(),
                archived_time: now(),
            },
            body: strip_meta_info(body),
        }
    }

    /// Serialize as a JSON value
    pub fn to_value(&self) -> Result<Value, RegistryError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Write as pretty-printed JSON with a 4-space indent
    pub fn write_pretty<W: Write>(&self, writer: W) -> Result<(), RegistryError> {
        let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// Pretty-printed JSON text, as stored in the warehouse
    pub fn to_pretty_string(&self) -> Result<String, RegistryError> {
        let mut buffer = Vec::new();
        self.write_pretty(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| RegistryError::invalid(e.to_string()))
    }
}

fn strip_meta_info(body: Map<String, Value>) -> Map<String, Value> {
    body.into_iter().filter(|(key, _)| key != META_INFO_KEY).collect()
}

mod archived_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ARCHIVED_TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(ARCHIVED_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, ARCHIVED_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
