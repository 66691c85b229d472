use chrono::{DateTime, FixedOffset};
use kbcloud_common::{AdditionalProperties, Decoded};
use kbcloud_macro::Model;
use serde_json::Value;

/// The recorded revisions of an engine's options.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct EngineOptionHistoryList {
    items: Vec<Decoded<EngineOptionHistory>>,
    pub additional_properties: AdditionalProperties,
}

/// One revision of an engine's options.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct EngineOptionHistory {
    engine_name: String,
    id: Option<String>,
    version: Option<String>,
    created_at: Option<DateTime<FixedOffset>>,
    /// The options document as it was stored, kept verbatim.
    content: Option<Value>,
    pub additional_properties: AdditionalProperties,
}
