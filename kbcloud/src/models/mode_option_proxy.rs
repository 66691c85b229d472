use kbcloud_common::AdditionalProperties;
use kbcloud_macro::Model;

/// Whether an engine mode runs behind a proxy.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct ModeOptionProxy {
    enabled: Option<bool>,
    pub additional_properties: AdditionalProperties,
}
