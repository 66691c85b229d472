use kbcloud_common::{AdditionalProperties, Decoded};
use kbcloud_macro::Model;

/// A parameter template as returned by the server.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct ParamTplGet {
    items: Option<Vec<Decoded<ParamTplGetItem>>>,
    pub additional_properties: AdditionalProperties,
}

/// One parameter of a template.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct ParamTplGetItem {
    name: String,
    value: Option<String>,
    description: Option<String>,
    pub additional_properties: AdditionalProperties,
}
