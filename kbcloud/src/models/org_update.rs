use kbcloud_common::AdditionalProperties;
use kbcloud_macro::Model;

/// The organization fields that can be changed after creation.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct OrgUpdate {
    /// Free-form description of the organization.
    description: Option<String>,
    /// Name shown in the console.
    display_name: Option<String>,
    pub additional_properties: AdditionalProperties,
}
