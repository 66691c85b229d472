use kbcloud_common::AdditionalProperties;
use kbcloud_macro::Model;

/// Paging information returned with list results.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct PageResult {
    /// Number of items across all pages.
    total: i64,
    page: Option<i64>,
    page_size: Option<i64>,
    pub additional_properties: AdditionalProperties,
}
