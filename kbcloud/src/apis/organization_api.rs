use http::Method;
use kbcloud_common::client::expect_empty;
use kbcloud_common::{ApiClient, ApiResponse, Error, Model, ReqwestTransport, Transport};

use crate::models::OrgUpdate;

pub struct OrganizationApi<'a, T = ReqwestTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> OrganizationApi<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// update_org: PATCH /api/v1/organizations/{orgName}
    pub async fn update_org(&self, org_name: &str, body: &OrgUpdate) -> Result<ApiResponse<()>, Error> {
        let request = self.client.prepare_request(
            "OrganizationApi.update_org",
            Method::PATCH,
            &["api", "v1", "organizations", org_name],
            &[],
            Some(body.to_json()?),
        )?;
        let response = self.client.call_api(request).await?;
        expect_empty(response)
    }
}
