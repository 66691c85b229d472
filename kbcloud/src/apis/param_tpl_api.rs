use http::Method;
use kbcloud_common::client::decode_response;
use kbcloud_common::{ApiClient, ApiResponse, Decoded, Error, ReqwestTransport, Transport};

use crate::models::ParamTplGet;

pub struct ParamTplApi<'a, T = ReqwestTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> ParamTplApi<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// get_param_tpl: GET /api/v1/organizations/{orgName}/paramTpls/{paramTplName}
    pub async fn get_param_tpl(
        &self,
        org_name: &str,
        param_tpl_name: &str,
    ) -> Result<ApiResponse<Decoded<ParamTplGet>>, Error> {
        let request = self.client.prepare_request(
            "ParamTplApi.get_param_tpl",
            Method::GET,
            &["api", "v1", "organizations", org_name, "paramTpls", param_tpl_name],
            &[],
            None,
        )?;
        let response = self.client.call_api(request).await?;
        decode_response(response)
    }
}
