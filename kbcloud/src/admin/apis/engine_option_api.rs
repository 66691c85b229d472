use http::Method;
use kbcloud_common::client::decode_response;
use kbcloud_common::{ApiClient, ApiResponse, Decoded, Error, ReqwestTransport, Transport};

use crate::admin::models::EngineOptionHistoryList;

pub struct EngineOptionApi<'a, T = ReqwestTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> EngineOptionApi<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// list_engine_option_history: GET /admin/v1/engineOptions/{engineName}/history
    pub async fn list_engine_option_history(
        &self,
        engine_name: &str,
    ) -> Result<ApiResponse<Decoded<EngineOptionHistoryList>>, Error> {
        let request = self.client.prepare_request(
            "EngineOptionApi.list_engine_option_history",
            Method::GET,
            &["admin", "v1", "engineOptions", engine_name, "history"],
            &[],
            None,
        )?;
        let response = self.client.call_api(request).await?;
        decode_response(response)
    }
}
