use http::Method;
use kbcloud_common::client::decode_response;
use kbcloud_common::{ApiClient, ApiResponse, Decoded, Error, ReqwestTransport, Transport};

use crate::models::BackupRepoList;

/// Optional query parameters of [`BackupRepoApi::list_backup_repos`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBackupReposOptionalParameters {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListBackupReposOptionalParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(v) = &self.page {
            query.push(("page", v.to_string()));
        }
        if let Some(v) = &self.page_size {
            query.push(("pageSize", v.to_string()));
        }
        query
    }
}

pub struct BackupRepoApi<'a, T = ReqwestTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> BackupRepoApi<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// list_backup_repos: GET /api/v1/backupRepos
    pub async fn list_backup_repos(
        &self,
        params: ListBackupReposOptionalParameters,
    ) -> Result<ApiResponse<Decoded<BackupRepoList>>, Error> {
        let request = self.client.prepare_request(
            "BackupRepoApi.list_backup_repos",
            Method::GET,
            &["api", "v1", "backupRepos"],
            &params.query(),
            None,
        )?;
        let response = self.client.call_api(request).await?;
        decode_response(response)
    }
}
