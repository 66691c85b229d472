use http::Method;
use kbcloud_common::client::{decode_response, expect_empty};
use kbcloud_common::{ApiClient, ApiResponse, Decoded, Error, ReqwestTransport, Transport};

use crate::admin::models::Backup;

pub struct BackupApi<'a, T = ReqwestTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> BackupApi<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// get_backup: GET /admin/v1/backups/{backupId}
    pub async fn get_backup(&self, backup_id: &str) -> Result<ApiResponse<Decoded<Backup>>, Error> {
        let request = self.client.prepare_request(
            "BackupApi.get_backup",
            Method::GET,
            &["admin", "v1", "backups", backup_id],
            &[],
            None,
        )?;
        let response = self.client.call_api(request).await?;
        decode_response(response)
    }

    /// delete_backup: DELETE /admin/v1/backups/{backupId}
    pub async fn delete_backup(&self, backup_id: &str) -> Result<ApiResponse<()>, Error> {
        let request = self.client.prepare_request(
            "BackupApi.delete_backup",
            Method::DELETE,
            &["admin", "v1", "backups", backup_id],
            &[],
            None,
        )?;
        let response = self.client.call_api(request).await?;
        expect_empty(response)
    }
}
