//! Client for the KB Cloud management API.
//!
//! Operations live on per-area API structs borrowing an
//! [`ApiClient`]; admin operations are under [`admin`]. Every response
//! model is returned as a [`Decoded`] value, which holds the raw JSON
//! object instead of the typed model when the server sent something this
//! client does not understand, such as an enum value added later.
//!
//! ```no_run
//! # async fn run() -> Result<(), kbcloud::Error> {
//! use kbcloud::apis::{BackupRepoApi, ListBackupReposOptionalParameters};
//!
//! let client = kbcloud::ApiClient::new(kbcloud::Configuration::from_env())?;
//! let repos = BackupRepoApi::new(&client)
//!     .list_backup_repos(ListBackupReposOptionalParameters::new().with_page_size(20))
//!     .await?;
//! if let Some(list) = repos.value.valid() {
//!     for repo in list.items().iter().filter_map(kbcloud::Decoded::valid) {
//!         println!("{}", repo.name());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod apis;
pub mod models;

pub use kbcloud_common::{
    ApiClient, ApiError, ApiResponse, Configuration, DecodeError, Decoded, Error, Model,
};
