//! gdrive_provider - Google Drive files, folders and shortcuts as declarative
//! resources.
//!
//! This library provides:
//! - the `gdrive_file` resource (create, read, delete) and data source (read)
//! - attribute schemas with conflict and enum validation
//! - local content-type sniffing and MD5 drift detection for source files
//!
//! # Example
//!
//! ```no_run
//! use gdrive_provider::{FileConfig, FileResource, ProviderConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ProviderConfig {
//!         credentials: Some("service-account.json".into()),
//!         ..Default::default()
//!     };
//!     let client = config.configure()?;
//!
//!     let declared = FileConfig::from_value(&json!({
//!         "name": "docs",
//!         "type": "folder",
//!         "parents": ["0AFolderParent"]
//!     }))?;
//!     let state = FileResource::new(&client).create(&declared).await?;
//!     println!("{}", state.id);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod content;
pub mod data_source_file;
pub mod error;
pub mod models;
pub mod resource_file;
pub mod schema;
pub mod sniff;
pub mod url_parser;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::{DriveApi, DriveClient, Media};
pub use config::ProviderConfig;
pub use data_source_file::{FileDataSource, FileLookup};
pub use error::{DriveError, Result};
pub use models::{DriveFile, ItemType};
pub use resource_file::{FileConfig, FileResource, FileState};
pub use url_parser::extract_id;
