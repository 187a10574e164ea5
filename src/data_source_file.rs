//! The `gdrive_file` data source: look up an existing item by ID.

use serde::Serialize;
use serde_json::Value;

use crate::client::DriveApi;
use crate::error::{DriveError, Result};
use crate::models::ItemType;
use crate::schema::FILE_DATA_SOURCE;
use crate::url_parser::is_valid_id;

/// Fields requested for a lookup.
pub const LOOKUP_FIELDS: &str = "id, parents, mimeType, md5Checksum, name, driveId, shortcutDetails";

/// Attributes the data source exposes for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileLookup {
    pub id: String,
    pub real_id: String,
    pub name: String,
    pub target_id: Option<String>,
    pub drive_id: Option<String>,
    pub md5_checksum: Option<String>,
    pub mime_type: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    pub parents: Vec<String>,
    pub real_parents: Vec<String>,
}

pub struct FileDataSource<'a, A: DriveApi> {
    api: &'a A,
}

impl<'a, A: DriveApi> FileDataSource<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn read(&self, id: &str) -> Result<FileLookup> {
        let file = self.api.get_file(id, LOOKUP_FIELDS).await?;

        let item_type = file.item_type();
        let target_id = match item_type {
            Some(ItemType::Shortcut) => file.shortcut_details.map(|details| details.target_id),
            _ => None,
        };

        Ok(FileLookup {
            id: file.id.clone(),
            real_id: file.id,
            name: file.name,
            target_id,
            drive_id: file.drive_id,
            md5_checksum: file.md5_checksum,
            mime_type: file.mime_type,
            item_type,
            parents: file.parents.clone(),
            real_parents: file.parents,
        })
    }
}

/// Validate a data source declaration and return the requested ID.
pub fn lookup_id(config: &Value) -> Result<String> {
    FILE_DATA_SOURCE.validate(config)?;
    let id = config["id"]
        .as_str()
        .ok_or_else(|| DriveError::validation("\"id\": expected string"))?;
    if !is_valid_id(id) {
        return Err(DriveError::validation(format!(
            "\"id\": {:?} is not a valid item ID",
            id
        )));
    }
    Ok(id.to_string())
}
