//! Data models for Google Drive API requests and responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DriveError;

/// MIME type Google Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// MIME type Google Drive assigns to shortcuts.
pub const SHORTCUT_MIME_TYPE: &str = "application/vnd.google-apps.shortcut";

/// A file, folder or shortcut as exchanged with the `files` endpoints.
///
/// The same record is used for creation requests and responses: empty
/// fields are left out of requests and default when a response omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5_checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut_details: Option<ShortcutDetails>,
}

impl DriveFile {
    /// Coarse type label derived from the MIME type.
    pub fn item_type(&self) -> Option<ItemType> {
        self.mime_type.as_deref().and_then(ItemType::from_mime_type)
    }
}

impl fmt::Display for DriveFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mime = self.mime_type.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}", self.id, mime, self.name)
    }
}

/// Shortcut-specific metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutDetails {
    pub target_id: String,
}

/// Google Drive system item types that can be declared instead of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Folder,
    Shortcut,
}

impl ItemType {
    /// Every declarable type label, in schema order.
    pub const NAMES: &'static [&'static str] = &["folder", "shortcut"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Folder => "folder",
            ItemType::Shortcut => "shortcut",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ItemType::Folder => FOLDER_MIME_TYPE,
            ItemType::Shortcut => SHORTCUT_MIME_TYPE,
        }
    }

    /// Map a Drive MIME type back to its type label, if it has one.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            FOLDER_MIME_TYPE => Some(ItemType::Folder),
            SHORTCUT_MIME_TYPE => Some(ItemType::Shortcut),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(ItemType::Folder),
            "shortcut" => Ok(ItemType::Shortcut),
            other => Err(DriveError::validation(format!(
                "\"type\" must be any one of [\"folder\" \"shortcut\"], got: {:?}",
                other
            ))),
        }
    }
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from JSON file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
