//! The `gdrive_file` resource: create, read and delete a file, folder or
//! shortcut.
//!
//! Every declared attribute is ForceNew, so there is no update path: a
//! changed declaration is planned as destroy-and-recreate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs::File;
use tracing::{info, warn};

use crate::client::{DriveApi, Media};
use crate::content::{detect_content_type, file_md5_checksum};
use crate::error::{DriveError, Result};
use crate::models::{DriveFile, ItemType, ShortcutDetails};
use crate::schema::FILE_RESOURCE;

/// Fields requested from the create call.
pub const CREATE_FIELDS: &str = "id";

/// Fields requested when refreshing resource state.
pub const READ_FIELDS: &str = "id, parents, mimeType, md5Checksum";

/// Declared (desired) attributes of a `gdrive_file` resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub name: Option<String>,
    pub target_id: Option<String>,
    pub drive_id: Option<String>,
    pub md5_checksum_for_diff: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    pub parents: Option<Vec<String>>,
}

impl FileConfig {
    /// Validate a raw declaration against the resource schema and decode it.
    pub fn from_value(config: &Value) -> Result<Self> {
        FILE_RESOURCE.validate(config)?;
        Ok(serde_json::from_value(config.clone())?)
    }
}

/// Recorded state of a `gdrive_file` resource: the declared attributes as
/// applied plus the values computed by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileState {
    pub id: String,
    #[serde(default)]
    pub real_id: String,
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub drive_id: Option<String>,
    #[serde(default)]
    pub md5_checksum: Option<String>,
    #[serde(default)]
    pub md5_checksum_for_diff: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<ItemType>,
    #[serde(default)]
    pub parents: Option<Vec<String>>,
    #[serde(default)]
    pub real_parents: Vec<String>,
}

impl FileState {
    fn from_config(id: String, config: &FileConfig) -> Self {
        Self {
            id,
            source: config.source.clone(),
            name: config.name.clone(),
            target_id: config.target_id.clone(),
            drive_id: config.drive_id.clone(),
            md5_checksum_for_diff: config.md5_checksum_for_diff.clone(),
            item_type: config.item_type,
            parents: config.parents.clone(),
            ..Default::default()
        }
    }
}

/// Lifecycle callbacks of the `gdrive_file` resource.
pub struct FileResource<'a, A: DriveApi> {
    api: &'a A,
}

impl<'a, A: DriveApi> FileResource<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Create the item and return its refreshed state.
    ///
    /// Once Drive has accepted the item, a failed refresh is reported as
    /// [`DriveError::IncompleteCreate`] carrying the state recorded so far.
    pub async fn create(&self, config: &FileConfig) -> Result<FileState> {
        let (metadata, media) = build_create_request(config).await?;

        let created = self
            .api
            .create_file(&metadata, media, CREATE_FIELDS)
            .await?;
        info!(id = %created.id, name = %metadata.name, "created drive item");

        let mut state = FileState::from_config(created.id, config);
        if let Err(err) = self.read(&mut state).await {
            warn!(id = %state.id, error = %err, "cannot read back created drive item");
            return Err(DriveError::IncompleteCreate {
                state: Box::new(state),
                source: Box::new(err),
            });
        }
        Ok(state)
    }

    /// Refresh the computed attributes of `state` from the API.
    pub async fn read(&self, state: &mut FileState) -> Result<()> {
        let file = self.api.get_file(&state.id, READ_FIELDS).await?;

        state.real_id = file.id;
        state.real_parents = file.parents;
        state.mime_type = file.mime_type;
        state.md5_checksum_for_diff = file.md5_checksum.clone();
        state.md5_checksum = file.md5_checksum;
        Ok(())
    }

    pub async fn delete(&self, state: &FileState) -> Result<()> {
        self.api.delete_file(&state.id).await?;
        info!(id = %state.id, "deleted drive item");
        Ok(())
    }
}

/// Assemble the creation metadata and, when a source is declared, the
/// content to upload. Fails before touching the network.
pub async fn build_create_request(config: &FileConfig) -> Result<(DriveFile, Option<Media>)> {
    let mut metadata = DriveFile {
        name: config.name.clone().unwrap_or_default(),
        drive_id: config.drive_id.clone().filter(|d| !d.is_empty()),
        parents: config.parents.clone().unwrap_or_default(),
        ..Default::default()
    };

    if let Some(item_type) = config.item_type {
        metadata.mime_type = Some(item_type.mime_type().to_string());
        if item_type == ItemType::Shortcut {
            let target_id = config
                .target_id
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    DriveError::validation(
                        "\"target_id\" must be specified if \"type\" is \"shortcut\"",
                    )
                })?;
            metadata.shortcut_details = Some(ShortcutDetails {
                target_id: target_id.to_string(),
            });
        }
    }

    let Some(source) = config.source.as_deref() else {
        if metadata.mime_type.is_none() {
            return Err(DriveError::validation(
                "one of \"source\" or \"type\" must be specified",
            ));
        }
        return Ok((metadata, None));
    };

    let source_error = |source_err| DriveError::SourceFileError {
        path: source.to_path_buf(),
        source: source_err,
    };
    let mut file = File::open(source).await.map_err(source_error)?;
    if metadata.mime_type.is_none() {
        metadata.mime_type = Some(detect_content_type(&mut file).await.map_err(source_error)?);
    }

    let content_type = metadata.mime_type.clone().unwrap_or_default();
    let media = Media::new(file, content_type);
    Ok((metadata, Some(media)))
}

/// Whether a reported change of `md5_checksum_for_diff` should be hidden.
///
/// `old` is the checksum recorded in state. With a source file, the change is
/// hidden only while the local content still hashes to `old`; an unreadable
/// source counts as having no local value.
pub fn suppress_checksum_diff(old: &str, source: Option<&Path>) -> bool {
    let Some(source) = source.filter(|s| !s.as_os_str().is_empty()) else {
        return old.is_empty();
    };

    match file_md5_checksum(source) {
        Ok(local) => local == old,
        Err(err) => {
            warn!(source = %source.display(), error = %err, "cannot checksum source file");
            old.is_empty()
        }
    }
}

/// ForceNew attributes whose declared value differs from `prior`, in schema
/// order. Any entry means the item must be destroyed and recreated.
pub fn plan_replacement(prior: &FileState, config: &FileConfig) -> Vec<&'static str> {
    FILE_RESOURCE
        .force_new_attributes()
        .map(|attribute| attribute.name)
        .filter(|name| match *name {
            "source" => prior.source != config.source,
            "name" => prior.name != config.name,
            "target_id" => prior.target_id != config.target_id,
            "drive_id" => prior.drive_id != config.drive_id,
            "type" => prior.item_type != config.item_type,
            "parents" => prior.parents != config.parents,
            "md5_checksum_for_diff" => {
                let old = prior.md5_checksum_for_diff.as_deref().unwrap_or_default();
                let new = config.md5_checksum_for_diff.as_deref().unwrap_or_default();
                old != new && !suppress_checksum_diff(old, config.source.as_deref())
            }
            _ => false,
        })
        .collect()
}
