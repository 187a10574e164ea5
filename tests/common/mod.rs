//! In-memory Drive used by the lifecycle tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use gdrive_provider::models::DriveFile;
use gdrive_provider::{DriveApi, DriveError, Media, Result};
use md5::{Digest, Md5};
use tokio::io::AsyncReadExt;

/// One call received by [`FakeDrive`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get { id: String, fields: String },
    Create {
        metadata: DriveFile,
        content: Option<Vec<u8>>,
        content_type: Option<String>,
        fields: String,
    },
    Delete { id: String },
}

/// Records every call and keeps created items so they can be read back.
#[derive(Default)]
pub struct FakeDrive {
    calls: Mutex<Vec<Call>>,
    items: Mutex<HashMap<String, DriveFile>>,
    fail_with: Mutex<Option<(u16, String)>>,
    fail_gets_with: Mutex<Option<(u16, String)>>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing item.
    pub fn insert(&self, file: DriveFile) {
        self.items.lock().unwrap().insert(file.id.clone(), file);
    }

    /// Make every subsequent call fail with this API error.
    pub fn fail_with(&self, status: u16, message: &str) {
        *self.fail_with.lock().unwrap() = Some((status, message.to_string()));
    }

    /// Make only metadata reads fail with this API error.
    pub fn fail_gets_with(&self, status: u16, message: &str) {
        *self.fail_gets_with.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. }))
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.lock().unwrap().contains_key(id)
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().as_ref() {
            Some((status, message)) => Err(DriveError::ApiError {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn get_file(&self, file_id: &str, fields: &str) -> Result<DriveFile> {
        self.record(Call::Get {
            id: file_id.to_string(),
            fields: fields.to_string(),
        })?;
        if let Some((status, message)) = self.fail_gets_with.lock().unwrap().clone() {
            return Err(DriveError::ApiError { status, message });
        }

        self.items
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| DriveError::ApiError {
                status: 404,
                message: format!("File not found: {}.", file_id),
            })
    }

    async fn create_file(
        &self,
        metadata: &DriveFile,
        media: Option<Media>,
        fields: &str,
    ) -> Result<DriveFile> {
        let (content, content_type) = match media {
            Some(media) => {
                let content_type = media.content_type().to_string();
                let mut bytes = Vec::new();
                media.into_file().read_to_end(&mut bytes).await?;
                (Some(bytes), Some(content_type))
            }
            None => (None, None),
        };

        self.record(Call::Create {
            metadata: metadata.clone(),
            content: content.clone(),
            content_type,
            fields: fields.to_string(),
        })?;

        let mut stored = metadata.clone();
        stored.id = format!("item{}", self.items.lock().unwrap().len() + 1);
        stored.md5_checksum = content.map(|bytes| hex::encode(Md5::digest(&bytes)));
        if stored.parents.is_empty() {
            stored.parents = vec!["root".to_string()];
        }
        self.insert(stored.clone());

        Ok(DriveFile {
            id: stored.id,
            ..Default::default()
        })
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.record(Call::Delete {
            id: file_id.to_string(),
        })?;
        self.items.lock().unwrap().remove(file_id);
        Ok(())
    }
}
