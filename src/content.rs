//! Local file inspection: MIME type detection and content checksums.

use std::fs::File;
use std::io::{self, SeekFrom};
use std::path::Path;

use md5::{Digest, Md5};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::sniff::{sniff_content_type, SNIFF_LEN};

/// Detect the MIME type of `reader` from its first 512 bytes.
///
/// The position is always reset to the start afterwards so the same handle
/// can be streamed as an upload body.
pub async fn detect_content_type<R>(reader: &mut R) -> io::Result<String>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    let read = (&mut *reader)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut buffer)
        .await;
    reader.seek(SeekFrom::Start(0)).await?;
    read?;

    Ok(sniff_content_type(&buffer).to_string())
}

/// MD5 of the whole file as lowercase hex, comparable with Drive's
/// `md5Checksum`.
pub fn file_md5_checksum<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
