// Media files chosen for submission.
//
// A SelectedFile is just bytes plus a display name. The accept filter
// (`video/*,image/*`) is advisory: nothing here rejects a file because of
// its type or size.

use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// The file picker hint shown to users. Never enforced.
pub const ACCEPT_HINT: &str = "video/*,image/*";

/// Read size when hashing straight from disk.
const HASH_CHUNK_SIZE: usize = 4096;

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tiff", "image/tiff"),
];

const VIDEO_EXTENSIONS: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("flv", "video/x-flv"),
];

/// Broad media category, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

/// The media file chosen by the user for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// Original filename, sent as the multipart part's filename.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type guessed from the extension, if recognised.
    pub mime: Option<String>,
}

impl SelectedFile {
    /// Build a file from in-memory bytes (drop payloads, tests).
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).map(str::to_string);
        Self { name, bytes, mime }
    }

    /// Read a file from disk. The display name is the final path component.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!(file = %name, bytes = bytes.len(), "Loaded media file");
        Ok(Self::new(name, bytes))
    }

    pub fn kind(&self) -> MediaKind {
        match &self.mime {
            Some(m) if m.starts_with("image/") => MediaKind::Image,
            Some(m) if m.starts_with("video/") => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }

    /// Whether the file falls inside the advisory accept filter.
    pub fn matches_accept_hint(&self) -> bool {
        self.kind() != MediaKind::Other
    }

    /// SHA-256 of the contents, lowercase hex.
    pub fn sha256_hex(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

/// SHA-256 digest as lowercase hex, the same encoding the service uses
/// for its `file_hash` field.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 of a file on disk, lowercase hex, read in fixed-size chunks so
/// large videos are never held in memory whole.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];
    let mut total = 0usize;
    loop {
        let n = file
            .read(&mut buf)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n;
    }

    debug!(path = %path.display(), bytes = total, "Hashed file");
    Ok(hex::encode(hasher.finalize()))
}

fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS)
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}
