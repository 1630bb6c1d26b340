// ABOUTME: Artifact classification for cache policy, content type, and encoding.
// ABOUTME: Every attribute is derived from the file name alone.

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::provider::PutObject;
use crate::types::Version;

/// Files that decide which version the SPA loads. Always revalidated.
pub const ENTRY_POINTS: [&str; 3] = ["index.html", "service-worker.js", "manifest.json"];

/// Extensions gzip-compressed before upload.
pub const COMPRESSIBLE_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "css", "json", "ico", "map", "xml", "txt", "svg", "ttf", "otf", "eot",
    "woff", "woff2",
];

const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
const NO_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";

/// Cache-control class of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Content under a version prefix never changes once published.
    Immutable,
    /// Entry points that must be fetched fresh on every load.
    NoCache,
}

impl CachePolicy {
    pub fn for_path(path: &Path) -> Self {
        let is_entry_point = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| ENTRY_POINTS.contains(&name));
        if is_entry_point {
            CachePolicy::NoCache
        } else {
            CachePolicy::Immutable
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            CachePolicy::Immutable => IMMUTABLE_CACHE_CONTROL,
            CachePolicy::NoCache => NO_CACHE_CONTROL,
        }
    }
}

/// Transfer encoding applied to the uploaded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
}

impl ContentEncoding {
    pub fn for_path(path: &Path) -> Self {
        let compressible = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                COMPRESSIBLE_EXTENSIONS
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(ext))
            });
        if compressible {
            ContentEncoding::Gzip
        } else {
            ContentEncoding::Identity
        }
    }

    /// Value of the `Content-Encoding` header, if one is sent.
    pub fn header(&self) -> Option<&'static str> {
        match self {
            ContentEncoding::Identity => None,
            ContentEncoding::Gzip => Some("gzip"),
        }
    }
}

/// One file of a build output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the build root, `/`-separated.
    pub relative_path: String,
    pub source_path: PathBuf,
    pub content_type: Option<String>,
    pub cache: CachePolicy,
    pub encoding: ContentEncoding,
}

impl Artifact {
    pub fn classify(relative_path: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        let relative_path = relative_path.into();
        let path = Path::new(&relative_path);

        Self {
            content_type: mime_guess::from_path(path).first_raw().map(str::to_owned),
            cache: CachePolicy::for_path(path),
            encoding: ContentEncoding::for_path(path),
            source_path: source_path.into(),
            relative_path,
        }
    }

    pub fn key(&self, version: &Version) -> String {
        version.key_for(&self.relative_path)
    }

    /// Build the upload request from the raw file contents.
    pub fn to_put_object(&self, version: &Version, raw: Vec<u8>) -> std::io::Result<PutObject> {
        let body = match self.encoding {
            ContentEncoding::Identity => Bytes::from(raw),
            ContentEncoding::Gzip => Bytes::from(compress(&raw)?),
        };

        Ok(PutObject {
            key: self.key(version),
            body,
            content_type: self.content_type.clone(),
            cache_control: self.cache.header().to_string(),
            content_encoding: self.encoding.header().map(str::to_owned),
        })
    }
}

/// Gzip at maximum compression.
pub fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}
