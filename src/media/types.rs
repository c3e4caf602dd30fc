use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    YouTube,
    Vimeo,
    DirectFile,
    CloudDrive,
    Unknown,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::YouTube => "youtube",
            MediaKind::Vimeo => "vimeo",
            MediaKind::DirectFile => "direct_file",
            MediaKind::CloudDrive => "cloud_drive",
            MediaKind::Unknown => "unknown",
        }
    }

    /// Direct files play in a native player; everything else goes in a frame.
    pub fn is_native(&self) -> bool {
        matches!(self, MediaKind::DirectFile)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media reference resolved to something a player or frame can load as-is.
/// `kind` is the classification of `url`, not of the original reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedTarget {
    pub kind: MediaKind,
    pub url: String,
}
