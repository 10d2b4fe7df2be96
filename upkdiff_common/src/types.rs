use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coarse bucket an asset falls into, derived from its file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Images,
    Scripts,
    Documents,
    Audio,
    Models,
    Assets,
    Other,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Images => "images",
            AssetCategory::Scripts => "scripts",
            AssetCategory::Documents => "documents",
            AssetCategory::Audio => "audio",
            AssetCategory::Models => "models",
            AssetCategory::Assets => "assets",
            AssetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type information derived from an asset's logical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetType {
    /// Lower-cased suffix after the last `.`, empty when the path has none
    pub extension: String,
    pub mime_type: String,
    pub category: AssetCategory,
}

/// One reconstructed entry of a Unity package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Unity-assigned GUID, the directory name inside the archive
    pub guid: String,
    /// Byte length of `data`; zero for folder and meta-only records
    pub size: u64,
    pub data: Vec<u8>,
    pub kind: AssetType,
}

/// A fully reconstructed package: logical path -> asset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub assets: HashMap<String, Asset>,
}

impl Package {
    pub fn new(assets: HashMap<String, Asset>) -> Self {
        Self { assets }
    }

    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.assets.get(path)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Logical paths in ascending ordinal order
    pub fn sorted_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

/// Character budget for text previews when the caller supplies none
pub const DEFAULT_PREVIEW_CHARS: usize = 5000;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Character budget for text previews
    #[serde(default = "default_preview_chars")]
    pub preview_max_chars: usize,

    /// Diff statuses to report; empty means all
    #[serde(default)]
    pub diff_statuses: Vec<DiffStatus>,

    /// Enable portable mode (config alongside binary)
    #[serde(default)]
    pub portable_mode: bool,
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_max_chars: DEFAULT_PREVIEW_CHARS,
            diff_statuses: Vec::new(),
            portable_mode: false,
        }
    }
}

/// Status of one path in a package comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Path exists only in the right package
    Added,
    /// Path exists only in the left package
    Removed,
    /// Path exists in both but size or GUID differ
    Modified,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Modified => "modified",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a comparison, borrowing the originating assets on each side
#[derive(Debug, Clone)]
pub struct DiffRecord<'a> {
    pub path: String,
    pub status: DiffStatus,
    pub size_left: u64,
    pub size_right: u64,
    pub left: Option<&'a Asset>,
    pub right: Option<&'a Asset>,
}

/// Result of comparing two package slots that may not both be loaded yet
#[derive(Debug, Clone)]
pub enum DiffOutcome<'a> {
    /// At least one side has no package loaded; not an error
    Pending,
    Report(Vec<DiffRecord<'a>>),
}

impl<'a> DiffOutcome<'a> {
    pub fn records(&self) -> &[DiffRecord<'a>] {
        match self {
            DiffOutcome::Pending => &[],
            DiffOutcome::Report(records) => records,
        }
    }
}
