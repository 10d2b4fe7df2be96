use upkdiff_common::{AssetCategory, AssetType};

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Extension -> MIME type for the formats Unity packages commonly carry
const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tga", "image/x-tga"),
    ("psd", "image/vnd.adobe.photoshop"),
    ("exr", "image/x-exr"),
    ("unity", "text/plain"),
    ("yaml", "text/yaml"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("cs", "text/x-csharp"),
    ("shader", "text/plain"),
    ("asset", "application/octet-stream"),
    ("prefab", "application/octet-stream"),
    ("scene", "application/octet-stream"),
    ("mat", "application/octet-stream"),
    ("anim", "application/octet-stream"),
    ("controller", "application/octet-stream"),
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("fbx", "application/octet-stream"),
    ("blend", "application/octet-stream"),
    ("obj", "text/plain"),
    ("mtl", "text/plain"),
    ("dae", "text/xml"),
];

/// Category membership; first match wins, so `obj` lands in documents
/// even though it also appears under models
const CATEGORIES: &[(AssetCategory, &[&str])] = &[
    (
        AssetCategory::Images,
        &["png", "jpg", "jpeg", "gif", "bmp", "tga", "psd", "exr"],
    ),
    (AssetCategory::Scripts, &["cs", "js", "shader"]),
    (
        AssetCategory::Documents,
        &["txt", "json", "yaml", "unity", "xml", "obj", "mtl", "dae"],
    ),
    (AssetCategory::Audio, &["wav", "mp3", "ogg", "m4a"]),
    (AssetCategory::Models, &["fbx", "blend", "obj", "dae"]),
    (
        AssetCategory::Assets,
        &["asset", "prefab", "scene", "mat", "anim", "controller"],
    ),
];

/// Lower-cased suffix after the last `.` in the path, empty when none
pub fn extension(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

pub fn mime_type(extension: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

pub fn category(extension: &str) -> AssetCategory {
    CATEGORIES
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension))
        .map(|(category, _)| *category)
        .unwrap_or(AssetCategory::Other)
}

/// Derive type information from a logical path. Total: unknown and
/// missing extensions resolve to the octet-stream / other fallback.
pub fn classify(path: &str) -> AssetType {
    let ext = extension(path);
    AssetType {
        mime_type: mime_type(&ext).to_string(),
        category: category(&ext),
        extension: ext,
    }
}
