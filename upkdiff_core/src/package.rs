use crate::classify;
use crate::decompress::decompress;
use crate::tar::{read_entries, RawEntry};
use std::collections::HashMap;
use tracing::debug;
use upkdiff_common::{Asset, Package, Result, UpkError};

/// Partial per-GUID record: at most one pathname, at most one payload
#[derive(Default)]
struct GuidGroup {
    pathname: Option<String>,
    asset: Option<Vec<u8>>,
}

/// Parse a `.unitypackage` buffer (gzip-wrapped tar, or raw tar) into a
/// package. Fails when the archive is structurally broken, contains no
/// tar entries, or reconstructs to zero assets.
pub fn parse_package(bytes: &[u8]) -> Result<Package> {
    let decompressed = decompress(bytes);
    let entries = read_entries(&decompressed)?;
    let package = build_package(&entries)?;

    if package.is_empty() {
        return Err(UpkError::NoAssets);
    }
    Ok(package)
}

/// Reconstruct the path-keyed asset map from raw tar records.
///
/// Members named `<guid>/pathname` carry the logical path, decoded one
/// byte per character since the format predates any UTF-8 guarantee;
/// `<guid>/asset` carries the payload. Everything else (`asset.meta`,
/// preview images, directory entries) is skipped. A group without a
/// payload still yields a zero-length asset; a group without a pathname
/// cannot be keyed and is dropped. Zero surviving assets is reported as
/// an empty map so the caller decides policy.
pub fn build_package(entries: &[RawEntry<'_>]) -> Result<Package> {
    if entries.is_empty() {
        return Err(UpkError::EmptyArchive);
    }

    let mut groups: HashMap<&str, GuidGroup> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for entry in entries {
        if let Some(guid) = guid_of(&entry.name, "/pathname") {
            let group = group_mut(&mut groups, &mut order, guid);
            group.pathname = Some(decode_latin1(entry.data).trim().to_string());
        } else if let Some(guid) = guid_of(&entry.name, "/asset") {
            let group = group_mut(&mut groups, &mut order, guid);
            group.asset = Some(entry.data.to_vec());
        }
    }

    debug!("{} tar entries grouped into {} guids", entries.len(), groups.len());

    // Fold groups in first-encounter order: duplicate logical paths
    // overwrite deterministically, last guid wins.
    let mut assets: HashMap<String, Asset> = HashMap::new();
    for guid in order {
        let Some(group) = groups.remove(guid) else {
            continue;
        };
        let Some(pathname) = group.pathname else {
            debug!("guid {} has a payload but no pathname, dropping", guid);
            continue;
        };

        let data = group.asset.unwrap_or_default();
        let kind = classify::classify(&pathname);
        assets.insert(
            pathname,
            Asset {
                guid: guid.to_string(),
                size: data.len() as u64,
                data,
                kind,
            },
        );
    }

    debug!("package reconstructed with {} assets", assets.len());
    Ok(Package::new(assets))
}

fn guid_of<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.ends_with(suffix) {
        name.split('/').next()
    } else {
        None
    }
}

fn group_mut<'g, 'e>(
    groups: &'g mut HashMap<&'e str, GuidGroup>,
    order: &mut Vec<&'e str>,
    guid: &'e str,
) -> &'g mut GuidGroup {
    groups.entry(guid).or_insert_with(|| {
        order.push(guid);
        GuidGroup::default()
    })
}

/// One byte per character, never UTF-8 validation: Unity historically
/// emits ASCII-safe paths and the charcode mapping must be preserved.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkdiff_common::AssetCategory;

    fn entry<'a>(name: &str, data: &'a [u8]) -> RawEntry<'a> {
        RawEntry {
            name: name.to_string(),
            size: data.len() as u64,
            data,
            type_flag: b'0',
            mtime: b"14717667775\0",
        }
    }

    #[test]
    fn test_pathname_and_asset_pair() {
        let entries = vec![
            entry("abc123/pathname", b"Assets/Foo.cs"),
            entry("abc123/asset", b"class Foo {}\n"),
        ];

        let package = build_package(&entries).unwrap();
        assert_eq!(package.len(), 1);

        let asset = package.get("Assets/Foo.cs").unwrap();
        assert_eq!(asset.guid, "abc123");
        assert_eq!(asset.size, 13);
        assert_eq!(asset.data, b"class Foo {}\n");
        assert_eq!(asset.kind.category, AssetCategory::Scripts);
    }

    #[test]
    fn test_pathname_without_asset_yields_empty_asset() {
        let entries = vec![entry("folderguid/pathname", b"Assets/Textures")];

        let package = build_package(&entries).unwrap();
        let asset = package.get("Assets/Textures").unwrap();
        assert_eq!(asset.size, 0);
        assert!(asset.data.is_empty());
        assert_eq!(asset.kind.extension, "");
    }

    #[test]
    fn test_asset_without_pathname_is_dropped() {
        let entries = vec![
            entry("orphan/asset", b"payload"),
            entry("kept/pathname", b"Assets/Kept.txt"),
        ];

        let package = build_package(&entries).unwrap();
        assert_eq!(package.len(), 1);
        assert!(package.get("Assets/Kept.txt").is_some());
    }

    #[test]
    fn test_meta_and_directory_entries_are_ignored() {
        let entries = vec![
            entry("abc123/pathname", b"Assets/Foo.cs"),
            entry("abc123/asset.meta", b"guid: abc123"),
            entry("abc123/preview.png", b"\x89PNG"),
            entry("abc123", b""),
        ];

        let package = build_package(&entries).unwrap();
        assert_eq!(package.len(), 1);
        let asset = package.get("Assets/Foo.cs").unwrap();
        assert_eq!(asset.size, 0);
    }

    #[test]
    fn test_pathname_is_trimmed() {
        let entries = vec![entry("abc123/pathname", b"Assets/Foo.cs\n")];

        let package = build_package(&entries).unwrap();
        assert!(package.get("Assets/Foo.cs").is_some());
    }

    #[test]
    fn test_duplicate_pathname_last_guid_wins() {
        // two guids resolving to one logical path: the later guid in
        // first-encounter order overwrites the earlier one
        let entries = vec![
            entry("guid-a/pathname", b"Assets/Same.txt"),
            entry("guid-a/asset", b"old"),
            entry("guid-b/pathname", b"Assets/Same.txt"),
            entry("guid-b/asset", b"newer"),
        ];

        let package = build_package(&entries).unwrap();
        assert_eq!(package.len(), 1);
        let asset = package.get("Assets/Same.txt").unwrap();
        assert_eq!(asset.guid, "guid-b");
        assert_eq!(asset.data, b"newer");
    }

    #[test]
    fn test_empty_entries_is_an_error() {
        assert!(matches!(
            build_package(&[]),
            Err(UpkError::EmptyArchive)
        ));
    }

    #[test]
    fn test_zero_assets_is_an_empty_map_not_an_error() {
        let entries = vec![entry("abc123/asset.meta", b"guid: abc123")];

        let package = build_package(&entries).unwrap();
        assert!(package.is_empty());
    }

    #[test]
    fn test_latin1_pathname_decodes_bytewise() {
        // 0xE9 is é in Latin-1; the decode must not reject or mangle it
        let entries = vec![entry("abc123/pathname", b"Assets/caf\xe9.txt")];

        let package = build_package(&entries).unwrap();
        assert!(package.get("Assets/caf\u{e9}.txt").is_some());
    }
}
