//! Platform suffix parsing for file names like `Foo.ios.js`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Result of splitting a file name into base name, platform and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFilePath {
    pub dir_path: PathBuf,
    pub base_name: String,
    pub platform: Option<String>,
    pub extension: Option<String>,
}

/// Parses `<base>.<platform>.<ext>` out of the file name of `path`.
///
/// The platform is only reported when it is one of `platforms`; an unknown
/// middle segment stays part of the base name (`Foo.test.js` has base name
/// `Foo.test`). File names without an extension yield no platform.
pub fn parse_platform_file_path(path: &Path, platforms: &BTreeSet<String>) -> PlatformFilePath {
    let dir_path = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some((stem, extension)) = split_last_segment(&file_name) else {
        return PlatformFilePath {
            dir_path,
            base_name: file_name,
            platform: None,
            extension: None,
        };
    };

    let extension = Some(extension.to_string());
    match split_last_segment(stem) {
        Some((base, platform)) if platforms.contains(platform) => PlatformFilePath {
            dir_path,
            base_name: base.to_string(),
            platform: Some(platform.to_string()),
            extension,
        },
        _ => PlatformFilePath {
            dir_path,
            base_name: stem.to_string(),
            platform: None,
            extension,
        },
    }
}

/// Splits `a.b` into (`a`, `b`) when both sides are non-empty.
fn split_last_segment(value: &str) -> Option<(&str, &str)> {
    let (head, tail) = value.rsplit_once('.')?;
    if head.is_empty() || tail.is_empty() {
        return None;
    }
    Some((head, tail))
}
