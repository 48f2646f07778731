// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::path::{Path, PathBuf};

use url::Url;

/// Converts a `file://` URI to a filesystem path. Windows URIs of the form
/// `file:///C:/...` parse to `/C:/...`, so the leading slash is stripped.
#[must_use]
pub fn uri_to_path(uri: &str) -> String {
    let Ok(parsed) = Url::parse(uri) else {
        return String::new();
    };

    let path = percent_decode(parsed.path());

    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' {
        return path[1..].to_string();
    }

    path
}

/// Converts a filesystem path to a `file://` URI. Windows drive-letter paths
/// gain the extra slash mandated by RFC 8089 (`file:///C:/...`).
#[must_use]
pub fn path_to_uri(path: &str) -> String {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' {
        return format!("file:///{}", path.replace('\\', "/"));
    }

    format!("file://{path}")
}

/// Finds the Godot project root for the given document: the first workspace
/// folder containing a `project.godot`, else the nearest ancestor directory
/// of the document that contains one.
#[must_use]
pub fn find_project_root(current_uri: &str, folders: &[String]) -> Option<PathBuf> {
    for folder in folders {
        let folder_path = uri_to_path(folder);
        if folder_path.is_empty() {
            continue;
        }

        let folder_path = PathBuf::from(folder_path);
        if folder_path.join("project.godot").exists() {
            return Some(folder_path);
        }
    }

    let current_path = uri_to_path(current_uri);
    if current_path.is_empty() {
        return None;
    }

    let mut dir = Path::new(&current_path).parent()?;
    loop {
        if dir.join("project.godot").exists() {
            return Some(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => break,
        }
    }

    None
}

/// Resolves a Godot resource path (`res://...` or relative) to a target URI.
#[must_use]
pub fn resolve_resource_path(resource_path: &str, current_uri: &str, folders: &[String]) -> Option<String> {
    if let Some(relative) = resource_path.strip_prefix("res://") {
        let root = find_project_root(current_uri, folders)?;
        let target = root.join(relative);
        return Some(path_to_uri(&target.to_string_lossy()));
    }

    let current_path = uri_to_path(current_uri);
    if current_path.is_empty() {
        return None;
    }

    let target = Path::new(&current_path).parent()?.join(resource_path);
    Some(path_to_uri(&target.to_string_lossy()))
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = &input[i + 1..i + 3];
            if let Ok(byte) = u8::from_str_radix(hex, 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }

        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("file:///C:/a/b.tscn", "C:/a/b.tscn")]
    #[case("file:///home/user/scene.tscn", "/home/user/scene.tscn")]
    #[case("file:///home/user/my%20scene.tscn", "/home/user/my scene.tscn")]
    fn uri_to_path_cases(#[case] uri: &str, #[case] expected: &str) {
        assert_eq!(uri_to_path(uri), expected);
    }

    #[rstest]
    #[case("C:/a/b.tscn", "file:///C:/a/b.tscn")]
    #[case("C:\\a\\b.tscn", "file:///C:/a/b.tscn")]
    #[case("/home/user/scene.tscn", "file:///home/user/scene.tscn")]
    fn path_to_uri_cases(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(path_to_uri(path), expected);
    }

    #[test]
    fn round_trip_windows() {
        let uri = "file:///C:/projects/game/scene.tscn";
        assert_eq!(path_to_uri(&uri_to_path(uri)), uri);
    }
}
