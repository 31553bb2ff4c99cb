// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Content type detection for uploaded blobs
//!
//! The type is attached to every data item as a `Content-Type` tag so that
//! gateways can serve the blob with a sensible header.

use std::path::Path;

/// Used when the extension is unknown or missing
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const KNOWN_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("zip", "application/zip"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
];

/// Guess the content type of a working-tree path from its extension.
///
/// Never fails; unknown extensions map to [`DEFAULT_CONTENT_TYPE`].
pub fn content_type_for_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE.to_string();
    };
    let ext = ext.to_ascii_lowercase();

    if let Some((_, mime)) = KNOWN_EXTENSIONS.iter().find(|(known, _)| *known == ext) {
        return (*mime).to_string();
    }

    mime_guess::from_ext(&ext)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_extensions() {
        assert_eq!(content_type_for_path("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for_path("assets/video.MP4"), "video/mp4");
        assert_eq!(content_type_for_path("notes.txt"), "text/plain");
        assert_eq!(content_type_for_path("data.json"), "application/json");
    }

    #[test]
    fn test_unknown_and_missing_extension() {
        assert_eq!(content_type_for_path("blob.zzzunknown"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_path("Makefile"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_path(""), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_falls_back_to_mime_database() {
        assert_eq!(content_type_for_path("diagram.svg"), "image/svg+xml");
    }
}
