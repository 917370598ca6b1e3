//! Media assets, file kinds and the fixed image preview geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Error, FileId};

/// Kind of uploaded file; decides which display URL is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Served through a resized preview.
    Image,
    /// Served through the direct view URL.
    Video,
}

impl FileKind {
    /// Wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(Error::validation_failed(format!(
                "invalid file type: {other:?}"
            ))),
        }
    }
}

/// A picked file ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub file_name: String,
    /// Mime type reported by the picker, sent as the upload's content type.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaAsset {
    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for MediaAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaAsset")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Crop anchor for image previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gravity {
    Center,
    Top,
    TopLeft,
    TopRight,
    Left,
    Right,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl Gravity {
    /// Wire name of the anchor.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

/// Geometry and quality of an image preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSpec {
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
    /// JPEG/WebP quality in `0..=100`.
    pub quality: u8,
}

impl PreviewSpec {
    /// Bounds used for every post thumbnail: 2000×2000, top-aligned, full quality.
    pub const THUMBNAIL: Self = Self {
        width: 2000,
        height: 2000,
        gravity: Gravity::Top,
        quality: 100,
    };
}

/// A stored file together with its display URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: FileId,
    pub url: Url,
}

/// File record returned by storage right after upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: FileId,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("image", FileKind::Image)]
    #[case("video", FileKind::Video)]
    fn parses_known_kinds(#[case] raw: &str, #[case] expected: FileKind) {
        assert_eq!(raw.parse::<FileKind>().expect("known kind"), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("audio")]
    #[case("Image")]
    #[case("")]
    fn rejects_other_kinds_as_invalid_file_type(#[case] raw: &str) {
        let err = raw.parse::<FileKind>().expect_err("unknown kind");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.message().starts_with("invalid file type"));
    }

    #[rstest]
    fn debug_output_omits_payload() {
        let asset = MediaAsset {
            file_name: "clip.mp4".to_owned(),
            mime_type: "video/mp4".to_owned(),
            bytes: vec![0; 4],
        };
        let rendered = format!("{asset:?}");
        assert!(rendered.contains("size: 4"));
        assert!(!rendered.contains("bytes"));
    }
}
