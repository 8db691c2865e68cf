use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MediaError {
    #[error("media reference cannot be empty")]
    Empty,

    #[error("cannot join media path onto base URL")]
    InvalidBase,
}

/// Playback kind, determined by the file extension of the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

/// Opaque media identifier attached to a question: a filename served under
/// the media base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wraps a filename. Returns `None` for an empty name, which the wire
    /// uses for "no media".
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self(name))
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.0
    }

    /// `.mp4` plays as video, `.jpg` as an image; anything else is treated
    /// as having no playable media.
    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        if self.0.ends_with(".mp4") {
            Some(MediaKind::Video)
        } else if self.0.ends_with(".jpg") {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    /// Resolve the fetch URL under the HTTP base, e.g.
    /// `https://host/media/532.D28KW_org.mp4`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidBase` when the base cannot take a path.
    pub fn url(&self, http_base: &Url) -> Result<Url, MediaError> {
        http_base
            .join(&format!("media/{}", self.0))
            .map_err(|_| MediaError::InvalidBase)
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_means_no_media() {
        assert!(MediaRef::new("").is_none());
        assert!(MediaRef::new("   ").is_none());
    }

    #[test]
    fn kind_follows_extension() {
        assert_eq!(
            MediaRef::new("532.D28KW_org.mp4").unwrap().kind(),
            Some(MediaKind::Video)
        );
        assert_eq!(
            MediaRef::new("sign.jpg").unwrap().kind(),
            Some(MediaKind::Image)
        );
        assert_eq!(MediaRef::new("notes.txt").unwrap().kind(), None);
    }

    #[test]
    fn url_is_joined_under_media_path() {
        let base = Url::parse("https://quiz.example").unwrap();
        let media = MediaRef::new("clip.mp4").unwrap();
        assert_eq!(
            media.url(&base).unwrap().as_str(),
            "https://quiz.example/media/clip.mp4"
        );
    }
}
