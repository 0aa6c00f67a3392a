//! ImageReference - レジストリ上のイメージの同一性
//!
//! 参照は `uri:tag` か `uri@digest` の文字列として比較されます。
//! tag を digest に解決することはしません（文字列が一致した時だけ同一とみなす）。

use std::fmt;

use serde::Serialize;

/// How a single image is addressed in a batch-delete call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageIdentifier {
    Tag(String),
    Digest(String),
}

impl fmt::Display for ImageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageIdentifier::Tag(tag) => write!(f, "tag {tag}"),
            ImageIdentifier::Digest(digest) => write!(f, "digest {digest}"),
        }
    }
}

/// One deletion candidate: a tag of an image, or an untagged digest.
///
/// A tagged image with N tags yields N references, each decided on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageReference {
    pub repository_name: String,
    pub repository_uri: String,
    pub digest: String,
    pub tag: Option<String>,
}

impl ImageReference {
    pub fn tagged(
        repository_name: impl Into<String>,
        repository_uri: impl Into<String>,
        digest: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            repository_uri: repository_uri.into(),
            digest: digest.into(),
            tag: Some(tag.into()),
        }
    }

    pub fn untagged(
        repository_name: impl Into<String>,
        repository_uri: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            repository_uri: repository_uri.into(),
            digest: digest.into(),
            tag: None,
        }
    }

    /// `repositoryUri:tag`, only for tagged references.
    pub fn tag_id(&self) -> Option<String> {
        self.tag
            .as_ref()
            .map(|tag| format!("{}:{}", self.repository_uri, tag))
    }

    /// `repositoryUri@digest`, always available.
    pub fn digest_id(&self) -> String {
        format!("{}@{}", self.repository_uri, self.digest)
    }

    /// The identifier a delete call must use: the tag when tagged, the digest otherwise.
    pub fn image_identifier(&self) -> ImageIdentifier {
        match &self.tag {
            Some(tag) => ImageIdentifier::Tag(tag.clone()),
            None => ImageIdentifier::Digest(self.digest.clone()),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}:{}", self.repository_uri, tag),
            None => write!(f, "{}@{}", self.repository_uri, self.digest),
        }
    }
}
