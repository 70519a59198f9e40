use serde::Deserialize;

/// One entry of the search API's `images_results` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageDescriptor {
    pub thumbnail: String,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl ImageDescriptor {
    pub fn from_thumbnail(thumbnail: impl Into<String>) -> Self {
        Self {
            thumbnail: thumbnail.into(),
            position: None,
            title: None,
            original: None,
            source: None,
            link: None,
        }
    }
}

/// Outcome of a single download: the body bytes, or `None` when the fetch failed.
pub type DownloadResult = Option<Vec<u8>>;

/// A row as it is written to the `images` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub name: String,
    pub data: Vec<u8>,
}

impl StoredImage {
    /// Row for the payload at 1-based `position` in its batch.
    pub fn at_position(position: usize, data: Vec<u8>) -> Self {
        Self {
            name: image_name(position),
            data,
        }
    }
}

/// Name for the image at 1-based `position` in its batch.
pub fn image_name(position: usize) -> String {
    format!("image_{}.jpg", position)
}
