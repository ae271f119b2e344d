use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// `null` for local files, which have no catalog id.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_image_url: Option<String>,
    /// Fields the generator emits that we don't interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// List key: the track id, or the position when the generator sent none.
    pub fn key(&self, index: usize) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => index.to_string(),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        self.album_image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}
