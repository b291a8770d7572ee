//! Grounding metadata as returned by the generator, and the sources derived from it

use serde::{Deserialize, Serialize};

/// Citation data returned alongside generated text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingMetadata {
    pub grounding_chunks: Vec<GroundingChunk>,
    pub grounding_supports: Vec<GroundingSupport>,
    /// Queries the generator issued; informational only
    pub web_search_queries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// Links a span of generated text to the chunks backing it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingSupport {
    pub grounding_chunk_indices: Vec<usize>,
}

/// A cited page: URL plus optional human-readable title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundedSource {
    #[must_use]
    pub fn new(url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

impl GroundingMetadata {
    /// Parse the generator's grounding JSON
    ///
    /// # Errors
    ///
    /// Returns the serde error if `json` is not a grounding metadata object.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Chunk indices cited by supports, in first-seen order.
    ///
    /// When no support cites a valid chunk, every chunk is selected in order.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        let mut selected: Vec<usize> = Vec::new();
        for support in &self.grounding_supports {
            for &index in &support.grounding_chunk_indices {
                if index < self.grounding_chunks.len() && !selected.contains(&index) {
                    selected.push(index);
                }
            }
        }
        if selected.is_empty() {
            selected = (0..self.grounding_chunks.len()).collect();
        }
        selected
    }

    /// Web chunks at the selected indices, raw and in selection order
    #[must_use]
    pub fn candidates(&self) -> Vec<GroundedSource> {
        self.selected_indices()
            .into_iter()
            .filter_map(|index| self.grounding_chunks.get(index))
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                web.uri
                    .as_deref()
                    .map(str::trim)
                    .filter(|uri| !uri.is_empty())
                    .map(|uri| GroundedSource::new(uri, web.title.clone()))
            })
            .collect()
    }
}
