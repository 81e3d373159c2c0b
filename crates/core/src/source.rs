//! Source document types
//!
//! Source documents are pre-extracted plain text handed to the pipeline.
//! PDF parsing and URL fetching happen upstream and are out of scope here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of source document supplied to the ingester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Text,
    Markdown,
    Pdf,
    Url,
    Summary,
}

/// An immutable source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub content: String,
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, source_type: SourceType, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_type,
            content: content.into(),
            title: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_title() {
        let doc = SourceDocument::new("doc-1", SourceType::Text, "hello").with_title("Hello");
        assert_eq!(doc.title.as_deref(), Some("Hello"));
        assert_eq!(doc.source_type, SourceType::Text);
    }
}
