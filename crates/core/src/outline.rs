//! Content outline — the ingester's output and the scriptwriter's input
//!
//! Produced once by the source ingester and read-only thereafter.

use serde::{Deserialize, Serialize};

/// Outline section type, in narrative order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Opening,
    Keypoint,
    Example,
    Analogy,
    Caution,
    Counter,
    Recap,
    Closing,
}

/// A number literal extracted from the source text, with surrounding context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedNumber {
    /// The raw matched text, e.g. "2,400만원"
    pub raw_text: String,
    /// 20 characters of context on each side of the match
    pub context: String,
}

/// One section of the episode outline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    pub id: String,
    pub section_type: SectionType,
    pub keypoints: Vec<String>,
    pub examples: Vec<String>,
    /// Estimated duration in seconds
    pub estimated_duration_sec: f64,
    /// Zero-based order within the outline
    pub order: usize,
}

/// The derived, read-only content outline for one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentOutline {
    pub document_id: String,
    pub episode_title: String,
    pub total_estimated_duration_sec: f64,
    pub sections: Vec<OutlineSection>,
    pub key_facts: Vec<String>,
    pub extracted_numbers: Vec<ExtractedNumber>,
    pub technical_terms: Vec<String>,
    pub risks: Vec<String>,
}

impl ContentOutline {
    /// Sections of a given type, in outline order
    pub fn sections_of(&self, section_type: SectionType) -> impl Iterator<Item = &OutlineSection> {
        self.sections.iter().filter(move |s| s.section_type == section_type)
    }

    pub fn keypoint_count(&self) -> usize {
        self.sections_of(SectionType::Keypoint).count()
    }

    /// Sum of every section's estimated duration, which must stay within
    /// ±5% of the requested episode length
    pub fn sum_estimated_duration_sec(&self) -> f64 {
        self.sections.iter().map(|s| s.estimated_duration_sec).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(section_type: SectionType, order: usize, dur: f64) -> OutlineSection {
        OutlineSection {
            id: format!("sec-{order}"),
            section_type,
            keypoints: vec![],
            examples: vec![],
            estimated_duration_sec: dur,
            order,
        }
    }

    #[test]
    fn keypoint_count_filters_by_type() {
        let outline = ContentOutline {
            document_id: "doc-1".into(),
            episode_title: "Episode".into(),
            total_estimated_duration_sec: 600.0,
            sections: vec![
                section(SectionType::Opening, 0, 60.0),
                section(SectionType::Keypoint, 1, 140.0),
                section(SectionType::Keypoint, 2, 140.0),
                section(SectionType::Closing, 3, 60.0),
            ],
            key_facts: vec![],
            extracted_numbers: vec![],
            technical_terms: vec![],
            risks: vec![],
        };

        assert_eq!(outline.keypoint_count(), 2);
        assert_eq!(outline.sum_estimated_duration_sec(), 400.0);
    }
}
