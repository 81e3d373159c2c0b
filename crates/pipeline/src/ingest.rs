//! Source ingester: turns raw source documents into a [`ContentOutline`]
//!
//! Paragraphs are assigned to a fixed narrative shape — one opening
//! section, up to three keypoint sections, one closing section — and the
//! raw 10/70/10 split is renormalized so the sections' estimated
//! durations sum to the target exactly rather than landing 10% short.

use once_cell::sync::Lazy;
use podcast_core::{ContentOutline, Error, ExtractedNumber, OutlineSection, Result, SectionType};
use regex::Regex;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][0-9,.]*(?:만|억|원|%|개|명|년|월|일|시간|분)?").unwrap());
static TECH_TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,}[A-Za-z0-9]*\b").unwrap());
static RISK_KEYWORDS: &[&str] = &["주의", "위험", "경고", "리스크"];

const OPENING_SHARE: f64 = 0.10;
const KEYPOINTS_SHARE: f64 = 0.70;
const CLOSING_SHARE: f64 = 0.10;
const CONTEXT_WINDOW: usize = 20;

fn split_paragraphs(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .flat_map(|block| block.split('\n'))
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect()
}

/// 20 characters of context on each side of a match, counted in chars
/// (not bytes) so the window never splits a multi-byte Hangul syllable.
fn context_window(content: &str, match_start: usize, match_end: usize) -> String {
    let before = content[..match_start].chars().rev().take(CONTEXT_WINDOW).collect::<Vec<_>>().into_iter().rev().collect::<String>();
    let after: String = content[match_end..].chars().take(CONTEXT_WINDOW).collect();
    format!("{before}{}{after}", &content[match_start..match_end])
}

fn extract_numbers(content: &str) -> Vec<ExtractedNumber> {
    NUMBER_RE
        .find_iter(content)
        .map(|m| ExtractedNumber { raw_text: m.as_str().to_string(), context: context_window(content, m.start(), m.end()) })
        .collect()
}

fn extract_technical_terms(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in TECH_TERM_RE.find_iter(content) {
        let term = m.as_str().to_string();
        if !seen.contains(&term) {
            seen.push(term);
        }
    }
    seen
}

fn extract_risks(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && RISK_KEYWORDS.iter().any(|kw| l.contains(kw)))
        .map(|l| l.to_string())
        .collect()
}

fn chunk_evenly<'a>(items: &[&'a str], groups: usize) -> Vec<Vec<&'a str>> {
    let groups = groups.max(1);
    let chunk_size = (items.len() + groups - 1) / groups.max(1);
    if chunk_size == 0 {
        return vec![Vec::new(); groups];
    }
    let mut out: Vec<Vec<&str>> = items.chunks(chunk_size).map(|c| c.to_vec()).collect();
    while out.len() < groups {
        out.push(Vec::new());
    }
    out
}

/// Build the episode outline from a list of source documents.
///
/// Fails only when no paragraph can be parsed out of the concatenated
/// source content.
pub fn ingest(sources: &[podcast_core::SourceDocument], target_duration_sec: f64) -> Result<ContentOutline> {
    let concatenated = sources.iter().map(|d| d.content.as_str()).collect::<Vec<_>>().join("\n\n");
    let paragraphs = split_paragraphs(&concatenated);
    if paragraphs.is_empty() {
        return Err(Error::Ingest("no paragraphs could be parsed from the supplied source documents".to_string()));
    }

    let opening_para = paragraphs[0];
    let closing_para = paragraphs[paragraphs.len() - 1];
    let body: Vec<&str> = if paragraphs.len() > 2 { paragraphs[1..paragraphs.len() - 1].to_vec() } else { vec![opening_para] };

    let keypoint_count = body.len().clamp(1, 3);
    let keypoint_groups = chunk_evenly(&body, keypoint_count);

    // Raw shares only sum to 90%; renormalize by the same factor so the
    // final total matches `target_duration_sec` exactly instead of falling
    // outside the ±5% contract.
    let raw_total = OPENING_SHARE + KEYPOINTS_SHARE + CLOSING_SHARE;
    let opening_share = OPENING_SHARE / raw_total;
    let keypoints_share = KEYPOINTS_SHARE / raw_total;
    let closing_share = CLOSING_SHARE / raw_total;

    let opening_duration = target_duration_sec * opening_share;
    let keypoint_total_duration = target_duration_sec * keypoints_share;
    let closing_duration = target_duration_sec * closing_share;
    let per_keypoint_duration = keypoint_total_duration / keypoint_groups.len() as f64;

    let mut sections = Vec::new();
    let mut order = 0usize;

    sections.push(OutlineSection {
        id: format!("sec-{order}"),
        section_type: SectionType::Opening,
        keypoints: vec![opening_para.to_string()],
        examples: vec![],
        estimated_duration_sec: opening_duration,
        order,
    });
    order += 1;

    for group in &keypoint_groups {
        sections.push(OutlineSection {
            id: format!("sec-{order}"),
            section_type: SectionType::Keypoint,
            keypoints: group.iter().map(|p| p.to_string()).collect(),
            examples: vec![],
            estimated_duration_sec: per_keypoint_duration,
            order,
        });
        order += 1;
    }

    sections.push(OutlineSection {
        id: format!("sec-{order}"),
        section_type: SectionType::Closing,
        keypoints: vec![closing_para.to_string()],
        examples: vec![],
        estimated_duration_sec: closing_duration,
        order,
    });

    let episode_title = sources.iter().find_map(|d| d.title.clone()).unwrap_or_else(|| "Untitled Episode".to_string());
    let document_id = sources.first().map(|d| d.id.clone()).unwrap_or_else(|| "unknown".to_string());

    let key_facts: Vec<String> = std::iter::once(opening_para)
        .chain(body.iter().copied())
        .filter_map(|p| p.split(['.', '!', '?']).find(|s| !s.trim().is_empty()).map(|s| s.trim().to_string()))
        .collect();

    Ok(ContentOutline {
        document_id,
        episode_title,
        total_estimated_duration_sec: target_duration_sec,
        sections,
        key_facts,
        extracted_numbers: extract_numbers(&concatenated),
        technical_terms: extract_technical_terms(&concatenated),
        risks: extract_risks(&concatenated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{SourceDocument, SourceType};

    fn doc(content: &str) -> SourceDocument {
        SourceDocument::new("doc-1", SourceType::Text, content).with_title("Test Episode")
    }

    #[test]
    fn empty_content_fails_with_ingest_error() {
        let result = ingest(&[doc("")], 600.0);
        assert!(matches!(result, Err(Error::Ingest(_))));
    }

    #[test]
    fn duration_shares_sum_to_target_exactly() {
        let content = "오프닝 문단입니다.\n\n첫 번째 본문입니다.\n\n두 번째 본문입니다.\n\n세 번째 본문입니다.\n\n클로징 문단입니다.";
        let outline = ingest(&[doc(content)], 600.0).unwrap();
        assert!((outline.sum_estimated_duration_sec() - 600.0).abs() < 1e-6);
    }

    #[test]
    fn keypoint_count_is_capped_at_three() {
        let content = (0..10).map(|i| format!("본문 문단 {i} 입니다.")).collect::<Vec<_>>().join("\n\n");
        let outline = ingest(&[doc(&content)], 600.0).unwrap();
        assert_eq!(outline.keypoint_count(), 3);
    }

    #[test]
    fn numbers_keep_surrounding_context() {
        let content = "작년 매출은 2,400만원 이었고 올해는 더 늘었습니다.";
        let outline = ingest(&[doc(content)], 300.0).unwrap();
        let hit = outline.extracted_numbers.iter().find(|n| n.raw_text.contains("2,400")).unwrap();
        assert!(hit.context.contains("매출은"));
    }

    #[test]
    fn uppercase_acronyms_are_extracted_as_technical_terms() {
        let content = "이 서비스는 AWS와 API를 사용합니다.";
        let outline = ingest(&[doc(content)], 300.0).unwrap();
        assert!(outline.technical_terms.contains(&"AWS".to_string()));
        assert!(outline.technical_terms.contains(&"API".to_string()));
    }

    #[test]
    fn single_paragraph_still_produces_a_full_shape() {
        let outline = ingest(&[doc("유일한 문단입니다.")], 120.0).unwrap();
        assert_eq!(outline.sections.len(), 3);
        assert!((outline.sum_estimated_duration_sec() - 120.0).abs() < 1e-6);
    }
}
