//! LLM-mode script generation: prompt construction, response parsing, and
//! the retry-with-complaints validation loop

use once_cell::sync::Lazy;
use podcast_core::{
    BanterLevel, ContentOutline, GenerateRequest, Intent, LanguageModel, OutlineSection, Pace,
    Result, ScriptDraft, ScriptSegment, ScriptTurn, Speaker, StylePreset,
};
use regex::Regex;
use std::collections::HashMap;

const MAX_RETRIES: u32 = 2;

pub struct SlideCue {
    pub turn_index: usize,
    pub text: String,
}

pub struct ParsedScript {
    pub draft: ScriptDraft,
    pub slide_cues: Vec<SlideCue>,
}

pub struct ValidationComplaint {
    pub code: &'static str,
    pub message: String,
}

static LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\[(A|B)\]\s*(.+)$").unwrap());
static STRONG_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{STRONG\}\}").unwrap());
static LAUGH_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{LAUGH:(light|soft|big)\}\}").unwrap());
static SLIDE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[슬라이드:\s*([^\]]+)\]\]").unwrap());
static FORMAL_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(습니다|합니다|입니다)\.?$").unwrap());

/// Host personalities, 20 voice rules per host, frequency budgets, the
/// opening embargo, and the banned-slang list, encoded for the model.
pub fn build_system_prompt(preset: StylePreset, banter_level: BanterLevel) -> String {
    let embargo = preset.opening_no_reaction_sec();
    let strong_cap = preset.strong_reaction_cap();
    let slang = podcast_chemistry::FORBIDDEN_SLANG.join(", ");

    format!(
        "당신은 두 명의 한국어 팟캐스트 진행자(HOST_A, HOST_B)의 대화 대본을 생성합니다.\n\
HOST_A는 차분하고 설명을 담당하는 진행자입니다. 다음 규칙을 지키세요:\n\
1. 항상 반말이 아닌 친근한 해요체를 사용합니다.\n\
2. 문장은 25자 내외로 짧게 끊어 말합니다.\n\
3. 숫자는 자연스럽게 풀어서 말하듯 표현합니다.\n\
4. 전문 용어가 나오면 바로 뒤에 짧게 풀어 설명합니다.\n\
5. 한 번에 하나의 요점만 말합니다.\n\
6. 지나치게 격식체(~습니다)로 끝내지 않습니다.\n\
7. 질문은 HOST_B에게 자연스럽게 넘깁니다.\n\
8. 같은 표현을 반복하지 않습니다.\n\
9. 감탄사는 남발하지 않습니다.\n\
10. 진행 중 주제를 벗어나지 않습니다.\n\
HOST_B는 호기심 많고 반응이 풍부한 진행자입니다. 다음 규칙을 지키세요:\n\
11. 감탄사와 추임새를 적절히 사용합니다.\n\
12. 질문을 통해 대화를 이끌어냅니다.\n\
13. 공감하는 리액션을 보여줍니다.\n\
14. 지나친 리액션은 대화당 {strong_cap}회를 넘기지 않습니다.\n\
15. 방송 시작 {embargo:.0}초 동안은 과한 리액션({{{{STRONG}}}} 마커)을 사용하지 않습니다.\n\
16. 같은 추임새를 연속 두 턴 이상 쓰지 않습니다.\n\
17. 농담이나 드립은 banter level {banter}에 맞춰 조절합니다.\n\
18. 웃음이 나올 때는 {{{{LAUGH:light|soft|big}}}} 마커를 붙입니다.\n\
19. 상대 진행자의 말을 끊지 않습니다.\n\
20. 대화의 흐름을 자연스럽게 이어갑니다.\n\
각 줄은 반드시 `[A] 문장` 또는 `[B] 문장` 형식으로만 출력하세요. 슬라이드가 필요하면 `[[슬라이드: 설명]]`을 해당 줄 끝에 덧붙이세요.\n\
다음 단어들은 절대 사용하지 마세요: {slang}",
        strong_cap = strong_cap,
        embargo = embargo,
        banter = banter_level.value(),
        slang = slang,
    )
}

/// User prompt for one outline section: the episode title, that section's
/// keypoints and examples, and the facts/terms/numbers shared across the
/// whole episode.
pub fn build_user_prompt(outline: &ContentOutline, section: &OutlineSection) -> String {
    let mut parts = vec![format!("에피소드 제목: {}", outline.episode_title)];
    parts.push(format!(
        "섹션 [{:?}] 핵심: {}",
        section.section_type,
        section.keypoints.join(" / ")
    ));
    if !section.examples.is_empty() {
        parts.push(format!("예시: {}", section.examples.join(" / ")));
    }
    if !outline.key_facts.is_empty() {
        parts.push(format!("핵심 사실: {}", outline.key_facts.join(" / ")));
    }
    if !outline.technical_terms.is_empty() {
        parts.push(format!("전문 용어: {}", outline.technical_terms.join(", ")));
    }
    if !outline.extracted_numbers.is_empty() {
        let numbers: Vec<String> = outline.extracted_numbers.iter().map(|n| n.raw_text.clone()).collect();
        parts.push(format!("언급할 숫자: {}", numbers.join(", ")));
    }
    parts.join("\n")
}

fn infer_intent(speaker: Speaker, is_strong: bool) -> Intent {
    match speaker {
        Speaker::HostB if is_strong => Intent::React,
        Speaker::HostB => Intent::AskQuestion,
        _ => Intent::ExplainPoint,
    }
}

/// Parse a raw LLM response for a single outline section into turns,
/// stripping inline markers. Turn ids/indices and slide cue indices are
/// local to this section; the caller renumbers them into the full draft.
pub fn parse_response(response: &str, section_id: &str) -> ParsedScript {
    let mut turns = Vec::new();
    let mut slide_cues = Vec::new();

    for (i, caps) in LINE_RE.captures_iter(response).enumerate() {
        let speaker = if &caps[1] == "A" { Speaker::HostA } else { Speaker::HostB };
        let mut text = caps[2].trim().to_string();

        let is_strong = STRONG_MARKER.is_match(&text);
        text = STRONG_MARKER.replace_all(&text, "").trim().to_string();

        let laugh_tag = LAUGH_MARKER.captures(&text).map(|c| c[1].to_string());
        text = LAUGH_MARKER.replace_all(&text, "").trim().to_string();

        if let Some(slide) = SLIDE_MARKER.captures(&text) {
            slide_cues.push(SlideCue { turn_index: i, text: slide[1].trim().to_string() });
        }
        text = SLIDE_MARKER.replace_all(&text, "").trim().to_string();

        turns.push(ScriptTurn {
            id: format!("turn-{i}"),
            index: i,
            speaker,
            raw_text: text.clone(),
            normalized_text: text,
            ssml: None,
            section_id: section_id.to_string(),
            intent: infer_intent(speaker, is_strong),
            emphasis_words: Vec::new(),
            pace: Pace::Normal,
            pause_ms_before: 300,
            pause_ms_after: 200,
            estimated_duration_ms: 0,
            interjection: None,
            laugh_cue_id: laugh_tag.map(|kind| format!("laugh-{kind}-{i}")),
            humor_tag: None,
            is_strong_reaction: is_strong,
            normalization_log: Vec::new(),
            lexicon_hits: Vec::new(),
            retry_count: 0,
        });
    }

    ParsedScript {
        draft: ScriptDraft { turns, segments: Vec::new() },
        slide_cues,
    }
}

/// Detects opening-window strong reactions, interjection reuse, banned
/// slang, and formal-register endings.
pub fn validate(draft: &ScriptDraft, preset: StylePreset) -> Vec<ValidationComplaint> {
    let mut complaints = Vec::new();
    let mut elapsed = 0.0;
    let mut interjection_counts: HashMap<String, u32> = HashMap::new();

    for turn in &draft.turns {
        if turn.is_strong_reaction && elapsed < preset.opening_no_reaction_sec() {
            complaints.push(ValidationComplaint {
                code: "opening_strong_reaction",
                message: format!(
                    "turn {} uses a strong reaction before the {:.0}s embargo elapses",
                    turn.index,
                    preset.opening_no_reaction_sec()
                ),
            });
        }
        if let Some(interjection) = &turn.interjection {
            *interjection_counts.entry(interjection.text.clone()).or_insert(0) += 1;
        }
        for term in podcast_chemistry::FORBIDDEN_SLANG.iter() {
            if turn.raw_text.contains(term) {
                complaints.push(ValidationComplaint {
                    code: "forbidden_slang",
                    message: format!("turn {} contains banned slang '{}'", turn.index, term),
                });
            }
        }
        if FORMAL_ENDING.is_match(turn.raw_text.trim()) {
            complaints.push(ValidationComplaint {
                code: "formal_register",
                message: format!("turn {} ends in formal register, expected casual-polite 해요체", turn.index),
            });
        }
        elapsed += turn.elapsed_contribution_sec();
    }

    for (text, count) in interjection_counts {
        let allowance = if text == "맞아요" { 3 } else { 2 };
        if count > allowance {
            complaints.push(ValidationComplaint {
                code: "interjection_reuse",
                message: format!("interjection '{text}' used {count} times, over the {allowance} allowance"),
            });
        }
    }

    complaints
}

/// Generate a script via an external LLM, one outline section at a time,
/// retrying each section's prompt with a complaint list up to
/// [`MAX_RETRIES`] times when validation fails. Turns are renumbered into
/// one contiguous draft across sections and a [`ScriptSegment`] is built
/// per section, the same layout [`crate::template::generate_draft`]
/// produces for template mode.
pub async fn generate_script(
    llm: &dyn LanguageModel,
    outline: &ContentOutline,
    preset: StylePreset,
    banter_level: BanterLevel,
) -> Result<(ScriptDraft, Vec<SlideCue>)> {
    let system_prompt = build_system_prompt(preset, banter_level);

    let mut turns = Vec::new();
    let mut segments = Vec::new();
    let mut slide_cues = Vec::new();
    let mut next_index = 0usize;

    for section in &outline.sections {
        let (mut section_turns, mut section_slide_cues) =
            generate_section(llm, &system_prompt, outline, section, preset).await?;

        let start_index = next_index;
        for turn in section_turns.iter_mut() {
            turn.index = next_index;
            turn.id = format!("turn-{next_index}");
            next_index += 1;
        }
        let end_index = next_index.saturating_sub(1);

        for cue in section_slide_cues.iter_mut() {
            cue.turn_index += start_index;
        }

        segments.push(ScriptSegment {
            start_index,
            end_index,
            title: section.id.clone(),
            section_type: section.section_type,
            target_duration_ms: (section.estimated_duration_sec * 1000.0) as u64,
            actual_duration_ms: 0,
        });

        turns.extend(section_turns);
        slide_cues.extend(section_slide_cues);
    }

    for turn in turns.iter_mut() {
        turn.clamp_pauses();
    }

    Ok((ScriptDraft { turns, segments }, slide_cues))
}

async fn generate_section(
    llm: &dyn LanguageModel,
    system_prompt: &str,
    outline: &ContentOutline,
    section: &OutlineSection,
    preset: StylePreset,
) -> Result<(Vec<ScriptTurn>, Vec<SlideCue>)> {
    let base_user_prompt = build_user_prompt(outline, section);
    let mut user_prompt = base_user_prompt.clone();
    let mut attempt = 0u32;

    loop {
        let response = llm
            .generate(GenerateRequest::new(system_prompt.to_string(), user_prompt.clone()))
            .await?;
        let parsed = parse_response(&response.text, &section.id);
        let complaints = validate(&parsed.draft, preset);

        if complaints.is_empty() || attempt >= MAX_RETRIES {
            if !complaints.is_empty() {
                tracing::warn!(
                    section = %section.id,
                    attempt,
                    complaint_count = complaints.len(),
                    "scriptwriter validator exhausted retries; proceeding with remaining complaints"
                );
            }
            return Ok((parsed.draft.turns, parsed.slide_cues));
        }

        attempt += 1;
        let complaint_list = complaints.iter().map(|c| format!("- {}", c.message)).collect::<Vec<_>>().join("\n");
        user_prompt = format!(
            "{base_user_prompt}\n\n이전 응답에서 다음 문제가 발견되었습니다. 수정해서 다시 작성해주세요:\n{complaint_list}",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{GenerateResponse, SectionType};

    fn section(id: &str, section_type: SectionType, order: usize) -> OutlineSection {
        OutlineSection {
            id: id.to_string(),
            section_type,
            keypoints: vec!["핵심 포인트".to_string()],
            examples: vec![],
            estimated_duration_sec: 30.0,
            order,
        }
    }

    struct MockLlm {
        response: String,
    }

    #[async_trait::async_trait]
    impl LanguageModel for MockLlm {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse { text: self.response.clone() })
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    #[test]
    fn parses_speaker_lines_and_strips_markers() {
        let response = "[A] 안녕하세요 오늘도 시작해볼게요\n[B] 와 {{STRONG}} 진짜 기대되네요 {{LAUGH:soft}}\n";
        let parsed = parse_response(response, "sec-0");
        assert_eq!(parsed.draft.turns.len(), 2);
        assert!(parsed.draft.turns[1].is_strong_reaction);
        assert_eq!(parsed.draft.turns[1].laugh_cue_id.as_deref(), Some("laugh-soft-1"));
        assert!(!parsed.draft.turns[1].raw_text.contains("STRONG"));
    }

    #[test]
    fn parses_slide_cue_marker() {
        let response = "[A] 여기 그래프를 보면 [[슬라이드: 매출 추이 그래프]]\n";
        let parsed = parse_response(response, "sec-0");
        assert_eq!(parsed.slide_cues.len(), 1);
        assert_eq!(parsed.slide_cues[0].text, "매출 추이 그래프");
    }

    #[test]
    fn validate_flags_formal_register_endings() {
        let response = "[A] 이것은 테스트입니다\n";
        let parsed = parse_response(response, "sec-0");
        let complaints = validate(&parsed.draft, StylePreset::Friendly);
        assert!(complaints.iter().any(|c| c.code == "formal_register"));
    }

    #[tokio::test]
    async fn generate_script_retries_on_validation_failure_then_succeeds() {
        let llm = MockLlm { response: "[A] 안녕하세요 반가워요\n[B] 네 반가워요\n".to_string() };
        let outline = ContentOutline {
            document_id: "doc".into(),
            episode_title: "title".into(),
            total_estimated_duration_sec: 60.0,
            sections: vec![section("sec-0", SectionType::Opening, 0)],
            key_facts: vec![],
            extracted_numbers: vec![],
            technical_terms: vec![],
            risks: vec![],
        };
        let (draft, _slides) = generate_script(&llm, &outline, StylePreset::Friendly, BanterLevel::new(1)).await.unwrap();
        assert_eq!(draft.turns.len(), 2);
        assert_eq!(draft.segments.len(), 1);
        assert_eq!(draft.segments[0].start_index, 0);
        assert_eq!(draft.segments[0].end_index, 1);
    }

    #[tokio::test]
    async fn generate_script_renumbers_turns_and_segments_across_sections() {
        let llm = MockLlm { response: "[A] 안녕하세요 반가워요\n[B] 네 반가워요\n".to_string() };
        let outline = ContentOutline {
            document_id: "doc".into(),
            episode_title: "title".into(),
            total_estimated_duration_sec: 120.0,
            sections: vec![
                section("sec-0", SectionType::Opening, 0),
                section("sec-1", SectionType::Keypoint, 1),
            ],
            key_facts: vec![],
            extracted_numbers: vec![],
            technical_terms: vec![],
            risks: vec![],
        };
        let (draft, _slides) = generate_script(&llm, &outline, StylePreset::Friendly, BanterLevel::new(1)).await.unwrap();
        assert_eq!(draft.turns.len(), 4);
        assert!(draft.indices_are_contiguous());
        assert_eq!(draft.segments.len(), 2);
        assert_eq!(draft.segments[0].start_index, 0);
        assert_eq!(draft.segments[0].end_index, 1);
        assert_eq!(draft.segments[1].start_index, 2);
        assert_eq!(draft.segments[1].end_index, 3);
        assert_eq!(draft.turns[0].section_id, "sec-0");
        assert_eq!(draft.turns[2].section_id, "sec-1");
        assert!(draft.turns[2].section_id.contains("sec-1"));
    }
}
