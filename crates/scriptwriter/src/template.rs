//! Template-mode script generation: deterministic section-type templates
//! filled from phrase banks

use once_cell::sync::Lazy;
use podcast_core::{
    ContentOutline, Intent, OutlineSection, Pace, ScriptDraft, ScriptSegment, ScriptTurn,
    SectionType, Speaker,
};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::HashMap;

static PHRASE_BANK: Lazy<HashMap<Intent, Vec<&'static str>>> = Lazy::new(|| {
    let mut bank = HashMap::new();
    bank.insert(
        Intent::OpenerHook,
        vec![
            "오늘은 정말 흥미로운 이야기를 준비했어요.",
            "여러분, 이거 알고 계셨어요?",
            "시작하기 전에 하나 여쭤볼게요.",
        ],
    );
    bank.insert(
        Intent::IntroduceTopic,
        vec!["오늘 다룰 주제는 {} 이에요.", "핵심은 바로 {} 인데요."],
    );
    bank.insert(
        Intent::ExplainPoint,
        vec!["{} 에 대해 좀 더 설명드릴게요.", "중요한 건 {} 라는 점이에요."],
    );
    bank.insert(
        Intent::AskQuestion,
        vec!["그럼 {} 는 왜 그런 걸까요?", "혹시 {} 에 대해 들어보셨어요?"],
    );
    bank.insert(
        Intent::GiveExample,
        vec!["예를 들면 {} 같은 경우가 있어요.", "실제로 {} 사례가 있었거든요."],
    );
    bank.insert(
        Intent::React,
        vec!["아 그렇군요.", "정말 흥미롭네요.", "그거 생각 못 했어요."],
    );
    bank.insert(
        Intent::Summarize,
        vec!["정리하면 {} 라고 볼 수 있겠네요.", "결국 핵심은 {} 였어요."],
    );
    bank.insert(
        Intent::Transition,
        vec!["자, 다음 이야기로 넘어가 볼까요.", "이제 다른 부분도 살펴볼게요."],
    );
    bank.insert(
        Intent::Clarify,
        vec!["다시 말하면 {} 라는 뜻이에요.", "조금 더 풀어서 설명하면 {} 예요."],
    );
    bank.insert(
        Intent::Counter,
        vec!["그런데 여기서 주의할 점이 있어요.", "다만 {} 는 조심해야 해요."],
    );
    bank.insert(
        Intent::CallbackJoke,
        vec!["아까 그 얘기 기억나시죠?", "그때 그거랑 비슷하네요."],
    );
    bank.insert(
        Intent::Closing,
        vec![
            "오늘 이야기는 여기까지예요.",
            "다음에 또 좋은 주제로 찾아올게요.",
            "끝까지 들어주셔서 감사해요.",
        ],
    );
    bank
});

fn phrase(intent: Intent, fill: Option<&str>, rng: &mut dyn RngCore) -> String {
    let options = PHRASE_BANK.get(&intent).map(|v| v.as_slice()).unwrap_or(&["..."]);
    let chosen = options.choose(rng).copied().unwrap_or("...");
    match fill {
        Some(text) if chosen.contains("{}") => chosen.replace("{}", text),
        _ => chosen.to_string(),
    }
}

fn pace_for(intent: Intent) -> Pace {
    match intent {
        Intent::React | Intent::CallbackJoke => Pace::Fast,
        Intent::AskQuestion | Intent::Closing | Intent::OpenerHook => Pace::Slow,
        _ => Pace::Normal,
    }
}

fn bare_turn(section_id: &str, speaker: Speaker, intent: Intent, text: String) -> ScriptTurn {
    ScriptTurn {
        id: String::new(),
        index: 0,
        speaker,
        raw_text: text.clone(),
        normalized_text: text,
        ssml: None,
        section_id: section_id.to_string(),
        intent,
        emphasis_words: Vec::new(),
        pace: pace_for(intent),
        pause_ms_before: 300,
        pause_ms_after: 200,
        estimated_duration_ms: 0,
        interjection: None,
        laugh_cue_id: None,
        humor_tag: None,
        is_strong_reaction: false,
        normalization_log: Vec::new(),
        lexicon_hits: Vec::new(),
        retry_count: 0,
    }
}

/// Four distinct four-turn patterns for KEYPOINT sections, chosen at random.
fn keypoint_pattern(section: &OutlineSection, rng: &mut dyn RngCore) -> Vec<ScriptTurn> {
    let keypoint = section.keypoints.first().map(|s| s.as_str()).unwrap_or("이 부분");
    let patterns: [fn(&str, &OutlineSection, &mut dyn RngCore) -> Vec<ScriptTurn>; 4] = [
        |kp, s, rng| {
            vec![
                bare_turn(&s.id, Speaker::HostA, Intent::IntroduceTopic, phrase(Intent::IntroduceTopic, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostA, Intent::ExplainPoint, phrase(Intent::ExplainPoint, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostB, Intent::AskQuestion, phrase(Intent::AskQuestion, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostA, Intent::Clarify, phrase(Intent::Clarify, Some(kp), rng)),
            ]
        },
        |kp, s, rng| {
            vec![
                bare_turn(&s.id, Speaker::HostB, Intent::AskQuestion, phrase(Intent::AskQuestion, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostA, Intent::ExplainPoint, phrase(Intent::ExplainPoint, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostB, Intent::React, phrase(Intent::React, None, rng)),
                bare_turn(&s.id, Speaker::HostA, Intent::GiveExample, phrase(Intent::GiveExample, Some(kp), rng)),
            ]
        },
        |kp, s, rng| {
            vec![
                bare_turn(&s.id, Speaker::HostA, Intent::IntroduceTopic, phrase(Intent::IntroduceTopic, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostB, Intent::React, phrase(Intent::React, None, rng)),
                bare_turn(&s.id, Speaker::HostA, Intent::ExplainPoint, phrase(Intent::ExplainPoint, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostB, Intent::Summarize, phrase(Intent::Summarize, Some(kp), rng)),
            ]
        },
        |kp, s, rng| {
            vec![
                bare_turn(&s.id, Speaker::HostA, Intent::ExplainPoint, phrase(Intent::ExplainPoint, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostB, Intent::Clarify, phrase(Intent::Clarify, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostA, Intent::GiveExample, phrase(Intent::GiveExample, Some(kp), rng)),
                bare_turn(&s.id, Speaker::HostB, Intent::React, phrase(Intent::React, None, rng)),
            ]
        },
    ];
    let pattern = patterns.choose(rng).expect("patterns is non-empty");
    pattern(keypoint, section, rng)
}

fn section_turns(section: &OutlineSection, rng: &mut dyn RngCore) -> Vec<ScriptTurn> {
    match section.section_type {
        SectionType::Opening => vec![
            bare_turn(&section.id, Speaker::HostA, Intent::OpenerHook, phrase(Intent::OpenerHook, None, rng)),
            bare_turn(&section.id, Speaker::HostB, Intent::React, phrase(Intent::React, None, rng)),
        ],
        SectionType::Keypoint => keypoint_pattern(section, rng),
        SectionType::Example => {
            let example = section.examples.first().map(|s| s.as_str()).unwrap_or("이 사례");
            vec![
                bare_turn(&section.id, Speaker::HostA, Intent::GiveExample, phrase(Intent::GiveExample, Some(example), rng)),
                bare_turn(&section.id, Speaker::HostB, Intent::React, phrase(Intent::React, None, rng)),
            ]
        }
        SectionType::Analogy => {
            let keypoint = section.keypoints.first().map(|s| s.as_str()).unwrap_or("이 개념");
            vec![
                bare_turn(&section.id, Speaker::HostA, Intent::ExplainPoint, phrase(Intent::ExplainPoint, Some(keypoint), rng)),
                bare_turn(&section.id, Speaker::HostB, Intent::Clarify, phrase(Intent::Clarify, Some(keypoint), rng)),
            ]
        }
        SectionType::Caution => {
            let keypoint = section.keypoints.first().map(|s| s.as_str()).unwrap_or("이 부분");
            vec![
                bare_turn(&section.id, Speaker::HostA, Intent::Counter, phrase(Intent::Counter, Some(keypoint), rng)),
                bare_turn(&section.id, Speaker::HostB, Intent::React, phrase(Intent::React, None, rng)),
            ]
        }
        SectionType::Counter => {
            let keypoint = section.keypoints.first().map(|s| s.as_str()).unwrap_or("이 주장");
            vec![
                bare_turn(&section.id, Speaker::HostA, Intent::Counter, phrase(Intent::Counter, Some(keypoint), rng)),
                bare_turn(&section.id, Speaker::HostB, Intent::Clarify, phrase(Intent::Clarify, Some(keypoint), rng)),
            ]
        }
        SectionType::Recap => {
            let keypoint = section.keypoints.first().map(|s| s.as_str()).unwrap_or("오늘 이야기");
            vec![
                bare_turn(&section.id, Speaker::HostA, Intent::Summarize, phrase(Intent::Summarize, Some(keypoint), rng)),
                bare_turn(&section.id, Speaker::HostB, Intent::Transition, phrase(Intent::Transition, None, rng)),
            ]
        }
        SectionType::Closing => {
            let variants: [[&str; 2]; 3] = [
                ["오늘 이야기는 여기까지예요.", "다음에 또 좋은 주제로 찾아올게요."],
                ["여기까지 준비한 내용을 모두 전해드렸어요.", "끝까지 들어주셔서 감사해요."],
                ["자, 오늘 방송은 여기서 마무리할게요.", "다음 에피소드에서 다시 만나요."],
            ];
            let variant = variants.choose(rng).expect("variants is non-empty");
            vec![
                bare_turn(&section.id, Speaker::HostA, Intent::Closing, variant[0].to_string()),
                bare_turn(&section.id, Speaker::HostB, Intent::Closing, variant[1].to_string()),
            ]
        }
    }
}

/// Generate a full [`ScriptDraft`] from a [`ContentOutline`] using
/// deterministic, template-filled turns (template mode).
pub fn generate_draft(outline: &ContentOutline) -> ScriptDraft {
    let mut rng = rand::thread_rng();
    let mut turns = Vec::new();
    let mut segments = Vec::new();
    let mut next_index = 0usize;

    for section in &outline.sections {
        let start_index = next_index;
        let mut raw_turns = section_turns(section, &mut rng);
        for turn in raw_turns.iter_mut() {
            turn.id = format!("turn-{next_index}");
            turn.index = next_index;
            next_index += 1;
        }
        let end_index = next_index - 1;
        segments.push(ScriptSegment {
            start_index,
            end_index,
            title: section.id.clone(),
            section_type: section.section_type,
            target_duration_ms: (section.estimated_duration_sec * 1000.0) as u64,
            actual_duration_ms: 0,
        });
        turns.extend(raw_turns);
    }

    for turn in turns.iter_mut() {
        turn.clamp_pauses();
        turn.estimated_duration_ms = (turn.elapsed_contribution_sec() * 1000.0) as u64;
    }

    ScriptDraft { turns, segments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::ExtractedNumber;

    fn outline() -> ContentOutline {
        ContentOutline {
            document_id: "doc-1".into(),
            episode_title: "title".into(),
            total_estimated_duration_sec: 180.0,
            sections: vec![
                OutlineSection {
                    id: "sec-opening".into(),
                    section_type: SectionType::Opening,
                    keypoints: vec![],
                    examples: vec![],
                    estimated_duration_sec: 30.0,
                    order: 0,
                },
                OutlineSection {
                    id: "sec-keypoint".into(),
                    section_type: SectionType::Keypoint,
                    keypoints: vec!["핵심 개념".into()],
                    examples: vec![],
                    estimated_duration_sec: 60.0,
                    order: 1,
                },
            ],
            key_facts: vec![],
            extracted_numbers: Vec::<ExtractedNumber>::new(),
            technical_terms: vec![],
            risks: vec![],
        }
    }

    #[test]
    fn generates_contiguous_indices_and_segments() {
        let draft = generate_draft(&outline());
        assert!(draft.indices_are_contiguous());
        assert_eq!(draft.segments.len(), 2);
        assert_eq!(draft.segments[0].start_index, 0);
        assert_eq!(draft.segments[1].start_index, 2);
    }

    #[test]
    fn first_turn_has_zero_pause_before() {
        let draft = generate_draft(&outline());
        assert_eq!(draft.turns[0].pause_ms_before, 0);
    }
}
