//! SSML compiler
//!
//! Emits a provider-scoped `<speak>` fragment for one turn: a leading
//! pause, a leading interjection (if flagged `start`), the body (Google
//! gets a `<prosody>` wrapper with per-word emphasis; other providers get
//! plain text, with rate passed to the API call instead), a trailing
//! interjection (if flagged `end`), and a trailing pause. Laugh-cue
//! markers embedded in the turn text (e.g. "(피식)") are stripped here —
//! those become audio later, in the audio processor.

use once_cell::sync::Lazy;
use podcast_core::{InterjectionPosition, Pace, ScriptTurn, TtsProviderId};
use regex::Regex;

static LAUGH_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*(?:피식|웃음|하하|호호|키득|큭큭|풉)[^()]*\)").unwrap());

/// Strip laugh-cue markers from text, collapsing any resulting double spaces.
pub fn strip_laugh_markers(text: &str) -> String {
    LAUGH_MARKER_RE.replace_all(text, "").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Google `<prosody rate>` value for a pace.
pub fn prosody_rate(pace: Pace) -> f32 {
    match pace {
        Pace::Slow => 0.9,
        Pace::Normal => 1.0,
        Pace::Fast => 1.1,
    }
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn emphasize(body_escaped: &str, emphasis_words: &[String]) -> String {
    let mut result = body_escaped.to_string();
    for word in emphasis_words {
        let escaped_word = escape_ssml(word);
        if escaped_word.is_empty() || !result.contains(&escaped_word) {
            continue;
        }
        let wrapped = format!("<emphasis level=\"strong\">{escaped_word}</emphasis>");
        result = result.replacen(&escaped_word, &wrapped, 1);
    }
    result
}

/// Compile one turn's SSML/text fragment for the given provider.
pub fn compile(turn: &ScriptTurn, provider: TtsProviderId) -> String {
    let body_text = strip_laugh_markers(&turn.normalized_text);

    let mut out = String::from("<speak>");
    if turn.pause_ms_before > 0 {
        out.push_str(&format!("<break time=\"{}ms\"/>", turn.pause_ms_before));
    }

    let leading = turn.interjection.as_ref().filter(|i| i.position == InterjectionPosition::Start);
    if let Some(interjection) = leading {
        out.push_str(&escape_ssml(&interjection.text));
        out.push_str("<break time=\"100ms\"/>");
    }

    match provider {
        TtsProviderId::Google => {
            out.push_str(&format!("<prosody rate=\"{}\">", prosody_rate(turn.pace)));
            out.push_str(&emphasize(&escape_ssml(&body_text), &turn.emphasis_words));
            out.push_str("</prosody>");
        }
        TtsProviderId::OpenAi | TtsProviderId::ElevenLabs | TtsProviderId::Azure => {
            out.push_str(&escape_ssml(&body_text));
        }
    }

    let trailing = turn.interjection.as_ref().filter(|i| i.position == InterjectionPosition::End);
    if let Some(interjection) = trailing {
        out.push_str("<break time=\"100ms\"/>");
        out.push_str(&escape_ssml(&interjection.text));
    }

    if turn.pause_ms_after > 0 {
        out.push_str(&format!("<break time=\"{}ms\"/>", turn.pause_ms_after));
    }

    out.push_str("</speak>");
    out
}

/// Plain-text body (no markup) for providers that don't accept SSML, with
/// laugh-cue markers stripped the same way [`compile`] does.
pub fn plain_text(turn: &ScriptTurn) -> String {
    let mut body = strip_laugh_markers(&turn.normalized_text);
    if let Some(interjection) = turn.interjection.as_ref().filter(|i| i.position == InterjectionPosition::Start) {
        body = format!("{} {}", interjection.text, body);
    }
    if let Some(interjection) = turn.interjection.as_ref().filter(|i| i.position == InterjectionPosition::End) {
        body = format!("{} {}", body, interjection.text);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{Intent, InterjectionPosition, Pace, Speaker, TurnInterjection};

    fn turn() -> ScriptTurn {
        ScriptTurn {
            id: "t0".into(),
            index: 0,
            speaker: Speaker::HostB,
            raw_text: "정말 놀라워요 (피식) 그렇죠".into(),
            normalized_text: "정말 놀라워요 (피식) 그렇죠".into(),
            ssml: None,
            section_id: "sec-0".into(),
            intent: Intent::React,
            emphasis_words: vec!["놀라워요".into()],
            pace: Pace::Fast,
            pause_ms_before: 300,
            pause_ms_after: 150,
            estimated_duration_ms: 0,
            interjection: Some(TurnInterjection {
                text: "와".into(),
                category: "SurpriseWow".into(),
                position: InterjectionPosition::Start,
            }),
            laugh_cue_id: None,
            humor_tag: None,
            is_strong_reaction: false,
            normalization_log: vec![],
            lexicon_hits: vec![],
            retry_count: 0,
        }
    }

    #[test]
    fn google_ssml_wraps_prosody_and_emphasis() {
        let ssml = compile(&turn(), TtsProviderId::Google);
        assert!(ssml.starts_with("<speak>"));
        assert!(ssml.ends_with("</speak>"));
        assert!(ssml.contains("<break time=\"300ms\"/>"));
        assert!(ssml.contains("와<break time=\"100ms\"/>"));
        assert!(ssml.contains("<prosody rate=\"1.1\">"));
        assert!(ssml.contains("<emphasis level=\"strong\">놀라워요</emphasis>"));
        assert!(!ssml.contains("피식"));
        assert!(ssml.contains("<break time=\"150ms\"/>"));
    }

    #[test]
    fn non_google_provider_skips_prosody_wrapper() {
        let ssml = compile(&turn(), TtsProviderId::OpenAi);
        assert!(!ssml.contains("<prosody"));
        assert!(!ssml.contains("<emphasis"));
        assert!(ssml.contains("놀라워요"));
    }

    #[test]
    fn plain_text_prepends_leading_interjection_and_strips_laugh_marker() {
        let text = plain_text(&turn());
        assert!(text.starts_with("와 "));
        assert!(!text.contains("피식"));
    }
}
