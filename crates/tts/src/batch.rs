//! Batch synthesis across a concurrency-bounded group of outbound
//! requests //!
//! Requests are processed in groups of at most `concurrency`, each group
//! fully parallel; groups run sequentially so ordering of results by turn
//! index is preserved. A request that fails after its retries are
//! exhausted degrades to a silent placeholder rather than aborting the
//! batch — the turn is marked for resynthesis via a warning in its
//! synthesis log, which the QA analyzer picks up.

use crate::providers::dev::silent_wav;
use crate::ssml;
use podcast_core::{
    with_retries, AudioFormat, ScriptTurn, SynthesisLog, TtsProvider, TtsProviderId, TtsSynthesisResult, VoiceProfile,
};
use std::sync::Arc;
use std::time::Duration;

/// One turn's synthesis outcome, with a flag for whether it degraded to a
/// placeholder after exhausting retries.
pub struct BatchItem {
    pub result: TtsSynthesisResult,
    pub needs_resynthesis: bool,
}

fn degraded_result(turn: &ScriptTurn, provider_name: &str, voice: &VoiceProfile, retries: u32, error: String) -> TtsSynthesisResult {
    let duration_ms = TtsSynthesisResult::estimate_duration_ms(&turn.normalized_text).max(500);
    TtsSynthesisResult {
        turn_id: turn.id.clone(),
        audio_bytes: silent_wav(duration_ms, 24000),
        duration_ms,
        format: AudioFormat::Wav,
        sample_rate: 24000,
        synthesis_log: SynthesisLog {
            provider: provider_name.to_string(),
            voice_id: voice.voice_id.clone(),
            request_time_ms: 0,
            lexicon_hits: 0,
            retries,
            warnings: vec![format!("synthesis failed after {retries} retries: {error}; marked for resynthesis")],
        },
    }
}

async fn synthesize_one(provider: Arc<dyn TtsProvider>, turn: ScriptTurn, voice: VoiceProfile, provider_id: TtsProviderId, max_retries: u32) -> BatchItem {
    let fragment = if provider_id == TtsProviderId::Google {
        ssml::compile(&turn, provider_id)
    } else {
        ssml::plain_text(&turn)
    };

    let outcome = with_retries(max_retries, Duration::from_millis(100), |_attempt| {
        let provider = provider.clone();
        let turn = turn.clone();
        let voice = voice.clone();
        let fragment = fragment.clone();
        async move { provider.synthesize_turn(&turn, &fragment, &voice).await }
    })
    .await;

    match outcome {
        Ok(mut result) => {
            result.synthesis_log.retries = 0;
            BatchItem { result, needs_resynthesis: false }
        }
        Err(err) => BatchItem {
            result: degraded_result(&turn, provider.provider_name(), &voice, max_retries, err.to_string()),
            needs_resynthesis: true,
        },
    }
}

/// Synthesize every turn, preserving ascending turn-index order in the
/// output, with at most `concurrency` requests in flight at once.
pub async fn synthesize_batch(
    turns: &[ScriptTurn],
    provider: Arc<dyn TtsProvider>,
    provider_id: TtsProviderId,
    voice: &VoiceProfile,
    concurrency: usize,
    max_retries: u32,
) -> Vec<BatchItem> {
    let concurrency = concurrency.max(1);
    let mut out = Vec::with_capacity(turns.len());

    for group in turns.chunks(concurrency) {
        let futures = group.iter().map(|turn| {
            synthesize_one(provider.clone(), turn.clone(), voice.clone(), provider_id, max_retries)
        });
        let group_results = futures::future::join_all(futures).await;
        out.extend(group_results);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::dev::DevModeProvider;
    use async_trait::async_trait;
    use podcast_core::{Error, Intent, Pace, Result, Speaker, VoiceGender, VoiceRole};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn turn(index: usize) -> ScriptTurn {
        ScriptTurn {
            id: format!("t{index}"),
            index,
            speaker: Speaker::HostA,
            raw_text: "테스트 문장입니다".into(),
            normalized_text: "테스트 문장입니다".into(),
            ssml: None,
            section_id: "sec-0".into(),
            intent: Intent::ExplainPoint,
            emphasis_words: vec![],
            pace: Pace::Normal,
            pause_ms_before: 0,
            pause_ms_after: 0,
            estimated_duration_ms: 0,
            interjection: None,
            laugh_cue_id: None,
            humor_tag: None,
            is_strong_reaction: false,
            normalization_log: vec![],
            lexicon_hits: vec![],
            retry_count: 0,
        }
    }

    fn voice() -> VoiceProfile {
        VoiceProfile {
            provider: TtsProviderId::Google,
            voice_id: "v".into(),
            language: "ko-KR".into(),
            gender: VoiceGender::Female,
            role: VoiceRole::StableExplainer,
            pitch_offset: 0.0,
            speaking_rate: 1.0,
        }
    }

    #[tokio::test]
    async fn preserves_order_across_groups() {
        let provider: Arc<dyn TtsProvider> = Arc::new(DevModeProvider::new("google"));
        let turns: Vec<ScriptTurn> = (0..7).map(turn).collect();
        let results = synthesize_batch(&turns, provider, TtsProviderId::Google, &voice(), 3, 2).await;
        assert_eq!(results.len(), 7);
        for (i, item) in results.iter().enumerate() {
            assert_eq!(item.result.turn_id, format!("t{i}"));
            assert!(!item.needs_resynthesis);
        }
    }

    struct AlwaysFailsProvider {
        attempts: AtomicU32,
    }

    #[async_trait]
    impl TtsProvider for AlwaysFailsProvider {
        async fn synthesize_turn(&self, _turn: &ScriptTurn, _ssml_or_text: &str, _voice: &VoiceProfile) -> Result<TtsSynthesisResult> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(Error::Tts("simulated provider outage".to_string()))
        }

        fn provider_name(&self) -> &'static str {
            "always-fails"
        }
    }

    #[tokio::test]
    async fn degrades_to_placeholder_after_exhausting_retries() {
        let provider: Arc<dyn TtsProvider> = Arc::new(AlwaysFailsProvider { attempts: AtomicU32::new(0) });
        let turns = vec![turn(0)];
        let results = synthesize_batch(&turns, provider, TtsProviderId::Google, &voice(), 3, 2).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].needs_resynthesis);
        assert!(!results[0].result.audio_bytes.is_empty());
        assert!(results[0].result.synthesis_log.warnings[0].contains("marked for resynthesis"));
    }
}
