//! Stage orchestration and the regeneration loop
//!
//! Stages run strictly in sequence (ingest → script → normalize →
//! synthesize → audio → QA); a failed QA gate re-enters the earliest
//! stage its selected strategy requires rather than restarting the whole
//! run, bounded by `regeneration.max_attempts`. Cancellation is checked
//! at every stage boundary and between TTS provider partitions via a
//! cooperative `Arc<AtomicBool>` flag, the coarsest grain a long-running
//! async pipeline can poll without threading a signal through every
//! inner loop.

use crate::ingest;
use crate::timeline::DebugTimeline;
use crate::types::{PipelineInput, PipelineOutput, Statistics};
use crate::voices;
use podcast_audio::AudioProcessor;
use podcast_chemistry::ChemistryEngine;
use podcast_config::ProviderCredentials;
use podcast_core::{
    EnrichedScript, Error, LanguageModel, MediaTool, RegenerationStrategy, Result, ScriptTurn, Speaker,
    TtsSynthesisResult,
};
use podcast_normalizer::{Lexicon, Normalizer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

fn check_cancelled(cancel: &AtomicBool, stage: &str) -> Result<()> {
    if cancel.load(Ordering::SeqCst) {
        return Err(Error::Cancelled { stage: stage.to_string() });
    }
    Ok(())
}

fn normalize_all_turns(enriched: &mut EnrichedScript, normalizer: &Normalizer) {
    for turn in enriched.draft.turns.iter_mut() {
        let outcome = normalizer.normalize(&turn.id, &turn.raw_text);
        turn.lexicon_hits = outcome.log.iter().filter(|e| e.rule == "lexicon_lookup").map(|e| e.original.clone()).collect();
        turn.normalization_log = outcome.log;
        turn.normalized_text = outcome.normalized_text;
        for warning in &outcome.warnings {
            warn!(turn_id = %turn.id, token = %warning.token, "unresolved token during normalization");
        }
    }
}

pub struct Orchestrator {
    media: Arc<dyn MediaTool>,
    llm: Option<Arc<dyn LanguageModel>>,
}

impl Orchestrator {
    pub fn new(media: Arc<dyn MediaTool>, llm: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { media, llm }
    }

    /// Synthesize every turn, partitioning by speaker so each gets its own
    /// voice profile, then re-assembling by turn index. Synthesis within
    /// a partition runs through `podcast_tts::synthesize_batch`'s own
    /// concurrency grouping; cancellation is only checked between
    /// partitions, which is the coarsest grain the batch API exposes.
    async fn synthesize(&self, enriched: &EnrichedScript, config: &podcast_config::PipelineConfig, cancel: &AtomicBool) -> Result<Vec<TtsSynthesisResult>> {
        let provider_id = voices::select_provider_id(&config.credentials);
        let provider = podcast_tts::build_provider(provider_id, &config.credentials, std::time::Duration::from_secs(config.tts.timeout_secs));

        let turns = &enriched.draft.turns;
        let mut slots: Vec<Option<TtsSynthesisResult>> = (0..turns.len()).map(|_| None).collect();

        for speaker in [Speaker::HostA, Speaker::HostB, Speaker::Guest] {
            check_cancelled(cancel, "tts")?;

            let indices: Vec<usize> = turns.iter().enumerate().filter(|(_, t)| t.speaker == speaker).map(|(i, _)| i).collect();
            if indices.is_empty() {
                continue;
            }
            let sub_turns: Vec<ScriptTurn> = indices.iter().map(|&i| turns[i].clone()).collect();
            let voice = voices::voice_for_speaker(speaker, provider_id);

            let items = podcast_tts::synthesize_batch(&sub_turns, provider.clone(), provider_id, &voice, config.tts.concurrency, config.tts.max_retries).await;
            for (idx, item) in indices.into_iter().zip(items) {
                if item.needs_resynthesis {
                    warn!(turn_id = %item.result.turn_id, "turn degraded to placeholder audio after exhausting retries");
                }
                slots[idx] = Some(item.result);
            }
        }

        Ok(slots.into_iter().enumerate().map(|(i, r)| r.unwrap_or_else(|| placeholder_for_missing(i))).collect())
    }

    /// Run one full episode render, regenerating within the same run up
    /// to `config.regeneration.max_attempts` times when the QA gate fails.
    pub async fn run(&self, input: PipelineInput, cancel: Arc<AtomicBool>) -> Result<PipelineOutput> {
        let started_at = Instant::now();
        let config = &input.config;
        let lexicon = Lexicon::with_entries(input.user_lexicon.clone());
        let normalizer = Normalizer::new(lexicon);
        let chemistry = ChemistryEngine::new(config.style_preset, config.banter_level);
        let mut timeline = DebugTimeline::new();

        let mut redo_ingest = true;
        let mut redo_script = true;
        let mut redo_normalize = true;

        let mut outline = None;
        let mut enriched: Option<EnrichedScript> = None;
        let mut regeneration_attempts = 0u32;
        let mut attempt = 0u32;

        let (final_enriched, final_audio, _final_synthesis, final_report) = loop {
            check_cancelled(&cancel, "stage-boundary")?;

            if redo_ingest {
                outline = Some(ingest::ingest(&input.sources, config.target_duration_sec)?);
                timeline.record("ingest");
                redo_ingest = false;
            }
            let outline_ref = outline.as_ref().expect("outline is populated before first use");

            if redo_script {
                let (draft, _slide_cues) = podcast_scriptwriter::write_script(
                    config.scriptwriter_mode,
                    self.llm.as_deref(),
                    outline_ref,
                    config.style_preset,
                    config.banter_level,
                )
                .await?;
                let (new_enriched, humor_report) = chemistry.enrich(draft);
                info!(humor_score = humor_report.score, "script enriched");
                enriched = Some(new_enriched);
                timeline.record("script");
                redo_script = false;
                redo_normalize = true;
            }

            if redo_normalize {
                let e = enriched.as_mut().expect("enriched script is populated before normalization");
                normalize_all_turns(e, &normalizer);
                timeline.record("normalize");
                redo_normalize = false;
            }

            check_cancelled(&cancel, "tts")?;
            let e = enriched.as_ref().expect("enriched script is populated before synthesis");
            let synthesis_results = self.synthesize(e, config, &cancel).await?;
            timeline.record("synthesis");

            check_cancelled(&cancel, "audio")?;
            let audio_processor = AudioProcessor::new(self.media.clone());
            let audio_result = audio_processor.render(&synthesis_results, e, &config.audio).await?;
            timeline.record("audio");

            let report = podcast_qa::analyze(e, &audio_result, &synthesis_results, &config.qa);
            timeline.record_with_detail("qa", format!("overall_score={}", report.overall_score));

            if report.passed || attempt >= config.regeneration.max_attempts {
                break (enriched.take().unwrap(), audio_result, synthesis_results, report);
            }

            regeneration_attempts += 1;
            attempt += 1;
            let strategy = report.selected_strategy.unwrap_or(RegenerationStrategy::AdjustScript);
            timeline.record_with_detail("regenerate", format!("{strategy:?}"));
            warn!(?strategy, attempt, overall_score = report.overall_score, "qa gate failed, regenerating");

            match strategy {
                RegenerationStrategy::ReSynthesize => {}
                RegenerationStrategy::AdjustScript => {
                    podcast_qa::apply_adjust_script(enriched.as_mut().expect("enriched script present during regeneration"));
                }
                RegenerationStrategy::ReNormalize => redo_normalize = true,
                RegenerationStrategy::RegenerateScript => redo_script = true,
                RegenerationStrategy::FullRegeneration => {
                    redo_ingest = true;
                    redo_script = true;
                }
            }
        };

        tokio::fs::create_dir_all(&input.output_dir).await?;

        let stats = Statistics {
            total_duration_ms: final_audio.duration_ms,
            turn_count: final_enriched.draft.turns.len(),
            regeneration_attempts,
            processing_time_ms: started_at.elapsed().as_millis() as u64,
            lexicon_hits: final_enriched.draft.turns.iter().map(|t| t.lexicon_hits.len() as u32).sum(),
            normalization_changes: final_enriched.draft.turns.iter().map(|t| t.normalization_log.len() as u32).sum(),
            laughs_inserted: final_audio.processing_log.laughs_inserted,
        };

        let audio_path = input.output_dir.join(match final_audio.format {
            podcast_core::AudioFormat::Mp3 => "episode.mp3",
            podcast_core::AudioFormat::Wav => "episode.wav",
        });
        tokio::fs::write(&audio_path, &final_audio.audio_bytes).await?;

        let transcript_path = input.output_dir.join("transcript.txt");
        let transcript = final_enriched
            .draft
            .turns
            .iter()
            .map(|t| format!("[{}] {}", t.speaker.transcript_tag(), t.normalized_text))
            .collect::<Vec<_>>()
            .join("\n\n");
        tokio::fs::write(&transcript_path, transcript).await?;

        let script_json = serde_json::to_vec_pretty(&final_enriched).map_err(|e| Error::Io(e.to_string()))?;
        let script_json_path = input.output_dir.join("script.json");
        tokio::fs::write(&script_json_path, script_json).await?;

        let chapters_json = serde_json::to_vec_pretty(&final_audio.chapters).map_err(|e| Error::Io(e.to_string()))?;
        let chapters_json_path = input.output_dir.join("chapters.json");
        tokio::fs::write(&chapters_json_path, chapters_json).await?;

        let qa_report_json = serde_json::to_vec_pretty(&final_report).map_err(|e| Error::Io(e.to_string()))?;
        let qa_report_path = input.output_dir.join("qa_report.json");
        tokio::fs::write(&qa_report_path, qa_report_json).await?;

        let debug_bundle_path = if std::env::var("PODCAST_STUDIO_DEBUG_BUNDLE").is_ok() {
            let timeline_json = serde_json::to_vec_pretty(&timeline).map_err(|e| Error::Io(e.to_string()))?;
            let path = input.output_dir.join("debug_timeline.json");
            tokio::fs::write(&path, timeline_json).await?;
            Some(path)
        } else {
            None
        };

        Ok(PipelineOutput {
            success: final_report.passed,
            audio_path,
            transcript_path,
            script_json_path,
            chapters_json_path,
            qa_report_path,
            debug_bundle_path,
            stats,
            qa_report: final_report,
        })
    }
}

fn placeholder_for_missing(index: usize) -> TtsSynthesisResult {
    TtsSynthesisResult {
        turn_id: format!("missing-{index}"),
        audio_bytes: Vec::new(),
        duration_ms: 0,
        format: podcast_core::AudioFormat::Wav,
        sample_rate: 24000,
        synthesis_log: podcast_core::SynthesisLog {
            provider: "none".to_string(),
            voice_id: "none".to_string(),
            request_time_ms: 0,
            lexicon_hits: 0,
            retries: 0,
            warnings: vec!["no synthesis result was produced for this turn".to_string()],
        },
    }
}

/// Build the credentials-backed LLM adapter when the configured mode
/// needs one and an OpenAI key is present. Template mode never calls
/// this; LLM mode with no key surfaces the existing "no LanguageModel
/// provided" error from `podcast_scriptwriter::write_script`.
pub fn build_llm(credentials: &ProviderCredentials) -> Option<Arc<dyn LanguageModel>> {
    credentials
        .openai
        .as_ref()
        .map(|key| Arc::new(crate::llm_provider::OpenAiLanguageModel::new(key.clone(), "gpt-4o-mini", std::time::Duration::from_secs(60))) as Arc<dyn LanguageModel>)
}
