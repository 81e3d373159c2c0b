//! Audio post-production orchestration
//!
//! Strictly sequential: concatenate with crossfades, insert laugh cues,
//! normalize loudness, optionally compress/de-ess/add room tone, derive
//! chapter markers, and export. Each step's output is the next step's
//! input buffer.

use crate::laugh_clips;
use podcast_config::AudioSettings;
use podcast_core::{
    AudioFormat, AudioProcessingLog, ChapterMarker, EnrichedScript, FinalAudioResult, LaughCue, MediaTool, Result,
    ScriptSegment, TtsSynthesisResult,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AudioProcessor {
    media: Arc<dyn MediaTool>,
}

impl AudioProcessor {
    pub fn new(media: Arc<dyn MediaTool>) -> Self {
        Self { media }
    }

    /// Cumulative sum of the first `count` turn durations, in ms.
    fn cumulative_duration_ms(durations: &[u64], count: usize) -> u64 {
        durations.iter().take(count).sum()
    }

    async fn insert_laugh_cues(&self, mut track: Vec<u8>, laugh_cues: &[LaughCue], durations: &[u64], log: &mut AudioProcessingLog) -> Result<Vec<u8>> {
        let mut ordered: Vec<&LaughCue> = laugh_cues.iter().collect();
        ordered.sort_by_key(|c| c.insert_after_turn_index);

        for cue in ordered {
            let offset_ms = Self::cumulative_duration_ms(durations, cue.insert_after_turn_index + 1);
            let next_turn_duration_ms = durations.get(cue.insert_after_turn_index + 1).copied();

            let trimmed_duration_ms = match next_turn_duration_ms {
                Some(next_ms) => {
                    let overlap_ms = next_ms.min(cue.duration_ms as u64);
                    let allowed_overlap_ms = (cue.duration_ms as u64).saturating_sub(100);
                    if overlap_ms > allowed_overlap_ms {
                        allowed_overlap_ms.max(1)
                    } else {
                        cue.duration_ms as u64
                    }
                }
                None => cue.duration_ms as u64,
            };

            let clip = laugh_clips::synthesize(cue.intensity, cue.duration_ms);
            let clip = if trimmed_duration_ms < cue.duration_ms as u64 {
                laugh_clips::trim_wav(&clip, trimmed_duration_ms as u32, 24000)
            } else {
                clip
            };

            track = self.media.mix_at_offset(&track, &clip, offset_ms, cue.volume_offset_db).await?;
            log.laughs_inserted += 1;
        }

        Ok(track)
    }

    fn chapters_from_segments(segments: &[ScriptSegment], durations: &[u64]) -> Vec<ChapterMarker> {
        segments
            .iter()
            .map(|segment| {
                let start_ms = Self::cumulative_duration_ms(durations, segment.start_index);
                let end_ms = Self::cumulative_duration_ms(durations, segment.end_index + 1);
                ChapterMarker {
                    id: format!("chapter-{}", segment.start_index),
                    title: segment.title.clone(),
                    start_ms,
                    end_ms,
                    section_type: segment.section_type,
                }
            })
            .collect()
    }

    /// Render the final mixed-down episode from per-turn synthesis
    /// results and the enriched script's derived tables.
    pub async fn render(&self, synthesis_results: &[TtsSynthesisResult], enriched: &EnrichedScript, settings: &AudioSettings) -> Result<FinalAudioResult> {
        let mut log = AudioProcessingLog::default();
        let durations: Vec<u64> = synthesis_results.iter().map(|r| r.duration_ms).collect();
        let buffers: Vec<Vec<u8>> = synthesis_results.iter().map(|r| r.audio_bytes.clone()).collect();

        let mut track = self.media.crossfade_concat(&buffers, settings.crossfade_ms).await?;
        log.stages_run.push("crossfade_concat".to_string());
        log.crossfades_applied = buffers.len().saturating_sub(1) as u32;

        track = self.insert_laugh_cues(track, &enriched.laugh_cues, &durations, &mut log).await?;
        if !enriched.laugh_cues.is_empty() {
            log.stages_run.push("laugh_insertion".to_string());
        }

        let (mut track, loudness) = self.media.normalize_loudness(&track, settings.target_loudness_lufs).await?;
        log.stages_run.push("loudness_normalization".to_string());
        info!(
            integrated_lufs = loudness.integrated_lufs,
            true_peak_dbtp = loudness.true_peak_dbtp,
            loudness_range = loudness.loudness_range,
            "normalized loudness"
        );

        if settings.compression_enabled {
            track = self
                .media
                .compress(&track, settings.compression_threshold_db, settings.compression_ratio, 5.0, 50.0)
                .await?;
            log.stages_run.push("compression".to_string());
        }

        if settings.de_esser_enabled {
            track = self.media.de_ess(&track, settings.de_esser_frequency_hz).await?;
            log.stages_run.push("de_essing".to_string());
        }

        if settings.room_tone_enabled {
            track = self.media.add_room_tone(&track, settings.room_tone_level_db).await?;
            log.stages_run.push("room_tone".to_string());
        }

        let chapters = Self::chapters_from_segments(&enriched.draft.segments, &durations);

        let (audio_bytes, format, sample_rate) = match settings.output_format {
            AudioFormat::Wav => {
                let wav = self.media.transcode_to_wav(&track, settings.sample_rate).await?;
                log.stages_run.push("transcode_to_wav".to_string());
                (wav, AudioFormat::Wav, settings.sample_rate)
            }
            AudioFormat::Mp3 => (track, AudioFormat::Mp3, settings.sample_rate),
        };

        let duration_ms = self.media.probe_duration_ms(&audio_bytes).await.unwrap_or_else(|err| {
            warn!(error = %err, "duration probe failed, falling back to summed turn durations");
            durations.iter().sum()
        });

        Ok(FinalAudioResult {
            audio_bytes,
            format,
            duration_ms,
            sample_rate,
            channels: 2,
            loudness_lufs: loudness.integrated_lufs,
            chapters,
            processing_log: log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use podcast_core::{LaughIntensity, LoudnessMeasurement, ScriptDraft, SectionType};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeMediaTool {
        mixes: AtomicU32,
    }

    #[async_trait]
    impl MediaTool for FakeMediaTool {
        async fn crossfade_concat(&self, buffers: &[Vec<u8>], _crossfade_ms: u32) -> Result<Vec<u8>> {
            Ok(buffers.concat())
        }

        async fn mix_at_offset(&self, base: &[u8], overlay: &[u8], _offset_ms: u64, _volume_offset_db: f32) -> Result<Vec<u8>> {
            self.mixes.fetch_add(1, Ordering::SeqCst);
            let mut out = base.to_vec();
            out.extend_from_slice(overlay);
            Ok(out)
        }

        async fn normalize_loudness(&self, audio: &[u8], target_lufs: f64) -> Result<(Vec<u8>, LoudnessMeasurement)> {
            Ok((
                audio.to_vec(),
                LoudnessMeasurement { integrated_lufs: target_lufs, true_peak_dbtp: -1.5, loudness_range: 11.0 },
            ))
        }

        async fn compress(&self, audio: &[u8], _threshold_db: f64, _ratio: f64, _attack_ms: f64, _release_ms: f64) -> Result<Vec<u8>> {
            Ok(audio.to_vec())
        }

        async fn de_ess(&self, audio: &[u8], _frequency_hz: f64) -> Result<Vec<u8>> {
            Ok(audio.to_vec())
        }

        async fn add_room_tone(&self, audio: &[u8], _level_db: f64) -> Result<Vec<u8>> {
            Ok(audio.to_vec())
        }

        async fn probe_duration_ms(&self, audio: &[u8]) -> Result<u64> {
            Ok(audio.len() as u64)
        }

        async fn transcode_to_wav(&self, audio: &[u8], _sample_rate: u32) -> Result<Vec<u8>> {
            Ok(audio.to_vec())
        }
    }

    fn synth_result(turn_id: &str, duration_ms: u64) -> TtsSynthesisResult {
        TtsSynthesisResult {
            turn_id: turn_id.to_string(),
            audio_bytes: vec![0u8; 10],
            duration_ms,
            format: AudioFormat::Mp3,
            sample_rate: 24000,
            synthesis_log: podcast_core::SynthesisLog {
                provider: "dev".to_string(),
                voice_id: "v".to_string(),
                request_time_ms: 0,
                lexicon_hits: 0,
                retries: 0,
                warnings: vec![],
            },
        }
    }

    fn segment(start: usize, end: usize, title: &str) -> ScriptSegment {
        ScriptSegment {
            start_index: start,
            end_index: end,
            title: title.to_string(),
            section_type: SectionType::Keypoint,
            target_duration_ms: 0,
            actual_duration_ms: 0,
        }
    }

    #[tokio::test]
    async fn chapters_are_tightly_tiled_across_segments() {
        let media: Arc<dyn MediaTool> = Arc::new(FakeMediaTool { mixes: AtomicU32::new(0) });
        let processor = AudioProcessor::new(media);

        let results = vec![synth_result("t0", 1000), synth_result("t1", 2000), synth_result("t2", 1500)];
        let draft = ScriptDraft { turns: vec![], segments: vec![segment(0, 0, "opening"), segment(1, 2, "body")] };
        let enriched = EnrichedScript::new(draft);

        let settings = AudioSettings::default();
        let result = processor.render(&results, &enriched, &settings).await.unwrap();

        assert!(result.chapters_are_tightly_tiled());
        assert_eq!(result.chapters[0].start_ms, 0);
        assert_eq!(result.chapters[0].end_ms, 1000);
        assert_eq!(result.chapters[1].start_ms, 1000);
        assert_eq!(result.chapters[1].end_ms, 4500);
    }

    #[tokio::test]
    async fn laugh_cue_triggers_one_mix_and_is_logged() {
        let media: Arc<dyn MediaTool> = Arc::new(FakeMediaTool { mixes: AtomicU32::new(0) });
        let processor = AudioProcessor::new(media);

        let results = vec![synth_result("t0", 1000), synth_result("t1", 2000)];
        let mut draft_enriched = EnrichedScript::new(ScriptDraft { turns: vec![], segments: vec![] });
        draft_enriched.laugh_cues.push(LaughCue {
            intensity: LaughIntensity::SoftLaugh,
            insert_after_turn_index: 0,
            duration_ms: 900,
            volume_offset_db: -8.0,
        });

        let settings = AudioSettings::default();
        let result = processor.render(&results, &draft_enriched, &settings).await.unwrap();

        assert_eq!(result.processing_log.laughs_inserted, 1);
        assert!(result.processing_log.stages_run.contains(&"laugh_insertion".to_string()));
    }

    #[tokio::test]
    async fn optional_stages_are_skipped_when_disabled() {
        let media: Arc<dyn MediaTool> = Arc::new(FakeMediaTool { mixes: AtomicU32::new(0) });
        let processor = AudioProcessor::new(media);
        let results = vec![synth_result("t0", 1000)];
        let enriched = EnrichedScript::new(ScriptDraft { turns: vec![], segments: vec![] });
        let settings = AudioSettings::default();

        let result = processor.render(&results, &enriched, &settings).await.unwrap();
        assert!(!result.processing_log.stages_run.contains(&"compression".to_string()));
        assert!(!result.processing_log.stages_run.contains(&"de_essing".to_string()));
        assert!(!result.processing_log.stages_run.contains(&"room_tone".to_string()));
    }
}
