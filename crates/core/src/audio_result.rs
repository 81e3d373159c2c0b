//! Final mixed-down audio result

use crate::outline::SectionType;
use crate::tts_result::AudioFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterMarker {
    pub id: String,
    pub title: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub section_type: SectionType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioProcessingLog {
    pub stages_run: Vec<String>,
    pub laughs_inserted: u32,
    pub crossfades_applied: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAudioResult {
    #[serde(skip)]
    pub audio_bytes: Vec<u8>,
    pub format: AudioFormat,
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub loudness_lufs: f64,
    pub chapters: Vec<ChapterMarker>,
    pub processing_log: AudioProcessingLog,
}

impl FinalAudioResult {
    /// Tight-tiling check: `chapters[i].end == chapters[i+1].start`.
    pub fn chapters_are_tightly_tiled(&self) -> bool {
        self.chapters
            .windows(2)
            .all(|pair| pair[0].end_ms == pair[1].start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: &str, start: u64, end: u64) -> ChapterMarker {
        ChapterMarker {
            id: id.into(),
            title: id.into(),
            start_ms: start,
            end_ms: end,
            section_type: SectionType::Keypoint,
        }
    }

    #[test]
    fn detects_gap_between_chapters() {
        let result = FinalAudioResult {
            audio_bytes: vec![],
            format: AudioFormat::Mp3,
            duration_ms: 9500,
            sample_rate: 24000,
            channels: 2,
            loudness_lufs: -16.0,
            chapters: vec![chapter("a", 0, 2000), chapter("b", 2001, 7000)],
            processing_log: AudioProcessingLog::default(),
        };
        assert!(!result.chapters_are_tightly_tiled());
    }

    #[test]
    fn tiled_chapters_pass() {
        let result = FinalAudioResult {
            audio_bytes: vec![],
            format: AudioFormat::Mp3,
            duration_ms: 9500,
            sample_rate: 24000,
            channels: 2,
            loudness_lufs: -16.0,
            chapters: vec![chapter("a", 0, 2000), chapter("b", 2000, 7000), chapter("c", 7000, 9500)],
            processing_log: AudioProcessingLog::default(),
        };
        assert!(result.chapters_are_tightly_tiled());
    }
}
