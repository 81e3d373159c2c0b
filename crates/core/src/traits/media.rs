//! Media tool port
//!
//! The only contract between the audio processor and the external media
//! tool is byte-in/byte-out; any temp-file choreography needed to drive
//! the subprocess is the implementation's private business.

use async_trait::async_trait;

/// A parsed `loudnorm`-style single-pass loudness measurement
#[derive(Debug, Clone, Copy, Default)]
pub struct LoudnessMeasurement {
    pub integrated_lufs: f64,
    pub true_peak_dbtp: f64,
    pub loudness_range: f64,
}

/// Abstraction over the external media-processing tool (ffmpeg) and probe
/// tool (ffprobe). Implementations must tolerate the subprocess exiting
/// with a non-zero status by surfacing a typed error naming the stage.
#[async_trait]
pub trait MediaTool: Send + Sync + 'static {
    /// Concatenate buffers with an equal-power crossfade of `crossfade_ms`
    /// between every adjacent pair.
    async fn crossfade_concat(&self, buffers: &[Vec<u8>], crossfade_ms: u32) -> crate::Result<Vec<u8>>;

    /// Mix `overlay` into `base` at `offset_ms`, attenuated by `volume_offset_db`.
    async fn mix_at_offset(
        &self,
        base: &[u8],
        overlay: &[u8],
        offset_ms: u64,
        volume_offset_db: f32,
    ) -> crate::Result<Vec<u8>>;

    /// Single-pass integrated loudness normalization to `target_lufs`.
    async fn normalize_loudness(&self, audio: &[u8], target_lufs: f64) -> crate::Result<(Vec<u8>, LoudnessMeasurement)>;

    /// Dynamic range compression.
    async fn compress(&self, audio: &[u8], threshold_db: f64, ratio: f64, attack_ms: f64, release_ms: f64) -> crate::Result<Vec<u8>>;

    /// De-essing centered at `frequency_hz`.
    async fn de_ess(&self, audio: &[u8], frequency_hz: f64) -> crate::Result<Vec<u8>>;

    /// Mix in low-level room tone at `level_db`.
    async fn add_room_tone(&self, audio: &[u8], level_db: f64) -> crate::Result<Vec<u8>>;

    /// Probe the duration of an audio buffer in milliseconds.
    async fn probe_duration_ms(&self, audio: &[u8]) -> crate::Result<u64>;

    /// Transcode to WAV PCM 16-bit little-endian at the given sample rate.
    async fn transcode_to_wav(&self, audio: &[u8], sample_rate: u32) -> crate::Result<Vec<u8>>;
}
