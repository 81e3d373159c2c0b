//! `ffmpeg`/`ffprobe` subprocess-backed [`MediaTool`]
//!
//! Every operation writes its input buffers to a run-scoped temp file,
//! invokes the subprocess, reads the output back, and removes its temp
//! files on every exit path. A non-zero exit status is surfaced as
//! [`AudioError::Stage`] naming the ffmpeg stage and the captured stderr.

use crate::AudioError;
use async_trait::async_trait;
use podcast_core::{LoudnessMeasurement, MediaTool, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

pub struct FfmpegMediaTool {
    ffmpeg_path: String,
    ffprobe_path: String,
    temp_dir: PathBuf,
}

impl FfmpegMediaTool {
    /// `temp_dir` must already exist; the orchestrator owns its lifetime,
    /// creating it on run start and removing it on export or cancellation.
    pub fn new(temp_dir: PathBuf) -> Self {
        Self { ffmpeg_path: "ffmpeg".to_string(), ffprobe_path: "ffprobe".to_string(), temp_dir }
    }

    pub fn with_binaries(mut self, ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>) -> Self {
        self.ffmpeg_path = ffmpeg_path.into();
        self.ffprobe_path = ffprobe_path.into();
        self
    }

    fn scratch_path(&self, suffix: &str) -> PathBuf {
        self.temp_dir.join(format!("{}-{suffix}", uuid::Uuid::new_v4()))
    }

    async fn write_temp(&self, bytes: &[u8], suffix: &str, stage: &str) -> Result<PathBuf> {
        let path = self.scratch_path(suffix);
        fs::write(&path, bytes)
            .await
            .map_err(|e| AudioError::Stage { stage: stage.to_string(), message: format!("failed to write temp input: {e}") })?;
        Ok(path)
    }

    async fn read_temp(&self, path: &Path, stage: &str) -> Result<Vec<u8>> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| AudioError::Stage { stage: stage.to_string(), message: format!("failed to read temp output: {e}") })?;
        let _ = fs::remove_file(path).await;
        Ok(bytes)
    }

    async fn remove_temp(&self, path: &Path) {
        let _ = fs::remove_file(path).await;
    }

    async fn run_ffmpeg(&self, args: &[String], stage: &str) -> Result<()> {
        let output = Command::new(&self.ffmpeg_path)
            .args(args)
            .output()
            .await
            .map_err(|e| AudioError::Stage { stage: stage.to_string(), message: format!("failed to spawn ffmpeg: {e}") })?;

        if !output.status.success() {
            return Err(AudioError::Stage {
                stage: stage.to_string(),
                message: format!("ffmpeg exited with {}: {}", output.status, String::from_utf8_lossy(&output.stderr)),
            }
            .into());
        }
        Ok(())
    }
}

/// ffmpeg's `loudnorm` single-pass JSON report (only the fields the
/// processor reads; the rest of the report is dropped).
#[derive(Debug, Default, Deserialize)]
struct LoudnormReport {
    #[serde(default)]
    output_i: String,
    #[serde(default)]
    output_tp: String,
    #[serde(default)]
    output_lra: String,
}

fn parse_loudnorm_report(stderr: &str) -> Option<LoudnormReport> {
    let start = stderr.rfind('{')?;
    let end = stderr[start..].find('}')? + start + 1;
    serde_json::from_str(&stderr[start..end]).ok()
}

#[async_trait]
impl MediaTool for FfmpegMediaTool {
    async fn crossfade_concat(&self, buffers: &[Vec<u8>], crossfade_ms: u32) -> Result<Vec<u8>> {
        if buffers.is_empty() {
            return Err(AudioError::Stage { stage: "crossfade_concat".to_string(), message: "no buffers to concatenate".to_string() }.into());
        }
        if buffers.len() == 1 {
            return Ok(buffers[0].clone());
        }

        let mut input_paths = Vec::with_capacity(buffers.len());
        for buf in buffers {
            input_paths.push(self.write_temp(buf, "in.mp3", "crossfade_concat").await?);
        }

        let duration_sec = crossfade_ms as f64 / 1000.0;
        let mut args: Vec<String> = vec!["-y".to_string()];
        for path in &input_paths {
            args.push("-i".to_string());
            args.push(path.display().to_string());
        }

        // Equal-power crossfade approximated with ffmpeg's quarter-sine
        // curve on both sides, left-folded across every adjacent pair.
        let mut filter_parts = Vec::with_capacity(input_paths.len() - 1);
        let mut prev_label = "0:a".to_string();
        for i in 1..input_paths.len() {
            let out_label = format!("a{i}");
            filter_parts.push(format!("[{prev_label}][{i}:a]acrossfade=d={duration_sec}:curve1=qsin:curve2=qsin[{out_label}]"));
            prev_label = out_label;
        }

        let output_path = self.scratch_path("concat.mp3");
        args.push("-filter_complex".to_string());
        args.push(filter_parts.join(";"));
        args.push("-map".to_string());
        args.push(format!("[{prev_label}]"));
        args.push(output_path.display().to_string());

        let outcome = self.run_ffmpeg(&args, "crossfade_concat").await;
        for path in &input_paths {
            self.remove_temp(path).await;
        }
        outcome?;
        self.read_temp(&output_path, "crossfade_concat").await
    }

    async fn mix_at_offset(&self, base: &[u8], overlay: &[u8], offset_ms: u64, volume_offset_db: f32) -> Result<Vec<u8>> {
        let base_path = self.write_temp(base, "base.mp3", "mix_at_offset").await?;
        let overlay_path = self.write_temp(overlay, "overlay.mp3", "mix_at_offset").await?;
        let output_path = self.scratch_path("mixed.mp3");

        let filter = format!(
            "[1:a]volume={volume_offset_db}dB,adelay={offset_ms}|{offset_ms}[ov];[0:a][ov]amix=inputs=2:duration=first:dropout_transition=0[out]"
        );
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            base_path.display().to_string(),
            "-i".to_string(),
            overlay_path.display().to_string(),
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            "[out]".to_string(),
            output_path.display().to_string(),
        ];

        let outcome = self.run_ffmpeg(&args, "mix_at_offset").await;
        self.remove_temp(&base_path).await;
        self.remove_temp(&overlay_path).await;
        outcome?;
        self.read_temp(&output_path, "mix_at_offset").await
    }

    async fn normalize_loudness(&self, audio: &[u8], target_lufs: f64) -> Result<(Vec<u8>, LoudnessMeasurement)> {
        let input_path = self.write_temp(audio, "in.mp3", "normalize_loudness").await?;
        let output_path = self.scratch_path("normalized.mp3");

        let filter = format!("loudnorm=I={target_lufs}:TP=-1.5:LRA=11:print_format=json");
        let args = vec!["-y".to_string(), "-i".to_string(), input_path.display().to_string(), "-af".to_string(), filter, output_path.display().to_string()];

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| AudioError::Stage { stage: "normalize_loudness".to_string(), message: format!("failed to spawn ffmpeg: {e}") });
        self.remove_temp(&input_path).await;
        let output = output?;

        if !output.status.success() {
            return Err(AudioError::Stage {
                stage: "normalize_loudness".to_string(),
                message: format!("ffmpeg exited with {}: {}", output.status, String::from_utf8_lossy(&output.stderr)),
            }
            .into());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let report = parse_loudnorm_report(&stderr).unwrap_or_default();
        let measurement = LoudnessMeasurement {
            integrated_lufs: report.output_i.parse().unwrap_or(target_lufs),
            true_peak_dbtp: report.output_tp.parse().unwrap_or(-1.5),
            loudness_range: report.output_lra.parse().unwrap_or(11.0),
        };

        let bytes = self.read_temp(&output_path, "normalize_loudness").await?;
        Ok((bytes, measurement))
    }

    async fn compress(&self, audio: &[u8], threshold_db: f64, ratio: f64, attack_ms: f64, release_ms: f64) -> Result<Vec<u8>> {
        let input_path = self.write_temp(audio, "in.mp3", "compress").await?;
        let output_path = self.scratch_path("compressed.mp3");
        let filter = format!("acompressor=threshold={threshold_db}dB:ratio={ratio}:attack={attack_ms}:release={release_ms}");
        let args = vec!["-y".to_string(), "-i".to_string(), input_path.display().to_string(), "-af".to_string(), filter, output_path.display().to_string()];

        let outcome = self.run_ffmpeg(&args, "compress").await;
        self.remove_temp(&input_path).await;
        outcome?;
        self.read_temp(&output_path, "compress").await
    }

    async fn de_ess(&self, audio: &[u8], frequency_hz: f64) -> Result<Vec<u8>> {
        let input_path = self.write_temp(audio, "in.mp3", "de_ess").await?;
        let output_path = self.scratch_path("deessed.mp3");
        // ffmpeg's `deesser` filter takes a normalized 0..1 band selector
        // rather than a frequency in Hz; approximate against Nyquist at
        // the pipeline's default 24kHz sample rate.
        let f_normalized = (frequency_hz / 12000.0).clamp(0.0, 1.0);
        let filter = format!("deesser=i=0.4:m=0.5:f={f_normalized:.3}:s=o");
        let args = vec!["-y".to_string(), "-i".to_string(), input_path.display().to_string(), "-af".to_string(), filter, output_path.display().to_string()];

        let outcome = self.run_ffmpeg(&args, "de_ess").await;
        self.remove_temp(&input_path).await;
        outcome?;
        self.read_temp(&output_path, "de_ess").await
    }

    async fn add_room_tone(&self, audio: &[u8], level_db: f64) -> Result<Vec<u8>> {
        let input_path = self.write_temp(audio, "in.mp3", "add_room_tone").await?;
        let output_path = self.scratch_path("roomtone.mp3");
        let amplitude = 10f64.powf(level_db / 20.0);
        let filter = format!(
            "anoisesrc=color=brown:amplitude={amplitude}[noise];[0:a][noise]amix=inputs=2:duration=first:dropout_transition=0[out]"
        );
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input_path.display().to_string(),
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            "[out]".to_string(),
            output_path.display().to_string(),
        ];

        let outcome = self.run_ffmpeg(&args, "add_room_tone").await;
        self.remove_temp(&input_path).await;
        outcome?;
        self.read_temp(&output_path, "add_room_tone").await
    }

    async fn probe_duration_ms(&self, audio: &[u8]) -> Result<u64> {
        let input_path = self.write_temp(audio, "probe.mp3", "probe_duration_ms").await?;
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(&input_path)
            .output()
            .await
            .map_err(|e| AudioError::Stage { stage: "probe_duration_ms".to_string(), message: format!("failed to spawn ffprobe: {e}") });
        self.remove_temp(&input_path).await;
        let output = output?;

        if !output.status.success() {
            return Err(AudioError::Stage {
                stage: "probe_duration_ms".to_string(),
                message: format!("ffprobe exited with {}: {}", output.status, String::from_utf8_lossy(&output.stderr)),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: serde_json::Value = serde_json::from_str(&stdout)
            .map_err(|e| AudioError::Stage { stage: "probe_duration_ms".to_string(), message: format!("failed to parse ffprobe output: {e}") })?;
        let duration_sec: f64 = parsed["format"]["duration"].as_str().and_then(|s| s.parse().ok()).unwrap_or(0.0);
        Ok((duration_sec * 1000.0).round() as u64)
    }

    async fn transcode_to_wav(&self, audio: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
        let input_path = self.write_temp(audio, "in.mp3", "transcode_to_wav").await?;
        let output_path = self.scratch_path("out.wav");
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input_path.display().to_string(),
            "-ar".to_string(),
            sample_rate.to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-f".to_string(),
            "wav".to_string(),
            output_path.display().to_string(),
        ];

        let outcome = self.run_ffmpeg(&args, "transcode_to_wav").await;
        self.remove_temp(&input_path).await;
        outcome?;
        self.read_temp(&output_path, "transcode_to_wav").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loudnorm_json_embedded_in_stderr() {
        let stderr = "some ffmpeg banner\n{\n\"input_i\" : \"-23.10\",\n\"output_i\" : \"-16.00\",\n\"output_tp\" : \"-1.50\",\n\"output_lra\" : \"9.80\"\n}\nmore lines";
        let report = parse_loudnorm_report(stderr).expect("report parses");
        assert_eq!(report.output_i, "-16.00");
        assert_eq!(report.output_tp, "-1.50");
        assert_eq!(report.output_lra, "9.80");
    }

    #[test]
    fn missing_json_block_returns_none() {
        assert!(parse_loudnorm_report("no json here").is_none());
    }
}
