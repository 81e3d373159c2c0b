//! Laugh-cue clip source
//!
//! The pipeline has no bundled voice-actor laugh recordings, so each
//! intensity maps to a short synthesized decaying tone at a pitch and
//! duration characteristic of that laugh, built the same way the TTS
//! crate's development-mode provider synthesizes a placeholder waveform
//! when a credential is absent.

use podcast_core::LaughIntensity;
use std::f64::consts::PI;

const SAMPLE_RATE: u32 = 24000;

fn wav_header(data_size: u32, sample_rate: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(44);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&(36 + data_size).to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes());
    header.extend_from_slice(&sample_rate.to_le_bytes());
    header.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    header.extend_from_slice(&2u16.to_le_bytes());
    header.extend_from_slice(&16u16.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_size.to_le_bytes());
    header
}

/// Synthesize a laugh clip for `intensity` at exactly `duration_ms`
/// (the chemistry engine's fixed per-intensity duration — 500/900/1500ms
/// for light/soft/big): an exponentially-decaying tone whose pitch and
/// peak amplitude scale with how big the laugh is.
pub fn synthesize(intensity: LaughIntensity, duration_ms: u32) -> Vec<u8> {
    let (base_freq_hz, peak_amplitude): (f64, f64) = match intensity {
        LaughIntensity::LightChuckle => (180.0, 0.35),
        LaughIntensity::SoftLaugh => (150.0, 0.5),
        LaughIntensity::BigLaugh => (120.0, 0.7),
    };

    let num_samples = ((duration_ms as f64 / 1000.0) * SAMPLE_RATE as f64) as usize;
    let mut pcm = Vec::with_capacity(num_samples * 2);
    for n in 0..num_samples {
        let t = n as f64 / SAMPLE_RATE as f64;
        let decay = (-t * 4.0).exp();
        // A wobble on the base frequency gives the tone a "ha-ha-ha" texture
        // rather than a flat sine.
        let wobble = 1.0 + 0.15 * (2.0 * PI * 6.0 * t).sin();
        let sample = (2.0 * PI * base_freq_hz * wobble * t).sin() * peak_amplitude * decay;
        let pcm_sample = (sample * i16::MAX as f64) as i16;
        pcm.extend_from_slice(&pcm_sample.to_le_bytes());
    }

    let mut wav = wav_header(pcm.len() as u32, SAMPLE_RATE);
    wav.extend(pcm);
    wav
}

/// Truncate a synthesized clip's PCM data to at most `max_duration_ms`,
/// rewriting the RIFF/data chunk sizes — used to keep a laugh from
/// overlapping the next turn's speech by more than its own duration
/// minus 100ms.
pub fn trim_wav(wav: &[u8], max_duration_ms: u32, sample_rate: u32) -> Vec<u8> {
    if wav.len() <= 44 {
        return wav.to_vec();
    }
    let max_bytes = ((max_duration_ms as f64 / 1000.0) * sample_rate as f64) as usize * 2;
    let data = &wav[44..];
    if data.len() <= max_bytes {
        return wav.to_vec();
    }
    let trimmed_data = &data[..max_bytes];
    let mut out = wav_header(trimmed_data.len() as u32, sample_rate);
    out.extend_from_slice(trimmed_data);
    out
}
