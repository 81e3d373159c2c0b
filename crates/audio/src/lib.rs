//! Audio post-production: concatenation, laugh insertion, loudness
//! normalization, optional compression/de-essing/room tone, chapter
//! export
//!
//! [`ffmpeg`] implements [`podcast_core::MediaTool`] by shelling out to
//! `ffmpeg`/`ffprobe`; [`laugh_clips`] supplies the laugh-cue audio
//! bytes the processor mixes in; [`processor`] sequences the whole
//! chain per turn/segment timing.

pub mod ffmpeg;
pub mod laugh_clips;
pub mod processor;

pub use ffmpeg::FfmpegMediaTool;
pub use processor::AudioProcessor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio processing error during {stage}: {message}")]
    Stage { stage: String, message: String },
}

impl From<AudioError> for podcast_core::Error {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Stage { stage, message } => podcast_core::Error::AudioProcessing { stage, message },
        }
    }
}
