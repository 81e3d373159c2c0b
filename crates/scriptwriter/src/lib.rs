//! Script generation: template mode, LLM mode, and shared post-processing

pub mod llm;
pub mod postprocess;
pub mod template;

pub use llm::{build_system_prompt, build_user_prompt, generate_script, SlideCue, ValidationComplaint};
pub use postprocess::{safety_check, split_long_turns, SafetyFinding};
pub use template::generate_draft;

use podcast_config::ScriptwriterMode;
use podcast_core::{BanterLevel, ContentOutline, Error, LanguageModel, Result, ScriptDraft, StylePreset};

/// Dispatch to the configured scriptwriter mode, then run the shared
/// post-processing pass.
pub async fn write_script(
    mode: ScriptwriterMode,
    llm: Option<&dyn LanguageModel>,
    outline: &ContentOutline,
    preset: StylePreset,
    banter_level: BanterLevel,
) -> Result<(ScriptDraft, Vec<SlideCue>)> {
    let (draft, slide_cues) = match mode {
        ScriptwriterMode::Template => (template::generate_draft(outline), Vec::new()),
        ScriptwriterMode::Llm => {
            let llm = llm.ok_or_else(|| {
                Error::ScriptGeneration("LLM mode selected but no LanguageModel was provided".to_string())
            })?;
            llm::generate_script(llm, outline, preset, banter_level).await?
        }
    };

    let draft = postprocess::split_long_turns(draft, preset);
    Ok((draft, slide_cues))
}
