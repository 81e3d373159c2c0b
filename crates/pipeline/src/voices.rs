//! Static speaker-to-voice assignment
//!
//! One voice profile per [`Speaker`], re-mapped to a provider-specific
//! voice id, generalizing the same provider-to-voice-name lookup each
//! TTS adapter does for a single provider across all four provider ids.

use podcast_config::ProviderCredentials;
use podcast_core::{Speaker, TtsProviderId, VoiceGender, VoiceProfile, VoiceRole};

fn voice_id_for(provider: TtsProviderId, speaker: Speaker) -> &'static str {
    match (provider, speaker) {
        (TtsProviderId::Google, Speaker::HostA) => "ko-KR-Wavenet-C",
        (TtsProviderId::Google, Speaker::HostB) => "ko-KR-Wavenet-A",
        (TtsProviderId::Google, Speaker::Guest) => "ko-KR-Wavenet-D",
        (TtsProviderId::OpenAi, Speaker::HostA) => "onyx",
        (TtsProviderId::OpenAi, Speaker::HostB) => "nova",
        (TtsProviderId::OpenAi, Speaker::Guest) => "echo",
        (TtsProviderId::ElevenLabs, Speaker::HostA) => "pNInz6obpgDQGcFmaJgB",
        (TtsProviderId::ElevenLabs, Speaker::HostB) => "21m00Tcm4TlvDq8ikWAM",
        (TtsProviderId::ElevenLabs, Speaker::Guest) => "EXAVITQu4vr4xnSDxMaL",
        (TtsProviderId::Azure, _) => "dev-mode",
    }
}

/// The fixed role/gender pairing for each speaker slot, independent of
/// provider.
fn role_and_gender(speaker: Speaker) -> (VoiceRole, VoiceGender) {
    match speaker {
        Speaker::HostA => (VoiceRole::StableExplainer, VoiceGender::Male),
        Speaker::HostB => (VoiceRole::ReactiveCurious, VoiceGender::Female),
        Speaker::Guest => (VoiceRole::ExpertGuest, VoiceGender::Neutral),
    }
}

pub fn voice_for_speaker(speaker: Speaker, provider: TtsProviderId) -> VoiceProfile {
    let (role, gender) = role_and_gender(speaker);
    VoiceProfile {
        provider,
        voice_id: voice_id_for(provider, speaker).to_string(),
        language: "ko-KR".to_string(),
        gender,
        role,
        pitch_offset: 0.0,
        speaking_rate: 1.0,
    }
}

/// Pick the first provider with a configured credential, falling back to
/// the Azure/dev-mode stub when none are configured.
pub fn select_provider_id(credentials: &ProviderCredentials) -> TtsProviderId {
    if credentials.google.is_some() {
        TtsProviderId::Google
    } else if credentials.openai.is_some() {
        TtsProviderId::OpenAi
    } else if credentials.elevenlabs.is_some() {
        TtsProviderId::ElevenLabs
    } else {
        TtsProviderId::Azure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_a_and_host_b_get_distinct_voices() {
        let a = voice_for_speaker(Speaker::HostA, TtsProviderId::OpenAi);
        let b = voice_for_speaker(Speaker::HostB, TtsProviderId::OpenAi);
        assert_ne!(a.voice_id, b.voice_id);
        assert_eq!(a.role, VoiceRole::StableExplainer);
        assert_eq!(b.role, VoiceRole::ReactiveCurious);
    }

    #[test]
    fn no_credentials_selects_azure_dev_mode() {
        let creds = ProviderCredentials::default();
        assert_eq!(select_provider_id(&creds), TtsProviderId::Azure);
    }

    #[test]
    fn google_credential_takes_priority() {
        let creds = ProviderCredentials { google: Some("key".to_string()), openai: Some("key".to_string()), elevenlabs: None };
        assert_eq!(select_provider_id(&creds), TtsProviderId::Google);
    }
}
