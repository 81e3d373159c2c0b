//! Provider dispatch: maps a provider id to an implementation, falling
//! back to [`dev::DevModeProvider`] when that provider's credential is
//! absent.

pub mod dev;
pub mod elevenlabs;
pub mod google;
pub mod openai;

use podcast_config::ProviderCredentials;
use podcast_core::{TtsProvider, TtsProviderId};
use std::sync::Arc;
use std::time::Duration;

/// Build the provider implementation for `id`, using `credentials` to
/// decide between a real HTTP-backed adapter and the development-mode
/// stub.
pub fn build_provider(id: TtsProviderId, credentials: &ProviderCredentials, timeout: Duration) -> Arc<dyn TtsProvider> {
    match id {
        TtsProviderId::Google => match &credentials.google {
            Some(key) => Arc::new(google::GoogleTtsProvider::new(key.clone(), timeout)),
            None => Arc::new(dev::DevModeProvider::new("google")),
        },
        TtsProviderId::OpenAi => match &credentials.openai {
            Some(key) => Arc::new(openai::OpenAiTtsProvider::new(key.clone(), timeout)),
            None => Arc::new(dev::DevModeProvider::new("openai")),
        },
        TtsProviderId::ElevenLabs => match &credentials.elevenlabs {
            Some(key) => Arc::new(elevenlabs::ElevenLabsTtsProvider::new(key.clone(), timeout)),
            None => Arc::new(dev::DevModeProvider::new("elevenlabs")),
        },
        TtsProviderId::Azure => Arc::new(dev::DevModeProvider::new("azure")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_dev_mode_without_credentials() {
        let creds = ProviderCredentials::default();
        let provider = build_provider(TtsProviderId::Google, &creds, Duration::from_secs(30));
        assert_eq!(provider.provider_name(), "google");
    }
}
