//! Audio and media collectors.

use super::available;
use super::types::{AudioRecord, MediaRecord};
use crate::env::{EnvironmentProvider, HostApi};

/// Audio context properties plus a derived fingerprint string of the form
/// `{sampleRate}-{channelCount}-{maxChannelCount}`.
pub fn collect_audio(env: &dyn EnvironmentProvider) -> AudioRecord {
    let media_session_supported = env.has_api(HostApi::MediaSession);

    let Some(audio) = available("AudioContext", env.audio_context()) else {
        return AudioRecord {
            media_session_supported,
            ..AudioRecord::default()
        };
    };

    AudioRecord {
        context_supported: true,
        sample_rate: Some(audio.sample_rate),
        channel_count: Some(audio.channel_count),
        audio_fingerprint: Some(format!(
            "{}-{}-{}",
            audio.sample_rate, audio.channel_count, audio.max_channel_count
        )),
        audio_worklet_supported: audio.audio_worklet,
        media_session_supported,
    }
}

pub fn collect_media(env: &dyn EnvironmentProvider) -> MediaRecord {
    MediaRecord {
        media_devices: env.has_api(HostApi::MediaDevices),
        get_user_media: env.has_api(HostApi::GetUserMedia),
        media_recorder: env.has_api(HostApi::MediaRecorder),
        media_source: env.has_api(HostApi::MediaSource),
        media_session: env.has_api(HostApi::MediaSession),
        web_codecs: env.has_api(HostApi::VideoEncoder),
        web_rtc: env.has_api(HostApi::RtcPeerConnection),
        peer_connection: env.has_api(HostApi::RtcPeerConnection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fixtures;

    #[test]
    fn test_audio_fingerprint_format() {
        let record = collect_audio(&fixtures::desktop());
        assert!(record.context_supported);
        assert_eq!(record.audio_fingerprint.as_deref(), Some("48000-2-2"));
        assert!(record.audio_worklet_supported);
        assert!(record.media_session_supported);
    }

    #[test]
    fn test_audio_unsupported() {
        let mut env = fixtures::desktop();
        env.audio = None;
        let record = collect_audio(&env);
        assert!(!record.context_supported);
        assert_eq!(record.sample_rate, None);
        assert_eq!(record.audio_fingerprint, None);
        // media session is a navigator property, independent of the context
        assert!(record.media_session_supported);
    }

    #[test]
    fn test_media_support_flags() {
        let record = collect_media(&fixtures::desktop());
        assert!(record.media_devices);
        assert!(record.web_rtc);
        assert!(record.peer_connection);
        assert!(!record.web_codecs);
    }
}
