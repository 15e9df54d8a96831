use serde::{Deserialize, Serialize};

/// The kind of asset a client is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetKind {
    #[default]
    Video,
    Audio,
}

/// Engagement counters reported by upstream providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementStats {
    pub play_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub share_count: Option<u64>,
}

/// The canonical, platform-agnostic description of a resolved piece of
/// media.
///
/// Produced by [`ProviderPayload::normalize`] and replaced wholesale on
/// every successful re-resolution. Downstream components (negotiation,
/// rendering) only ever see this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Primary playable/displayable asset URL. Always present.
    pub media_url: String,
    /// High-definition video variant, when the provider exposes one.
    pub hd_media_url: Option<String>,
    /// Audio-only asset (e.g. the post's soundtrack).
    pub audio_url: Option<String>,
    /// Cover image / thumbnail.
    pub thumbnail_url: Option<String>,
    /// Author handle.
    pub author: Option<String>,
    /// Post title or caption.
    pub title: Option<String>,
    /// Engagement counters, when reported.
    pub stats: Option<EngagementStats>,
}

impl MediaDescriptor {
    /// The best available video URL: HD variant preferred over standard.
    pub fn best_video_url(&self) -> &str {
        self.hd_media_url.as_deref().unwrap_or(&self.media_url)
    }

    /// Selects the asset URL for the requested kind.
    ///
    /// An audio request uses the audio-only URL when present, falling
    /// back to the video chain otherwise.
    pub fn asset_url(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Audio => self.audio_url.as_deref().unwrap_or(self.best_video_url()),
            AssetKind::Video => self.best_video_url(),
        }
    }
}

/// Author block in a TikTok provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTokAuthor {
    pub unique_id: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

/// A provider response payload, tagged by platform.
///
/// Each variant carries the provider's native field names; a single
/// [`normalize`](Self::normalize) step maps them into the canonical
/// [`MediaDescriptor`] so no field-fallback chains leak downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum ProviderPayload {
    TikTok {
        play: String,
        hdplay: Option<String>,
        music: Option<String>,
        cover: Option<String>,
        title: Option<String>,
        author: Option<TikTokAuthor>,
        play_count: Option<u64>,
        digg_count: Option<u64>,
        comment_count: Option<u64>,
        share_count: Option<u64>,
    },
    Instagram {
        video_url: String,
        thumbnail_url: Option<String>,
        owner: Option<String>,
        caption: Option<String>,
    },
    Twitter {
        asset_url: String,
    },
}

impl ProviderPayload {
    /// Maps the platform-shaped payload into the canonical descriptor.
    pub fn normalize(self) -> MediaDescriptor {
        match self {
            ProviderPayload::TikTok {
                play,
                hdplay,
                music,
                cover,
                title,
                author,
                play_count,
                digg_count,
                comment_count,
                share_count,
            } => {
                let has_stats = play_count.is_some()
                    || digg_count.is_some()
                    || comment_count.is_some()
                    || share_count.is_some();
                MediaDescriptor {
                    media_url: play,
                    hd_media_url: hdplay,
                    audio_url: music,
                    thumbnail_url: cover,
                    author: author.map(|a| a.unique_id),
                    title,
                    stats: has_stats.then_some(EngagementStats {
                        play_count,
                        like_count: digg_count,
                        comment_count,
                        share_count,
                    }),
                }
            }
            ProviderPayload::Instagram {
                video_url,
                thumbnail_url,
                owner,
                caption,
            } => MediaDescriptor {
                media_url: video_url,
                hd_media_url: None,
                audio_url: None,
                thumbnail_url,
                author: owner,
                title: caption,
                stats: None,
            },
            ProviderPayload::Twitter { asset_url } => MediaDescriptor {
                media_url: asset_url,
                hd_media_url: None,
                audio_url: None,
                thumbnail_url: None,
                author: None,
                title: None,
                stats: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiktok_payload() -> ProviderPayload {
        ProviderPayload::TikTok {
            play: "https://cdn.example/sd.mp4".into(),
            hdplay: Some("https://cdn.example/hd.mp4".into()),
            music: Some("https://cdn.example/audio.mp3".into()),
            cover: Some("https://cdn.example/cover.jpg".into()),
            title: Some("a title".into()),
            author: Some(TikTokAuthor {
                unique_id: "user".into(),
                nickname: Some("User".into()),
                avatar: None,
            }),
            play_count: Some(100),
            digg_count: Some(10),
            comment_count: Some(5),
            share_count: None,
        }
    }

    #[test]
    fn normalize_tiktok_maps_all_fields() {
        let d = tiktok_payload().normalize();
        assert_eq!(d.media_url, "https://cdn.example/sd.mp4");
        assert_eq!(d.hd_media_url.as_deref(), Some("https://cdn.example/hd.mp4"));
        assert_eq!(d.audio_url.as_deref(), Some("https://cdn.example/audio.mp3"));
        assert_eq!(d.author.as_deref(), Some("user"));
        assert_eq!(d.title.as_deref(), Some("a title"));
        let stats = d.stats.unwrap();
        assert_eq!(stats.play_count, Some(100));
        assert_eq!(stats.like_count, Some(10));
    }

    #[test]
    fn normalize_instagram_has_no_hd_variant() {
        let d = ProviderPayload::Instagram {
            video_url: "https://ig.example/v.mp4".into(),
            thumbnail_url: Some("https://ig.example/t.jpg".into()),
            owner: Some("someone".into()),
            caption: None,
        }
        .normalize();
        assert_eq!(d.media_url, "https://ig.example/v.mp4");
        assert!(d.hd_media_url.is_none());
        assert!(d.audio_url.is_none());
        assert_eq!(d.author.as_deref(), Some("someone"));
    }

    #[test]
    fn best_video_url_prefers_hd() {
        let d = tiktok_payload().normalize();
        assert_eq!(d.best_video_url(), "https://cdn.example/hd.mp4");

        let mut no_hd = d.clone();
        no_hd.hd_media_url = None;
        assert_eq!(no_hd.best_video_url(), "https://cdn.example/sd.mp4");
    }

    #[test]
    fn asset_url_audio_falls_back_to_video() {
        let d = tiktok_payload().normalize();
        assert_eq!(d.asset_url(AssetKind::Audio), "https://cdn.example/audio.mp3");

        let mut no_audio = d.clone();
        no_audio.audio_url = None;
        assert_eq!(no_audio.asset_url(AssetKind::Audio), "https://cdn.example/hd.mp4");
    }

    #[test]
    fn payload_serde_tagging() {
        let json = serde_json::to_value(&ProviderPayload::Twitter {
            asset_url: "https://t.example/42.mp4".into(),
        })
        .unwrap();
        assert_eq!(json["platform"], "twitter");
    }
}
