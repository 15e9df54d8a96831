use unfurl_core::{AssetKind, MediaDescriptor};

/// User-agent substrings of chat-embed crawlers that want raw media.
///
/// Matched case-insensitively. These clients fetch the link to build an
/// inline embed and should be sent straight to the asset bytes instead
/// of an HTML preview.
pub const BOT_SIGNATURES: &[&str] = &[
    "discordbot",
    "telegrambot",
    "twitterbot",
    "whatsapp",
    "slackbot",
    "facebookexternalhit",
];

/// Request metadata relevant to the redirect-vs-preview decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    pub user_agent: Option<&'a str>,
    pub accept: Option<&'a str>,
    pub asset_kind: AssetKind,
}

/// The negotiated response mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// Answer with a 307 redirect to this asset URL.
    Redirect(String),
    /// Hand the descriptor to the rendering collaborator.
    Preview,
}

/// Decides between a machine-targeted redirect and a human-targeted
/// preview.
///
/// Pure function of descriptor and request metadata: a crawler UA or an
/// Accept header asking for video directly gets a redirect to the best
/// available asset (HD over standard, audio when hinted); everything
/// else gets the preview page.
pub fn negotiate(descriptor: &MediaDescriptor, ctx: &RequestContext<'_>) -> Negotiation {
    if wants_raw_media(ctx) {
        Negotiation::Redirect(descriptor.asset_url(ctx.asset_kind).to_string())
    } else {
        Negotiation::Preview
    }
}

fn wants_raw_media(ctx: &RequestContext<'_>) -> bool {
    if let Some(ua) = ctx.user_agent {
        let ua = ua.to_ascii_lowercase();
        if BOT_SIGNATURES.iter().any(|sig| ua.contains(sig)) {
            return true;
        }
    }
    ctx.accept.is_some_and(|accept| accept.contains("video/"))
}
