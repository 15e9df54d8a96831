//! HTML preview rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML with
//! automatic escaping of all dynamic values.

use maud::{html, Markup, DOCTYPE};
use unfurl_core::MediaDescriptor;

/// Render the browser-facing preview page for a resolved link.
///
/// Kept deliberately minimal: an inline player plus the author/title
/// metadata that was captured at resolve time.
pub fn preview_page(short_id: &str, descriptor: &MediaDescriptor) -> Markup {
    let title = descriptor.title.as_deref().unwrap_or("Shared media");
    let video = descriptor.best_video_url();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                main data-short-id=(short_id) {
                    h1 { (title) }
                    @if let Some(author) = &descriptor.author {
                        p class="author" { "@" (author) }
                    }
                    video controls playsinline poster=[descriptor.thumbnail_url.as_deref()] src=(video) {}
                }
            }
        }
    }
}
