//! Media pause broadcast
//!
//! Pauses every embedded player on the page: YouTube and Vimeo iframes get a
//! player command through `postMessage`, native `video` elements are paused,
//! and a custom event asks 3D models to pause themselves.

use serde::Serialize;
use storefront_dom::{Document, EventHandler, EventTarget, NodeId};

use crate::{Result, ThemeConfig};

/// YouTube IFrame API command
#[derive(Debug, Serialize)]
struct YouTubeCommand<'a> {
    event: &'a str,
    func: &'a str,
    args: &'a str,
}

/// Vimeo player API command
#[derive(Debug, Serialize)]
struct VimeoCommand<'a> {
    method: &'a str,
}

/// How many players were asked to pause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaPauseSummary {
    pub youtube: usize,
    pub vimeo: usize,
    pub videos: usize,
}

/// Pause all media on the page and dispatch the configured pause event on
/// the document
pub fn pause_all_media(
    doc: &mut Document,
    config: &ThemeConfig,
    handler: &mut dyn EventHandler,
) -> Result<MediaPauseSummary> {
    let youtube_message = serde_json::to_string(&YouTubeCommand {
        event: "command",
        func: "pauseVideo",
        args: "",
    })?;
    let vimeo_message = serde_json::to_string(&VimeoCommand { method: "pause" })?;

    let mut summary = MediaPauseSummary::default();

    for frame in doc.query_selector_all(NodeId::ROOT, &config.youtube_selector)? {
        if doc.post_message(frame, &youtube_message, "*") {
            summary.youtube += 1;
        }
    }
    for frame in doc.query_selector_all(NodeId::ROOT, &config.vimeo_selector)? {
        if doc.post_message(frame, &vimeo_message, "*") {
            summary.vimeo += 1;
        }
    }
    for video in doc.query_selector_all(NodeId::ROOT, "video")? {
        doc.pause_media(video);
        summary.videos += 1;
    }

    doc.dispatch_custom(&config.media_pause_event, EventTarget::DOCUMENT, handler);

    tracing::debug!(
        "Paused media: {} youtube, {} vimeo, {} video",
        summary.youtube,
        summary.vimeo,
        summary.videos
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_all_media() {
        let mut doc = Document::new();
        let body = doc.body();
        let youtube = doc.create_child(body, "iframe");
        doc.add_class(youtube, "js-youtube");
        let vimeo = doc.create_child(body, "iframe");
        doc.add_class(vimeo, "js-vimeo");
        let video = doc.create_child(body, "video");
        doc.play_media(video);

        let summary = pause_all_media(&mut doc, &ThemeConfig::default(), &mut ()).unwrap();
        assert_eq!(summary, MediaPauseSummary { youtube: 1, vimeo: 1, videos: 1 });
        assert!(doc.is_paused(video));

        let messages = doc.posted_messages();
        assert_eq!(messages[0].target, youtube);
        assert_eq!(messages[0].message, r#"{"event":"command","func":"pauseVideo","args":""}"#);
        assert_eq!(messages[1].target, vimeo);
        assert_eq!(messages[1].message, r#"{"method":"pause"}"#);
        assert!(messages.iter().all(|m| m.target_origin == "*"));
    }

    #[test]
    fn test_empty_page() {
        let mut doc = Document::new();
        let summary = pause_all_media(&mut doc, &ThemeConfig::default(), &mut ()).unwrap();
        assert_eq!(summary, MediaPauseSummary::default());
        assert!(doc.posted_messages().is_empty());
    }
}
