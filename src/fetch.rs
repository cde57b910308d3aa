//! `tubeview fetch`: drive the feed controller without a terminal UI.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::{ApiClient, Comment, PageToken, VideoDetails};
use crate::cli::OutputFormat;
use crate::feed::FeedController;
use crate::time::format_published;
use crate::views::common::pluralize;
use crate::views::html;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchReport<'a> {
    video_id: &'a str,
    video: &'a VideoDetails,
    comments: &'a [Comment],
    next_page_token: Option<&'a PageToken>,
}

/// Load the video and up to `pages` comment pages, returning the rendered
/// report. The lookup or any page failing is an error.
pub async fn run(
    client: &ApiClient,
    video_id: &str,
    pages: u32,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut feed = FeedController::new();
    let Some(mut request) = feed.start_feed(video_id) else {
        bail!("Video ID must not be empty");
    };

    loop {
        let outcome = request.execute(client).await;
        feed.apply(outcome);
        if let Some(msg) = feed.state().error() {
            bail!("{msg}");
        }
        if feed.snapshot().pages_loaded >= pages as usize {
            break;
        }
        match feed.load_next_page() {
            Some(next) => request = next,
            None => break,
        }
    }

    let snapshot = feed.snapshot();
    info!(
        video_id = snapshot.video_id.unwrap_or_default(),
        comments = snapshot.comments.len(),
        pages = snapshot.pages_loaded,
        "fetch complete"
    );
    let (Some(video_id), Some(video)) = (snapshot.video_id, snapshot.video) else {
        bail!("No video loaded");
    };

    match format {
        OutputFormat::Json => {
            let report = FetchReport {
                video_id,
                video,
                comments: snapshot.comments,
                next_page_token: feed.cursor(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Text => Ok(format_text(video, snapshot.comments, now)),
    }
}

fn format_text(video: &VideoDetails, comments: &[Comment], now: DateTime<Utc>) -> String {
    let mut out = vec![
        video.title.clone(),
        format!(
            "{} • {}",
            pluralize(video.view_count, "view", "views"),
            pluralize(video.like_count, "like", "likes")
        ),
    ];
    out.extend(html::to_lines(&video.description));

    for comment in comments {
        out.push(String::new());
        out.push(format!(
            "{} · {}",
            comment.author,
            format_published(comment.published_at, now)
        ));
        out.extend(html::to_lines(&comment.text).into_iter().map(|l| format!("  {l}")));
        out.push(format!("  {}", pluralize(comment.like_count, "like", "likes")));
    }
    out.join("\n")
}
