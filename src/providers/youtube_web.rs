use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use hyper::{Method, Request, StatusCode};
use serde_json::Value;

use super::{MetadataProvider, ProviderError};
use crate::evaluator::VideoDetail;
use crate::filter::CandidateVideo;

const BROWSER_USER_AGENT: &str =
  "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Metadata provider backed by the public YouTube web pages. Channel tab
/// pages embed a `ytInitialData` JSON blob with the recent uploads; watch
/// pages embed `ytInitialPlayerResponse` with the full video details.
///
/// Watch pages opened without a playlist context never carry playlist
/// membership, so details from this provider always report
/// `playlist_title: None`.
pub struct YoutubeWebProvider {
  base_url: String,
}

impl YoutubeWebProvider {
  pub fn new() -> Self {
    Self::with_base_url("https://www.youtube.com")
  }

  pub fn with_base_url(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }
}

impl Default for YoutubeWebProvider {
  fn default() -> Self {
    Self::new()
  }
}

async fn fetch_page(url: &str) -> Result<String, ProviderError> {
  let connector = hyper_rustls::HttpsConnectorBuilder::new()
    .with_native_roots()
    .map_err(|e| ProviderError::new(e.to_string()))?
    .https_or_http()
    .enable_http1()
    .build();

  let client =
    hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

  let req = Request::builder()
    .method(Method::GET)
    .uri(url)
    .header(USER_AGENT, BROWSER_USER_AGENT)
    .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
    // Skip the EU consent interstitial, which hides the initial data blob.
    .header(COOKIE, "CONSENT=YES+1; SOCS=CAI")
    .body(Empty::<Bytes>::new())
    .map_err(|e| ProviderError::new(e.to_string()))?;

  let resp = client
    .request(req)
    .await
    .map_err(|e| ProviderError::new(e.to_string()))?;

  let status = resp.status();
  let body_bytes = resp
    .into_body()
    .collect()
    .await
    .map_err(|e| ProviderError::with_status(status.as_u16(), e.to_string()))?
    .to_bytes();

  if status != StatusCode::OK {
    let snippet = String::from_utf8_lossy(&body_bytes)
      .chars()
      .take(200)
      .collect::<String>();
    return Err(ProviderError::with_status(status.as_u16(), snippet));
  }

  Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// Pulls the JSON object assigned to `variable` out of a page. Scans for the
/// first balanced `{...}` after the assignment, skipping braces inside JSON
/// strings.
fn extract_embedded_json(html: &str, variable: &str) -> Option<Value> {
  let anchor = html.find(variable)?;
  let rest = &html[anchor + variable.len()..];
  let start = rest.find('{')?;
  let bytes = rest[start..].as_bytes();

  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (i, &b) in bytes.iter().enumerate() {
    if in_string {
      if escaped {
        escaped = false;
      } else if b == b'\\' {
        escaped = true;
      } else if b == b'"' {
        in_string = false;
      }
      continue;
    }

    match b {
      b'"' => in_string = true,
      b'{' => depth += 1,
      b'}' => {
        depth -= 1;
        if depth == 0 {
          return serde_json::from_slice(&bytes[..=i]).ok();
        }
      }
      _ => {}
    }
  }

  None
}

fn collect_video_renderers<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
  match value {
    Value::Object(map) => {
      for (key, child) in map {
        if key == "videoRenderer" || key == "gridVideoRenderer" {
          out.push(child);
        } else {
          collect_video_renderers(child, out);
        }
      }
    }
    Value::Array(items) => {
      for item in items {
        collect_video_renderers(item, out);
      }
    }
    _ => {}
  }
}

fn renderer_title(renderer: &Value) -> Option<String> {
  let title = renderer.get("title")?;
  if let Some(text) = title.get("simpleText").and_then(|v| v.as_str()) {
    return Some(text.to_string());
  }
  title
    .get("runs")
    .and_then(|v| v.as_array())
    .and_then(|runs| runs.first())
    .and_then(|run| run.get("text"))
    .and_then(|v| v.as_str())
    .map(|s| s.to_string())
}

fn renderer_time_status_style(renderer: &Value) -> Option<&str> {
  let overlays = renderer.get("thumbnailOverlays")?.as_array()?;
  for overlay in overlays {
    if let Some(style) = overlay
      .get("thumbnailOverlayTimeStatusRenderer")
      .and_then(|v| v.get("style"))
      .and_then(|v| v.as_str())
    {
      return Some(style);
    }
  }
  None
}

fn renderer_has_live_badge(renderer: &Value) -> bool {
  renderer
    .get("badges")
    .and_then(|v| v.as_array())
    .map(|badges| {
      badges.iter().any(|badge| {
        badge
          .get("metadataBadgeRenderer")
          .and_then(|v| v.get("style"))
          .and_then(|v| v.as_str())
          == Some("BADGE_STYLE_TYPE_LIVE_NOW")
      })
    })
    .unwrap_or(false)
}

fn candidate_from_renderer(renderer: &Value) -> CandidateVideo {
  let style = renderer_time_status_style(renderer);
  let upcoming_start = renderer
    .get("upcomingEventData")
    .and_then(|v| v.get("startTime"))
    .and_then(|v| v.as_str())
    .and_then(|raw| raw.trim().parse::<i64>().ok());

  CandidateVideo {
    id: renderer
      .get("videoId")
      .and_then(|v| v.as_str())
      .map(|s| s.to_string()),
    title: renderer_title(renderer),
    is_live: style == Some("LIVE") || renderer_has_live_badge(renderer),
    was_live: false,
    is_upcoming: style == Some("UPCOMING"),
    is_premiere: renderer.get("upcomingEventData").is_some(),
    release_timestamp: upcoming_start,
  }
}

fn parse_listing_candidates(data: &Value) -> Vec<CandidateVideo> {
  let mut renderers = Vec::new();
  collect_video_renderers(data, &mut renderers);
  renderers.iter().map(|r| candidate_from_renderer(r)).collect()
}

fn string_field_as_i64(details: &Value, field: &str) -> i64 {
  details
    .get(field)
    .and_then(|v| v.as_str())
    .and_then(|raw| raw.trim().parse::<i64>().ok())
    .unwrap_or(0)
}

fn parse_player_detail(player: &Value) -> Option<VideoDetail> {
  let playable = player
    .get("playabilityStatus")
    .and_then(|v| v.get("status"))
    .and_then(|v| v.as_str())
    .map(|status| status == "OK")
    .unwrap_or(false);
  if !playable {
    return None;
  }

  let details = player.get("videoDetails")?;
  let id = details.get("videoId").and_then(|v| v.as_str())?.to_string();

  Some(VideoDetail {
    id,
    title: details
      .get("title")
      .and_then(|v| v.as_str())
      .unwrap_or("")
      .to_string(),
    description: details
      .get("shortDescription")
      .and_then(|v| v.as_str())
      .unwrap_or("")
      .to_string(),
    view_count: string_field_as_i64(details, "viewCount"),
    duration_seconds: string_field_as_i64(details, "lengthSeconds"),
    playlist_title: None,
  })
}

impl MetadataProvider for YoutubeWebProvider {
  async fn list_candidates(
    &self,
    listing_url: &str,
    limit: usize,
  ) -> Result<Vec<CandidateVideo>, ProviderError> {
    let html = fetch_page(listing_url).await?;
    let data = extract_embedded_json(&html, "ytInitialData")
      .ok_or_else(|| ProviderError::new(format!("no ytInitialData found at {listing_url}")))?;

    let mut candidates = parse_listing_candidates(&data);
    candidates.truncate(limit);
    Ok(candidates)
  }

  async fn fetch_detail(&self, video_id: &str) -> Result<Option<VideoDetail>, ProviderError> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
      return Ok(None);
    }

    let url = format!("{}/watch?v={}", self.base_url, video_id);
    let html = fetch_page(&url).await?;

    let Some(player) = extract_embedded_json(&html, "ytInitialPlayerResponse") else {
      return Ok(None);
    };
    Ok(parse_player_detail(&player))
  }
}
