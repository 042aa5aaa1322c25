pub mod youtube_web;

use crate::evaluator::VideoDetail;
use crate::filter::CandidateVideo;

#[derive(Debug, Clone)]
pub struct ProviderError {
  pub status: Option<u16>,
  pub message: String,
}

impl ProviderError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      status: None,
      message: message.into(),
    }
  }

  pub fn with_status(status: u16, message: impl Into<String>) -> Self {
    Self {
      status: Some(status),
      message: message.into(),
    }
  }
}

impl std::fmt::Display for ProviderError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.status {
      Some(code) => write!(f, "metadata provider error (status={}): {}", code, self.message),
      None => write!(f, "metadata provider error: {}", self.message),
    }
  }
}

impl std::error::Error for ProviderError {}

/// The capability the audit needs from the outside world: list recent
/// candidates for one listing URL, and fetch full metadata for one video.
/// `fetch_detail` returning `Ok(None)` means "this video is unavailable";
/// the caller skips it and keeps going.
#[allow(async_fn_in_trait)]
pub trait MetadataProvider {
  async fn list_candidates(
    &self,
    listing_url: &str,
    limit: usize,
  ) -> Result<Vec<CandidateVideo>, ProviderError>;

  async fn fetch_detail(&self, video_id: &str) -> Result<Option<VideoDetail>, ProviderError>;
}
