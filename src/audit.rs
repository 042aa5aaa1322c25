use chrono::Utc;

use crate::aggregator::{aggregate, ChannelReport, HealthScorePolicy};
use crate::catalog::RuleCatalog;
use crate::evaluator::{EvaluatorConfig, VideoDetail};
use crate::filter::{channel_url_forms, filter_candidates};
use crate::providers::MetadataProvider;

#[derive(Debug, Clone)]
pub struct AuditConfig {
  pub max_videos: usize,
  pub evaluator: EvaluatorConfig,
  pub catalog: RuleCatalog,
  pub health_policy: HealthScorePolicy,
}

impl Default for AuditConfig {
  fn default() -> Self {
    Self {
      max_videos: 5,
      evaluator: EvaluatorConfig::default(),
      catalog: RuleCatalog::builtin(),
      health_policy: HealthScorePolicy::default(),
    }
  }
}

/// Runs one full channel analysis: list candidates (trying each URL form in
/// priority order until one filters to a non-empty set), fetch details,
/// evaluate, aggregate.
///
/// Provider failures never abort the run. A channel where every form fails
/// comes back as a zero-video report; a video whose detail fetch fails is
/// skipped and the rest keep going.
pub async fn audit_channel<P: MetadataProvider>(
  provider: &P,
  channel_url: &str,
  cfg: &AuditConfig,
) -> ChannelReport {
  let now = Utc::now().timestamp();

  let mut eligible = Vec::new();
  for form in channel_url_forms(channel_url) {
    let Ok(candidates) = provider.list_candidates(&form, cfg.max_videos * 2).await else {
      continue;
    };
    let filtered = filter_candidates(&candidates, cfg.max_videos, now);
    if !filtered.is_empty() {
      eligible = filtered;
      break;
    }
  }

  let mut details: Vec<VideoDetail> = Vec::with_capacity(eligible.len());
  for video in &eligible {
    match provider.fetch_detail(&video.id).await {
      Ok(Some(mut detail)) => {
        if detail.title.trim().is_empty() {
          // Some watch pages omit the title; fall back to the listing's.
          detail.title = video.title.clone();
        }
        details.push(detail);
      }
      Ok(None) | Err(_) => continue,
    }
  }

  aggregate(&details, &cfg.evaluator, &cfg.catalog, cfg.health_policy)
}
