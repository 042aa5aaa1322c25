use serde::Deserialize;

/// One raw entry from a channel listing. Everything is optional because the
/// listing stage routinely yields partial records (tab headers, hidden
/// premieres, entries with no id yet).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateVideo {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub is_live: bool,
  #[serde(default)]
  pub was_live: bool,
  #[serde(default)]
  pub is_upcoming: bool,
  #[serde(default)]
  pub is_premiere: bool,
  #[serde(default)]
  pub release_timestamp: Option<i64>,
}

/// A candidate that survived filtering. Carries only what the per-video
/// detail fetch needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleVideo {
  pub id: String,
  pub title: String,
}

/// Listing URL forms for one channel, in fallback priority order. The first
/// form that yields a non-empty filtered result wins; forms are alternates,
/// never merged.
pub fn channel_url_forms(channel_url: &str) -> [String; 3] {
  let base = channel_url.trim().trim_end_matches('/');
  [format!("{base}/videos"), base.to_string(), format!("{base}/streams")]
}

/// Selects eligible uploads from raw candidates, preserving source order
/// (most recent first, as listed). Live, was-live, upcoming and premiere
/// entries are dropped, as are scheduled releases still in the future and
/// entries missing an id or title. An empty result is a normal outcome.
pub fn filter_candidates(
  candidates: &[CandidateVideo],
  max_videos: usize,
  now_epoch: i64,
) -> Vec<EligibleVideo> {
  let mut out = Vec::new();

  for candidate in candidates {
    if out.len() == max_videos {
      break;
    }
    if candidate.is_live || candidate.was_live || candidate.is_upcoming || candidate.is_premiere {
      continue;
    }
    if let Some(release) = candidate.release_timestamp {
      if release > now_epoch {
        continue;
      }
    }

    let id = candidate.id.as_deref().map(str::trim).unwrap_or("");
    let title = candidate.title.as_deref().map(str::trim).unwrap_or("");
    if id.is_empty() || title.is_empty() {
      continue;
    }

    out.push(EligibleVideo {
      id: id.to_string(),
      title: title.to_string(),
    });
  }

  out
}
