use std::collections::HashSet;

use crate::catalog::{
  DESCRIPTION_MISSING, DESCRIPTION_NO_CTA, DESCRIPTION_NO_QUESTION, DESCRIPTION_NO_TITLE_KEYWORDS,
  DESCRIPTION_TOO_SHORT, NO_PLAYLIST, TITLE_NO_DIGITS, TITLE_NO_EMOJI, TITLE_PROMOTES_FREE,
  TITLE_TOO_LONG,
};

/// Full metadata for one upload, fetched lazily per filtered video.
/// An absent description or playlist is a valid state, not an error.
#[derive(Debug, Clone, Default)]
pub struct VideoDetail {
  pub id: String,
  pub title: String,
  pub description: String,
  pub view_count: i64,
  pub duration_seconds: i64,
  pub playlist_title: Option<String>,
}

/// Tunable knobs for the detection predicates. Phrase lists default to the
/// Spanish + English sets the original audits shipped with; channels in other
/// locales swap the lists instead of the code.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
  pub max_title_chars: usize,
  pub min_description_chars: usize,
  pub min_shared_keywords: usize,
  pub attention_emojis: Vec<String>,
  pub free_terms: Vec<String>,
  pub cta_phrases: Vec<String>,
  pub engagement_markers: Vec<String>,
  pub stopwords: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

impl Default for EvaluatorConfig {
  fn default() -> Self {
    Self {
      max_title_chars: 60,
      min_description_chars: 150,
      min_shared_keywords: 3,
      attention_emojis: owned(&["💥", "💣", "🍌", "🚨", "🔥", "🚀"]),
      free_terms: owned(&["free", "gratis"]),
      cta_phrases: owned(&[
        "suscríbete",
        "subscribe",
        "comenta",
        "dale like",
        "haz clic",
        "entra al link",
        "únete",
      ]),
      engagement_markers: owned(&["¿", "?", "comenta", "opina", "qué piensas"]),
      stopwords: owned(&[
        "de", "la", "el", "en", "a", "y", "con", "para", "por", "the", "and", "to", "for", "with",
      ]),
    }
  }
}

fn title_gaps(title: &str, cfg: &EvaluatorConfig) -> Vec<&'static str> {
  let mut gaps = Vec::new();
  let lower = title.to_lowercase();

  if title.chars().count() > cfg.max_title_chars {
    gaps.push(TITLE_TOO_LONG);
  }
  if cfg.free_terms.iter().any(|term| lower.contains(&term.to_lowercase())) {
    gaps.push(TITLE_PROMOTES_FREE);
  }
  if !cfg.attention_emojis.iter().any(|emoji| title.contains(emoji.as_str())) {
    gaps.push(TITLE_NO_EMOJI);
  }
  if !title.chars().any(|ch| ch.is_ascii_digit()) {
    gaps.push(TITLE_NO_DIGITS);
  }

  gaps
}

fn description_gaps(description: &str, cfg: &EvaluatorConfig) -> Vec<&'static str> {
  let trimmed = description.trim();
  if trimmed.is_empty() {
    // No further description rules apply to a missing description.
    return vec![DESCRIPTION_MISSING];
  }

  let mut gaps = Vec::new();
  let lower = trimmed.to_lowercase();

  if trimmed.chars().count() < cfg.min_description_chars {
    gaps.push(DESCRIPTION_TOO_SHORT);
  }
  if !cfg.cta_phrases.iter().any(|cta| lower.contains(&cta.to_lowercase())) {
    gaps.push(DESCRIPTION_NO_CTA);
  }
  if !cfg
    .engagement_markers
    .iter()
    .any(|marker| lower.contains(&marker.to_lowercase()))
  {
    gaps.push(DESCRIPTION_NO_QUESTION);
  }

  gaps
}

fn cross_field_gaps(video: &VideoDetail, cfg: &EvaluatorConfig) -> Vec<&'static str> {
  let mut gaps = Vec::new();

  let playlist = video
    .playlist_title
    .as_deref()
    .map(str::trim)
    .filter(|p| !p.is_empty());
  if playlist.is_none() {
    gaps.push(NO_PLAYLIST);
  }

  let trimmed = video.description.trim();
  if trimmed.chars().count() >= cfg.min_description_chars {
    let stop: HashSet<&str> = cfg.stopwords.iter().map(|s| s.as_str()).collect();
    let title_lower = video.title.to_lowercase();
    let desc_lower = trimmed.to_lowercase();

    let desc_words: HashSet<&str> = desc_lower.split_whitespace().collect();
    let title_keywords: HashSet<&str> = title_lower
      .split_whitespace()
      .filter(|word| !stop.contains(word))
      .collect();

    let shared = title_keywords
      .iter()
      .filter(|word| desc_words.contains(**word))
      .count();
    if shared < cfg.min_shared_keywords {
      gaps.push(DESCRIPTION_NO_TITLE_KEYWORDS);
    }
  }

  gaps
}

/// Applies title rules, then description rules, then cross-field rules, in a
/// fixed order so the same detail always yields the same gap sequence.
pub fn evaluate(video: &VideoDetail, cfg: &EvaluatorConfig) -> Vec<&'static str> {
  let mut gaps = title_gaps(&video.title, cfg);
  gaps.extend(description_gaps(&video.description, cfg));
  gaps.extend(cross_field_gaps(video, cfg));
  gaps
}
