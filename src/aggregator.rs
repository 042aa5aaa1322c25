use std::collections::HashMap;

use crate::catalog::RuleCatalog;
use crate::evaluator::{evaluate, EvaluatorConfig, VideoDetail};

/// Gaps triggered by one analyzed video.
#[derive(Debug, Clone)]
pub struct GapResult {
  pub video_id: String,
  pub title: String,
  pub url: String,
  pub view_count: i64,
  pub duration_seconds: i64,
  pub triggered_gaps: Vec<&'static str>,
}

/// One entry of the impact ranking: how often a gap occurred and its
/// frequency-weighted impact.
#[derive(Debug, Clone)]
pub struct RankedGap {
  pub name: &'static str,
  pub count: usize,
  pub impact_score: f64,
}

/// A detected gap ordered for the quick-win matrix (lowest effort first).
#[derive(Debug, Clone)]
pub struct QuickWin {
  pub name: &'static str,
  pub count: usize,
  pub effort_minutes: u32,
  pub monthly_value_eur: f64,
  pub action: String,
}

/// The health-score formula diverged between front ends, so the choice is a
/// named strategy rather than a constant baked into the aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthScorePolicy {
  /// `100 - total_gaps / (catalog_len * videos) * 100`, clamped to [0, 100].
  CatalogCoverage,
  /// `max(0, 100 - avg_gaps_per_video * per_gap)`.
  AverageGapPenalty { per_gap: f64 },
}

impl Default for HealthScorePolicy {
  fn default() -> Self {
    HealthScorePolicy::AverageGapPenalty { per_gap: 7.0 }
  }
}

impl HealthScorePolicy {
  /// `None` when no videos were analyzed; a zero-video channel has no score.
  pub fn score(&self, total_gaps: usize, total_videos: usize, catalog_len: usize) -> Option<f64> {
    if total_videos == 0 {
      return None;
    }

    let score = match self {
      HealthScorePolicy::CatalogCoverage => {
        if catalog_len == 0 {
          return None;
        }
        let possible = (catalog_len * total_videos) as f64;
        100.0 - (total_gaps as f64) / possible * 100.0
      }
      HealthScorePolicy::AverageGapPenalty { per_gap } => {
        let avg = (total_gaps as f64) / (total_videos as f64);
        100.0 - avg * per_gap
      }
    };

    Some(score.clamp(0.0, 100.0))
  }
}

/// Everything derived from one analysis run. Recomputed fresh each time;
/// nothing here persists between runs.
#[derive(Debug, Clone)]
pub struct ChannelReport {
  pub total_videos_analyzed: usize,
  pub per_video: Vec<GapResult>,
  pub gap_frequency: HashMap<&'static str, usize>,
  pub ranked_improvements: Vec<RankedGap>,
  pub health_score: Option<f64>,
}

pub fn watch_url(video_id: &str) -> String {
  format!("https://www.youtube.com/watch?v={video_id}")
}

/// Runs the evaluator over every video, accumulates per-gap frequencies and
/// computes the impact ranking plus the health score. Gap names with no
/// catalog entry contribute zero impact and are left out of the ranking;
/// they still appear in `gap_frequency` and the per-video results.
pub fn aggregate(
  videos: &[VideoDetail],
  evaluator_cfg: &EvaluatorConfig,
  catalog: &RuleCatalog,
  policy: HealthScorePolicy,
) -> ChannelReport {
  let mut per_video = Vec::with_capacity(videos.len());
  let mut gap_frequency: HashMap<&'static str, usize> = HashMap::new();

  for video in videos {
    let triggered = evaluate(video, evaluator_cfg);
    for gap in &triggered {
      *gap_frequency.entry(gap).or_insert(0) += 1;
    }
    per_video.push(GapResult {
      video_id: video.id.clone(),
      title: video.title.clone(),
      url: watch_url(&video.id),
      view_count: video.view_count,
      duration_seconds: video.duration_seconds,
      triggered_gaps: triggered,
    });
  }

  // Seed the ranking in catalog declaration order so the stable sort keeps
  // that order for equal impact scores.
  let mut ranked_improvements: Vec<RankedGap> = Vec::new();
  for rule in catalog.iter() {
    let Some((name, count)) = gap_frequency.get_key_value(rule.name.as_str()) else {
      continue;
    };
    ranked_improvements.push(RankedGap {
      name: *name,
      count: *count,
      impact_score: (*count as f64) * rule.weight,
    });
  }
  ranked_improvements.sort_by(|a, b| {
    b.impact_score
      .partial_cmp(&a.impact_score)
      .unwrap_or(std::cmp::Ordering::Equal)
  });

  let total_gaps: usize = gap_frequency.values().sum();
  let health_score = policy.score(total_gaps, videos.len(), catalog.len());

  ChannelReport {
    total_videos_analyzed: videos.len(),
    per_video,
    gap_frequency,
    ranked_improvements,
    health_score,
  }
}

/// Headline slice of the ranking (reports show the top 3).
pub fn top_improvements(report: &ChannelReport, n: usize) -> &[RankedGap] {
  &report.ranked_improvements[..report.ranked_improvements.len().min(n)]
}

/// Detected gaps reordered for the quick-win matrix: lowest effort first,
/// then highest monthly value. Only cataloged gaps qualify; without effort
/// data there is nothing to order by.
pub fn quick_wins(report: &ChannelReport, catalog: &RuleCatalog) -> Vec<QuickWin> {
  let mut wins: Vec<QuickWin> = Vec::new();
  for rule in catalog.iter() {
    let Some((name, count)) = report.gap_frequency.get_key_value(rule.name.as_str()) else {
      continue;
    };
    wins.push(QuickWin {
      name: *name,
      count: *count,
      effort_minutes: rule.effort_minutes,
      monthly_value_eur: rule.monthly_value_eur,
      action: rule.action.clone(),
    });
  }

  wins.sort_by(|a, b| {
    a.effort_minutes.cmp(&b.effort_minutes).then_with(|| {
      b.monthly_value_eur
        .partial_cmp(&a.monthly_value_eur)
        .unwrap_or(std::cmp::Ordering::Equal)
    })
  });
  wins
}

/// The channel's best-optimized upload: fewest gaps, then most views.
pub fn best_optimized(report: &ChannelReport) -> Option<&GapResult> {
  report
    .per_video
    .iter()
    .min_by_key(|v| (v.triggered_gaps.len(), std::cmp::Reverse(v.view_count)))
}

/// The channel's worst-optimized upload: most gaps, then fewest views.
pub fn worst_optimized(report: &ChannelReport) -> Option<&GapResult> {
  report
    .per_video
    .iter()
    .max_by_key(|v| (v.triggered_gaps.len(), std::cmp::Reverse(v.view_count)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{
    GapRule, DESCRIPTION_MISSING, NO_PLAYLIST, TITLE_NO_EMOJI, TITLE_PROMOTES_FREE, TITLE_TOO_LONG,
  };

  fn video(id: &str, title: &str, description: &str, views: i64) -> VideoDetail {
    VideoDetail {
      id: id.to_string(),
      title: title.to_string(),
      description: description.to_string(),
      view_count: views,
      duration_seconds: 300,
      playlist_title: None,
    }
  }

  fn clean_video(id: &str, views: i64) -> VideoDetail {
    // Triggers only "No playlist assigned" under the default config.
    let description = format!(
      "Solid 🔥 tutorial video with 42 steps. Subscribe and comment below! What do you think? {}",
      "padding ".repeat(12)
    );
    VideoDetail {
      playlist_title: None,
      ..video(id, "Solid 🔥 tutorial video with 42 steps", &description, views)
    }
  }

  #[test]
  fn frequency_matches_per_video_occurrences() {
    let videos = vec![
      video("a", "FREE stuff", "", 10),
      video("b", "More FREE stuff", "", 20),
    ];
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &RuleCatalog::builtin(),
      HealthScorePolicy::default(),
    );

    for (gap, count) in &report.gap_frequency {
      let occurrences = report
        .per_video
        .iter()
        .filter(|v| v.triggered_gaps.contains(gap))
        .count();
      assert_eq!(occurrences, *count, "frequency mismatch for {gap}");
    }
    assert_eq!(report.gap_frequency[&TITLE_PROMOTES_FREE], 2);
    assert_eq!(report.gap_frequency[&DESCRIPTION_MISSING], 2);
  }

  #[test]
  fn ranking_is_sorted_by_impact_with_catalog_order_tie_break() {
    // This title triggers "Title too long" and "Title lacks attention emoji",
    // both weight 10, so with a single video their impact scores tie.
    let title = "FREE Secret Growth Hack You Need To Try Today Before Everyone Else Does";
    let videos = vec![video("a", title, "", 10)];
    let catalog = RuleCatalog::builtin();
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &catalog,
      HealthScorePolicy::default(),
    );

    let scores: Vec<f64> = report.ranked_improvements.iter().map(|g| g.impact_score).collect();
    for pair in scores.windows(2) {
      assert!(pair[0] >= pair[1]);
    }

    let pos = |name: &str| {
      report
        .ranked_improvements
        .iter()
        .position(|g| g.name == name)
        .unwrap()
    };
    assert_eq!(
      report.ranked_improvements[pos(TITLE_TOO_LONG)].impact_score,
      report.ranked_improvements[pos(TITLE_NO_EMOJI)].impact_score
    );
    // The catalog declares "Title too long" before the emoji rule; the tie
    // must resolve in that order.
    assert!(catalog.position(TITLE_TOO_LONG) < catalog.position(TITLE_NO_EMOJI));
    assert!(pos(TITLE_TOO_LONG) < pos(TITLE_NO_EMOJI));
  }

  #[test]
  fn uncataloged_gap_is_counted_but_not_ranked() {
    // A one-rule catalog: every other detection becomes a transient label
    // with no catalog entry. It must not panic and must not be ranked.
    let minimal = RuleCatalog::from_rules(vec![GapRule {
      name: NO_PLAYLIST.to_string(),
      weight: 20.0,
      roi: "+20% watch time".to_string(),
      effort_minutes: 30,
      monthly_value_label: "€600/mo".to_string(),
      monthly_value_eur: 0.0,
      rationale: "Playlists chain views".to_string(),
      action: "Create themed playlists".to_string(),
    }]);

    let videos = vec![video("a", "FREE stuff", "", 10)];
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &minimal,
      HealthScorePolicy::default(),
    );

    assert!(report.gap_frequency[&TITLE_PROMOTES_FREE] == 1);
    assert_eq!(report.ranked_improvements.len(), 1);
    assert_eq!(report.ranked_improvements[0].name, NO_PLAYLIST);
    assert_eq!(report.ranked_improvements[0].impact_score, 20.0);
  }

  #[test]
  fn empty_input_yields_zero_report_with_no_score() {
    let report = aggregate(
      &[],
      &EvaluatorConfig::default(),
      &RuleCatalog::builtin(),
      HealthScorePolicy::default(),
    );
    assert_eq!(report.total_videos_analyzed, 0);
    assert!(report.per_video.is_empty());
    assert!(report.gap_frequency.is_empty());
    assert!(report.ranked_improvements.is_empty());
    assert!(report.health_score.is_none());
  }

  #[test]
  fn health_score_policies_disagree_but_both_stay_in_range() {
    let videos = vec![video("a", "FREE stuff", "", 10), clean_video("b", 500)];
    let catalog = RuleCatalog::builtin();

    let coverage = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &catalog,
      HealthScorePolicy::CatalogCoverage,
    )
    .health_score
    .unwrap();
    let penalty = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &catalog,
      HealthScorePolicy::default(),
    )
    .health_score
    .unwrap();

    assert!((0.0..=100.0).contains(&coverage));
    assert!((0.0..=100.0).contains(&penalty));

    // "FREE stuff": promotes free, no emoji, no digits, missing description,
    // no playlist = 5. clean_video: no playlist only. Total 6 gaps over 2
    // videos.
    assert!((coverage - (100.0 - 6.0 / 20.0 * 100.0)).abs() < 1e-9);
    assert!((penalty - (100.0 - 3.0 * 7.0)).abs() < 1e-9);
  }

  #[test]
  fn average_gap_penalty_floors_at_zero() {
    assert_eq!(
      HealthScorePolicy::AverageGapPenalty { per_gap: 7.0 }.score(100, 2, 10),
      Some(0.0)
    );
  }

  #[test]
  fn quick_wins_order_by_effort_then_value() {
    let videos = vec![video("a", "FREE stuff", "", 10)];
    let catalog = RuleCatalog::builtin();
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &catalog,
      HealthScorePolicy::default(),
    );

    let wins = quick_wins(&report, &catalog);
    assert!(!wins.is_empty());
    for pair in wins.windows(2) {
      assert!(
        pair[0].effort_minutes < pair[1].effort_minutes
          || (pair[0].effort_minutes == pair[1].effort_minutes
            && pair[0].monthly_value_eur >= pair[1].monthly_value_eur)
      );
    }

    // Promotes-free (2 min, €140) must beat no-playlist (30 min, €600).
    let free_pos = wins.iter().position(|w| w.name == TITLE_PROMOTES_FREE).unwrap();
    let playlist_pos = wins.iter().position(|w| w.name == NO_PLAYLIST).unwrap();
    assert!(free_pos < playlist_pos);
  }

  #[test]
  fn benchmark_picks_fewest_gap_most_viewed_as_best() {
    let videos = vec![
      video("bad", "FREE stuff", "", 1000),
      clean_video("good", 50),
      clean_video("better", 5000),
    ];
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &RuleCatalog::builtin(),
      HealthScorePolicy::default(),
    );

    assert_eq!(best_optimized(&report).unwrap().video_id, "better");
    assert_eq!(worst_optimized(&report).unwrap().video_id, "bad");
  }

  #[test]
  fn top_improvements_caps_at_available_entries() {
    let videos = vec![video("a", "FREE stuff", "", 10)];
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &RuleCatalog::builtin(),
      HealthScorePolicy::default(),
    );

    assert_eq!(top_improvements(&report, 3).len(), 3);
    assert_eq!(
      top_improvements(&report, 100).len(),
      report.ranked_improvements.len()
    );
  }
}
