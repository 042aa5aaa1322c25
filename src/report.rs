use crate::aggregator::{
  best_optimized, quick_wins, top_improvements, worst_optimized, ChannelReport,
};
use crate::catalog::RuleCatalog;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

fn health_bar(score: f64) -> String {
  let filled = ((score / 10.0).floor() as usize).min(10);
  format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn health_verdict(score: f64) -> &'static str {
  if score < 50.0 {
    "CRITICAL - urgent optimization needed"
  } else if score < 70.0 {
    "MEDIUM - solid room for improvement"
  } else {
    "GOOD - channel is well optimized"
  }
}

/// Gap occurrence pairs ordered for the summary section: count descending,
/// cataloged gaps in declaration order on ties, uncataloged labels last.
fn summary_pairs<'a>(report: &'a ChannelReport, catalog: &RuleCatalog) -> Vec<(&'a str, usize)> {
  let mut pairs: Vec<(&str, usize)> = Vec::new();
  for rule in catalog.iter() {
    if let Some((name, count)) = report.gap_frequency.get_key_value(rule.name.as_str()) {
      pairs.push((*name, *count));
    }
  }

  let mut extras: Vec<(&str, usize)> = report
    .gap_frequency
    .iter()
    .filter(|(name, _)| catalog.get(name).is_none())
    .map(|(name, count)| (*name, *count))
    .collect();
  extras.sort_unstable_by_key(|(name, _)| *name);
  pairs.extend(extras);

  pairs.sort_by(|a, b| b.1.cmp(&a.1));
  pairs
}

/// Renders the full plain-text audit report: per-video gaps, occurrence
/// summary, top-3 improvements, quick-win matrix, internal benchmark and the
/// health score bar.
pub fn render_text_report(
  report: &ChannelReport,
  channel_url: &str,
  catalog: &RuleCatalog,
) -> String {
  let mut out: Vec<String> = Vec::new();
  out.push(RULE.to_string());
  out.push(format!("CHANNEL AUDIT: {channel_url}"));
  out.push(RULE.to_string());

  let total = report.total_videos_analyzed;
  if total == 0 {
    out.push("No eligible videos found.".to_string());
    out.push("Check the channel URL and that the channel has public uploads.".to_string());
    return out.join("\n");
  }
  out.push(format!("Videos analyzed: {total}"));
  out.push(String::new());

  out.push("PER-VIDEO GAPS".to_string());
  out.push(THIN_RULE.to_string());
  for video in &report.per_video {
    out.push(format!("- {}", video.title));
    out.push(format!("  {}", video.url));
    if video.triggered_gaps.is_empty() {
      out.push("    (no gaps detected)".to_string());
    } else {
      for gap in &video.triggered_gaps {
        match catalog.get(gap) {
          Some(rule) => out.push(format!(
            "    - {gap} | {} // Action: {}",
            rule.rationale, rule.action
          )),
          // Detection-only label with no catalog entry: render it bare.
          None => out.push(format!("    - {gap}")),
        }
      }
    }
  }
  out.push(String::new());

  out.push("GAP OCCURRENCE SUMMARY".to_string());
  out.push(THIN_RULE.to_string());
  for (name, count) in summary_pairs(report, catalog) {
    let pct = (count as f64) / (total as f64) * 100.0;
    match catalog.get(name) {
      Some(rule) => out.push(format!(
        "- {name}: {count}/{total} videos ({pct:.0}%) (ROI: {})",
        rule.roi
      )),
      None => out.push(format!("- {name}: {count}/{total} videos ({pct:.0}%)")),
    }
  }
  out.push(String::new());

  let top = top_improvements(report, 3);
  if !top.is_empty() {
    out.push("TOP 3 IMPROVEMENTS".to_string());
    out.push(THIN_RULE.to_string());
    for (i, gap) in top.iter().enumerate() {
      out.push(format!("{}. {}", i + 1, gap.name));
      out.push(format!("   Affects: {}/{} videos", gap.count, total));
      if let Some(rule) = catalog.get(gap.name) {
        out.push(format!("   Estimated ROI: {}", rule.roi));
        out.push(format!("   Monthly estimate: {}", rule.monthly_value_label));
        out.push(format!("   Action: {}", rule.action));
        out.push(format!("   Effort: {} min per video", rule.effort_minutes));
      }
    }
    out.push(String::new());
  }

  let wins = quick_wins(report, catalog);
  if !wins.is_empty() {
    out.push("QUICK WINS (lowest effort first)".to_string());
    out.push(THIN_RULE.to_string());
    for win in &wins {
      out.push(format!(
        "- {}: {}x | {} min | ~€{:.0}/month | {}",
        win.name, win.count, win.effort_minutes, win.monthly_value_eur, win.action
      ));
    }
    out.push(String::new());
  }

  if let (Some(best), Some(worst)) = (best_optimized(report), worst_optimized(report)) {
    out.push("INTERNAL BENCHMARK".to_string());
    out.push(THIN_RULE.to_string());
    out.push("Best optimized (fewest gaps, most views):".to_string());
    out.push(format!("- {}", best.title));
    out.push(format!(
      "  Views: {} | Gaps: {}",
      best.view_count,
      best.triggered_gaps.len()
    ));
    out.push("Worst optimized (most gaps, fewest views):".to_string());
    out.push(format!("- {}", worst.title));
    out.push(format!(
      "  Views: {} | Gaps: {}",
      worst.view_count,
      worst.triggered_gaps.len()
    ));
    out.push(String::new());
  }

  if let Some(score) = report.health_score {
    out.push("CHANNEL HEALTH SCORE".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!("{}  {:.0}%", health_bar(score), score));
    out.push(health_verdict(score).to_string());
  }

  out.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::aggregator::{aggregate, HealthScorePolicy};
  use crate::catalog::{GapRule, NO_PLAYLIST, TITLE_PROMOTES_FREE};
  use crate::evaluator::{EvaluatorConfig, VideoDetail};

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

  #[test]
  fn zero_video_report_renders_guidance_not_sections() {
    let report = aggregate(
      &[],
      &EvaluatorConfig::default(),
      &RuleCatalog::builtin(),
      HealthScorePolicy::default(),
    );
    let text = render_text_report(&report, "https://yt.example/@c", &RuleCatalog::builtin());

    assert!(text.contains("No eligible videos found."));
    assert!(!text.contains("CHANNEL HEALTH SCORE"));
    assert!(!text.contains("TOP 3"));
  }

  #[test]
  fn full_report_carries_every_section() {
    let videos = vec![
      video("a", "FREE stuff", "", 10),
      video("b", "Another one 🔥 with 99 tricks", "", 400),
    ];
    let catalog = RuleCatalog::builtin();
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &catalog,
      HealthScorePolicy::default(),
    );
    let text = render_text_report(&report, "https://yt.example/@c", &catalog);

    assert!(text.contains("Videos analyzed: 2"));
    assert!(text.contains("PER-VIDEO GAPS"));
    assert!(text.contains("https://www.youtube.com/watch?v=a"));
    assert!(text.contains("GAP OCCURRENCE SUMMARY"));
    assert!(text.contains("TOP 3 IMPROVEMENTS"));
    assert!(text.contains("QUICK WINS"));
    assert!(text.contains("INTERNAL BENCHMARK"));
    assert!(text.contains("CHANNEL HEALTH SCORE"));
    // Both videos miss a playlist.
    assert!(text.contains(&format!("- {NO_PLAYLIST}: 2/2 videos (100%)")));
  }

  #[test]
  fn uncataloged_gap_renders_bare_in_summary_and_per_video() {
    // Catalog without the free-promotion rule: that detection still renders,
    // with no ROI or action metadata.
    let catalog = RuleCatalog::from_rules(vec![GapRule {
      name: NO_PLAYLIST.to_string(),
      weight: 20.0,
      roi: "+20% watch time".to_string(),
      effort_minutes: 30,
      monthly_value_label: "€600/mo".to_string(),
      monthly_value_eur: 0.0,
      rationale: "Playlists chain views".to_string(),
      action: "Create themed playlists".to_string(),
    }]);

    let videos = vec![video("a", "FREE tricks 🔥 99", "", 10)];
    let report = aggregate(
      &videos,
      &EvaluatorConfig::default(),
      &catalog,
      HealthScorePolicy::default(),
    );
    let text = render_text_report(&report, "https://yt.example/@c", &catalog);

    assert!(text.contains(&format!("    - {TITLE_PROMOTES_FREE}\n")));
    assert!(text.contains(&format!("- {TITLE_PROMOTES_FREE}: 1/1 videos (100%)\n")));
  }

  #[test]
  fn health_bar_tracks_the_score() {
    assert_eq!(health_bar(100.0), "██████████");
    assert_eq!(health_bar(62.0), "██████░░░░");
    assert_eq!(health_bar(0.0), "░░░░░░░░░░");
    assert_eq!(health_verdict(30.0), "CRITICAL - urgent optimization needed");
    assert_eq!(health_verdict(65.0), "MEDIUM - solid room for improvement");
    assert_eq!(health_verdict(90.0), "GOOD - channel is well optimized");
  }
}
