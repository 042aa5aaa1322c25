use yt_gap_audit::aggregator::HealthScorePolicy;
use yt_gap_audit::audit::{audit_channel, AuditConfig};
use yt_gap_audit::catalog::RuleCatalog;
use yt_gap_audit::providers::youtube_web::YoutubeWebProvider;
use yt_gap_audit::report::render_text_report;

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
  args
    .iter()
    .position(|a| a == flag)
    .and_then(|idx| args.get(idx + 1))
    .cloned()
}

#[tokio::main]
async fn main() {
  let args: Vec<String> = std::env::args().collect();

  let channel_url = parse_flag_value(&args, "--channel")
    .or_else(|| parse_flag_value(&args, "--channel-url"))
    .unwrap_or_default();
  if channel_url.trim().is_empty() {
    eprintln!("Missing required --channel");
    eprintln!("Example: cargo run --bin local_audit_once -- --channel https://www.youtube.com/@somechannel --max-videos 5");
    eprintln!("Optional: --policy coverage|avg-penalty, --catalog rules.json");
    return;
  }

  let max_videos = parse_flag_value(&args, "--max-videos")
    .and_then(|v| v.parse::<usize>().ok())
    .unwrap_or(5)
    .clamp(1, 30);

  let health_policy = match parse_flag_value(&args, "--policy").as_deref() {
    Some("coverage") => HealthScorePolicy::CatalogCoverage,
    Some("avg-penalty") | None => HealthScorePolicy::default(),
    Some(other) => {
      eprintln!("Unknown --policy '{other}' (expected coverage or avg-penalty)");
      return;
    }
  };

  let catalog = match parse_flag_value(&args, "--catalog") {
    Some(path) => {
      let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
          eprintln!("Cannot read catalog file {path}: {e}");
          return;
        }
      };
      match RuleCatalog::from_json_str(&raw) {
        Ok(catalog) => catalog,
        Err(e) => {
          eprintln!("Invalid catalog JSON in {path}: {e}");
          return;
        }
      }
    }
    None => RuleCatalog::builtin(),
  };

  let cfg = AuditConfig {
    max_videos,
    catalog,
    health_policy,
    ..AuditConfig::default()
  };

  println!("Analyzing channel: {}", channel_url.trim());
  println!("Fetching the latest {max_videos} uploads...");

  let provider = YoutubeWebProvider::new();
  let report = audit_channel(&provider, channel_url.trim(), &cfg).await;

  println!();
  println!("{}", render_text_report(&report, channel_url.trim(), &cfg.catalog));
}
