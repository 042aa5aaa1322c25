use serde::Deserialize;

pub const TITLE_TOO_LONG: &str = "Title too long";
pub const TITLE_NO_DIGITS: &str = "Title has no digits";
pub const TITLE_NO_EMOJI: &str = "Title lacks attention emoji";
pub const TITLE_PROMOTES_FREE: &str = "Title promotes free";
pub const DESCRIPTION_MISSING: &str = "Description missing";
pub const DESCRIPTION_TOO_SHORT: &str = "Description too short";
pub const DESCRIPTION_NO_CTA: &str = "Description lacks call-to-action";
pub const DESCRIPTION_NO_QUESTION: &str = "Description lacks engagement question";
pub const DESCRIPTION_NO_TITLE_KEYWORDS: &str = "Description missing title keywords";
pub const NO_PLAYLIST: &str = "No playlist assigned";

/// Static metadata attached to one gap name. The `roi` and
/// `monthly_value_label` fields are display strings; the numeric euro
/// estimate is extracted once at construction so ranking never parses text.
#[derive(Debug, Clone, Deserialize)]
pub struct GapRule {
  pub name: String,
  pub weight: f64,
  pub roi: String,
  pub effort_minutes: u32,
  pub monthly_value_label: String,
  #[serde(default)]
  pub monthly_value_eur: f64,
  pub rationale: String,
  pub action: String,
}

/// Ordered, read-only gap rule registry. Declaration order doubles as the
/// tie-break order when ranking gaps with equal impact, so catalogs built
/// from configuration reproduce a variant's output exactly.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Vec<GapRule>")]
pub struct RuleCatalog {
  rules: Vec<GapRule>,
}

fn monthly_value_from_label(label: &str) -> f64 {
  let cleaned = label.replace(',', "");
  let mut digits = String::new();
  for ch in cleaned.chars() {
    if ch.is_ascii_digit() || (ch == '.' && !digits.is_empty()) {
      digits.push(ch);
    } else if !digits.is_empty() {
      break;
    }
  }
  digits.parse::<f64>().unwrap_or(0.0)
}

impl From<Vec<GapRule>> for RuleCatalog {
  fn from(rules: Vec<GapRule>) -> Self {
    RuleCatalog::from_rules(rules)
  }
}

impl RuleCatalog {
  pub fn from_rules(mut rules: Vec<GapRule>) -> Self {
    for rule in rules.iter_mut() {
      if rule.monthly_value_eur == 0.0 {
        rule.monthly_value_eur = monthly_value_from_label(&rule.monthly_value_label);
      }
    }
    Self { rules }
  }

  pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str::<Self>(raw)
  }

  pub fn get(&self, name: &str) -> Option<&GapRule> {
    self.rules.iter().find(|r| r.name == name)
  }

  pub fn position(&self, name: &str) -> Option<usize> {
    self.rules.iter().position(|r| r.name == name)
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &GapRule> {
    self.rules.iter()
  }

  /// The full ten-rule table used by the dashboard front end.
  pub fn builtin() -> Self {
    fn rule(
      name: &str,
      weight: f64,
      roi: &str,
      effort_minutes: u32,
      monthly_value_label: &str,
      rationale: &str,
      action: &str,
    ) -> GapRule {
      GapRule {
        name: name.to_string(),
        weight,
        roi: roi.to_string(),
        effort_minutes,
        monthly_value_label: monthly_value_label.to_string(),
        monthly_value_eur: 0.0,
        rationale: rationale.to_string(),
        action: action.to_string(),
      }
    }

    Self::from_rules(vec![
      rule(
        DESCRIPTION_MISSING,
        25.0,
        "+25% SEO",
        8,
        "€180/mo",
        "Helps the algorithm index the video",
        "Add a full description (over 200 characters)",
      ),
      rule(
        NO_PLAYLIST,
        20.0,
        "+20% watch time",
        30,
        "€600/mo",
        "YouTube auto-plays the next video in a playlist",
        "Create themed playlists",
      ),
      rule(
        TITLE_PROMOTES_FREE,
        18.0,
        "+12% CTR",
        2,
        "€140/mo",
        "Power words pull clicks in crowded feeds",
        "Make the free offer explicit up front",
      ),
      rule(
        DESCRIPTION_TOO_SHORT,
        15.0,
        "+10-15% impressions",
        5,
        "€200/mo",
        "Longer copy improves search indexing",
        "Expand to 200-300 characters",
      ),
      rule(
        DESCRIPTION_NO_TITLE_KEYWORDS,
        12.0,
        "+8% impressions",
        7,
        "€160/mo",
        "Repeating title keywords reinforces search ranking",
        "Echo the title keywords in the description",
      ),
      rule(
        TITLE_TOO_LONG,
        10.0,
        "+6% CTR",
        8,
        "€120/mo",
        "Short titles avoid truncation in feeds",
        "Trim the title under 60 characters",
      ),
      rule(
        TITLE_NO_EMOJI,
        10.0,
        "+5% CTR",
        3,
        "€100/mo",
        "Emojis catch the eye in mobile feeds",
        "Add one or two relevant emojis",
      ),
      rule(
        TITLE_NO_DIGITS,
        8.0,
        "+3% CTR",
        3,
        "€70/mo",
        "Numbers stand out in thumbnails",
        "Work a concrete figure into the title",
      ),
      rule(
        DESCRIPTION_NO_CTA,
        8.0,
        "+4% subscribers",
        2,
        "€80/mo",
        "Viewers act when asked",
        "Ask viewers to subscribe or comment",
      ),
      rule(
        DESCRIPTION_NO_QUESTION,
        6.0,
        "+2% engagement",
        2,
        "€50/mo",
        "Questions invite comments",
        "Close the description with a question",
      ),
    ])
  }
}
