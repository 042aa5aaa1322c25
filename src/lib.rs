pub mod aggregator;
pub mod audit;
pub mod catalog;
pub mod evaluator;
pub mod filter;
pub mod providers;
pub mod report;

pub use aggregator::{aggregate, ChannelReport, HealthScorePolicy};
pub use audit::{audit_channel, AuditConfig};
pub use catalog::{GapRule, RuleCatalog};
pub use evaluator::{evaluate, EvaluatorConfig, VideoDetail};
