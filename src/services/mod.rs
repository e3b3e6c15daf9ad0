pub mod catalog;
pub mod review;
pub mod session;
pub mod statistics;
pub mod streak;
pub mod system;

pub use catalog::CatalogService;
pub use review::ReviewLedger;
pub use session::SessionService;
pub use statistics::{ProgressSummary, StatisticsService, StatsSummary};
pub use system::{HealthStatus, PruneReport, SystemHealth, SystemService, SystemStats};
