pub mod content;
pub mod dashboard;
pub mod reviews;
pub mod sessions;
pub mod system;

pub use dashboard::LastSessionSummary;
