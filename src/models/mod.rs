pub mod content;
pub mod session;
pub mod state_machine;

pub use content::{Group, NewWord, PartValue, StudyActivity, Word, WordParts};
pub use session::{SessionUpdate, StudySession, WordReviewItem};
pub use state_machine::{SessionStatus, TransitionError};
