use chrono::Utc;
use tracing::{debug, info};

use crate::db::operations::{reviews, sessions};
use crate::db::Store;
use crate::error::{is_foreign_key_violation, ServiceError, ServiceResult};
use crate::models::WordReviewItem;

/// Append-only record of individual word reviews within sessions.
#[derive(Clone, Debug)]
pub struct ReviewLedger {
    store: Store,
}

impl ReviewLedger {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Appends one review stamped with the current time. The same word may be
    /// reviewed any number of times within a session.
    pub async fn record_review(
        &self,
        session_id: i64,
        word_id: i64,
        is_correct: bool,
    ) -> ServiceResult<WordReviewItem> {
        let pool = self.store.pool();
        let reviewed_at = Utc::now();

        let inserted =
            reviews::insert_review_for_open_session(pool, session_id, word_id, is_correct, reviewed_at)
                .await
                .map_err(|err| {
                    if is_foreign_key_violation(&err) {
                        ServiceError::not_found(format!("word {word_id}"))
                    } else {
                        ServiceError::Store(err)
                    }
                })?;

        let Some(id) = inserted else {
            return Err(match sessions::fetch_session_status(pool, session_id).await? {
                None => ServiceError::not_found(format!("study session {session_id}")),
                Some(status) => ServiceError::SessionNotInProgress {
                    id: session_id,
                    status,
                },
            });
        };

        info!(review_id = id, session_id, word_id, is_correct, "word review recorded");
        Ok(WordReviewItem {
            id,
            session_id,
            word_id,
            is_correct,
            reviewed_at,
        })
    }

    /// Reviews of one session, earliest first. Unknown sessions yield an empty list.
    pub async fn list_review_items(&self, session_id: i64) -> ServiceResult<Vec<WordReviewItem>> {
        let items = reviews::list_review_items(self.store.pool(), session_id).await?;
        debug!(session_id, count = items.len(), "listed review items");
        Ok(items)
    }
}
