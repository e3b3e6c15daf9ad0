//! Study session lifecycle: creation, the guarded close transitions, and lookups.

use chrono::Utc;
use tracing::{debug, info};

use crate::db::operations::sessions;
use crate::db::Store;
use crate::error::{is_foreign_key_violation, ServiceError, ServiceResult};
use crate::models::{SessionStatus, SessionUpdate, StudySession};
use crate::pagination::{PageRequest, Paginated};

#[derive(Clone, Debug)]
pub struct SessionService {
    store: Store,
}

impl SessionService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Starts a session for `activity_id` and returns its id.
    pub async fn create_session(&self, activity_id: i64) -> ServiceResult<i64> {
        let id = sessions::insert_session(self.store.pool(), activity_id, Utc::now())
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    ServiceError::not_found(format!("study activity {activity_id}"))
                } else {
                    ServiceError::Store(err)
                }
            })?;
        info!(session_id = id, activity_id, "study session started");
        Ok(id)
    }

    pub async fn get_session(&self, id: i64) -> ServiceResult<StudySession> {
        sessions::fetch_session(self.store.pool(), id)
            .await?
            .ok_or_else(|| session_not_found(id))
    }

    /// Newest first, with the total row count.
    pub async fn list_sessions(
        &self,
        offset: i64,
        limit: i64,
    ) -> ServiceResult<(Vec<StudySession>, i64)> {
        if offset < 0 || limit < 0 {
            return Err(ServiceError::invalid_argument(
                "offset and limit must not be negative",
            ));
        }
        let pool = self.store.pool();
        let (items, total) = tokio::try_join!(
            sessions::list_sessions(pool, limit, offset),
            sessions::count_sessions(pool),
        )?;
        debug!(offset, limit, returned = items.len(), total, "listed study sessions");
        Ok((items, total))
    }

    pub async fn list_sessions_page(&self, page: i64) -> ServiceResult<Paginated<StudySession>> {
        let request = PageRequest::new(page);
        let (items, total) = self.list_sessions(request.offset(), request.limit()).await?;
        Ok(Paginated::from_page(items, request, total))
    }

    pub async fn list_activity_sessions(&self, activity_id: i64) -> ServiceResult<Vec<StudySession>> {
        Ok(sessions::list_activity_sessions(self.store.pool(), activity_id).await?)
    }

    /// Low-level overwrite of end time, score and status.
    ///
    /// The stored session must still be in progress and the new values must
    /// keep `completed` paired with an end time and a score.
    pub async fn update_session(&self, update: &SessionUpdate) -> ServiceResult<()> {
        let closed = update.end_time.is_some() && update.score.is_some();
        let consistent = match update.status {
            SessionStatus::Completed => closed,
            SessionStatus::InProgress | SessionStatus::Abandoned => {
                update.end_time.is_none() && update.score.is_none()
            }
        };
        if !consistent {
            return Err(ServiceError::invalid_argument(format!(
                "status {} requires end_time and score to be {}",
                update.status,
                if update.status == SessionStatus::Completed {
                    "set"
                } else {
                    "empty"
                }
            )));
        }
        if let Some(score) = update.score {
            validate_score(score)?;
        }

        self.apply_to_open_session(update).await?;
        info!(session_id = update.id, status = %update.status, "study session updated");
        Ok(())
    }

    /// Completes an in-progress session with `score`, stamping the end time now.
    pub async fn end_session(&self, id: i64, score: f64) -> ServiceResult<()> {
        validate_score(score)?;
        let update = SessionUpdate {
            id,
            end_time: Some(Utc::now()),
            score: Some(score),
            status: SessionStatus::Completed,
        };
        self.apply_to_open_session(&update).await?;
        info!(session_id = id, score, "study session completed");
        Ok(())
    }

    /// Gives up on an in-progress session. No end time or score is recorded.
    pub async fn abandon_session(&self, id: i64) -> ServiceResult<()> {
        let update = SessionUpdate {
            id,
            end_time: None,
            score: None,
            status: SessionStatus::Abandoned,
        };
        self.apply_to_open_session(&update).await?;
        info!(session_id = id, "study session abandoned");
        Ok(())
    }

    /// One guarded write that matches only while the stored status is in progress.
    async fn apply_to_open_session(&self, update: &SessionUpdate) -> ServiceResult<()> {
        let pool = self.store.pool();
        let affected = sessions::update_open_session(pool, update).await?;
        if affected > 0 {
            return Ok(());
        }

        // Nothing matched: either the id is unknown or the session is already closed.
        match sessions::fetch_session_status(pool, update.id).await? {
            None => Err(session_not_found(update.id)),
            Some(current) => {
                current.transition_to(update.status)?;
                Err(ServiceError::InvalidTransition {
                    from: current,
                    to: update.status,
                })
            }
        }
    }
}

fn validate_score(score: f64) -> ServiceResult<()> {
    if !score.is_finite() {
        return Err(ServiceError::invalid_argument("score must be a finite number"));
    }
    Ok(())
}

fn session_not_found(id: i64) -> ServiceError {
    ServiceError::not_found(format!("study session {id}"))
}
