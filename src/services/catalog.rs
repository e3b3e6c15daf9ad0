//! Minimal vocabulary catalog: enough to populate words, groups and activities
//! that sessions and reviews refer to.

use chrono::Utc;
use tracing::info;

use crate::db::operations::content;
use crate::db::Store;
use crate::error::{is_foreign_key_violation, ServiceError, ServiceResult};
use crate::models::{Group, NewWord, StudyActivity, Word};

#[derive(Clone, Debug)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_word(&self, word: &NewWord) -> ServiceResult<i64> {
        if word.japanese.trim().is_empty() {
            return Err(ServiceError::invalid_argument("word must have a japanese form"));
        }
        let parts = word.parts.to_json_string()?;
        let id = content::insert_word(self.store.pool(), word, &parts).await?;
        info!(word_id = id, japanese = %word.japanese, "word created");
        Ok(id)
    }

    pub async fn get_word(&self, id: i64) -> ServiceResult<Word> {
        content::fetch_word(self.store.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("word {id}")))
    }

    pub async fn create_group(&self, name: &str, description: &str) -> ServiceResult<i64> {
        if name.trim().is_empty() {
            return Err(ServiceError::invalid_argument("group name must not be empty"));
        }
        let id = content::insert_group(self.store.pool(), name, description).await?;
        info!(group_id = id, name, "group created");
        Ok(id)
    }

    pub async fn get_group(&self, id: i64) -> ServiceResult<Group> {
        content::fetch_group(self.store.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("group {id}")))
    }

    /// Adding an existing membership again is a no-op.
    pub async fn add_word_to_group(&self, word_id: i64, group_id: i64) -> ServiceResult<()> {
        content::insert_word_group(self.store.pool(), word_id, group_id)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    ServiceError::not_found(format!("word {word_id} or group {group_id}"))
                } else {
                    ServiceError::Store(err)
                }
            })?;
        info!(word_id, group_id, "word added to group");
        Ok(())
    }

    pub async fn group_word_ids(&self, group_id: i64) -> ServiceResult<Vec<i64>> {
        Ok(content::list_group_word_ids(self.store.pool(), group_id).await?)
    }

    pub async fn create_activity(&self, group_id: i64, activity_type: &str) -> ServiceResult<i64> {
        if activity_type.trim().is_empty() {
            return Err(ServiceError::invalid_argument("activity type must not be empty"));
        }
        let id = content::insert_activity(self.store.pool(), group_id, activity_type, Utc::now())
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    ServiceError::not_found(format!("group {group_id}"))
                } else {
                    ServiceError::Store(err)
                }
            })?;
        info!(activity_id = id, group_id, activity_type, "study activity created");
        Ok(id)
    }

    pub async fn get_activity(&self, id: i64) -> ServiceResult<StudyActivity> {
        content::fetch_activity(self.store.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("study activity {id}")))
    }
}
