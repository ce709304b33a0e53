//! Bulk tag attachment.

use std::sync::Arc;

use async_trait::async_trait;

use super::BulkAction;
use crate::client::RecordClient;
use crate::error::{LensError, LensResult};
use crate::model::ObjectRecord;

/// Attaches one tag to every selected record, one request per record
pub struct AddTagAction<C: RecordClient> {
    client: Arc<C>,
    tag_id: String,
}

impl<C: RecordClient> AddTagAction<C> {
    pub fn new(client: Arc<C>, tag_id: impl Into<String>) -> Self {
        Self {
            client,
            tag_id: tag_id.into(),
        }
    }
}

#[async_trait]
impl<C: RecordClient + 'static> BulkAction for AddTagAction<C> {
    fn id(&self) -> &str {
        "add-tag"
    }

    fn label(&self) -> &str {
        "Add Tag"
    }

    fn validate(&self, records: &[ObjectRecord]) -> LensResult<()> {
        if records.is_empty() {
            return Err(LensError::Validation("no records selected".to_string()));
        }
        if self.tag_id.is_empty() {
            return Err(LensError::Validation("no tag chosen".to_string()));
        }
        Ok(())
    }

    async fn apply(&self, record: &ObjectRecord) -> LensResult<()> {
        self.client.attach_tag(&record.id, &self.tag_id).await
    }
}
