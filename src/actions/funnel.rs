//! Bulk funnel placement.

use std::sync::Arc;

use async_trait::async_trait;

use super::BulkAction;
use crate::client::RecordClient;
use crate::error::{LensError, LensResult};
use crate::model::ObjectRecord;

/// Places every selected record into one funnel step with a shared sub-status
pub struct AddToFunnelAction<C: RecordClient> {
    client: Arc<C>,
    step_id: String,
    sub_status: i32,
}

impl<C: RecordClient> AddToFunnelAction<C> {
    pub fn new(client: Arc<C>, step_id: impl Into<String>, sub_status: i32) -> Self {
        Self {
            client,
            step_id: step_id.into(),
            sub_status,
        }
    }
}

#[async_trait]
impl<C: RecordClient + 'static> BulkAction for AddToFunnelAction<C> {
    fn id(&self) -> &str {
        "add-to-funnel"
    }

    fn label(&self) -> &str {
        "Add to Funnel"
    }

    fn validate(&self, records: &[ObjectRecord]) -> LensResult<()> {
        if records.is_empty() {
            return Err(LensError::Validation("no records selected".to_string()));
        }
        if self.step_id.is_empty() {
            return Err(LensError::Validation("no funnel step chosen".to_string()));
        }
        Ok(())
    }

    async fn apply(&self, record: &ObjectRecord) -> LensResult<()> {
        self.client
            .place_in_funnel(&record.id, &self.step_id, self.sub_status)
            .await
    }
}
