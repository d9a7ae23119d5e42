use chrono::Utc;

use super::MeetingDb;
use crate::types::{CrmIntegration, CrmIntegrationPatch, InsertCrmIntegration};

impl MeetingDb {
    // =========================================================================
    // CRM integrations (simulated; no network)
    // =========================================================================

    pub fn get_crm_integrations(&self) -> Vec<CrmIntegration> {
        self.crm_integrations.values().cloned().collect()
    }

    pub fn get_crm_integration(&self, id: i64) -> Option<CrmIntegration> {
        self.crm_integrations.get(id).cloned()
    }

    /// Register an integration. It has never synced.
    pub fn create_crm_integration(&mut self, input: InsertCrmIntegration) -> CrmIntegration {
        let now = Utc::now();
        self.crm_integrations
            .insert_with(|id| CrmIntegration {
                id,
                name: input.name,
                crm_type: input.crm_type,
                status: input.status,
                config: input.config,
                last_sync: None,
                created_at: now,
            })
            .clone()
    }

    /// Insert a fully-formed row, bypassing defaults. The closure receives the new id.
    pub(crate) fn insert_crm_record(
        &mut self,
        build: impl FnOnce(i64) -> CrmIntegration,
    ) -> CrmIntegration {
        self.crm_integrations.insert_with(build).clone()
    }

    pub fn update_crm_integration(
        &mut self,
        id: i64,
        patch: CrmIntegrationPatch,
    ) -> Option<CrmIntegration> {
        let integration = self.crm_integrations.get_mut(id)?;
        patch.apply(integration);
        Some(integration.clone())
    }
}
