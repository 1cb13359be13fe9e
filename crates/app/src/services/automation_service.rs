//! Automation service — authoring and inspecting automations.

use fieldops_domain::automation::Automation;
use fieldops_domain::error::{FieldOpsError, NotFoundError};
use fieldops_domain::id::AutomationId;

use crate::ports::AutomationRepository;

/// Application service for storing and reading automations.
pub struct AutomationService<R> {
    repo: R,
}

impl<R: AutomationRepository> AutomationService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Store a new automation after validating domain invariants.
    ///
    /// Counters always start at zero, whatever the caller passed in.
    ///
    /// # Errors
    ///
    /// Returns [`FieldOpsError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, automation), fields(automation_name = %automation.name))]
    pub async fn create_automation(
        &self,
        mut automation: Automation,
    ) -> Result<Automation, FieldOpsError> {
        automation.validate()?;
        automation.sort_actions();
        automation.run_count = 0;
        automation.success_count = 0;
        automation.last_run_at = None;
        self.repo.create(automation).await
    }

    /// Look up an automation by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`FieldOpsError::NotFound`] when no automation with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_automation(&self, id: AutomationId) -> Result<Automation, FieldOpsError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Automation",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all automations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_automations(&self) -> Result<Vec<Automation>, FieldOpsError> {
        self.repo.get_all().await
    }
}
