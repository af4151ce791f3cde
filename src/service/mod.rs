//! Backend service abstraction.
//!
//! All real work — persistence, workflow rules, background-check
//! integration — lives behind this trait. The dashboard only invokes it and
//! re-renders from whatever comes back.

pub mod memory;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::model::{Employee, RecordId};

pub use memory::InMemoryOnboarding;

/// The remote operations the dashboard consumes.
#[async_trait]
pub trait OnboardingService: Send + Sync {
    /// Fetch the full onboarding dataset: employees with nested tasks and
    /// completion percentages.
    async fn get_onboarding_data(&self) -> Result<Vec<Employee>, ServiceError>;

    /// Start the onboarding workflow for the given employees.
    async fn onboard_employees_by_ids(&self, ids: &[RecordId]) -> Result<(), ServiceError>;

    /// Kick off an external background check for one employee.
    async fn trigger_background_check(&self, employee_id: &RecordId) -> Result<(), ServiceError>;

    /// Mark a single onboarding task as completed.
    async fn mark_task_completed(&self, task_id: &RecordId) -> Result<(), ServiceError>;
}
