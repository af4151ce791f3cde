//! Dashboard controller — coordinates the data feed, the backend actions,
//! and toast notifications.
//!
//! Every action handler runs the same sequential chain: claim the action
//! token, invoke the backend, refresh the feed and apply the emission, toast
//! the outcome, release the token last. Failures surface as a single
//! error-severity toast and are never re-thrown.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::ActionError;
use crate::feed::{FeedEvent, OnboardingFeed};
use crate::model::{EmployeeRow, RecordId, TaskRecord};
use crate::notify::Notifier;
use crate::service::OnboardingService;

use super::state::{ActionKind, DashboardState};

/// Row action name the task table emits for its single custom action.
pub const ROW_ACTION_MARK_COMPLETED: &str = "mark_completed";

pub struct Dashboard {
    service: Arc<dyn OnboardingService>,
    feed: Arc<OnboardingFeed>,
    notifier: Notifier,
    config: DashboardConfig,
    state: RwLock<DashboardState>,
}

impl Dashboard {
    pub fn new(
        service: Arc<dyn OnboardingService>,
        feed: Arc<OnboardingFeed>,
        notifier: Notifier,
        config: DashboardConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            service,
            feed,
            notifier,
            config,
            state: RwLock::new(DashboardState::default()),
        })
    }

    /// Current view state, cloned for WS/REST sync.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Apply one feed emission: replace the employee list and aggregates on
    /// success, toast the extracted message on failure. The action token is
    /// cleared on both paths.
    pub async fn apply_emission(&self, event: FeedEvent) {
        match event.employees {
            Ok(data) => {
                let rows: Vec<EmployeeRow> =
                    data.into_iter().map(EmployeeRow::from_employee).collect();
                let mut state = self.state.write().await;
                state.apply_rows(rows);
                state.action.clear();
            }
            Err(e) => {
                self.notifier.error("Error", e.user_message());
                self.state.write().await.action.clear();
            }
        }
    }

    /// Initial load — the subscription's first emission.
    pub async fn load(&self) {
        let event = self.feed.refresh().await;
        self.apply_emission(event).await;
    }

    /// Refresh on demand (UI pull-to-refresh).
    pub async fn reload(&self) {
        self.load().await;
    }

    /// Onboard the first N employees in current list order.
    pub async fn handle_bulk_onboard(&self) {
        let ids: Vec<RecordId> = {
            let state = self.state.read().await;
            state
                .employees
                .iter()
                .take(self.config.bulk_onboard_limit)
                .map(|r| r.emp_id().clone())
                .collect()
        };

        if ids.is_empty() {
            self.notifier.info("Info", "No employees to onboard");
            return;
        }

        if !self.begin(ActionKind::BulkOnboard).await {
            return;
        }

        match self.service.onboard_employees_by_ids(&ids).await {
            Ok(()) => {
                let event = self.feed.refresh().await;
                self.apply_emission(event).await;
                self.notifier.success("Success", "Bulk onboard started");
            }
            Err(e) => self.notifier.error("Error", e.user_message()),
        }

        self.finish(ActionKind::BulkOnboard).await;
    }

    /// Trigger a background check for one employee and re-resolve the
    /// selection from the refreshed list.
    pub async fn handle_trigger_background_check(&self, emp_id: &RecordId) {
        // Select now, with task detail cleared until fresh data lands.
        self.state.write().await.select_pending_refresh(emp_id);

        if !self.begin(ActionKind::BackgroundCheck).await {
            return;
        }

        match self.service.trigger_background_check(emp_id).await {
            Ok(()) => {
                let event = self.feed.refresh().await;
                self.apply_emission(event).await;
                {
                    // Ids may have changed type across the refresh; the
                    // string-coerced lookup still finds the employee.
                    let mut state = self.state.write().await;
                    let row = state.find_row(emp_id).cloned();
                    state.selected = row;
                }
                self.notifier.success("Success", "Background check triggered");
            }
            Err(e) => self.notifier.error("Error", e.user_message()),
        }

        self.finish(ActionKind::BackgroundCheck).await;
    }

    /// Show an employee's task detail. Synchronous: no backend call, no
    /// action token.
    pub async fn handle_show_tasks(&self, emp_id: &RecordId) {
        self.state.write().await.select_with_tasks(emp_id);
    }

    /// Handle a task-table row action. Only `mark_completed` is wired;
    /// anything else is ignored.
    pub async fn handle_row_action(&self, action: &str, task: &TaskRecord) {
        if action != ROW_ACTION_MARK_COMPLETED {
            debug!(action, task_id = %task.id, "Ignoring unknown row action");
            return;
        }

        if !self.begin(ActionKind::CompleteTask).await {
            return;
        }

        match self.service.mark_task_completed(&task.id).await {
            Ok(()) => {
                let event = self.feed.refresh().await;
                self.apply_emission(event).await;
                self.notifier.success("Success", "Task marked completed");
            }
            Err(e) => self.notifier.error("Error", e.user_message()),
        }

        self.finish(ActionKind::CompleteTask).await;
    }

    async fn begin(&self, kind: ActionKind) -> bool {
        let claim = self.state.write().await.action.begin(kind);
        match claim {
            Ok(()) => true,
            Err(ActionError::AlreadyPending { kind: current }) => {
                self.notifier
                    .info("Info", format!("Please wait, {current} is still running"));
                false
            }
            Err(e) => {
                self.notifier.error("Error", e.user_message());
                false
            }
        }
    }

    async fn finish(&self, kind: ActionKind) {
        self.state.write().await.action.finish(kind);
    }
}

/// Spawn a background task that reloads the dashboard on a fixed interval.
pub fn spawn_auto_refresh(
    dashboard: Arc<Dashboard>,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tracing::info!(interval_secs = every.as_secs(), "Periodic refresh enabled");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick fires immediately; callers already did the initial load.
        interval.tick().await;
        loop {
            interval.tick().await;
            dashboard.reload().await;
        }
    })
}
