//! Dashboard view state and the in-flight action token.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::model::{overall_completion, EmployeeRow, RecordId, TaskRecord};

/// The user-triggered operations that call the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    BulkOnboard,
    BackgroundCheck,
    CompleteTask,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BulkOnboard => "bulk_onboard",
            Self::BackgroundCheck => "background_check",
            Self::CompleteTask => "complete_task",
        };
        write!(f, "{s}")
    }
}

/// In-flight action token.
///
/// Replaces a plain busy boolean: the token is tagged with the action that
/// set it, so one action's terminal step cannot unset another action's
/// pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Idle,
    Pending(ActionKind),
}

impl Default for ActionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ActionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Claim the token. Fails if another action holds it.
    pub fn begin(&mut self, kind: ActionKind) -> Result<(), ActionError> {
        match self {
            Self::Idle => {
                *self = Self::Pending(kind);
                Ok(())
            }
            Self::Pending(current) => Err(ActionError::AlreadyPending { kind: *current }),
        }
    }

    /// Release the token, but only if `kind` still holds it.
    pub fn finish(&mut self, kind: ActionKind) {
        if *self == Self::Pending(kind) {
            *self = Self::Idle;
        }
    }

    /// Unconditional release — the subscription handler's clear.
    pub fn clear(&mut self) {
        *self = Self::Idle;
    }
}

/// Everything the view renders, cheap to snapshot for WS sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardState {
    pub employees: Vec<EmployeeRow>,
    pub total_employees: usize,
    pub overall_completion: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<EmployeeRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tasks: Option<Vec<TaskRecord>>,
    #[serde(default)]
    pub action: ActionState,
}

impl DashboardState {
    /// Replace the employee list wholesale and recompute the aggregates.
    /// The current selection is left alone; handlers that care re-resolve it.
    pub fn apply_rows(&mut self, rows: Vec<EmployeeRow>) {
        self.total_employees = rows.len();
        self.overall_completion = overall_completion(&rows);
        self.employees = rows;
    }

    /// Look up an employee by string-coerced identifier.
    pub fn find_row(&self, id: &RecordId) -> Option<&EmployeeRow> {
        self.employees.iter().find(|r| r.emp_id().same_record(id))
    }

    /// Select an employee and expose its task list (empty when it has none).
    pub fn select_with_tasks(&mut self, id: &RecordId) {
        match self.find_row(id).cloned() {
            Some(row) => {
                self.selected_tasks = Some(row.tasks().to_vec());
                self.selected = Some(row);
            }
            None => {
                self.selected = None;
                self.selected_tasks = None;
            }
        }
    }

    /// Select an employee while an action is in flight: task detail is
    /// cleared until fresh data lands.
    pub fn select_pending_refresh(&mut self, id: &RecordId) {
        self.selected = self.find_row(id).cloned();
        self.selected_tasks = None;
    }
}
