//! Onboarding data models — employee and task records plus render-time
//! derivations.
//!
//! Records are owned by the external backend; the dashboard only holds the
//! derived `EmployeeRow` copies, replaced wholesale on every feed emission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier as delivered by the upstream system.
///
/// Upstream is not consistently typed: the same record can show up with a
/// numeric id in one payload and a string id in another. The raw form is
/// kept as-is; all lookups go through [`RecordId::same_record`], which
/// compares canonical string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(i64),
    Text(String),
}

impl RecordId {
    /// Canonical string form used for comparisons and map keys.
    pub fn key(&self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Identity comparison across the number/string divide: `1` matches `"1"`.
    pub fn same_record(&self, other: &RecordId) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Raw completion percentage — the backend sends numbers and strings
/// interchangeably (`75.456`, `"50"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionPct {
    Num(f64),
    Text(String),
}

impl CompletionPct {
    /// Numeric value of the raw percentage. Unparseable strings resolve to
    /// `0.0` so a bad record renders as an empty bar instead of poisoning
    /// the aggregate.
    pub fn value(&self) -> f64 {
        match self {
            Self::Num(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or_else(|_| {
                warn!(raw = %s, "Unparseable completion percentage, treating as 0");
                0.0
            }),
        }
    }
}

/// Status of an onboarding task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// A single onboarding task attached to an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier — the key for the mark-completed operation.
    pub id: RecordId,
    /// Display title.
    pub title: String,
    /// Due date, if the backend set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Current status.
    #[serde(default)]
    pub status: TaskStatus,
}

/// An employee record as emitted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee identifier.
    pub emp_id: RecordId,
    /// Display name.
    pub name: String,
    /// Department, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Raw completion percentage. Absent means nothing tracked yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_pct: Option<CompletionPct>,
    /// Associated onboarding tasks.
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// Round to two decimals, half away from zero.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Render-time view of an [`Employee`] with the two derived display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    #[serde(flatten)]
    pub employee: Employee,
    /// Completion percentage rounded to two decimals.
    pub completion_display: f64,
    /// Inline CSS for the proportional progress bar.
    pub progress_style: String,
}

impl EmployeeRow {
    /// Derive the display row from a raw record.
    pub fn from_employee(employee: Employee) -> Self {
        let raw = employee
            .completion_pct
            .as_ref()
            .map(CompletionPct::value)
            .unwrap_or(0.0);
        let completion_display = round2(raw);
        let progress_style = format!(
            "width: {completion_display}%; height: 12px; background-color: #1589ee; border-radius: 4px;"
        );
        Self {
            employee,
            completion_display,
            progress_style,
        }
    }

    pub fn emp_id(&self) -> &RecordId {
        &self.employee.emp_id
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.employee.tasks
    }
}

/// Overall completion: mean of the displayed percentages, rounded to the
/// nearest whole number. Zero for an empty list.
pub fn overall_completion(rows: &[EmployeeRow]) -> i64 {
    if rows.is_empty() {
        return 0;
    }
    let sum: f64 = rows.iter().map(|r| r.completion_display).sum();
    (sum / rows.len() as f64).round() as i64
}
