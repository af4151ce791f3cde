//! In-memory onboarding backend.
//!
//! A functioning stand-in for the external system: the demo binary and the
//! integration tests run against it. Completing a task recomputes the
//! employee's completion percentage from task state.

use chrono::{Duration, Utc};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::info;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::model::{CompletionPct, Employee, RecordId, TaskRecord, TaskStatus};
use crate::service::OnboardingService;

/// Title the backend gives the verification task it creates.
const BACKGROUND_CHECK_TASK: &str = "Background check";

pub struct InMemoryOnboarding {
    employees: RwLock<Vec<Employee>>,
    next_task_seq: RwLock<u32>,
}

impl InMemoryOnboarding {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: RwLock::new(employees),
            next_task_seq: RwLock::new(1000),
        }
    }

    /// Build a backend pre-loaded with a plausible onboarding cohort.
    pub fn seeded() -> Self {
        let mut rng = rand::thread_rng();
        let today = Utc::now().date_naive();

        let people: [(&str, &str, &[&str]); 6] = [
            ("Maya Lindqvist", "Engineering", &["Laptop setup", "Repo access", "Security training"]),
            ("Tom Okafor", "Engineering", &["Laptop setup", "Security training"]),
            ("Priya Raman", "Sales", &["CRM account", "Territory briefing"]),
            ("Jonas Weber", "Finance", &["Expense system", "Payroll forms", "Security training"]),
            ("Alice Ng", "People Ops", &["Badge photo"]),
            ("Sam Decker", "Support", &["Ticketing access", "Shadowing week"]),
        ];

        let mut employees = Vec::new();
        let mut task_seq = 0u32;
        for (i, (name, department, task_titles)) in people.iter().enumerate() {
            let tasks: Vec<TaskRecord> = task_titles
                .iter()
                .map(|title| {
                    task_seq += 1;
                    TaskRecord {
                        id: RecordId::Text(format!("task-{task_seq}")),
                        title: (*title).to_string(),
                        due_date: Some(today + Duration::days(rng.gen_range(3..21))),
                        status: if rng.gen_bool(0.3) {
                            TaskStatus::Completed
                        } else {
                            TaskStatus::Pending
                        },
                    }
                })
                .collect();

            let pct = completion_from_tasks(&tasks);
            // Upstream sends both id and percentage shapes; mirror that here.
            let (emp_id, completion_pct) = if i % 2 == 0 {
                (RecordId::Num(i as i64 + 1), CompletionPct::Num(pct))
            } else {
                (
                    RecordId::Text((i + 1).to_string()),
                    CompletionPct::Text(format!("{pct}")),
                )
            };

            employees.push(Employee {
                emp_id,
                name: (*name).to_string(),
                department: Some((*department).to_string()),
                completion_pct: Some(completion_pct),
                tasks,
            });
        }

        Self::new(employees)
    }
}

fn completion_from_tasks(tasks: &[TaskRecord]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    completed as f64 / tasks.len() as f64 * 100.0
}

#[async_trait]
impl OnboardingService for InMemoryOnboarding {
    async fn get_onboarding_data(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(self.employees.read().await.clone())
    }

    async fn onboard_employees_by_ids(&self, ids: &[RecordId]) -> Result<(), ServiceError> {
        let mut employees = self.employees.write().await;
        let mut started = 0;
        for employee in employees.iter_mut() {
            if ids.iter().any(|id| id.same_record(&employee.emp_id)) {
                for task in &mut employee.tasks {
                    if task.status == TaskStatus::Pending {
                        task.status = TaskStatus::InProgress;
                    }
                }
                started += 1;
            }
        }
        info!(requested = ids.len(), started, "Bulk onboard applied");
        Ok(())
    }

    async fn trigger_background_check(&self, employee_id: &RecordId) -> Result<(), ServiceError> {
        let mut employees = self.employees.write().await;
        let employee = employees
            .iter_mut()
            .find(|e| e.emp_id.same_record(employee_id))
            .ok_or_else(|| ServiceError::NotFound {
                entity: "employee".into(),
                id: employee_id.key(),
            })?;

        if let Some(task) = employee
            .tasks
            .iter_mut()
            .find(|t| t.title == BACKGROUND_CHECK_TASK)
        {
            task.status = TaskStatus::InProgress;
        } else {
            let seq = {
                let mut seq = self.next_task_seq.write().await;
                *seq += 1;
                *seq
            };
            employee.tasks.push(TaskRecord {
                id: RecordId::Text(format!("task-{seq}")),
                title: BACKGROUND_CHECK_TASK.to_string(),
                due_date: Some(Utc::now().date_naive() + Duration::days(7)),
                status: TaskStatus::InProgress,
            });
            employee.completion_pct =
                Some(CompletionPct::Num(completion_from_tasks(&employee.tasks)));
        }
        info!(employee_id = %employee_id, "Background check triggered");
        Ok(())
    }

    async fn mark_task_completed(&self, task_id: &RecordId) -> Result<(), ServiceError> {
        let mut employees = self.employees.write().await;
        for employee in employees.iter_mut() {
            if let Some(task) = employee
                .tasks
                .iter_mut()
                .find(|t| t.id.same_record(task_id))
            {
                task.status = TaskStatus::Completed;
                employee.completion_pct =
                    Some(CompletionPct::Num(completion_from_tasks(&employee.tasks)));
                info!(task_id = %task_id, employee = %employee.name, "Task completed");
                return Ok(());
            }
        }
        Err(ServiceError::NotFound {
            entity: "task".into(),
            id: task_id.key(),
        })
    }
}
