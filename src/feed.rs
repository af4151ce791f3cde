//! Onboarding data feed — the subscribe/refresh primitive over the backend.
//!
//! Subscribers get a stream of emissions, each a full success payload or a
//! failure. `refresh` re-issues the query, broadcasts the emission, and also
//! returns it so the caller can apply it before its next sequential step.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::model::Employee;
use crate::service::OnboardingService;

/// One emission of the onboarding data source.
#[derive(Debug, Clone)]
pub struct FeedEvent {
    pub employees: Result<Vec<Employee>, ServiceError>,
}

/// Refreshable subscription over [`OnboardingService::get_onboarding_data`].
pub struct OnboardingFeed {
    service: Arc<dyn OnboardingService>,
    tx: broadcast::Sender<FeedEvent>,
}

impl OnboardingFeed {
    pub fn new(service: Arc<dyn OnboardingService>, capacity: usize) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(capacity);
        Arc::new(Self { service, tx })
    }

    /// Subscribe to emissions. Each UI client calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    /// Re-issue the query and broadcast the resulting emission.
    ///
    /// No retry: a failed fetch is an error emission, nothing more.
    pub async fn refresh(&self) -> FeedEvent {
        let employees = self.service.get_onboarding_data().await;
        match &employees {
            Ok(list) => debug!(count = list.len(), "Feed refreshed"),
            Err(e) => warn!(error = %e, "Feed refresh failed"),
        }
        let event = FeedEvent { employees };
        // Broadcast — ok if no receivers are listening yet
        let _ = self.tx.send(event.clone());
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use crate::error::{ErrorBody, ServiceError};
    use crate::model::{CompletionPct, Employee, RecordId};

    struct ScriptedService {
        fail: RwLock<bool>,
    }

    #[async_trait]
    impl OnboardingService for ScriptedService {
        async fn get_onboarding_data(&self) -> Result<Vec<Employee>, ServiceError> {
            if *self.fail.read().await {
                return Err(ServiceError::Api {
                    body: ErrorBody {
                        message: "feed is down".into(),
                        code: None,
                    },
                });
            }
            Ok(vec![Employee {
                emp_id: RecordId::Num(1),
                name: "Ada".into(),
                department: None,
                completion_pct: Some(CompletionPct::Num(10.0)),
                tasks: Vec::new(),
            }])
        }

        async fn onboard_employees_by_ids(&self, _ids: &[RecordId]) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn trigger_background_check(&self, _id: &RecordId) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn mark_task_completed(&self, _id: &RecordId) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn refresh_returns_and_broadcasts() {
        let service = Arc::new(ScriptedService {
            fail: RwLock::new(false),
        });
        let feed = OnboardingFeed::new(service, 16);
        let mut rx = feed.subscribe();

        let returned = feed.refresh().await;
        assert_eq!(returned.employees.as_ref().unwrap().len(), 1);

        let broadcast = rx.recv().await.unwrap();
        assert_eq!(broadcast.employees.unwrap()[0].name, "Ada");
    }

    #[tokio::test]
    async fn failure_is_an_error_emission() {
        let service = Arc::new(ScriptedService {
            fail: RwLock::new(true),
        });
        let feed = OnboardingFeed::new(service, 16);
        let mut rx = feed.subscribe();

        let returned = feed.refresh().await;
        assert_eq!(
            returned.employees.unwrap_err().user_message(),
            "feed is down"
        );

        let broadcast = rx.recv().await.unwrap();
        assert!(broadcast.employees.is_err());
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_emissions() {
        let service = Arc::new(ScriptedService {
            fail: RwLock::new(false),
        });
        let feed = OnboardingFeed::new(service, 16);

        feed.refresh().await;

        let mut rx = feed.subscribe();
        feed.refresh().await;
        // Exactly one emission waiting, not two.
        rx.recv().await.unwrap();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
