//! Navigation between the dashboard, mesocycle and session views.
//!
//! The [`Navigator`] owns three things:
//! - the dashboard load state (loading, failed, ready with a shared plan)
//! - the current [`View`], a tagged union carrying the selected ids
//! - the [`SessionTracker`] of the session view
//!
//! Transitions:
//!
//! | From                  | Action                 | To                    |
//! |-----------------------|------------------------|-----------------------|
//! | `Dashboard`           | `select_mesocycle(m)`  | `Mesocycle(m)`        |
//! | `Mesocycle(m)`        | `select_session(s)`    | `Session(m, s)`       |
//! | `Session(m, s)`       | `select_session(s2)`   | `Session(m, s2)`      |
//! | `Session(m, s)`       | `back()`               | `Mesocycle(m)`        |
//! | `Mesocycle(m)`        | `back()`               | `Dashboard`           |
//!
//! Leaving the session view closes the tracker, so completion flags never
//! outlive the view they were set in.

use crate::catalog::validate_session;
use crate::gateway::CatalogGateway;
use crate::overview::PlanOverview;
use crate::progress::{Progress, SessionTracker};
use crate::types::*;
use crate::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Receives human-readable messages about failed loads
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Notifier that writes to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Everything the inner views need, fetched once at the dashboard
#[derive(Clone, Debug)]
pub struct PlanSnapshot {
    pub plan: FullPlan,
    pub mesocycles: Vec<MesocycleDetail>,
    pub material: Vec<String>,
}

impl PlanSnapshot {
    /// Fetch the mesocycle list, material, plan header and every
    /// mesocycle's detail tree
    pub async fn fetch(gateway: &dyn CatalogGateway) -> Result<Self> {
        let list = gateway.list_mesocycles().await?;
        let material = gateway.get_basic_material().await?;
        let plan = gateway.get_full_plan().await?;

        let mut mesocycles = Vec::with_capacity(list.len());
        for m in &list {
            mesocycles.push(gateway.get_mesocycle_detail(m.id).await?);
        }

        Ok(Self {
            plan,
            mesocycles,
            material,
        })
    }

    pub fn mesocycle(&self, id: MesocycleId) -> Option<&MesocycleDetail> {
        self.mesocycles.iter().find(|d| d.mesocycle.id == id)
    }

    pub fn overview(&self) -> PlanOverview {
        PlanOverview::new(&self.plan, &self.mesocycles)
    }

    /// Data-quality findings; none of them prevent browsing
    ///
    /// Lookups by id resolve to the first match, so duplicate mesocycle or
    /// session ids hide entries and are reported here.
    pub fn data_quality(&self) -> Vec<String> {
        let mut findings = Vec::new();
        let mut mesocycle_ids = HashSet::new();
        let mut session_ids = HashSet::new();

        for detail in &self.mesocycles {
            let m = &detail.mesocycle;
            if !mesocycle_ids.insert(m.id) {
                findings.push(format!("Duplicate mesocycle id {}", m.id));
                continue;
            }
            if detail.weekly_blocks.len() as u32 != m.weeks {
                findings.push(format!(
                    "Mesocycle {} declares {} weeks but has {} weekly blocks",
                    m.id,
                    m.weeks,
                    detail.weekly_blocks.len()
                ));
            }
            for s in detail.sessions() {
                if !session_ids.insert(s.id) {
                    findings.push(format!("Duplicate session id {}", s.id));
                }
                findings.extend(validate_session(s));
            }
        }
        findings
    }
}

/// Dashboard-level load state
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    /// The last load failed; only a retry is valid
    Failed { message: String },
    Ready(Arc<PlanSnapshot>),
}

/// The view being shown, with its selections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Mesocycle {
        mesocycle: MesocycleId,
    },
    Session {
        mesocycle: MesocycleId,
        session: SessionId,
    },
}

/// Navigation controller
pub struct Navigator {
    load: LoadState,
    view: View,
    tracker: SessionTracker,
    notifier: Box<dyn Notifier>,
}

impl Navigator {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            load: LoadState::Idle,
            view: View::Dashboard,
            tracker: SessionTracker::new(),
            notifier,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn snapshot(&self) -> Option<&Arc<PlanSnapshot>> {
        match &self.load {
            LoadState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Initial catalog load
    ///
    /// Returns `Ok(true)` when the dashboard is populated, `Ok(false)` when
    /// the load failed (the state becomes `Failed` and one notification is
    /// emitted).
    pub async fn load(&mut self, gateway: &dyn CatalogGateway) -> Result<bool> {
        match self.load {
            LoadState::Idle => self.fetch(gateway).await,
            _ => Err(Error::InvalidTransition(format!(
                "load requested while {}",
                self.load_label()
            ))),
        }
    }

    /// Load again after a failure
    ///
    /// Only valid from `Failed`; in particular never while a load is in flight.
    pub async fn retry(&mut self, gateway: &dyn CatalogGateway) -> Result<bool> {
        match self.load {
            LoadState::Failed { .. } => self.fetch(gateway).await,
            _ => Err(Error::InvalidTransition(format!(
                "retry requested while {}",
                self.load_label()
            ))),
        }
    }

    async fn fetch(&mut self, gateway: &dyn CatalogGateway) -> Result<bool> {
        self.load = LoadState::Loading;
        self.view = View::Dashboard;
        self.tracker.close();
        tracing::debug!("Loading catalog");

        match PlanSnapshot::fetch(gateway).await {
            Ok(snapshot) => {
                for finding in snapshot.data_quality() {
                    tracing::warn!("Catalog data quality: {}", finding);
                }
                tracing::info!(
                    "Catalog loaded: {} mesocycles, {} material items",
                    snapshot.mesocycles.len(),
                    snapshot.material.len()
                );
                self.load = LoadState::Ready(Arc::new(snapshot));
                Ok(true)
            }
            Err(err) if err.is_gateway_failure() => {
                tracing::warn!("Catalog load failed: {}", err);
                let message = err.user_message();
                self.notifier.notify(&message);
                self.load = LoadState::Failed { message };
                Ok(false)
            }
            Err(err) => {
                self.load = LoadState::Failed {
                    message: err.user_message(),
                };
                Err(err)
            }
        }
    }

    fn load_label(&self) -> &'static str {
        match self.load {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Failed { .. } => "failed",
            LoadState::Ready(_) => "ready",
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Dashboard -> Mesocycle
    pub fn select_mesocycle(&mut self, id: MesocycleId) -> Result<()> {
        if self.view != View::Dashboard {
            return Err(Error::InvalidTransition(format!(
                "select_mesocycle from {:?}",
                self.view
            )));
        }
        let snapshot = self.ready_snapshot()?;
        if snapshot.mesocycle(id).is_none() {
            return Err(Error::NotFound {
                entity: "mesocycle",
                id,
            });
        }

        tracing::debug!("Dashboard -> Mesocycle({})", id);
        self.view = View::Mesocycle { mesocycle: id };
        Ok(())
    }

    /// Mesocycle -> Session, or Session -> another session of the same
    /// mesocycle
    ///
    /// Selecting the session already open keeps its progress.
    pub fn select_session(&mut self, id: SessionId) -> Result<()> {
        let mesocycle_id = match self.view {
            View::Mesocycle { mesocycle } | View::Session { mesocycle, .. } => mesocycle,
            View::Dashboard => {
                return Err(Error::InvalidTransition(
                    "select_session from Dashboard".into(),
                ))
            }
        };

        let snapshot = Arc::clone(self.ready_snapshot()?);
        let session = snapshot
            .mesocycle(mesocycle_id)
            .and_then(|d| d.session(id))
            .ok_or(Error::NotFound {
                entity: "session",
                id,
            })?;

        tracing::debug!("{:?} -> Session({})", self.view, id);
        self.tracker.open(session);
        self.view = View::Session {
            mesocycle: mesocycle_id,
            session: id,
        };
        Ok(())
    }

    /// Session -> owning Mesocycle, Mesocycle -> Dashboard
    pub fn back(&mut self) -> Result<()> {
        match self.view {
            View::Session { mesocycle, .. } => {
                tracing::debug!("Session -> Mesocycle({})", mesocycle);
                self.tracker.close();
                self.view = View::Mesocycle { mesocycle };
                Ok(())
            }
            View::Mesocycle { .. } => {
                tracing::debug!("Mesocycle -> Dashboard");
                self.view = View::Dashboard;
                Ok(())
            }
            View::Dashboard => Err(Error::InvalidTransition("back from Dashboard".into())),
        }
    }

    fn ready_snapshot(&self) -> Result<&Arc<PlanSnapshot>> {
        self.snapshot().ok_or_else(|| {
            Error::InvalidTransition(format!("catalog is {}", self.load_label()))
        })
    }

    // ========================================================================
    // Session progress
    // ========================================================================

    /// Toggle an exercise of the open session
    ///
    /// Returns the new completion flag. Toggling outside the session view or
    /// an exercise the session does not have is a programming error: it
    /// panics in debug builds and is ignored (returning `None`) otherwise.
    pub fn toggle_exercise(&mut self, exercise_id: ExerciseId) -> Option<bool> {
        let result = match self.view {
            View::Session { .. } => self.tracker.toggle(exercise_id),
            _ => Err(Error::InvariantViolation(format!(
                "toggle of exercise {} outside the session view",
                exercise_id
            ))),
        };

        match result {
            Ok(flag) => Some(flag),
            Err(err) => {
                tracing::error!("{}", err);
                if cfg!(debug_assertions) {
                    panic!("{}", err);
                }
                None
            }
        }
    }

    pub fn is_completed(&self, exercise_id: ExerciseId) -> bool {
        self.tracker.is_completed(exercise_id)
    }

    /// Progress of the open session, `None` outside the session view
    pub fn progress(&self) -> Option<Progress> {
        match self.view {
            View::Session { .. } => self.tracker.progress().ok(),
            _ => None,
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    // ========================================================================
    // View data
    // ========================================================================

    pub fn current_mesocycle(&self) -> Option<&MesocycleDetail> {
        let id = match self.view {
            View::Mesocycle { mesocycle } | View::Session { mesocycle, .. } => mesocycle,
            View::Dashboard => return None,
        };
        self.snapshot()?.mesocycle(id)
    }

    pub fn current_session(&self) -> Option<&Session> {
        match self.view {
            View::Session { session, .. } => self.current_mesocycle()?.session(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::gateway::StaticGateway;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every notification
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Notifier for Recorder {
        fn notify(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    /// Seed gateway whose mesocycle list fails a number of times first
    struct FlakyGateway {
        inner: StaticGateway,
        failures_left: AtomicUsize,
    }

    impl FlakyGateway {
        fn failing(times: usize) -> Self {
            Self {
                inner: StaticGateway::seeded(),
                failures_left: AtomicUsize::new(times),
            }
        }
    }

    #[async_trait]
    impl CatalogGateway for FlakyGateway {
        async fn list_mesocycles(&self) -> Result<Vec<Mesocycle>> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(TransportError::Unavailable("connection refused".into()).into());
            }
            self.inner.list_mesocycles().await
        }

        async fn get_mesocycle(&self, id: MesocycleId) -> Result<Mesocycle> {
            self.inner.get_mesocycle(id).await
        }

        async fn get_mesocycle_detail(&self, id: MesocycleId) -> Result<MesocycleDetail> {
            self.inner.get_mesocycle_detail(id).await
        }

        async fn list_sessions_of_mesocycle(&self, id: MesocycleId) -> Result<Vec<WeeklyBlock>> {
            self.inner.list_sessions_of_mesocycle(id).await
        }

        async fn get_full_plan(&self) -> Result<FullPlan> {
            self.inner.get_full_plan().await
        }

        async fn get_basic_material(&self) -> Result<Vec<String>> {
            self.inner.get_basic_material().await
        }

        async fn init_data(&self) -> Result<ServiceMessage> {
            self.inner.init_data().await
        }

        async fn health(&self) -> Result<ServiceMessage> {
            self.inner.health().await
        }
    }

    async fn loaded() -> Navigator {
        crate::logging::init_test();
        let mut nav = Navigator::new(Box::new(LogNotifier));
        assert!(nav.load(&StaticGateway::seeded()).await.unwrap());
        nav
    }

    #[tokio::test]
    async fn test_initial_state_is_idle_dashboard() {
        let nav = Navigator::new(Box::new(LogNotifier));
        assert_eq!(nav.view(), View::Dashboard);
        assert!(matches!(nav.load_state(), LoadState::Idle));
        assert!(nav.snapshot().is_none());
        assert!(nav.progress().is_none());
    }

    #[tokio::test]
    async fn test_load_populates_dashboard() {
        let nav = loaded().await;
        let snapshot = nav.snapshot().unwrap();
        assert_eq!(snapshot.mesocycles.len(), 5);
        assert_eq!(snapshot.material.len(), 10);
        assert_eq!(snapshot.overview().scheduled_sessions, 60);
    }

    #[tokio::test]
    async fn test_back_chain_from_session_to_dashboard() {
        let mut nav = loaded().await;
        let mut seen = vec![nav.view()];

        nav.select_mesocycle(1).unwrap();
        seen.push(nav.view());
        nav.select_session(1).unwrap();
        seen.push(nav.view());
        nav.back().unwrap();
        seen.push(nav.view());
        nav.back().unwrap();
        seen.push(nav.view());

        assert_eq!(
            seen,
            vec![
                View::Dashboard,
                View::Mesocycle { mesocycle: 1 },
                View::Session {
                    mesocycle: 1,
                    session: 1
                },
                View::Mesocycle { mesocycle: 1 },
                View::Dashboard,
            ]
        );
        assert!(nav.current_mesocycle().is_none());
        assert!(nav.current_session().is_none());
    }

    #[tokio::test]
    async fn test_mesocycle_round_trip_leaks_nothing() {
        let mut nav = loaded().await;
        nav.select_mesocycle(3).unwrap();
        assert_eq!(nav.current_mesocycle().unwrap().mesocycle.id, 3);

        nav.back().unwrap();
        assert_eq!(nav.view(), View::Dashboard);
        assert!(nav.current_mesocycle().is_none());
        assert_eq!(nav.tracker().active_session_id(), None);
    }

    #[tokio::test]
    async fn test_back_from_session_keeps_mesocycle() {
        let mut nav = loaded().await;
        nav.select_mesocycle(1).unwrap();
        nav.select_session(5).unwrap();
        assert_eq!(nav.current_session().unwrap().name, "Agilidad y coordinación");

        nav.back().unwrap();
        assert_eq!(nav.view(), View::Mesocycle { mesocycle: 1 });
        assert_eq!(nav.current_mesocycle().unwrap().mesocycle.id, 1);
    }

    #[tokio::test]
    async fn test_leaving_session_view_discards_progress() {
        let mut nav = loaded().await;
        nav.select_mesocycle(1).unwrap();
        nav.select_session(1).unwrap();
        nav.toggle_exercise(1);
        nav.toggle_exercise(2);

        nav.back().unwrap();
        assert!(nav.progress().is_none());

        nav.select_session(1).unwrap();
        assert_eq!(nav.progress().unwrap().completed, 0);
    }

    #[tokio::test]
    async fn test_reselecting_same_session_keeps_progress() {
        let mut nav = loaded().await;
        nav.select_mesocycle(1).unwrap();
        nav.select_session(1).unwrap();
        assert_eq!(nav.toggle_exercise(4), Some(true));

        nav.select_session(1).unwrap();
        assert!(nav.is_completed(4));
        assert_eq!(nav.progress().unwrap().completed, 1);
    }

    #[tokio::test]
    async fn test_selecting_other_session_resets_progress() {
        let mut nav = loaded().await;
        nav.select_mesocycle(1).unwrap();
        nav.select_session(1).unwrap();
        nav.toggle_exercise(1);
        nav.toggle_exercise(2);

        nav.select_session(2).unwrap();
        assert_eq!(
            nav.view(),
            View::Session {
                mesocycle: 1,
                session: 2
            }
        );
        let progress = nav.progress().unwrap();
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.total, 6);
        assert!(!nav.is_completed(1));
    }

    #[tokio::test]
    async fn test_full_session_completion() {
        let mut nav = loaded().await;
        nav.select_mesocycle(1).unwrap();
        nav.select_session(1).unwrap();
        for id in 1..=6 {
            assert_eq!(nav.toggle_exercise(id), Some(true));
        }

        let progress = nav.progress().unwrap();
        assert_eq!((progress.completed, progress.total), (6, 6));
        assert_eq!(progress.ratio, 1.0);
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let mut nav = loaded().await;
        assert!(matches!(nav.back(), Err(Error::InvalidTransition(_))));
        assert!(matches!(
            nav.select_session(1),
            Err(Error::InvalidTransition(_))
        ));

        nav.select_mesocycle(2).unwrap();
        assert!(matches!(
            nav.select_mesocycle(3),
            Err(Error::InvalidTransition(_))
        ));
        assert_eq!(nav.view(), View::Mesocycle { mesocycle: 2 });
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let mut nav = loaded().await;
        assert!(matches!(
            nav.select_mesocycle(9),
            Err(Error::NotFound { entity: "mesocycle", id: 9 })
        ));

        // Session 1 belongs to mesocycle 1, not 2
        nav.select_mesocycle(2).unwrap();
        assert!(matches!(
            nav.select_session(1),
            Err(Error::NotFound { entity: "session", id: 1 })
        ));
        assert_eq!(nav.view(), View::Mesocycle { mesocycle: 2 });
    }

    #[tokio::test]
    async fn test_selection_requires_loaded_catalog() {
        let mut nav = Navigator::new(Box::new(LogNotifier));
        assert!(matches!(
            nav.select_mesocycle(1),
            Err(Error::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_then_retry() {
        let recorder = Recorder::default();
        let mut nav = Navigator::new(Box::new(recorder.clone()));
        let gateway = FlakyGateway::failing(1);

        assert!(!nav.load(&gateway).await.unwrap());
        match nav.load_state() {
            LoadState::Failed { message } => {
                assert_eq!(message, crate::error::LOAD_FAILED_MESSAGE)
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(recorder.0.borrow().len(), 1);

        // Only retry is valid from Failed
        assert!(matches!(
            nav.load(&gateway).await,
            Err(Error::InvalidTransition(_))
        ));
        assert!(matches!(
            nav.select_mesocycle(1),
            Err(Error::InvalidTransition(_))
        ));

        assert!(nav.retry(&gateway).await.unwrap());
        assert_eq!(nav.snapshot().unwrap().mesocycles.len(), 5);
        assert_eq!(nav.view(), View::Dashboard);
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_each_failed_attempt_notifies_once() {
        let recorder = Recorder::default();
        let mut nav = Navigator::new(Box::new(recorder.clone()));
        let gateway = FlakyGateway::failing(2);

        assert!(!nav.load(&gateway).await.unwrap());
        assert!(!nav.retry(&gateway).await.unwrap());
        assert!(nav.retry(&gateway).await.unwrap());
        assert_eq!(recorder.0.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_retry_not_allowed_when_ready() {
        let mut nav = loaded().await;
        assert!(matches!(
            nav.retry(&StaticGateway::seeded()).await,
            Err(Error::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_with_unknown_exercise_is_ignored_in_release() {
        let mut nav = loaded().await;
        nav.select_mesocycle(1).unwrap();
        nav.select_session(6).unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            nav.toggle_exercise(6)
        }));

        if cfg!(debug_assertions) {
            assert!(outcome.is_err());
        } else {
            assert_eq!(outcome.unwrap(), None);
        }
        assert_eq!(nav.progress().unwrap().completed, 0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_reported() {
        let mut catalog = crate::catalog::get_default_catalog().clone();
        let first = catalog.plan.mesocycles[0].clone();
        catalog.plan.mesocycles.push(first);

        let mut block = catalog.plan.weekly_blocks[0].clone();
        block.id = 99;
        block.mesocycle_id = 2;
        block.sessions.truncate(1);
        catalog.plan.weekly_blocks.push(block);

        let mut nav = Navigator::new(Box::new(LogNotifier));
        assert!(nav.load(&StaticGateway::new(catalog)).await.unwrap());

        let findings = nav.snapshot().unwrap().data_quality();
        let duplicates: Vec<_> = findings
            .iter()
            .filter(|f| f.starts_with("Duplicate"))
            .collect();
        assert_eq!(
            duplicates,
            vec!["Duplicate session id 1", "Duplicate mesocycle id 1"]
        );
    }

    #[tokio::test]
    async fn test_snapshot_data_quality_matches_seed() {
        let nav = loaded().await;
        let findings = nav.snapshot().unwrap().data_quality();
        assert_eq!(findings.len(), 5);
    }
}
