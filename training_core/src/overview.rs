//! Dashboard figures derived from a loaded plan.

use crate::types::{FullPlan, MesocycleDetail};

/// Headline numbers of the plan, as shown on the dashboard
#[derive(Clone, Debug, PartialEq)]
pub struct PlanOverview {
    pub title: String,
    pub category: String,
    pub duration_months: u32,
    pub mesocycles: usize,
    pub total_weeks: u32,
    pub sessions_per_week: u32,
    pub session_minutes: u32,
    /// Weeks times sessions per week
    pub scheduled_sessions: u32,
    pub total_hours: f64,
    /// Sessions with authored content in the catalog
    pub authored_sessions: usize,
    pub authored_exercises: usize,
}

impl PlanOverview {
    pub fn new(plan: &FullPlan, details: &[MesocycleDetail]) -> Self {
        // Figures come from the service; saturate rather than overflow
        let total_weeks = plan
            .mesocycles
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(m.weeks));
        let scheduled_sessions = total_weeks.saturating_mul(plan.sessions_per_week);
        let total_hours =
            f64::from(scheduled_sessions) * f64::from(plan.session_minutes) / 60.0;

        let authored_sessions = details.iter().map(|d| d.sessions().count()).sum();
        let authored_exercises = details
            .iter()
            .flat_map(|d| d.sessions())
            .map(|s| s.exercises.len())
            .sum();

        Self {
            title: plan.title.clone(),
            category: plan.category.clone(),
            duration_months: plan.duration_months,
            mesocycles: plan.mesocycles.len(),
            total_weeks,
            sessions_per_week: plan.sessions_per_week,
            session_minutes: plan.session_minutes,
            scheduled_sessions,
            total_hours,
            authored_sessions,
            authored_exercises,
        }
    }
}
