//! Core domain types for the training plan catalog.
//!
//! This module defines the read-only catalog as delivered by the catalog
//! service:
//! - Mesocycles (monthly training blocks)
//! - Weekly blocks, sessions and exercises
//! - Composite responses (mesocycle detail, full plan)
//!
//! Field names on the wire keep the service's Spanish vocabulary.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type MesocycleId = u32;
pub type WeeklyBlockId = u32;
pub type SessionId = u32;
/// Unique only within its session
pub type ExerciseId = u32;

// ============================================================================
// Catalog Entities
// ============================================================================

/// A monthly training block with a shared objective
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mesocycle {
    pub id: MesocycleId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "mes")]
    pub month_label: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "objetivo")]
    pub objective: String,
    #[serde(rename = "semanas")]
    pub weeks: u32,
    /// Opaque display hint (a CSS class in the reference web client)
    #[serde(rename = "color")]
    pub color_tag: String,
}

/// Kind of training session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionType {
    #[serde(rename = "Técnica")]
    Technical,
    #[serde(rename = "Física-Coordinativa")]
    PhysicalCoordinative,
    #[serde(rename = "Táctica-Juego")]
    TacticalPlay,
}

impl SessionType {
    /// Label as shown to the coach
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Technical => "Técnica",
            SessionType::PhysicalCoordinative => "Física-Coordinativa",
            SessionType::TacticalPlay => "Táctica-Juego",
        }
    }
}

/// The atomic unit of training
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "duracion")]
    pub duration_minutes: u32,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub material: String,
    #[serde(rename = "objetivo")]
    pub objective: String,
}

/// A single training appointment with an ordered list of exercises
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    #[serde(rename = "tipo")]
    pub kind: SessionType,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dia")]
    pub day_label: String,
    #[serde(rename = "duracion")]
    pub duration_minutes: u32,
    #[serde(rename = "imagen")]
    pub image_ref: String,
    #[serde(rename = "ejercicios")]
    pub exercises: Vec<Exercise>,
}

impl Session {
    /// Look up an exercise by its session-local id
    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Sum of the exercise durations (may differ from `duration_minutes`)
    pub fn exercise_minutes(&self) -> u32 {
        self.exercises.iter().map(|e| e.duration_minutes).sum()
    }
}

/// The sessions of one week of a mesocycle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyBlock {
    pub id: WeeklyBlockId,
    #[serde(rename = "mesociclo_id", alias = "mesocicloId")]
    pub mesocycle_id: MesocycleId,
    /// 1-based
    #[serde(rename = "semana")]
    pub week_number: u32,
    #[serde(rename = "sesiones")]
    pub sessions: Vec<Session>,
}

// ============================================================================
// Composite Responses
// ============================================================================

/// A mesocycle with its objectives and full session tree
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MesocycleDetail {
    #[serde(rename = "mesociclo")]
    pub mesocycle: Mesocycle,
    #[serde(rename = "objetivos", default)]
    pub objectives: Vec<String>,
    #[serde(rename = "sesiones_semanales")]
    pub weekly_blocks: Vec<WeeklyBlock>,
}

impl MesocycleDetail {
    /// Sessions of every week, in delivered order
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.weekly_blocks.iter().flat_map(|w| w.sessions.iter())
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions().find(|s| s.id == id)
    }
}

/// The complete plan header with its mesocycles
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FullPlan {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "duracion_meses")]
    pub duration_months: u32,
    #[serde(rename = "sesiones_por_semana")]
    pub sessions_per_week: u32,
    #[serde(rename = "duracion_sesion")]
    pub session_minutes: u32,
    #[serde(rename = "mesociclos")]
    pub mesocycles: Vec<Mesocycle>,
    #[serde(rename = "sesiones_semanales", default)]
    pub weekly_blocks: Vec<WeeklyBlock>,
    #[serde(rename = "material_basico", default)]
    pub basic_material: Vec<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// `/material-basico` body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialList {
    pub material: Vec<String>,
}

/// Body of the health check and `/init-data` acknowledgement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceMessage {
    pub message: String,
}

/// Objectives of each mesocycle, keyed by mesocycle id
pub type ObjectivesByMonth = BTreeMap<MesocycleId, Vec<String>>;

// ============================================================================
// Catalog Type
// ============================================================================

/// The whole read-only catalog held in memory
///
/// `plan.weekly_blocks` carries every weekly block of every mesocycle.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub plan: FullPlan,
    pub objectives: ObjectivesByMonth,
}
