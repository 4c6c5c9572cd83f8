//! Built-in seed catalog and catalog queries.
//!
//! This module provides the five-month Fútbol 7 plan for the Benjamines
//! category, the same data the catalog service seeds on `/init-data`.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Fixed id of the built-in plan so offline output is reproducible
const SEED_PLAN_ID: Uuid = Uuid::from_u128(0x5eed_f007_0000_4000_8000_0000_0000_0001);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn exercise(
    id: ExerciseId,
    name: &str,
    duration_minutes: u32,
    description: &str,
    material: &str,
    objective: &str,
) -> Exercise {
    Exercise {
        id,
        name: name.into(),
        duration_minutes,
        description: description.into(),
        material: material.into(),
        objective: objective.into(),
    }
}

fn session(
    id: SessionId,
    kind: SessionType,
    name: &str,
    day_label: &str,
    image_ref: &str,
    exercises: Vec<Exercise>,
) -> Session {
    Session {
        id,
        kind,
        name: name.into(),
        day_label: day_label.into(),
        duration_minutes: 90,
        image_ref: image_ref.into(),
        exercises,
    }
}

fn mesocycle(
    id: MesocycleId,
    name: &str,
    description: &str,
    color_tag: &str,
    objective: &str,
) -> Mesocycle {
    Mesocycle {
        id,
        name: name.into(),
        month_label: format!("Mes {}", id),
        description: description.into(),
        objective: objective.into(),
        weeks: 4,
        color_tag: color_tag.into(),
    }
}

#[rustfmt::skip]
fn build_default_catalog() -> Catalog {
    // ========================================================================
    // Mesocycles
    // ========================================================================

    let mesocycles = vec![
        mesocycle(
            1,
            "Adaptación y Familiarización",
            "Introducción al fútbol 7, familiarización con el balón y adaptación física básica",
            "bg-blue-500",
            "Crear una base sólida para el aprendizaje futuro",
        ),
        mesocycle(
            2,
            "Técnica Individual Básica",
            "Desarrollo de habilidades técnicas fundamentales: pase, recepción, conducción",
            "bg-green-500",
            "Dominar los fundamentos técnicos del fútbol",
        ),
        mesocycle(
            3,
            "Técnica Individual Avanzada",
            "Perfeccionamiento técnico y coordinación con balón",
            "bg-orange-500",
            "Mejorar la técnica individual y coordinación",
        ),
        mesocycle(
            4,
            "Técnica Colectiva y Táctica",
            "Introducción a conceptos tácticos básicos y juego colectivo",
            "bg-purple-500",
            "Desarrollar el juego en equipo y nociones tácticas",
        ),
        mesocycle(
            5,
            "Consolidación y Juego",
            "Consolidación de aprendizajes y aplicación en situaciones reales de juego",
            "bg-red-500",
            "Aplicar todos los conocimientos adquiridos",
        ),
    ];

    // ========================================================================
    // Week 1
    // ========================================================================

    let week_1 = WeeklyBlock {
        id: 1,
        mesocycle_id: 1,
        week_number: 1,
        sessions: vec![
            session(
                1,
                SessionType::Technical,
                "Familiarización con el balón",
                "Lunes",
                "https://images.unsplash.com/photo-1574242957680-7c8371ed191e",
                vec![
                    exercise(1, "Saludo y presentación", 10,
                        "Círculo de presentación, explicación de reglas básicas",
                        "Ninguno", "Crear ambiente de confianza y establecer normas"),
                    exercise(2, "Calentamiento dinámico", 15,
                        "Carrera suave, movilidad articular, estiramientos dinámicos",
                        "Conos, silbato", "Preparar el cuerpo para la actividad física"),
                    exercise(3, "Toque libre con el balón", 20,
                        "Cada jugador con su balón, exploración libre de toques",
                        "1 balón por jugador", "Familiarización inicial con el balón"),
                    exercise(4, "Conducción básica", 25,
                        "Conducción con ambos pies en línea recta y curvas",
                        "Balones, conos", "Desarrollar control básico del balón"),
                    exercise(5, "Juego libre", 15,
                        "Partido libre 4vs4 sin reglas complejas",
                        "Balones, porterías pequeñas", "Aplicar lo aprendido en situación de juego"),
                    exercise(6, "Vuelta a la calma", 5,
                        "Estiramientos suaves y reflexión del entrenamiento",
                        "Ninguno", "Relajación y evaluación positiva"),
                ],
            ),
            session(
                2,
                SessionType::PhysicalCoordinative,
                "Desarrollo coordinativo básico",
                "Miércoles",
                "https://images.unsplash.com/photo-1650897877790-0e171d2207dc",
                vec![
                    exercise(1, "Activación corporal", 10,
                        "Movimientos articulares y activación muscular",
                        "Ninguno", "Preparar el cuerpo para el ejercicio"),
                    exercise(2, "Circuito coordinativo", 25,
                        "Saltos, giros, desplazamientos laterales entre conos",
                        "Conos, aros, escalera de coordinación", "Desarrollar coordinación general"),
                    exercise(3, "Equilibrio y propiocepción", 15,
                        "Ejercicios de equilibrio estático y dinámico",
                        "Balones, superficies inestables", "Mejorar el equilibrio y propiocepción"),
                    exercise(4, "Velocidad de reacción", 20,
                        "Juegos de reacción a estímulos visuales y auditivos",
                        "Conos de colores, silbato", "Desarrollar velocidad de reacción"),
                    exercise(5, "Juego coordinativo", 15,
                        "Juegos que combinen coordinación y diversión",
                        "Balones, conos", "Aplicar coordinación en contexto lúdico"),
                    exercise(6, "Relajación", 5,
                        "Respiración y relajación muscular",
                        "Ninguno", "Vuelta a la calma progresiva"),
                ],
            ),
            session(
                3,
                SessionType::TacticalPlay,
                "Introducción al juego colectivo",
                "Viernes",
                "https://images.unsplash.com/photo-1573639615462-3a16eabd9390",
                vec![
                    exercise(1, "Calentamiento con balón", 15,
                        "Trote suave conduciendo el balón",
                        "1 balón por jugador", "Activación con familiarización del balón"),
                    exercise(2, "Pases por parejas", 20,
                        "Pases cortos estáticos, aumentando progresivamente la distancia",
                        "Balones", "Introducir el concepto de pase"),
                    exercise(3, "Juego de persecución", 15,
                        "El que la pica debe tocar con el balón controlado",
                        "Balones", "Combinar diversión con control del balón"),
                    exercise(4, "Partidillo 3vs3", 25,
                        "Partidos cortos con rotaciones, porterías pequeñas",
                        "Balones, porterías pequeñas, petos", "Aplicar conceptos básicos en situación real"),
                    exercise(5, "Tiros a portería", 10,
                        "Tiros libres desde diferentes posiciones",
                        "Balones, porterías", "Desarrollar la precisión en el tiro"),
                    exercise(6, "Charla final", 5,
                        "Comentarios positivos y despedida",
                        "Ninguno", "Refuerzo positivo y motivación"),
                ],
            ),
        ],
    };

    // ========================================================================
    // Week 2
    // ========================================================================

    let week_2 = WeeklyBlock {
        id: 2,
        mesocycle_id: 1,
        week_number: 2,
        sessions: vec![
            session(
                4,
                SessionType::Technical,
                "Dominio básico del balón",
                "Lunes",
                "https://images.unsplash.com/photo-1638027611065-7eb0b8cfd4fb",
                vec![
                    exercise(1, "Calentamiento dinámico", 15,
                        "Activación muscular con ejercicios variados",
                        "Conos", "Preparación física y mental"),
                    exercise(2, "Toques con diferentes partes del pie", 25,
                        "Interior, exterior, empeine, exploración de superficies",
                        "1 balón por jugador", "Conocer las diferentes formas de tocar el balón"),
                    exercise(3, "Malabares básicos", 20,
                        "Toques consecutivos con el pie, intentar 2-3 toques",
                        "Balones", "Desarrollar coordinación óculo-pédica"),
                    exercise(4, "Conducción con obstáculos", 20,
                        "Slalom simple entre conos a ritmo controlado",
                        "Balones, conos", "Mejorar control en movimiento"),
                    exercise(5, "Juego del espejo", 5,
                        "Por parejas, uno conduce y el otro imita",
                        "Balones", "Desarrollar creatividad y observación"),
                    exercise(6, "Estiramiento final", 5,
                        "Estiramientos estáticos principales grupos musculares",
                        "Ninguno", "Prevención de lesiones y relajación"),
                ],
            ),
            session(
                5,
                SessionType::PhysicalCoordinative,
                "Agilidad y coordinación",
                "Miércoles",
                "https://images.pexels.com/photos/2403029/pexels-photo-2403029.jpeg",
                vec![
                    exercise(1, "Entrada en calor", 10,
                        "Trote suave con cambios de dirección",
                        "Conos", "Activación cardiovascular"),
                    exercise(2, "Escalera de coordinación", 20,
                        "Diferentes patrones de pisada en escalera",
                        "Escalera de coordinación", "Mejorar coordinación de piernas"),
                    exercise(3, "Saltos coordinados", 15,
                        "Saltos con un pie, dos pies, laterales",
                        "Aros, conos", "Desarrollar potencia y coordinación"),
                    exercise(4, "Cambios de dirección", 20,
                        "Sprints cortos con cambios de dirección señalizados",
                        "Conos de colores", "Agilidad y velocidad de reacción"),
                    exercise(5, "Relevos coordinativos", 20,
                        "Competencia por equipos con ejercicios coordinativos",
                        "Conos, aros, balones", "Aplicar coordinación en contexto competitivo"),
                    exercise(6, "Vuelta a la calma", 5,
                        "Caminata suave y respiración profunda",
                        "Ninguno", "Recuperación progresiva"),
                ],
            ),
            session(
                6,
                SessionType::TacticalPlay,
                "Primeros conceptos de equipo",
                "Viernes",
                "https://images.pexels.com/photos/8028410/pexels-photo-8028410.jpeg",
                vec![
                    exercise(1, "Calentamiento con balón", 15,
                        "Conducción libre por el espacio evitando choques",
                        "Balones", "Activación con percepción espacial"),
                    exercise(2, "Pase y recepción", 25,
                        "Pases por parejas, enfatizar control y precisión",
                        "Balones", "Mejorar técnica de pase básico"),
                    exercise(3, "Juego de posesión", 20,
                        "4 jugadores dentro, 2 fuera intentan recuperar",
                        "Balones, conos para delimitar área", "Introducir concepto de posesión"),
                    exercise(4, "Partiditos reducidos", 25,
                        "Partidos 4vs4 con rotaciones cada 5 minutos",
                        "Balones, porterías pequeñas, petos", "Aplicar conceptos en situación real"),
                    exercise(5, "Evaluación positiva", 5,
                        "Comentarios individuales positivos sobre mejoras",
                        "Ninguno", "Refuerzo positivo y motivación"),
                ],
            ),
        ],
    };

    // ========================================================================
    // Objectives and material
    // ========================================================================

    let mut objectives = BTreeMap::new();
    for (id, items) in [
        (1, ["Familiarización con el balón", "Coordinación básica", "Diversión y participación"]),
        (2, ["Técnica individual", "Pase y recepción", "Control del balón"]),
        (3, ["Perfeccionamiento técnico", "Coordinación avanzada", "Creatividad"]),
        (4, ["Juego colectivo", "Conceptos tácticos básicos", "Competencia sana"]),
        (5, ["Consolidación", "Aplicación práctica", "Evaluación final"]),
    ] {
        objectives.insert(id, items.iter().map(|s| s.to_string()).collect());
    }

    let basic_material = [
        "Balones de fútbol (nº 3 o 4)",
        "Conos de diferentes colores",
        "Petos o camisetas de entrenamiento",
        "Porterías pequeñas (portátiles)",
        "Aros de coordinación",
        "Escalera de coordinación",
        "Silbato",
        "Cronómetro",
        "Bidones de agua",
        "Botiquín básico",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    Catalog {
        plan: FullPlan {
            id: SEED_PLAN_ID,
            title: "Entrenamiento Fútbol 7 - Benjamines".into(),
            description: "Planificación completa de entrenamiento para benjamines en fútbol 7"
                .into(),
            category: "Benjamines (8-10 años)".into(),
            duration_months: 5,
            sessions_per_week: 3,
            session_minutes: 90,
            mesocycles,
            weekly_blocks: vec![week_1, week_2],
            basic_material,
            created_at: None,
            updated_at: None,
        },
        objectives,
    }
}

impl Catalog {
    pub fn mesocycles(&self) -> &[Mesocycle] {
        &self.plan.mesocycles
    }

    /// Look up a mesocycle, failing with `NotFound` for unknown ids
    pub fn mesocycle(&self, id: MesocycleId) -> Result<&Mesocycle> {
        self.plan
            .mesocycles
            .iter()
            .find(|m| m.id == id)
            .ok_or(Error::NotFound {
                entity: "mesocycle",
                id,
            })
    }

    /// Weekly blocks of a mesocycle, ordered by week number
    pub fn weekly_blocks_of(&self, mesocycle_id: MesocycleId) -> Vec<WeeklyBlock> {
        let mut blocks: Vec<WeeklyBlock> = self
            .plan
            .weekly_blocks
            .iter()
            .filter(|w| w.mesocycle_id == mesocycle_id)
            .cloned()
            .collect();
        blocks.sort_by_key(|w| w.week_number);
        blocks
    }

    pub fn objectives_of(&self, mesocycle_id: MesocycleId) -> Vec<String> {
        self.objectives
            .get(&mesocycle_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Assemble the detail tree for one mesocycle
    pub fn mesocycle_detail(&self, id: MesocycleId) -> Result<MesocycleDetail> {
        let mesocycle = self.mesocycle(id)?.clone();
        Ok(MesocycleDetail {
            mesocycle,
            objectives: self.objectives_of(id),
            weekly_blocks: self.weekly_blocks_of(id),
        })
    }

    /// Validate the catalog for data-quality problems
    ///
    /// Findings never make the catalog unusable; callers log or print them.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut mesocycle_ids = HashSet::new();
        for m in &self.plan.mesocycles {
            if !mesocycle_ids.insert(m.id) {
                errors.push(format!("Duplicate mesocycle id {}", m.id));
            }
            if m.weeks == 0 {
                errors.push(format!("Mesocycle {} has no weeks", m.id));
            }
        }

        for m in &self.plan.mesocycles {
            let blocks = self
                .plan
                .weekly_blocks
                .iter()
                .filter(|w| w.mesocycle_id == m.id)
                .count();
            if blocks as u32 != m.weeks {
                errors.push(format!(
                    "Mesocycle {} declares {} weeks but has {} weekly blocks",
                    m.id, m.weeks, blocks
                ));
            }
        }

        let mut session_ids = HashSet::new();
        for block in &self.plan.weekly_blocks {
            if !mesocycle_ids.contains(&block.mesocycle_id) {
                errors.push(format!(
                    "Weekly block {} references unknown mesocycle {}",
                    block.id, block.mesocycle_id
                ));
            }
            if block.week_number == 0 {
                errors.push(format!("Weekly block {} has week number 0", block.id));
            }

            for s in &block.sessions {
                if !session_ids.insert(s.id) {
                    errors.push(format!("Duplicate session id {}", s.id));
                }
                errors.extend(validate_session(s));
            }
        }

        errors
    }
}

/// Data-quality findings for one session
pub fn validate_session(session: &Session) -> Vec<String> {
    let mut errors = Vec::new();

    if session.exercises.is_empty() {
        errors.push(format!("Session {} has no exercises", session.id));
    }

    let mut exercise_ids = HashSet::new();
    for e in &session.exercises {
        if !exercise_ids.insert(e.id) {
            errors.push(format!(
                "Session {} has duplicate exercise id {}",
                session.id, e.id
            ));
        }
    }

    let minutes = session.exercise_minutes();
    if minutes > session.duration_minutes {
        errors.push(format!(
            "Session {} exercises add up to {} min, more than its {} min",
            session.id, minutes, session.duration_minutes
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = get_default_catalog();
        assert_eq!(catalog.mesocycles().len(), 5);
        assert_eq!(catalog.plan.weekly_blocks.len(), 2);
        assert_eq!(catalog.plan.basic_material.len(), 10);
    }

    #[test]
    fn test_mesocycle_ids_and_weeks() {
        let catalog = get_default_catalog();
        let ids: Vec<_> = catalog.mesocycles().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(catalog.mesocycles().iter().all(|m| m.weeks == 4));
        assert_eq!(catalog.mesocycles()[2].month_label, "Mes 3");
    }

    #[test]
    fn test_material_order() {
        let catalog = get_default_catalog();
        assert_eq!(catalog.plan.basic_material[0], "Balones de fútbol (nº 3 o 4)");
        assert_eq!(catalog.plan.basic_material[6], "Silbato");
        assert_eq!(catalog.plan.basic_material[9], "Botiquín básico");
    }

    #[test]
    fn test_unknown_mesocycle_is_not_found() {
        let catalog = get_default_catalog();
        let err = catalog.mesocycle(42).unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 42, .. }));
    }

    #[test]
    fn test_mesocycle_detail_tree() {
        let catalog = get_default_catalog();
        let detail = catalog.mesocycle_detail(1).unwrap();

        assert_eq!(detail.objectives.len(), 3);
        assert_eq!(detail.weekly_blocks.len(), 2);
        assert_eq!(detail.sessions().count(), 6);

        let first = detail.session(1).unwrap();
        assert_eq!(first.name, "Familiarización con el balón");
        let order: Vec<_> = first.exercises.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_mesocycles_without_sessions_have_empty_tree() {
        let catalog = get_default_catalog();
        let detail = catalog.mesocycle_detail(5).unwrap();
        assert!(detail.weekly_blocks.is_empty());
        assert_eq!(detail.objectives[2], "Evaluación final");
    }

    #[test]
    fn test_exercise_ids_are_session_local() {
        let catalog = get_default_catalog();
        let detail = catalog.mesocycle_detail(1).unwrap();
        let a = detail.session(1).unwrap();
        let b = detail.session(2).unwrap();
        assert!(a.exercise(1).is_some());
        assert!(b.exercise(1).is_some());
        assert_ne!(a.exercise(1), b.exercise(1));
    }

    #[test]
    fn test_default_catalog_reports_only_missing_weeks() {
        let catalog = get_default_catalog();
        let errors = catalog.validate();

        // Only mesocycle 1 has sessions authored, and only two weeks of them
        assert_eq!(errors.len(), 5, "unexpected findings: {:?}", errors);
        assert!(errors
            .iter()
            .all(|e| e.contains("declares 4 weeks")));
    }

    #[test]
    fn test_validate_flags_duplicate_exercise_and_overlong_session() {
        let mut catalog = get_default_catalog().clone();
        let session = &mut catalog.plan.weekly_blocks[0].sessions[0];
        session.exercises[1].id = 1;
        session.duration_minutes = 60;

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("duplicate exercise id 1")));
        assert!(errors.iter().any(|e| e.contains("more than its 60 min")));
    }
}
