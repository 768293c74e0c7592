//! Exercise provider - microgravity countermeasure workouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const EXERCISE_PROVIDER_ID: &str = "exercise_agent";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ExerciseAction {
    GenerateWorkout {
        #[serde(default)]
        focus: Option<String>,
    },
}

/// Workout emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Resistance,
    Cardio,
    Flexibility,
}

impl Focus {
    /// Parse a focus, defaulting to resistance training.
    pub fn parse(focus: Option<&str>) -> Self {
        match focus.map(str::to_lowercase).as_deref() {
            Some("cardio") | Some("endurance") => Focus::Cardio,
            Some("flexibility") | Some("mobility") => Focus::Flexibility,
            _ => Focus::Resistance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Exercise {
    name: &'static str,
    /// Minutes.
    duration: u32,
    sets: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    form_cues: Vec<&'static str>,
}

/// Build exercises from `(name, minutes, sets)` rows.
fn build(items: &[(&'static str, u32, u32)], cues: &[&'static str]) -> Vec<Exercise> {
    items
        .iter()
        .map(|&(name, duration, sets)| Exercise {
            name,
            duration,
            sets,
            form_cues: cues.to_vec(),
        })
        .collect()
}

/// Exercise capability provider.
#[derive(Debug, Default)]
pub struct ExerciseProvider;

impl ExerciseProvider {
    pub fn new() -> Self {
        Self
    }

    fn workout(&self, focus: Focus) -> Response {
        let warmup = build(&[("Arm circles", 2, 1), ("Bungee-assisted squats", 3, 1)], &[]);
        let cooldown = build(&[("Static stretching", 5, 1)], &[]);

        let (main, intensity, calories, bone_impact) = match focus {
            Focus::Resistance => (
                build(
                    &[
                        ("ARED deadlift", 8, 4),
                        ("ARED squat", 8, 4),
                        ("Heel raises", 5, 3),
                    ],
                    &["Keep spine neutral", "Control the eccentric phase"],
                ),
                "high",
                320,
                "high",
            ),
            Focus::Cardio => (
                build(
                    &[("CEVIS cycling intervals", 20, 1), ("T2 treadmill run", 15, 1)],
                    &["Maintain harness tension", "Target 70-80% max heart rate"],
                ),
                "moderate",
                280,
                "moderate",
            ),
            Focus::Flexibility => (
                build(
                    &[("Hip flexor stretch", 5, 2), ("Thoracic rotations", 5, 2)],
                    &["Breathe into the stretch", "Anchor feet in restraints"],
                ),
                "low",
                90,
                "low",
            ),
        };

        let estimated_duration: u32 = warmup
            .iter()
            .chain(main.iter())
            .chain(cooldown.iter())
            .map(|e| e.duration * e.sets)
            .sum();

        Response::ok(json!({
            "agent": EXERCISE_PROVIDER_ID,
            "workout": {
                "id": Uuid::new_v4(),
                "type": focus,
                "intensity": intensity,
                "estimated_duration": estimated_duration,
                "warmup": warmup,
                "main_exercises": main,
                "cooldown": cooldown,
                "calories_burned_estimate": calories,
                "bone_density_impact": bone_impact,
            },
        }))
    }
}

#[async_trait]
impl CapabilityProvider for ExerciseProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(EXERCISE_PROVIDER_ID, "Exercise Coach", "physical")
            .with_capabilities(&["generate_workout"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<ExerciseAction>() {
            Ok(ExerciseAction::GenerateWorkout { focus }) => {
                self.workout(Focus::parse(focus.as_deref()))
            }
            Err(e) => e.into(),
        }
    }
}
