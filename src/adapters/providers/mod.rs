//! Capability providers.
//!
//! Each provider owns one slice of crew well-being and answers a closed set
//! of actions. All of them simulate their readings in-process.

mod alerts;
mod counselor;
mod digital_twin;
mod exercise;
mod mock;
mod mood;
mod nutrition;
mod sleep;
mod social;
mod vitals;

pub use alerts::{AlertProvider, ALERT_PROVIDER_ID};
pub use counselor::{CounselorProvider, COUNSELOR_PROVIDER_ID};
pub use digital_twin::{DigitalTwinProvider, DIGITAL_TWIN_PROVIDER_ID, MAX_HORIZON_HOURS};
pub use exercise::{ExerciseProvider, Focus, EXERCISE_PROVIDER_ID};
pub use mock::MockProvider;
pub use mood::{infer as infer_mood, MoodAnalysis, MoodProvider, MOOD_PROVIDER_ID, NEUTRAL};
pub use nutrition::{NutritionProvider, NUTRITION_PROVIDER_ID};
pub use sleep::{SleepProvider, SLEEP_PROVIDER_ID};
pub use social::{SocialProvider, SOCIAL_PROVIDER_ID};
pub use vitals::{VitalsProvider, VitalsReading, VITALS_PROVIDER_ID};

use crate::domain::foundation::RegistryError;
use crate::domain::orchestration::ProviderRegistry;

/// Register the full provider set in its canonical order.
pub fn register_defaults(registry: &mut ProviderRegistry) -> Result<(), RegistryError> {
    registry.register(VitalsProvider::new())?;
    registry.register(AlertProvider::new())?;
    registry.register(MoodProvider::new())?;
    registry.register(CounselorProvider::new())?;
    registry.register(ExerciseProvider::new())?;
    registry.register(SleepProvider::new())?;
    registry.register(NutritionProvider::new())?;
    registry.register(SocialProvider::new())?;
    registry.register(DigitalTwinProvider::new())?;
    Ok(())
}
