//! Nutrition provider - daily meal plans from the flight menu.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const NUTRITION_PROVIDER_ID: &str = "nutrition_agent";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum NutritionAction {
    GenerateMealPlan,
}

/// One meal with its macronutrients (grams).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Meal {
    pub name: &'static str,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
}

const BREAKFAST: &[Meal] = &[
    Meal { name: "Oatmeal with dried berries", calories: 450, protein: 15, carbs: 70 },
    Meal { name: "Scrambled eggs with tortilla", calories: 520, protein: 28, carbs: 40 },
];
const LUNCH: &[Meal] = &[
    Meal { name: "Chicken teriyaki with rice", calories: 700, protein: 42, carbs: 85 },
    Meal { name: "Lentil curry with naan", calories: 650, protein: 30, carbs: 90 },
];
const DINNER: &[Meal] = &[
    Meal { name: "Salmon with green beans", calories: 680, protein: 45, carbs: 35 },
    Meal { name: "Beef stew with potatoes", calories: 720, protein: 48, carbs: 60 },
];
const SNACKS: &[Meal] = &[
    Meal { name: "Nuts and dried fruit", calories: 300, protein: 8, carbs: 30 },
    Meal { name: "Protein bar and yogurt", calories: 330, protein: 22, carbs: 35 },
];

/// Rotate menu choices by day so consecutive days differ.
pub fn plan_for_day(day: u32) -> [Meal; 4] {
    let pick = |menu: &[Meal]| menu[day as usize % menu.len()];
    [pick(BREAKFAST), pick(LUNCH), pick(DINNER), pick(SNACKS)]
}

/// Nutrition capability provider.
#[derive(Debug, Default)]
pub struct NutritionProvider;

impl NutritionProvider {
    pub fn new() -> Self {
        Self
    }

    fn meal_plan(&self) -> Response {
        let today = Timestamp::now();
        let day = chrono::Datelike::ordinal(today.as_datetime());
        let [breakfast, lunch, dinner, snacks] = plan_for_day(day);
        let meals = [breakfast, lunch, dinner, snacks];

        Response::ok(json!({
            "agent": NUTRITION_PROVIDER_ID,
            "meal_plan": {
                "date": today.as_datetime().date_naive().to_string(),
                "meals": {
                    "breakfast": breakfast,
                    "lunch": lunch,
                    "dinner": dinner,
                    "snacks": snacks,
                },
                "total_calories": meals.iter().map(|m| m.calories).sum::<u32>(),
                "total_protein": meals.iter().map(|m| m.protein).sum::<u32>(),
                "total_carbs": meals.iter().map(|m| m.carbs).sum::<u32>(),
            },
        }))
    }
}

#[async_trait]
impl CapabilityProvider for NutritionProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(NUTRITION_PROVIDER_ID, "Nutrition Planner", "wellness")
            .with_capabilities(&["generate_meal_plan"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<NutritionAction>() {
            Ok(NutritionAction::GenerateMealPlan) => self.meal_plan(),
            Err(e) => e.into(),
        }
    }
}
