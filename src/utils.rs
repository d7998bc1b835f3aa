use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::types::{ActivityTableRow, FoodLogTableRow, JsonObject, MealType, Scope};

/// The only date format the Fitbit endpoints accept.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date in the host's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

pub fn parse_meal_type(s: &str) -> Result<MealType, String> {
    s.parse()
}

/// Parses a space or comma separated scope list, e.g. `"nutrition activity"`.
pub fn parse_scopes(s: &str) -> Result<Vec<Scope>, String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

fn number(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => "-".to_string(),
    }
}

/// Flattens a food log response into one row per logged food.
pub fn food_log_rows(logs: &JsonObject) -> Vec<FoodLogTableRow> {
    let Some(foods) = logs.get("foods").and_then(Value::as_array) else {
        return Vec::new();
    };

    foods
        .iter()
        .filter_map(|entry| entry.get("loggedFood"))
        .map(|food| {
            let meal = food
                .get("mealTypeId")
                .and_then(Value::as_u64)
                .and_then(MealType::from_id)
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string());

            let unit = food
                .get("unit")
                .and_then(|u| u.get("plural").or_else(|| u.get("name")))
                .and_then(Value::as_str)
                .unwrap_or_default();

            FoodLogTableRow {
                meal,
                name: food
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("-")
                    .to_string(),
                amount: format!("{} {}", number(food.get("amount")), unit)
                    .trim_end()
                    .to_string(),
                calories: number(food.get("calories")),
            }
        })
        .collect()
}

/// Picks the headline numbers out of a daily activity response.
pub fn activity_rows(activity: &JsonObject) -> Vec<ActivityTableRow> {
    let Some(summary) = activity.get("summary") else {
        return Vec::new();
    };

    let total_distance = summary
        .get("distances")
        .and_then(Value::as_array)
        .and_then(|distances| {
            distances
                .iter()
                .find(|d| d.get("activity").and_then(Value::as_str) == Some("total"))
        })
        .and_then(|d| d.get("distance"));

    let active_minutes: Option<u64> = ["fairlyActiveMinutes", "veryActiveMinutes"]
        .iter()
        .map(|key| summary.get(*key).and_then(Value::as_u64))
        .sum();

    vec![
        ActivityTableRow {
            metric: "Steps".to_string(),
            value: number(summary.get("steps")),
        },
        ActivityTableRow {
            metric: "Calories out".to_string(),
            value: number(summary.get("caloriesOut")),
        },
        ActivityTableRow {
            metric: "Distance".to_string(),
            value: number(total_distance),
        },
        ActivityTableRow {
            metric: "Active minutes".to_string(),
            value: active_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
        },
        ActivityTableRow {
            metric: "Sedentary minutes".to_string(),
            value: number(summary.get("sedentaryMinutes")),
        },
    ]
}
