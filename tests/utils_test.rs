use chrono::NaiveDate;
use fitbitcli::types::{JsonObject, MealType, Scope};
use fitbitcli::utils::*;
use serde_json::json;

// Helper function to turn a json! literal into a response object
fn object(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn test_format_date() {
    let date = NaiveDate::from_ymd_opt(2017, 7, 29).unwrap();
    assert_eq!(format_date(date), "2017-07-29");

    // Single digit months and days are zero padded
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert_eq!(format_date(date), "2024-01-05");
}

#[test]
fn test_parse_date() {
    assert!(parse_date("2017-07-29").is_ok());
    assert!(parse_date("2017-13-01").is_err());
    assert!(parse_date("yesterday").is_err());
}

#[test]
fn test_parse_scopes() {
    assert_eq!(
        parse_scopes("nutrition activity").unwrap(),
        vec![Scope::Nutrition, Scope::Activity]
    );
    assert_eq!(
        parse_scopes("activity,nutrition").unwrap(),
        vec![Scope::Activity, Scope::Nutrition]
    );
    assert_eq!(parse_scopes("  ACTIVITY ").unwrap(), vec![Scope::Activity]);
    assert!(parse_scopes("nutrition sleep").is_err());
}

#[test]
fn test_parse_meal_type() {
    assert_eq!(parse_meal_type("breakfast").unwrap(), MealType::Breakfast);
    assert_eq!(parse_meal_type("morning-snack").unwrap(), MealType::MorningSnack);
    assert_eq!(parse_meal_type("Afternoon Snack").unwrap(), MealType::AfternoonSnack);
    assert_eq!(parse_meal_type("7").unwrap(), MealType::Anytime);
    assert!(parse_meal_type("6").is_err());
    assert!(parse_meal_type("brunch").is_err());
}

#[test]
fn test_meal_type_ids() {
    assert_eq!(MealType::Breakfast.id(), 1);
    assert_eq!(MealType::MorningSnack.id(), 2);
    assert_eq!(MealType::Lunch.id(), 3);
    assert_eq!(MealType::AfternoonSnack.id(), 4);
    assert_eq!(MealType::Dinner.id(), 5);
    assert_eq!(MealType::Anytime.id(), 7);
    assert_eq!(MealType::from_id(6), None);
}

#[test]
fn test_food_log_rows() {
    let logs = object(json!({
        "foods": [
            {
                "loggedFood": {
                    "name": "Banana",
                    "amount": 1,
                    "mealTypeId": 1,
                    "calories": 105,
                    "unit": { "name": "banana", "plural": "bananas" }
                }
            },
            {
                "loggedFood": {
                    "name": "Soup",
                    "mealTypeId": 9
                }
            }
        ],
        "summary": { "calories": 105 }
    }));

    let rows = food_log_rows(&logs);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].meal, "Breakfast");
    assert_eq!(rows[0].name, "Banana");
    assert_eq!(rows[0].amount, "1 bananas");
    assert_eq!(rows[0].calories, "105");

    // Unknown meal types and missing numbers render as placeholders
    assert_eq!(rows[1].meal, "-");
    assert_eq!(rows[1].amount, "-");
    assert_eq!(rows[1].calories, "-");
}

#[test]
fn test_food_log_rows_without_foods() {
    assert!(food_log_rows(&object(json!({ "summary": {} }))).is_empty());
    assert!(food_log_rows(&object(json!({ "foods": [] }))).is_empty());
}

#[test]
fn test_activity_rows() {
    let activity = object(json!({
        "summary": {
            "steps": 8123,
            "caloriesOut": 2450,
            "fairlyActiveMinutes": 12,
            "veryActiveMinutes": 30,
            "sedentaryMinutes": 600,
            "distances": [
                { "activity": "tracker", "distance": 5.1 },
                { "activity": "total", "distance": 5.83 }
            ]
        }
    }));

    let rows = activity_rows(&activity);
    let value = |metric: &str| {
        rows.iter()
            .find(|r| r.metric == metric)
            .map(|r| r.value.clone())
            .unwrap()
    };

    assert_eq!(value("Steps"), "8123");
    assert_eq!(value("Calories out"), "2450");
    assert_eq!(value("Distance"), "5.83");
    assert_eq!(value("Active minutes"), "42");
    assert_eq!(value("Sedentary minutes"), "600");
}

#[test]
fn test_activity_rows_without_summary() {
    assert!(activity_rows(&object(json!({ "goals": {} }))).is_empty());

    // A partial summary still yields rows with placeholders
    let rows = activity_rows(&object(json!({ "summary": { "steps": 10 } })));
    assert_eq!(rows[0].value, "10");
    assert!(rows.iter().skip(1).all(|r| r.value == "-"));
}
