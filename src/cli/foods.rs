use chrono::NaiveDate;
use tabled::Table;

use crate::{
    error,
    types::{FoodItem, MealType},
    success, utils, warning,
};

pub async fn foods(date: Option<NaiveDate>, json: bool) {
    let api = super::connected_api().await;
    let date = date.unwrap_or_else(utils::today);

    let pb = super::spinner(format!("Fetching food logs for {}...", utils::format_date(date)));
    let result = api.get_food_logs_on(date).await;
    pb.finish_and_clear();

    let logs = match result {
        Ok(logs) => logs,
        Err(e) => super::request_failed("Cannot fetch food logs", e),
    };

    if json {
        super::print_json(&logs);
        return;
    }

    let rows = utils::food_log_rows(&logs);
    if rows.is_empty() {
        warning!("No food logged on {}.", utils::format_date(date));
        return;
    }

    println!("{}", Table::new(rows));
}

/// What to log. Exactly one of `food_id` and `name` is set; clap enforces it.
pub struct LogFoodArgs {
    pub food_id: Option<String>,
    pub name: Option<String>,
    pub calories: Option<u32>,
    pub meal: MealType,
    pub unit: u32,
    pub amount: f64,
    pub date: Option<NaiveDate>,
}

pub async fn log_food(args: LogFoodArgs) {
    let date = args.date.unwrap_or_else(utils::today);

    let food = match (args.food_id, args.name, args.calories) {
        (Some(id), _, _) => FoodItem::from_catalog(id, args.meal, args.unit, args.amount, date),
        (None, Some(name), Some(calories)) => {
            FoodItem::custom(name, calories, args.meal, args.unit, args.amount, date)
        }
        (None, Some(_), None) => error!("--calories is required when logging by --name"),
        (None, None, _) => error!("Either --food-id or --name is required"),
    };

    let api = super::connected_api().await;

    let pb = super::spinner("Logging food...".to_string());
    let result = api.post_food_log(&food).await;
    pb.finish_and_clear();

    match result {
        Ok(_) => success!(
            "Logged {} for {} on {}",
            food.food_name.as_deref().or(food.id.as_deref()).unwrap_or("food"),
            food.meal_type,
            utils::format_date(food.date)
        ),
        Err(e) => super::request_failed("Cannot log food", e),
    }
}
