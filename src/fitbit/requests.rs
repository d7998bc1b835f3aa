use chrono::NaiveDate;
use url::Url;

use crate::{
    errors::{FitbitError, FitbitResult},
    types::FoodItem,
    utils::format_date,
};

/// Path segment Fitbit reads as "the user owning the token".
const CURRENT_USER: &str = "-";

fn endpoint(api_base: &Url, path: &str) -> FitbitResult<Url> {
    api_base.join(path).map_err(|_| FitbitError::InvalidUrl)
}

fn require_user(user_id: Option<&str>) -> FitbitResult<&str> {
    user_id
        .filter(|id| !id.is_empty())
        .ok_or(FitbitError::InvalidUrl)
}

/// `GET /1/user/<user>/foods/log/date/<YYYY-MM-DD>.json`
pub fn food_logs_url(api_base: &Url, user_id: Option<&str>, date: NaiveDate) -> FitbitResult<Url> {
    let user = require_user(user_id)?;
    endpoint(
        api_base,
        &format!(
            "/1/user/{user}/foods/log/date/{date}.json",
            user = urlencoding::encode(user),
            date = format_date(date)
        ),
    )
}

/// `GET /1/user/<user>/activities/date/<YYYY-MM-DD>.json`
pub fn daily_activity_url(
    api_base: &Url,
    user_id: Option<&str>,
    date: NaiveDate,
) -> FitbitResult<Url> {
    let user = require_user(user_id)?;
    endpoint(
        api_base,
        &format!(
            "/1/user/{user}/activities/date/{date}.json",
            user = urlencoding::encode(user),
            date = format_date(date)
        ),
    )
}

/// `POST /1/user/-/foods/log.json`
pub fn post_food_log_url(api_base: &Url) -> FitbitResult<Url> {
    endpoint(api_base, &format!("/1/user/{CURRENT_USER}/foods/log.json"))
}

/// Form fields for logging `food`. Absent optional fields are left out.
pub fn food_log_form(food: &FoodItem) -> Vec<(&'static str, String)> {
    let mut form = Vec::with_capacity(7);

    if let Some(id) = &food.id {
        form.push(("foodId", id.clone()));
    }
    if let Some(name) = &food.food_name {
        form.push(("foodName", name.clone()));
    }
    form.push(("amount", format!("{:.2}", food.amount)));
    form.push(("mealTypeId", food.meal_type.id().to_string()));
    form.push(("unitId", food.unit.to_string()));
    form.push(("date", format_date(food.date)));
    if let Some(calories) = food.calories {
        form.push(("calories", calories.to_string()));
    }

    form
}
