use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use url::Url;

/// A parsed JSON response body. Every successful API call yields one.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

pub const FITBIT_AUTH_BASE: &str = "https://www.fitbit.com";
pub const FITBIT_API_BASE: &str = "https://api.fitbit.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Nutrition,
    Activity,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Nutrition => "nutrition",
            Scope::Activity => "activity",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nutrition" => Ok(Scope::Nutrition),
            "activity" => Ok(Scope::Activity),
            other => Err(format!("unknown scope '{other}'")),
        }
    }
}

/// Immutable OAuth client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub callback_url: String,
    scopes: Vec<Scope>,
}

impl ClientConfig {
    /// Scopes keep the order they are supplied in; repeats are dropped.
    pub fn new(
        client_id: impl Into<String>,
        callback_url: impl Into<String>,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> Self {
        let mut unique: Vec<Scope> = Vec::new();
        for scope in scopes {
            if !unique.contains(&scope) {
                unique.push(scope);
            }
        }

        Self {
            client_id: client_id.into(),
            callback_url: callback_url.into(),
            scopes: unique,
        }
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }
}

/// Base URLs for the authorize page and the resource API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth_base: Url,
    pub api_base: Url,
}

impl Endpoints {
    pub fn new(auth_base: Url, api_base: Url) -> Self {
        Self {
            auth_base,
            api_base,
        }
    }

    /// Points both the authorize page and the API at one host, e.g. a mock server.
    pub fn single(base: Url) -> Self {
        Self {
            auth_base: base.clone(),
            api_base: base,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_base: Url::parse(FITBIT_AUTH_BASE).expect("static auth base is a valid URL"),
            api_base: Url::parse(FITBIT_API_BASE).expect("static api base is a valid URL"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub user_id: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            user_id: Some(user_id.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.access_token.is_some() && self.user_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast = 1,
    MorningSnack = 2,
    Lunch = 3,
    AfternoonSnack = 4,
    Dinner = 5,
    Anytime = 7,
}

impl MealType {
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(MealType::Breakfast),
            2 => Some(MealType::MorningSnack),
            3 => Some(MealType::Lunch),
            4 => Some(MealType::AfternoonSnack),
            5 => Some(MealType::Dinner),
            7 => Some(MealType::Anytime),
            _ => None,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MealType::Breakfast => "Breakfast",
            MealType::MorningSnack => "Morning Snack",
            MealType::Lunch => "Lunch",
            MealType::AfternoonSnack => "Afternoon Snack",
            MealType::Dinner => "Dinner",
            MealType::Anytime => "Anytime",
        };
        f.write_str(name)
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "breakfast" | "1" => Ok(MealType::Breakfast),
            "morningsnack" | "2" => Ok(MealType::MorningSnack),
            "lunch" | "3" => Ok(MealType::Lunch),
            "afternoonsnack" | "4" => Ok(MealType::AfternoonSnack),
            "dinner" | "5" => Ok(MealType::Dinner),
            "anytime" | "7" => Ok(MealType::Anytime),
            _ => Err(format!(
                "unknown meal type '{s}' (expected breakfast, morning-snack, lunch, afternoon-snack, dinner or anytime)"
            )),
        }
    }
}

/// A food log entry to post. Either references a catalog food by id or
/// describes a free-form food by name and calories.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItem {
    pub id: Option<String>,
    pub food_name: Option<String>,
    pub meal_type: MealType,
    pub unit: u32,
    pub amount: f64,
    pub date: NaiveDate,
    pub calories: Option<u32>,
}

impl FoodItem {
    pub fn from_catalog(
        id: impl Into<String>,
        meal_type: MealType,
        unit: u32,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Some(id.into()),
            food_name: None,
            meal_type,
            unit,
            amount,
            date,
            calories: None,
        }
    }

    pub fn custom(
        food_name: impl Into<String>,
        calories: u32,
        meal_type: MealType,
        unit: u32,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            food_name: Some(food_name.into()),
            meal_type,
            unit,
            amount,
            date,
            calories: Some(calories),
        }
    }
}

#[derive(Tabled)]
pub struct FoodLogTableRow {
    pub meal: String,
    pub name: String,
    pub amount: String,
    pub calories: String,
}

#[derive(Tabled)]
pub struct ActivityTableRow {
    pub metric: String,
    pub value: String,
}
