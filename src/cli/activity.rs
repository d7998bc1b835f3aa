use chrono::NaiveDate;
use tabled::Table;

use crate::{utils, warning};

pub async fn activity(date: Option<NaiveDate>, json: bool) {
    let api = super::connected_api().await;
    let date = date.unwrap_or_else(utils::today);

    let pb = super::spinner(format!("Fetching activity for {}...", utils::format_date(date)));
    let result = api.get_daily_activity_on(date).await;
    pb.finish_and_clear();

    let activity = match result {
        Ok(activity) => activity,
        Err(e) => super::request_failed("Cannot fetch daily activity", e),
    };

    if json {
        super::print_json(&activity);
        return;
    }

    let rows = utils::activity_rows(&activity);
    if rows.is_empty() {
        warning!("No activity summary for {}.", utils::format_date(date));
        return;
    }

    println!("{}", Table::new(rows));
}
