use clap::{
    ArgGroup, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use fitbitcli::{cli, config, types::MealType, utils, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with the Fitbit API
    Auth,

    /// Complete authorization from a redirect URL copied from the browser
    Redirect(RedirectOptions),

    /// Forget stored credentials
    Logout,

    /// Show login status
    Status,

    /// Show food logs
    Foods(DayOptions),

    /// Show daily activity summary
    Activity(DayOptions),

    /// Log a food
    LogFood(LogFoodOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RedirectOptions {
    /// Full redirect URL including the #access_token=... fragment
    url: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DayOptions {
    /// Day to show (YYYY-MM-DD), defaults to today
    #[clap(long, value_parser = utils::parse_date)]
    date: Option<chrono::NaiveDate>,

    /// Print the raw JSON response
    #[clap(long)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("food").required(true).args(["food_id", "name"])))]
pub struct LogFoodOptions {
    /// Fitbit catalog food id
    #[clap(long)]
    food_id: Option<String>,

    /// Name of a custom food
    #[clap(long, requires = "calories")]
    name: Option<String>,

    /// Calories of a custom food
    #[clap(long)]
    calories: Option<u32>,

    /// Meal: breakfast, morning-snack, lunch, afternoon-snack, dinner or anytime
    #[clap(long, default_value = "anytime", value_parser = utils::parse_meal_type)]
    meal: MealType,

    /// Fitbit unit id
    #[clap(long)]
    unit: u32,

    /// Amount in the given unit
    #[clap(long)]
    amount: f64,

    /// Day to log on (YYYY-MM-DD), defaults to today
    #[clap(long, value_parser = utils::parse_date)]
    date: Option<chrono::NaiveDate>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Redirect(opt) => cli::redirect(opt.url).await,
        Command::Logout => cli::logout().await,
        Command::Status => cli::status().await,
        Command::Foods(opt) => cli::foods(opt.date, opt.json).await,
        Command::Activity(opt) => cli::activity(opt.date, opt.json).await,
        Command::LogFood(opt) => {
            cli::log_food(cli::LogFoodArgs {
                food_id: opt.food_id,
                name: opt.name,
                calories: opt.calories,
                meal: opt.meal,
                unit: opt.unit,
                amount: opt.amount,
                date: opt.date,
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
