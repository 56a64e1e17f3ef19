use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mealwise_core::store::NewCalendar;
use mealwise_core::{
    CalendarLength, DifficultyLevel, DinerCounts, MealPlanner, NewProfile, PlanOptions,
    PlannerError, Theme,
};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "mealwise")]
#[command(about = "Weekly meal plans and shopping lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage household profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Generate a weekly plan for the active profile
    Plan {
        /// Number of days: 5 (Monday-Friday) or 7
        #[arg(long, default_value = "7", value_parser = parse_length)]
        days: CalendarLength,
        /// Difficulty: sencillo, medio or pro
        #[arg(long, default_value = "medio", value_parser = parse_level)]
        level: DifficultyLevel,
        /// Theme: none, comfort, light, mediterranean or quick
        #[arg(long, default_value = "none", value_parser = parse_theme)]
        theme: Theme,
        /// Plan dinners that reuse lunch leftovers
        #[arg(long)]
        leftovers: bool,
        /// Save the plan as a calendar with this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Print the shopping list of a saved calendar
    ShoppingList {
        /// Calendar id
        calendar: String,
    },
    /// Three quick ideas for a meal type
    Ideas {
        /// e.g. "breakfast" or "dinner"
        meal_type: String,
    },
    /// A recipe using only the ingredients you have
    Rescue {
        /// Comma-separated ingredients
        ingredients: String,
    },
    /// Rate a recipe from 1 to 5
    Rate {
        recipe_id: String,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a profile. The first one becomes active.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        toddlers: u32,
        #[arg(long, default_value_t = 0)]
        kids: u32,
        #[arg(long, default_value_t = 2)]
        adults: u32,
        #[arg(long, default_value_t = 0)]
        seniors: u32,
        /// Comma-separated foods to avoid
        #[arg(long, value_delimiter = ',')]
        forbid: Vec<String>,
        #[arg(long)]
        prioritize_favorites: bool,
    },
    /// List profiles
    List,
}

fn parse_length(s: &str) -> Result<CalendarLength, String> {
    match s.trim() {
        "5" => Ok(CalendarLength::FiveDays),
        "7" => Ok(CalendarLength::SevenDays),
        other => Err(format!("expected 5 or 7, got {}", other)),
    }
}

fn parse_level(s: &str) -> Result<DifficultyLevel, String> {
    DifficultyLevel::from_str(s).ok_or_else(|| format!("unknown level: {}", s))
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::from_str(s).ok_or_else(|| format!("unknown theme: {}", s))
}

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turn a planner error into the message shown to the user.
fn user_error(planner: &MealPlanner, err: PlannerError) -> anyhow::Error {
    tracing::debug!(error = ?err, "Command failed");
    anyhow!(err.localized(planner.translator()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry();
    let cli = Cli::parse();
    let planner = MealPlanner::from_env().map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Profile { command } => match command {
            ProfileCommands::Add {
                name,
                toddlers,
                kids,
                adults,
                seniors,
                forbid,
                prioritize_favorites,
            } => {
                let profile = planner
                    .profiles()
                    .add(NewProfile {
                        name,
                        diners: DinerCounts {
                            toddlers,
                            kids,
                            adults_under_50: adults,
                            adults_50_plus: seniors,
                        },
                        forbidden_foods: forbid,
                        prioritize_favorites,
                    })
                    .map_err(|e| user_error(&planner, e))?;
                print_json(&profile)?;
            }
            ProfileCommands::List => {
                let profiles = planner
                    .profiles()
                    .list()
                    .map_err(|e| user_error(&planner, e))?;
                print_json(&profiles)?;
            }
        },
        Commands::Plan {
            days,
            level,
            theme,
            leftovers,
            save,
        } => {
            let profile = planner
                .active_profile()
                .map_err(|e| user_error(&planner, e))?;
            let options = PlanOptions {
                length: days,
                level,
                theme,
                leftovers,
            };
            let plan = planner
                .generate_plan(&profile, options)
                .await
                .map_err(|e| user_error(&planner, e))?;

            match save {
                Some(name) => {
                    let saved = planner
                        .save_calendar(NewCalendar {
                            name,
                            profile_id: profile.id.clone(),
                            plan,
                            level,
                            theme,
                        })
                        .map_err(|e| user_error(&planner, e))?;
                    // The process exits with the command, so wait for the list.
                    saved.shopping_list_task.await?;
                    eprintln!("Saved calendar {}", saved.calendar.id);
                    print_json(&saved.calendar.plan)?;
                }
                None => print_json(&plan)?,
            }
        }
        Commands::ShoppingList { calendar } => {
            let list = planner
                .shopping_list_for_calendar(&calendar)
                .await
                .map_err(|e| user_error(&planner, e))?;
            for group in &list.groups {
                println!("{}", group.category);
                for item in &group.items {
                    println!("  - {}: {}", item.name, item.quantity);
                }
            }
        }
        Commands::Ideas { meal_type } => {
            let ideas = planner
                .quick_ideas(&meal_type)
                .await
                .map_err(|e| user_error(&planner, e))?;
            for idea in ideas {
                println!("{}: {}", idea.name, idea.description);
            }
        }
        Commands::Rescue { ingredients } => {
            let recipe = planner
                .recipe_from_ingredients(&ingredients)
                .await
                .map_err(|e| user_error(&planner, e))?;
            print_json(&recipe)?;
        }
        Commands::Rate { recipe_id, value } => {
            planner
                .rate_recipe(&recipe_id, value)
                .map_err(|e| user_error(&planner, e))?;
            println!("Rated {} with {}", recipe_id, value);
        }
    }

    Ok(())
}
