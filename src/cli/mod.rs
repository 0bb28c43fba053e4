mod form;
mod interactive;

use crate::{
    budget::{BudgetInputs, BudgetSummary},
    cities::{set_operations, City, GROUP_ONE, GROUP_TWO},
    config::PlannerConfig,
    core::{PlanOutcome, PlanStore, Session, TripRequest},
    types::{outcome::PARTIAL_OUTPUT_DISCARDED, TripBudget},
};
use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI entry point for the trip-planner tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let config = resolve_config(&matches)?;

    match matches.subcommand() {
        Some(("plan", sub)) => run_plan(&config, sub).await,
        Some(("budget", sub)) => run_budget(sub),
        Some(("cities", _)) => {
            print_cities();
            Ok(())
        }
        Some(("session", _)) => interactive::run(&config).await,
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn command() -> Command {
    Command::new("trip-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Travel planner: LLM-generated itineraries and budget breakdowns")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .global(true)
                .value_name("KEY")
                .help("Generation service API key (or set API_KEY / OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .global(true)
                .value_name("URL")
                .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .global(true)
                .value_name("MODEL")
                .help("Model to request (or set TRIP_PLANNER_MODEL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .global(true)
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64))
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("max-tokens")
                .long("max-tokens")
                .global(true)
                .value_name("TOKENS")
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Cap the itinerary length (or set TRIP_PLANNER_MAX_TOKENS)"),
        )
        .subcommand(
            Command::new("plan")
                .about("Generate a day-by-day travel plan")
                .arg(city_arg("from", "Where are you starting from?"))
                .arg(city_arg("to", "Where do you want to go?"))
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("YYYY-MM-DD")
                        .value_parser(form::parse_date)
                        .help("Start date, today or later (default: today)"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("YYYY-MM-DD")
                        .value_parser(form::parse_date)
                        .help("End date, not before the start date (default: start date)"),
                )
                .arg(stepped_arg("food", form::PLAN_FOOD))
                .arg(stepped_arg("stay", form::PLAN_STAY))
                .arg(stepped_arg("other", form::PLAN_OTHER))
                .arg(
                    Arg::new("stream")
                        .long("stream")
                        .action(ArgAction::SetTrue)
                        .help("Print the plan as it is generated"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("budget")
                .about("Break a travel budget into categories")
                .arg(stepped_arg("transport", form::CALC_TRANSPORT))
                .arg(stepped_arg("food", form::CALC_FOOD))
                .arg(stepped_arg("stay", form::CALC_STAY))
                .arg(stepped_arg("misc", form::CALC_MISC))
                .arg(stepped_arg("inflation", form::CALC_INFLATION))
                .arg(stepped_arg("days", form::CALC_DAYS))
                .arg(
                    Arg::new("convert")
                        .long("convert")
                        .value_name("RATE")
                        .value_parser(form::parse_conversion_rate)
                        .help("Convert the adjusted total to another currency at this rate"),
                )
                .arg(
                    Arg::new("svg")
                        .long("svg")
                        .value_name("PATH")
                        .help("Also write the pie chart as an SVG file"),
                )
                .arg(json_arg()),
        )
        .subcommand(Command::new("cities").about("List cities and the set-operations view"))
        .subcommand(
            Command::new("session")
                .about("Interactive session: plan, budget and list plans until you quit"),
        )
}

fn city_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("CITY")
        .required(true)
        .value_parser(form::parse_city)
        .help(help)
}

fn stepped_arg(name: &'static str, field: form::Stepped) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("AMOUNT")
        .value_parser(field.value_parser())
        .help(format!(
            "{} ({}-{}, step {}, default {})",
            field.name, field.min, field.max, field.step, field.default
        ))
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of text")
}

fn resolve_config(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env()?;

    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(api_key.clone());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.clone());
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*timeout));
    }
    if let Some(max_tokens) = matches.get_one::<u32>("max-tokens") {
        config = config.with_max_tokens(*max_tokens);
    }

    Ok(config)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn run_plan(config: &PlannerConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let mut session = Session::from_config(config);
    if !session.can_generate() {
        bail!(crate::PlannerError::MissingCredential);
    }

    let today = today();
    let start = matches.get_one::<NaiveDate>("start").copied().unwrap_or(today);
    let end = matches.get_one::<NaiveDate>("end").copied().unwrap_or(start);
    let request = TripRequest::new()
        .from_city(*required::<City>(matches, "from")?)
        .to_city(*required::<City>(matches, "to")?)
        .dates(start, end)
        .budget(TripBudget::new(
            stepped(matches, "food", form::PLAN_FOOD),
            stepped(matches, "stay", form::PLAN_STAY),
            stepped(matches, "other", form::PLAN_OTHER),
        ));

    let json = matches.get_flag("json");
    let stream = matches.get_flag("stream") && !json;

    info!(model = %config.model(), "generating travel plan");
    eprintln!("Generating travel plan...");

    let mut partial_shown = false;
    let outcome = if stream {
        let mut stdout = std::io::stdout();
        session
            .generate_plan_with(&request, today, |fragment| {
                partial_shown = true;
                let _ = write!(stdout, "{fragment}");
                let _ = stdout.flush();
            })
            .await?
    } else {
        session.generate_plan(&request, today).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if stream {
        println!();
        match &outcome {
            PlanOutcome::Generated { id, .. } => {
                println!("\nTravel plan #{id} generated successfully!");
            }
            PlanOutcome::Failed { .. } if partial_shown => eprintln!("{PARTIAL_OUTPUT_DISCARDED}"),
            PlanOutcome::Failed { .. } => {}
        }
    } else if outcome.is_success() {
        println!("{}", outcome.render());
    }

    match outcome {
        PlanOutcome::Generated { .. } => Ok(()),
        PlanOutcome::Failed { message, .. } => Err(anyhow!(message)),
    }
}

fn run_budget(matches: &ArgMatches) -> anyhow::Result<()> {
    let inputs = BudgetInputs::new(
        f64::from(stepped(matches, "transport", form::CALC_TRANSPORT)),
        f64::from(stepped(matches, "food", form::CALC_FOOD)),
        f64::from(stepped(matches, "stay", form::CALC_STAY)),
        f64::from(stepped(matches, "misc", form::CALC_MISC)),
    )
    .with_inflation(f64::from(stepped(matches, "inflation", form::CALC_INFLATION)))
    .with_days(stepped(matches, "days", form::CALC_DAYS))
    .with_conversion_rate(matches.get_one::<f64>("convert").copied());

    let summary = crate::budget::calculate(&inputs)?;

    if let (Some(path), Some(chart)) = (matches.get_one::<String>("svg"), &summary.chart) {
        std::fs::write(path, chart.render_svg(480))
            .with_context(|| format!("failed to write chart to {path}"))?;
        info!(path = %path, "wrote budget chart");
    }

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_budget(&summary);
    }

    Ok(())
}

/// Stepped field value, falling back to the form default
fn stepped(matches: &ArgMatches, name: &str, field: form::Stepped) -> u32 {
    matches.get_one::<u32>(name).copied().unwrap_or(field.default)
}

fn required<'a, T: Clone + Send + Sync + 'static>(
    matches: &'a ArgMatches,
    name: &str,
) -> anyhow::Result<&'a T> {
    matches
        .get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing required argument --{name}"))
}

pub(crate) fn print_budget(summary: &BudgetSummary) {
    println!("Budget Breakdown:");
    for line in summary.report_lines() {
        println!("  {line}");
    }
    match &summary.chart {
        Some(chart) => {
            println!();
            print!("{}", chart.render_text());
        }
        None => println!("\nNothing to chart: the total budget is zero."),
    }
}

pub(crate) fn print_cities() {
    let names: Vec<&str> = City::ALL.iter().map(City::name).collect();
    println!("Cities: {}", names.join(", "));
    println!();
    println!("Set Operations");
    for result in set_operations(&GROUP_ONE, &GROUP_TWO) {
        let cities: Vec<&str> = result.cities.iter().map(City::name).collect();
        println!("  {}: {{{}}}", result.operation, cities.join(", "));
    }
}

pub(crate) fn print_plans(store: &PlanStore) {
    if store.is_empty() {
        println!("No travel plans yet.");
        return;
    }
    for (id, plan) in store.list() {
        println!("--- Plan #{id} ---");
        println!("{}", plan.describe());
    }
}
