//! Line-oriented interactive session. Every error is reported inline and
//! the user is asked again; nothing here ends the process except `quit`.

use super::{form, print_budget, print_cities, print_plans, today};
use crate::{
    budget::BudgetInputs,
    cities::City,
    config::PlannerConfig,
    core::{PlanOutcome, Session, TripRequest},
    error::PlannerError,
    types::TripBudget,
};
use std::io::Write;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "Commands: plan, budget, list, cities, help, quit";

struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    fn new() -> Self {
        Self {
            lines: BufReader::new(stdin()).lines(),
        }
    }

    /// Read one answer; `None` once stdin is closed
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}: ");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }

    /// Ask until `parse` accepts the answer. A blank answer takes `default` when there is one.
    async fn ask_parsed<T, P>(
        &mut self,
        label: &str,
        default: Option<T>,
        parse: P,
    ) -> anyhow::Result<Option<T>>
    where
        T: Clone + std::fmt::Display,
        P: Fn(&str) -> Result<T, String>,
    {
        let label = match &default {
            Some(value) => format!("{label} [{value}]"),
            None => label.to_string(),
        };

        loop {
            let Some(answer) = self.ask(&label).await? else {
                return Ok(None);
            };
            if answer.is_empty() {
                if let Some(value) = &default {
                    return Ok(Some(value.clone()));
                }
            }
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => println!("  {message}"),
            }
        }
    }

    async fn ask_stepped(&mut self, field: form::Stepped) -> anyhow::Result<Option<u32>> {
        self.ask_parsed(field.name, Some(field.default), |raw| field.parse(raw))
            .await
    }

    async fn ask_yes_no(&mut self, label: &str) -> anyhow::Result<Option<bool>> {
        self.ask_parsed(&format!("{label} (y/n)"), Some(YesNo(false)), |raw| {
            match raw.to_ascii_lowercase().as_str() {
                "y" | "yes" => Ok(YesNo(true)),
                "n" | "no" => Ok(YesNo(false)),
                other => Err(format!("answer y or n, got `{other}`")),
            }
        })
        .await
        .map(|answer| answer.map(|YesNo(yes)| yes))
    }
}

#[derive(Clone, Copy)]
struct YesNo(bool);

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0 { "y" } else { "n" })
    }
}

pub async fn run(config: &PlannerConfig) -> anyhow::Result<()> {
    let mut session = Session::from_config(config);
    let mut prompter = Prompter::new();

    println!("Travel Planner");
    if !session.can_generate() {
        println!("Error: {}", PlannerError::MissingCredential);
        println!("Plan generation is disabled; the budget calculator still works.");
    }
    println!("{HELP}");

    loop {
        let Some(command) = prompter.ask("\n>").await? else {
            break;
        };

        let keep_going = match command.to_ascii_lowercase().as_str() {
            "" => true,
            "plan" => plan(&mut session, &mut prompter).await?,
            "budget" => budget(&session, &mut prompter).await?,
            "list" => {
                print_plans(session.store());
                true
            }
            "cities" => {
                print_cities();
                true
            }
            "help" => {
                println!("{HELP}");
                true
            }
            "quit" | "exit" => false,
            other => {
                println!("Unknown command `{other}`. {HELP}");
                true
            }
        };

        if !keep_going {
            break;
        }
    }

    println!("Session ended with {} plan(s); nothing was saved.", session.store().len());
    Ok(())
}

/// Returns `false` when stdin closed mid-form
async fn plan(session: &mut Session, prompter: &mut Prompter) -> anyhow::Result<bool> {
    if !session.can_generate() {
        println!("Error: {}", PlannerError::MissingCredential);
        return Ok(true);
    }

    let today = today();
    let Some(origin) = prompter
        .ask_parsed::<City, _>("Where are you starting from?", None, form::parse_city)
        .await?
    else {
        return Ok(false);
    };
    let Some(destination) = prompter
        .ask_parsed::<City, _>("Where do you want to go?", None, form::parse_city)
        .await?
    else {
        return Ok(false);
    };

    let request = loop {
        let Some(start) = prompter
            .ask_parsed("Start date", Some(today), form::parse_date)
            .await?
        else {
            return Ok(false);
        };
        let Some(end) = prompter
            .ask_parsed("End date", Some(start), form::parse_date)
            .await?
        else {
            return Ok(false);
        };

        let (Some(food), Some(stay), Some(other)) = (
            prompter.ask_stepped(form::PLAN_FOOD).await?,
            prompter.ask_stepped(form::PLAN_STAY).await?,
            prompter.ask_stepped(form::PLAN_OTHER).await?,
        ) else {
            return Ok(false);
        };

        let request = TripRequest::new()
            .from_city(origin)
            .to_city(destination)
            .dates(start, end)
            .budget(TripBudget::new(food, stay, other));

        match request.validate(today) {
            Ok(_) => break request,
            Err(err) => println!("Error: {err}"),
        }
    };

    println!("Generating travel plan...\n");
    let mut stdout = std::io::stdout();
    let mut partial_shown = false;
    let outcome = session
        .generate_plan_with(&request, today, |fragment| {
            partial_shown = true;
            let _ = write!(stdout, "{fragment}");
            let _ = stdout.flush();
        })
        .await;

    match outcome {
        Ok(PlanOutcome::Generated { id, plan, .. }) => {
            println!("\n\nTravel plan #{id} generated successfully!");
            println!("From: {}  To: {}", plan.origin(), plan.destination());
            println!("Dates: {} to {}", plan.start_date(), plan.end_date());
            println!("Budget Breakdown: {}", plan.budget_breakdown());
        }
        Ok(failed @ PlanOutcome::Failed { .. }) => {
            if let Some(notice) = failed.failure_notice(partial_shown) {
                println!("\n{notice}");
            }
        }
        Err(err) => println!("Error: {err}"),
    }

    Ok(true)
}

/// Returns `false` when stdin closed mid-form
async fn budget(session: &Session, prompter: &mut Prompter) -> anyhow::Result<bool> {
    let (Some(transport), Some(food), Some(stay), Some(misc)) = (
        prompter.ask_stepped(form::CALC_TRANSPORT).await?,
        prompter.ask_stepped(form::CALC_FOOD).await?,
        prompter.ask_stepped(form::CALC_STAY).await?,
        prompter.ask_stepped(form::CALC_MISC).await?,
    ) else {
        return Ok(false);
    };
    let (Some(inflation), Some(days)) = (
        prompter.ask_stepped(form::CALC_INFLATION).await?,
        prompter.ask_stepped(form::CALC_DAYS).await?,
    ) else {
        return Ok(false);
    };
    let Some(convert) = prompter
        .ask_yes_no("Need to convert to another currency?")
        .await?
    else {
        return Ok(false);
    };

    let conversion_rate = if convert {
        let Some(rate) = prompter
            .ask_parsed(
                "Enter Conversion Rate (₹ to Foreign Currency)",
                Some(1.0),
                form::parse_conversion_rate,
            )
            .await?
        else {
            return Ok(false);
        };
        Some(rate)
    } else {
        None
    };

    let inputs = BudgetInputs::new(
        f64::from(transport),
        f64::from(food),
        f64::from(stay),
        f64::from(misc),
    )
    .with_inflation(f64::from(inflation))
    .with_days(days)
    .with_conversion_rate(conversion_rate);

    match session.calculate_budget(&inputs) {
        Ok(summary) => print_budget(&summary),
        Err(err) => println!("Error: {err}"),
    }

    Ok(true)
}
