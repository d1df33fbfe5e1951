// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use costlens::{build_service, init_tracing, load_rankings, BudgetReport, Config, Salary, Severity};
use std::env;

const USAGE: &str = "Usage:
  costlens <city> <salary>        Print the budget verdict
  costlens view <city> <salary>   Open the verdict screen (tui feature)
  costlens sheet <city>           Print the raw cost sheet as JSON
  costlens rankings               Print the most / least expensive cities";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env()?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["rankings"] => run_rankings(&config),
        ["sheet", city] => run_sheet(&config, city).await,
        ["view", city, salary] => run_view(&config, city, salary).await,
        [city, salary] => run_verdict(&config, city, salary).await,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

async fn fetch_report(config: &Config, city: &str, salary: &str) -> Result<BudgetReport> {
    let salary = Salary::parse(salary)?;
    let service = build_service(config)?;
    let report = service
        .report(city, salary)
        .await
        .with_context(|| format!("Failed to evaluate budget for {}", city))?;
    Ok(report)
}

async fn run_verdict(config: &Config, city: &str, salary: &str) -> Result<()> {
    let report = fetch_report(config, city, salary).await?;
    let verdict = &report.verdict;
    let costs = &verdict.category_costs;

    println!("{} on ${:.2}/mo", report.city, report.salary);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Housing (Rent + Utils)     ${:>10.2}", costs.housing);
    println!("  Food (Groceries + Dining)  ${:>10.2}", costs.food);
    println!("  Transport                  ${:>10.2}", costs.transport);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let sign = if verdict.is_deficit() { "-" } else { "" };
    println!("  Left over                 {}${:.2}", sign, verdict.diff.abs());
    println!("\n{}\n", verdict.summary);

    for suggestion in &verdict.suggestions {
        let icon = match suggestion.severity {
            Severity::Good => "✅",
            Severity::Neutral => "ℹ️ ",
            Severity::Bad => "⚠️ ",
        };
        println!("{} {}", icon, suggestion.text);
    }

    Ok(())
}

async fn run_sheet(config: &Config, city: &str) -> Result<()> {
    let service = build_service(config)?;
    let sheet = service
        .sheet(city)
        .await
        .with_context(|| format!("Failed to fetch cost sheet for {}", city))?;
    println!("{}", serde_json::to_string_pretty(&sheet)?);
    Ok(())
}

fn run_rankings(config: &Config) -> Result<()> {
    let rankings = load_rankings(&config.rankings_path)?;
    if rankings.is_empty() {
        bail!("No cities in {:?}", config.rankings_path);
    }

    println!("Most expensive");
    for city in &rankings.expensive {
        println!("  {:>3}. {:<40} {:>6}", city.rank, city.city, index_text(city.col_index));
    }
    println!("\nCheapest");
    for city in &rankings.cheapest {
        println!("  {:>3}. {:<40} {:>6}", city.rank, city.city, index_text(city.col_index));
    }

    Ok(())
}

fn index_text(index: Option<f64>) -> String {
    index.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}", v))
}

#[cfg(feature = "tui")]
async fn run_view(config: &Config, city: &str, salary: &str) -> Result<()> {
    let report = fetch_report(config, city, salary).await?;
    let mut app = ui::App::new(report);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
async fn run_view(_config: &Config, _city: &str, _salary: &str) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
