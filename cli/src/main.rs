mod client;
mod seed;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client::ApiClient;
use family_table_core::parse_steps;
use family_table_core::units::{self, Conversion, Dimension, COMMON_CONVERSIONS};
use serde_json::Value;
use std::io::Read;

#[derive(Parser)]
#[command(name = "family-table")]
#[command(about = "Family Table CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, global = true, env = "FAMILY_TABLE_SERVER", default_value = "http://localhost:3000")]
    server: String,
    /// Bearer token for authenticated commands
    #[arg(long, global = true, env = "FAMILY_TABLE_TOKEN")]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the server (unauthenticated)
    Ping,
    /// Show the signed-in user
    Me,
    /// List the known kitchen units
    Units,
    /// Convert an amount between two units of the same kind
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    /// Split recipe instructions into numbered steps
    Steps {
        /// Instructions file, or "-" for stdin
        path: String,
    },
    /// Create sample recipes and a meal for the signed-in user
    Seed,
    /// Run backend smoke checks (all of them by default)
    Diagnostics {
        #[arg(value_enum)]
        checks: Vec<Check>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Check {
    Recipe,
    Story,
    Meal,
}

impl Check {
    const ALL: [Check; 3] = [Check::Recipe, Check::Story, Check::Meal];

    fn path(self) -> &'static str {
        match self {
            Check::Recipe => "recipe",
            Check::Story => "story",
            Check::Meal => "meal",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server, cli.token.clone());

    match cli.command {
        Commands::Ping => ping(&client).await?,
        Commands::Me => {
            require_token(&cli.token)?;
            let me: Value = client.get("/api/me").await?;
            println!(
                "{} <{}>",
                me["display_name"].as_str().unwrap_or_default(),
                me["email"].as_str().unwrap_or_default()
            );
        }
        Commands::Units => list_units(),
        Commands::Convert { amount, from, to } => {
            let result = Conversion::new(amount, from.clone(), to.clone()).result()?;
            println!("{} {} = {} {}", amount, from, units::format_quantity(result), to);
        }
        Commands::Steps { path } => {
            let text = read_input(&path)?;
            print!("{}", format_steps(&text));
        }
        Commands::Seed => {
            require_token(&cli.token)?;
            seed::seed(&client).await?;
        }
        Commands::Diagnostics { checks } => {
            require_token(&cli.token)?;
            let checks = if checks.is_empty() {
                Check::ALL.to_vec()
            } else {
                checks
            };
            diagnostics(&client, &checks).await?;
        }
    }

    Ok(())
}

fn require_token(token: &Option<String>) -> Result<()> {
    if token.is_none() {
        anyhow::bail!("This command needs --token or FAMILY_TABLE_TOKEN");
    }
    Ok(())
}

async fn ping(client: &ApiClient) -> Result<()> {
    let response: Value = client.get("/api/test/unauthed-ping").await?;
    println!("{}", response["message"].as_str().unwrap_or_default());
    Ok(())
}

fn list_units() {
    for dimension in [Dimension::Weight, Dimension::Volume] {
        let label = match dimension {
            Dimension::Weight => "Weight",
            Dimension::Volume => "Volume",
        };
        println!("{}:", label);
        for unit in units::units_for(dimension) {
            println!("  {:<6} = {} {}", unit.name, unit.factor, dimension.base_unit());
        }
    }
    println!("Common conversions:");
    for (from, to) in COMMON_CONVERSIONS {
        println!("  {} -> {}", from, to);
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}

fn format_steps(text: &str) -> String {
    parse_steps(text)
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}\n", i + 1, step))
        .collect()
}

async fn diagnostics(client: &ApiClient, checks: &[Check]) -> Result<()> {
    let mut failures = 0;
    for check in checks {
        let result: Value = client
            .post_empty(&format!("/api/diagnostics/{}", check.path()))
            .await?;
        if result["success"].as_bool().unwrap_or(false) {
            println!("{:<7} ok   {}", check.path(), result["data"]["id"].as_str().unwrap_or_default());
        } else {
            failures += 1;
            println!("{:<7} FAIL {}", check.path(), result["error"].as_str().unwrap_or_default());
        }
    }
    if failures > 0 {
        anyhow::bail!("{} of {} checks failed", failures, checks.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_steps_renumbers() {
        let text = "Step 1: Boil water\n\nStep 2: Add pasta";
        assert_eq!(format_steps(text), "1. Boil water\n2. Add pasta\n");
    }

    #[test]
    fn test_cli_parses_diagnostics() {
        let cli = Cli::try_parse_from(["family-table", "--token", "abc", "diagnostics", "meal"]).unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
        match cli.command {
            Commands::Diagnostics { checks } => assert_eq!(checks.len(), 1),
            _ => panic!("expected diagnostics"),
        }
    }
}
