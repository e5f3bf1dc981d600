//! Greeter Example
//!
//! A small demonstration of the Bronze route execution engine: one route,
//! init/error/shutdown hooks, and inputs taken from the command line.
//!
//! # Execution
//!
//! ```text
//! init* ──► resolve params ──► action ──┐
//!                 │                     ├──► shutdown*
//!                 └──────────► error* ──┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package greeter -- --input name=alice
//! cargo run --package greeter -- --mode dev --input greeting=hi
//! cargo run --package greeter -- --input name=a-name-that-is-way-too-long-for-the-validator
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bronze::prelude::*;
use clap::Parser;
use tracing::{info, warn};

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "greeter", about = "Executes the GET /greet route once")]
struct Cli {
    /// Environment mode (production, development, stage). Overrides configuration.
    #[arg(long)]
    mode: Option<Mode>,

    /// Configuration file (bronze.toml). Searched for when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// A raw input value as `key=value`. May be repeated.
    #[arg(long = "input", value_name = "KEY=VALUE", value_parser = parse_input)]
    inputs: Vec<(String, String)>,

    /// Register an init hook that fails, to show the failure path.
    #[arg(long)]
    fail_init: bool,
}

fn parse_input(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got `{raw}`");
    };
    if key.is_empty() {
        bail!("empty key in `{raw}`");
    }
    Ok((key.to_string(), value.to_string()))
}

fn greet_route() -> Route {
    Route::new("GET", "/greet")
        .desc("Greets someone")
        .group("demo")
        .param("name", "world", Text::new(32), "Who to greet", false)
        .param("greeting", "Hello", Wildcard, "Greeting word", true)
        .action(|args: &Args, _: &mut Response| {
            format!(
                "{}, {}!",
                args.str("greeting").unwrap_or("Hello"),
                args.str("name").unwrap_or("world")
            )
        })
}

fn build_app(mode: Mode, fail_init: bool) -> App {
    let mut app = App::new(mode);

    app.init(move |res| {
        if !matches!(mode, Mode::Production) {
            res.write(&format!("[{mode}] "));
        }
    });
    if fail_init {
        app.init(|_| Err::<(), _>("refusing to start"));
    }
    app.error(|failure, res| {
        res.set_status(400).write(&failure.to_string());
    });
    app.shutdown(|res| {
        res.write("\n");
    });

    app
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::new().file(path).load(),
        None => load_config(),
    }
    .context("failed to load configuration")?;
    init_from_config(&config.logging);

    let mode = cli.mode.unwrap_or(config.mode);
    let app = build_app(mode, cli.fail_init).with_timezone(config.timezone.as_str());
    let route = greet_route();

    let inputs: Inputs = cli
        .inputs
        .into_iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect();

    info!(
        mode = %app.get_mode(),
        timezone = %app.timezone(),
        user = %app.get_env("USER", "anonymous"),
        "Executing {} {}",
        route.method(),
        route.path()
    );

    let execution = app
        .execute(&route, &inputs)
        .context("route execution failed")?;

    if let Outcome::Rejected(failure) = &execution.outcome {
        warn!(param = %failure.param, "Request rejected");
    }

    print!("{}", execution.body());
    if !execution.outcome.is_completed() {
        std::process::exit(i32::from(execution.response.status() / 100));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(
            parse_input("name=alice").unwrap(),
            ("name".to_string(), "alice".to_string())
        );
        assert_eq!(
            parse_input("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_input("novalue").is_err());
        assert!(parse_input("=x").is_err());
    }

    #[test]
    fn test_greet() {
        let app = build_app(Mode::Production, false);
        let inputs = Inputs::from([("name".to_string(), Value::from("alice"))]);

        let execution = app.execute(&greet_route(), &inputs).unwrap();
        assert_eq!(execution.body(), "Hello, alice!\n");
    }

    #[test]
    fn test_greet_in_development() {
        let app = build_app(Mode::Development, false);
        let execution = app.execute(&greet_route(), &Inputs::new()).unwrap();
        assert_eq!(execution.body(), "[development] Hello, world!\n");
    }

    #[test]
    fn test_name_too_long() {
        let app = build_app(Mode::Production, false);
        let inputs = Inputs::from([("name".to_string(), Value::from("x".repeat(33)))]);

        let execution = app.execute(&greet_route(), &inputs).unwrap();
        assert_eq!(execution.response.status(), 400);
        assert!(execution.body().starts_with("Invalid 'name' param"));
    }

    #[test]
    fn test_failing_init() {
        let app = build_app(Mode::Production, true);
        assert!(app.execute(&greet_route(), &Inputs::new()).is_err());
    }
}
