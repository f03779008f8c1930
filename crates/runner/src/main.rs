use crossbook_gateway::AppState;
use crossbook_runner::{
    Bootstrap, EngineConfig, RunnerError, apply_env_overrides, format_outcome, load_orders,
    render_book, replay,
};
use log::info;
use std::sync::Arc;
use std::time::Duration;

fn print_help() {
    eprintln!(
        r#"crossbook - continuous double auction matching engine

USAGE:
    crossbook serve [--config <PATH>]
    crossbook replay <ORDERS.json> [--config <PATH>]
    crossbook help

COMMANDS:
    serve       Run the HTTP/WebSocket server
    replay      Submit a batch order file in order and print the final book
    help        Print this help message

ENVIRONMENT VARIABLES:
    HOST        Server host (default: 0.0.0.0)
    PORT        Server port (default: 50051)
    RUST_LOG    Log level filter

EXAMPLES:
    crossbook serve --config config.json
    PORT=9000 crossbook serve
    crossbook replay orders.json
"#
    );
}

enum Command {
    Serve { config: Option<String> },
    Replay { orders: String, config: Option<String> },
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let Some(command) = args.first() else {
        return Ok(Command::Help);
    };

    let mut config = None;
    let mut positional = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a path argument")?;
                config = Some(path.clone());
            }
            "--help" | "-h" => return Ok(Command::Help),
            arg if arg.starts_with('-') => return Err(format!("Unknown argument: {}", arg)),
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    match command.as_str() {
        "serve" if positional.is_empty() => Ok(Command::Serve { config }),
        "serve" => Err("serve takes no positional arguments".to_string()),
        "replay" => match positional.as_slice() {
            [orders] => Ok(Command::Replay {
                orders: orders.clone(),
                config,
            }),
            _ => Err("replay takes exactly one order file".to_string()),
        },
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, RunnerError> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            Ok(EngineConfig::from_file(path)?)
        }
        None => {
            info!("Using default configuration");
            Ok(EngineConfig::default())
        }
    }
}

async fn run_serve(config_path: Option<&str>) -> Result<(), RunnerError> {
    let mut config = load_config(config_path)?;
    apply_env_overrides(
        &mut config,
        std::env::var("HOST").ok(),
        std::env::var("PORT").ok(),
    );

    let boot = Bootstrap::new(config)?;
    let addr = boot.server_addr()?;
    let state = Arc::new(AppState::new(
        Arc::clone(&boot.gateway),
        Duration::from_millis(boot.config.stream.interval_ms),
    ));

    info!("REST API: http://{}/api/v1/", addr);
    info!("Book stream: ws://{}/ws/book", addr);
    crossbook_gateway::serve(state, addr).await?;
    Ok(())
}

fn run_replay(orders_path: &str, config_path: Option<&str>) -> Result<(), RunnerError> {
    let config = load_config(config_path)?;
    let requests = load_orders(orders_path)?;
    let boot = Bootstrap::new(config)?;

    let summary = replay(boot.gateway.as_ref(), requests);
    for (order_id, outcome) in &summary.outcomes {
        println!("{}", format_outcome(order_id, outcome));
    }
    println!();
    print!("{}", render_book(&boot.gateway.view(None)));
    println!(
        "submitted: {}  rejected: {}  trades: {}  matched quantity: {}",
        summary.submitted(),
        summary.rejected,
        summary.trades,
        summary.matched_quantity
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_help();
            std::process::exit(2);
        }
    };

    let result = match command {
        Command::Serve { config } => run_serve(config.as_deref()).await,
        Command::Replay { orders, config } => run_replay(&orders, config.as_deref()),
        Command::Help => {
            print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
