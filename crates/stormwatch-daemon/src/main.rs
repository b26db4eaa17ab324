mod config;
mod service;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/config.json";

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  stormwatch-daemon check [config.json]                                Run a single check of all locations");
    eprintln!("  stormwatch-daemon service [config.json]                              Run as a continuous service");
    eprintln!("  stormwatch-daemon list [config.json]                                 List configured locations and alerts");
    eprintln!("  stormwatch-daemon add-location <config.json> <name> <lat> <lon>      Add a location");
    eprintln!("  stormwatch-daemon add-alert <config.json> <location> <condition> <operator> <value> <message>");
    eprintln!("                                                                       Add an alert rule to a location");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stormwatch=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = |index: usize| -> String {
        args.get(index)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    };

    match args.get(1).map(String::as_str) {
        Some("check") => {
            let service = service::Service::init(&config_path(2))?;
            service.check_all().await;
            Ok(())
        }
        Some("service") => service::run(&config_path(2)).await,
        Some("list") => list_locations(&config_path(2)),
        Some("add-location") => {
            if args.len() != 6 {
                print_usage();
                anyhow::bail!("add-location needs <config> <name> <latitude> <longitude>");
            }
            let latitude: f64 = args[4].parse().context("latitude must be a number")?;
            let longitude: f64 = args[5].parse().context("longitude must be a number")?;
            add_location(&args[2], &args[3], latitude, longitude)
        }
        Some("add-alert") => {
            if args.len() != 8 {
                print_usage();
                anyhow::bail!(
                    "add-alert needs <config> <location> <condition> <operator> <value> <message>"
                );
            }
            let value: f64 = args[6].parse().context("threshold value must be a number")?;
            add_alert(&args[2], &args[3], &args[4], &args[5], value, &args[7])
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
fn list_locations(config_path: &str) -> Result<()> {
    let config = config::AppConfig::load(config_path)?;

    if config.rules.locations.is_empty() {
        println!("No locations configured");
        return Ok(());
    }

    println!("Configured locations ({}):", config.rules.locations.len());
    for (i, location) in config.rules.locations.iter().enumerate() {
        println!(
            "{}. {} ({}, {}) - {} alerts",
            i + 1,
            location.name,
            location.latitude,
            location.longitude,
            location.alerts.len()
        );
        for (j, alert) in location.alerts.iter().enumerate() {
            println!(
                "   {}. {} {} {} - {}",
                j + 1,
                alert.condition,
                alert.operator,
                alert.value,
                if alert.message.is_empty() {
                    "No message"
                } else {
                    alert.message.as_str()
                }
            );
        }
    }
    Ok(())
}

/// Config edits work on the raw JSON document rather than the typed config,
/// so keys this build does not know about survive the rewrite.
fn load_document(config_path: &str) -> Result<Value> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config {config_path}"))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse config {config_path}"))
}

fn save_document(config_path: &str, doc: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(config_path, content)
        .with_context(|| format!("failed to write config {config_path}"))
}

#[allow(clippy::print_stdout)]
fn add_location(config_path: &str, name: &str, latitude: f64, longitude: f64) -> Result<()> {
    let mut doc = load_document(config_path)?;
    let root = doc.as_object_mut().context("config root must be an object")?;
    let locations = root
        .entry("locations")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .context("locations must be an array")?;

    if locations.iter().any(|loc| loc["name"] == name) {
        println!("Location '{name}' already exists");
        return Ok(());
    }

    locations.push(json!({
        "name": name,
        "latitude": latitude,
        "longitude": longitude,
        "alerts": [],
    }));
    save_document(config_path, &doc)?;
    println!("Added location '{name}' at {latitude}, {longitude}");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn add_alert(
    config_path: &str,
    location: &str,
    condition: &str,
    operator: &str,
    value: f64,
    message: &str,
) -> Result<()> {
    let mut doc = load_document(config_path)?;
    let locations = doc
        .get_mut("locations")
        .and_then(Value::as_array_mut)
        .context("config has no locations array")?;

    let Some(entry) = locations.iter_mut().find(|loc| loc["name"] == location) else {
        println!("Location '{location}' not found in configuration");
        return Ok(());
    };

    let alerts = entry
        .as_object_mut()
        .context("location entry must be an object")?
        .entry("alerts")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .context("alerts must be an array")?;

    let duplicate = alerts.iter().any(|alert| {
        alert["condition"] == condition && alert["operator"] == operator && alert["value"] == value
    });
    if duplicate {
        println!("Alert already exists for {location}");
        return Ok(());
    }

    alerts.push(json!({
        "condition": condition,
        "operator": operator,
        "value": value,
        "message": message,
    }));
    save_document(config_path, &doc)?;
    println!("Added alert for {condition} {operator} {value} to '{location}'");
    Ok(())
}
