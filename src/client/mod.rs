//! Interactive terminal client
//!
//! Checks the service, collects a request through prompts, posts it and
//! renders the category, probabilities and local risk hints. Loops until
//! the user exits.

mod api;
mod form;
mod render;
mod risk;

pub use api::{ClientError, PredictionClient, ServiceStatus, API_URL, HEALTH_TIMEOUT, HEALTH_URL, PREDICT_TIMEOUT};
pub use form::{collect_request, IntRange, RealRange};
pub use render::{bar, category_message, percent, print_prediction};
pub use risk::{assess, RiskFactor};

use colored::*;
use dialoguer::Select;
use tracing::warn;

use crate::schema::PremiumRequest;

fn print_status(client: &PredictionClient, status: &ServiceStatus) {
    match status {
        ServiceStatus::Ready => {
            println!("  {} connected to {}", "✓".green(), client.health_url());
        }
        ServiceStatus::ModelNotReady(message) => {
            println!("  {} service reachable but the model is not ready", "!".yellow());
            if !message.is_empty() {
                println!("    {}", message.dimmed());
            }
        }
        ServiceStatus::Unreachable(reason) => {
            println!("  {} service unreachable: {}", "✗".red(), reason);
            println!("    {}", "start it with `premium-predictor serve`".dimmed());
        }
    }
}

fn print_error(err: &ClientError) {
    let heading = match err {
        ClientError::Connection { .. } => "Connection error",
        ClientError::Timeout { .. } => "Timeout",
        ClientError::Api { .. } => "API error",
        ClientError::Decode(_) => "Unexpected response",
    };
    println!();
    println!("  {} {}", heading.red().bold(), err);
    println!();
}

/// Run the client loop against the default endpoints or `base_url`
pub async fn run_client(base_url: Option<&str>) -> anyhow::Result<()> {
    let client = match base_url {
        Some(url) => PredictionClient::new().with_base_url(url),
        None => PredictionClient::new(),
    };
    let theme = crate::cli::theme();

    println!();
    println!("  {}", "Insurance Premium Predictor".white().bold());
    println!();
    print_status(&client, &client.check_health().await);

    let mut last_request = PremiumRequest::sample();
    loop {
        let items = &["Predict premium", "Check service status", "Exit"];
        println!();
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => {
                let request = collect_request(&theme, &last_request)?;
                match client.predict(&request).await {
                    Ok(prediction) => print_prediction(&prediction, &assess(&request)),
                    Err(e) => {
                        warn!(error = %e, "prediction request failed");
                        print_error(&e);
                    }
                }
                last_request = request;
            }
            Some(1) => print_status(&client, &client.check_health().await),
            _ => {
                println!();
                println!("  {}", "goodbye".dimmed());
                println!();
                break;
            }
        }
    }
    Ok(())
}
