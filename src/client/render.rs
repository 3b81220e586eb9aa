//! Terminal rendering of a prediction

use colored::*;

use super::risk::RiskFactor;
use crate::inference::Prediction;

const BAR_WIDTH: usize = 40;

pub fn category_message(category: &str) -> &'static str {
    match category {
        "Low" => "Good news: you are likely to qualify for lower premium rates.",
        "Medium" => "You are likely to be offered standard premium rates.",
        "High" => "Higher premium rates may apply to your profile.",
        _ => "The model returned an unrecognized category.",
    }
}

pub fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Horizontal bar of `width` cells, filled in proportion to `p`
pub fn bar(p: f64, width: usize) -> String {
    let filled = ((p.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn paint(category: &str, text: &str) -> ColoredString {
    match category {
        "Low" => text.green().bold(),
        "Medium" => text.yellow().bold(),
        "High" => text.red().bold(),
        _ => text.white().bold(),
    }
}

pub fn print_prediction(prediction: &Prediction, risks: &[RiskFactor]) {
    let category = prediction.premium_category.as_str();

    println!();
    println!("  {} {}", "Premium category".dimmed(), paint(category, category));
    println!("  {}", category_message(category));
    println!("  {} {}", "Confidence".dimmed(), percent(prediction.confidence).white().bold());

    println!();
    println!("  {}", "Probabilities".white().bold());
    for (label, &p) in prediction.probabilities.iter() {
        println!("  {:<8} {} {:>6}", label, paint(label, &bar(p, BAR_WIDTH)), percent(p));
    }

    println!();
    println!("  {}", "Risk factors (local hints, not model output)".white().bold());
    if risks.is_empty() {
        println!("  {}", "No notable risk factors.".green());
    } else {
        for risk in risks {
            println!("  {} {}", "•".yellow(), risk);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.725), "72.5%");
        assert_eq!(percent(1.0), "100.0%");
    }

    #[test]
    fn test_bar_proportions() {
        assert_eq!(bar(0.0, 10), "░".repeat(10));
        assert_eq!(bar(1.0, 10), "█".repeat(10));
        assert_eq!(bar(0.5, 10).chars().filter(|&c| c == '█').count(), 5);
        assert_eq!(bar(1.7, 4).chars().count(), 4);
    }

    #[test]
    fn test_category_messages() {
        assert!(category_message("Low").contains("lower"));
        assert!(category_message("Medium").contains("standard"));
        assert!(category_message("High").contains("Higher"));
    }
}
