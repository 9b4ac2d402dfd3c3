//! Seam to the external text/image generation service.
//!
//! The service itself lives in the CLI; this module builds prompts and
//! collapses every failure into the fixed user-facing outcomes.

use anyhow::Result;
use log::warn;
use rust_decimal::Decimal;

use crate::finance::Transaction;

pub const ADVICE_NOT_CONFIGURED: &str = "Please configure your API Key to get AI insights.";
pub const ADVICE_UNAVAILABLE: &str = "Sorry, I couldn't analyze your data right now. Please try again later.";
pub const ADVICE_EMPTY: &str = "Unable to generate advice at this time.";

/// External generation backend.
pub trait InsightService {
    /// Free-form text for a prompt.
    fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Image for a description as a `data:<mime>;base64,...` reference, if any.
    fn generate_image(&self, prompt: &str) -> Result<Option<String>>;
}

/// One line per record: `YYYY-MM-DD: Title - $amount (TYPE - Category)`.
pub fn transaction_summary(transactions: &[Transaction]) -> String {
    transactions
        .iter()
        .map(|t| {
            format!(
                "{}: {} - ${} ({} - {})",
                t.date.format("%Y-%m-%d"),
                t.title,
                t.amount.normalize(),
                t.kind,
                t.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn advice_prompt(transactions: &[Transaction], balance: Decimal) -> String {
    format!(
        "You are a friendly and strict financial advisor for an app called SpendWise.\n\
Current Balance: ${}\n\
Recent Transactions:\n\
{}\n\
\n\
Analyze the spending habits briefly.\n\
1. Give 1 specific compliment.\n\
2. Give 1 specific warning or area of improvement.\n\
3. Suggest a quick tip to save money based on these categories.\n\
\n\
Keep the tone modern, encouraging, and concise (max 100 words). Format with bullet points.",
        balance.normalize(),
        transaction_summary(transactions)
    )
}

/// Advice text to show verbatim. Never fails.
pub fn spending_advice(service: Option<&dyn InsightService>, transactions: &[Transaction], balance: Decimal) -> String {
    let Some(service) = service else {
        warn!("advice requested without an API key");
        return ADVICE_NOT_CONFIGURED.to_string();
    };

    match service.generate_text(&advice_prompt(transactions, balance)) {
        Ok(text) if text.trim().is_empty() => ADVICE_EMPTY.to_string(),
        Ok(text) => text,
        Err(e) => {
            warn!("advice request failed: {e:#}");
            ADVICE_UNAVAILABLE.to_string()
        }
    }
}

pub fn avatar_prompt(description: &str) -> String {
    format!(
        "A cool, high-quality profile picture avatar of {}, digital art style, centered, 1:1 aspect ratio",
        description.trim()
    )
}

/// Generated avatar reference, or `None` when unavailable.
pub fn generate_avatar(service: Option<&dyn InsightService>, description: &str) -> Option<String> {
    if description.trim().is_empty() {
        return None;
    }
    let service = service?;
    match service.generate_image(&avatar_prompt(description)) {
        Ok(image) => image,
        Err(e) => {
            warn!("avatar generation failed: {e:#}");
            None
        }
    }
}
