//! User profile, notification preferences and currency formatting.

use anyhow::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub avatar_url: String,
    /// Income minus expenses entered since the profile was reset
    pub total_balance: Decimal,
    pub notification_preferences: NotificationPreferences,
    pub currency: Currency,
}

impl UserProfile {
    /// Fresh profile for a newly registered user.
    pub fn new_user(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            avatar_url: default_avatar_url(&name),
            name,
            total_balance: Decimal::ZERO,
            notification_preferences: NotificationPreferences::default(),
            currency: Currency::default(),
        }
    }
}

/// Generated-initials avatar used until the user picks one.
pub fn default_avatar_url(name: &str) -> String {
    let encoded: String = name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect();
    format!("https://ui-avatars.com/api/?name={encoded}&background=random")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPreferences {
    pub bill_reminders: bool,
    pub budget_alerts: bool,
    pub weekly_reports: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            bill_reminders: true,
            budget_alerts: true,
            weekly_reports: false,
        }
    }
}

/// One of the three independent notification switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    BillReminders,
    BudgetAlerts,
    WeeklyReports,
}

impl NotificationPreferences {
    pub fn toggle(&mut self, kind: NotificationKind) -> bool {
        let flag = match kind {
            NotificationKind::BillReminders => &mut self.bill_reminders,
            NotificationKind::BudgetAlerts => &mut self.budget_alerts,
            NotificationKind::WeeklyReports => &mut self.weekly_reports,
        };
        *flag = !*flag;
        *flag
    }
}

impl FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "bill-reminders" => Ok(NotificationKind::BillReminders),
            "budget-alerts" => Ok(NotificationKind::BudgetAlerts),
            "weekly-reports" => Ok(NotificationKind::WeeklyReports),
            other => Err(anyhow::anyhow!(
                "unknown notification '{other}' (bill-reminders, budget-alerts, weekly-reports)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "JPY")]
    Jpy,
    #[serde(rename = "AUD")]
    Aud,
    #[serde(rename = "CAD")]
    Cad,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Inr,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Aud,
        Currency::Cad,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Aud => "A$",
            Currency::Cad => "C$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| anyhow::anyhow!("unsupported currency '{code}'"))
    }
}

/// Symbol, thousands separators, exactly two fraction digits.
pub fn format_currency(amount: Decimal, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        currency.symbol(),
        grouped,
        frac
    )
}
