//! Line-oriented session loop over an `AppState`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::debug;
use spendwise_core::time::local_today;
use spendwise_core::{
    format_currency, generate_avatar, spending_advice, year_choices, AppState, BudgetTable, Category, Currency,
    InsightService, NotificationKind, Period, ProfileUpdate, TransactionType,
};
use spendwise_export::export_all;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::input::{bill_from_line, parse_amount, transaction_from_line};
use crate::render;

const HELP: &str = "\
Commands:
  dashboard [YEAR]            balance, monthly chart, recent activity
  add expense|income|bill     record an entry (date, title, amount[, category])
  pay <BILL-ID>               mark a bill as paid
  bills                       upcoming and paid bills
  expenses [YYYY-MM]          spending against budgets for a month
  reports [YYYY-MM]           category breakdown for a month
  prev | next                 move the selected month
  budget show | budget edit   view or replace monthly budgets
  advice                      AI spending advice
  profile                     show profile
  profile name <NAME>
  profile currency <CODE>     USD INR EUR GBP JPY AUD CAD
  profile avatar <URL>        use an image link as the profile picture
  profile notify <bill-reminders|budget-alerts|weekly-reports>
  avatar <DESCRIPTION>        generate a profile picture
  export [DIR]                write transactions and bills as CSV
  help
  logout | exit";

#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodView {
    Expenses,
    Reports,
}

pub struct Shell<'a, R, W> {
    state: AppState,
    service: Option<&'a dyn InsightService>,
    input: R,
    out: W,
    clock: Clock,
    timezone: String,
    period: Period,
    view: PeriodView,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        state: AppState,
        service: Option<&'a dyn InsightService>,
        input: R,
        out: W,
        timezone: &str,
        clock: Clock,
    ) -> Result<Self> {
        let today = local_today(clock.now(), timezone)?;
        let period = state.initial_period(today);
        Ok(Self {
            state,
            service,
            input,
            out,
            clock,
            timezone: timezone.to_string(),
            period,
            view: PeriodView::Expenses,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn today(&self) -> Result<NaiveDate> {
        local_today(self.clock.now(), &self.timezone)
    }

    fn currency(&self) -> Currency {
        self.state.profile().currency
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).context("read input")? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        match self.read_line(prompt)? {
            Some(line) => Ok(line),
            None => bail!("Cancelled"),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let name = self.state.profile().name.clone();
        writeln!(self.out, "Signed in as {name}. Type 'help' for commands.")?;
        loop {
            let Some(line) = self.read_line("spendwise> ")? else {
                break;
            };
            match self.dispatch(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Logout) => break,
                Err(e) => writeln!(self.out, "Error: {e}")?,
            }
        }
        writeln!(self.out, "Signed out.")?;
        Ok(())
    }

    fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(Flow::Continue);
        };
        let rest: Vec<&str> = words.collect();
        debug!("command {cmd} {rest:?}");

        match cmd.to_lowercase().as_str() {
            "help" | "?" => writeln!(self.out, "{HELP}")?,
            "dashboard" | "home" => self.dashboard(rest.first().copied())?,
            "add" => self.add(rest.first().copied().unwrap_or(""))?,
            "pay" => self.pay(rest.first().copied().unwrap_or(""))?,
            "bills" => self.bills()?,
            "expenses" => {
                self.select_period(PeriodView::Expenses, rest.first().copied())?;
                self.show_period()?;
            }
            "reports" => {
                self.select_period(PeriodView::Reports, rest.first().copied())?;
                self.show_period()?;
            }
            "prev" => {
                self.period = self.period.previous();
                self.show_period()?;
            }
            "next" => {
                self.period = self.period.next();
                self.show_period()?;
            }
            "budget" | "budgets" => match rest.first().copied().unwrap_or("show") {
                "show" => {
                    let text = render::render_budgets(self.state.budgets(), self.currency());
                    write!(self.out, "{text}")?;
                }
                "edit" => self.edit_budgets()?,
                other => bail!("Unknown budget command '{other}' (show, edit)"),
            },
            "advice" => self.advice()?,
            "profile" => self.profile(&rest)?,
            "avatar" => self.avatar(&rest.join(" "))?,
            "export" => self.export(rest.first().copied())?,
            "logout" | "exit" | "quit" => return Ok(Flow::Logout),
            other => bail!("Unknown command '{other}'. Type 'help' for commands."),
        }
        Ok(Flow::Continue)
    }

    fn dashboard(&mut self, year: Option<&str>) -> Result<()> {
        let today = self.today()?;
        let year = match year {
            Some(y) => y.parse::<i32>().with_context(|| format!("Invalid year '{y}'"))?,
            None => today.year(),
        };
        let highlight = (year == today.year()).then(|| today.month());
        let years = year_choices(self.state.transactions(), today.year());
        let text = render::render_dashboard(&self.state.dashboard(year), &self.state.profile().name, &years, highlight);
        write!(self.out, "{text}")?;
        Ok(())
    }

    fn add(&mut self, kind: &str) -> Result<()> {
        let today = self.today()?;
        match kind.to_lowercase().as_str() {
            "bill" => {
                let line = self.ask("date (YYYY-MM-DD, blank for today), title, amount: ")?;
                let currency = self.currency();
                let bill = self.state.add_bill(bill_from_line(&line, today)?)?;
                let msg = format!(
                    "Added bill [{}] {} {} due {}",
                    bill.id,
                    bill.title,
                    format_currency(bill.amount, currency),
                    bill.due_date.format("%Y-%m-%d")
                );
                writeln!(self.out, "{msg}")?;
            }
            "expense" | "income" => {
                let kind = TransactionType::from_str(kind)?;
                let default = match kind {
                    TransactionType::Expense => Category::Food,
                    TransactionType::Income => Category::Salary,
                };
                let prompt = format!("date (YYYY-MM-DD, blank for today), title, amount, category [{default}]: ");
                let line = self.ask(&prompt)?;
                let entry = transaction_from_line(&line, kind, today)?;
                let currency = self.currency();
                let t = self.state.add_transaction(entry)?;
                let msg = format!(
                    "Added {} {} ({}) on {}",
                    t.kind.as_str().to_lowercase(),
                    t.title,
                    format_currency(t.amount, currency),
                    t.date.format("%Y-%m-%d")
                );
                writeln!(self.out, "{msg}")?;
                let balance = format_currency(self.state.profile().total_balance, currency);
                writeln!(self.out, "Balance: {balance}")?;
            }
            "" => bail!("Usage: add expense|income|bill"),
            other => bail!("Unknown entry type '{other}' (expense, income, bill)"),
        }
        Ok(())
    }

    fn pay(&mut self, id: &str) -> Result<()> {
        if id.is_empty() {
            bail!("Usage: pay <BILL-ID>");
        }
        let title = self.state.mark_bill_paid(id)?.title.clone();
        writeln!(self.out, "Marked {title} as paid.")?;
        Ok(())
    }

    fn bills(&mut self) -> Result<()> {
        let now = self.clock.now();
        let text = render::render_bills(&self.state.bills_overview(now), self.state.bills(), self.currency(), now);
        write!(self.out, "{text}")?;
        Ok(())
    }

    fn select_period(&mut self, view: PeriodView, arg: Option<&str>) -> Result<()> {
        if let Some(p) = arg {
            self.period = Period::from_str(p)?;
        }
        self.view = view;
        Ok(())
    }

    fn show_period(&mut self) -> Result<()> {
        let text = match self.view {
            PeriodView::Expenses => render::render_expenses(&self.state.expenses(self.period), self.currency()),
            PeriodView::Reports => render::render_report(&self.state.report(self.period), self.currency()),
        };
        write!(self.out, "{text}")?;
        writeln!(self.out, "{}", render::period_hint(self.period))?;
        Ok(())
    }

    /// Prompts every budgeted category; blank keeps the current value.
    /// Nothing changes unless all values are valid.
    fn edit_budgets(&mut self) -> Result<()> {
        let mut table = BudgetTable::new();
        for category in Category::budgeted() {
            let current = self.state.budgets().get(category);
            let line = self.ask(&format!("{category} [{}]: ", current.normalize()))?;
            let amount = if line.is_empty() { current } else { parse_amount(&line)? };
            table.set(category, amount)?;
        }
        self.state.replace_budgets(table);
        writeln!(self.out, "Budgets updated.")?;
        Ok(())
    }

    fn advice(&mut self) -> Result<()> {
        writeln!(self.out, "Analyzing your spending...")?;
        let advice = spending_advice(
            self.service,
            self.state.transactions(),
            self.state.profile().total_balance,
        );
        writeln!(self.out, "{advice}")?;
        Ok(())
    }

    fn profile(&mut self, args: &[&str]) -> Result<()> {
        match args.first().copied() {
            None => {
                let text = render::render_profile(self.state.profile());
                write!(self.out, "{text}")?;
            }
            Some("name") => {
                let name = args[1..].join(" ");
                self.state.update_profile(ProfileUpdate {
                    name: Some(name),
                    ..Default::default()
                })?;
                let name = self.state.profile().name.clone();
                writeln!(self.out, "Name set to {name}.")?;
            }
            Some("currency") => {
                let code = args.get(1).copied().unwrap_or("");
                let currency = Currency::from_str(code)?;
                self.state.update_profile(ProfileUpdate {
                    currency: Some(currency),
                    ..Default::default()
                })?;
                writeln!(self.out, "Currency set to {} ({}).", currency.code(), currency.symbol())?;
            }
            Some("avatar") => {
                let url = args.get(1).copied().unwrap_or("");
                if url.is_empty() {
                    bail!("Usage: profile avatar <URL>");
                }
                self.state.update_profile(ProfileUpdate {
                    avatar_url: Some(url.to_string()),
                    ..Default::default()
                })?;
                writeln!(self.out, "Avatar set to {url}.")?;
            }
            Some("notify") => {
                let kind = NotificationKind::from_str(args.get(1).copied().unwrap_or(""))?;
                let mut prefs = self.state.profile().notification_preferences;
                let on = prefs.toggle(kind);
                self.state.update_profile(ProfileUpdate {
                    notification_preferences: Some(prefs),
                    ..Default::default()
                })?;
                writeln!(self.out, "{} {}.", args[1], if on { "on" } else { "off" })?;
            }
            Some(other) => bail!("Unknown profile command '{other}' (name, currency, avatar, notify)"),
        }
        Ok(())
    }

    fn avatar(&mut self, description: &str) -> Result<()> {
        if description.trim().is_empty() {
            bail!("Usage: avatar <DESCRIPTION>");
        }
        writeln!(self.out, "Generating avatar...")?;
        match generate_avatar(self.service, description) {
            Some(image) => {
                self.state.update_profile(ProfileUpdate {
                    avatar_url: Some(image),
                    ..Default::default()
                })?;
                writeln!(self.out, "Avatar updated.")?;
            }
            None => writeln!(self.out, "Could not generate an avatar right now.")?,
        }
        Ok(())
    }

    fn export(&mut self, dir: Option<&str>) -> Result<()> {
        let dir = PathBuf::from(dir.unwrap_or("."));
        let summary = export_all(&dir, self.today()?, self.state.transactions(), self.state.bills())?;
        writeln!(self.out, "{}", summary.message())?;
        for path in &summary.written {
            writeln!(self.out, "  {}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::io::Cursor;

    struct CannedService;

    impl InsightService for CannedService {
        fn generate_text(&self, _prompt: &str) -> Result<String> {
            Ok("- Great job on groceries.".to_string())
        }

        fn generate_image(&self, _prompt: &str) -> Result<Option<String>> {
            Ok(Some("data:image/png;base64,AAAA".to_string()))
        }
    }

    fn at_april_10() -> Clock {
        Clock::Fixed(Utc.with_ymd_and_hms(2024, 4, 10, 15, 0, 0).unwrap())
    }

    fn run_script(state: AppState, service: Option<&dyn InsightService>, script: &str) -> (AppState, String) {
        let mut out = Vec::new();
        let state = {
            let mut shell = Shell::new(state, service, Cursor::new(script.to_string()), &mut out, "UTC", at_april_10())
                .unwrap();
            shell.run().unwrap();
            shell.state().clone()
        };
        (state, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_add_expense_updates_balance() {
        let (state, out) = run_script(
            AppState::demo("Alex"),
            None,
            "add expense\n2024-04-09, \"Tacos, salsa\", 20.01, Food\nlogout\n",
        );
        assert_eq!(state.profile().total_balance, Decimal::new(5_974_499, 2));
        assert_eq!(state.transactions()[0].title, "Tacos, salsa");
        assert!(out.contains("Added expense Tacos, salsa ($20.01) on 2024-04-09"));
        assert!(out.ends_with("Signed out.\n"));
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let (state, out) = run_script(
            AppState::new_user("Robin"),
            None,
            "frobnicate\nadd expense\n2024-04-09, , 5\npay 999\nbills\n",
        );
        assert!(out.contains("Error: Unknown command 'frobnicate'"));
        assert!(out.contains("Error: Title cannot be empty"));
        assert!(out.contains("Error: Bill '999' not found"));
        assert!(out.contains("All bills are paid."));
        assert!(state.transactions().is_empty());
    }

    #[test]
    fn test_pay_bill_keeps_balance() {
        let (state, out) = run_script(AppState::demo("Alex"), None, "pay 101\nbills\nexit\n");
        assert!(out.contains("Marked Electricity Bill as paid."));
        assert!(out.contains("Next bill: Internet - Fiber $60.00 (Due in 10 days)"));
        assert_eq!(state.profile().total_balance, Decimal::new(5_976_500, 2));
    }

    #[test]
    fn test_period_navigation() {
        let (_state, out) = run_script(AppState::demo("Alex"), None, "expenses\nnext\nreports 2024-04\nprev\n");
        assert!(out.contains("Expenses for April 2024"));
        assert!(out.contains("Expenses for May 2024"));
        assert!(out.contains("Report for April 2024"));
        assert!(out.contains("Report for March 2024"));
        assert!(out.contains("No expenses this month."));
    }

    #[test]
    fn test_budget_edit_replaces_table() {
        // Food, Shopping, Transport, Bills, Health, Entertainment, Other
        let (state, out) = run_script(AppState::demo("Alex"), None, "budget edit\n650\n\n0\n\n\n\n\nbudget show\n");
        assert!(out.contains("Budgets updated."));
        assert_eq!(state.budgets().get(Category::Food), Decimal::from(650));
        assert_eq!(state.budgets().get(Category::Shopping), Decimal::from(1000));
        assert_eq!(state.budgets().get(Category::Transport), Decimal::ZERO);
        assert!(out.contains("Food          $650.00"));
    }

    #[test]
    fn test_budget_edit_rejects_negative() {
        let (state, out) = run_script(AppState::demo("Alex"), None, "budget edit\n-5\n");
        assert!(out.contains("Error: Budget cannot be negative"));
        assert_eq!(state.budgets().get(Category::Food), Decimal::from(500));
    }

    #[test]
    fn test_sub_cent_budget_then_expenses() {
        let (state, out) = run_script(
            AppState::demo("Alex"),
            None,
            "budget edit

0.0000000000000000000000000001





expenses 2024-04
",
        );
        assert!(out.contains("Budgets updated."));
        assert_eq!(state.budgets().get(Category::Shopping), Decimal::ZERO);
        let shopping = out.lines().find(|l| l.contains("Shopping") && l.contains("$1,427.00")).unwrap();
        assert!(shopping.contains("100%"));
        assert!(!shopping.contains("OVER BUDGET"));
    }

    #[test]
    fn test_huge_amounts_are_rejected() {
        let (state, out) = run_script(
            AppState::demo("Alex"),
            None,
            "add income
2024-04-09, Jackpot, 79228162514264337593543950335
budget edit
99999999999999
expenses
",
        );
        assert!(out.contains("Error: Amount cannot exceed 1000000000000"));
        assert!(out.contains("Error: Budget cannot exceed 1000000000000"));
        assert_eq!(state.transactions().len(), 6);
        assert_eq!(state.profile().total_balance, Decimal::new(5_976_500, 2));
        assert!(out.contains("Expenses for April 2024"));
    }

    #[test]
    fn test_advice_and_avatar() {
        let service = CannedService;
        let (state, out) = run_script(AppState::demo("Alex"), Some(&service), "advice\navatar a red fox\n");
        assert!(out.contains("- Great job on groceries."));
        assert!(out.contains("Avatar updated."));
        assert_eq!(state.profile().avatar_url, "data:image/png;base64,AAAA");

        let (_state, out) = run_script(AppState::demo("Alex"), None, "advice\n");
        assert!(out.contains("Please configure your API Key to get AI insights."));
    }

    #[test]
    fn test_profile_commands() {
        let (state, out) = run_script(
            AppState::new_user("Robin"),
            None,
            "profile name Robin Banks\nprofile currency eur\nprofile notify weekly-reports\nprofile name  \n",
        );
        assert_eq!(state.profile().name, "Robin Banks");
        assert_eq!(state.profile().currency, Currency::Eur);
        assert!(state.profile().notification_preferences.weekly_reports);
        assert!(out.contains("weekly-reports on."));
        assert!(out.contains("Error: Name cannot be empty"));
    }

    #[test]
    fn test_profile_avatar_url() {
        let (state, out) = run_script(
            AppState::new_user("Robin"),
            None,
            "profile avatar https://example.com/me.png
profile avatar
profile
",
        );
        assert_eq!(state.profile().avatar_url, "https://example.com/me.png");
        assert!(out.contains("Avatar set to https://example.com/me.png."));
        assert!(out.contains("Error: Usage: profile avatar <URL>"));
        assert!(out.contains("Avatar:   https://example.com/me.png"));
    }

    #[test]
    fn test_export_from_shell() {
        let dir = tempfile::tempdir().unwrap();
        let script = format!("export {}\n", dir.path().display());
        let (_state, out) = run_script(AppState::demo("Alex"), None, &script);
        assert!(out.contains("Data Exported Successfully"));
        assert!(dir.path().join("spendwise_bills_2024-04-10.csv").exists());

        let empty = tempfile::tempdir().unwrap();
        let script = format!("export {}\n", empty.path().display());
        let (_state, out) = run_script(AppState::new_user("Robin"), None, &script);
        assert!(out.contains("No data to export"));
    }

    #[test]
    fn test_dashboard_highlights_current_month() {
        let (_state, out) = run_script(AppState::demo("Alex"), None, "dashboard\ndashboard 2023\n");
        assert!(out.contains("Income vs expense, 2024"));
        assert!(out.contains("*Apr"));
        assert!(out.contains("Years: [2024] 2023 2022"));
        assert!(out.contains("Income vs expense, 2023"));
        assert!(out.contains("Years: 2024 [2023] 2022"));
    }
}
