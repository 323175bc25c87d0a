use std::io::{BufRead, Write};

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use crate::application::{build_category_report, AppError};
use crate::domain::{
    format_cents, format_expenses, sum_expenses, Ledger, DEFAULT_CURRENCY_SYMBOL,
};

/// Filter choice that selects every expense.
pub const ALL_CATEGORIES: &str = "All Categories";

/// Categories offered for new entries before anything has been recorded.
pub const DEFAULT_ENTRY_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Shopping",
    "Other",
];

/// One line of session input, parsed without a binary name.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
#[command(about = "Commands available in an expense tracker session")]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Record an expense
    Add {
        /// Amount spent (e.g., "250", "75.5")
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,

        /// Category label (e.g., "Food"); several words are joined with spaces
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        category: Vec<String>,
    },

    /// Show all recorded expenses
    #[command(alias = "show")]
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the total of all recorded expenses
    Total,

    /// Show expenses for one category (case-insensitive)
    Filter {
        /// Category to show; omit or pass "All Categories" for everything
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        category: Vec<String>,
    },

    /// List filter choices and suggested entry categories
    Categories,

    /// Per-category spending breakdown
    Report {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// End the session
    #[command(alias = "quit")]
    Exit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Symbol printed in front of every amount
    pub currency: String,
    /// Print a prompt before reading each command
    pub prompt: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY_SYMBOL.to_string(),
            prompt: false,
        }
    }
}

/// State owned by one run of the tracker. The ledger lives here and is lent to
/// each command handler; nothing outlives the session.
pub struct Session {
    ledger: Ledger,
    entry_categories: Vec<String>,
    settings: SessionSettings,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            ledger: Ledger::new(),
            entry_categories: DEFAULT_ENTRY_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            settings,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Choices for the category filter: the "all" sentinel, then every
    /// distinct recorded category.
    pub fn filter_choices(&self) -> Vec<String> {
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(self.ledger.unique_categories())
            .collect()
    }

    /// Categories suggested for new entries.
    pub fn entry_categories(&self) -> &[String] {
        &self.entry_categories
    }

    /// Read commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), AppError> {
        info!(currency = %self.settings.currency, "session started");
        let mut lines = input.lines();

        loop {
            if self.settings.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            match self.handle_line(&line, out) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) if err.is_recoverable() => report_error(out, &err)?,
                Err(err) => return Err(err),
            }
        }

        info!(expenses = self.ledger.len(), "session ended");
        Ok(())
    }

    /// Parse and execute a single line. Blank lines and `#` comments are ignored.
    pub fn handle_line<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> Result<LoopControl, AppError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let tokens =
            shell_words::split(trimmed).map_err(|e| AppError::InvalidCommand(e.to_string()))?;
        let parsed = match SessionLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => {
                write!(out, "{err}")?;
                return Ok(LoopControl::Continue);
            }
            Err(err) => return Err(err.into()),
        };

        self.execute(parsed.command, out)
    }

    pub fn execute<W: Write>(
        &mut self,
        command: SessionCommand,
        out: &mut W,
    ) -> Result<LoopControl, AppError> {
        debug!(?command, "executing command");
        let currency = self.settings.currency.as_str();

        match command {
            SessionCommand::Add { amount, category } => {
                let category = category.join(" ");
                run_add_command(
                    &mut self.ledger,
                    &mut self.entry_categories,
                    currency,
                    out,
                    amount.as_deref().unwrap_or_default(),
                    &category,
                )?;
            }
            SessionCommand::List { format } => {
                run_list_command(&self.ledger, currency, format, out)?;
            }
            SessionCommand::Total => run_total_command(&self.ledger, currency, out)?,
            SessionCommand::Filter { category } => {
                let category = category.join(" ");
                run_filter_command(&self.ledger, currency, &category, out)?;
            }
            SessionCommand::Categories => {
                let choices = self.filter_choices();
                writeln!(out, "Filter options:")?;
                for choice in &choices {
                    writeln!(out, "  {choice}")?;
                }
                writeln!(out, "Suggested categories:")?;
                for category in &self.entry_categories {
                    writeln!(out, "  {category}")?;
                }
            }
            SessionCommand::Report { format } => {
                run_report_command(&self.ledger, currency, format, out)?;
            }
            SessionCommand::Exit => return Ok(LoopControl::Exit),
        }

        Ok(LoopControl::Continue)
    }
}

fn report_error<W: Write>(out: &mut W, err: &AppError) -> Result<(), AppError> {
    warn!(error = %err, "rejected input");
    match err {
        AppError::Expense(e) => writeln!(
            out,
            "Invalid Input: Please enter a valid amount and category. {e}"
        )?,
        other => writeln!(out, "{}", other.to_string().trim_end())?,
    }
    Ok(())
}

fn run_add_command<W: Write>(
    ledger: &mut Ledger,
    entry_categories: &mut Vec<String>,
    currency: &str,
    out: &mut W,
    amount: &str,
    category: &str,
) -> Result<(), AppError> {
    let expense = ledger.add(amount, category)?;
    writeln!(
        out,
        "Expense added: {}{} for '{}'",
        currency,
        format_cents(expense.amount_cents()),
        expense.category()
    )?;

    if !entry_categories.iter().any(|c| c == expense.category()) {
        entry_categories.push(expense.category().to_string());
        entry_categories.sort();
    }
    Ok(())
}

fn run_list_command<W: Write>(
    ledger: &Ledger,
    currency: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(ledger.expenses())?)?;
        }
        OutputFormat::Table => {
            if ledger.is_empty() {
                writeln!(out, "⚠️ No expenses recorded yet.")?;
            } else {
                writeln!(out, "📋 All Expenses:")?;
                writeln!(out)?;
                writeln!(out, "{}", format_expenses(ledger, currency))?;
            }
        }
    }
    Ok(())
}

fn run_total_command<W: Write>(
    ledger: &Ledger,
    currency: &str,
    out: &mut W,
) -> Result<(), AppError> {
    writeln!(
        out,
        "💰 Total Expenses: {}{}",
        currency,
        format_cents(ledger.total())
    )?;
    Ok(())
}

fn run_filter_command<W: Write>(
    ledger: &Ledger,
    currency: &str,
    category: &str,
    out: &mut W,
) -> Result<(), AppError> {
    let category = category.trim();
    if category.is_empty() || category == ALL_CATEGORIES {
        return run_list_command(ledger, currency, OutputFormat::Table, out);
    }

    let filtered = ledger.filter_by_category(category);
    if filtered.is_empty() {
        writeln!(out, "❌ No expenses found for category '{category}'.")?;
        return Ok(());
    }

    writeln!(out, "🔍 Expenses for '{category}':")?;
    writeln!(out)?;
    writeln!(out, "{}", format_expenses(filtered.iter().copied(), currency))?;
    writeln!(out)?;
    writeln!(
        out,
        "Total for '{}': {}{}",
        category,
        currency,
        format_cents(sum_expenses(filtered))
    )?;
    Ok(())
}

fn run_report_command<W: Write>(
    ledger: &Ledger,
    currency: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    let report = build_category_report(ledger);

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Table => {
            if report.categories.is_empty() {
                writeln!(out, "⚠️ No expenses recorded yet.")?;
                return Ok(());
            }

            writeln!(out, "Category Spending Report ({currency})")?;
            writeln!(out)?;
            writeln!(
                out,
                "{:<20} {:>12} {:>8} {:>12} {:>8}",
                "CATEGORY", "TOTAL", "COUNT", "AVERAGE", "PERCENT"
            )?;
            writeln!(out, "{}", "-".repeat(65))?;

            for cat in &report.categories {
                writeln!(
                    out,
                    "{:<20} {:>12} {:>8} {:>12} {:>7.1}%",
                    truncate(&cat.category, 20),
                    format_cents(cat.total),
                    cat.count,
                    format_cents(cat.average),
                    cat.percentage
                )?;
            }

            writeln!(out, "{}", "-".repeat(65))?;
            writeln!(out, "{:<20} {:>12}", "TOTAL", format_cents(report.total))?;
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<SessionCommand, clap::Error> {
        let tokens = shell_words::split(line).unwrap();
        SessionLine::try_parse_from(tokens).map(|l| l.command)
    }

    #[test]
    fn test_parse_add_joins_category_words() {
        assert_eq!(
            parse("add 12.5 Eating out").unwrap(),
            SessionCommand::Add {
                amount: Some("12.5".into()),
                category: vec!["Eating".into(), "out".into()],
            }
        );
        assert_eq!(
            parse("add 12.5 'Eating out'").unwrap(),
            SessionCommand::Add {
                amount: Some("12.5".into()),
                category: vec!["Eating out".into()],
            }
        );
    }

    #[test]
    fn test_parse_add_negative_amount_reaches_validation() {
        assert_eq!(
            parse("add -5 Food").unwrap(),
            SessionCommand::Add {
                amount: Some("-5".into()),
                category: vec!["Food".into()],
            }
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            parse("show").unwrap(),
            SessionCommand::List {
                format: OutputFormat::Table
            }
        );
        assert_eq!(parse("quit").unwrap(), SessionCommand::Exit);
        assert_eq!(
            parse("report --format json").unwrap(),
            SessionCommand::Report {
                format: OutputFormat::Json
            }
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(parse("delete 1").is_err());
        assert!(parse("total now").is_err());
    }

    #[test]
    fn test_filter_choices_start_with_sentinel() {
        let mut session = Session::new(SessionSettings::default());
        assert_eq!(session.filter_choices(), vec![ALL_CATEGORIES.to_string()]);

        let mut out = Vec::new();
        session.handle_line("add 10 food", &mut out).unwrap();
        session.handle_line("add 10 Food", &mut out).unwrap();
        assert_eq!(
            session.filter_choices(),
            vec![ALL_CATEGORIES.to_string(), "Food".into(), "food".into()]
        );
    }

    #[test]
    fn test_entry_categories_grow_once() {
        let mut session = Session::new(SessionSettings::default());
        let mut out = Vec::new();
        session.handle_line("add 10 Books", &mut out).unwrap();
        session.handle_line("add 5 Books", &mut out).unwrap();
        session.handle_line("add 5 Food", &mut out).unwrap();

        assert_eq!(
            session.entry_categories(),
            &[
                "Books",
                "Entertainment",
                "Food",
                "Other",
                "Shopping",
                "Transport",
                "Utilities"
            ]
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Food", 20), "Food");
        assert_eq!(truncate("Électricité et gaz naturel", 10), "Électr...");
        assert_eq!(truncate("Food", 2), "...");
        assert_eq!(truncate("Food", 0), "...");
    }
}
