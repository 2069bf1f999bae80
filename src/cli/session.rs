use std::fs::File;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::application::{ExpenseInput, ExpenseService, parse_amount};
use crate::domain::{Category, ExpenseRecord, format_cents};
use crate::io::Exporter;

/// One line typed into the session prompt.
#[derive(Parser, Debug)]
#[command(name = "expensa", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Record an expense
    Add {
        /// Amount spent (e.g., "50.00" or "50")
        amount: String,

        /// Food, Transport, Entertainment, Shopping, Bills, Other
        #[arg(short, long)]
        category: String,

        /// Cash, Credit Card, Debit Card, UPI, Other
        #[arg(short, long, default_value = "Cash")]
        payment: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete the most recently added expense
    #[command(name = "delete-last")]
    DeleteLast,

    /// Show every expense in entry order
    List,

    /// Show the total spent
    Total,

    /// Show totals per category
    Categories,

    /// Show totals per month
    Months,

    /// Show totals per day
    Days,

    /// Show expenses of a single category
    Filter {
        category: String,
    },

    /// Search every field for a keyword (case-insensitive)
    Search {
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        term: Vec<String>,
    },

    /// Show expenses ordered by amount
    Sort {
        /// Largest amounts first
        #[arg(long)]
        desc: bool,
    },

    /// Show, set or clear the budget limit
    Budget {
        /// New limit (e.g., "5000")
        amount: Option<String>,

        /// Remove the budget limit
        #[arg(long, conflicts_with = "amount")]
        clear: bool,
    },

    /// Export the session as CSV or JSON
    Export {
        /// Output file (printed here if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a command line into arguments. Single or double quotes group words.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        bail!("Unterminated quote in: {}", line);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// An interactive session: owns the expense service and renders results to `out`.
pub struct Session<W: Write> {
    service: ExpenseService,
    currency: String,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(service: ExpenseService, currency: impl Into<String>, out: W) -> Self {
        Self {
            service,
            currency: currency.into(),
            out,
        }
    }

    pub fn service(&self) -> &ExpenseService {
        &self.service
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until end of input or `quit`. Failing commands are
    /// reported and the session continues.
    pub fn run<R: BufRead>(&mut self, input: R, prompt: bool) -> Result<()> {
        if prompt {
            writeln!(self.out, "Personal Expense Tracker (type 'help' for commands)")?;
        }
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read command")?;

            match self.execute(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(self.out, "Error: {:#}", e)?,
            }
        }
        Ok(())
    }

    /// Execute a single command line.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() || tokens[0].starts_with('#') {
            return Ok(Flow::Continue);
        }

        let parsed = match SessionLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
            Err(e) => bail!("{}", e.render().to_string().trim_end()),
        };

        self.dispatch(parsed.command)
    }

    fn dispatch(&mut self, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::Add {
                amount,
                category,
                payment,
                date,
                notes,
            } => {
                let date = date.unwrap_or_else(|| Local::now().date_naive().to_string());
                let id = self.service.add_expense_input(ExpenseInput {
                    date,
                    category,
                    amount,
                    notes,
                    payment_method: payment,
                })?;
                if let Some(record) = self.service.ledger().get(id) {
                    writeln!(
                        self.out,
                        "Expense added: {}{} {} on {} ({})",
                        self.currency,
                        format_cents(record.amount_cents),
                        record.category,
                        record.date.format("%Y-%m-%d"),
                        record.payment_method
                    )?;
                }
                self.print_budget_alert()?;
            }

            SessionCommand::DeleteLast => match self.service.delete_last() {
                Some(record) => writeln!(
                    self.out,
                    "Last expense entry deleted: {}{} {} on {}",
                    self.currency,
                    format_cents(record.amount_cents),
                    record.category,
                    record.date.format("%Y-%m-%d")
                )?,
                None => writeln!(self.out, "No expenses to delete.")?,
            },

            SessionCommand::List => {
                let records = self.service.list().to_vec();
                self.print_records(&records)?;
            }

            SessionCommand::Total => {
                writeln!(
                    self.out,
                    "Total Spent: {}{}",
                    self.currency,
                    format_cents(self.service.total())
                )?;
                self.print_budget_alert()?;
            }

            SessionCommand::Categories => {
                let report = self.service.category_report();
                if report.categories.is_empty() {
                    writeln!(self.out, "No expenses recorded yet.")?;
                    return Ok(Flow::Continue);
                }
                writeln!(
                    self.out,
                    "{:<15} {:>12} {:>6} {:>12} {:>8}",
                    "CATEGORY", "TOTAL", "COUNT", "AVERAGE", "PERCENT"
                )?;
                writeln!(self.out, "{}", "-".repeat(57))?;
                for cat in &report.categories {
                    writeln!(
                        self.out,
                        "{:<15} {:>12} {:>6} {:>12} {:>7.1}%",
                        cat.category.as_str(),
                        format_cents(cat.total),
                        cat.count,
                        format_cents(cat.average),
                        cat.percentage
                    )?;
                }
                writeln!(self.out, "{}", "-".repeat(57))?;
                writeln!(self.out, "{:<15} {:>12}", "TOTAL", format_cents(report.total))?;
            }

            SessionCommand::Months => {
                let report = self.service.monthly_report();
                if report.months.is_empty() {
                    writeln!(self.out, "No expenses recorded yet.")?;
                    return Ok(Flow::Continue);
                }
                writeln!(self.out, "{:<18} {:>12} {:>6}", "MONTH", "TOTAL", "COUNT")?;
                writeln!(self.out, "{}", "-".repeat(38))?;
                for month in &report.months {
                    writeln!(
                        self.out,
                        "{:<18} {:>12} {:>6}",
                        month.label,
                        format_cents(month.total),
                        month.count
                    )?;
                }
            }

            SessionCommand::Days => {
                let report = self.service.daily_report();
                if report.days.is_empty() {
                    writeln!(self.out, "No expenses recorded yet.")?;
                    return Ok(Flow::Continue);
                }
                writeln!(self.out, "{:<12} {:>12} {:>6}", "DATE", "TOTAL", "COUNT")?;
                writeln!(self.out, "{}", "-".repeat(32))?;
                for day in &report.days {
                    writeln!(
                        self.out,
                        "{:<12} {:>12} {:>6}",
                        day.date.format("%Y-%m-%d"),
                        format_cents(day.total),
                        day.count
                    )?;
                }
            }

            SessionCommand::Filter { category } => {
                let category: Category = category.parse()?;
                let records = self.service.filter_by_category(category);
                self.print_records(&records)?;
            }

            SessionCommand::Search { term } => {
                let records = self.service.search(&term.join(" "));
                self.print_records(&records)?;
            }

            SessionCommand::Sort { desc } => {
                let records = self.service.sorted_by_amount(!desc);
                self.print_records(&records)?;
            }

            SessionCommand::Budget { amount, clear } => {
                if clear {
                    self.service.clear_budget();
                    writeln!(self.out, "Budget cleared.")?;
                } else if let Some(amount) = amount {
                    let limit = parse_amount(&amount)?;
                    let status = self.service.set_budget(limit)?;
                    writeln!(self.out, "{}", status.summary())?;
                } else {
                    match self.service.budget_status() {
                        Some(status) => writeln!(self.out, "{}", status.summary())?,
                        None => writeln!(self.out, "No budget set.")?,
                    }
                }
            }

            SessionCommand::Export { output, format } => {
                self.export(output, &format)?;
            }

            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn export(&mut self, output: Option<PathBuf>, format: &str) -> Result<()> {
        let exporter = Exporter::new(self.service.ledger());

        let Some(path) = output else {
            match format {
                "csv" => {
                    exporter.export_csv(&mut self.out)?;
                }
                "json" => {
                    exporter.export_json(&mut self.out)?;
                    writeln!(self.out)?;
                }
                _ => bail!("Invalid export format '{}'. Valid formats: csv, json", format),
            }
            return Ok(());
        };

        if format != "csv" && format != "json" {
            bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        let count = if format == "csv" {
            exporter.export_csv(file)?
        } else {
            exporter.export_json(file)?.records.len()
        };
        writeln!(
            self.out,
            "Exported {} expenses to {}",
            count,
            path.display()
        )?;
        Ok(())
    }

    fn print_records(&mut self, records: &[ExpenseRecord]) -> Result<()> {
        if records.is_empty() {
            writeln!(self.out, "No matching expenses.")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{:<12} {:<15} {:>12} {:<12} {}",
            "DATE", "CATEGORY", "AMOUNT", "PAYMENT", "NOTES"
        )?;
        writeln!(self.out, "{}", "-".repeat(70))?;
        for record in records {
            writeln!(
                self.out,
                "{:<12} {:<15} {:>12} {:<12} {}",
                record.date.format("%Y-%m-%d"),
                record.category.as_str(),
                format_cents(record.amount_cents),
                record.payment_method.as_str(),
                record.notes
            )?;
        }
        Ok(())
    }

    fn print_budget_alert(&mut self) -> Result<()> {
        if let Some(status) = self.service.budget_status() {
            if status.is_over() {
                writeln!(
                    self.out,
                    "Warning: you have exceeded your budget of {}{}!",
                    self.currency,
                    format_cents(status.limit)
                )?;
            }
        }
        Ok(())
    }
}
