//! Nestegg CLI
//!
//! Records transactions, budgets and savings goals in a JSON snapshot and
//! prints reports as JSON on stdout. Logs go to stderr.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use nestegg_core::ledger::TransactionKind;
use nestegg_shared::types::{BudgetId, GoalId, Money, MonthKey, OwnerId, TransactionId};
use nestegg_shared::{AppConfig, AppError};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::Session;

#[derive(Parser, Debug)]
#[command(name = "nestegg", version, about = "Budgets, savings goals and monthly reports")]
struct Cli {
    /// Owner whose records are read and written (overrides session.owner_id)
    #[arg(long, global = true)]
    owner: Option<OwnerId>,

    /// Snapshot file (overrides store.path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monthly income and expense series with chart data
    Report {
        /// Also break down one month, as YYYY-MM
        #[arg(long, value_parser = parse_month)]
        month: Option<MonthKey>,
    },
    /// Balance with income, expense and earmarked totals
    Balance,
    /// Current total and headroom of every budget
    Budgets,
    /// Progress and milestones of every savings goal
    Goals {
        /// Reference date, YYYY-MM-DD (defaults to today, UTC)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Record or edit an expense
    AddExpense {
        #[command(flatten)]
        entry: EntryArgs,
        /// Edit this existing expense instead of adding a new one
        #[arg(long)]
        id: Option<TransactionId>,
    },
    /// Record an income and route its share to savings goals
    AddIncome {
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Create a category budget
    AddBudget {
        /// Transaction kind the budget caps
        #[arg(long, value_enum, default_value_t = Kind::Expense)]
        kind: Kind,
        /// Category label
        #[arg(long)]
        category: String,
        /// First day of the window, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the window, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        /// Maximum total within the window
        #[arg(long)]
        cap: Money,
    },
    /// Create a savings goal, placed last in allocation order
    AddGoal {
        /// Goal label
        #[arg(long)]
        category: String,
        /// Amount to reach
        #[arg(long)]
        target: Money,
        /// Share of each income routed to the goal, 0 to 100
        #[arg(long)]
        percentage: Decimal,
        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
    },
    /// Add money to a goal by hand
    Contribute {
        /// Goal ID
        #[arg(long)]
        goal: GoalId,
        /// Amount to add
        #[arg(long)]
        amount: Money,
    },
    /// Delete a transaction
    DeleteTransaction {
        /// Transaction ID
        #[arg(long)]
        id: TransactionId,
    },
    /// Delete a budget
    DeleteBudget {
        /// Budget ID
        #[arg(long)]
        id: BudgetId,
    },
    /// Delete a savings goal
    DeleteGoal {
        /// Goal ID
        #[arg(long)]
        id: GoalId,
    },
}

/// Fields shared by income and expense entry.
#[derive(Args, Debug)]
struct EntryArgs {
    /// Label
    #[arg(long)]
    name: String,
    /// Amount, e.g. 12.50
    #[arg(long)]
    amount: Money,
    /// Category label
    #[arg(long)]
    category: String,
    /// Date, YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Store the record even if it exceeds its budget
    #[arg(long)]
    force: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for TransactionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => Self::Income,
            Kind::Expense => Self::Expense,
        }
    }
}

fn parse_month(raw: &str) -> Result<MonthKey, String> {
    let invalid = || format!("expected YYYY-MM, got {raw}");
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year = year.parse().map_err(|_| invalid())?;
    let month = month.parse().map_err(|_| invalid())?;
    MonthKey::new(year, month).ok_or_else(invalid)
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.logging.filter)
            .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().map_err(AppError::from)?;
    if let Some(path) = cli.store {
        config.store.path = path;
    }
    init_tracing(&config)?;

    let owner = cli
        .owner
        .or(config.session.owner_id)
        .ok_or_else(|| {
            AppError::Validation(
                "no owner: pass --owner or set NESTEGG__SESSION__OWNER_ID".to_string(),
            )
        })?;
    let session = Session::new(&config, owner);

    let output = match cli.command {
        Command::Report { month } => session.report(month)?,
        Command::Balance => session.balance()?,
        Command::Budgets => session.budgets()?,
        Command::Goals { today: date } => session.goals(date.unwrap_or_else(today))?,
        Command::AddExpense { entry, id } => session.add_expense(entry, id)?,
        Command::AddIncome { entry } => session.add_income(entry)?,
        Command::AddBudget {
            kind,
            category,
            start,
            end,
            cap,
        } => session.add_budget(kind.into(), category, start, end, cap)?,
        Command::AddGoal {
            category,
            target,
            percentage,
            end,
        } => session.add_goal(category, target, percentage, end)?,
        Command::Contribute { goal, amount } => session.contribute(goal, amount)?,
        Command::DeleteTransaction { id } => session.delete_transaction(id)?,
        Command::DeleteBudget { id } => session.delete_budget(id)?,
        Command::DeleteGoal { id } => session.delete_goal(id)?,
    };

    let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            tracing::error!(error = %err, "Command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(code)
        }
    }
}
