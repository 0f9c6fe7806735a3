//! CLI binary for recording and reviewing personal finances.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use spendwise::error::SpendwiseError;
use spendwise::models::{
    BudgetStatus, Category, CategorySpending, DateBucket, DateFilterMode, NewTransaction,
    Transaction, TransactionId, TransactionPatch, TransactionType,
};
use spendwise::period::Calendar;
use spendwise::storage::{BlockingStore, FileStore};
use spendwise::tracker::TrackerBlocking;

/// Environment variable holding the monthly budget limit.
const BUDGET_ENV: &str = "SPENDWISE_BUDGET_LIMIT";

/// Placeholder for missing values.
const NONE_MARK: &str = "\u{2014}";

/// Spendwise: track income and expenses from the terminal.
#[derive(Debug, Parser)]
#[command(name = "spendwise", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Monthly budget limit (default: $SPENDWISE_BUDGET_LIMIT or 500000).
    #[arg(long, global = true, value_parser = parse_amount)]
    budget: Option<Decimal>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Record a new transaction.
    Add(AddArgs),
    /// List transactions grouped by day, optionally filtered.
    List(ListArgs),
    /// Change fields of a stored transaction.
    Edit(EditArgs),
    /// Delete one transaction, or all of them with --all.
    Delete {
        /// Identifier of the transaction to delete.
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<i64>,
        /// Delete every transaction.
        #[arg(long)]
        all: bool,
    },
    /// Monthly overview: totals, balance, budget, highlights.
    Summary,
    /// Category breakdown for this week or this month.
    Stats {
        /// Period to summarise.
        #[arg(long, value_enum, default_value_t = StatsPeriod::Month)]
        period: StatsPeriod,
        /// Direction to break down.
        #[arg(long = "type", value_enum, default_value_t = KindArg::Expense)]
        kind: KindArg,
    },
    /// List the category catalog.
    Categories,
}

/// Transaction direction as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl From<KindArg> for TransactionType {
    #[inline]
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => Self::Income,
            KindArg::Expense => Self::Expense,
        }
    }
}

/// Date window of the `list` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PeriodArg {
    /// No date restriction.
    All,
    /// The current week.
    Week,
    /// The current month.
    Month,
}

/// Period of the `stats` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatsPeriod {
    /// The current week.
    Week,
    /// The current month.
    Month,
}

/// Arguments for the `add` subcommand.
#[derive(Debug, Args)]
struct AddArgs {
    /// Amount, a positive decimal.
    #[arg(value_parser = parse_amount)]
    amount: Decimal,
    /// Direction of the transaction.
    #[arg(long = "type", value_enum, default_value_t = KindArg::Expense)]
    kind: KindArg,
    /// Category name (default: the direction's "Other" category).
    #[arg(long)]
    category: Option<String>,
    /// Free-form note.
    #[arg(long, default_value = "")]
    description: String,
    /// Economic date (YYYY-MM-DD, default: now).
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

/// Arguments for the `list` subcommand.
#[derive(Debug, Args)]
struct ListArgs {
    /// Only this direction.
    #[arg(long = "type", value_enum)]
    kind: Option<KindArg>,
    /// Only this category (exact name).
    #[arg(long)]
    category: Option<String>,
    /// Case-insensitive text matched against description and category.
    #[arg(long)]
    search: Option<String>,
    /// Date window.
    #[arg(long, value_enum, default_value_t = PeriodArg::All)]
    period: PeriodArg,
    /// Start of a custom window (inclusive, YYYY-MM-DD). Requires --to.
    #[arg(long, requires = "to", value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End of a custom window (inclusive, YYYY-MM-DD). Requires --from.
    #[arg(long, requires = "from", value_parser = parse_date)]
    to: Option<NaiveDate>,
}

/// Arguments for the `edit` subcommand.
#[derive(Debug, Args)]
struct EditArgs {
    /// Identifier of the transaction to change.
    id: i64,
    /// New amount.
    #[arg(long, value_parser = parse_amount)]
    amount: Option<Decimal>,
    /// New category name.
    #[arg(long)]
    category: Option<String>,
    /// New note.
    #[arg(long)]
    description: Option<String>,
    /// New economic date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a decimal amount for clap.
fn parse_amount(s: &str) -> Result<Decimal, String> {
    s.parse::<Decimal>().map_err(|err| format!("{err}"))
}

/// Reads the budget limit from the environment, if set and valid.
fn read_budget_env() -> io::Result<Option<Decimal>> {
    match std::env::var(BUDGET_ENV) {
        Ok(val) if !val.trim().is_empty() => match parse_amount(val.trim()) {
            Ok(limit) => Ok(Some(limit)),
            Err(err) => {
                let mut out = io::stderr().lock();
                writeln!(
                    out,
                    "{} ignoring {}: {err}",
                    "warning:".yellow().bold(),
                    BUDGET_ENV.bold()
                )?;
                Ok(None)
            }
        },
        _ => Ok(None),
    }
}

/// Prints an error with context and returns a failure exit code.
fn fail(context: &str, err: &SpendwiseError) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let store = match create_store(cli.data_dir) {
        Ok(store) => store,
        Err(err) => return fail("failed to initialize storage", &err),
    };

    let calendar = Calendar::now_local();
    let mut builder = TrackerBlocking::builder().store(store).calendar(calendar);
    if let Some(limit) = cli.budget.or(read_budget_env()?) {
        builder = builder.budget_limit(limit);
    }
    let tracker = match builder.build() {
        Ok(tracker) => tracker,
        Err(err) => return fail("failed to build tracker", &err),
    };
    if let Err(err) = tracker.refresh() {
        return fail("failed to read transactions", &err);
    }

    dispatch(&tracker, &calendar, cli.command)
}

/// Creates the file store, using `data_dir` if provided or the default
/// XDG data directory otherwise.
fn create_store(data_dir: Option<PathBuf>) -> spendwise::error::Result<FileStore> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStore::default_dir()?,
    };
    FileStore::new(dir)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: BlockingStore>(
    tracker: &TrackerBlocking<S>,
    calendar: &Calendar,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Add(args) => cmd_add(tracker, calendar, args),
        Command::List(args) => cmd_list(tracker, calendar, &args),
        Command::Edit(args) => cmd_edit(tracker, calendar, args),
        Command::Delete { id, all } => cmd_delete(tracker, id, all),
        Command::Summary => cmd_summary(tracker),
        Command::Stats { period, kind } => cmd_stats(tracker, period, kind.into()),
        Command::Categories => print_categories_table(),
    }
}

/// Start of the local day `day`, as stored on transactions.
fn day_start(calendar: &Calendar, day: NaiveDate) -> DateTime<Utc> {
    calendar.day(day).start
}

/// Executes the `add` subcommand.
fn cmd_add<S: BlockingStore>(
    tracker: &TrackerBlocking<S>,
    calendar: &Calendar,
    args: AddArgs,
) -> io::Result<ExitCode> {
    let kind = TransactionType::from(args.kind);
    let category = args
        .category
        .unwrap_or_else(|| Category::default_for(kind).name().to_owned());
    if Category::lookup(&category).is_none() {
        writeln!(
            io::stderr().lock(),
            "{} {} is not in the catalog; it will show as {}",
            "warning:".yellow().bold(),
            category.bold(),
            Category::resolve(&category)
        )?;
    }
    let date = args
        .date
        .map_or_else(Utc::now, |day| day_start(calendar, day));
    let draft = NewTransaction::new(args.amount, category, kind, date).description(args.description);

    match tracker.add_transaction(draft) {
        Ok(id) => {
            writeln!(
                io::stdout().lock(),
                "{} transaction {}",
                "Added".green().bold(),
                id.bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to add transaction", &err),
    }
}

/// Executes the `list` subcommand: applies filters and prints day groups.
fn cmd_list<S: BlockingStore>(
    tracker: &TrackerBlocking<S>,
    calendar: &Calendar,
    args: &ListArgs,
) -> io::Result<ExitCode> {
    tracker.set_type_filter(args.kind.map(TransactionType::from));
    tracker.set_category_filter(args.category.clone());
    if let Some(search) = args.search.as_deref() {
        tracker.set_search_query(search);
    }
    match args.from.zip(args.to) {
        Some((from, to)) => tracker.set_date_filter(
            DateFilterMode::Custom,
            Some(day_start(calendar, from)),
            Some(calendar.day(to).end),
        ),
        None => {
            let mode = match args.period {
                PeriodArg::All => DateFilterMode::All,
                PeriodArg::Week => DateFilterMode::ThisWeek,
                PeriodArg::Month => DateFilterMode::ThisMonth,
            };
            tracker.set_date_filter(mode, None, None);
        }
    }

    let buckets = tracker
        .views()
        .grouped_transactions()
        .latest()
        .unwrap_or_default();
    print_grouped_table(&buckets)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `edit` subcommand.
fn cmd_edit<S: BlockingStore>(
    tracker: &TrackerBlocking<S>,
    calendar: &Calendar,
    args: EditArgs,
) -> io::Result<ExitCode> {
    let mut patch = TransactionPatch::new();
    if let Some(amount) = args.amount {
        patch = patch.amount(amount);
    }
    if let Some(category) = args.category {
        patch = patch.category(category);
    }
    if let Some(description) = args.description {
        patch = patch.description(description);
    }
    if let Some(day) = args.date {
        patch = patch.date(day_start(calendar, day));
    }

    match tracker.update_transaction(TransactionId::new(args.id), patch) {
        Ok(updated) => {
            print_transactions_table("Updated", core::slice::from_ref(&updated))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to update transaction", &err),
    }
}

/// Executes the `delete` subcommand.
fn cmd_delete<S: BlockingStore>(
    tracker: &TrackerBlocking<S>,
    id: Option<i64>,
    all: bool,
) -> io::Result<ExitCode> {
    let result = match id {
        Some(raw) if !all => tracker.delete_transaction(TransactionId::new(raw)),
        _ => tracker.delete_all(),
    };
    match result {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Deleted".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to delete", &err),
    }
}

/// Executes the `summary` subcommand: the home screen in text form.
fn cmd_summary<S: BlockingStore>(tracker: &TrackerBlocking<S>) -> io::Result<ExitCode> {
    let views = tracker.views();
    let income = views.monthly_income().latest().unwrap_or_default();
    let expense = views.monthly_expense().latest().unwrap_or_default();
    let balance = views.balance().latest().unwrap_or_default();
    let status = views.budget_status().latest().unwrap_or_default();
    let highest = views.highest_expense().latest().flatten();
    let most_used = views
        .most_used_category(TransactionType::Expense)
        .latest()
        .flatten();
    let recent = tracker.recent_transactions().latest().unwrap_or_default();

    let mut out = io::stdout().lock();
    writeln!(out, "{}", "This Month".green().bold())?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Income: ".bold(), format!("{income:.2}").green())?;
    writeln!(out, "  {} {}", "Expense:".bold(), format!("{expense:.2}").red())?;
    if balance < Decimal::ZERO {
        writeln!(out, "  {} {}", "Balance:".bold(), format!("{balance:.2}").red())?;
    } else {
        writeln!(out, "  {} {}", "Balance:".bold(), format!("{balance:.2}").green())?;
    }
    writeln!(out)?;
    print_budget(&mut out, &status)?;
    writeln!(out)?;
    match highest {
        Some(tx) => writeln!(
            out,
            "  {} {:.2} ({})",
            "Highest expense:".bold(),
            tx.amount,
            tx.category
        )?,
        None => writeln!(out, "  {} {NONE_MARK}", "Highest expense:".bold())?,
    }
    writeln!(
        out,
        "  {} {}",
        "Most used category:".bold(),
        most_used.as_deref().unwrap_or(NONE_MARK)
    )?;
    writeln!(out)?;
    drop(out);
    print_transactions_table("Recent Transactions", &recent)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `stats` subcommand: totals and category breakdown.
fn cmd_stats<S: BlockingStore>(
    tracker: &TrackerBlocking<S>,
    period: StatsPeriod,
    kind: TransactionType,
) -> io::Result<ExitCode> {
    tracker.set_statistics_period(match period {
        StatsPeriod::Week => DateFilterMode::ThisWeek,
        StatsPeriod::Month => DateFilterMode::ThisMonth,
    });
    let views = tracker.views();
    let total = views.statistics_total(kind).latest().unwrap_or_default();
    let breakdown = views.category_breakdown(kind).latest().unwrap_or_default();
    print_breakdown_table(kind, total, &breakdown)?;
    Ok(ExitCode::SUCCESS)
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints budget metrics with a warning color when close to the limit.
fn print_budget<W: io::Write>(out: &mut W, status: &BudgetStatus) -> io::Result<()> {
    let percent = (status.progress * Decimal::ONE_HUNDRED).round_dp(1);
    let line = format!(
        "{:.2} of {:.2} spent ({percent}%), {:.2} left",
        status.spent, status.limit, status.remaining
    );
    let styled = if status.over_budget {
        line.red().bold().to_string()
    } else if status.approaching_budget {
        line.yellow().to_string()
    } else {
        line.green().to_string()
    };
    writeln!(out, "  {} {styled}", "Budget:".bold())?;
    if status.over_budget {
        writeln!(out, "  {}", "Over budget!".red().bold())?;
    } else if status.approaching_budget {
        writeln!(out, "  {}", "Approaching the budget limit.".yellow())?;
    }
    Ok(())
}

/// Builds a colored amount cell.
fn amount_cell(tx: &Transaction) -> Cell {
    let text = format!("{:.2}", tx.signed_amount());
    match tx.kind {
        TransactionType::Income => Cell::new(text).fg(Color::Green),
        TransactionType::Expense => Cell::new(text).fg(Color::Red),
    }
}

/// Prints transactions in a table.
fn print_transactions_table(title: &str, txs: &[Transaction]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if txs.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
    ]);

    for tx in txs {
        _ = table.add_row(vec![
            Cell::new(tx.id),
            Cell::new(tx.date.format("%Y-%m-%d")),
            Cell::new(&tx.category),
            amount_cell(tx),
            Cell::new(&tx.description),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({})", txs.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints day-grouped transactions in a table.
fn print_grouped_table(buckets: &[DateBucket]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if buckets.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Day").fg(Color::Cyan),
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
    ]);

    let mut count = 0_usize;
    for bucket in buckets {
        for (index, tx) in bucket.transactions.iter().enumerate() {
            let day = if index == 0 { bucket.label.as_str() } else { "" };
            _ = table.add_row(vec![
                Cell::new(day).fg(Color::Yellow),
                Cell::new(tx.id),
                Cell::new(&tx.category),
                amount_cell(tx),
                Cell::new(&tx.description),
            ]);
        }
        count = count.saturating_add(bucket.transactions.len());
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("({count})").dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints a category breakdown in a table.
fn print_breakdown_table(
    kind: TransactionType,
    total: Decimal,
    breakdown: &[CategorySpending],
) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let heading = match kind {
        TransactionType::Income => "Income by Category",
        TransactionType::Expense => "Spending by Category",
    };
    writeln!(
        out,
        "{} {}",
        heading.green().bold(),
        format_args!("(total {total:.2})").dimmed()
    )?;
    writeln!(out)?;
    if breakdown.is_empty() {
        writeln!(out, "{}", "Nothing recorded for this period.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Count").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Share").fg(Color::Cyan),
    ]);
    for group in breakdown {
        _ = table.add_row(vec![
            Cell::new(&group.category),
            Cell::new(group.count),
            Cell::new(format!("{:.2}", group.amount)),
            Cell::new(format!("{:.1}%", group.percentage)),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the category catalog.
fn print_categories_table() -> io::Result<ExitCode> {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
    ]);
    for category in Category::ALL {
        let kind = match category.kind() {
            TransactionType::Income => Cell::new("income").fg(Color::Green),
            TransactionType::Expense => Cell::new("expense").fg(Color::Red),
        };
        _ = table.add_row(vec![Cell::new(category.name()), kind]);
    }

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        "Categories".green().bold(),
        format_args!("({})", Category::ALL.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    run().unwrap_or_else(|err| {
        let _ignored = writeln!(io::stderr().lock(), "{} {err}", "fatal:".red().bold());
        ExitCode::FAILURE
    })
}
