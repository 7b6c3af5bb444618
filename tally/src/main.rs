mod config;
mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Settings;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tallylib::{
    aggregate,
    coerce,
    error::{Result, TallyError},
    export::{write_table, ExportKind},
    model::{NewDebit, NewPayment, NewReceivable, NewStock, RecordId, RecordKind},
    money::Money,
    query,
    session::{Session, Update},
    storage::FileStorage,
    store::Store,
    views,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Small-business bookkeeping ledger")]
struct Cli {
    /// Directory holding the JSON snapshots
    #[arg(long = "data-dir", env = "TALLY_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/tally.toml)
    #[arg(long, env = "TALLY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Currency code used for display
    #[arg(long, env = "TALLY_CURRENCY", global = true)]
    currency: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ledgers
    Ledger {
        #[command(subcommand)]
        action: NameAction,
    },
    /// Manage favorite customers
    Favorite {
        #[command(subcommand)]
        action: NameAction,
    },
    /// Record a payment received (credit)
    Pay(PayArgs),
    /// Record money paid out against an invoice
    Debit(DebitArgs),
    /// Accounts receivable
    Receivable {
        #[command(subcommand)]
        action: ReceivableAction,
    },
    /// Inventory stock
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Delete one record by id
    Delete {
        #[arg(value_enum)]
        kind: Kind,
        id: String,
    },
    /// Headline figures for a ledger (default: the first one)
    Dashboard {
        #[arg(long)]
        ledger: Option<String>,
    },
    /// Combined credit/debit statement per ledger
    Board {
        #[arg(long)]
        ledger: Option<String>,
    },
    /// All payments, earliest first
    Payments,
    /// Write a CSV export
    Export(ExportArgs),
}

#[derive(Subcommand, Debug)]
enum NameAction {
    Add { name: String },
    Remove { name: String },
    List,
}

#[derive(Args, Debug)]
struct PayArgs {
    #[arg(long, default_value = "")]
    ledger: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long = "type", default_value = "")]
    kind: String,
    #[arg(long, default_value = "")]
    amount: String,
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct DebitArgs {
    #[arg(long, default_value = "")]
    ledger: String,
    #[arg(long = "invoice-type", default_value = "")]
    invoice_type: String,
    #[arg(long = "invoice-number", default_value = "")]
    invoice_number: String,
    #[arg(long, default_value = "")]
    amount: String,
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ReceivableAction {
    Add {
        #[arg(long, default_value = "")]
        ledger: String,
        #[arg(long, default_value = "")]
        customer: String,
        #[arg(long = "invoice-number", default_value = "")]
        invoice_number: String,
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long = "invoice-date")]
        invoice_date: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Move a receivable to another ledger
    Move {
        id: String,
        #[arg(long)]
        to: String,
    },
    List {
        #[arg(long)]
        customer: Option<String>,
        /// Also print one board per favorite customer
        #[arg(long)]
        boards: bool,
    },
}

#[derive(Subcommand, Debug)]
enum StockAction {
    /// Add or update the (product, ledger) line
    Set {
        #[arg(long, default_value = "")]
        ledger: String,
        #[arg(long)]
        product: String,
        /// Defaults to the catalog price
        #[arg(long)]
        price: Option<String>,
        #[arg(long = "qty", default_value = "0")]
        quantity: String,
    },
    /// Change the quantity of one line
    Qty { id: String, quantity: String },
    List {
        #[arg(long)]
        ledger: Option<String>,
    },
    /// Show the product catalog
    Catalog,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Kind {
    Payment,
    Debit,
    Receivable,
    Stock,
}

impl From<Kind> for RecordKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Payment => RecordKind::Payment,
            Kind::Debit => RecordKind::Debit,
            Kind::Receivable => RecordKind::Receivable,
            Kind::Stock => RecordKind::Stock,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Export {
    Payments,
    Statement,
    Receivables,
    Inventory,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(value_enum)]
    what: Export,
    /// Ledger for a statement (default: the first one)
    #[arg(long)]
    ledger: Option<String>,
    /// Directory for the CSV file (default: current directory)
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,
    /// Write to stdout instead of a file
    #[arg(long)]
    stdout: bool,
}

fn parse_id(raw: &str) -> Result<RecordId> {
    RecordId::parse(raw).ok_or_else(|| TallyError::Parse(format!("bad record id: {raw}")))
}

fn report<T>(update: &Update<T>, money: &Money) {
    render::saved(&update.unsaved);
    render::dashboard(&update.dashboard, money);
}

fn pick_ledger(session: &mut Session<FileStorage>, ledger: Option<&str>) -> Result<()> {
    if let Some(name) = ledger {
        session.select(name)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.data_dir, cli.config, cli.currency)?;
    let money = Money::new(settings.currency.clone());
    let storage = FileStorage::open(&settings.data_dir)?;
    let mut session = Session::new(Store::open(storage, settings.store));

    match cli.command {
        Command::Ledger { action } => match action {
            NameAction::Add { name } => report(&session.apply(|s| s.add_ledger(&name))?, &money),
            NameAction::Remove { name } => report(&session.apply(|s| s.remove_ledger(&name))?, &money),
            NameAction::List => render::names("Ledgers", session.store().ledgers()),
        },
        Command::Favorite { action } => match action {
            NameAction::Add { name } => render::saved(&session.apply(|s| s.add_favorite(&name))?.unsaved),
            NameAction::Remove { name } => render::saved(&session.apply(|s| s.remove_favorite(&name))?.unsaved),
            NameAction::List => render::names("Favorites", session.store().favorites()),
        },
        Command::Pay(a) => {
            let new = NewPayment {
                date: a.date,
                name: a.name,
                kind: a.kind,
                amount: coerce::amount(&a.amount),
                ledger: a.ledger,
            };
            let ledger = new.ledger.trim().to_string();
            let up = session.apply(|s| s.add_payment(new))?;
            println!("payment {}", up.value);
            session.select(&ledger)?;
            report(&Update { dashboard: session.dashboard(), ..up }, &money);
        }
        Command::Debit(a) => {
            let new = NewDebit {
                date: a.date,
                invoice_type: a.invoice_type,
                invoice_number: a.invoice_number,
                amount: coerce::amount(&a.amount),
                ledger: a.ledger,
            };
            let ledger = new.ledger.trim().to_string();
            let up = session.apply(|s| s.add_debit(new))?;
            println!("debit {}", up.value);
            session.select(&ledger)?;
            report(&Update { dashboard: session.dashboard(), ..up }, &money);
        }
        Command::Receivable { action } => match action {
            ReceivableAction::Add {
                ledger,
                customer,
                invoice_number,
                amount,
                invoice_date,
                comment,
            } => {
                let new = NewReceivable {
                    invoice_date,
                    customer_name: customer,
                    invoice_number,
                    amount: coerce::amount(&amount),
                    ledger,
                    comment,
                };
                let up = session.apply(|s| s.add_receivable(new))?;
                println!("receivable {}", up.value);
                render::saved(&up.unsaved);
            }
            ReceivableAction::Move { id, to } => {
                let id = parse_id(&id)?;
                let up = session.apply(|s| s.move_receivable(id, &to))?;
                render::saved(&up.unsaved);
                for b in session.boards() {
                    render::board(&b, &money);
                }
            }
            ReceivableAction::List { customer, boards } => {
                let all = session.store().receivables();
                match customer {
                    Some(name) => {
                        let fav = [name];
                        for v in views::customer_boards(all, &fav) {
                            render::receivables(&v, &money);
                        }
                    }
                    None => render::receivables(&views::receivables(all), &money),
                }
                if boards {
                    for v in views::customer_boards(all, session.store().favorites()) {
                        render::receivables(&v, &money);
                    }
                }
            }
        },
        Command::Stock { action } => match action {
            StockAction::Set {
                ledger,
                product,
                price,
                quantity,
            } => {
                let new = NewStock {
                    product_name: product,
                    price: price.as_deref().map(coerce::amount),
                    quantity: coerce::quantity(&quantity),
                    ledger: ledger.clone(),
                };
                let up = session.apply(|s| s.upsert_stock(new))?;
                println!("stock {}", up.value);
                render::saved(&up.unsaved);
                render::inventory(&views::inventory(session.store().inventory(), Some(ledger.trim())), &money);
            }
            StockAction::Qty { id, quantity } => {
                let id = parse_id(&id)?;
                let qty = coerce::quantity(&quantity);
                let up = session.apply(|s| s.set_stock_quantity(id, qty))?;
                render::saved(&up.unsaved);
                render::inventory(&views::inventory(session.store().inventory(), None), &money);
            }
            StockAction::List { ledger } => {
                render::inventory(&views::inventory(session.store().inventory(), ledger.as_deref()), &money);
            }
            StockAction::Catalog => {
                for (name, price) in session.store().catalog().sorted() {
                    println!("{:<28} {:>18}", name, money.format(price));
                }
            }
        },
        Command::Delete { kind, id } => {
            let id = parse_id(&id)?;
            report(&session.apply(|s| s.delete(kind.into(), id))?, &money);
        }
        Command::Dashboard { ledger } => {
            pick_ledger(&mut session, ledger.as_deref())?;
            render::dashboard(&session.dashboard(), &money);
        }
        Command::Board { ledger } => match ledger {
            Some(name) => {
                if !session.store().ledgers().contains(&name) {
                    return Err(TallyError::UnknownLedger(name));
                }
                render::board(&aggregate::board(session.store().books(), &name), &money);
            }
            None => {
                for b in session.boards() {
                    render::board(&b, &money);
                }
            }
        },
        Command::Payments => render::payments(&views::payments(session.store().payments()), &money),
        Command::Export(a) => export(&mut session, a)?,
    }
    Ok(())
}

fn export(session: &mut Session<FileStorage>, a: ExportArgs) -> Result<()> {
    pick_ledger(session, a.ledger.as_deref())?;
    let kind = match a.what {
        Export::Payments => ExportKind::Payments,
        Export::Statement => match session.selection().name() {
            Some(name) => ExportKind::Statement(name.to_string()),
            None => return Err(TallyError::MissingLedger),
        },
        Export::Receivables => ExportKind::Receivables,
        Export::Inventory => ExportKind::Inventory,
    };

    let mut writer: Box<dyn Write> = if a.stdout {
        Box::new(io::stdout())
    } else {
        let dir = a.out_dir.unwrap_or_else(|| PathBuf::from("."));
        let path = dir.join(kind.file_name());
        eprintln!("writing {}", path.display());
        Box::new(BufWriter::new(File::create(path)?))
    };

    let store = session.store();
    let rows = match &kind {
        ExportKind::Payments => write_table(&mut writer, query::payments_by_date(store.payments()))?,
        ExportKind::Statement(name) => {
            write_table(&mut writer, &aggregate::statement(store.payments(), store.debits(), name))?
        }
        ExportKind::Receivables => write_table(&mut writer, store.receivables())?,
        ExportKind::Inventory => write_table(&mut writer, store.inventory())?,
    };
    tracing::info!(rows, file = %kind.file_name(), "export written");
    writer.flush().map_err(TallyError::from)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "tally=info,tallylib=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
