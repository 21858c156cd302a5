use agenda::application::accounts::AdminAccountManager;
use agenda::application::engine::BookingEngine;
use agenda::domain::appointment::AppointmentFields;
use agenda::domain::filter::{FilterState, QuickFilter, ViewFilter};
use agenda::domain::ports::{ClockBox, KeyValueStoreBox, KeyValueStoreFactory};
use agenda::error::{BookingError, Result as BookingResult};
use agenda::infrastructure::clock::{FixedClock, SystemClock};
use agenda::infrastructure::json_file::JsonFileStore;
#[cfg(feature = "storage-rocksdb")]
use agenda::infrastructure::rocksdb::RocksDBStore;
use agenda::interfaces::csv::appointment_writer::{AppointmentWriter, export_filename};
use agenda::interfaces::notify::{Notification, Notifier, StderrNotifier};
use agenda::interfaces::render;
use agenda::settings::Settings;
use agenda::telemetry;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use miette::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML). `agenda.toml` in the working directory is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the JSON data files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Book a new appointment
    Book(BookArgs),
    /// Show which slots are free on a date
    Slots {
        #[arg(long)]
        date: String,
        /// Id of an appointment being edited; its own slot shows as free.
        #[arg(long)]
        exclude: Option<String>,
    },
    /// List appointments, upcoming ones by default
    List(FilterArgs),
    /// Show one appointment
    Show { id: String },
    /// Change fields of an existing appointment
    Edit(EditArgs),
    /// Delete an appointment
    Delete { id: String },
    /// Dashboard counters
    Stats,
    /// Export appointments to CSV, all of them by default
    Export {
        /// Output file. Defaults to `agendamentos_<today>.csv`.
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Manage administrator accounts
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Sign in to the admin dashboard
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out of the admin dashboard
    Logout,
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    date: String,
    #[arg(long)]
    time: String,
    /// Service key: corte, coloracao, manicure, pedicure, depilacao, massagem or outro.
    #[arg(long)]
    service: String,
    #[arg(long)]
    notes: Option<String>,
}

impl From<BookArgs> for AppointmentFields {
    fn from(args: BookArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            date: args.date,
            time: args.time,
            service: args.service,
            notes: args.notes,
        }
    }
}

#[derive(Args)]
struct EditArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    service: Option<String>,
    /// New notes. An empty value clears them.
    #[arg(long)]
    notes: Option<String>,
}

impl EditArgs {
    fn apply_to(self, mut fields: AppointmentFields) -> AppointmentFields {
        let overrides = [
            (&mut fields.name, self.name),
            (&mut fields.email, self.email),
            (&mut fields.phone, self.phone),
            (&mut fields.date, self.date),
            (&mut fields.time, self.time),
            (&mut fields.service, self.service),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(notes) = self.notes {
            fields.notes = Some(notes);
        }
        fields
    }
}

#[derive(Args)]
struct FilterArgs {
    /// pending, today, week or all. Cannot be combined with manual filters.
    #[arg(long, conflicts_with_all = ["date", "service", "search"])]
    quick: Option<QuickFilter>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    service: Option<String>,
    /// Case-insensitive match on name or email, raw match on phone.
    #[arg(long)]
    search: Option<String>,
}

impl FilterArgs {
    fn into_view(self, fallback: QuickFilter) -> ViewFilter {
        let manual = FilterState {
            date: self.date,
            service: self.service,
            search: self.search,
        };
        let quick = match self.quick {
            None if manual.is_empty() => Some(fallback),
            quick => quick,
        };
        ViewFilter::from_parts(quick, manual)
    }
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List administrator accounts
    List,
    /// Add an administrator account
    Add {
        username: String,
        #[arg(long)]
        password: String,
        /// Repeat the password; must match when given.
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Remove an administrator account
    Remove { username: String },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }
    if cli.db_path.is_some() {
        settings.db_path = cli.db_path;
    }
    if cli.today.is_some() {
        settings.today = cli.today;
    }
    telemetry::init_tracing(&settings.log_level);

    let notifier = StderrNotifier;
    match run(cli.command, &settings, &notifier) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_infrastructure() => Err(e.into()),
        Err(e) => {
            notifier.notify(&Notification::from(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(command: Command, settings: &Settings, notifier: &dyn Notifier) -> BookingResult<()> {
    let stores = store_factory(settings)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Admin(admin) => {
            let accounts = open_accounts(stores(), notifier)?;
            run_admin(admin, accounts, notifier, &mut out)
        }
        Command::Login { username, password } => {
            let mut accounts = open_accounts(stores(), notifier)?;
            accounts.sign_in(&username, &password)?;
            notifier.notify(&Notification::success(format!("Signed in as {username}")));
            Ok(())
        }
        Command::Logout => {
            let mut accounts = open_accounts(stores(), notifier)?;
            accounts.sign_out()?;
            notifier.notify(&Notification::info("Signed out"));
            Ok(())
        }
        booking => {
            let (engine, warning) = BookingEngine::open(stores(), clock(settings))?;
            if let Some(warning) = warning {
                notifier.notify(&Notification::from(&warning));
            }
            run_booking(booking, engine, notifier, &mut out)
        }
    }
}

fn run_booking(
    command: Command,
    mut engine: BookingEngine,
    notifier: &dyn Notifier,
    out: &mut impl Write,
) -> BookingResult<()> {
    match command {
        Command::Book(args) => {
            let booked = engine.create(args.into())?;
            write!(out, "{}", render::appointment_detail(&booked))?;
            notifier.notify(&Notification::success(format!(
                "Appointment booked for {} at {}",
                render::display_date(&booked.date),
                booked.time
            )));
        }
        Command::Slots { date, exclude } => {
            let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| BookingError::InvalidDate(date.clone()))?;
            if parsed.format("%Y-%m-%d").to_string() != date {
                return Err(BookingError::InvalidDate(date));
            }
            let slots = engine.available_slots(&date, exclude.as_deref());
            write!(out, "{}", render::slot_grid(&date, &slots))?;
        }
        Command::List(filter) => {
            let view = engine.display(&filter.into_view(QuickFilter::Pending));
            write!(out, "{}", render::appointment_list(&view))?;
        }
        Command::Show { id } => {
            let appointment = engine.get(&id).ok_or(BookingError::NotFound(id))?;
            write!(out, "{}", render::appointment_detail(appointment))?;
        }
        Command::Edit(args) => {
            let id = args.id.clone();
            let current = engine
                .get(&id)
                .map(AppointmentFields::from)
                .ok_or_else(|| BookingError::NotFound(id.clone()))?;
            let updated = engine.update(&id, args.apply_to(current))?;
            write!(out, "{}", render::appointment_detail(&updated))?;
            notifier.notify(&Notification::success("Appointment updated"));
        }
        Command::Delete { id } => {
            if engine.delete(&id)? {
                notifier.notify(&Notification::success("Appointment deleted"));
            } else {
                notifier.notify(&Notification::info(format!("No appointment with id {id}")));
            }
        }
        Command::Stats => {
            write!(out, "{}", render::stats(&engine.stats()))?;
        }
        Command::Export { out: path, filter } => {
            let view = engine.display(&filter.into_view(QuickFilter::All));
            let path = path.unwrap_or_else(|| PathBuf::from(export_filename(engine.today())));
            let mut writer = AppointmentWriter::new(BufWriter::new(File::create(&path)?));
            writer.write_appointments(view.iter().copied())?;
            writer.into_inner()?.flush()?;
            notifier.notify(&Notification::success(format!(
                "Exported {} appointment(s) to {}",
                view.len(),
                path.display()
            )));
        }
        // Handled by `run` before an engine is opened.
        Command::Admin(_) | Command::Login { .. } | Command::Logout => {}
    }
    Ok(())
}

fn run_admin(
    command: AdminCommand,
    mut accounts: AdminAccountManager,
    notifier: &dyn Notifier,
    out: &mut impl Write,
) -> BookingResult<()> {
    match command {
        AdminCommand::List => {
            write!(out, "{}", render::admin_list(accounts.list(), accounts.current_user()))?;
        }
        AdminCommand::Add {
            username,
            password,
            confirm,
        } => {
            if confirm.is_some_and(|confirm| confirm != password) {
                return Err(BookingError::PasswordMismatch);
            }
            accounts.add(&username, &password)?;
            notifier.notify(&Notification::success(format!(
                "Administrator {} added",
                username.trim()
            )));
        }
        AdminCommand::Remove { username } => {
            accounts.remove(&username)?;
            notifier.notify(&Notification::success(format!(
                "Administrator {username} removed"
            )));
        }
    }
    Ok(())
}

fn open_accounts(
    store: KeyValueStoreBox,
    notifier: &dyn Notifier,
) -> BookingResult<AdminAccountManager> {
    let (accounts, warning) = AdminAccountManager::open(store)?;
    if let Some(warning) = warning {
        notifier.notify(&Notification::from(&warning));
    }
    Ok(accounts)
}

fn clock(settings: &Settings) -> ClockBox {
    match settings.today {
        Some(today) => Box::new(FixedClock::on(today)),
        None => Box::new(SystemClock),
    }
}

/// Opens the configured backend once and hands out boxed handles sharing it.
fn store_factory(settings: &Settings) -> BookingResult<KeyValueStoreFactory> {
    if let Some(db_path) = &settings.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = RocksDBStore::open(db_path)?;
            return Ok(Box::new(move || Box::new(store.clone()) as KeyValueStoreBox));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            tracing::debug!(path = %db_path.display(), "rocksdb backend unavailable");
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to JSON-file storage."
            );
        }
    }

    let store = JsonFileStore::open(&settings.data_dir)?;
    Ok(Box::new(move || Box::new(store.clone()) as KeyValueStoreBox))
}
