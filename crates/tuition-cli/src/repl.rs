use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use tuition_application::{
    AuthUseCase, ConfirmOutcome, HistoryUseCase, PaymentFlow, ResendOutcome, VerifyOutcome,
    receipt,
};
use tuition_core::TuitionError;
use tuition_core::format::format_datetime;
use tuition_core::format_vnd;
use tuition_core::transaction::{TransactionRecord, TransactionStatus};
use tuition_infrastructure::TuitionPaths;

use crate::commands::{COMMANDS, Command, HELP};
use crate::presenter::{ConsolePresenter, print_notice};

/// rustyline helper: slash-command completion, hints and highlighting.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Everything a REPL command can act on.
pub struct App {
    pub auth: AuthUseCase,
    pub flow: Arc<PaymentFlow>,
    pub history: HistoryUseCase,
    pub presenter: Arc<ConsolePresenter>,
    pub base_url: String,
}

enum Flow {
    Continue,
    Quit,
}

/// Runs the REPL until `quit` or end of input.
pub async fn run(app: App) -> Result<()> {
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Tuition Pay ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Backend: {}. Type /login <username> to start, /help for commands.", app.base_url)
            .bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                // OTP codes stay out of the history
                if !trimmed.starts_with("/otp") {
                    let _ = rl.add_history_entry(trimmed);
                }

                let command = match Command::parse(trimmed) {
                    Ok(command) => command,
                    Err(usage) => {
                        println!("{}", usage.yellow());
                        continue;
                    }
                };

                match dispatch(&app, &mut rl, command).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Err(e) => report(&e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    app.flow.abandon().await;
    Ok(())
}

fn report(error: &TuitionError) {
    tracing::debug!("[Repl] Command failed: {}", error);
    println!("{}", error.user_message().red());
    if error.is_auth() {
        println!("{}", "Log in again with /login <username>.".bright_black());
    }
}

async fn dispatch(
    app: &App,
    rl: &mut Editor<CliHelper, DefaultHistory>,
    command: Command,
) -> Result<Flow, TuitionError> {
    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => println!("{}", HELP),
        Command::Login { username } => {
            let password = match rl.readline("Password: ") {
                Ok(password) => password,
                Err(_) => return Ok(Flow::Continue),
            };
            // a new login starts from a clean flow
            app.flow.reset().await;
            let session = app.auth.login(&username, &password).await?;
            println!(
                "{}",
                format!(
                    "Welcome, {}. Available balance: {}",
                    session.user().full_name,
                    format_vnd(session.available_balance())
                )
                .bright_green()
            );
        }
        Command::Logout => {
            app.auth.logout().await;
            println!("{}", "Logged out.".bright_green());
        }
        Command::WhoAmI => match app.auth.current_user().await {
            Some(user) => {
                println!("  Name:    {}", user.full_name);
                println!("  Email:   {}", user.email);
                println!("  Phone:   {}", user.phone.as_deref().unwrap_or("N/A"));
                println!("  Balance: {}", format_vnd(user.available_balance).bold());
            }
            None => println!("{}", "Not logged in.".yellow()),
        },
        Command::Refresh => {
            let user = app.auth.refresh_user().await?;
            println!("  Balance: {}", format_vnd(user.available_balance).bold());
        }
        Command::Lookup { student_id } => match app.flow.lookup(&student_id).await {
            Ok(outcome) => tracing::debug!("[Repl] Lookup eligible: {}", outcome.is_eligible()),
            // already shown as a notice
            Err(e) if e.is_validation() => {}
            Err(e) => return Err(e),
        },
        Command::Confirm => {
            if let ConfirmOutcome::ChallengeOpened { expires_at, .. } = app.flow.confirm().await? {
                tracing::debug!("[Repl] Challenge open until {}", expires_at);
            }
        }
        Command::Otp { code } => {
            match app.flow.verify(&code).await? {
                VerifyOutcome::Verified(paid) => {
                    tracing::debug!("[Repl] Paid transaction {}", paid.transaction_id);
                }
                outcome @ (VerifyOutcome::Expired | VerifyOutcome::NoActiveChallenge) => {
                    println!("{}", outcome.user_message().yellow());
                }
                // reported through the presenter
                _ => {}
            }
        }
        Command::Resend => {
            if app.flow.resend().await? == ResendOutcome::NoActiveChallenge {
                println!("{}", ResendOutcome::NoActiveChallenge.user_message().yellow());
            }
        }
        Command::Cancel => {
            if app.flow.abandon().await {
                println!("{}", "OTP prompt closed.".bright_black());
            }
        }
        Command::Status => print_status(app).await,
        Command::History => {
            let records = app.history.list().await?;
            if records.is_empty() {
                println!("{}", "No transactions yet.".bright_black());
            }
            for record in &records {
                print_record_line(record);
            }
        }
        Command::Show { transaction_id } => {
            let record = app.history.find(&transaction_id).await?;
            print_record_detail(&record);
        }
        Command::Receipt { transaction_id } => {
            let record = app.history.find(&transaction_id).await?;
            let payer = app
                .auth
                .current_user()
                .await
                .map(|u| u.full_name)
                .unwrap_or_default();
            let content = receipt::render_receipt(&record, &payer, chrono::Utc::now());
            let dir = TuitionPaths::receipt_dir()?;
            let path = dir.join(receipt::receipt_file_name(&record));
            std::fs::write(&path, content)?;
            println!(
                "{}",
                format!("Receipt saved to {}", path.display()).bright_green()
            );
        }
    }
    Ok(Flow::Continue)
}

async fn print_status(app: &App) {
    match app.flow.selection().await {
        Some(selection) => println!(
            "  Selected: {} ({}), {} due",
            selection.student.student_id,
            selection.student.full_name,
            format_vnd(selection.debt.amount)
        ),
        None => println!("  Selected: none"),
    }
    match app.flow.challenge().await {
        Some(challenge) => {
            let display = app
                .presenter
                .last_countdown()
                .unwrap_or_else(|| challenge.display());
            println!(
                "  OTP: transaction {}, {}",
                challenge.transaction_id(),
                display
            );
        }
        None => println!("  OTP: none"),
    }
    if let Some(notice) = app.presenter.current_notice() {
        print_notice(&notice);
    }
}

fn print_record_line(record: &TransactionRecord) {
    let status = record.status.to_string();
    let status = match record.status {
        TransactionStatus::Success => status.bright_green(),
        TransactionStatus::Failed => status.red(),
        TransactionStatus::Pending => status.yellow(),
    };
    println!(
        "  {:<8} {:<16} -{:>16}  {}  {}",
        record.transaction_id.as_str(),
        format_datetime(record.display_time()),
        format_vnd(record.amount),
        status,
        record.receiver_label()
    );
}

fn print_record_detail(record: &TransactionRecord) {
    println!("  Transaction ID: {}", record.transaction_id);
    println!("  Status:         {}", record.status);
    println!("  Date:           {}", format_datetime(record.display_time()));
    println!("  Student ID:     {}", record.receiver_id);
    println!("  Student name:   {}", record.receiver_label());
    println!("  Amount:         {}", format_vnd(record.amount));
    println!(
        "  Semester:       {}",
        record.semester.as_deref().unwrap_or("N/A")
    );
    println!(
        "  Academic year:  {}",
        record.academic_year.as_deref().unwrap_or("N/A")
    );
    if let Some(reason) = &record.failure_reason {
        println!("  Failure reason: {}", reason.red());
    }
}
