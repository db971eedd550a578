//! Console rendering of payment flow events.

use colored::Colorize;
use std::sync::Mutex;
use tuition_application::{FlowPresenter, Notice, NoticeBoard, NoticeKind, PaymentReceipt};
use tuition_core::format::format_date;
use tuition_core::format_vnd;
use tuition_core::otp::{CountdownDisplay, OtpChallenge};
use tuition_core::student::{DebtRecord, StudentRecord};

/// Prints flow events as they happen.
///
/// The countdown ticks every second; only whole minutes, the last ten
/// seconds and expiry are printed. The latest value is kept for `/status`.
#[derive(Default)]
pub struct ConsolePresenter {
    notices: NoticeBoard,
    countdown: Mutex<Option<CountdownDisplay>>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notice still within its display time, if any.
    pub fn current_notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    pub fn last_countdown(&self) -> Option<CountdownDisplay> {
        *self.countdown.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_countdown(&self, display: Option<CountdownDisplay>) {
        *self.countdown.lock().unwrap_or_else(|e| e.into_inner()) = display;
    }
}

pub fn print_notice(notice: &Notice) {
    let text = match notice.kind {
        NoticeKind::Success => notice.text.bright_green(),
        NoticeKind::Info => notice.text.bright_blue(),
        NoticeKind::Error => notice.text.red(),
    };
    println!("{}", text);
}

impl FlowPresenter for ConsolePresenter {
    fn notice(&self, notice: Notice) {
        print_notice(&notice);
        self.notices.post(notice);
    }

    fn student_changed(&self, selection: Option<(&StudentRecord, &DebtRecord)>) {
        let Some((student, debt)) = selection else {
            return;
        };
        println!("{}", "Student information".bright_magenta().bold());
        println!("  Student ID:    {}", student.student_id);
        println!("  Full name:     {}", student.full_name);
        println!(
            "  Program:       {}",
            student.program.as_deref().unwrap_or("N/A")
        );
        println!(
            "  Semester:      {} {}",
            debt.semester.as_deref().unwrap_or("N/A"),
            debt.academic_year.as_deref().unwrap_or("")
        );
        println!("  Due date:      {}", format_date(debt.due_date.as_ref()));
        println!(
            "  Amount due:    {}",
            format_vnd(debt.amount).bright_yellow().bold()
        );
    }

    fn confirm_enabled(&self, enabled: bool) {
        if enabled {
            println!("{}", "Type /confirm to pay.".bright_black());
        }
    }

    fn otp_opened(&self, challenge: &OtpChallenge) {
        self.set_countdown(Some(challenge.display()));
        println!(
            "{}",
            format!(
                "An OTP was sent to your email for transaction {}. Enter it with /otp <code> ({} left).",
                challenge.transaction_id(),
                challenge.display()
            )
            .bright_yellow()
        );
    }

    fn countdown(&self, display: CountdownDisplay) {
        self.set_countdown(Some(display));
        let remaining = display.remaining_secs;
        if display.expired {
            println!("{}", format!("OTP {}", display).red().bold());
        } else if remaining % 60 == 0 || remaining <= 10 {
            println!("{}", format!("OTP expires in {}", display).bright_black());
        }
    }

    fn otp_error(&self, message: &str) {
        println!("{}", format!("[OTP] {}", message).yellow());
    }

    fn otp_closed(&self) {
        self.set_countdown(None);
    }

    fn payment_succeeded(&self, receipt: &PaymentReceipt) {
        println!("{}", "Payment Successful!".bright_green().bold());
        println!(
            "  Tuition payment of {} for student {} has been completed.",
            format_vnd(receipt.amount).bold(),
            receipt.student.full_name.bold()
        );
        println!("  Transaction ID: {}", receipt.transaction_id);
        println!("  New balance:    {}", format_vnd(receipt.new_balance));
        println!(
            "  A confirmation email has been sent to {}",
            receipt.email.bold()
        );
    }
}
