//! REPL command parsing.

/// Commands offered for completion.
pub const COMMANDS: &[&str] = &[
    "/login", "/logout", "/whoami", "/refresh", "/lookup", "/confirm", "/otp", "/resend",
    "/cancel", "/status", "/history", "/show", "/receipt", "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: String },
    Logout,
    WhoAmI,
    Refresh,
    Lookup { student_id: String },
    Confirm,
    Otp { code: String },
    Resend,
    Cancel,
    Status,
    History,
    Show { transaction_id: String },
    Receipt { transaction_id: String },
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Errors are usage messages.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Ok(Self::Quit);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let required = |usage: &str| {
            if arg.is_empty() {
                Err(format!("Usage: {}", usage))
            } else {
                Ok(arg.to_string())
            }
        };

        match name {
            "/login" => Ok(Self::Login {
                username: required("/login <username>")?,
            }),
            "/logout" => Ok(Self::Logout),
            "/whoami" => Ok(Self::WhoAmI),
            "/refresh" => Ok(Self::Refresh),
            // the flow validates the id itself, so an empty one is passed through
            "/lookup" => Ok(Self::Lookup {
                student_id: arg.to_string(),
            }),
            "/confirm" => Ok(Self::Confirm),
            "/otp" => Ok(Self::Otp {
                code: arg.to_string(),
            }),
            "/resend" => Ok(Self::Resend),
            "/cancel" => Ok(Self::Cancel),
            "/status" => Ok(Self::Status),
            "/history" => Ok(Self::History),
            "/show" => Ok(Self::Show {
                transaction_id: required("/show <transaction_id>")?,
            }),
            "/receipt" => Ok(Self::Receipt {
                transaction_id: required("/receipt <transaction_id>")?,
            }),
            "/help" => Ok(Self::Help),
            other => Err(format!("Unknown command '{}'. Type /help.", other)),
        }
    }
}

pub const HELP: &str = "\
/login <username>        log in (asks for the password)
/logout                  log out
/whoami                  show the logged-in user and balance
/refresh                 re-fetch the balance from the bank
/lookup <student_id>     look up a student's tuition debt
/confirm                 pay the displayed debt
/otp <code>              submit the 6-digit OTP
/resend                  request a new OTP
/cancel                  close the OTP prompt
/status                  show the payment state
/history                 list your transactions
/show <transaction_id>   show one transaction
/receipt <transaction_id> save a receipt file
quit                     exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            Command::parse("/lookup  sv0001234 ").unwrap(),
            Command::Lookup {
                student_id: "sv0001234".to_string()
            }
        );
        assert_eq!(
            Command::parse("/otp 123456").unwrap(),
            Command::Otp {
                code: "123456".to_string()
            }
        );
        assert_eq!(
            Command::parse("/login payer01").unwrap(),
            Command::Login {
                username: "payer01".to_string()
            }
        );
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_missing_arguments() {
        assert!(Command::parse("/login").unwrap_err().starts_with("Usage"));
        assert!(Command::parse("/receipt").is_err());
        // validation is left to the flow
        assert_eq!(
            Command::parse("/lookup").unwrap(),
            Command::Lookup {
                student_id: String::new()
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::parse("/pay").unwrap_err().contains("/help"));
    }

    #[test]
    fn test_every_completion_parses() {
        for name in COMMANDS {
            let line = format!("{} x", name);
            assert!(Command::parse(&line).is_ok(), "{}", name);
        }
    }
}
