use std::io;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    domain::session::{Session, UserIdentity},
    infra::{error::AppError, token_store::TokenStore},
};

use super::contracts::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub email_attempts: usize,
    pub password_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            email_attempts: 3,
            password_attempts: 3,
        }
    }
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Exchanges credentials for a session. Wrong credentials are `Unauthorized`.
    async fn login(&self, email: &str, password: &str) -> Result<Session, SourceError>;
}

pub trait AuthTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl AuthTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use std::io::Write;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(password) => Ok(Some(password)),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(UserIdentity),
    ExitWithGuidance,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] AppError),
}

/// Interactive sign-in: asks for the email, then the password, and persists
/// the resulting session on success.
pub async fn run_login(
    terminal: &mut dyn AuthTerminal,
    client: &dyn AuthClient,
    store: &dyn TokenStore,
    policy: &RetryPolicy,
) -> Result<LoginOutcome, LoginError> {
    let Some(email) = collect_email(terminal, policy.email_attempts)? else {
        return Ok(LoginOutcome::ExitWithGuidance);
    };

    for attempt in 1..=policy.password_attempts {
        let Some(password) = terminal.prompt_secret("Password: ")? else {
            terminal.print_line("Input cancelled (EOF). Run `siteadmin login` again to retry.")?;
            return Ok(LoginOutcome::ExitWithGuidance);
        };

        if password.is_empty() {
            terminal.print_line("Password must not be empty.")?;
            continue;
        }

        match client.login(&email, &password).await {
            Ok(session) => {
                store.save(&session)?;
                let name = if session.user.full_name.is_empty() {
                    email.as_str()
                } else {
                    session.user.full_name.as_str()
                };
                terminal.print_line(&format!("Signed in as {name}."))?;
                tracing::info!(user_id = %session.user.id, "login completed");
                return Ok(LoginOutcome::Authenticated(session.user));
            }
            Err(SourceError::Unauthorized) => {
                terminal.print_line(&format!(
                    "Wrong email or password. Attempts left: {}",
                    policy.password_attempts.saturating_sub(attempt)
                ))?;
            }
            Err(SourceError::Unavailable) => {
                tracing::warn!(code = "LOGIN_BACKEND_UNAVAILABLE", "login request failed");
                terminal.print_line(&SourceError::Unavailable.user_message())?;
                return Ok(LoginOutcome::ExitWithGuidance);
            }
            Err(other) => {
                tracing::warn!(code = other.code(), "login rejected");
                terminal.print_line(&format!("Login failed: {}", other.user_message()))?;
            }
        }
    }

    terminal.print_line("Too many failed attempts. Please try again later.")?;
    Ok(LoginOutcome::ExitWithGuidance)
}

fn collect_email(terminal: &mut dyn AuthTerminal, attempts: usize) -> io::Result<Option<String>> {
    for attempt in 1..=attempts {
        let Some(email) = terminal.prompt_line("Email: ")? else {
            terminal.print_line("Input cancelled (EOF). Run `siteadmin login` again to retry.")?;
            return Ok(None);
        };

        if is_valid_email(&email) {
            return Ok(Some(email));
        }

        terminal.print_line(&format!(
            "That does not look like an email address. Attempts left: {}",
            attempts.saturating_sub(attempt)
        ))?;
    }

    Ok(None)
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use super::*;
    use crate::infra::token_store::MemoryTokenStore;

    #[derive(Default)]
    struct ScriptedTerminal {
        lines: VecDeque<String>,
        secrets: VecDeque<String>,
        printed: Vec<String>,
    }

    impl ScriptedTerminal {
        fn new(lines: &[&str], secrets: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| (*s).to_owned()).collect(),
                secrets: secrets.iter().map(|s| (*s).to_owned()).collect(),
                printed: Vec::new(),
            }
        }
    }

    impl AuthTerminal for ScriptedTerminal {
        fn print_line(&mut self, line: &str) -> io::Result<()> {
            self.printed.push(line.to_owned());
            Ok(())
        }

        fn prompt_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.lines.pop_front())
        }

        fn prompt_secret(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.secrets.pop_front())
        }
    }

    struct StubAuth {
        password: &'static str,
        unavailable: bool,
        attempts: Mutex<Vec<(String, String)>>,
    }

    impl StubAuth {
        fn accepting(password: &'static str) -> Self {
            Self {
                password,
                unavailable: false,
                attempts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AuthClient for StubAuth {
        async fn login(&self, email: &str, password: &str) -> Result<Session, SourceError> {
            self.attempts
                .lock()
                .expect("attempts lock")
                .push((email.to_owned(), password.to_owned()));

            if self.unavailable {
                return Err(SourceError::Unavailable);
            }
            if password != self.password {
                return Err(SourceError::Unauthorized);
            }

            Ok(Session {
                access_token: "access".to_owned(),
                refresh_token: Some("refresh".to_owned()),
                user: UserIdentity {
                    id: "u1".to_owned(),
                    email: email.to_owned(),
                    full_name: "Site Lead".to_owned(),
                    role: "specialist".to_owned(),
                },
            })
        }
    }

    #[tokio::test]
    async fn persists_session_after_successful_login() {
        let mut terminal = ScriptedTerminal::new(&["lead@example.com"], &["secret"]);
        let client = StubAuth::accepting("secret");
        let store = MemoryTokenStore::default();

        let outcome = run_login(&mut terminal, &client, &store, &RetryPolicy::default())
            .await
            .expect("login flow");

        assert!(matches!(outcome, LoginOutcome::Authenticated(user) if user.id == "u1"));
        assert_eq!(
            store.load().expect("load").map(|s| s.access_token),
            Some("access".to_owned())
        );
        assert!(terminal.printed.iter().any(|line| line.contains("Site Lead")));
    }

    #[tokio::test]
    async fn retries_wrong_password_then_succeeds() {
        let mut terminal = ScriptedTerminal::new(&["lead@example.com"], &["nope", "secret"]);
        let client = StubAuth::accepting("secret");
        let store = MemoryTokenStore::default();

        let outcome = run_login(&mut terminal, &client, &store, &RetryPolicy::default())
            .await
            .expect("login flow");

        assert!(matches!(outcome, LoginOutcome::Authenticated(_)));
        assert_eq!(client.attempts.lock().expect("attempts lock").len(), 2);
        assert!(terminal
            .printed
            .iter()
            .any(|line| line.contains("Attempts left: 2")));
    }

    #[tokio::test]
    async fn invalid_email_is_reprompted_without_backend_call() {
        let mut terminal =
            ScriptedTerminal::new(&["not-an-email", "lead@example.com"], &["secret"]);
        let client = StubAuth::accepting("secret");
        let store = MemoryTokenStore::default();

        run_login(&mut terminal, &client, &store, &RetryPolicy::default())
            .await
            .expect("login flow");

        let attempts = client.attempts.lock().expect("attempts lock");
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].0, "lead@example.com");
    }

    #[tokio::test]
    async fn eof_exits_with_guidance_and_stores_nothing() {
        let mut terminal = ScriptedTerminal::new(&[], &[]);
        let client = StubAuth::accepting("secret");
        let store = MemoryTokenStore::default();

        let outcome = run_login(&mut terminal, &client, &store, &RetryPolicy::default())
            .await
            .expect("login flow");

        assert_eq!(outcome, LoginOutcome::ExitWithGuidance);
        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn unavailable_backend_stops_immediately() {
        let mut terminal = ScriptedTerminal::new(&["lead@example.com"], &["a", "b", "c"]);
        let client = StubAuth {
            unavailable: true,
            ..StubAuth::accepting("a")
        };
        let store = MemoryTokenStore::default();

        let outcome = run_login(&mut terminal, &client, &store, &RetryPolicy::default())
            .await
            .expect("login flow");

        assert_eq!(outcome, LoginOutcome::ExitWithGuidance);
        assert_eq!(client.attempts.lock().expect("attempts lock").len(), 1);
    }

    #[test]
    fn validates_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("a@.io"));
    }
}
