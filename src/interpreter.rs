use crate::builtin::{banner, builtin_table};
use crate::command::{CommandFactory, Flow};
use crate::config::ConfigStore;
use crate::error::{ShellError, ShellResult};
use crate::lexer::CommandLine;
use crate::state::SessionState;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::{debug, warn};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";
const EXIT_QUESTION: &str = "\nAre you sure you want to exit? (y/n): ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate, see `Builtin`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The interactive session: owns the [`SessionState`] and routes every line
/// through the builtin table.
///
/// Example
/// ```
/// use buntu_shell::{ConfigStore, Interpreter, SessionState};
/// let dir = std::env::temp_dir();
/// let mut sh = Interpreter::new(SessionState::default(), ConfigStore::new(dir.join("doc.json")));
/// let mut out = Vec::new();
/// sh.execute("setenv GREETING hi", &mut out);
/// assert_eq!(sh.session().environment.get("GREETING"), Some("hi"));
/// ```
pub struct Interpreter {
    session: SessionState,
    store: ConfigStore,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create an interpreter over a loaded session, saving to `store` on exit.
    pub fn new(session: SessionState, store: ConfigStore) -> Self {
        Self {
            session,
            store,
            commands: builtin_table(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Run one input line.
    ///
    /// The line is trimmed and `${NAME}` references are substituted. A
    /// non-empty result is appended to history before anything else can fail,
    /// then a leading alias is expanded once and the line is routed.
    pub fn dispatch(&mut self, line: &str, stdout: &mut dyn Write) -> ShellResult<Flow> {
        let resolved = self.session.environment.substitute(line.trim());
        if !resolved.is_empty() {
            self.session.history.push(resolved.clone());
        }

        let expanded = match self.session.aliases.expand(&resolved) {
            Some(expanded) => {
                debug!(from = %resolved, to = %expanded, "alias expanded");
                expanded
            }
            None => resolved,
        };

        let line = CommandLine::parse(&expanded);
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&line) {
                debug!(verb = factory.verb(), line = line.raw(), "dispatching");
                return cmd.execute(stdout, &mut self.session);
            }
        }
        Err(ShellError::Unrecognized(line.raw().to_string()))
    }

    /// Like [`Interpreter::dispatch`], but prints any error and carries on.
    pub fn execute(&mut self, line: &str, stdout: &mut dyn Write) -> Flow {
        match self.dispatch(line, stdout) {
            Ok(flow) => flow,
            Err(err) => {
                debug!(kind = ?err.kind(), "command failed");
                // Nowhere left to report a failing writer.
                let _ = writeln!(stdout, "{err}");
                Flow::Continue
            }
        }
    }

    /// Persist the session to the configured path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.store.save(&self.session)?;
        Ok(())
    }

    /// Handle the answer to the exit question. Returns `true` when the session
    /// was saved and the loop should end.
    pub fn confirm_exit(&mut self, answer: &str, stdout: &mut dyn Write) -> bool {
        let answer = answer.trim().to_lowercase();
        if answer != "y" && answer != "yes" {
            let _ = writeln!(stdout);
            return false;
        }
        match self.save() {
            Ok(()) => {
                let _ = writeln!(
                    stdout,
                    "Configuration saved to '{}'.",
                    self.store.path().display()
                );
                true
            }
            Err(err) => {
                warn!(error = %err, "saving the session failed");
                let _ = writeln!(stdout, "Failed to save configuration: {err:#}");
                false
            }
        }
    }

    /// Read-Eval-Print Loop over the terminal.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        for entry in &self.session.history {
            rl.add_history_entry(entry.as_str())?;
        }

        let mut stdout = std::io::stdout();
        print!("{}", banner());

        loop {
            let readline = rl.readline(&self.session.prompt());
            match readline {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    match self.execute(&line, &mut stdout) {
                        Flow::Continue => {}
                        Flow::ClearScreen => {
                            print!("{CLEAR_SCREEN}{}", banner());
                        }
                        Flow::ConfirmExit => {
                            let answer = match rl.readline(EXIT_QUESTION) {
                                Ok(answer) => answer,
                                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                                    String::new()
                                }
                                Err(err) => return Err(err.into()),
                            };
                            if self.confirm_exit(&answer, &mut stdout) {
                                break;
                            }
                        }
                    }
                    stdout.flush()?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("Eof");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}
