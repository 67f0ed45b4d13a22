//! End-to-end checks of a session driven through the public [`Interpreter`] API.

use buntu_shell::{ConfigStore, ErrorKind, Flow, Interpreter, LoadStatus, PromptColor, SessionState};
use std::path::Path;
use tempfile::TempDir;

struct TestSession {
    dir: TempDir,
    sh: Interpreter,
}

impl TestSession {
    fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let sh = Self::interpreter_in(dir.path());
        Self { dir, sh }
    }

    fn interpreter_in(dir: &Path) -> Interpreter {
        let session = SessionState {
            working_directory: dir.to_path_buf(),
            ..SessionState::default()
        };
        Interpreter::new(session, ConfigStore::new(dir.join("config.json")))
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    /// Run a line, returning what it printed and the error kind, if any.
    fn run(&mut self, line: &str) -> (String, Option<ErrorKind>) {
        let mut out = Vec::new();
        let kind = self.sh.dispatch(line, &mut out).err().map(|e| e.kind());
        (String::from_utf8(out).unwrap(), kind)
    }
}

#[test]
fn substitution_replaces_known_and_keeps_unknown() {
    let mut t = TestSession::start();
    t.run("setenv DIR alpha");

    let (_, err) = t.run("mkdir prefix${DIR}suffix");
    assert_eq!(err, None);
    assert!(t.path("prefixalphasuffix").is_dir());

    let (_, err) = t.run("mkdir ${FOO}");
    assert_eq!(err, None);
    assert!(t.path("${FOO}").is_dir());
}

#[test]
fn setalias_unalias_and_listalias() {
    let mut t = TestSession::start();

    let (out, _) = t.run("setalias ll ls");
    assert_eq!(out, "Alias 'll' set to 'ls'.\n");
    let (out, _) = t.run("listalias");
    assert!(out.contains("ll -> ls"));

    let (_, err) = t.run("unalias ll");
    assert_eq!(err, None);
    let (out, _) = t.run("listalias");
    assert!(!out.contains("ll -> ls"));

    let (_, err) = t.run("unalias ll");
    assert_eq!(err, Some(ErrorKind::NotFound));
}

#[test]
fn setalias_with_quotes_splits_on_whitespace() {
    let mut t = TestSession::start();
    let (_, err) = t.run(r#"setalias ll "ls -l""#);
    assert_eq!(err, Some(ErrorKind::Usage));
    assert!(t.sh.session().aliases.is_empty());
}

#[test]
fn alias_invocation_runs_target() {
    let mut t = TestSession::start();
    std::fs::write(t.path("visible.txt"), "").unwrap();
    t.run("setalias dir ls");

    let (out, err) = t.run("dir");
    assert_eq!(err, None);
    assert!(out.contains("visible.txt"));
}

#[test]
fn mkdir_twice_conflicts() {
    let mut t = TestSession::start();
    let (_, err) = t.run("mkdir sub1");
    assert_eq!(err, None);
    let (_, err) = t.run("mkdir sub1");
    assert_eq!(err, Some(ErrorKind::Conflict));
}

#[test]
fn ls_all_shows_hidden() {
    let mut t = TestSession::start();
    std::fs::write(t.path(".hidden"), "").unwrap();

    let (out, _) = t.run("ls");
    assert!(!out.contains(".hidden"));
    let (out, _) = t.run("ls -a");
    assert!(out.contains(".hidden"));
}

#[test]
fn rm_directory_needs_recursive_flag() {
    let mut t = TestSession::start();
    t.run("mkdir sub1");

    let (_, err) = t.run("rm sub1");
    assert_eq!(err, Some(ErrorKind::Validation));
    assert!(t.path("sub1").is_dir());

    let (_, err) = t.run("rm -r sub1");
    assert_eq!(err, None);
    assert!(!t.path("sub1").exists());
}

#[test]
fn kill_validates_pid() {
    let mut t = TestSession::start();
    let (_, err) = t.run("kill abc");
    assert_eq!(err, Some(ErrorKind::Validation));

    let (_, err) = t.run(&format!("kill {}", i32::MAX));
    assert_eq!(err, Some(ErrorKind::NotFound));

    let (_, err) = t.run("kill -5");
    assert_eq!(err, Some(ErrorKind::Validation));

    let (_, err) = t.run("kill");
    assert_eq!(err, Some(ErrorKind::Usage));
}

#[test]
fn unknown_verb_is_recorded_and_reported() {
    let mut t = TestSession::start();
    let (_, err) = t.run("frobnicate");
    assert_eq!(err, Some(ErrorKind::Unrecognized));
    assert_eq!(t.sh.session().history, vec!["frobnicate"]);
}

#[test]
fn cp_onto_itself_and_into_own_subtree_are_refused() {
    let mut t = TestSession::start();
    std::fs::write(t.path("a.txt"), "precious").unwrap();
    t.run("mkdir src");

    let (_, err) = t.run("cp a.txt .");
    assert_eq!(err, Some(ErrorKind::Validation));
    assert_eq!(std::fs::read_to_string(t.path("a.txt")).unwrap(), "precious");

    let (_, err) = t.run("cp src src/sub");
    assert_eq!(err, Some(ErrorKind::Conflict));
    assert!(!t.path("src/sub").exists());
}

#[test]
fn ping_without_host_is_usage() {
    let mut t = TestSession::start();
    let (_, err) = t.run("ping");
    assert_eq!(err, Some(ErrorKind::Usage));
}

#[test]
fn prompt_reflects_customization() {
    let mut t = TestSession::start();
    t.run("crn alice");
    t.run("ccn box");
    t.run("promptcolor green");

    let prompt = t.sh.prompt();
    assert!(prompt.starts_with(PromptColor::Green.code()));
    assert!(prompt.contains("alice@box:"));

    let (_, err) = t.run("promptcolor mauve");
    assert_eq!(err, Some(ErrorKind::Validation));
    assert_eq!(t.sh.session().prompt_color, PromptColor::Green);
}

#[test]
fn cd_moves_session_without_moving_process() {
    let mut t = TestSession::start();
    let before = std::env::current_dir().unwrap();
    t.run("mkdir inner");

    let (_, err) = t.run("cd inner");
    assert_eq!(err, None);
    let (out, _) = t.run("pwd");
    assert!(out.trim_end().ends_with("inner"));
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[test]
fn session_survives_save_and_load() {
    let mut t = TestSession::start();
    t.run("setalias ll ls");
    t.run("setenv PROJECT buntu");
    t.run("crn alice");
    t.run("frobnicate");
    assert_eq!(t.run("exit").1, None);
    assert!(t.sh.confirm_exit("y", &mut Vec::new()));

    let (loaded, status) = ConfigStore::new(t.path("config.json")).load();
    assert!(matches!(status, LoadStatus::Loaded(_)));
    assert_eq!(&loaded, t.sh.session());
    assert_eq!(loaded.aliases.get("ll"), Some("ls"));
    assert_eq!(loaded.environment.get("PROJECT"), Some("buntu"));
}

#[test]
fn declined_exit_keeps_going() {
    let mut t = TestSession::start();
    let mut out = Vec::new();
    assert_eq!(t.sh.execute("exit", &mut out), Flow::ConfirmExit);
    assert!(!t.sh.confirm_exit("n", &mut out));
    assert!(!t.path("config.json").exists());
}
