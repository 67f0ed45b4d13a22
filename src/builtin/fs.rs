use super::{Builtin, InvalidArgs, parse_args, usage};
use crate::command::{Arity, Flow, MatchRule};
use crate::error::{ShellError, ShellResult};
use crate::lexer::CommandLine;
use crate::local_fs;
use crate::state::SessionState;
use argh::FromArgs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Print the current working directory.
pub struct Pwd;

impl Builtin for Pwd {
    const VERB: &'static str = "pwd";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "pwd";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(Pwd)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "{}", session.working_directory.to_string_lossy())?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory named by the session's HOME variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to ${HOME} when omitted.
    pub target: Option<String>,
}

impl Builtin for Cd {
    const VERB: &'static str = "cd";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::AtMost(1);
    const USAGE: &'static str = "cd [directory]";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => t.clone(),
            _ => match session.environment.get("HOME") {
                Some(home) if !home.is_empty() => home.to_string(),
                _ => {
                    return Err(ShellError::Validation(
                        "cd: no target and HOME not set".to_string(),
                    ));
                }
            },
        };

        let new_dir = session.resolve(&target);
        let canonical = fs::canonicalize(&new_dir).map_err(|err| {
            ShellError::from_io(
                err,
                format!("cd: {target}: No such file or directory"),
                format!("cd: {target}: Permission denied"),
            )
        })?;
        if !canonical.is_dir() {
            return Err(ShellError::Validation(format!(
                "cd: {target}: Not a directory"
            )));
        }

        session
            .environment
            .set("PWD", canonical.to_string_lossy().into_owned());
        session.working_directory = canonical;
        Ok(Flow::Continue)
    }
}

/// List the working directory. `-a` includes dotfiles, `-l` prints details.
pub struct Ls {
    pub show_all: bool,
    pub long_format: bool,
}

impl Builtin for Ls {
    const VERB: &'static str = "ls";
    const MATCH: MatchRule = MatchRule::Prefix;
    const ARITY: Arity = Arity::Any;
    const USAGE: &'static str = "ls [-a] [-l]";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        // Flags count wherever they appear; everything else is ignored.
        let has = |flag: &str| line.args().iter().any(|arg| arg == flag);
        Ok(Ls {
            show_all: has("-a"),
            long_format: has("-l"),
        })
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        let dir = &session.working_directory;
        let names = local_fs::local_list(dir, self.show_all).map_err(list_error)?;

        for name in names {
            if self.long_format {
                let info = local_fs::local_stat(&dir.join(&name)).map_err(list_error)?;
                writeln!(stdout, "{}", info.long_line())?;
            } else {
                writeln!(stdout, "{name}")?;
            }
        }
        Ok(Flow::Continue)
    }
}

fn list_error(err: std::io::Error) -> ShellError {
    ShellError::from_io(
        err,
        "Directory not found.",
        "Permission Denied. Cannot list files in this directory.",
    )
}

/// Create a directory, including missing parents.
pub struct Mkdir {
    /// Everything after the verb, so names may contain spaces.
    pub name: String,
}

impl Builtin for Mkdir {
    const VERB: &'static str = "mkdir";
    const MATCH: MatchRule = MatchRule::Prefix;
    const ARITY: Arity = Arity::Any;
    const USAGE: &'static str = "mkdir <name>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        let name = line.remainder_after(Self::VERB);
        if name.is_empty() {
            return Err(ShellError::Validation("Please provide a directory name.".to_string()).into());
        }
        Ok(Mkdir {
            name: name.to_string(),
        })
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        let path = session.resolve(&self.name);
        if path.symlink_metadata().is_ok() {
            return Err(ShellError::Conflict(format!(
                "Error: Directory '{}' already exists.",
                self.name
            )));
        }
        fs::create_dir_all(&path).map_err(|err| {
            ShellError::from_io(
                err,
                format!("Error: Cannot create '{}'.", self.name),
                "Permission Denied. Cannot create the directory.",
            )
        })?;
        writeln!(stdout, "Directory '{}' created successfully.", self.name)?;
        Ok(Flow::Continue)
    }
}

/// Remove a file, or with `-r` a whole directory tree.
pub enum Rm {
    File(String),
    Tree(String),
}

impl Builtin for Rm {
    const VERB: &'static str = "rm";
    const MATCH: MatchRule = MatchRule::Prefix;
    const ARITY: Arity = Arity::AtLeast(1);
    const USAGE: &'static str = "rm <file> | rm -r <directory>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        match line.args() {
            [name] => Ok(Rm::File(name.clone())),
            [flag, dir] if flag == "-r" => Ok(Rm::Tree(dir.clone())),
            _ => Err(usage::<Self>().into()),
        }
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        match self {
            Rm::File(name) => {
                let path = session.resolve(&name);
                if path.is_dir() {
                    return Err(ShellError::Validation(
                        "Use 'rm -r' to remove a directory.".to_string(),
                    ));
                }
                if !path.is_file() {
                    return Err(ShellError::NotFound(format!("Error: '{name}' not found.")));
                }
                fs::remove_file(&path).map_err(remove_error)?;
                writeln!(stdout, "File '{name}' removed successfully.")?;
            }
            Rm::Tree(name) => {
                let path = session.resolve(&name);
                if !path.is_dir() {
                    return Err(if path.exists() {
                        ShellError::Validation(format!("Error: '{name}' is not a directory."))
                    } else {
                        ShellError::NotFound(format!("Error: '{name}' not found."))
                    });
                }
                fs::remove_dir_all(&path).map_err(remove_error)?;
                writeln!(
                    stdout,
                    "Directory '{name}' and all its contents removed successfully."
                )?;
            }
        }
        Ok(Flow::Continue)
    }
}

fn remove_error(err: std::io::Error) -> ShellError {
    ShellError::from_io(
        err,
        "File or directory not found.",
        "Permission Denied. Cannot remove the file or directory.",
    )
}

#[derive(FromArgs)]
/// Copy a file or a directory tree.
pub struct Cp {
    #[argh(positional)]
    /// file or directory to copy
    pub source: String,

    #[argh(positional)]
    /// new path, or an existing directory to copy a file into
    pub destination: String,
}

impl Builtin for Cp {
    const VERB: &'static str = "cp";
    const MATCH: MatchRule = MatchRule::Prefix;
    const ARITY: Arity = Arity::Exactly(2);
    const USAGE: &'static str = "cp <source> <destination>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        let source = session.resolve(&self.source);
        let mut destination = session.resolve(&self.destination);

        if !source.exists() {
            return Err(ShellError::NotFound(format!(
                "Error: Source '{}' not found.",
                self.source
            )));
        }

        if source.is_dir() {
            if destination.is_dir() {
                return Err(ShellError::Conflict(format!(
                    "Error: '{}' is a directory. Specify a new destination path.",
                    self.destination
                )));
            }
            if is_inside(&destination, &source) {
                return Err(ShellError::Conflict(format!(
                    "Error: Cannot copy '{}' into itself, '{}'.",
                    self.source, self.destination
                )));
            }
            local_fs::local_copy_tree(&source, &destination).map_err(copy_error)?;
            writeln!(
                stdout,
                "Directory '{}' copied to '{}' successfully.",
                self.source, self.destination
            )?;
        } else {
            if destination.is_dir() {
                destination = into_directory(&destination, &source);
            }
            if is_same_file(&source, &destination) {
                return Err(ShellError::Validation(format!(
                    "'{}' and '{}' are the same file",
                    self.source, self.destination
                )));
            }
            local_fs::local_copy_file(&source, &destination).map_err(copy_error)?;
            writeln!(
                stdout,
                "File '{}' copied to '{}' successfully.",
                self.source, self.destination
            )?;
        }
        Ok(Flow::Continue)
    }
}

/// Where `path` will live once created: its canonical parent joined with its name.
fn canonical_target(path: &Path) -> Option<PathBuf> {
    if let Ok(existing) = fs::canonicalize(path) {
        return Some(existing);
    }
    let parent = fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(path.file_name()?))
}

fn is_inside(path: &Path, dir: &Path) -> bool {
    match (canonical_target(path), fs::canonicalize(dir)) {
        (Some(path), Ok(dir)) => path.starts_with(dir),
        _ => false,
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn into_directory(dir: &Path, source: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}

fn copy_error(err: std::io::Error) -> ShellError {
    ShellError::from_io(
        err,
        "File or directory not found.",
        "Permission Denied. Cannot copy the file or directory.",
    )
}

#[derive(FromArgs)]
/// Print file(s) to stdout.
pub struct Cat {
    #[argh(positional, greedy)]
    /// files to print, relative to the current directory
    pub files: Vec<String>,
}

impl Builtin for Cat {
    const VERB: &'static str = "cat";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::AtLeast(1);
    const USAGE: &'static str = "cat <file>...";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        for fname in self.files {
            let path = session.resolve(&fname);
            if path.is_dir() {
                return Err(ShellError::Validation(format!(
                    "cat: {fname}: Is a directory"
                )));
            }
            let mut f = fs::File::open(&path).map_err(|err| {
                ShellError::from_io(
                    err,
                    format!("cat: {fname}: No such file or directory"),
                    format!("cat: {fname}: Permission denied"),
                )
            })?;
            std::io::copy(&mut f, stdout)?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Create empty files or update their modification time.
pub struct Touch {
    #[argh(positional, greedy)]
    /// files to touch, relative to the current directory
    pub files: Vec<String>,
}

impl Builtin for Touch {
    const VERB: &'static str = "touch";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::AtLeast(1);
    const USAGE: &'static str = "touch <file>...";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        for fname in self.files {
            local_fs::local_touch(&session.resolve(&fname)).map_err(|err| {
                ShellError::from_io(
                    err,
                    format!("touch: cannot touch '{fname}': No such file or directory"),
                    format!("touch: cannot touch '{fname}': Permission denied"),
                )
            })?;
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{output, session_in};
    use crate::error::ErrorKind;

    fn run<T: Builtin>(line: &str, session: &mut SessionState) -> (ShellResult<Flow>, String) {
        let mut out = Vec::new();
        let result = match T::parse(&CommandLine::parse(line)) {
            Ok(cmd) => cmd.execute(&mut out, session),
            Err(InvalidArgs::Error(err)) => Err(err),
            Err(InvalidArgs::Help(text)) => panic!("unexpected help: {text}"),
        };
        (result, output(out))
    }

    #[test]
    fn test_pwd_prints_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let (res, out) = run::<Pwd>("pwd", &mut session);
        assert!(res.is_ok());
        assert_eq!(out, format!("{}\n", dir.path().to_string_lossy()));
    }

    #[test]
    fn test_cd_relative_updates_session_and_pwd_var() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut session = session_in(dir.path());
        let expected = fs::canonicalize(dir.path().join("sub")).unwrap();

        let (res, _) = run::<Cd>("cd sub", &mut session);
        assert!(res.is_ok());
        assert_eq!(session.working_directory, expected);
        assert_eq!(
            session.environment.get("PWD"),
            Some(expected.to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_cd_without_target_goes_home() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session
            .environment
            .set("HOME", home.path().to_string_lossy().into_owned());

        let (res, _) = run::<Cd>("cd", &mut session);
        assert!(res.is_ok());
        assert_eq!(
            session.working_directory,
            fs::canonicalize(home.path()).unwrap()
        );
    }

    #[test]
    fn test_cd_errors_leave_session_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "x").unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Cd>("cd nowhere", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::NotFound);
        let (res, _) = run::<Cd>("cd file.txt", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(session.working_directory, dir.path());
    }

    #[test]
    fn test_ls_hides_dotfiles_without_a() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("visible"), "").unwrap();
        let mut session = session_in(dir.path());

        let (_, out) = run::<Ls>("ls", &mut session);
        assert_eq!(out, "visible\n");

        let (_, out) = run::<Ls>("ls -a", &mut session);
        assert_eq!(out, ".hidden\nvisible\n");
    }

    #[test]
    fn test_ls_long_format() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let mut session = session_in(dir.path());

        let (_, out) = run::<Ls>("ls -l", &mut session);
        let line = out.lines().next().unwrap();
        assert!(line.starts_with("-rw"));
        assert!(line.ends_with(" notes.txt"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_ls_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir.path().join("gone"));
        let (res, _) = run::<Ls>("ls", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_mkdir_then_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let (res, out) = run::<Mkdir>("mkdir sub1", &mut session);
        assert!(res.is_ok());
        assert_eq!(out, "Directory 'sub1' created successfully.\n");
        assert!(dir.path().join("sub1").is_dir());

        let (res, _) = run::<Mkdir>("mkdir sub1", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_mkdir_takes_rest_of_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Mkdir>("mkdir my dir", &mut session);
        assert!(res.is_ok());
        assert!(dir.path().join("my dir").is_dir());

        let (res, _) = run::<Mkdir>("mkdir   ", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_rm_directory_needs_r() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub1/inner")).unwrap();
        fs::write(dir.path().join("sub1/inner/f.txt"), "x").unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Rm>("rm sub1", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Validation);
        assert!(dir.path().join("sub1").is_dir());

        let (res, _) = run::<Rm>("rm -r sub1", &mut session);
        assert!(res.is_ok());
        assert!(!dir.path().join("sub1").exists());
    }

    #[test]
    fn test_rm_file_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        let mut session = session_in(dir.path());

        let (res, out) = run::<Rm>("rm a.txt", &mut session);
        assert!(res.is_ok());
        assert_eq!(out, "File 'a.txt' removed successfully.\n");
        assert!(!dir.path().join("a.txt").exists());

        let (res, _) = run::<Rm>("rm a.txt", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::NotFound);

        let (res, _) = run::<Rm>("rm -x a b", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_rm_r_on_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Rm>("rm -r a.txt", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Validation);
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_cp_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "data").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Cp>("cp a.txt target", &mut session);
        assert!(res.is_ok());
        assert_eq!(
            fs::read_to_string(dir.path().join("target/a.txt")).unwrap(),
            "data"
        );
    }

    #[test]
    fn test_cp_directory_rules() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/deep")).unwrap();
        fs::write(dir.path().join("src/deep/f.txt"), "deep").unwrap();
        fs::create_dir(dir.path().join("existing")).unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Cp>("cp src existing", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Conflict);

        let (res, _) = run::<Cp>("cp src fresh", &mut session);
        assert!(res.is_ok());
        assert_eq!(
            fs::read_to_string(dir.path().join("fresh/deep/f.txt")).unwrap(),
            "deep"
        );

        let (res, _) = run::<Cp>("cp nothing here", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_cp_onto_itself_keeps_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "precious").unwrap();
        let mut session = session_in(dir.path());

        for line in ["cp a.txt .", "cp a.txt a.txt", "cp a.txt ./a.txt"] {
            let (res, out) = run::<Cp>(line, &mut session);
            assert_eq!(res.unwrap_err().kind(), ErrorKind::Validation, "{line}");
            assert!(out.is_empty());
        }
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "precious"
        );
    }

    #[test]
    fn test_cp_directory_into_own_subtree_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/inner")).unwrap();
        fs::write(dir.path().join("src/inner/f.txt"), "x").unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Cp>("cp src src/sub", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Conflict);
        assert!(!dir.path().join("src/sub").exists());

        let (res, _) = run::<Cp>("cp src/inner src/inner/deeper", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_cat_reads_files_relative_to_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "hello\n").unwrap();
        fs::write(dir.path().join("two.txt"), "world\n").unwrap();
        let mut session = session_in(dir.path());

        let (res, out) = run::<Cat>("cat one.txt two.txt", &mut session);
        assert!(res.is_ok());
        assert_eq!(out, "hello\nworld\n");

        let (res, _) = run::<Cat>("cat missing.txt", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_touch_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let (res, _) = run::<Touch>("touch new.txt", &mut session);
        assert!(res.is_ok());
        assert!(dir.path().join("new.txt").is_file());

        let (res, _) = run::<Touch>("touch no/such/dir.txt", &mut session);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
