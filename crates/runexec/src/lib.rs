//! Engine process launcher.
//! （啟動外部遊戲引擎進程的幫手。）
//!
//! The launcher turns the user's engine command line into an argument vector,
//! points it at the selected archive with `-iwad`, and starts the engine as a
//! detached process. The launcher never waits on the child: once spawned, the
//! engine outlives the launcher and its exit status is not observed.
//! 啟動器不會等待子進程；引擎啟動後即與啟動器脫鉤。

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::info;

/// Short form of the archive-selection flag, appended when missing.
pub const IWAD_FLAG: &str = "-iwad";
/// Long form of the archive-selection flag.
pub const IWAD_FLAG_LONG: &str = "--iwad";

/// Errors that may surface while preparing or starting the engine.
/// （準備或啟動引擎時可能發生的錯誤。）
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("engine command is empty")]
    EmptyCommand,
    #[error("engine command has unbalanced quotes or a trailing escape: {0}")]
    Tokenize(String),
    #[error("failed to resolve working directory: {0}")]
    WorkingDir(#[source] io::Error),
    #[error("engine executable '{program}' was not found")]
    NotFound { program: String },
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Argument vector for one engine launch.
/// （單次引擎啟動的參數設定。）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchSpec {
    /// Starts an argument vector with `program` and no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn push_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments at once.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Splits `command` with POSIX shell rules into a spec.
    /// （以 POSIX shell 規則拆解指令字串。）
    pub fn parse(command: &str) -> Result<Self, LaunchError> {
        let mut tokens =
            shlex::split(command).ok_or_else(|| LaunchError::Tokenize(command.to_string()))?;
        if tokens.is_empty() {
            return Err(LaunchError::EmptyCommand);
        }
        let program = tokens.remove(0);
        Ok(Self::new(program).with_args(tokens))
    }

    /// Builds the launch for `archive`, injecting `-iwad <absolute path>`
    /// unless the command already carries an iwad flag. A user-supplied flag
    /// wins even when it names a different archive.
    pub fn for_archive(command: &str, archive: &Path) -> Result<Self, LaunchError> {
        let spec = Self::parse(command)?;
        if spec.has_iwad_flag() {
            return Ok(spec);
        }
        let archive = absolute_path(archive)?;
        Ok(spec
            .push_arg(IWAD_FLAG)
            .push_arg(archive.to_string_lossy().into_owned()))
    }

    pub fn has_iwad_flag(&self) -> bool {
        self.args
            .iter()
            .any(|arg| arg == IWAD_FLAG || arg == IWAD_FLAG_LONG)
    }

    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Space-joined command line for logs and notices.
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf, LaunchError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(LaunchError::WorkingDir)?;
    Ok(cwd.join(path))
}

/// Handle to a started engine. Only the PID is kept; the process itself is
/// not supervised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchedEngine {
    pub pid: u32,
}

/// Starts engine processes according to a [`LaunchSpec`].
/// （依照設定啟動引擎進程的主要元件。）
pub struct EngineLauncher;

impl EngineLauncher {
    /// Spawns the engine detached from the launcher and returns immediately.
    pub fn launch(spec: &LaunchSpec) -> Result<LaunchedEngine, LaunchError> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());
        detach(&mut command);

        info!(command = %spec.command_line(), "launching engine");
        let child = command.spawn().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LaunchError::NotFound {
                    program: spec.program.clone(),
                }
            } else {
                LaunchError::Spawn {
                    program: spec.program.clone(),
                    source,
                }
            }
        })?;
        let pid = child.id();
        // Dropping the handle neither waits on nor signals the child.
        drop(child);
        info!(pid, "engine started");
        Ok(LaunchedEngine { pid })
    }
}

/// Runs the child in its own session so it has no controlling terminal and
/// receives none of the launcher's job-control signals.
/// （子進程另開 session，與啟動器的終端機脫鉤。）
#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    // SAFETY: the hook only calls `setsid`, which is async-signal-safe.
    unsafe {
        command.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}
