//! Executable backed by a real child process.

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::execute::{ExecError, Executable, Execution, Sink};

/// Runs a named program, looked up on the `PATH` of each execution.
///
/// The lookup happens per execution so a directory prepended to `PATH` by the
/// caller (a freshly installed layer, say) is honoured.
#[derive(Debug, Clone)]
pub struct CommandExecutable {
  program: String,
}

impl CommandExecutable {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }

  fn locate(&self, execution: &Execution) -> Result<PathBuf, ExecError> {
    let search_path = execution
      .env_var("PATH")
      .map(OsStr::to_os_string)
      .or_else(|| std::env::var_os("PATH"));
    let cwd = match &execution.dir {
      Some(dir) => dir.clone(),
      None => std::env::current_dir()?,
    };

    which::which_in(&self.program, search_path, cwd).map_err(|source| ExecError::NotFound {
      program: self.program.clone(),
      source,
    })
  }
}

impl Executable for CommandExecutable {
  async fn execute(&self, execution: Execution) -> Result<(), ExecError> {
    let program = self.locate(&execution)?;
    let Execution {
      args,
      dir,
      env,
      stdout,
      stderr,
    } = execution;

    info!(program = %program.display(), args = ?args, "executing command");

    let mut command = Command::new(&program);
    command
      .args(&args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());
    if let Some(dir) = &dir {
      command.current_dir(dir);
    }
    if let Some(env) = env {
      command.env_clear().envs(env);
    }

    debug!(working_dir = ?dir, "spawning process");

    let mut child = command.spawn().map_err(|source| ExecError::Spawn {
      program: self.program.clone(),
      source,
    })?;

    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();

    // Drain both pipes while waiting so a chatty child never blocks on a full pipe.
    let (status, out, err) = tokio::join!(
      child.wait(),
      pump(child_stdout, stdout),
      pump(child_stderr, stderr),
    );
    out?;
    err?;
    let status = status?;

    if !status.success() {
      debug!(status = %status, "command failed");
      return Err(ExecError::Failed {
        program: self.program.clone(),
        code: status.code(),
      });
    }

    Ok(())
  }
}

/// Copy a child stream into a sink chunk by chunk.
async fn pump<R>(reader: Option<R>, mut sink: Sink) -> std::io::Result<()>
where
  R: AsyncRead + Unpin,
{
  let Some(mut reader) = reader else {
    return Ok(());
  };

  let mut buffer = [0u8; 8192];
  loop {
    let read = reader.read(&mut buffer).await?;
    if read == 0 {
      break;
    }
    sink.write_all(&buffer[..read])?;
  }
  sink.flush()
}
