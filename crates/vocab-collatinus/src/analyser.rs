//! Subprocess driver for the Collatinus command-line client.
//!
//! The client keeps its translation language as process-external state, so
//! the language is set once through [`Analyser::session`] and only the
//! resulting [`Session`] may lemmatise. Invocations are strictly sequential:
//! each chunk's process is read to end-of-stream and reaped before the next
//! one starts, which keeps the concatenated output in source order.

use std::{
  io,
  path::{Path, PathBuf},
  process::{ExitStatus, Stdio},
  time::Duration,
};

use tokio::{
  io::{AsyncBufReadExt, AsyncReadExt, BufReader},
  process::Command,
};
use tracing::debug;

use crate::{Error, Result, language::Language};

/// Install location of the client inside the reference container image.
pub const DEFAULT_EXECUTABLE: &str = "/collatinus/bin/Client_C11";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest single output line accepted from the analyser.
pub const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

// ─── Analyser ────────────────────────────────────────────────────────────────

/// Location, language and time budget of the external analyser.
#[derive(Debug, Clone)]
pub struct Analyser {
  executable: PathBuf,
  language:   Language,
  timeout:    Duration,
}

impl Analyser {
  pub fn new(executable: impl Into<PathBuf>, language: Language) -> Self {
    Self {
      executable: executable.into(),
      language,
      timeout: DEFAULT_TIMEOUT,
    }
  }

  /// Bound every single invocation (including the language call) by
  /// `timeout`. An invocation that overruns is killed.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn executable(&self) -> &Path { &self.executable }

  pub fn language(&self) -> Language { self.language }

  /// Switch the analyser to the configured language and return a session
  /// that can lemmatise in it.
  pub async fn session(&self) -> Result<Session<'_>> {
    let fail = |reason: String| Error::LanguageConfigurationFailed {
      language: self.language,
      reason,
    };

    let mut command = Command::new(&self.executable);
    command
      .arg(self.language.flag())
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    let output = tokio::time::timeout(self.timeout, command.output())
      .await
      .map_err(|_| fail(format!("no response within {:?}", self.timeout)))?
      .map_err(|e| fail(e.to_string()))?;

    if !output.status.success() {
      return Err(fail(exit_message(output.status, &output.stderr)));
    }

    debug!(language = %self.language, "analyser language configured");
    Ok(Session { analyser: self })
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Proof that the analyser's language has been configured for this run.
#[derive(Debug)]
pub struct Session<'a> {
  analyser: &'a Analyser,
}

impl Session<'_> {
  pub fn language(&self) -> Language { self.analyser.language }

  /// Lemmatise every chunk in order and return the concatenated output.
  ///
  /// The first failing chunk aborts the run; later chunks are never started.
  pub async fn lemmatise_all(&self, chunks: &[String]) -> Result<String> {
    let mut output = String::new();
    for (index, chunk) in chunks.iter().enumerate() {
      debug!(chunk = index + 1, of = chunks.len(), "lemmatising");
      self.lemmatise(index + 1, chunk, &mut output).await?;
    }
    Ok(output)
  }

  /// Run the analyser on one chunk, appending its output lines to `output`.
  /// `chunk_number` is 1-based and only used for error context.
  pub async fn lemmatise(
    &self,
    chunk_number: usize,
    chunk: &str,
    output: &mut String,
  ) -> Result<()> {
    let timeout = self.analyser.timeout;
    match tokio::time::timeout(timeout, self.invoke(chunk, output)).await {
      Ok(Ok(())) => Ok(()),
      Ok(Err(source)) => Err(Error::LemmatisationFailed {
        chunk: chunk_number,
        source,
      }),
      Err(_) => Err(Error::AnalyserTimedOut {
        chunk: chunk_number,
        after: timeout,
      }),
    }
  }

  async fn invoke(&self, chunk: &str, output: &mut String) -> io::Result<()> {
    let mut child = Command::new(&self.analyser.executable)
      .arg("-p2")
      .arg(chunk)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()?;

    let stdout = child
      .stdout
      .take()
      .ok_or_else(|| io::Error::other("analyser stdout was not captured"))?;
    let mut stderr = child
      .stderr
      .take()
      .ok_or_else(|| io::Error::other("analyser stderr was not captured"))?;

    let read_stdout = async {
      let mut reader = BufReader::new(stdout);
      let mut line = Vec::new();
      loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
          break;
        }
        if line.len() > MAX_LINE_BYTES {
          return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("analyser output line exceeds {MAX_LINE_BYTES} bytes"),
          ));
        }
        let text = String::from_utf8_lossy(&line);
        output.push_str(text.trim_end_matches(['\n', '\r']));
        output.push('\n');
      }
      Ok::<(), io::Error>(())
    };
    let read_stderr = async {
      let mut buf = Vec::new();
      stderr.read_to_end(&mut buf).await.map(|_| buf)
    };

    let (stdout_result, stderr_result) = tokio::join!(read_stdout, read_stderr);
    stdout_result?;
    let stderr = stderr_result?;

    let status = child.wait().await?;
    if !status.success() {
      return Err(io::Error::other(exit_message(status, &stderr)));
    }
    Ok(())
  }
}

fn exit_message(status: ExitStatus, stderr: &[u8]) -> String {
  let stderr = String::from_utf8_lossy(stderr);
  match stderr.trim() {
    "" => format!("analyser {status}"),
    detail => format!("analyser {status}: {detail}"),
  }
}
