//! Driving the `tl` executable.
//!
//! Every analysis writes the document to a fresh temporary file, runs
//! `tl check` and `tl types` on it and reads both outputs to completion.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use tl_diagnostic::{translate, CheckOutcome, DiagnosticMap, PathMapper, TEMP_FILE_PREFIX};
use tl_types::{ReportError, TypeReport};
use tokio::process::Command;

/// Oldest compiler whose `types` output this server understands.
pub const MIN_VERSION: Version = Version::new(0, 15, 0);

#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    #[error("Teal compiler `{program}` not found; install it or set `compilerPath`")]
    NotFound { program: String },
    #[error("failed to run the Teal compiler: {0}")]
    Spawn(#[source] io::Error),
    #[error("failed to write temporary file: {0}")]
    TempFile(#[source] io::Error),
    #[error("`tl {command}` produced no output")]
    EmptyOutput { command: &'static str },
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Teal compiler crashed:\n{output}")]
    Crashed { output: String },
    #[error("unrecognized `tl --version` output: {output:?}")]
    Version { output: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid version pattern"));

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// First `major.minor.patch` triple in `text`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = VERSION.captures(text)?;
        Some(Version::new(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        ))
    }

    pub fn is_supported(self) -> bool {
        self >= MIN_VERSION
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Raw output of one analysis run.
#[derive(Clone, Debug)]
pub struct CompilerOutput {
    /// Path of the temporary copy, as passed to the compiler.
    pub main_file: String,
    pub check_stderr: String,
    pub types_stdout: String,
}

impl CompilerOutput {
    pub fn diagnostics(&self, paths: &PathMapper) -> Result<DiagnosticMap, CompilerError> {
        match translate(&self.check_stderr, paths) {
            CheckOutcome::Diagnostics(map) => Ok(map),
            CheckOutcome::Crashed(output) => Err(CompilerError::Crashed { output }),
        }
    }

    pub fn report(&self) -> Result<TypeReport, CompilerError> {
        if self.types_stdout.trim().is_empty() {
            return Err(CompilerError::EmptyOutput { command: "types" });
        }
        Ok(TypeReport::from_json(&self.types_stdout, &self.main_file)?)
    }
}

#[derive(Clone, Debug)]
pub struct Compiler {
    program: PathBuf,
}

impl Compiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Compiler {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&OsStr], cwd: Option<&Path>) -> Result<Output, CompilerError> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(cwd) = cwd.filter(|dir| dir.is_dir()) {
            command.current_dir(cwd);
        }
        command.output().await.map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => CompilerError::NotFound {
                program: self.program.display().to_string(),
            },
            _ => CompilerError::Spawn(err),
        })
    }

    #[tracing::instrument(level = "debug", skip(self), fields(program = %self.program.display()))]
    pub async fn version(&self) -> Result<Version, CompilerError> {
        let output = self.run(&[OsStr::new("--version")], None).await?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Version::parse(&text).ok_or(CompilerError::Version { output: text })
    }

    /// Check `source` and collect its type report, with `cwd` as the
    /// compiler's working directory.
    #[tracing::instrument(level = "debug", skip(self, source), fields(len = source.len()))]
    pub async fn analyze(&self, source: &str, cwd: &Path) -> Result<CompilerOutput, CompilerError> {
        let temp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(".tl")
            .tempfile()
            .map_err(CompilerError::TempFile)?;
        tokio::fs::write(temp.path(), source)
            .await
            .map_err(CompilerError::TempFile)?;
        let path = temp.path().as_os_str();

        let check = self.run(&[OsStr::new("check"), path], Some(cwd)).await?;
        let types = self.run(&[OsStr::new("types"), path], Some(cwd)).await?;
        tracing::debug!(
            check_status = ?check.status,
            types_status = ?types.status,
            "compiler finished"
        );

        Ok(CompilerOutput {
            main_file: temp.path().to_string_lossy().into_owned(),
            check_stderr: String::from_utf8_lossy(&check.stderr).into_owned(),
            types_stdout: String::from_utf8_lossy(&types.stdout).into_owned(),
        })
    }
}
