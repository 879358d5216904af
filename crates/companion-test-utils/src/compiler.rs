//! Validation of generated code with an external compiler.
//!
//! The compiler is taken from `COMPANION_COMPILER` (a program followed by
//! whitespace-separated arguments, e.g. `swiftc -parse`). When it is unset
//! the `assert_valid_*` helpers do nothing, so the suite runs without one.

use std::io::Write;
use std::process::{Command, ExitStatus};

pub const COMPILER_ENV: &str = "COMPANION_COMPILER";

/// A compiler invocation; the source file path is appended as the last
/// argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCommand {
    program: String,
    args: Vec<String>,
    suffix: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CompileCheckError {
    #[error("failed to run the compiler: {0}")]
    Io(#[from] std::io::Error),
    #[error("compiler rejected the source ({status}):\n{stderr}")]
    Rejected { status: ExitStatus, stderr: String },
}

impl CompilerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            suffix: ".swift".into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The file name suffix of the temporary source file.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Split a command line on whitespace; `None` when it is blank.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next()?;
        Some(parts.fold(Self::new(program), Self::arg))
    }

    pub fn from_env() -> Option<Self> {
        Self::parse(&std::env::var(COMPILER_ENV).ok()?)
    }
}

/// Compile `source` from a fresh temporary file.
///
/// Blocks until the compiler exits. The temporary path is replaced by
/// `<source>` in the reported stderr.
pub fn check_source(compiler: &CompilerCommand, source: &str) -> Result<(), CompileCheckError> {
    let mut file = tempfile::Builder::new()
        .prefix("companion-")
        .suffix(&compiler.suffix)
        .tempfile()?;
    file.write_all(source.as_bytes())?;
    file.flush()?;

    let output = Command::new(&compiler.program)
        .args(&compiler.args)
        .arg(file.path())
        .output()?;
    if output.status.success() {
        return Ok(());
    }
    let path = file.path().display().to_string();
    Err(CompileCheckError::Rejected {
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).replace(&path, "<source>"),
    })
}

/// Panic if the configured compiler rejects `source`.
#[track_caller]
pub fn assert_valid_source(source: &str) {
    let Some(compiler) = CompilerCommand::from_env() else {
        return;
    };
    if let Err(err) = check_source(&compiler, source) {
        panic!("{}\n--- source ---\n{}", err, source);
    }
}

/// Check a requirement by wrapping it in a protocol.
#[track_caller]
pub fn assert_valid_protocol_requirement(requirement: &str) {
    assert_valid_source(&format!("protocol Foo {{\n    {}\n}}\n", requirement));
}
