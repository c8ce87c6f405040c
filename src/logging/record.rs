//! Log records as handed over by the logging pipeline

use std::collections::BTreeMap;
use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::logging::error::FormatResult;
use crate::logging::level::Severity;
use crate::logging::template::render_message;

/// One logging event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Logger name (tracing target)
    pub name: String,
    pub severity: Severity,
    /// Message template, interpolated only when arguments are present
    pub msg: String,
    pub args: Vec<Value>,
    pub kwargs: BTreeMap<String, Value>,
    /// Seconds since the Unix epoch
    pub created: f64,
    pub exc_info: Option<ExceptionInfo>,
    pub stack_info: Option<String>,
}

impl LogRecord {
    /// Record stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        severity: impl Into<Severity>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            severity: severity.into(),
            msg: msg.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            created: now(),
            exc_info: None,
            stack_info: None,
        }
    }

    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn at(mut self, created: f64) -> Self {
        self.created = created;
        self
    }

    pub fn with_exception(mut self, exc_info: ExceptionInfo) -> Self {
        self.exc_info = Some(exc_info);
        self
    }

    pub fn with_stack(mut self, stack_info: impl Into<String>) -> Self {
        self.stack_info = Some(stack_info.into());
        self
    }

    /// The message with its arguments merged in.
    pub fn message(&self) -> FormatResult<String> {
        render_message(&self.msg, &self.args, &self.kwargs)
    }
}

fn now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// One entry of a captured backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub file: String,
    pub line: u32,
}

/// A captured error: its type, message, frames and source chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub kind: String,
    pub message: String,
    /// Innermost call first
    pub frames: Vec<Frame>,
    pub causes: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            frames: Vec::new(),
            causes: Vec::new(),
        }
    }

    /// Capture an error value together with its `source()` chain.
    pub fn from_error<E: Error>(err: &E) -> Self {
        let kind = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error")
            .to_string();
        let mut info = Self::new(kind, err.to_string());
        let mut source = err.source();
        while let Some(cause) = source {
            info.causes.push(cause.to_string());
            source = cause.source();
        }
        info
    }

    pub fn with_frame(
        mut self,
        function: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        self.frames.push(Frame {
            function: function.into(),
            file: file.into(),
            line,
        });
        self
    }
}
