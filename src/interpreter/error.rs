//! Runtime error kinds raised during evaluation.

use std::fmt;

use crate::diagnostic::{Diagnostic, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    TypeError { message: String, span: Span },
    UndefinedVariable { name: String, span: Span },
    ImmutableAssignment { name: String, span: Span },
    ArityError { expected: usize, given: usize, span: Span },
    DivisionByZero { span: Span },
    AssertionFailed { line: i64, column: i64 },
    Internal { message: String },
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
            span: Span::dummy(),
        }
    }

    pub fn type_error_at(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError {
            message: message.into(),
            span,
        }
    }

    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            name: name.into(),
            span: Span::dummy(),
        }
    }

    pub fn immutable_assignment(name: impl Into<String>) -> Self {
        Self::ImmutableAssignment {
            name: name.into(),
            span: Span::dummy(),
        }
    }

    pub fn arity_error(expected: usize, given: usize, span: Span) -> Self {
        Self::ArityError {
            expected,
            given,
            span,
        }
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::DivisionByZero { span }
    }

    pub fn assertion_failed(line: i64, column: i64) -> Self {
        Self::AssertionFailed { line, column }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Attaches a source position to an error raised without one.
    pub fn with_span(mut self, span: Span) -> Self {
        match &mut self {
            Self::TypeError { span: s, .. }
            | Self::UndefinedVariable { span: s, .. }
            | Self::ImmutableAssignment { span: s, .. }
            | Self::ArityError { span: s, .. }
            | Self::DivisionByZero { span: s } => {
                if s.is_dummy() {
                    *s = span;
                }
            }
            Self::AssertionFailed { .. } | Self::Internal { .. } => {}
        }
        self
    }

    pub fn span(&self) -> Span {
        match self {
            Self::TypeError { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::ImmutableAssignment { span, .. }
            | Self::ArityError { span, .. }
            | Self::DivisionByZero { span } => *span,
            Self::AssertionFailed { .. } | Self::Internal { .. } => Span::dummy(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::TypeError { message, span } => Diagnostic::error("E0201", message.clone())
                .with_span(*span)
                .with_label("operand has the wrong kind"),
            Self::UndefinedVariable { name, span } => {
                Diagnostic::error("E0202", format!("undefined variable '{}'", name))
                    .with_span(*span)
                    .with_label("not found in this scope")
                    .with_help("define the variable before using it")
            }
            Self::ImmutableAssignment { name, span } => {
                Diagnostic::error("E0203", format!("cannot assign to immutable variable '{}'", name))
                    .with_span(*span)
                    .with_label("declared without 'mut'")
                    .with_help(format!("declare the binding as 'mut {} = ...'", name))
            }
            Self::ArityError {
                expected,
                given,
                span,
            } => Diagnostic::error(
                "E0204",
                format!("too few arguments: expected {}, got {}", expected, given),
            )
            .with_span(*span)
            .with_label("called here"),
            Self::DivisionByZero { span } => Diagnostic::error("E0205", "division by zero")
                .with_span(*span)
                .with_label("attempt to divide by zero"),
            Self::AssertionFailed { line, column } => {
                Diagnostic::error("E0206", format!("assert failed at {}:{}.", line, column))
            }
            Self::Internal { message } => {
                Diagnostic::error("E0299", format!("internal error: {}", message))
            }
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeError { message, .. } => write!(f, "type error: {}", message),
            Self::UndefinedVariable { name, .. } => write!(f, "undefined variable '{}'", name),
            Self::ImmutableAssignment { name, .. } => {
                write!(f, "cannot assign to immutable variable '{}'", name)
            }
            Self::ArityError {
                expected, given, ..
            } => write!(f, "too few arguments: expected {}, got {}", expected, given),
            Self::DivisionByZero { .. } => write!(f, "division by zero"),
            Self::AssertionFailed { line, column } => {
                write!(f, "assert failed at {}:{}.", line, column)
            }
            Self::Internal { message } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for RuntimeError {}
