use std::fmt::Display;

use thiserror::Error;

use crate::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::VoidReturnMismatch { .. } => "VoidReturnMismatch",
            ErrorImpl::DeclarationTypeMismatch { .. } => "DeclarationTypeMismatch",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::OutsideFunction { .. } => "OutsideFunction",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnknownType { object } => ErrorTip::Suggestion(format!(
                "Give `{}` an explicit type or an initial value",
                object
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected a value of type `{}`, received `{}`; no implicit conversion exists",
                expected, received
            )),
            ErrorImpl::VoidReturnMismatch { expected, .. } if expected == "void" => {
                ErrorTip::Suggestion(String::from("Remove the returned value"))
            }
            ErrorImpl::VoidReturnMismatch { expected, .. } => {
                ErrorTip::Suggestion(format!("Return a value of type `{}`", expected))
            }
            ErrorImpl::DeclarationTypeMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected a value of type `{}`, received `{}`; no implicit conversion exists",
                    expected, received
                ))
            }
            ErrorImpl::VariableNotDeclared { .. } => ErrorTip::None,
            ErrorImpl::OutsideFunction { .. } => {
                ErrorTip::Suggestion(String::from("Move it into a function body"))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: error: {}", self.span.start, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("object '{object}' has unknown type")]
    UnknownType { object: String },
    #[error("value of type '{received}' is not compatible with return type '{expected}'")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("{}", void_return_message(.expected, .received))]
    VoidReturnMismatch { expected: String, received: String },
    #[error("value of type '{received}' is not compatible with variable of type '{expected}'")]
    DeclarationTypeMismatch { expected: String, received: String },
    #[error("variable '{variable}' not declared")]
    VariableNotDeclared { variable: String },
    #[error("{statement} outside of a function")]
    OutsideFunction { statement: String },
}

fn void_return_message(expected: &str, received: &str) -> String {
    if expected == "void" {
        format!(
            "value of type '{}' is not compatible with return type 'void'",
            received
        )
    } else {
        format!(
            "non-void function returning '{}' cannot return '{}'",
            expected, received
        )
    }
}
