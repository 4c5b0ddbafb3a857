//! Unit tests for error handling.
//!
//! This module contains tests for error types and the diagnostics sink.

use crate::errors::{
    diagnostics::Diagnostics,
    errors::{Error, ErrorImpl, ErrorTip},
};
use crate::MK_SPAN;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnknownType {
            object: "x".to_string(),
        },
        MK_SPAN!("test.lw", 1, 1, 1, 6),
    );

    assert_eq!(error.get_error_name(), "UnknownType");
    assert_eq!(error.get_span().start.line, 1);
}

#[test]
fn test_unknown_type_message() {
    let error = Error::new(
        ErrorImpl::UnknownType {
            object: "x".to_string(),
        },
        MK_SPAN!("test.lw", 3, 5, 3, 10),
    );

    assert_eq!(
        error.to_string(),
        "test.lw:3:5: error: object 'x' has unknown type"
    );
}

#[test]
fn test_return_type_mismatch_message() {
    let error = ErrorImpl::ReturnTypeMismatch {
        expected: "i32".to_string(),
        received: "i32[4]".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "value of type 'i32[4]' is not compatible with return type 'i32'"
    );
}

#[test]
fn test_void_return_mismatch_messages() {
    let missing_value = ErrorImpl::VoidReturnMismatch {
        expected: "i32".to_string(),
        received: "void".to_string(),
    };
    assert_eq!(
        missing_value.to_string(),
        "non-void function returning 'i32' cannot return 'void'"
    );

    let unexpected_value = ErrorImpl::VoidReturnMismatch {
        expected: "void".to_string(),
        received: "i64".to_string(),
    };
    assert_eq!(
        unexpected_value.to_string(),
        "value of type 'i64' is not compatible with return type 'void'"
    );
}

#[test]
fn test_declaration_type_mismatch_message() {
    let error = ErrorImpl::DeclarationTypeMismatch {
        expected: "bool".to_string(),
        received: "i32".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "value of type 'i32' is not compatible with variable of type 'bool'"
    );
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::VoidReturnMismatch {
            expected: "void".to_string(),
            received: "i32".to_string(),
        },
        MK_SPAN!("test.lw", 1, 1, 1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Remove the returned value"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "y".to_string(),
        },
        MK_SPAN!("test.lw", 1, 1, 1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
    assert_eq!(error.get_tip().to_string(), "");
}

#[test]
fn test_diagnostics_accumulate() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());
    assert!(!diagnostics.has_fatal());

    diagnostics.report_compiler_error(Error::new(
        ErrorImpl::UnknownType {
            object: "a".to_string(),
        },
        MK_SPAN!("test.lw", 1, 1, 1, 1),
    ));
    diagnostics.report_compiler_error(Error::new(
        ErrorImpl::UnknownType {
            object: "b".to_string(),
        },
        MK_SPAN!("test.lw", 2, 1, 2, 1),
    ));

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.count("UnknownType"), 2);
    assert!(!diagnostics.has_fatal());

    diagnostics.set_fatal();
    assert!(diagnostics.has_fatal());
    assert_eq!(diagnostics.errors()[1].get_span().start.line, 2);
}

#[test]
fn test_outside_function_message() {
    let error = Error::new(
        ErrorImpl::OutsideFunction {
            statement: "return statement".to_string(),
        },
        MK_SPAN!("test.lw", 9, 1, 9, 7),
    );

    assert_eq!(error.get_error_name(), "OutsideFunction");
    assert_eq!(
        error.to_string(),
        "test.lw:9:1: error: return statement outside of a function"
    );
    assert_eq!(error.get_tip().to_string(), "Move it into a function body");
}
