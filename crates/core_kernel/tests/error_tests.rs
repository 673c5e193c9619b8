//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::ports::PortError;
use core_kernel::CustomerId;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
    }
}

#[test]
fn test_blank_customer_id_is_validation_error() {
    let error = CustomerId::parse("   ").unwrap_err();
    assert_eq!(
        error.to_string(),
        "Validation error: customer id must not be empty"
    );
}

#[test]
fn test_port_error_storage_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error = PortError::storage("ledger append failed", io);

    assert!(error.is_transient());
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_port_error_transformation_is_permanent() {
    let error = PortError::transformation("bad ledger line");
    assert!(!error.is_transient());
    assert!(!error.is_not_found());
}
