//! Error-kind to process exit code table.
//!
//! The core reports tagged errors only; mapping them to an outward-facing
//! outcome is a transport concern and lives here.

use orgchart_core::ErrorKind;

/// Configuration, database bootstrap or logging setup failed.
pub const STARTUP_FAILURE: u8 = 74;

/// Result payload could not be encoded.
pub const OUTPUT_FAILURE: u8 = 71;

/// Exit code for a failed core operation.
pub fn for_kind(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidInput => 10,
        ErrorKind::DuplicateName => 11,
        ErrorKind::ParentNotFound => 12,
        ErrorKind::NotFound => 13,
        ErrorKind::NoOp => 14,
        ErrorKind::SelfParent => 15,
        ErrorKind::CyclicParent => 16,
        ErrorKind::CannotReparentRoot => 17,
        ErrorKind::HasChildren => 18,
        ErrorKind::Internal => 70,
    }
}

#[cfg(test)]
mod tests {
    use super::{for_kind, OUTPUT_FAILURE, STARTUP_FAILURE};
    use orgchart_core::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn every_kind_has_distinct_nonzero_code() {
        let codes: HashSet<u8> = ErrorKind::ALL.iter().map(|kind| for_kind(*kind)).collect();
        assert_eq!(codes.len(), ErrorKind::ALL.len());
        assert!(!codes.contains(&0));
        assert!(!codes.contains(&STARTUP_FAILURE));
        assert!(!codes.contains(&OUTPUT_FAILURE));
    }
}
