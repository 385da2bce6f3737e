//! Field-support query boundary.
//!
//! The codec asks the host store which fields and record kinds it can
//! hold, so unsupported properties are skipped instead of rejected, and
//! multi-part string values are padded or truncated to the store's
//! arity.

use crate::fields::{RecordKind, contact};

/// Answers capability questions about the target store.
pub trait FieldSupport {
    /// Whether the store accepts `field` on records of `kind`.
    fn is_supported_field(&self, kind: RecordKind, field: u32) -> bool;

    /// Expected number of parts for a string-array field.
    fn string_array_size(&self, kind: RecordKind, field: u32) -> usize;

    /// Whether the store holds records of `kind` at all.
    fn is_kind_supported(&self, kind: RecordKind) -> bool {
        let _ = kind;
        true
    }
}

/// Accepts every field with the standard arities.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFields;

impl FieldSupport for AllFields {
    fn is_supported_field(&self, _kind: RecordKind, _field: u32) -> bool {
        true
    }

    fn string_array_size(&self, kind: RecordKind, field: u32) -> usize {
        match (kind, field) {
            (RecordKind::Contact, contact::NAME) => contact::NAME_SIZE,
            (RecordKind::Contact, contact::ADDR) => contact::ADDR_SIZE,
            _ => 0,
        }
    }
}
