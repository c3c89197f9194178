/// Scoped access to byte resources.
pub mod source;

/// Mapping-like records, header derivation and row projection.
pub mod record;

/// The table contract: a restartable sequence of header and data rows.
pub mod table;
