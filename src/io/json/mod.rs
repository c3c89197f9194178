/// JSON support for reading and writing tabular data.
///
/// # Module Architecture
///
/// The JSON module consists of four adapters over the core table contract:
///
/// 1. **JsonTable**: a table backed by a JSON document whose top level is
///    an array of objects. The document is parsed in full when the table
///    is opened; rows are then projected lazily onto a derived or explicit
///    header.
///
/// 2. **RecordTable**: the same projection over an in-memory sequence of
///    records, for callers that have already parsed or constructed their
///    data.
///
/// 3. **JsonObjectWriter**: writes a table as a JSON array of objects
///    keyed by the header.
///
/// 4. **JsonArrayWriter**: writes a table as a JSON array of arrays,
///    optionally emitting the header as the first array.
///
/// Each adapter follows the builder pattern for configuration. Writers
/// take an immutable configuration (key ordering, indentation, literal
/// prefix/suffix text); there is no process-wide encoder state.
///
/// # Examples
///
/// Reading a JSON document and writing it back as arrays:
///
/// ```
/// use tabjson::core::table::Table;
/// use tabjson::io::json::{JsonArrayWriterBuilder, JsonTableBuilder};
///
/// let doc = br#"[{"foo": "a", "bar": 1},
///                {"foo": "b", "bar": 2}]"#;
///
/// let table = JsonTableBuilder::new().from_memory(doc.to_vec());
///
/// let text = JsonArrayWriterBuilder::new()
///     .output_header(true)
///     .write_to_string(&table)
///     .unwrap();
/// assert_eq!(text, r#"[["bar","foo"],[1,"a"],[2,"b"]]"#);
/// ```

/// A module providing facilities for reading tables from JSON data.
pub mod json_reader;

/// A module providing facilities for writing tables as JSON data.
pub mod json_writer;

// Re-export the main types for easier access
pub use json_reader::{JsonTable, JsonTableBuilder, RecordTable, RecordTableBuilder};
pub use json_writer::{
    JsonArrayWriter, JsonArrayWriterBuilder, JsonObjectWriter, JsonObjectWriterBuilder,
};
