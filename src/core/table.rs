use serde_json::Value;

use crate::error::TableError;

/// An ordered sequence of unique field names.
pub type Header = Vec<String>;

/// A fixed-length tuple of values, one per header field.
pub type Row = Vec<Value>;

/// The tabular contract: a restartable, lazy sequence of rows.
///
/// A table produces a header naming its fields followed by data rows
/// aligned positionally to that header. Tables are *restartable*: every
/// call to [`open`](Table::open) begins a fresh iteration, re-acquiring
/// any underlying resource. Two concurrent iterations over the same
/// file-backed table are not supported, since both would contend for the
/// same handle.
pub trait Table {
    /// Begin a fresh iteration over the table.
    fn open(&self) -> Result<Rows<'_>, TableError>;
}

/// One pass over a table: the header plus a lazy stream of data rows.
///
/// Row production is lazy; each call to `next` projects one more record.
/// A row-level error ends the useful life of the iteration, the caller
/// propagates it and drops the rest.
pub struct Rows<'a> {
    header: Header,
    inner: Box<dyn Iterator<Item = Result<Row, TableError>> + 'a>,
}

impl<'a> Rows<'a> {
    pub fn new(header: Header, inner: Box<dyn Iterator<Item = Result<Row, TableError>> + 'a>) -> Self {
        Self { header, inner }
    }

    /// The field names of this table, in declared order.
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
