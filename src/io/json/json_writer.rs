use std::{io::Write, path::Path};

use log::debug;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};

use crate::{
    core::{
        source::{FileSink, SharedSink, Sink},
        table::Table,
    },
    error::TableError,
};

/// Immutable encoder configuration shared by both writers.
struct WriteConfig {
    sort_keys: bool,
    indent: Option<usize>,
    prefix: Option<String>,
    suffix: Option<String>,
}

/// Recursively orders the keys of every object in the document.
fn sort_keys_deep(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(sort_keys_deep),
        Value::Object(object) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(object).into_iter().collect();
            entries.sort_by(|left, right| left.0.cmp(&right.0));
            for (key, mut value) in entries {
                sort_keys_deep(&mut value);
                object.insert(key, value);
            }
        }
        _ => {}
    }
}

impl WriteConfig {
    /// Emits the prefix literal, the document (incrementally, straight
    /// into the writer) and the suffix literal, then flushes. The caller
    /// owns the writer; dropping it releases the resource whether or not
    /// encoding succeeded.
    fn encode(&self, out: &mut dyn Write, mut document: Value) -> Result<(), TableError> {
        if self.sort_keys {
            sort_keys_deep(&mut document);
        }
        if let Some(prefix) = &self.prefix {
            out.write_all(prefix.as_bytes())?;
        }
        let encoded = match self.indent {
            Some(width) => {
                let indent = vec![b' '; width];
                let formatter = PrettyFormatter::with_indent(&indent);
                let mut serializer = Serializer::with_formatter(&mut *out, formatter);
                document.serialize(&mut serializer)
            }
            None => {
                let mut serializer = Serializer::new(&mut *out);
                document.serialize(&mut serializer)
            }
        };
        // serde_json folds sink failures into its own error type; surface
        // them as the io errors they are.
        encoded.map_err(|error| {
            if error.is_io() {
                TableError::Io(error.into())
            } else {
                TableError::Json(error)
            }
        })?;
        if let Some(suffix) = &self.suffix {
            out.write_all(suffix.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Writes a table as a JSON array of objects keyed by the header.
///
/// Not streaming: every data row is materialized into an in-memory array
/// of objects before the sink is opened, so the whole table is resident in
/// memory by the time the first byte is written. A table with zero data
/// rows produces `[]`, wrapped in any configured prefix/suffix.
pub struct JsonObjectWriter<K> {
    sink: K,
    config: WriteConfig,
}

impl<K: Sink> JsonObjectWriter<K> {
    pub fn write<T: Table>(&self, table: &T) -> Result<(), TableError> {
        let mut rows = table.open()?;
        let header = rows.header().to_vec();

        let mut objects = Vec::new();
        for row in &mut rows {
            let object: Map<String, Value> = header.iter().cloned().zip(row?).collect();
            objects.push(Value::Object(object));
        }
        debug!("writing {} records as json objects", objects.len());

        let mut out = self.sink.open()?;
        self.config.encode(&mut out, Value::Array(objects))
    }
}

/// A builder for configuring JSON object output.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabjson::io::json::{JsonObjectWriterBuilder, RecordTableBuilder};
///
/// let table = RecordTableBuilder::new()
///     .from_values(vec![json!({"foo": "a", "bar": 1})])
///     .unwrap();
///
/// let text = JsonObjectWriterBuilder::new()
///     .sort_keys(true)
///     .write_to_string(&table)
///     .unwrap();
/// assert_eq!(text, r#"[{"bar":1,"foo":"a"}]"#);
/// ```
pub struct JsonObjectWriterBuilder {
    sort_keys: bool,
    indent: Option<usize>,
    prefix: Option<String>,
    suffix: Option<String>,
}

impl Default for JsonObjectWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonObjectWriterBuilder {
    pub fn new() -> Self {
        Self {
            sort_keys: false,
            indent: None,
            prefix: None,
            suffix: None,
        }
    }

    /// Orders object keys lexicographically instead of header order.
    /// Applies to nested objects as well.
    pub fn sort_keys(mut self, yes: bool) -> Self {
        self.sort_keys = yes;
        self
    }

    /// Pretty-prints with the given indent width (default: compact).
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Literal text written before the JSON document.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Literal text written after the JSON document.
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    fn config(self) -> WriteConfig {
        WriteConfig {
            sort_keys: self.sort_keys,
            indent: self.indent,
            prefix: self.prefix,
            suffix: self.suffix,
        }
    }

    /// Creates a `JsonObjectWriter` over any byte sink.
    pub fn to_sink<K: Sink>(self, sink: K) -> JsonObjectWriter<K> {
        JsonObjectWriter {
            sink,
            config: self.config(),
        }
    }

    /// Creates a `JsonObjectWriter` over a file path.
    pub fn to_path<P: AsRef<Path>>(self, path: P) -> JsonObjectWriter<FileSink> {
        self.to_sink(FileSink::new(path))
    }

    /// Writes the table and returns the output as in-memory text.
    pub fn write_to_string<T: Table>(self, table: &T) -> Result<String, TableError> {
        let sink = SharedSink::new();
        self.to_sink(sink.clone()).write(table)?;
        Ok(sink.text())
    }
}

/// Writes a table as a JSON array of arrays.
///
/// Each data row is encoded as one JSON array, in table order. With
/// `output_header` the header is emitted first, as an array of strings.
/// Same memory profile as [`JsonObjectWriter`]: the full document is built
/// before any byte is written.
pub struct JsonArrayWriter<K> {
    sink: K,
    output_header: bool,
    config: WriteConfig,
}

impl<K: Sink> JsonArrayWriter<K> {
    pub fn write<T: Table>(&self, table: &T) -> Result<(), TableError> {
        let mut rows = table.open()?;

        let mut arrays = Vec::new();
        if self.output_header {
            arrays.push(Value::Array(
                rows.header()
                    .iter()
                    .map(|field| Value::String(field.clone()))
                    .collect(),
            ));
        }
        for row in &mut rows {
            arrays.push(Value::Array(row?));
        }
        debug!("writing {} rows as json arrays", arrays.len());

        let mut out = self.sink.open()?;
        self.config.encode(&mut out, Value::Array(arrays))
    }
}

/// A builder for configuring JSON array output.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabjson::io::json::{JsonArrayWriterBuilder, RecordTableBuilder};
///
/// let table = RecordTableBuilder::new()
///     .header(["foo", "bar"])
///     .from_values(vec![json!({"foo": "a", "bar": 1})])
///     .unwrap();
///
/// let text = JsonArrayWriterBuilder::new()
///     .write_to_string(&table)
///     .unwrap();
/// assert_eq!(text, r#"[["a",1]]"#);
/// ```
pub struct JsonArrayWriterBuilder {
    output_header: bool,
    sort_keys: bool,
    indent: Option<usize>,
    prefix: Option<String>,
    suffix: Option<String>,
}

impl Default for JsonArrayWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonArrayWriterBuilder {
    pub fn new() -> Self {
        Self {
            output_header: false,
            sort_keys: false,
            indent: None,
            prefix: None,
            suffix: None,
        }
    }

    /// Emits the header as the first array (default: data rows only).
    pub fn output_header(mut self, yes: bool) -> Self {
        self.output_header = yes;
        self
    }

    /// Orders the keys of any nested objects lexicographically.
    pub fn sort_keys(mut self, yes: bool) -> Self {
        self.sort_keys = yes;
        self
    }

    /// Pretty-prints with the given indent width (default: compact).
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Literal text written before the JSON document.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Literal text written after the JSON document.
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    /// Creates a `JsonArrayWriter` over any byte sink.
    pub fn to_sink<K: Sink>(self, sink: K) -> JsonArrayWriter<K> {
        JsonArrayWriter {
            sink,
            output_header: self.output_header,
            config: WriteConfig {
                sort_keys: self.sort_keys,
                indent: self.indent,
                prefix: self.prefix,
                suffix: self.suffix,
            },
        }
    }

    /// Creates a `JsonArrayWriter` over a file path.
    pub fn to_path<P: AsRef<Path>>(self, path: P) -> JsonArrayWriter<FileSink> {
        self.to_sink(FileSink::new(path))
    }

    /// Writes the table and returns the output as in-memory text.
    pub fn write_to_string<T: Table>(self, table: &T) -> Result<String, TableError> {
        let sink = SharedSink::new();
        self.to_sink(sink.clone()).write(table)?;
        Ok(sink.text())
    }
}
