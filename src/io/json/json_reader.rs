use std::{io::Read, path::Path};

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    core::{
        record::{derive_header, project, Record},
        source::{FileSource, MemorySource, Source},
        table::{Header, Rows, Table},
    },
    error::TableError,
};

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A table backed by a JSON document whose top level is an array of
/// objects.
///
/// Opening the table acquires the source, decodes the whole document and
/// releases the source before the first row is produced. The header is
/// either the one supplied to the builder or the sorted union of keys
/// across all elements; rows are then projected lazily, one element at a
/// time.
///
/// Elements that are not objects contribute no keys to a derived header,
/// but projecting such an element fails with [`TableError::Shape`].
///
/// # Examples
///
/// ```
/// use tabjson::core::table::Table;
/// use tabjson::io::json::JsonTableBuilder;
///
/// let doc = br#"[{"city": "Boston", "pop": 4628910},
///                {"city": "Concord"}]"#;
///
/// let table = JsonTableBuilder::new().from_memory(doc.to_vec());
/// let rows = table.open().unwrap();
/// assert_eq!(rows.header(), ["city", "pop"]);
///
/// let rows: Vec<_> = rows.collect::<Result<_, _>>().unwrap();
/// assert_eq!(rows[1], vec![serde_json::json!("Concord"), serde_json::Value::Null]);
/// ```
pub struct JsonTable<S> {
    source: S,
    header: Option<Header>,
    missing: Value,
}

impl<S: Source> JsonTable<S> {
    /// Acquires the source, decodes the full document and releases the
    /// source again. Eager by design: the derived header is the union of
    /// keys across the *entire* record set.
    fn load(&self) -> Result<Vec<Value>, TableError> {
        let mut reader = self.source.open()?;
        let mut text = String::new();
        let outcome = reader.read_to_string(&mut text);
        drop(reader);
        outcome?;

        let document: Value = serde_json::from_str(&text)?;
        match document {
            Value::Array(records) => Ok(records),
            other => Err(TableError::Shape(format!(
                "expected a top-level json array, got {}",
                kind(&other)
            ))),
        }
    }
}

impl<S: Source> Table for JsonTable<S> {
    fn open(&self) -> Result<Rows<'_>, TableError> {
        let records = self.load()?;

        let header = match &self.header {
            Some(header) => header.clone(),
            None => derive_header(records.iter().filter_map(Value::as_object)),
        };
        debug!(
            "opened json table: {} records, {} fields",
            records.len(),
            header.len()
        );

        let fields = header.clone();
        let missing = self.missing.clone();
        let data = records.into_iter().map(move |element| match element {
            Value::Object(record) => Ok(project(&record, &fields, &missing)),
            other => Err(TableError::Shape(format!(
                "expected a json object, got {}",
                kind(&other)
            ))),
        });

        Ok(Rows::new(header, Box::new(data)))
    }
}

/// A builder for configuring JSON table reading.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
/// use tabjson::io::json::JsonTableBuilder;
///
/// let table = JsonTableBuilder::new()
///     .header(["city", "pop"])
///     .missing(json!(0))
///     .from_path("cities.json");
/// ```
#[derive(Default)]
pub struct JsonTableBuilder {
    header: Option<Header>,
    missing: Option<Value>,
}

impl JsonTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit header, used verbatim instead of deriving one.
    /// Fields of a record that are not in the header are dropped.
    pub fn header<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.header = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the sentinel substituted for absent fields (default: null).
    pub fn missing(mut self, value: Value) -> Self {
        self.missing = Some(value);
        self
    }

    /// Creates a `JsonTable` over any byte source.
    pub fn from_source<S: Source>(self, source: S) -> JsonTable<S> {
        JsonTable {
            source,
            header: self.header,
            missing: self.missing.unwrap_or(Value::Null),
        }
    }

    /// Creates a `JsonTable` over a file path. The file is reopened on
    /// every iteration of the table.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> JsonTable<FileSource> {
        self.from_source(FileSource::new(path))
    }

    /// Creates a `JsonTable` over an in-memory JSON document.
    pub fn from_memory(self, bytes: Vec<u8>) -> JsonTable<MemorySource> {
        self.from_source(MemorySource::new(bytes))
    }
}

/// A table over an in-memory sequence of records.
///
/// Same header derivation and projection as [`JsonTable`], but the input
/// is already a sequence of records: no resource, no decode step. Useful
/// when the caller has parsed or constructed records elsewhere.
pub struct RecordTable<R> {
    records: Vec<R>,
    header: Option<Header>,
    missing: Value,
}

impl<R: Record> Table for RecordTable<R> {
    fn open(&self) -> Result<Rows<'_>, TableError> {
        let header = match &self.header {
            Some(header) => header.clone(),
            None => derive_header(self.records.iter()),
        };

        let fields = header.clone();
        let missing = self.missing.clone();
        let data = self
            .records
            .iter()
            .map(move |record| Ok(project(record, &fields, &missing)));

        Ok(Rows::new(header, Box::new(data)))
    }
}

/// A builder for configuring record-sequence tables.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabjson::core::table::Table;
/// use tabjson::io::json::RecordTableBuilder;
///
/// let table = RecordTableBuilder::new()
///     .from_values(vec![
///         json!({"foo": "a", "bar": 1}),
///         json!({"foo": "b", "bar": 2}),
///     ])
///     .unwrap();
///
/// assert_eq!(table.open().unwrap().header(), ["bar", "foo"]);
/// ```
#[derive(Default)]
pub struct RecordTableBuilder {
    header: Option<Header>,
    missing: Option<Value>,
}

impl RecordTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit header, used verbatim instead of deriving one.
    pub fn header<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.header = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the sentinel substituted for absent fields (default: null).
    pub fn missing(mut self, value: Value) -> Self {
        self.missing = Some(value);
        self
    }

    /// Creates a `RecordTable` from any sequence of records.
    pub fn from_records<R, I>(self, records: I) -> RecordTable<R>
    where
        R: Record,
        I: IntoIterator<Item = R>,
    {
        RecordTable {
            records: records.into_iter().collect(),
            header: self.header,
            missing: self.missing.unwrap_or(Value::Null),
        }
    }

    /// Creates a `RecordTable` from JSON values. Every value must be an
    /// object; anything else is a shape error.
    pub fn from_values<I>(self, values: I) -> Result<RecordTable<Map<String, Value>>, TableError>
    where
        I: IntoIterator<Item = Value>,
    {
        let records = values
            .into_iter()
            .map(|value| match value {
                Value::Object(record) => Ok(record),
                other => Err(TableError::Shape(format!(
                    "expected a json object, got {}",
                    kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecordTable {
            records,
            header: self.header,
            missing: self.missing.unwrap_or(Value::Null),
        })
    }

    /// Creates a `RecordTable` from serializable items, converting each
    /// through its JSON representation. Every item must serialize to an
    /// object.
    pub fn from_serialize<T, I>(self, items: I) -> Result<RecordTable<Map<String, Value>>, TableError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let values = items
            .into_iter()
            .map(|item| serde_json::to_value(item).map_err(TableError::from))
            .collect::<Result<Vec<_>, _>>()?;

        self.from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, error::Error};

    use serde::Serialize;
    use serde_json::{json, Value};

    use super::{JsonTableBuilder, RecordTableBuilder};
    use crate::{core::table::Table, error::TableError};

    #[test]
    fn header_is_derived_from_the_whole_record_set() -> Result<(), Box<dyn Error>> {
        let doc = br#"[{"a": 1, "b": 2}, {"b": 3, "c": 4}]"#;
        let table = JsonTableBuilder::new().from_memory(doc.to_vec());

        let rows = table.open()?;
        assert_eq!(rows.header(), ["a", "b", "c"]);

        let rows: Vec<_> = rows.collect::<Result<_, _>>()?;
        assert_eq!(rows[0], vec![json!(1), json!(2), Value::Null]);
        assert_eq!(rows[1], vec![Value::Null, json!(3), json!(4)]);

        Ok(())
    }

    #[test]
    fn explicit_header_truncates_and_fills() -> Result<(), Box<dyn Error>> {
        let doc = br#"[{"x": 1, "z": 9}]"#;
        let table = JsonTableBuilder::new()
            .header(["x", "y"])
            .from_memory(doc.to_vec());

        let rows = table.open()?;
        assert_eq!(rows.header(), ["x", "y"]);

        let rows: Vec<_> = rows.collect::<Result<_, _>>()?;
        assert_eq!(rows, vec![vec![json!(1), Value::Null]]);

        Ok(())
    }

    #[test]
    fn missing_sentinel_is_forwarded() -> Result<(), Box<dyn Error>> {
        let doc = br#"[{"a": 1}, {"b": 2}]"#;
        let table = JsonTableBuilder::new()
            .missing(json!("n/a"))
            .from_memory(doc.to_vec());

        let rows: Vec<_> = table.open()?.collect::<Result<_, _>>()?;
        assert_eq!(rows[0], vec![json!(1), json!("n/a")]);
        assert_eq!(rows[1], vec![json!("n/a"), json!(2)]);

        Ok(())
    }

    #[test]
    fn empty_document_yields_header_only() -> Result<(), Box<dyn Error>> {
        let table = JsonTableBuilder::new().from_memory(b"[]".to_vec());
        let mut rows = table.open()?;
        assert!(rows.header().is_empty());
        assert!(rows.next().is_none());

        let table = JsonTableBuilder::new()
            .header(["a", "b"])
            .from_memory(b"[]".to_vec());
        let mut rows = table.open()?;
        assert_eq!(rows.header(), ["a", "b"]);
        assert!(rows.next().is_none());

        Ok(())
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let table = JsonTableBuilder::new().from_memory(b"[{\"a\": 1},".to_vec());
        assert!(matches!(table.open(), Err(TableError::Json(_))));
    }

    #[test]
    fn non_array_top_level_is_a_shape_error() {
        let table = JsonTableBuilder::new().from_memory(b"{\"a\": 1}".to_vec());
        assert!(matches!(table.open(), Err(TableError::Shape(_))));
    }

    #[test]
    fn non_object_elements_skip_derivation_but_fail_projection() -> Result<(), Box<dyn Error>> {
        let doc = br#"[{"a": 1}, 2]"#;
        let table = JsonTableBuilder::new().from_memory(doc.to_vec());

        let mut rows = table.open()?;
        // The number contributes no keys to the header.
        assert_eq!(rows.header(), ["a"]);

        assert_eq!(rows.next().unwrap()?, vec![json!(1)]);
        assert!(matches!(rows.next(), Some(Err(TableError::Shape(_)))));

        Ok(())
    }

    #[test]
    fn tables_are_restartable() -> Result<(), Box<dyn Error>> {
        let doc = br#"[{"a": 1}]"#;
        let table = JsonTableBuilder::new().from_memory(doc.to_vec());

        for _ in 0..2 {
            let rows: Vec<_> = table.open()?.collect::<Result<_, _>>()?;
            assert_eq!(rows, vec![vec![json!(1)]]);
        }

        Ok(())
    }

    #[test]
    fn record_table_projects_like_the_json_reader() -> Result<(), Box<dyn Error>> {
        let mut first = BTreeMap::new();
        first.insert("a".to_string(), json!(1));
        first.insert("b".to_string(), json!(2));
        let mut second = BTreeMap::new();
        second.insert("b".to_string(), json!(3));
        second.insert("c".to_string(), json!(4));

        let table = RecordTableBuilder::new().from_records(vec![first, second]);

        let rows = table.open()?;
        assert_eq!(rows.header(), ["a", "b", "c"]);

        let rows: Vec<_> = rows.collect::<Result<_, _>>()?;
        assert_eq!(rows[0], vec![json!(1), json!(2), Value::Null]);
        assert_eq!(rows[1], vec![Value::Null, json!(3), json!(4)]);

        Ok(())
    }

    #[test]
    fn record_table_rejects_non_object_values() {
        let result = RecordTableBuilder::new().from_values(vec![json!({"a": 1}), json!(2)]);
        assert!(matches!(result, Err(TableError::Shape(_))));
    }

    #[test]
    fn typed_items_convert_through_serialization() -> Result<(), Box<dyn Error>> {
        #[derive(Serialize)]
        struct City {
            city: String,
            pop: u32,
        }

        let table = RecordTableBuilder::new().from_serialize(vec![
            City {
                city: "Boston".to_string(),
                pop: 4628910,
            },
            City {
                city: "Concord".to_string(),
                pop: 42695,
            },
        ])?;

        let rows = table.open()?;
        assert_eq!(rows.header(), ["city", "pop"]);

        let rows: Vec<_> = rows.collect::<Result<_, _>>()?;
        assert_eq!(rows[0], vec![json!("Boston"), json!(4628910)]);
        assert_eq!(rows[1], vec![json!("Concord"), json!(42695)]);

        Ok(())
    }

    #[test]
    fn empty_record_sequence_yields_explicit_header_only() -> Result<(), Box<dyn Error>> {
        let table = RecordTableBuilder::new()
            .header(["a", "b"])
            .from_values(Vec::new())?;

        let mut rows = table.open()?;
        assert_eq!(rows.header(), ["a", "b"]);
        assert!(rows.next().is_none());

        Ok(())
    }
}
