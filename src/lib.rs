#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # tabjson

 Adapters between tabular data and JSON documents.

 A *table* is a restartable, lazy sequence of rows: a header row naming the
 fields, followed by data rows aligned positionally to that header. This
 crate reads JSON arrays of objects (or in-memory sequences of records) into
 tables, and writes tables back out as JSON, either as an array of objects
 or an array of arrays.

 ## Core Concepts

 - **Table:** the tabular contract. Opening a table starts a fresh
   iteration, re-acquiring the underlying resource each time.
 - **Record:** a mapping-like value (enumerate keys, get value by key).
   Readers project records onto a header to produce rows.
 - **Source / Sink:** scoped access to a byte resource. The resource is
   acquired when an operation starts and released when it finishes, on
   every exit path.

 ## Reading

 ```
 use tabjson::{core::table::Table, io::json::JsonTableBuilder};

 let doc = br#"[{"foo": "a", "bar": 1},
                {"foo": "b", "bar": 2}]"#;

 let table = JsonTableBuilder::new().from_memory(doc.to_vec());

 let rows = table.open().unwrap();
 // Header fields are derived as the sorted union of keys.
 assert_eq!(rows.header(), ["bar", "foo"]);
 for row in rows {
     let row = row.unwrap();
     assert_eq!(row.len(), 2);
 }
 ```

 ## Writing

 ```
 use serde_json::json;
 use tabjson::io::json::{JsonObjectWriterBuilder, RecordTableBuilder};

 let table = RecordTableBuilder::new()
     .from_values(vec![json!({"foo": "a", "bar": 1})])
     .unwrap();

 let text = JsonObjectWriterBuilder::new()
     .write_to_string(&table)
     .unwrap();
 assert_eq!(text, r#"[{"bar":1,"foo":"a"}]"#);
 ```
 */

/// Core contracts: tables, records, byte sources and sinks.
pub mod core;

/// Error types for table operations.
pub mod error;

#[doc(inline)]
pub use error::*;

/// Format adapters built on the core contracts.
pub mod io;
