use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::{Map, Value};

/// A mapping-like record: an ordered bag of named fields.
///
/// Readers project records onto a header to produce rows. Only top-level
/// fields participate in projection; nested values pass through unmodified.
///
/// The generic map types of this crate and of the standard library already
/// implement `Record`. Typed structs implement it explicitly:
///
/// ```
/// use serde_json::{json, Value};
/// use tabjson::core::record::Record;
///
/// struct Car {
///     make: String,
///     year: u16,
/// }
///
/// impl Record for Car {
///     fn keys(&self) -> Vec<&str> {
///         vec!["make", "year"]
///     }
///
///     fn get(&self, key: &str) -> Option<Value> {
///         match key {
///             "make" => Some(json!(self.make)),
///             "year" => Some(json!(self.year)),
///             _ => None,
///         }
///     }
/// }
///
/// let car = Car { make: "Peugeot".to_string(), year: 1995 };
/// assert_eq!(car.get("year"), Some(json!(1995)));
/// ```
pub trait Record {
    /// Enumerate the top-level field names of this record.
    fn keys(&self) -> Vec<&str>;

    /// Look up a field value by name. `None` means the field is absent,
    /// which is distinct from a field holding an explicit JSON null.
    fn get(&self, key: &str) -> Option<Value>;
}

impl Record for Map<String, Value> {
    fn keys(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn get(&self, key: &str) -> Option<Value> {
        Map::get(self, key).cloned()
    }
}

impl Record for BTreeMap<String, Value> {
    fn keys(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn get(&self, key: &str) -> Option<Value> {
        BTreeMap::get(self, key).cloned()
    }
}

impl Record for HashMap<String, Value> {
    fn keys(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}

/// Derives a header as the sorted union of keys across all records.
///
/// The union spans the entire record set, not just the first record, so
/// the caller must have materialized all records before the header can be
/// produced. An empty record set yields an empty header.
pub fn derive_header<'a, R, I>(records: I) -> Vec<String>
where
    R: Record + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut fields = BTreeSet::new();
    for record in records {
        for key in record.keys() {
            fields.insert(key.to_string());
        }
    }
    fields.into_iter().collect()
}

/// Projects a record onto a header, producing one value per header field.
///
/// Absent fields yield a clone of the `missing` sentinel; fields of the
/// record that are not in the header are silently dropped. Values pass
/// through without coercion.
pub fn project<R>(record: &R, header: &[String], missing: &Value) -> Vec<Value>
where
    R: Record + ?Sized,
{
    header
        .iter()
        .map(|field| record.get(field).unwrap_or_else(|| missing.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use serde_json::{json, Map, Value};

    use super::{derive_header, project};

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn header_is_the_sorted_union_of_keys() -> Result<(), Box<dyn Error>> {
        let records = vec![
            record(json!({"a": 1, "b": 2})),
            record(json!({"b": 3, "c": 4})),
        ];

        let header = derive_header(records.iter());
        assert_eq!(header, ["a", "b", "c"]);

        let rows: Vec<Vec<Value>> = records
            .iter()
            .map(|r| project(r, &header, &Value::Null))
            .collect();
        assert_eq!(rows[0], vec![json!(1), json!(2), Value::Null]);
        assert_eq!(rows[1], vec![Value::Null, json!(3), json!(4)]);

        Ok(())
    }

    #[test]
    fn explicit_header_truncates_extras_and_fills_missing() -> Result<(), Box<dyn Error>> {
        let header = vec!["x".to_string(), "y".to_string()];
        let rec = record(json!({"x": 1, "z": 9}));

        let row = project(&rec, &header, &Value::Null);
        assert_eq!(row, vec![json!(1), Value::Null]);

        Ok(())
    }

    #[test]
    fn missing_sentinel_is_configurable() -> Result<(), Box<dyn Error>> {
        let header = vec!["a".to_string(), "b".to_string()];
        let rec = record(json!({"a": true}));

        let row = project(&rec, &header, &json!("n/a"));
        assert_eq!(row, vec![json!(true), json!("n/a")]);

        Ok(())
    }

    #[test]
    fn explicit_null_is_not_a_missing_field() -> Result<(), Box<dyn Error>> {
        let header = vec!["a".to_string()];
        let rec = record(json!({"a": null}));

        // An explicit null passes through even with a non-null sentinel.
        let row = project(&rec, &header, &json!("n/a"));
        assert_eq!(row, vec![Value::Null]);

        Ok(())
    }

    #[test]
    fn empty_record_set_yields_empty_header() -> Result<(), Box<dyn Error>> {
        let records: Vec<Map<String, Value>> = Vec::new();
        assert!(derive_header(records.iter()).is_empty());

        Ok(())
    }
}
