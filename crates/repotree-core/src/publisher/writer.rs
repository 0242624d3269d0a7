//! JSON and NDJSON encoders

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use super::{NodeRecord, OutputFormat, PublishError};

/// Encode records to `writer`
///
/// Every record is converted before anything is written, so a record
/// that cannot be represented leaves the writer untouched.
///
/// # Errors
/// Returns `PublishError::Serialize` naming the first record that cannot
/// be encoded, or `PublishError::Io` if writing fails.
pub fn write_records<W: Write>(
    writer: W,
    records: &[NodeRecord],
    format: OutputFormat,
) -> Result<(), PublishError> {
    let values = encode_records(records)?;
    write_values(writer, &values, format)
}

/// Convert records to JSON values without writing anything
///
/// # Errors
/// Returns `PublishError::Serialize` naming the first record that cannot
/// be encoded.
pub fn encode_records(records: &[NodeRecord]) -> Result<Vec<Value>, PublishError> {
    to_values(records, |record| (record.path.clone(), record.id.clone()))
}

/// `label` yields the path and node id reported for an item that fails
fn to_values<T: Serialize>(
    items: &[T],
    label: impl Fn(&T) -> (String, String),
) -> Result<Vec<Value>, PublishError> {
    items
        .iter()
        .map(|item| {
            serde_json::to_value(item).map_err(|source| {
                let (path, node_id) = label(item);
                PublishError::Serialize {
                    path,
                    node_id,
                    source,
                }
            })
        })
        .collect()
}

/// Write already converted values to `writer`
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn write_values<W: Write>(
    mut writer: W,
    values: &[Value],
    format: OutputFormat,
) -> Result<(), PublishError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, values).map_err(PublishError::Encode)?;
            writer.write_all(b"\n")?;
        }
        OutputFormat::Ndjson => {
            for value in values {
                serde_json::to_writer(&mut writer, value).map_err(PublishError::Encode)?;
                writer.write_all(b"\n")?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{to_values, PublishError};

    #[test]
    fn unrepresentable_item_is_named() {
        // Sequence keys have no JSON form
        let bad: BTreeMap<Vec<u8>, u8> = BTreeMap::from([(vec![1], 0)]);
        let items = vec![BTreeMap::new(), bad];

        let err = to_values(&items, |item| (format!("item-{}", item.len()), "n1".to_string()))
            .expect_err("sequence keys must fail");
        assert!(matches!(
            err,
            PublishError::Serialize { ref path, ref node_id, .. }
                if path == "item-1" && node_id == "n1"
        ));
    }
}
