//! JSON serialization of pipeline results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Human-readable, indented.
    Pretty,
    /// Single line, no extra whitespace.
    Compact,
}

/// Render a serializable value to a JSON string.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let rendered = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };
    rendered.map_err(|e| Error::Render(e.to_string()))
}

/// Write a serializable value to a JSON file.
pub fn write_json<T: Serialize>(path: &Path, value: &T, format: JsonFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let rendered = to_json(value, format)?;
    writer.write_all(rendered.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Default output filename for a collection run.
///
/// Colons in the timestamp are replaced so the name is valid on every
/// filesystem.
pub fn result_filename(challenge_id: &str, timestamp: &str) -> String {
    format!("results_{}_{}.json", challenge_id, timestamp.replace(':', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn sample() -> Sample {
        Sample {
            name: "sections".to_string(),
            count: 3,
        }
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\n"));
        assert!(json.contains("  \"name\""));
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert_eq!(json, r#"{"name":"sections","count":3}"#);
    }

    #[test]
    fn test_write_json_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &sample(), JsonFormat::Pretty).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert!(contents.contains("sections"));
    }

    #[test]
    fn test_result_filename_sanitizes_timestamp() {
        let name = result_filename("round_1b_002", "2025-07-10T15:31:22+00:00");
        assert_eq!(name, "results_round_1b_002_2025-07-10T15-31-22+00-00.json");
        assert!(!name.contains(':'));
    }
}
