//! Bundled record formatters
//!
//! - Default: `time | code | glyph | description [| meta]`
//! - Coloured: the default layout with the severity's ANSI colour
//! - Json: one JSON object per line
//! - Logfmt: key=value pairs

use super::record::Record;
use super::severity::COLOUR_RESET;
use super::sink::Formatter;
use std::fmt::Write;
use std::sync::Arc;

/// Output format for records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `Jan 08 2025 10:30:45.1234     | db4lqgc5kq8w | I | Request processed`
    #[default]
    Default,

    /// Same layout as `Default`, wrapped in ANSI colour codes
    Coloured,

    /// Example: `{"type":"info","time":"...","code":"...","description":"Request processed"}`
    Json,

    /// Example: `time="..." code=... type=info description="Request processed"`
    Logfmt,
}

impl OutputFormat {
    pub fn formatter(self) -> Formatter {
        match self {
            OutputFormat::Default => Arc::new(format_default),
            OutputFormat::Coloured => Arc::new(format_with_colours),
            OutputFormat::Json => Arc::new(format_json),
            OutputFormat::Logfmt => Arc::new(format_logfmt),
        }
    }
}

/// Plain text, one line per record
pub fn format_default(record: &Record) -> Vec<u8> {
    let mut out = format!(
        "{:<25} | {} | {} | {}",
        record.time,
        record.code,
        record.severity.glyph(),
        record.description
    );
    if let Some(ref meta) = record.meta {
        let _ = write!(out, " | {}", meta);
    }
    out.push('\n');
    out.into_bytes()
}

/// Plain text layout with the prefix and metadata in the severity's colour
pub fn format_with_colours(record: &Record) -> Vec<u8> {
    let colour = record.severity.colour();
    let mut out = format!(
        "{}{:<25} | {} | {} | {}{}",
        colour,
        record.time,
        record.code,
        record.severity.glyph(),
        COLOUR_RESET,
        record.description
    );
    if let Some(ref meta) = record.meta {
        let _ = write!(out, "{} | {}{}", colour, meta, COLOUR_RESET);
    }
    out.push('\n');
    out.into_bytes()
}

/// One JSON object per line
///
/// Serialization failures are reported on stderr; the sink then receives a
/// bare newline.
pub fn format_json(record: &Record) -> Vec<u8> {
    let mut out = match serde_json::to_vec(record) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("[LOGR ERROR] failed to marshal record {} as JSON: {}", record.code, e);
            Vec::new()
        }
    };
    out.push(b'\n');
    out
}

/// Logfmt key=value pairs; metadata keys follow the fixed fields
pub fn format_logfmt(record: &Record) -> Vec<u8> {
    let mut out = format!(
        "time={} code={} type={} description={}",
        quote_if_needed(&record.time),
        record.code,
        record.severity.word(),
        quote_if_needed(&record.description)
    );
    if let Some(ref meta) = record.meta {
        for (key, value) in meta.iter() {
            let _ = write!(out, " {}={}", key, quote_if_needed(&value.to_string()));
        }
    }
    out.push('\n');
    out.into_bytes()
}

fn quote_if_needed(s: &str) -> String {
    if s.is_empty() || s.contains(|c: char| c.is_whitespace() || c == '"' || c == '=') {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::meta::{meta, Meta};
    use crate::core::severity::Severity;

    fn record(severity: Severity, description: &str, m: Option<Meta>) -> Record {
        let mut record = Record::default();
        record.severity = severity;
        record.time = "Jan 08 2025 10:30:45.1234".to_string();
        record.code = "db4lqgc5kq8w".to_string();
        record.description = description.to_string();
        record.meta = m;
        record
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("formatters emit utf-8")
    }

    #[test]
    fn test_default_format() {
        let out = text(format_default(&record(Severity::INFO, "Request processed", None)));
        assert_eq!(
            out,
            "Jan 08 2025 10:30:45.1234 | db4lqgc5kq8w | I | Request processed\n"
        );
    }

    #[test]
    fn test_default_format_with_meta() {
        let r = record(Severity::ERROR, "boom", Some(meta("test", "TestWith")));
        let out = text(format_default(&r));
        assert!(out.ends_with("| E | boom | test=TestWith\n"));
    }

    #[test]
    fn test_coloured_format() {
        let out = text(format_with_colours(&record(Severity::WARNING, "careful", None)));
        assert!(out.starts_with("\x1B[38;5;208m"));
        assert!(out.contains(&format!("| W | {}careful", COLOUR_RESET)));
    }

    #[test]
    fn test_json_format() {
        let r = record(Severity::SUCCESS, "done", Some(meta("application", "logr")));
        let out = text(format_json(&r));
        assert!(out.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed["type"], "success");
        assert_eq!(parsed["code"], "db4lqgc5kq8w");
        assert_eq!(parsed["description"], "done");
        assert_eq!(parsed["metadata"]["application"], "logr");
    }

    #[test]
    fn test_logfmt_format() {
        let r = record(Severity::DEBUG, "cache miss", Some(meta("key", "user:1")));
        let out = text(format_logfmt(&r));
        assert_eq!(
            out,
            "time=\"Jan 08 2025 10:30:45.1234\" code=db4lqgc5kq8w type=debug \
             description=\"cache miss\" key=user:1\n"
        );
    }

    #[test]
    fn test_output_format_dispatch() {
        let r = record(Severity::INFO, "same", None);
        let cases: [(OutputFormat, fn(&Record) -> Vec<u8>); 4] = [
            (OutputFormat::Default, format_default),
            (OutputFormat::Coloured, format_with_colours),
            (OutputFormat::Json, format_json),
            (OutputFormat::Logfmt, format_logfmt),
        ];
        for (format, expected) in cases {
            assert_eq!((format.formatter())(&r), expected(&r));
        }
    }
}
