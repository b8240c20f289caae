//! The on-disk record format: `[<timestamp>  ]<level> <text>\n`.

use serde::Serialize;

use crate::types::{LogOptions, MessageLevel, TIMESTAMP_SEPARATOR};

/// One parsed line of a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Timestamp prefix, when the writer had timestamps enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Message level.
    pub level: MessageLevel,
    /// Message text.
    pub text: String,
}

/// Which line shapes a reader should accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineLayout {
    /// Prefer the timestamped reading, fall back to the plain one.
    #[default]
    Auto,
    /// `<level> <text>` only.
    Plain,
    /// `<timestamp>  <level> <text>` only.
    Timestamped,
}

impl LineLayout {
    /// Parse a layout from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "plain" => Some(Self::Plain),
            "timestamped" => Some(Self::Timestamped),
            _ => None,
        }
    }

    /// The layout a handle opened with `options` writes.
    pub fn for_options(options: &LogOptions) -> Self {
        if options.timestamps {
            Self::Timestamped
        } else {
            Self::Plain
        }
    }
}

impl Record {
    /// Parse a single line (without its trailing newline), guessing the layout.
    ///
    /// A line whose text after the first double space starts with a level is
    /// read as timestamped, even when the timestamp itself is numeric. Use
    /// [`Record::parse_as`] with [`LineLayout::Plain`] for files written
    /// without timestamps whose messages contain double spaces.
    ///
    /// Returns `None` for lines that do not carry a level.
    pub fn parse(line: &str) -> Option<Self> {
        Self::parse_as(line, LineLayout::Auto)
    }

    /// Parse a single line in the given layout.
    pub fn parse_as(line: &str, layout: LineLayout) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match layout {
            LineLayout::Plain => parse_plain(line),
            LineLayout::Timestamped => parse_timestamped(line),
            LineLayout::Auto => parse_timestamped(line).or_else(|| parse_plain(line)),
        }
    }
}

fn parse_plain(line: &str) -> Option<Record> {
    let (level, text) = split_level(line)?;
    Some(Record {
        timestamp: None,
        level,
        text: text.to_string(),
    })
}

fn parse_timestamped(line: &str) -> Option<Record> {
    let (timestamp, rest) = line.split_once(TIMESTAMP_SEPARATOR)?;
    if timestamp.is_empty() {
        return None;
    }
    let (level, text) = split_level(rest)?;
    Some(Record {
        timestamp: Some(timestamp.to_string()),
        level,
        text: text.to_string(),
    })
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ts) = &self.timestamp {
            write!(f, "{}{}", ts, TIMESTAMP_SEPARATOR)?;
        }
        write!(f, "{} {}", self.level, self.text)
    }
}

fn split_level(s: &str) -> Option<(MessageLevel, &str)> {
    let (head, text) = s.split_once(' ').unwrap_or((s, ""));
    let level = head.parse::<i32>().ok()?;
    Some((MessageLevel(level), text))
}

/// Render one record, including the trailing newline.
///
/// Line breaks inside `text` become spaces so that one message is always
/// one line.
pub fn format_record(level: MessageLevel, text: &str, timestamp: Option<&str>) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    if let Some(ts) = timestamp {
        out.push_str(ts);
        out.push_str(TIMESTAMP_SEPARATOR);
    }
    out.push_str(&level.to_string());
    out.push(' ');
    out.extend(
        text.chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c }),
    );
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_record() {
        assert_eq!(format_record(MessageLevel(1), "Message", None), "1 Message\n");
    }

    #[test]
    fn embedded_newlines_are_flattened() {
        let line = format_record(MessageLevel::INFO, "two\nlines\r\n", None);
        assert_eq!(line, "3 two lines  \n");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn parse_with_and_without_timestamp() {
        let rec = Record::parse("2 disk almost full").unwrap();
        assert_eq!(rec.timestamp, None);
        assert_eq!(rec.level, MessageLevel::WARNING);
        assert_eq!(rec.text, "disk almost full");

        let rec = Record::parse("16/10 - 09:15:02  1 boom").unwrap();
        assert_eq!(rec.timestamp.as_deref(), Some("16/10 - 09:15:02"));
        assert_eq!(rec.level, MessageLevel::ERROR);
        assert_eq!(rec.text, "boom");
        assert_eq!(rec.to_string(), "16/10 - 09:15:02  1 boom");
    }

    #[test]
    fn numeric_timestamps_read_back() {
        for ts in ["12", "1760000000", "20261016"] {
            let line = format_record(MessageLevel::ERROR, "boom", Some(ts));
            let rec = Record::parse(line.trim_end()).unwrap();
            assert_eq!(rec.timestamp.as_deref(), Some(ts));
            assert_eq!(rec.level, MessageLevel::ERROR);
            assert_eq!(rec.text, "boom");
        }
    }

    #[test]
    fn explicit_layouts() {
        let line = "1 spaced  2 out";
        let auto = Record::parse(line).unwrap();
        assert_eq!(auto.timestamp.as_deref(), Some("1 spaced"));

        let plain = Record::parse_as(line, LineLayout::Plain).unwrap();
        assert_eq!(plain.timestamp, None);
        assert_eq!(plain.level, MessageLevel::ERROR);
        assert_eq!(plain.text, "spaced  2 out");

        assert!(Record::parse_as("3 no stamp", LineLayout::Timestamped).is_none());
        assert_eq!(LineLayout::from_name("Plain"), Some(LineLayout::Plain));
    }

    #[test]
    fn empty_text_and_garbage() {
        let rec = Record::parse("4").unwrap();
        assert_eq!(rec.text, "");
        assert!(Record::parse("").is_none());
        assert!(Record::parse("no level here").is_none());
    }
}
