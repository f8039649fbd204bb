use serde::Serialize;
use serde_json::ser::PrettyFormatter;

const DEFAULT_INDENT: &str = "  ";

/// Whitespace layout of a JSON file, captured on read and reapplied on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFormat {
    pub indent: String,
    pub trailing_newline: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            trailing_newline: true,
        }
    }
}

impl JsonFormat {
    /// Uses the leading whitespace of the first indented line.
    #[must_use]
    pub fn detect(content: &str) -> Self {
        let indent = content
            .lines()
            .skip(1)
            .map(|line| {
                let trimmed = line.trim_start_matches([' ', '\t']);
                &line[..line.len() - trimmed.len()]
            })
            .find(|ws| !ws.is_empty())
            .unwrap_or(DEFAULT_INDENT);

        Self {
            indent: indent.to_string(),
            trailing_newline: content.is_empty() || content.ends_with('\n'),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;

        let mut out = String::from_utf8_lossy(&buf).into_owned();
        if self.trailing_newline {
            out.push('\n');
        }
        Ok(out)
    }
}
