//! SQL formatting collaborator backed by `sqlformat`

use querybench_core::{Result, SqlFormatter, WorkbenchError};
use sqlformat::{FormatOptions, Indent, QueryParams};

/// Pretty-prints SQL with uppercase keywords
#[derive(Debug, Clone)]
pub struct SqlFormatCollaborator {
    indent_size: u8,
    uppercase_keywords: bool,
    lines_between_queries: u8,
}

impl Default for SqlFormatCollaborator {
    fn default() -> Self {
        Self {
            indent_size: 2,
            uppercase_keywords: true,
            lines_between_queries: 1,
        }
    }
}

impl SqlFormatCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_size(mut self, size: u8) -> Self {
        self.indent_size = size;
        self
    }

    pub fn with_uppercase_keywords(mut self, uppercase: bool) -> Self {
        self.uppercase_keywords = uppercase;
        self
    }

    fn options(&self) -> FormatOptions<'static> {
        FormatOptions {
            indent: Indent::Spaces(self.indent_size),
            uppercase: Some(self.uppercase_keywords),
            lines_between_queries: self.lines_between_queries,
            ..Default::default()
        }
    }
}

impl SqlFormatter for SqlFormatCollaborator {
    fn format(&self, sql: &str) -> Result<String> {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Err(WorkbenchError::Format("empty SQL input".to_string()));
        }

        let formatted = sqlformat::format(trimmed, &QueryParams::None, &self.options());
        let formatted = formatted.replace("\r\n", "\n");
        let formatted = formatted.trim_end();
        if formatted.is_empty() {
            return Err(WorkbenchError::Format("formatter produced no output".to_string()));
        }
        Ok(format!("{}\n", formatted))
    }
}
