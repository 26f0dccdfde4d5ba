//! Console sink implementation

use crate::core::output_format::format_text;
use crate::core::{LogEntry, OutputFormat, Result, Sink, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;

pub struct ConsoleSink {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use factory_diagnostics::sinks::ConsoleSink;
    /// use factory_diagnostics::OutputFormat;
    ///
    /// let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.output_format {
            OutputFormat::Text => format_text(entry, &self.timestamp_format, &self.level_name(entry)),
            OutputFormat::Json => self.output_format.format(entry, &self.timestamp_format),
        }
    }

    #[cfg(feature = "console")]
    fn level_name(&self, entry: &LogEntry) -> String {
        if self.use_colors {
            entry.level.to_str().color(entry.level.color_code()).to_string()
        } else {
            entry.level.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_name(&self, entry: &LogEntry) -> String {
        entry.level.to_str().to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.render(entry);

        // Route Error and Critical levels to stderr, others to stdout
        if entry.level.is_error_class() {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
