//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use drawsync_core::{Ack, Pulled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print the result of a push
    pub fn print_ack(&self, ack: &Ack) {
        match self.format {
            OutputFormat::Human => {
                let verb = if ack.is_first_write() {
                    "Created"
                } else {
                    "Updated"
                };
                println!("✓ {} {}", verb, ack.location);
                println!("  Version: {}", ack.version);
                if let Some(ref previous) = ack.previous {
                    println!("  Replaced: {}", previous);
                }
                if let Some(ref commit) = ack.commit {
                    println!("  Commit:  {}", commit);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "pushed",
                        "location": ack.location,
                        "version": ack.version,
                        "previous": ack.previous,
                        "commit": ack.commit,
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", ack.version);
            }
        }
    }

    /// Print the result of a pull
    pub fn print_pulled(&self, pulled: &Pulled) {
        let document = &pulled.document;
        match self.format {
            OutputFormat::Human => {
                println!("✓ Pulled {} ({} bytes)", pulled.location, document.len());
                println!("  Version: {}", pulled.version);
            }
            OutputFormat::Json => {
                // Embed the document as JSON when it parses, as text otherwise
                let content = document
                    .to_json()
                    .unwrap_or_else(|_| serde_json::Value::String(document.to_string()));
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "pulled",
                        "location": pulled.location,
                        "version": pulled.version,
                        "bytes": document.len(),
                        "document": content,
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", pulled.version);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a recovery hint after an error (always to stderr)
    pub fn hint(&self, hint: &str) {
        if self.format != OutputFormat::Quiet {
            eprintln!("hint: {}", hint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_is_json() {
        assert!(Output::new(OutputFormat::Json).is_json());
        assert!(!Output::new(OutputFormat::Human).is_json());
    }
}
