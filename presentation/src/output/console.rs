//! Console output for tool results and the tool catalog

use bridge_domain::{ToolCatalog, ToolResult};
use colored::Colorize;

/// Formats tool-call outcomes for a person at a terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Human-readable rendering of a result
    pub fn format_result(tool_name: &str, result: &ToolResult) -> String {
        let mut output = String::new();

        match result.error() {
            None => {
                output.push_str(&format!("{} {}\n", "✓".green().bold(), tool_name.bold()));
                output.push_str(&Self::indent(result.display(), "  "));
            }
            Some(error) => {
                output.push_str(&format!(
                    "{} {} {}\n",
                    "✗".red().bold(),
                    tool_name.bold(),
                    format!("[{}]", error.code).red()
                ));
                output.push_str(&Self::indent(&error.message, "  "));
                if error.is_retryable() {
                    output.push_str(&format!("\n  {}", "(retryable)".dimmed()));
                }
            }
        }

        output.push('\n');
        output
    }

    /// Result as the engine receives it
    pub fn format_json(result: &ToolResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per tool: name, kind and description
    pub fn format_catalog(catalog: &ToolCatalog) -> String {
        let mut output = format!("{}\n", "Tools:".cyan().bold());
        for tool in catalog.all() {
            output.push_str(&format!(
                "  {:<24} {:<12} {}\n",
                tool.name.bold(),
                tool.kind.as_str().dimmed(),
                tool.description
            ));
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
