//! Output format implementations for graphs.

mod dot;
pub(crate) mod json;

pub use dot::to_dot;
pub use json::to_json;

use std::fmt;
use std::str::FromStr;

/// Output format for graph export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Graphviz DOT format
    #[default]
    Dot,
    /// JSON format for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" | "gv" => Ok(OutputFormat::Dot),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Valid options: dot, json", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "dot" | "gv" => Some(OutputFormat::Dot),
            "json" => Some(OutputFormat::Json),
            "png" | "svg" | "pdf" => Some(OutputFormat::Dot), // Will be rendered
            _ => None,
        }
    }
}

/// Layout direction for diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Top to bottom
    #[default]
    TB,
    /// Left to right
    LR,
}

impl Layout {
    /// Value of the Graphviz `rankdir` attribute
    pub fn rankdir(&self) -> &'static str {
        match self {
            Layout::TB => "TB",
            Layout::LR => "LR",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "left-right" | "horizontal" => Ok(Layout::LR),
            "tb" | "td" | "top-bottom" | "top-down" | "vertical" => Ok(Layout::TB),
            _ => Err(format!("Unknown layout: {}. Valid options: lr, tb", s)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::LR => write!(f, "lr"),
            Layout::TB => write!(f, "tb"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("DOT".parse::<OutputFormat>(), Ok(OutputFormat::Dot));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("mermaid".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::from_extension("svg"), Some(OutputFormat::Dot));
        assert_eq!(OutputFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!("left-right".parse::<Layout>(), Ok(Layout::LR));
        assert_eq!("TD".parse::<Layout>(), Ok(Layout::TB));
        assert_eq!(Layout::LR.rankdir(), "LR");
        assert!("diagonal".parse::<Layout>().is_err());
    }
}
