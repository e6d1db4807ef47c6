use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, merges, or emits project data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the XML export cannot be parsed at all.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Raised when a worksheet does not follow the export conventions.
    #[error("invalid worksheet structure: {0}")]
    InvalidSheet(String),

    /// Raised when the XML export parses but lacks expected structure.
    #[error("invalid XML export: {0}")]
    InvalidExport(String),

    /// Raised when a task row is missing a field the merge requires.
    #[error("row {row} is missing required field '{field}'")]
    MalformedRow { row: usize, field: &'static str },

    /// Raised when two rows of one project share a join key.
    #[error("duplicate join key '{0}'")]
    DuplicateJoinKey(String),

    /// Raised when a predecessor link points at an unknown record id.
    #[error("predecessor link references unknown record id {0}")]
    UnresolvedReference(u64),

    /// Raised when a predecessor link field has an unexpected shape.
    #[error("unexpected predecessor link shape: {0}")]
    UnexpectedShape(String),

    /// Raised when dependency links form a cycle.
    #[error("dependency cycle involving task '{0}'")]
    DependencyCycle(String),

    /// Raised when the CLI receives unpaired export files.
    #[error("expected matching --xlsx/--xml pairs, got {xlsx} and {xml}")]
    MismatchedSources { xlsx: usize, xml: usize },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
