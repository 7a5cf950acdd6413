//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats. Table columns
//! are sized to the widest cell, so zero-row tables collapse to their
//! header widths.

use std::io::Write;

use serde::Serialize;

use nebula_api::{Cluster, Namespace, Org};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A left-aligned text table with per-column widths computed as the
/// maximum of the header and every cell in that column.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given header.
    #[must_use]
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Rows shorter than the header are padded with empty
    /// cells; longer rows are truncated to the header width.
    pub fn push_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }
        widths
    }

    /// Write the table: header line, then one line per row, columns
    /// separated by two spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let widths = self.column_widths();
        write_line(writer, &self.header, &widths)?;
        for row in &self.rows {
            write_line(writer, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        // pad all but the last column
        if i + 1 < cells.len() {
            for _ in cell.len()..widths[i] {
                line.push(' ');
            }
        }
    }
    writeln!(writer, "{line}")?;
    Ok(())
}

/// One namespace row: `ALIAS NAME TYPE PHASE`.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceRow {
    /// User-chosen alias.
    pub alias: String,
    /// Kubernetes namespace name.
    pub name: String,
    /// Namespace type.
    #[serde(rename = "type")]
    pub ns_type: String,
    /// Lifecycle phase.
    pub phase: String,
}

impl From<&Namespace> for NamespaceRow {
    fn from(ns: &Namespace) -> Self {
        Self {
            alias: ns.alias.clone(),
            name: ns.namespace.clone(),
            ns_type: ns.ns_type.clone(),
            phase: ns.phase.to_string(),
        }
    }
}

/// Namespace listing output.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceTable {
    /// Rows, one per namespace.
    pub namespaces: Vec<NamespaceRow>,
}

impl NamespaceTable {
    /// Table for a single namespace.
    #[must_use]
    pub fn single(ns: &Namespace) -> Self {
        Self {
            namespaces: vec![NamespaceRow::from(ns)],
        }
    }
}

impl TableDisplay for NamespaceTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let mut table = Table::new(&["ALIAS", "NAME", "TYPE", "PHASE"]);
        for row in &self.namespaces {
            table.push_row(vec![
                row.alias.clone(),
                row.name.clone(),
                row.ns_type.clone(),
                row.phase.clone(),
            ]);
        }
        table.write(writer)
    }
}

/// One cluster row: `NAME ORG SKE`.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterRow {
    /// Cluster name.
    pub name: String,
    /// Owning organization as `provider/name`.
    pub org: String,
    /// Placement as `cloud/region`.
    pub ske: String,
}

impl ClusterRow {
    /// Build a row, joining the owning org when known.
    #[must_use]
    pub fn new(cluster: &Cluster, org: Option<&Org>) -> Self {
        Self {
            name: cluster.name.clone(),
            org: org.map(Org::qualified_name).unwrap_or_default(),
            ske: format!("{}/{}", cluster.ske.cloud, cluster.ske.region),
        }
    }
}

/// Cluster listing output.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterTable {
    /// Rows, one per cluster.
    pub clusters: Vec<ClusterRow>,
}

impl TableDisplay for ClusterTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let mut table = Table::new(&["NAME", "ORG", "SKE"]);
        for row in &self.clusters {
            table.push_row(vec![row.name.clone(), row.org.clone(), row.ske.clone()]);
        }
        table.write(writer)
    }
}

/// Simple message output.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
    /// Whether this is a success message.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.success {
            writeln!(writer, "✓ {}", self.message)?;
        } else {
            writeln!(writer, "{}", self.message)?;
        }
        Ok(())
    }
}
