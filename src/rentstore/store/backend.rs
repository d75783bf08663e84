use crate::error::StoreError;
use crate::model::Table;

/// Abstract interface for raw table I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (row codec, key matching, guards).
///
/// Lines are handed over exactly as stored, header line included.
pub trait TableBackend {
    /// Read every line of a table. A table that was never written reads as empty.
    fn read_lines(&self, table: Table) -> Result<Vec<String>, StoreError>;

    /// Append one line (without its terminator).
    fn append_line(&self, table: Table, line: &str) -> Result<(), StoreError>;

    /// Replace the whole table.
    /// MUST leave either the old or the new content behind if interrupted.
    fn rewrite(&self, table: Table, lines: &[String]) -> Result<(), StoreError>;
}
