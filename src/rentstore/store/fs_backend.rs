use super::backend::TableBackend;
use crate::error::StoreError;
use crate::model::Table;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_CATALOG_FILE: &str = "Game_Info.txt";
pub const DEFAULT_LEDGER_FILE: &str = "Rental.txt";

/// Plain-text tables, one file per table, inside a single data directory.
pub struct FsBackend {
    root: PathBuf,
    catalog_file: String,
    ledger_file: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            ledger_file: DEFAULT_LEDGER_FILE.to_string(),
        }
    }

    pub fn with_file_names(mut self, catalog: &str, ledger: &str) -> Self {
        self.catalog_file = catalog.to_string();
        self.ledger_file = ledger.to_string();
        self
    }

    pub fn table_path(&self, table: Table) -> PathBuf {
        match table {
            Table::Catalog => self.root.join(&self.catalog_file),
            Table::Ledger => self.root.join(&self.ledger_file),
        }
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

/// Files edited by hand often lack the final newline; appending straight after
/// the last byte would glue two records together.
fn ends_without_newline(path: &Path) -> Result<bool, StoreError> {
    let mut file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl TableBackend for FsBackend {
    fn read_lines(&self, table: Table) -> Result<Vec<String>, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn append_line(&self, table: Table, line: &str) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let path = self.table_path(table);
        let prefix = if ends_without_newline(&path)? { "\n" } else { "" };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}{}", prefix, line)?;
        file.flush()?;
        Ok(())
    }

    fn rewrite(&self, table: Table, lines: &[String]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let target = self.table_path(table);

        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", table, Uuid::new_v4()));
        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}
