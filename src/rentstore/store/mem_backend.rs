use super::backend::TableBackend;
use crate::error::StoreError;
use crate::model::Table;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// In-memory storage backend for testing.
///
/// Uses a `Mutex` rather than `RefCell` so a `RecordStore<MemBackend>` can be
/// shared across threads in guard tests.
#[derive(Default)]
pub struct MemBackend {
    tables: Mutex<HashMap<Table, Vec<String>>>,
    simulate_write_error: AtomicBool,
    io_delay_ms: AtomicU64,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with raw lines, header included if wanted.
    pub fn with_lines<I, S>(self, table: Table, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut tables) = self.tables.lock() {
            tables.insert(table, lines.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Sleep this long on every read and append, outside the table lock.
    /// Widens the window between a caller's check and its write.
    pub fn set_io_delay(&self, delay: Duration) {
        self.io_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn pause(&self) {
        let ms = self.io_delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other(
                "Simulated write error",
            )));
        }
        Ok(())
    }

    fn tables(
        &self,
        table: Table,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Table, Vec<String>>>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned(table))
    }
}

impl TableBackend for MemBackend {
    fn read_lines(&self, table: Table) -> Result<Vec<String>, StoreError> {
        self.pause();
        let tables = self.tables(table)?;
        Ok(tables.get(&table).cloned().unwrap_or_default())
    }

    fn append_line(&self, table: Table, line: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.pause();
        let mut tables = self.tables(table)?;
        tables.entry(table).or_default().push(line.to_string());
        Ok(())
    }

    fn rewrite(&self, table: Table, lines: &[String]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables(table)?;
        tables.insert(table, lines.to_vec());
        Ok(())
    }
}
