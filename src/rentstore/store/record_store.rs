use super::backend::TableBackend;
use crate::error::StoreError;
use crate::lifecycle::RentalHistory;
use crate::model::{
    decode_line, encode_line, is_header, line_key, CatalogEntry, Record, RentalRecord, Table,
};
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Everything both tables hold for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLookup {
    /// `None` when only ledger rows remain (catalog row pruned, history kept).
    pub catalog: Option<CatalogEntry>,
    /// Ledger rows for the key, in append order.
    pub rentals: RentalHistory,
}

pub struct RecordStore<B: TableBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    catalog_guard: Mutex<()>,
    ledger_guard: Mutex<()>,
}

impl<B: TableBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            catalog_guard: Mutex::new(()),
            ledger_guard: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn guard(&self, table: Table) -> Result<MutexGuard<'_, ()>, StoreError> {
        let guard = match table {
            Table::Catalog => &self.catalog_guard,
            Table::Ledger => &self.ledger_guard,
        };
        guard.lock().map_err(|_| StoreError::Poisoned(table))
    }

    /// Hold both tables until the returned value is dropped.
    ///
    /// Guards are always taken catalog first, then ledger. Any check whose
    /// outcome decides a write (rent, return, prune) must read and write
    /// through the same `LockedTables`. Calling the other `RecordStore`
    /// methods while holding it deadlocks.
    pub fn lock_tables(&self) -> Result<LockedTables<'_, B>, StoreError> {
        let catalog = self.guard(Table::Catalog)?;
        let ledger = self.guard(Table::Ledger)?;
        Ok(LockedTables {
            backend: &self.backend,
            _catalog: catalog,
            _ledger: ledger,
        })
    }

    /// Read and decode every row of `R`'s table.
    pub fn read_table<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let _guard = self.guard(R::TABLE)?;
        read_rows(&self.backend)
    }

    pub fn catalog(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.read_table()
    }

    pub fn ledger(&self) -> Result<Vec<RentalRecord>, StoreError> {
        self.read_table()
    }

    /// Scan both tables for `key`.
    ///
    /// Fails with [`StoreError::NotFound`] only when neither table has a row
    /// for it.
    pub fn lookup_by_key(&self, key: &str) -> Result<KeyLookup, StoreError> {
        self.lock_tables()?.lookup_by_key(key)
    }

    /// Append one row. Key uniqueness is the caller's business.
    pub fn append<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let _guard = self.guard(R::TABLE)?;
        append_row(&self.backend, record)
    }

    /// Rewrite `table` without the rows keyed by `key`. Returns how many rows
    /// were dropped; the table is left untouched when that is zero.
    pub fn remove_by_key(&self, table: Table, key: &str) -> Result<usize, StoreError> {
        let _guard = self.guard(table)?;
        remove_rows(&self.backend, table, key)
    }

    /// Close the open rental interval for `key`.
    ///
    /// Exactly one ledger row for `key` must be open. The row is rebuilt from
    /// its decoded fields, so neighbouring empty fields are never touched.
    pub fn set_return_date(&self, key: &str, date: NaiveDate) -> Result<(), StoreError> {
        let _guard = self.guard(Table::Ledger)?;
        close_open_row(&self.backend, key, date)
    }
}

/// Both tables of a [`RecordStore`], held for one check-then-write sequence.
pub struct LockedTables<'a, B: TableBackend> {
    backend: &'a B,
    _catalog: MutexGuard<'a, ()>,
    _ledger: MutexGuard<'a, ()>,
}

impl<B: TableBackend> LockedTables<'_, B> {
    pub fn catalog(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        read_rows(self.backend)
    }

    pub fn ledger(&self) -> Result<Vec<RentalRecord>, StoreError> {
        read_rows(self.backend)
    }

    pub fn lookup_by_key(&self, key: &str) -> Result<KeyLookup, StoreError> {
        let catalog = self
            .catalog()?
            .into_iter()
            .find(|entry| entry.copy_id == key);
        let rentals: Vec<RentalRecord> = self
            .ledger()?
            .into_iter()
            .filter(|rec| rec.copy_id == key)
            .collect();

        if catalog.is_none() && rentals.is_empty() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(KeyLookup {
            catalog,
            rentals: RentalHistory::from_append_order(rentals),
        })
    }

    pub fn append<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        append_row(self.backend, record)
    }

    pub fn remove_by_key(&self, table: Table, key: &str) -> Result<usize, StoreError> {
        remove_rows(self.backend, table, key)
    }

    pub fn set_return_date(&self, key: &str, date: NaiveDate) -> Result<(), StoreError> {
        close_open_row(self.backend, key, date)
    }
}

fn read_rows<R: Record, B: TableBackend>(backend: &B) -> Result<Vec<R>, StoreError> {
    let lines = backend.read_lines(R::TABLE)?;
    let rows = decode_rows::<R>(&lines)?;
    let table = R::TABLE;
    debug!(%table, rows = rows.len(), "read table");
    Ok(rows)
}

fn append_row<R: Record, B: TableBackend>(backend: &B, record: &R) -> Result<(), StoreError> {
    let line = encode_line(record)?;
    backend.append_line(R::TABLE, &line)?;
    let table = R::TABLE;
    debug!(%table, key = record.key(), "appended row");
    Ok(())
}

fn remove_rows<B: TableBackend>(backend: &B, table: Table, key: &str) -> Result<usize, StoreError> {
    let lines = backend.read_lines(table)?;
    let before = lines.len();

    let kept: Vec<String> = lines
        .into_iter()
        .enumerate()
        .filter(|(idx, line)| (*idx == 0 && is_header(line)) || line_key(line) != key)
        .map(|(_, line)| line)
        .collect();

    let removed = before - kept.len();
    if removed > 0 {
        backend.rewrite(table, &kept)?;
    }
    debug!(table = %table, key, removed, "removed rows by key");
    Ok(removed)
}

fn close_open_row<B: TableBackend>(
    backend: &B,
    key: &str,
    date: NaiveDate,
) -> Result<(), StoreError> {
    let mut lines = backend.read_lines(Table::Ledger)?;

    let mut open: Vec<(usize, RentalRecord)> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if skip_line(idx, line) || line_key(line) != key {
            continue;
        }
        let record: RentalRecord = decode_line(line, idx + 1)?;
        if record.is_open() {
            open.push((idx, record));
        }
    }

    if open.len() != 1 {
        warn!(copy_id = key, open = open.len(), "refusing to close rental");
        return Err(StoreError::InvariantViolation {
            copy_id: key.to_string(),
            detail: format!("expected exactly one open rental, found {}", open.len()),
        });
    }

    let (idx, mut record) = open.remove(0);
    record.returned_on = Some(date);
    lines[idx] = encode_line(&record)?;
    backend.rewrite(Table::Ledger, &lines)?;
    debug!(copy_id = key, %date, "closed rental interval");
    Ok(())
}

fn skip_line(idx: usize, line: &str) -> bool {
    line.trim().is_empty() || (idx == 0 && is_header(line))
}

fn decode_rows<R: Record>(lines: &[String]) -> Result<Vec<R>, StoreError> {
    lines
        .iter()
        .enumerate()
        .filter(|(idx, line)| !skip_line(*idx, line))
        .map(|(idx, line)| decode_line(line, idx + 1))
        .collect()
}
