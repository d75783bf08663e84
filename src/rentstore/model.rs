//! # Records
//!
//! Named-field rows for the two persisted tables and the codec that maps them
//! to and from the line format.
//!
//! Both tables share one format: one record per line, fields separated by
//! commas, no quoting or escaping. A value containing a comma cannot be
//! represented; [`encode_line`] refuses it rather than writing a row that
//! would parse back with the wrong arity.
//!
//! ```text
//! Catalog: copy_id,platform,genre,title,condition,acquired_on
//! Ledger:  copy_id,rented_on,returned_on,renter_id
//! ```
//!
//! An empty `returned_on` marks an open rental interval.

use crate::error::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First field of the optional header line. A first line starting with this
/// token is skipped on read and preserved on rewrite.
pub const HEADER_TOKEN: &str = "GameID";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    Catalog,
    Ledger,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Catalog => f.write_str("catalog"),
            Table::Ledger => f.write_str("ledger"),
        }
    }
}

/// A row type with a fixed column layout in one table.
pub trait Record: Sized {
    const TABLE: Table;
    const ARITY: usize;

    /// Primary key for the catalog, foreign key for the ledger.
    fn key(&self) -> &str;

    fn from_fields(fields: &[&str]) -> Result<Self, String>;

    /// Column name and encoded value, in column order.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// One physical copy of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub copy_id: String,
    pub platform: String,
    pub genre: String,
    pub title: String,
    pub condition: String,
    pub acquired_on: NaiveDate,
}

impl CatalogEntry {
    /// Whole days between acquisition and `today`.
    pub fn days_owned(&self, today: NaiveDate) -> i64 {
        (today - self.acquired_on).num_days()
    }
}

impl Record for CatalogEntry {
    const TABLE: Table = Table::Catalog;
    const ARITY: usize = 6;

    fn key(&self) -> &str {
        &self.copy_id
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(Self {
            copy_id: fields[0].to_string(),
            platform: fields[1].to_string(),
            genre: fields[2].to_string(),
            title: fields[3].to_string(),
            condition: fields[4].to_string(),
            acquired_on: parse_date("acquired_on", fields[5])?,
        })
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("copy_id", self.copy_id.clone()),
            ("platform", self.platform.clone()),
            ("genre", self.genre.clone()),
            ("title", self.title.clone()),
            ("condition", self.condition.clone()),
            ("acquired_on", format_date(self.acquired_on)),
        ]
    }
}

/// One rental event. `returned_on == None` is an open interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalRecord {
    pub copy_id: String,
    pub rented_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub renter_id: String,
}

impl RentalRecord {
    pub fn open(copy_id: impl Into<String>, renter_id: impl Into<String>, on: NaiveDate) -> Self {
        Self {
            copy_id: copy_id.into(),
            rented_on: on,
            returned_on: None,
            renter_id: renter_id.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }
}

impl Record for RentalRecord {
    const TABLE: Table = Table::Ledger;
    const ARITY: usize = 4;

    fn key(&self) -> &str {
        &self.copy_id
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let returned_on = match fields[2] {
            "" => None,
            raw => Some(parse_date("returned_on", raw)?),
        };
        Ok(Self {
            copy_id: fields[0].to_string(),
            rented_on: parse_date("rented_on", fields[1])?,
            returned_on,
            renter_id: fields[3].to_string(),
        })
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("copy_id", self.copy_id.clone()),
            ("rented_on", format_date(self.rented_on)),
            ("returned_on", self.returned_on.map(format_date).unwrap_or_default()),
            ("renter_id", self.renter_id.clone()),
        ]
    }
}

/// Splits a raw line into fields. Surrounding whitespace of the line is dropped.
pub fn split_line(line: &str) -> Vec<&str> {
    line.trim().split(',').collect()
}

/// True when `line` is the reserved header row.
pub fn is_header(line: &str) -> bool {
    split_line(line).first() == Some(&HEADER_TOKEN)
}

/// First field of a raw line, used for key matching without a full parse.
pub fn line_key(line: &str) -> &str {
    line.trim().split(',').next().unwrap_or("")
}

/// Parses one raw line. `line_no` is 1-based and only used in errors.
pub fn decode_line<R: Record>(line: &str, line_no: usize) -> Result<R, StoreError> {
    let fields = split_line(line);
    if fields.len() != R::ARITY {
        return Err(StoreError::Malformed {
            table: R::TABLE,
            line: line_no,
            reason: format!("expected {} fields, found {}", R::ARITY, fields.len()),
        });
    }
    R::from_fields(&fields).map_err(|reason| StoreError::Malformed {
        table: R::TABLE,
        line: line_no,
        reason,
    })
}

pub fn encode_line<R: Record>(record: &R) -> Result<String, StoreError> {
    let fields = record.fields();
    for (name, value) in &fields {
        if value.contains([',', '\n', '\r']) {
            return Err(StoreError::Unencodable {
                field: name,
                value: value.clone(),
            });
        }
    }
    Ok(fields
        .into_iter()
        .map(|(_, value)| value)
        .collect::<Vec<_>>()
        .join(","))
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| format!("invalid {} date {:?}: {}", field, raw, e))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
