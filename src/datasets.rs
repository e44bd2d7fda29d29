//! Record sources the trainer reads from.
//!
//! A source is a rewindable cursor over labelled records: every field but the
//! last is a numeric feature, the last field is an integer label.
use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

pub trait DataSource {
    /// Move the cursor back before the first data record. A skipped header
    /// stays skipped.
    fn rewind(&mut self);

    /// Step onto the next record. Returns `false` once past the last one.
    fn advance(&mut self) -> bool;

    /// Features of the current record.
    fn features(&self) -> Result<Vec<f64>>;

    /// Label of the current record, always 0 or 1.
    fn label(&self) -> Result<i64>;
}

/// Accept only the two class labels.
fn check_label(record: usize, value: i64) -> Result<i64> {
    match value {
        0 | 1 => Ok(value),
        _ => Err(Error::InvalidLabel { record, value }),
    }
}

/// Delimited text records, read in full at construction.
#[derive(Debug, Clone)]
pub struct CsvSource {
    records: Vec<StringRecord>,
    next: usize,
    current: Option<usize>,
}

impl CsvSource {
    /// Open a delimited file. With `skip_header` the first line is dropped once.
    pub fn open<P: AsRef<Path>>(path: P, delimiter: u8, skip_header: bool) -> Result<Self> {
        let reader = Self::builder(delimiter, skip_header).from_path(path)?;
        Self::collect(reader)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8, skip_header: bool) -> Result<Self> {
        let reader = Self::builder(delimiter, skip_header).from_reader(reader);
        Self::collect(reader)
    }

    fn builder(delimiter: u8, skip_header: bool) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(delimiter)
            .has_headers(skip_header)
            .flexible(true)
            .trim(Trim::All);
        builder
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
        Ok(Self {
            records,
            next: 0,
            current: None,
        })
    }

    /// Number of data records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current record with its 1-based number, checked to hold a label.
    fn current_record(&self) -> Result<(usize, &StringRecord)> {
        let index = self.current.ok_or(Error::NoCurrentRecord)?;
        let record = &self.records[index];
        if record.len() < 2 {
            return Err(Error::MalformedRecord {
                record: index + 1,
                fields: record.len(),
            });
        }
        Ok((index + 1, record))
    }
}

impl DataSource for CsvSource {
    fn rewind(&mut self) {
        self.next = 0;
        self.current = None;
    }

    fn advance(&mut self) -> bool {
        if self.next < self.records.len() {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    fn features(&self) -> Result<Vec<f64>> {
        let (number, record) = self.current_record()?;
        let count = record.len() - 1;
        record
            .iter()
            .take(count)
            .enumerate()
            .map(|(field, value)| {
                value.parse::<f64>().map_err(|_| Error::Parse {
                    record: number,
                    field,
                    value: value.to_string(),
                })
            })
            .collect()
    }

    fn label(&self) -> Result<i64> {
        let (number, record) = self.current_record()?;
        let field = record.len() - 1;
        let value = &record[field];
        let label = value.parse::<i64>().map_err(|_| Error::Parse {
            record: number,
            field,
            value: value.to_string(),
        })?;
        check_label(number, label)
    }
}

/// In-memory labelled records
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<(Vec<f64>, i64)>,
    next: usize,
    current: Option<usize>,
}

impl MemorySource {
    pub fn new(records: Vec<(Vec<f64>, i64)>) -> Self {
        Self {
            records,
            next: 0,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records repeated `times` times, in order.
    pub fn repeated(&self, times: usize) -> Self {
        let records = (0..times).flat_map(|_| self.records.iter().cloned()).collect();
        Self::new(records)
    }

    /// Current record with its 1-based number.
    fn current_record(&self) -> Result<(usize, &(Vec<f64>, i64))> {
        self.current
            .map(|index| (index + 1, &self.records[index]))
            .ok_or(Error::NoCurrentRecord)
    }
}

impl DataSource for MemorySource {
    fn rewind(&mut self) {
        self.next = 0;
        self.current = None;
    }

    fn advance(&mut self) -> bool {
        if self.next < self.records.len() {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    fn features(&self) -> Result<Vec<f64>> {
        let (_, record) = self.current_record()?;
        Ok(record.0.clone())
    }

    fn label(&self) -> Result<i64> {
        let (number, record) = self.current_record()?;
        check_label(number, record.1)
    }
}
