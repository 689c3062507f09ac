use std::io::Read;

use crate::{
    storage::reader::YxdbReader,
    types::{error::Result, row::Row},
};

pub trait Scanner {
    fn scan(&mut self) -> Result<Option<Row>>;
    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>>;
}

impl<R: Read> Scanner for YxdbReader<R> {
    fn scan(&mut self) -> Result<Option<Row>> {
        if !self.next()? {
            return Ok(None);
        }
        let position = self.position().unwrap_or_default();
        Ok(Some(Row::new(position, self.read_all()?)))
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>> {
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size {
            match self.scan()? {
                Some(row) => batch.push(row),
                None => break,
            }
        }
        Ok(batch)
    }
}

/// Adapts a [`Scanner`] into an iterator of decoded rows.
///
/// Iteration stops after the first error.
pub struct ScanIterator<S: Scanner> {
    scanner: S,
    failed: bool,
}

impl<S: Scanner> ScanIterator<S> {
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            failed: false,
        }
    }

    pub fn into_inner(self) -> S {
        self.scanner
    }
}

impl<S: Scanner> Iterator for ScanIterator<S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.scanner.scan() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
