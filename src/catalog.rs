use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use std::{collections::HashMap, fs::File, io::Read, path::Path, sync::Arc};

use crate::rupees::Rupees;

/// Number of columns in every catalog data line.
pub const FIELDS: usize = 7;

/// A product that can be sold, as described by one line of the catalog file.
///
/// Fields are listed in column order:
///
/// ```txt
/// code,name,price,weight,manufacturer,manufactureDate,expiryDate
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Item {
    pub code: String,
    pub name: String,
    pub price: Rupees,
    pub weight: f64,
    pub manufacturer: String,
    pub manufactured: NaiveDate,
    pub expiry: NaiveDate,
}

/// The items available for sale, keyed by lowercase item code.
///
/// A catalog is built once, usually with [`Catalog::load`], and only read
/// after that.
#[derive(Debug, Default)]
pub struct Catalog {
    items: HashMap<String, Arc<Item>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the catalog file at `path`.
    ///
    /// The first line is a header and is always skipped. Every other line must
    /// have exactly [`FIELDS`] comma-separated fields, not counting empty ones
    /// at the end, with dates written as `YYYY-MM-DD`. Lines that don't fit
    /// are logged and skipped, so one bad line never costs the rest of the
    /// catalog.
    ///
    /// Loading never fails: if the file can't be opened, the error is logged
    /// and the catalog is empty.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                let catalog = Self::from_reader(file);
                info!(path = %path.display(), items = catalog.len(), "catalog loaded");
                catalog
            }
            Err(err) => {
                error!(path = %path.display(), "error loading items: {err}");
                Self::new()
            }
        }
    }

    /// Reads catalog data from `rdr`, in the same format as [`Catalog::load`].
    ///
    /// If reading fails partway, the items loaded so far are kept.
    pub fn from_reader(rdr: impl Read) -> Self {
        let mut catalog = Self::new();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        for result in rdr.records() {
            let mut record = match result {
                Ok(record) => record,
                Err(err) if err.is_io_error() => {
                    error!("error loading items: {err}");
                    break;
                }
                Err(err) => {
                    warn!("skipping unreadable line: {err}");
                    continue;
                }
            };
            let line = record.position().map_or(0, csv::Position::line);
            debug!(line, "reading line: {}", record.iter().collect::<Vec<_>>().join(","));
            // Trailing empty fields don't count.
            let fields = record.len() - record.iter().rev().take_while(|f| f.is_empty()).count();
            if fields != FIELDS {
                warn!(line, fields, "skipping invalid line: expected {FIELDS} fields");
                continue;
            }
            record.truncate(fields);
            let item: Item = match record.deserialize(None) {
                Ok(item) => item,
                Err(err) => {
                    warn!(line, "skipping invalid line: {err}");
                    continue;
                }
            };
            if item.price < Rupees::ZERO {
                warn!(line, code = %item.code, "skipping invalid line: negative price");
                continue;
            }
            info!(code = %item.code, name = %item.name, "loaded item");
            catalog.insert(item);
        }
        catalog
    }

    /// Adds `item`, replacing any item with the same code (ignoring case).
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.code.to_lowercase(), Arc::new(item));
    }

    /// Looks up the item with `code`, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Arc<Item>> {
        self.items.get(&code.trim().to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
