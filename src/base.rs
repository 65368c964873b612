use std::collections::HashMap;

use serde::Serialize;

/// Cell text used wherever a price figure is unavailable
pub const PLACEHOLDER: &str = "-";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PriceField {
    LowestPrice,
    Volume,
    MedianPrice,
}

impl PriceField {
    pub const ALL: [PriceField; 3] = [PriceField::LowestPrice, PriceField::Volume, PriceField::MedianPrice];

    /// Key of this field in the priceoverview response
    pub fn json_key(self) -> &'static str {
        match self {
            PriceField::LowestPrice => "lowest_price",
            PriceField::Volume => "volume",
            PriceField::MedianPrice => "median_price",
        }
    }

    /// 1-based spreadsheet column. Column 1 holds the item name.
    pub fn column(self) -> u32 {
        match self {
            PriceField::LowestPrice => 2,
            PriceField::Volume => 3,
            PriceField::MedianPrice => 4,
        }
    }
}

/// Normalized priceoverview result for one item
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub success: bool,
    pub lowest_price: Option<String>,
    pub volume: Option<String>,
    pub median_price: Option<String>,
}

impl PriceRecord {
    /// Record used when a fetch fails or the response cannot be understood
    pub fn unavailable() -> Self {
        PriceRecord {
            success: false,
            lowest_price: Some(PLACEHOLDER.to_owned()),
            volume: Some(PLACEHOLDER.to_owned()),
            median_price: Some(PLACEHOLDER.to_owned()),
        }
    }

    pub fn get(&self, field: PriceField) -> Option<&str> {
        match field {
            PriceField::LowestPrice => self.lowest_price.as_deref(),
            PriceField::Volume => self.volume.as_deref(),
            PriceField::MedianPrice => self.median_price.as_deref(),
        }
    }

    pub fn set(&mut self, field: PriceField, value: Option<String>) {
        match field {
            PriceField::LowestPrice => self.lowest_price = value,
            PriceField::Volume => self.volume = value,
            PriceField::MedianPrice => self.median_price = value,
        }
    }
}

/// Item name -> record, kept in insertion order.
///
/// Inserting a name that is already present replaces its record but keeps the
/// position of the first insertion, so an item listed under two namespaces
/// occupies a single row holding the later result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(String, PriceRecord)>,
    index: HashMap<String, usize>,
}

impl ResultSet {
    pub fn new() -> Self {
        ResultSet { entries: Vec::new(), index: HashMap::new() }
    }

    /// Returns the replaced record if `name` was already present
    pub fn insert(&mut self, name: String, record: PriceRecord) -> Option<PriceRecord> {
        if let Some(&pos) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, record));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, record));
        None
    }

    pub fn get(&self, name: &str) -> Option<&PriceRecord> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }
}
