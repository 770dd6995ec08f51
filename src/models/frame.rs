use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::series::TimeSeries;

/// Reference to a frame column, either by position or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    ByIndex(usize),
    ByName(String),
}

impl ColumnRef {
    pub fn name(name: impl Into<String>) -> Self {
        ColumnRef::ByName(name.into())
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::ByName(name.to_string())
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::ByIndex(index)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::ByIndex(i) => write!(f, "#{}", i),
            ColumnRef::ByName(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableIndex {
    /// Row numbers only, as produced by a reader before a time column is set.
    Positional(usize),
    Time(Vec<NaiveDateTime>),
}

impl TableIndex {
    pub fn len(&self) -> usize {
        match self {
            TableIndex::Positional(n) => *n,
            TableIndex::Time(times) => times.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Multi-column numeric table handed to the engine by readers and the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: TableIndex,
    pub columns: Vec<Column>,
}

impl Frame {
    pub fn new(index: TableIndex) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
        self
    }

    pub fn from_series(series: &TimeSeries) -> Self {
        Frame::new(TableIndex::Time(series.index().to_vec()))
            .with_column(series.name(), series.values().to_vec())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }
}
