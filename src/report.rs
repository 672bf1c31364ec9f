// src/report.rs
// Text rendering of the three ranked summaries

use std::fmt;

use crate::analyze;
use crate::error::Result;
use crate::model::IndexInfo;

pub const LARGEST_TITLE: &str = "Largest indexes by size";
pub const MOST_SHARDS_TITLE: &str = "Indexes with most shards";
pub const LEAST_BALANCED_TITLE: &str = "Least balanced indexes";

const EMPTY_MARKER: &str = "<empty>";

/// One report line: an index plus its rendered ranking metric
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub index: &'a IndexInfo,
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub title: &'static str,
    pub rows: Vec<Row<'a>>,
}

/// The three sections, always in the same order
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'a> {
    pub sections: [Section<'a>; 3],
}

impl<'a> Report<'a> {
    pub fn build(indexes: &'a [IndexInfo], top: usize) -> Result<Self> {
        let largest = analyze::largest(indexes, top)?
            .into_iter()
            .map(|index| Row {
                index,
                metric: format_bytes(index.size_bytes),
            })
            .collect();

        let most_shards = analyze::most_shards(indexes, top)?
            .into_iter()
            .map(|index| Row {
                index,
                metric: index.total_shards.to_string(),
            })
            .collect();

        let least_balanced = analyze::least_balanced(indexes, top)?
            .into_iter()
            .map(|r| Row {
                index: r.index,
                metric: format!("{:.3}", r.cv),
            })
            .collect();

        Ok(Self {
            sections: [
                Section {
                    title: LARGEST_TITLE,
                    rows: largest,
                },
                Section {
                    title: MOST_SHARDS_TITLE,
                    rows: most_shards,
                },
                Section {
                    title: LEAST_BALANCED_TITLE,
                    rows: least_balanced,
                },
            ],
        })
    }
}

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  total_shards={} size={}",
            self.index.name, self.metric, self.index.total_shards, self.index.size_bytes
        )
    }
}

impl fmt::Display for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.rows.is_empty() {
            return writeln!(f, "{EMPTY_MARKER}");
        }
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

/// Byte count with an SI (powers of 1000) suffix
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["kB", "MB", "GB", "TB", "PB", "EB"];

    if bytes < 1000 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 999.95 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1}{}", value, UNITS[unit])
}
