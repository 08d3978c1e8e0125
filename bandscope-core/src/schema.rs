//! Column schema contract: the canonical fields of a valuation CSV.
//!
//! Each canonical field has a fixed column type, a display name used in
//! reports, and a set of accepted header aliases (English and Chinese).
//! Aliases are matched case-insensitively by [`crate::alias`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical field of a valuation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Year,
    Symbol,
    Category,
    Cheap,
    Fair,
    Expensive,
    Close,
    CloseDate,
}

impl Field {
    /// Every field, in report order.
    pub const ALL: [Field; 8] = [
        Field::Year,
        Field::Symbol,
        Field::Category,
        Field::Cheap,
        Field::Fair,
        Field::Expensive,
        Field::Close,
        Field::CloseDate,
    ];

    /// The four price fields.
    pub const PRICES: [Field; 4] = [Field::Cheap, Field::Fair, Field::Expensive, Field::Close];

    /// Canonical name, as used in config files and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Symbol => "Symbol",
            Field::Category => "Category",
            Field::Cheap => "Cheap",
            Field::Fair => "Fair",
            Field::Expensive => "Expensive",
            Field::Close => "Close",
            Field::CloseDate => "CloseDate",
        }
    }

    /// Column name inside the processed table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Symbol => "symbol",
            Field::Category => "category",
            Field::Cheap => "cheap",
            Field::Fair => "fair",
            Field::Expensive => "expensive",
            Field::Close => "close",
            Field::CloseDate => "close_date",
        }
    }

    pub fn column_type(self) -> ColumnType {
        match self {
            Field::Year => ColumnType::Integer,
            Field::Cheap | Field::Fair | Field::Expensive | Field::Close => ColumnType::Float,
            Field::Symbol | Field::Category | Field::CloseDate => ColumnType::Text,
        }
    }

    /// Look up a field by canonical name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn is_price(self) -> bool {
        Field::PRICES.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn label(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "numeric",
            ColumnType::Text => "text",
        }
    }
}

/// One canonical column: whether it is required, how it is displayed and
/// which header strings are accepted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: Field,
    pub required: bool,
    pub display: String,
    /// Accepted header strings. The first entry is the primary alias.
    pub aliases: Vec<String>,
    /// Headers containing any of these are never matched to this field.
    pub excludes: Vec<String>,
}

impl ColumnSpec {
    pub fn primary_alias(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(self.field.name())
    }

    pub fn column_type(&self) -> ColumnType {
        self.field.column_type()
    }

    /// Append an alias unless an equivalent one (ignoring case) is present.
    pub fn add_alias(&mut self, alias: &str) {
        let alias = alias.trim();
        if alias.is_empty() {
            return;
        }
        let lowered = alias.to_lowercase();
        if !self.aliases.iter().any(|a| a.to_lowercase() == lowered) {
            self.aliases.push(alias.to_string());
        }
    }
}

struct SpecTemplate {
    field: Field,
    required: bool,
    display: &'static str,
    aliases: &'static [&'static str],
    excludes: &'static [&'static str],
}

/// The built-in column table.
///
/// Order matters twice: it is the order missing-column errors are reported
/// in, and within each entry the alias order is the display order of the
/// remediation hint.
const DEFAULT_COLUMNS: &[SpecTemplate] = &[
    SpecTemplate {
        field: Field::Year,
        required: true,
        display: "Year (年度)",
        aliases: &["Year", "年度", "年份"],
        excludes: &[],
    },
    SpecTemplate {
        field: Field::Symbol,
        required: true,
        display: "Symbol (代號/股票)",
        aliases: &["Symbol", "Ticker", "Stock", "代號", "代码", "股票"],
        excludes: &[],
    },
    SpecTemplate {
        field: Field::Category,
        required: false,
        display: "Category (分類/類別/產業)",
        aliases: &["Category", "Sector", "Industry", "分類", "類別", "產業"],
        excludes: &[],
    },
    SpecTemplate {
        field: Field::Cheap,
        required: true,
        display: "Cheap Price (便宜價)",
        aliases: &["Cheap", "便宜"],
        excludes: &[],
    },
    SpecTemplate {
        field: Field::Fair,
        required: true,
        display: "Fair Price (合理價)",
        aliases: &["Fair", "合理"],
        excludes: &[],
    },
    SpecTemplate {
        field: Field::Expensive,
        required: true,
        display: "Expensive Price (昂貴價)",
        aliases: &["Expensive", "昂貴"],
        excludes: &[],
    },
    SpecTemplate {
        field: Field::Close,
        required: true,
        display: "Closing Price (收盤價)",
        aliases: &["Closing Price", "Close Price", "收盤價", "Close", "Closing", "收盤"],
        excludes: &["Date", "日期"],
    },
    SpecTemplate {
        field: Field::CloseDate,
        required: false,
        display: "Close Date (收盤日期)",
        aliases: &["Close Date", "Closing Date", "收盤日期", "日期", "Date"],
        excludes: &[],
    },
];

/// The built-in column specs, one per [`Field`].
pub fn default_specs() -> Vec<ColumnSpec> {
    DEFAULT_COLUMNS
        .iter()
        .map(|t| ColumnSpec {
            field: t.field,
            required: t.required,
            display: t.display.to_string(),
            aliases: t.aliases.iter().map(|a| a.to_string()).collect(),
            excludes: t.excludes.iter().map(|e| e.to_string()).collect(),
        })
        .collect()
}

/// Find the spec for a field.
pub fn spec_for(specs: &[ColumnSpec], field: Field) -> Option<&ColumnSpec> {
    specs.iter().find(|s| s.field == field)
}

/// Fields that must be present for a table to be processed.
pub fn required_fields(specs: &[ColumnSpec]) -> Vec<Field> {
    specs.iter().filter(|s| s.required).map(|s| s.field).collect()
}
