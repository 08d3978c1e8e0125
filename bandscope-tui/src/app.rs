//! Application state: the latest load outcome, selection cursors and UI chrome.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bandscope_core::{AppConfig, ValuationTable};
use bandscope_runner::{
    category_view, process_file, stock_view, CategoryView, ConfigSource, ProcessOutcome,
    StockView,
};

const MAX_ERROR_HISTORY: usize = 50;

// ─── Panels ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Data,
    Stock,
    Category,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Data, Panel::Stock, Panel::Category, Panel::Help];

    pub fn index(self) -> usize {
        match self {
            Panel::Data => 0,
            Panel::Stock => 1,
            Panel::Category => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Data => "Data",
            Panel::Stock => "Stock",
            Panel::Category => "Category",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ─── Status & errors ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Validation,
    Query,
    Config,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Load => "Load",
            ErrorCategory::Validation => "Validation",
            ErrorCategory::Query => "Query",
            ErrorCategory::Config => "Config",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    OpenFile,
    ErrorHistory,
}

// ─── Selection ───────────────────────────────────────────────────────

/// Cursors over the symbols, categories and years of the loaded table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub symbols: Vec<String>,
    pub symbol_idx: usize,
    pub categories: Vec<String>,
    pub category_idx: usize,
    pub years: Vec<i32>,
    pub year_idx: usize,
}

impl Selection {
    /// Start on the first symbol and category and the latest year.
    pub fn from_table(table: &ValuationTable) -> Self {
        let years: Vec<i32> = table.list_years().into_iter().collect();
        Self {
            symbols: table.list_symbols().into_iter().collect(),
            symbol_idx: 0,
            categories: table.list_categories().into_iter().collect(),
            category_idx: 0,
            year_idx: years.len().saturating_sub(1),
            years,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbols.get(self.symbol_idx).map(String::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.categories.get(self.category_idx).map(String::as_str)
    }

    pub fn year(&self) -> Option<i32> {
        self.years.get(self.year_idx).copied()
    }

    /// Carry cursors over from `previous` where the same value still exists.
    fn retain(&mut self, previous: &Selection) {
        if let Some(i) = previous
            .symbol()
            .and_then(|s| self.symbols.iter().position(|x| x == s))
        {
            self.symbol_idx = i;
        }
        if let Some(i) = previous
            .category()
            .and_then(|c| self.categories.iter().position(|x| x == c))
        {
            self.category_idx = i;
        }
        if let Some(i) = previous
            .year()
            .and_then(|y| self.years.iter().position(|x| *x == y))
        {
            self.year_idx = i;
        }
    }
}

fn cycle(idx: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

// ─── App state ───────────────────────────────────────────────────────

pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,
    pub config: AppConfig,
    pub config_source: ConfigSource,
    pub file_path: Option<PathBuf>,
    pub outcome: Option<ProcessOutcome>,
    pub selection: Selection,
    pub stock_view: Option<StockView>,
    pub category_view: Option<CategoryView>,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub path_input: String,
    pub report_scroll: u16,
    pub welcome_dismissed: bool,
}

impl AppState {
    pub fn new(config: AppConfig, config_source: ConfigSource) -> Self {
        Self {
            active_panel: Panel::Data,
            running: true,
            config,
            config_source,
            file_path: None,
            outcome: None,
            selection: Selection::default(),
            stock_view: None,
            category_view: None,
            status_message: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
            overlay: Overlay::None,
            path_input: String::new(),
            report_scroll: 0,
            welcome_dismissed: false,
        }
    }

    pub fn table(&self) -> Option<&ValuationTable> {
        self.outcome.as_ref().and_then(|o| o.table.as_ref())
    }

    // ── Loading ──

    /// Run the pipeline for `path` and replace the current outcome.
    pub fn open_file(&mut self, path: PathBuf) {
        match process_file(&path, &self.config) {
            Ok(outcome) => self.apply_outcome(path, outcome),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "load failed");
                self.push_error(ErrorCategory::Load, e.to_string(), e.suggestion().to_string());
            }
        }
    }

    pub fn reload(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.open_file(path),
            None => self.set_warning("No file open. Press o to open one.".into()),
        }
    }

    fn apply_outcome(&mut self, path: PathBuf, outcome: ProcessOutcome) {
        let previous = std::mem::take(&mut self.selection);
        self.file_path = Some(path);
        self.report_scroll = 0;

        let report = &outcome.report;
        let (errors, warnings) = (report.error_count(), report.warning_count());
        let first_error = report.errors().next().map(|i| i.message.clone());

        self.selection = match outcome.table.as_ref() {
            Some(table) => {
                let mut selection = Selection::from_table(table);
                selection.retain(&previous);
                selection
            }
            None => Selection::default(),
        };
        let rows = outcome.row_count;
        let symbols = self.selection.symbols.len();
        let categories = self.selection.categories.len();
        let skips = outcome.coercion_skips.len();
        self.outcome = Some(outcome);
        self.refresh_views();

        if errors > 0 {
            self.active_panel = Panel::Data;
            self.push_error(
                ErrorCategory::Validation,
                format!("{errors} validation errors; the file was not loaded"),
                first_error.unwrap_or_default(),
            );
        } else if warnings > 0 || skips > 0 {
            self.set_warning(format!(
                "Loaded {rows} rows ({symbols} symbols, {categories} categories) with {warnings} warnings, {skips} cells left empty"
            ));
        } else {
            self.set_status(format!(
                "Loaded {rows} rows: {symbols} symbols in {categories} categories"
            ));
        }
    }

    /// Rebuild the stock and category views from the current selection.
    pub fn refresh_views(&mut self) {
        let Some(table) = self.outcome.as_ref().and_then(|o| o.table.as_ref()) else {
            self.stock_view = None;
            self.category_view = None;
            return;
        };

        let stock = self
            .selection
            .symbol()
            .map(|s| stock_view(table, s, self.selection.year()))
            .transpose();
        let category = self
            .selection
            .category()
            .map(|c| category_view(table, c, self.selection.year()))
            .transpose();

        let mut failures = Vec::new();
        self.stock_view = stock.unwrap_or_else(|e| {
            failures.push(e.to_string());
            None
        });
        self.category_view = category.unwrap_or_else(|e| {
            failures.push(e.to_string());
            None
        });
        for message in failures {
            self.push_error(ErrorCategory::Query, message, "building chart views".into());
        }
    }

    // ── Open-file prompt ──

    pub fn begin_open(&mut self) {
        self.path_input = self
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.overlay = Overlay::OpenFile;
    }

    /// Open the path typed into the prompt. Surrounding quotes are stripped.
    pub fn submit_path(&mut self) {
        let input = self
            .path_input
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        self.overlay = Overlay::None;
        self.path_input.clear();
        if input.is_empty() {
            self.set_warning("No path entered".into());
            return;
        }
        self.open_file(PathBuf::from(input));
    }

    // ── Selection ──

    pub fn cycle_symbol(&mut self, forward: bool) {
        if self.selection.symbols.is_empty() {
            self.set_warning("No symbols loaded".into());
            return;
        }
        self.selection.symbol_idx =
            cycle(self.selection.symbol_idx, self.selection.symbols.len(), forward);
        self.refresh_views();
    }

    pub fn cycle_category(&mut self, forward: bool) {
        if self.selection.categories.is_empty() {
            self.set_warning("No categories loaded".into());
            return;
        }
        self.selection.category_idx =
            cycle(self.selection.category_idx, self.selection.categories.len(), forward);
        self.refresh_views();
    }

    pub fn cycle_year(&mut self, forward: bool) {
        if self.selection.years.is_empty() {
            self.set_warning("No years loaded".into());
            return;
        }
        self.selection.year_idx = cycle(self.selection.year_idx, self.selection.years.len(), forward);
        self.refresh_views();
    }

    // ── Status ──

    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        self.status_message = Some((message.clone(), StatusLevel::Error));
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message,
            context,
        });
        if self.error_history.len() > MAX_ERROR_HISTORY {
            self.error_history.pop_back();
        }
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Warning));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default(), ConfigSource::BuiltIn)
    }
}
