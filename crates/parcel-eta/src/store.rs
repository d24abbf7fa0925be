//! # Rule Store
//!
//! Loads the ETA rule table once and serves it read-only afterwards.
//!
//! ## Table Format
//!
//! CSV with a header row. Columns are looked up by name, so order does not
//! matter and extra columns are ignored:
//!
//! ```text
//! carrier,priority,match_type,match_value,eta_min_business_days,eta_max_business_days,eta_label,note
//! postnord,10,contains,sorterad,1,2,,Paketet är sorterat
//! ```
//!
//! `eta_label_sv` and `note_sv` are accepted as aliases of `eta_label` and
//! `note`. Lines starting with `#` are comments. A leading byte-order mark
//! and CRLF line endings are tolerated.
//!
//! ## Loading Policy
//!
//! - A source that cannot be read, or that holds fewer than a header and one
//!   data row, fails with [`EtaError::ConfigLoad`].
//! - A row without `carrier` or `match_value` is dropped and logged.
//! - Non-numeric `priority` becomes [`DEFAULT_PRIORITY`]; non-numeric day
//!   counts become `0`.
//! - The result is sorted by carrier, then priority, stably, so rows with
//!   equal priority keep their file order.
//!
//! ## Caching
//!
//! [`RuleStore`] owns its cache. The first successful [`RuleStore::rules`]
//! call fills it and every later call returns the same `Arc`. Two threads
//! racing on the first call may both read the source; only one result is
//! kept and both are equivalent. A failed load is not cached.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::config::EtaConfig;
use crate::error::{EtaError, RuleRowError};
use crate::rule::{MatchType, Rule, DEFAULT_PRIORITY};

/// Somewhere a rule table can be read from.
pub trait RuleSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> String;

    /// Read the raw CSV text.
    fn read_table(&self) -> Result<String, EtaError>;
}

/// A rule table file on disk.
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleSource for FileRuleSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_table(&self) -> Result<String, EtaError> {
        std::fs::read_to_string(&self.path).map_err(|e| EtaError::ConfigLoad {
            source_name: self.name(),
            reason: e.to_string(),
        })
    }
}

/// A rule table held in memory, e.g. embedded with `include_str!`.
#[derive(Debug, Clone)]
pub struct InlineRuleSource {
    name: String,
    csv: String,
}

impl InlineRuleSource {
    pub fn new(name: impl Into<String>, csv: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            csv: csv.into(),
        }
    }
}

impl RuleSource for InlineRuleSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_table(&self) -> Result<String, EtaError> {
        Ok(self.csv.clone())
    }
}

/// Load-once, read-only store of ETA rules.
pub struct RuleStore {
    source: Box<dyn RuleSource>,
    cache: OnceLock<Arc<[Rule]>>,
}

impl RuleStore {
    /// Create a store that loads lazily from `source`.
    pub fn new(source: impl RuleSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: OnceLock::new(),
        }
    }

    /// Create a store reading the file named by `config`.
    pub fn from_config(config: &EtaConfig) -> Self {
        Self::new(FileRuleSource::new(config.rules_path()))
    }

    /// Create an already-loaded store. The rules are sorted the same way a
    /// loaded table is.
    pub fn from_rules(mut rules: Vec<Rule>) -> Self {
        sort_rules(&mut rules);
        let store = Self::new(InlineRuleSource::new("preloaded", ""));
        let _ = store.cache.set(rules.into());
        store
    }

    /// The rule table, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EtaError::ConfigLoad`] if the table cannot be read or is
    /// malformed.
    pub fn rules(&self) -> Result<Arc<[Rule]>, EtaError> {
        if let Some(rules) = self.cache.get() {
            return Ok(Arc::clone(rules));
        }

        let name = self.source.name();
        let text = self.source.read_table()?;
        let rules = parse_rule_table(&name, &text)?;
        tracing::info!(source = %name, rules = rules.len(), "loaded ETA rule table");

        Ok(Arc::clone(self.cache.get_or_init(|| rules.into())))
    }

    /// Whether the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleStore")
            .field("source", &self.source.name())
            .field("loaded_rules", &self.cache.get().map(|r| r.len()))
            .finish()
    }
}

/// Column positions resolved from the header row.
struct Columns {
    carrier: Option<usize>,
    priority: Option<usize>,
    match_type: Option<usize>,
    match_value: Option<usize>,
    eta_min: Option<usize>,
    eta_max: Option<usize>,
    eta_label: Option<usize>,
    note: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Self {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        Self {
            carrier: find(&["carrier"]),
            priority: find(&["priority"]),
            match_type: find(&["match_type"]),
            match_value: find(&["match_value"]),
            eta_min: find(&["eta_min_business_days"]),
            eta_max: find(&["eta_max_business_days"]),
            eta_label: find(&["eta_label", "eta_label_sv"]),
            note: find(&["note", "note_sv"]),
        }
    }
}

/// Parse a CSV rule table into a sorted rule list.
///
/// # Errors
///
/// Returns [`EtaError::ConfigLoad`] if the header cannot be read, lacks the
/// `carrier` or `match_value` column, or there is no data row.
pub fn parse_rule_table(source_name: &str, text: &str) -> Result<Vec<Rule>, EtaError> {
    let load_error = |reason: String| EtaError::ConfigLoad {
        source_name: source_name.to_string(),
        reason,
    };

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| load_error(format!("unreadable header row: {e}")))?
        .clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(load_error("missing header row".to_string()));
    }
    let columns = Columns::resolve(&headers);
    for (name, index) in [("carrier", columns.carrier), ("match_value", columns.match_value)] {
        if index.is_none() {
            return Err(load_error(format!("missing required column {name:?}")));
        }
    }

    let mut rows = 0usize;
    let mut rules = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                tracing::debug!(source = %source_name, line, error = %e, "skipping unreadable rule row");
                rows += 1;
                continue;
            }
        };
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows += 1;
        let line = record.position().map_or(0, |p| p.line());

        match rule_from_record(&record, &columns) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                tracing::debug!(source = %source_name, line, error = %e, "dropping malformed rule row");
            }
        }
    }

    if rows == 0 {
        return Err(load_error(
            "rule table needs a header row and at least one data row".to_string(),
        ));
    }
    if rules.is_empty() {
        tracing::warn!(source = %source_name, rows, "every rule row was malformed; table is empty");
    }

    sort_rules(&mut rules);
    Ok(rules)
}

fn rule_from_record(record: &StringRecord, columns: &Columns) -> Result<Rule, RuleRowError> {
    let field = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");

    let priority = numeric(field(columns.priority), "priority", DEFAULT_PRIORITY);
    let days = |index, column| numeric(field(index), column, 0u32);

    Ok(Rule::new(
        field(columns.carrier),
        priority,
        MatchType::parse(field(columns.match_type)),
        field(columns.match_value),
        days(columns.eta_min, "eta_min_business_days"),
        days(columns.eta_max, "eta_max_business_days"),
    )?
    .with_label(field(columns.eta_label))
    .with_note(field(columns.note)))
}

/// Integer cell value, or `default` when blank or not an integer in range.
fn numeric<T: std::str::FromStr>(text: &str, column: &'static str, default: T) -> T {
    let text = text.trim();
    match text.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            if !text.is_empty() {
                tracing::debug!(column, value = text, "non-integer rule field replaced by default");
            }
            default
        }
    }
}

/// Carrier (case-insensitive), then priority ascending. `sort_by` is
/// stable, so equal keys keep their input order.
fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by(|a, b| {
        a.carrier()
            .to_lowercase()
            .cmp(&b.carrier().to_lowercase())
            .then(a.priority().cmp(&b.priority()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "carrier,priority,match_type,match_value,eta_min_business_days,eta_max_business_days,eta_label,note";

    #[test]
    fn parses_all_columns() {
        let csv = format!("{HEADER}\npostnord,5,equals,Levererad,0,0,Levererad,Klart\n");
        let rules = parse_rule_table("test", &csv).unwrap();
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.carrier(), "postnord");
        assert_eq!(rule.priority(), 5);
        assert_eq!(rule.match_type(), &MatchType::Equals);
        assert_eq!(rule.eta_label(), Some("Levererad"));
        assert_eq!(rule.note(), Some("Klart"));
    }

    #[test]
    fn swedish_column_aliases() {
        let csv = "carrier,priority,match_type,match_value,eta_min_business_days,eta_max_business_days,eta_label_sv,note_sv\n\
                   citymail,1,contains,sorterad,1,2,1–2 dagar,Sorterad\n";
        let rules = parse_rule_table("test", csv).unwrap();
        assert_eq!(rules[0].eta_label(), Some("1–2 dagar"));
        assert_eq!(rules[0].note(), Some("Sorterad"));
    }

    #[test]
    fn bom_and_crlf_are_tolerated() {
        let csv = format!("\u{feff}{HEADER}\r\npostnord,1,contains,transit,1,3,,\r\n");
        let rules = parse_rule_table("test", &csv).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].carrier(), "postnord");
    }

    #[test]
    fn header_only_is_a_load_error() {
        let err = parse_rule_table("test", HEADER).unwrap_err();
        assert!(matches!(err, EtaError::ConfigLoad { .. }));
    }

    #[test]
    fn empty_text_is_a_load_error() {
        assert!(parse_rule_table("test", "").is_err());
        assert!(parse_rule_table("test", "\n\n").is_err());
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let csv = "carrier,priority,eta_min_business_days\npostnord,1,2\n";
        let err = parse_rule_table("test", csv).unwrap_err();
        assert!(err.to_string().contains("match_value"));
    }

    #[test]
    fn malformed_rows_are_dropped() {
        let csv = format!(
            "{HEADER}\n,1,contains,transit,1,2,,\npostnord,1,contains,,1,2,,\npostnord,2,contains,transit,1,2,,\n"
        );
        let rules = parse_rule_table("test", &csv).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].priority(), 2);
    }

    #[test]
    fn non_numeric_fields_get_defaults() {
        let csv = format!("{HEADER}\npostnord,soon,contains,transit,x,,,\n");
        let rules = parse_rule_table("test", &csv).unwrap();
        assert_eq!(rules[0].priority(), DEFAULT_PRIORITY);
        assert_eq!(rules[0].eta_min_business_days(), 0);
        assert_eq!(rules[0].eta_max_business_days(), 0);
    }

    #[test]
    fn fractional_and_negative_numbers_get_defaults() {
        let csv = format!(
            "{HEADER}\npostnord,1.5,contains,transit,-1,2.0,,\npostnord, 7 ,contains,sorterad, 1 ,3,,\n"
        );
        let rules = parse_rule_table("test", &csv).unwrap();
        assert_eq!(rules[0].priority(), 7);
        assert_eq!(rules[0].eta_min_business_days(), 1);
        assert_eq!(rules[0].eta_max_business_days(), 3);
        assert_eq!(rules[1].priority(), DEFAULT_PRIORITY);
        assert_eq!(rules[1].eta_min_business_days(), 0);
        assert_eq!(rules[1].eta_max_business_days(), 0);
    }

    #[test]
    fn short_rows_are_padded() {
        let csv = format!("{HEADER}\npostnord,1,contains,transit\n");
        let rules = parse_rule_table("test", &csv).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].eta_label(), None);
    }

    #[test]
    fn comment_lines_are_ignored() {
        let csv = format!("{HEADER}\n# first match wins\npostnord,1,contains,transit,1,2,,\n");
        assert_eq!(parse_rule_table("test", &csv).unwrap().len(), 1);
    }

    #[test]
    fn sorted_by_carrier_then_priority() {
        let csv = format!(
            "{HEADER}\npostnord,2,contains,b,1,2,,\ncitymail,5,contains,c,1,2,,\npostnord,1,contains,a,1,2,,\n"
        );
        let rules = parse_rule_table("test", &csv).unwrap();
        let order: Vec<_> = rules.iter().map(|r| (r.carrier(), r.priority())).collect();
        assert_eq!(order, vec![("citymail", 5), ("postnord", 1), ("postnord", 2)]);
    }

    #[test]
    fn store_caches_first_load() {
        let csv = format!("{HEADER}\npostnord,1,contains,transit,1,2,,\n");
        let store = RuleStore::new(InlineRuleSource::new("inline", csv));
        assert!(!store.is_loaded());
        let first = store.rules().unwrap();
        let second = store.rules().unwrap();
        assert!(store.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn store_reports_missing_file() {
        let store = RuleStore::new(FileRuleSource::new("/nonexistent/eta-rules.csv"));
        let err = store.rules().unwrap_err();
        match err {
            EtaError::ConfigLoad { source_name, .. } => {
                assert_eq!(source_name, "/nonexistent/eta-rules.csv")
            }
        }
        assert!(!store.is_loaded());
    }

    #[test]
    fn preloaded_store_sorts_rules() {
        let store = RuleStore::from_rules(vec![
            Rule::new("postnord", 9, MatchType::Contains, "b", 1, 2).unwrap(),
            Rule::new("postnord", 1, MatchType::Contains, "a", 1, 2).unwrap(),
        ]);
        let rules = store.rules().unwrap();
        assert_eq!(rules[0].match_value(), "a");
    }
}
