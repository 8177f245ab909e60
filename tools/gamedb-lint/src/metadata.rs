//! Metadata document checks (`game.dat` and save `.dat` files).
//!
//! Documents are TOML. A document that fails to parse yields exactly one
//! error and no field checks. Otherwise every field is checked and every
//! violation is recorded; one bad field never hides another.
//!
//! ```toml
//! title = "Example Quest"
//! description = "A game."
//! github_issues = [1234]
//! needs_system_files = false
//! needs_shared_font = true
//!
//! [[releases]]
//! title = "0004000000012345"
//! region = "USA"
//! release_date = "2015-02-13"
//!
//! [[testcases]]
//! compatibility = "2"
//! date = "2018-06-01"
//! version = "HEAD-1a2b3c4"
//! author = "tester"
//! ```

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use toml::{Table, Value};

use crate::findings::GameRecorder;
use crate::fs;

/// Length of a release/save title identifier.
pub const TITLE_ID_LEN: usize = 16;
/// Length of a test case build version.
pub const VERSION_LEN: usize = 12;
/// Every test case build version starts with this.
pub const VERSION_PREFIX: &str = "HEAD-";
/// Below this minimum compatibility the resource flags become mandatory.
pub const COMPATIBILITY_THRESHOLD: i64 = 5;

/// `YYYY-MM-DD` with month 01-12 and day 01-31. Not calendar-aware.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap()
});

static ALPHANUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap());

/// A document that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// 1-based line of the error, when the parser reports a position
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "parse error at line {}: {}", line, self.message),
            None => write!(f, "parse error: {}", self.message),
        }
    }
}

/// Decode a metadata document.
pub fn parse_document(bytes: &[u8]) -> Result<Table, ParseFailure> {
    let content = std::str::from_utf8(bytes).map_err(|e| ParseFailure {
        line: None,
        message: format!("not valid UTF-8 ({e})"),
    })?;

    toml::from_str::<Table>(content).map_err(|e| ParseFailure {
        line: e.span().map(|span| line_at(content, span)),
        message: e.message().trim().to_string(),
    })
}

fn line_at(content: &str, span: Range<usize>) -> usize {
    let end = span.start.min(content.len());
    content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Check a parsed `game.dat`. Returns one message per violation.
pub fn check_game_document(doc: &Table, regions: &[String]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut fields = FieldChecker::new(doc, &mut issues);

    fields.non_empty_string("title");
    fields.non_empty_string("description");
    fields.optional_integer_list("github_issues");

    check_releases(&mut fields, regions);
    let min_compatibility = check_testcases(&mut fields);

    if min_compatibility.is_some_and(|min| min < COMPATIBILITY_THRESHOLD) {
        fields.boolean("needs_system_files");
        fields.boolean("needs_shared_font");
    }

    issues
}

/// Check a parsed save `.dat`. Returns one message per violation.
pub fn check_save_document(doc: &Table) -> Vec<String> {
    let mut issues = Vec::new();
    let mut fields = FieldChecker::new(doc, &mut issues);

    fields.non_empty_string("title");
    fields.non_empty_string("description");
    fields.non_empty_string("author");
    fields.title_id("title_id");

    issues
}

fn check_releases(fields: &mut FieldChecker<'_>, regions: &[String]) {
    let Some(releases) = fields.section("releases") else {
        return;
    };

    for (i, release) in releases.iter().enumerate() {
        let Some(table) = fields.entry_table("releases", i, release) else {
            continue;
        };
        let mut release = fields.nested(table, format!("releases[{i}]."));
        release.title_id("title");
        release.region("region", regions);
        release.date("release_date");
    }
}

/// Returns the lowest parsed compatibility value, if any.
fn check_testcases(fields: &mut FieldChecker<'_>) -> Option<i64> {
    let testcases = fields.section("testcases")?;
    let mut min: Option<i64> = None;

    for (i, testcase) in testcases.iter().enumerate() {
        let Some(table) = fields.entry_table("testcases", i, testcase) else {
            continue;
        };
        let mut testcase = fields.nested(table, format!("testcases[{i}]."));

        if let Some(raw) = testcase.non_empty_string("compatibility") {
            match raw.trim().parse::<i64>() {
                Ok(value) => min = Some(min.map_or(value, |m| m.min(value))),
                Err(_) => {
                    let name = testcase.name("compatibility");
                    testcase.report(format!("'{name}' must be an integer, found '{raw}'"));
                }
            }
        }
        testcase.date("date");
        testcase.version("version");
        testcase.non_empty_string("author");
    }

    min
}

/// Field checks over one table, appending messages to a shared list.
///
/// Every check is built from two primitives: the field must exist, and an
/// existing field must satisfy a predicate.
struct FieldChecker<'a> {
    table: &'a Table,
    prefix: String,
    issues: &'a mut Vec<String>,
}

impl<'a> FieldChecker<'a> {
    fn new(table: &'a Table, issues: &'a mut Vec<String>) -> Self {
        Self {
            table,
            prefix: String::new(),
            issues,
        }
    }

    /// Checker for a nested table sharing this checker's issue list.
    fn nested<'b>(&'b mut self, table: &'b Table, prefix: String) -> FieldChecker<'b> {
        FieldChecker {
            table,
            prefix,
            issues: &mut *self.issues,
        }
    }

    fn name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn report(&mut self, message: String) {
        self.issues.push(message);
    }

    fn require(&mut self, key: &str) -> Option<&'a Value> {
        let value = self.table.get(key);
        if value.is_none() {
            let name = self.name(key);
            self.report(format!("missing field '{name}'"));
        }
        value
    }

    fn string(&mut self, key: &str) -> Option<&'a str> {
        let value = self.require(key)?;
        let text = value.as_str();
        if text.is_none() {
            let name = self.name(key);
            self.report(format!("'{name}' must be a string"));
        }
        text
    }

    fn non_empty_string(&mut self, key: &str) -> Option<&'a str> {
        let text = self.string(key)?;
        if text.is_empty() {
            let name = self.name(key);
            self.report(format!("'{name}' must not be empty"));
            return None;
        }
        Some(text)
    }

    /// Must be a literal `true` or `false`.
    fn boolean(&mut self, key: &str) {
        if let Some(value) = self.require(key) {
            if !value.is_bool() {
                let name = self.name(key);
                self.report(format!("'{name}' must be true or false"));
            }
        }
    }

    fn date(&mut self, key: &str) {
        if let Some(text) = self.string(key) {
            if !DATE_RE.is_match(text) {
                let name = self.name(key);
                self.report(format!("'{name}' must be a YYYY-MM-DD date, found '{text}'"));
            }
        }
    }

    /// Length and character set are checked separately; both can fire.
    fn title_id(&mut self, key: &str) {
        let Some(text) = self.string(key) else {
            return;
        };
        let name = self.name(key);
        let len = text.chars().count();
        if len != TITLE_ID_LEN {
            self.report(format!(
                "'{name}' must be {TITLE_ID_LEN} characters, found {len}"
            ));
        }
        if !ALPHANUMERIC_RE.is_match(text) {
            self.report(format!("'{name}' must be alphanumeric, found '{text}'"));
        }
    }

    fn version(&mut self, key: &str) {
        let Some(text) = self.string(key) else {
            return;
        };
        let name = self.name(key);
        let len = text.chars().count();
        if len != VERSION_LEN {
            self.report(format!(
                "'{name}' must be {VERSION_LEN} characters, found {len}"
            ));
        }
        if !text.starts_with(VERSION_PREFIX) {
            self.report(format!(
                "'{name}' must start with '{VERSION_PREFIX}', found '{text}'"
            ));
        }
    }

    fn region(&mut self, key: &str, regions: &[String]) {
        if let Some(text) = self.string(key) {
            if !regions.iter().any(|region| region == text) {
                let name = self.name(key);
                self.report(format!("'{name}' has invalid region '{text}'"));
            }
        }
    }

    /// Optional list whose elements must all be integers.
    fn optional_integer_list(&mut self, key: &str) {
        let Some(value) = self.table.get(key) else {
            return;
        };
        let name = self.name(key);
        let Some(items) = value.as_array() else {
            self.report(format!("'{name}' must be a list"));
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if !item.is_integer() {
                self.report(format!("'{name}[{i}]' must be an integer"));
            }
        }
    }

    /// Required list-of-tables section; absence is reported as "no <key>".
    fn section(&mut self, key: &str) -> Option<&'a Vec<Value>> {
        let Some(value) = self.table.get(key) else {
            self.report(format!("no {key}"));
            return None;
        };
        let items = value.as_array();
        if items.is_none() {
            let name = self.name(key);
            self.report(format!("'{name}' must be a list"));
        }
        items
    }

    fn entry_table(&mut self, key: &str, index: usize, entry: &'a Value) -> Option<&'a Table> {
        let table = entry.as_table();
        if table.is_none() {
            self.report(format!("'{key}[{index}]' must be a table"));
        }
        table
    }
}

/// Validate a game's metadata document, recording every problem.
pub fn validate_game_document(
    path: &Path,
    label: &str,
    regions: &[String],
    rec: &mut GameRecorder<'_>,
) -> Result<()> {
    if let Some(doc) = load_document(path, label, rec)? {
        for issue in check_game_document(&doc, regions) {
            rec.record(format!("{label}: {issue}"));
        }
    }
    Ok(())
}

/// Validate a save bundle's metadata document, recording every problem.
pub fn validate_save_document(path: &Path, label: &str, rec: &mut GameRecorder<'_>) -> Result<()> {
    if let Some(doc) = load_document(path, label, rec)? {
        for issue in check_save_document(&doc) {
            rec.record(format!("{label}: {issue}"));
        }
    }
    Ok(())
}

/// Read and parse a document. Missing or unparseable documents are recorded
/// and yield `None`.
fn load_document(path: &Path, label: &str, rec: &mut GameRecorder<'_>) -> Result<Option<Table>> {
    if !path.exists() {
        rec.record(format!("{label}: file not found"));
        return Ok(None);
    }

    let bytes = fs::read_document(path, fs::MAX_DOCUMENT_BYTES)?;
    match parse_document(&bytes) {
        Ok(doc) => Ok(Some(doc)),
        Err(failure) => {
            tracing::debug!("{} in {}", failure, path.display());
            rec.record(format!("{label}: {failure}"));
            Ok(None)
        }
    }
}
