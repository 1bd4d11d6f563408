//! Bulk import of records from a `key: value` text file.
//!
//! ## File format
//!
//! ```text
//! TableName: Books
//! Id: 1
//! Title: Emma
//!
//! TableName: Authors
//! Id: 1
//! Name: Jane Austen
//! DateOfBirth: 1775-12-16 00:00:00
//! ```
//!
//! Blocks are separated by one or more blank lines and must start with
//! `TableName`. Only the first colon on a line separates key from value, so
//! values may contain colons. Bad lines are reported with their line number
//! and skipped; the rest of the block and later blocks still load.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::builder::{build, AttributeSet};
use crate::catalog::{Catalog, EntityDescriptor};
use crate::error::DbmsError;
use crate::session::SessionFactory;
use crate::value::coerce;

/// Reserved key declaring the table of the current block
pub const TABLE_NAME_KEY: &str = "TableName";

/// Written at the start of UTF-8 files by some Windows editors
const BYTE_ORDER_MARK: char = '\u{feff}';

/// One parsed block, ready to build
#[derive(Debug, Clone)]
pub struct ImportEntry {
    pub descriptor: &'static EntityDescriptor,
    /// Line of the `TableName` declaration
    pub line: usize,
    pub attributes: AttributeSet,
}

impl ImportEntry {
    pub fn table_name(&self) -> &'static str {
        self.descriptor.table_name
    }
}

/// Ordered entries extracted from an import file
pub type ImportBatch = Vec<ImportEntry>;

/// A problem attributed to one line of the import file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportIssue {
    pub line: usize,
    pub error: DbmsError,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Result of parsing: the usable batch plus everything that was skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub batch: ImportBatch,
    pub issues: Vec<ImportIssue>,
    /// Non-blank lines that contributed nothing to the batch
    pub skipped_lines: usize,
}

enum Block {
    /// Between blocks
    Idle,
    Active(ImportEntry),
    /// Rest of a block whose table could not be resolved
    Skipping,
}

/// Parse import lines against `catalog`.
///
/// Values are coerced while parsing, so type errors are attributed to the
/// exact line they occur on.
pub fn parse<I, S>(lines: I, catalog: &Catalog) -> ParsedImport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedImport::default();
    let mut block = Block::Idle;

    for (index, raw) in lines.into_iter().enumerate() {
        let line = index + 1;
        let mut text = raw.as_ref();
        if index == 0 {
            text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        }
        let text = text.trim();

        if text.is_empty() {
            if let Block::Active(entry) = std::mem::replace(&mut block, Block::Idle) {
                parsed.batch.push(entry);
            }
            continue;
        }

        let Some((key, value)) = text.split_once(':') else {
            parsed.skip(line, DbmsError::MalformedLine {
                line,
                reason: format!("expected 'key: value', got '{}'", text),
            });
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        block = match std::mem::replace(&mut block, Block::Idle) {
            Block::Idle if key == TABLE_NAME_KEY => match catalog.describe(value) {
                Ok(descriptor) => Block::Active(ImportEntry {
                    descriptor,
                    line,
                    attributes: AttributeSet::new(),
                }),
                Err(err) => {
                    parsed.skip(line, err);
                    Block::Skipping
                }
            },
            Block::Idle => {
                parsed.skip(line, DbmsError::MissingTableDeclaration { line });
                Block::Skipping
            }
            Block::Skipping => {
                parsed.skipped_lines += 1;
                Block::Skipping
            }
            Block::Active(entry) if key == TABLE_NAME_KEY => {
                parsed.skip(line, DbmsError::MalformedLine {
                    line,
                    reason: format!("{} declared twice in one block", TABLE_NAME_KEY),
                });
                Block::Active(entry)
            }
            Block::Active(mut entry) => {
                if let Err(err) = add_attribute(&mut entry, key, value, line) {
                    parsed.skip(line, err);
                }
                Block::Active(entry)
            }
        };
    }

    if let Block::Active(entry) = block {
        parsed.batch.push(entry);
    }

    tracing::debug!(
        entries = parsed.batch.len(),
        issues = parsed.issues.len(),
        "Parsed import file"
    );
    parsed
}

impl ParsedImport {
    fn skip(&mut self, line: usize, error: DbmsError) {
        tracing::warn!(line, error = %error, "Skipping import line");
        self.skipped_lines += 1;
        self.issues.push(ImportIssue { line, error });
    }
}

fn add_attribute(entry: &mut ImportEntry, key: &str, value: &str, line: usize) -> Result<(), DbmsError> {
    let field = entry
        .descriptor
        .persisted_field(key)
        .ok_or_else(|| DbmsError::missing_target(entry.table_name(), key))?;

    if entry.attributes.contains_key(field.name) {
        return Err(DbmsError::MalformedLine {
            line,
            reason: format!("{} given twice in one block", field.name),
        });
    }

    let coerced = coerce(value, field.value_type)?;
    entry.attributes.insert(field.name.to_string(), coerced);
    Ok(())
}

/// Read an import file into lines.
pub fn read_import_file(path: impl AsRef<Path>) -> Result<Vec<String>, DbmsError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| DbmsError::ImportFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(contents.lines().map(str::to_string).collect())
}

/// What happened to one batch entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOutcome {
    pub table: &'static str,
    pub line: usize,
    pub result: Result<(), DbmsError>,
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(
                f,
                "Record at line {} successfully inserted into {}",
                self.line, self.table
            ),
            Err(err) => write!(
                f,
                "Record at line {} for {} not inserted: {}",
                self.line, self.table, err
            ),
        }
    }
}

/// Per-batch counts plus per-entry outcomes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub outcomes: Vec<EntryOutcome>,
    pub skipped_lines: usize,
}

impl ImportSummary {
    pub fn inserted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.inserted()
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Import finished: {} inserted, {} failed, {} lines skipped",
            self.inserted(),
            self.failed(),
            self.skipped_lines
        )
    }
}

/// Build and persist every entry, each in its own session.
///
/// A failed build or commit is recorded against its entry and the remaining
/// entries still run.
pub fn import_batch(stores: &dyn SessionFactory, parsed: &ParsedImport) -> ImportSummary {
    let outcomes = parsed
        .batch
        .iter()
        .map(|entry| {
            let result = insert_entry(stores, entry);
            match &result {
                Ok(()) => tracing::info!(table = entry.table_name(), line = entry.line, "Imported record"),
                Err(err) => tracing::warn!(
                    table = entry.table_name(),
                    line = entry.line,
                    error = %err,
                    "Import of record failed"
                ),
            }
            EntryOutcome {
                table: entry.table_name(),
                line: entry.line,
                result,
            }
        })
        .collect();

    ImportSummary {
        outcomes,
        skipped_lines: parsed.skipped_lines,
    }
}

fn insert_entry(stores: &dyn SessionFactory, entry: &ImportEntry) -> Result<(), DbmsError> {
    let record = build(entry.descriptor, &entry.attributes)?;
    let mut session = stores.open()?;
    session.add(record);
    session.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::models;
    use crate::value::FieldValue;

    fn parse_text(text: &str) -> ParsedImport {
        let catalog = models::catalog().unwrap();
        parse(text.lines(), &catalog)
    }

    #[test]
    fn test_two_blocks_same_table() {
        let parsed = parse_text("TableName: Books\nId: 1\nTitle: Emma\n\nTableName: Books\nId: 2\nTitle: Persuasion\n");

        assert_eq!(parsed.batch.len(), 2);
        assert!(parsed.batch.iter().all(|e| e.table_name() == "Books"));
        assert_eq!(parsed.batch[1].attributes["Title"], FieldValue::Text("Persuasion".into()));
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn test_block_without_table_declaration() {
        let parsed = parse_text("Id: 1\nTitle: Emma\n\nTableName: Books\nId: 2\n");

        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].error, DbmsError::MissingTableDeclaration { line: 1 });
        assert_eq!(parsed.skipped_lines, 2);
        assert_eq!(parsed.batch.len(), 1);
        assert_eq!(parsed.batch[0].line, 4);
    }

    #[test]
    fn test_unknown_field_skipped_rest_kept() {
        let parsed = parse_text("TableName: Books\nId: 1\nPages: 300\nTitle: Emma\n");

        assert_eq!(parsed.batch.len(), 1);
        let attributes = &parsed.batch[0].attributes;
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["Title"], FieldValue::Text("Emma".into()));

        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].line, 3);
        assert!(matches!(parsed.issues[0].error, DbmsError::MissingTarget { .. }));
    }

    #[test]
    fn test_unknown_table_skips_block_only() {
        let parsed = parse_text("TableName: Publishers\nId: 1\n\nTableName: Books\nId: 2\n");

        assert_eq!(parsed.batch.len(), 1);
        assert_eq!(parsed.issues.len(), 1);
        assert!(matches!(parsed.issues[0].error, DbmsError::NotFound { .. }));
    }

    #[test]
    fn test_bad_value_and_malformed_line_reported_by_line() {
        let parsed = parse_text("TableName: Books\nId: one\nno separator here\nTitle: Emma\n");

        let lines: Vec<usize> = parsed.issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![2, 3]);
        assert!(matches!(parsed.issues[0].error, DbmsError::TypeMismatch { .. }));
        assert!(matches!(parsed.issues[1].error, DbmsError::MalformedLine { .. }));
        assert_eq!(parsed.batch[0].attributes.len(), 1);
    }

    #[test]
    fn test_values_may_contain_colons_and_blank_runs_separate() {
        let parsed = parse_text(
            "TableName: Authors\nId: 1\nDateOfBirth: 1775-12-16 10:30:00\n\n\n   \nTableName: Books\nTitle: Notes: Vol 1\n",
        );

        assert_eq!(parsed.batch.len(), 2);
        assert_eq!(
            parsed.batch[0].attributes["DateOfBirth"].to_string(),
            "1775-12-16 10:30:00"
        );
        assert_eq!(
            parsed.batch[1].attributes["Title"],
            FieldValue::Text("Notes: Vol 1".into())
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let parsed = parse_text("TableName: Books\nTableName: Authors\nId: 1\nId: 2\n");

        assert_eq!(parsed.batch.len(), 1);
        assert_eq!(parsed.batch[0].table_name(), "Books");
        assert_eq!(parsed.batch[0].attributes["Id"], FieldValue::Integer(1));
        assert_eq!(parsed.issues.len(), 2);
    }

    #[test]
    fn test_import_batch_counts_successes() {
        let catalog = models::catalog().unwrap();
        let store = MemoryStore::new(&catalog);
        let parsed = parse(
            "TableName: Books\nId: 1\n\nTableName: Authors\nId: 1\nName: Jane\nOops\n".lines(),
            &catalog,
        );

        let summary = import_batch(&store, &parsed);

        assert_eq!(summary.inserted(), 2);
        assert_eq!(summary.failed(), 0);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(store.count("Books"), 1);
        assert_eq!(store.count("Authors"), 1);
        assert_eq!(
            summary.to_string(),
            "Import finished: 2 inserted, 0 failed, 1 lines skipped"
        );
    }

    #[test]
    fn test_leading_byte_order_mark_ignored() {
        let parsed = parse_text("\u{feff}TableName: Books\nId: 1\nTitle: Emma\n");

        assert!(parsed.issues.is_empty());
        assert_eq!(parsed.batch.len(), 1);
        assert_eq!(parsed.batch[0].attributes["Title"], FieldValue::Text("Emma".into()));
    }

    #[test]
    fn test_read_file_with_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        fs::write(&path, "\u{feff}TableName: Authors\r\nId: 2\r\nName: Mary Shelley\r\n").unwrap();

        let catalog = models::catalog().unwrap();
        let parsed = parse(read_import_file(&path).unwrap(), &catalog);

        assert!(parsed.issues.is_empty());
        assert_eq!(parsed.batch[0].table_name(), "Authors");
        assert_eq!(parsed.batch[0].attributes["Id"], FieldValue::Integer(2));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_import_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, DbmsError::ImportFile { .. }));
    }
}
