// Tab-delimited record schemas.
//
// Each export format puts the id and message in different columns. A line
// with too few columns is rejected rather than partially filled.

use std::fmt;

use clap::ValueEnum;

use super::record::DocumentRecord;

/// Column layout of the raw input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecordSchema {
    /// `id <TAB> msg`
    #[default]
    Simple,
    /// Journal entries: id, subject, msg, author, image ids, counters, date
    Journal,
    /// Loan descriptions: id in column 0, date in 15, message in 17
    Loan,
}

/// Journal columns after `id`, in file order.
const JOURNAL_COLUMNS: [&str; 8] = [
    "subject",
    "msg",
    "author",
    "image_id",
    "image_template_id",
    "comment_count",
    "recommendation_count",
    "date",
];

const LOAN_DATE_COLUMN: usize = 15;
const LOAN_MSG_COLUMN: usize = 17;

/// A line that did not have enough columns for its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub schema: RecordSchema,
    pub fields: usize,
    pub required: usize,
}

impl fmt::Display for RejectedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} record needs {} tab-separated fields, found {}",
            self.schema, self.required, self.fields
        )
    }
}

impl std::error::Error for RejectedLine {}

impl RecordSchema {
    /// Minimum number of tab-separated fields a line must have.
    pub fn required_fields(self) -> usize {
        match self {
            RecordSchema::Simple => 2,
            RecordSchema::Journal => JOURNAL_COLUMNS.len() + 1,
            RecordSchema::Loan => LOAN_MSG_COLUMN + 1,
        }
    }

    /// Parse one line (trailing whitespace already stripped).
    pub fn get_fields(self, line: &str) -> Result<DocumentRecord, RejectedLine> {
        let f: Vec<&str> = line.split('\t').collect();
        let required = self.required_fields();
        if f.len() < required {
            return Err(RejectedLine {
                schema: self,
                fields: f.len(),
                required,
            });
        }

        let record = match self {
            RecordSchema::Simple => DocumentRecord::new(f[0], f[1]),
            RecordSchema::Journal => {
                let mut record = DocumentRecord::new(f[0], f[2]);
                for (name, value) in JOURNAL_COLUMNS.iter().zip(&f[1..]) {
                    if *name != "msg" {
                        record.metadata.insert(name.to_string(), value.to_string());
                    }
                }
                record
            }
            RecordSchema::Loan => DocumentRecord::new(f[0], f[LOAN_MSG_COLUMN])
                .with_metadata("date", f[LOAN_DATE_COLUMN]),
        };
        Ok(record)
    }
}
