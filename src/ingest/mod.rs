// Ingestion: raw tab-delimited lines to DocumentRecords.

pub mod reader;
pub mod record;
pub mod schema;
