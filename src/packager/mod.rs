// Topic packager: merges the estimator's outputs with document ids into
// one JSON artifact per corpus and topic count.

pub mod artifact;
pub mod batch;
pub mod readers;
