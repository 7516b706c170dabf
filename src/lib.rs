// topictag: text normalization and topic packaging for microloan and
// journal corpora
//
// This is the library root. Each module corresponds to one stage between a
// raw tab-separated corpus and the per-document topic artifact.

pub mod config;
pub mod estimator;
pub mod ingest;
pub mod langid;
pub mod normalize;
pub mod output;
pub mod packager;
pub mod pipeline;
