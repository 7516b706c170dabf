// Topic estimation: the external PLSA programs behind a trait, plus the
// stop list they read.

pub mod plsa;
pub mod stoplist;
pub mod traits;
