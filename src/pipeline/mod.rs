// Pipeline stages that tie the engine modules together.

pub mod normalize;
pub mod run;
