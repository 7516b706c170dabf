// Language identifier trait: swap-ready abstraction.
//
// The pipeline only needs a code per document. The default implementation
// counts stop-word hits; a statistical classifier can replace it without
// touching the rest of the run.

/// Code assigned when no language could be recognized.
pub const UNKNOWN_LANGUAGE: &str = "un";

/// Assigns a language code (e.g. "en", "fr") to a piece of text.
pub trait LanguageIdentifier {
    fn identify(&self, text: &str) -> String;
}
