// Language identification: tags each record with a language code so only
// one language goes on to topic modeling.

pub mod stopwords;
pub mod traits;
