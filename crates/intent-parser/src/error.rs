use thiserror::Error;

pub type Result<T, E = ModelError> = core::result::Result<T, E>;

/// Failures loading the language model. None of these are recoverable: without
/// a model no phrase can be interpreted.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing lexicon {path}: {message}")]
    Lexicon { path: String, message: String },
    #[error("tokenizer pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("verb '{lemma}' has an empty embedding")]
    EmptyEmbedding { lemma: String },
}
