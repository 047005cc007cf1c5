//! Annotated tokens and the language model seam

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosTag {
    Verb,
    Aux,
    Noun,
    ProperNoun,
    Adjective,
    Adverb,
    Adposition,
    Determiner,
    Pronoun,
    Numeral,
    Particle,
    Conjunction,
    Interjection,
    Punctuation,
    Other,
}

/// Named-entity kinds that count as command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Location,
    Organization,
    GeoPolitical,
}

/// Dependency roles that count as command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepRole {
    AdjectivalComplement,
    RelativeClause,
}

/// A word of a phrase with its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text as it appears in the phrase.
    pub text: String,
    pub lemma: String,
    pub pos: PosTag,
    pub entity: Option<EntityKind>,
    pub dep: Option<DepRole>,
}

impl Token {
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, pos: PosTag) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
            entity: None,
            dep: None,
        }
    }

    pub fn with_entity(mut self, kind: EntityKind) -> Self {
        self.entity = Some(kind);
        self
    }

    pub fn with_dep(mut self, role: DepRole) -> Self {
        self.dep = Some(role);
        self
    }
}

/// Tagging and semantic similarity over natural-language text.
pub trait LanguageModel: Send + Sync {
    /// Tokenize and annotate a phrase.
    fn analyze(&self, text: &str) -> Vec<Token>;

    /// Semantic closeness of two words in `[0, 1]`.
    fn similarity(&self, a: &str, b: &str) -> f32;

    /// Short description for logs.
    fn name(&self) -> &str {
        "language-model"
    }
}
