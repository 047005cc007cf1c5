//! Intent Parser for Voice Commands
//!
//! This crate turns free-form robot commands ("move to the position A") into
//! one of a small set of robot actions. A phrase is tagged by a language model,
//! its verbs are matched to an instruction by semantic similarity, its nouns are
//! fuzzy-matched against the robot's position and mission catalogs, and the
//! resulting intent is dispatched through a [`robot_client::RobotClient`].

mod actions;
mod classifier;
mod disambiguate;
mod entities;
mod error;
mod fuzzy;
mod lexicon;
mod model;
mod parser;
mod router;

pub use actions::{DispatchOutcome, Instruction, InstructionVocabulary, VocabularyTerm};
pub use classifier::{InstructionClassifier, SynonymHit};
pub use disambiguate::{ConsoleOperator, Disambiguator, OperatorIo, ScriptedOperator};
pub use entities::EntityResolver;
pub use error::{ModelError, Result};
pub use fuzzy::{FuzzyMatcher, WeightedRatio};
pub use lexicon::{LexiconModel, EMBEDDING_DIMS};
pub use model::{DepRole, EntityKind, LanguageModel, PosTag, Token};
pub use parser::{extract, normalize, Extraction, IntentResult};
pub use router::{IntentRouter, Resolution};

use robot_client::RobotClient;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for intent parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// A verb must score above this against the vocabulary to count (0-1)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// An entity must score above this against a catalog name to count (0-100)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,
    /// Instructions and the surface words that stand for them
    #[serde(default)]
    pub vocabulary: InstructionVocabulary,
    /// Optional YAML file with extra verbs and places
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

fn default_similarity_threshold() -> f32 {
    0.6
}

fn default_fuzzy_threshold() -> f32 {
    70.0
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            fuzzy_threshold: default_fuzzy_threshold(),
            vocabulary: InstructionVocabulary::default(),
            lexicon_path: None,
        }
    }
}

/// Load the language model a configuration asks for.
pub fn load_model(config: &IntentConfig) -> Result<Arc<dyn LanguageModel>> {
    tracing::info!("Loading language model");
    let model = LexiconModel::load(config.lexicon_path.as_deref())?;
    Ok(Arc::new(model))
}

/// Create a router over `client` with a freshly loaded model.
pub fn create_router<C: RobotClient>(config: &IntentConfig, client: C) -> Result<IntentRouter<C>> {
    let model = load_model(config)?;
    Ok(IntentRouter::new(config, model, client))
}
