//! Phrase normalization, lexical extraction and the per-phrase result

use crate::actions::Instruction;
use crate::model::{LanguageModel, PosTag, Token};
use serde::{Deserialize, Serialize};

/// Lowercase and collapse runs of whitespace.
pub fn normalize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Typed token groups pulled out of one phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Lemmas of verb tokens, in phrase order.
    pub verbs: Vec<String>,
    /// Surface text of tokens that may name a target, in phrase order.
    pub entities: Vec<String>,
}

impl Extraction {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut out = Self::default();
        for token in tokens {
            if token.pos == PosTag::Verb {
                out.verbs.push(token.lemma.clone());
            }
            if is_entity_candidate(token) {
                out.entities.push(token.text.clone());
            }
        }
        out
    }
}

fn is_entity_candidate(token: &Token) -> bool {
    token.entity.is_some()
        || matches!(token.pos, PosTag::ProperNoun | PosTag::Noun)
        || token.dep.is_some()
}

/// Extract verbs and entity candidates from a phrase.
pub fn extract(model: &dyn LanguageModel, phrase: &str) -> Extraction {
    let phrase = normalize(phrase);
    if phrase.is_empty() {
        return Extraction::default();
    }
    Extraction::from_tokens(&model.analyze(&phrase))
}

/// Everything the pipeline learned about one phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    pub instruction: Option<Instruction>,
    /// Position names in match order; never empty when present.
    pub position_candidates: Option<Vec<String>>,
    /// Mission names in match order; never empty when present.
    pub mission_candidates: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DepRole, EntityKind};

    struct FixedModel(Vec<Token>);

    impl LanguageModel for FixedModel {
        fn analyze(&self, _text: &str) -> Vec<Token> {
            self.0.clone()
        }

        fn similarity(&self, _a: &str, _b: &str) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  MoVe   to the\tposition A "), "move to the position a");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_extract_groups() {
        let model = FixedModel(vec![
            Token::new("moving", "move", PosTag::Verb),
            Token::new("to", "to", PosTag::Adposition),
            Token::new("berlin", "berlin", PosTag::Other).with_entity(EntityKind::GeoPolitical),
            Token::new("dock", "dock", PosTag::Noun),
            Token::new("pos1", "pos1", PosTag::ProperNoun),
            Token::new("ready", "ready", PosTag::Adjective).with_dep(DepRole::AdjectivalComplement),
            Token::new("quickly", "quickly", PosTag::Adverb),
        ]);
        let out = extract(&model, "whatever");
        assert_eq!(out.verbs, vec!["move".to_string()]);
        assert_eq!(
            out.entities,
            vec![
                "berlin".to_string(),
                "dock".to_string(),
                "pos1".to_string(),
                "ready".to_string()
            ]
        );
    }

    #[test]
    fn test_entity_counted_once() {
        let model = FixedModel(vec![
            Token::new("lab", "lab", PosTag::ProperNoun).with_entity(EntityKind::Location)
        ]);
        assert_eq!(extract(&model, "lab").entities, vec!["lab".to_string()]);
    }

    #[test]
    fn test_empty_phrase() {
        let model = FixedModel(vec![Token::new("go", "go", PosTag::Verb)]);
        let out = extract(&model, "  ");
        assert!(out.verbs.is_empty());
        assert!(out.entities.is_empty());
    }
}
