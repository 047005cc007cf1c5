//! Verb-to-instruction matching by semantic similarity

use crate::actions::{Instruction, InstructionVocabulary};
use crate::model::LanguageModel;
use serde::Serialize;
use std::sync::Arc;

/// A verb found similar to a reference word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynonymHit {
    pub word: String,
    /// Similarity rounded to two decimals.
    pub similarity: f32,
}

pub struct InstructionClassifier {
    model: Arc<dyn LanguageModel>,
    vocabulary: InstructionVocabulary,
    threshold: f32,
}

impl InstructionClassifier {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        vocabulary: InstructionVocabulary,
        threshold: f32,
    ) -> Self {
        Self {
            model,
            vocabulary,
            threshold,
        }
    }

    pub fn vocabulary(&self) -> &InstructionVocabulary {
        &self.vocabulary
    }

    /// Map phrase verbs onto an instruction.
    ///
    /// Verbs are tried in phrase order and the first one whose best vocabulary
    /// score exceeds the threshold decides; later verbs are not scored.
    pub fn classify(&self, verbs: &[String]) -> Option<Instruction> {
        for verb in verbs {
            let Some((term, score)) = self.best_term(verb) else {
                continue;
            };
            if score > self.threshold {
                let instruction = self.vocabulary.normalize(term)?;
                tracing::debug!(
                    "verb '{}' ~ '{}' ({:.2}) -> {}",
                    verb,
                    term,
                    score,
                    instruction
                );
                return Some(instruction);
            }
            tracing::trace!("verb '{}' best '{}' ({:.2}) below threshold", verb, term, score);
        }
        None
    }

    /// Highest-scoring vocabulary term for a verb; earlier terms win ties.
    fn best_term(&self, verb: &str) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        for term in self.vocabulary.terms() {
            let score = self.model.similarity(verb, &term.surface);
            match best {
                Some((_, s)) if s >= score => {}
                _ => best = Some((term.surface.as_str(), score)),
            }
        }
        best
    }

    /// Every verb whose similarity to `word` exceeds the threshold, in phrase order.
    pub fn synonyms(&self, verbs: &[String], word: &str) -> Vec<SynonymHit> {
        verbs
            .iter()
            .filter_map(|verb| {
                let score = self.model.similarity(verb, word);
                (score > self.threshold).then(|| SynonymHit {
                    word: verb.clone(),
                    similarity: (score * 100.0).round() / 100.0,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Token;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Similarity looked up from a table; counts calls.
    struct TableModel {
        scores: HashMap<(String, String), f32>,
        calls: AtomicUsize,
    }

    impl TableModel {
        fn new(entries: &[(&str, &str, f32)]) -> Self {
            Self {
                scores: entries
                    .iter()
                    .map(|(a, b, s)| ((a.to_string(), b.to_string()), *s))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl LanguageModel for TableModel {
        fn analyze(&self, _text: &str) -> Vec<Token> {
            Vec::new()
        }

        fn similarity(&self, a: &str, b: &str) -> f32 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.scores
                .get(&(a.to_string(), b.to_string()))
                .copied()
                .unwrap_or(0.0)
        }
    }

    fn classifier(model: Arc<TableModel>) -> InstructionClassifier {
        InstructionClassifier::new(model, InstructionVocabulary::default(), 0.6)
    }

    fn verbs(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_verbs_skip_model() {
        let model = Arc::new(TableModel::new(&[]));
        let c = classifier(model.clone());
        assert_eq!(c.classify(&[]), None);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_qualifying_verb_wins() {
        let model = Arc::new(TableModel::new(&[
            ("drive", "go", 0.65),
            ("execute", "execute", 1.0),
        ]));
        let c = classifier(model.clone());
        assert_eq!(
            c.classify(&verbs(&["drive", "execute"])),
            Some(Instruction::Go)
        );
        // only the four vocabulary terms for "drive" were scored
        assert_eq!(model.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let model = Arc::new(TableModel::new(&[("roll", "go", 0.6), ("run", "execute", 0.61)]));
        let c = classifier(model);
        assert_eq!(c.classify(&verbs(&["roll"])), None);
        assert_eq!(
            c.classify(&verbs(&["roll", "run"])),
            Some(Instruction::Execute)
        );
    }

    #[test]
    fn test_synonym_anchor_collapses_to_go() {
        let model = Arc::new(TableModel::new(&[
            ("ship", "send", 0.9),
            ("ship", "go", 0.4),
            ("ship", "execute", 0.2),
        ]));
        let c = classifier(model);
        assert_eq!(c.classify(&verbs(&["ship"])), Some(Instruction::Go));
    }

    #[test]
    fn test_no_verb_qualifies() {
        let model = Arc::new(TableModel::new(&[("dance", "go", 0.3)]));
        let c = classifier(model);
        assert_eq!(c.classify(&verbs(&["dance"])), None);
    }

    #[test]
    fn test_synonym_report() {
        let model = Arc::new(TableModel::new(&[
            ("move", "go", 0.834),
            ("dance", "go", 0.2),
            ("travel", "go", 0.7),
        ]));
        let c = classifier(model);
        let hits = c.synonyms(&verbs(&["move", "dance", "travel"]), "go");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].word, "move");
        assert_eq!(hits[0].similarity, 0.83);
        assert_eq!(hits[1].word, "travel");
    }
}
