//! Rule-based language model backed by a small command lexicon
//!
//! Words are tagged from closed-class tables and a verb table; anything else is
//! treated as a noun. Every verb lemma that can carry a command has a short
//! embedding over a handful of semantic axes, and similarity is the cosine of
//! two lemmas' embeddings.

use crate::error::{ModelError, Result};
use crate::model::{EntityKind, LanguageModel, PosTag, Token};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Embedding axes: locomotion, dispatch, execution, initiation, halting, other.
pub const EMBEDDING_DIMS: usize = 6;

type Embedding = [f32; EMBEDDING_DIMS];

const BUILTIN_VERBS: &[(&str, &[&str], Embedding)] = &[
    ("go", &["goes", "went", "gone", "going"], [1.0, 0.3, 0.1, 0.1, 0.0, 0.0]),
    ("move", &["moves", "moved", "moving"], [0.9, 0.35, 0.1, 0.05, 0.0, 0.1]),
    ("send", &["sends", "sent", "sending"], [0.5, 1.0, 0.1, 0.1, 0.0, 0.0]),
    ("navigate", &["navigates", "navigated", "navigating"], [0.9, 0.2, 0.1, 0.0, 0.0, 0.0]),
    ("drive", &["drives", "drove", "driven", "driving"], [0.9, 0.2, 0.1, 0.1, 0.0, 0.1]),
    ("travel", &["travels", "travelled", "traveled", "travelling", "traveling"], [1.0, 0.1, 0.0, 0.0, 0.0, 0.1]),
    ("come", &["comes", "came", "coming"], [0.9, 0.1, 0.0, 0.0, 0.0, 0.1]),
    ("return", &["returns", "returned", "returning"], [0.8, 0.3, 0.0, 0.0, 0.0, 0.1]),
    ("walk", &["walks", "walked", "walking"], [0.8, 0.0, 0.0, 0.0, 0.0, 0.4]),
    ("execute", &["executes", "executed", "executing"], [0.05, 0.1, 1.0, 0.3, 0.0, 0.0]),
    ("run", &["runs", "ran", "running"], [0.3, 0.0, 0.9, 0.4, 0.0, 0.2]),
    ("perform", &["performs", "performed", "performing"], [0.0, 0.0, 0.9, 0.2, 0.0, 0.3]),
    ("start", &["starts", "started", "starting"], [0.1, 0.0, 0.6, 1.0, 0.0, 0.0]),
    ("launch", &["launches", "launched", "launching"], [0.1, 0.2, 0.7, 0.8, 0.0, 0.0]),
    ("begin", &["begins", "began", "begun", "beginning"], [0.1, 0.0, 0.5, 1.0, 0.0, 0.0]),
    ("do", &["does", "did", "done", "doing"], [0.1, 0.0, 0.8, 0.2, 0.0, 0.3]),
    ("trigger", &["triggers", "triggered", "triggering"], [0.0, 0.1, 0.8, 0.6, 0.0, 0.0]),
    ("stop", &["stops", "stopped", "stopping"], [0.1, 0.0, 0.1, 0.1, 1.0, 0.0]),
    ("halt", &["halts", "halted", "halting"], [0.1, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("wait", &["waits", "waited", "waiting"], [0.0, 0.0, 0.0, 0.0, 0.7, 0.3]),
    ("dance", &["dances", "danced", "dancing"], [0.2, 0.0, 0.1, 0.0, 0.0, 1.0]),
    ("sing", &["sings", "sang", "sung", "singing"], [0.0, 0.0, 0.1, 0.0, 0.0, 1.0]),
    ("jump", &["jumps", "jumped", "jumping"], [0.3, 0.0, 0.0, 0.0, 0.0, 0.9]),
];

/// Verbs recognised as verbs but carrying no command meaning.
const PLAIN_VERBS: &[(&str, &[&str])] = &[
    ("want", &["wants", "wanted", "wanting"]),
    ("need", &["needs", "needed", "needing"]),
    ("like", &["likes", "liked"]),
    ("let", &["lets", "letting"]),
    ("make", &["makes", "made", "making"]),
    ("take", &["takes", "took", "taken", "taking"]),
    ("get", &["gets", "got", "getting"]),
    ("tell", &["tells", "told", "telling"]),
    ("say", &["says", "said", "saying"]),
    ("try", &["tries", "tried", "trying"]),
];

const FUNCTION_WORDS: &[(&str, PosTag)] = &[
    ("the", PosTag::Determiner),
    ("a", PosTag::Determiner),
    ("an", PosTag::Determiner),
    ("this", PosTag::Determiner),
    ("that", PosTag::Determiner),
    ("these", PosTag::Determiner),
    ("those", PosTag::Determiner),
    ("some", PosTag::Determiner),
    ("any", PosTag::Determiner),
    ("to", PosTag::Adposition),
    ("towards", PosTag::Adposition),
    ("toward", PosTag::Adposition),
    ("at", PosTag::Adposition),
    ("in", PosTag::Adposition),
    ("into", PosTag::Adposition),
    ("on", PosTag::Adposition),
    ("of", PosTag::Adposition),
    ("for", PosTag::Adposition),
    ("from", PosTag::Adposition),
    ("with", PosTag::Adposition),
    ("by", PosTag::Adposition),
    ("near", PosTag::Adposition),
    ("i", PosTag::Pronoun),
    ("me", PosTag::Pronoun),
    ("my", PosTag::Pronoun),
    ("you", PosTag::Pronoun),
    ("your", PosTag::Pronoun),
    ("we", PosTag::Pronoun),
    ("us", PosTag::Pronoun),
    ("our", PosTag::Pronoun),
    ("it", PosTag::Pronoun),
    ("its", PosTag::Pronoun),
    ("they", PosTag::Pronoun),
    ("them", PosTag::Pronoun),
    ("he", PosTag::Pronoun),
    ("she", PosTag::Pronoun),
    ("is", PosTag::Aux),
    ("are", PosTag::Aux),
    ("am", PosTag::Aux),
    ("be", PosTag::Aux),
    ("was", PosTag::Aux),
    ("were", PosTag::Aux),
    ("been", PosTag::Aux),
    ("can", PosTag::Aux),
    ("could", PosTag::Aux),
    ("will", PosTag::Aux),
    ("would", PosTag::Aux),
    ("should", PosTag::Aux),
    ("shall", PosTag::Aux),
    ("may", PosTag::Aux),
    ("might", PosTag::Aux),
    ("must", PosTag::Aux),
    ("and", PosTag::Conjunction),
    ("or", PosTag::Conjunction),
    ("but", PosTag::Conjunction),
    ("then", PosTag::Adverb),
    ("now", PosTag::Adverb),
    ("there", PosTag::Adverb),
    ("here", PosTag::Adverb),
    ("again", PosTag::Adverb),
    ("up", PosTag::Adverb),
    ("down", PosTag::Adverb),
    ("back", PosTag::Adverb),
    ("not", PosTag::Particle),
    ("please", PosTag::Interjection),
    ("hey", PosTag::Interjection),
    ("ok", PosTag::Interjection),
    ("okay", PosTag::Interjection),
    ("zero", PosTag::Numeral),
    ("one", PosTag::Numeral),
    ("two", PosTag::Numeral),
    ("three", PosTag::Numeral),
    ("four", PosTag::Numeral),
    ("five", PosTag::Numeral),
    ("six", PosTag::Numeral),
    ("seven", PosTag::Numeral),
    ("eight", PosTag::Numeral),
    ("nine", PosTag::Numeral),
    ("ten", PosTag::Numeral),
    ("first", PosTag::Adjective),
    ("second", PosTag::Adjective),
    ("next", PosTag::Adjective),
    ("last", PosTag::Adjective),
];

/// Optional YAML file that extends the built-in tables.
#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    verbs: Vec<VerbSpec>,
    #[serde(default)]
    places: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VerbSpec {
    lemma: String,
    #[serde(default)]
    forms: Vec<String>,
    #[serde(default)]
    embedding: Vec<f32>,
}

pub struct LexiconModel {
    word_re: Regex,
    function_words: HashMap<String, PosTag>,
    /// Inflected form (lemma included) to lemma.
    verb_forms: HashMap<String, String>,
    embeddings: HashMap<String, Embedding>,
    places: HashSet<String>,
}

impl LexiconModel {
    /// Build the model from the built-in tables only.
    pub fn builtin() -> Result<Self> {
        let word_re = Regex::new(r"[\p{L}\p{N}]+(?:['_\-][\p{L}\p{N}]+)*")?;

        let function_words = FUNCTION_WORDS
            .iter()
            .map(|(w, tag)| (w.to_string(), *tag))
            .collect();

        let mut model = Self {
            word_re,
            function_words,
            verb_forms: HashMap::new(),
            embeddings: HashMap::new(),
            places: HashSet::new(),
        };
        for (lemma, forms, embedding) in BUILTIN_VERBS {
            model.add_verb(lemma, forms.iter().copied(), Some(*embedding));
        }
        for (lemma, forms) in PLAIN_VERBS {
            model.add_verb(lemma, forms.iter().copied(), None);
        }
        Ok(model)
    }

    /// Build the model and merge an optional lexicon extension file.
    pub fn load(extension: Option<&Path>) -> Result<Self> {
        let mut model = Self::builtin()?;
        if let Some(path) = extension {
            let shown = path.display().to_string();
            let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
                path: shown.clone(),
                source,
            })?;
            let file: LexiconFile =
                serde_yaml::from_str(&raw).map_err(|e| ModelError::Lexicon {
                    path: shown.clone(),
                    message: e.to_string(),
                })?;
            model.merge(file, &shown)?;
            tracing::info!("lexicon extension loaded from {}", path.display());
        }
        tracing::debug!(
            "lexicon model ready: {} verb forms, {} places",
            model.verb_forms.len(),
            model.places.len()
        );
        Ok(model)
    }

    fn merge(&mut self, file: LexiconFile, path: &str) -> Result<()> {
        for spec in file.verbs {
            let lemma = spec.lemma.to_lowercase();
            let embedding = match spec.embedding.len() {
                0 => None,
                EMBEDDING_DIMS => {
                    if spec.embedding.iter().all(|v| *v == 0.0) {
                        return Err(ModelError::EmptyEmbedding { lemma });
                    }
                    let mut e = [0.0; EMBEDDING_DIMS];
                    e.copy_from_slice(&spec.embedding);
                    Some(e)
                }
                n => {
                    return Err(ModelError::Lexicon {
                        path: path.to_string(),
                        message: format!(
                            "verb '{}' embedding has {} values, expected {}",
                            lemma, n, EMBEDDING_DIMS
                        ),
                    })
                }
            };
            let forms: Vec<String> = spec.forms.iter().map(|f| f.to_lowercase()).collect();
            self.add_verb(&lemma, forms.iter().map(String::as_str), embedding);
        }
        for place in file.places {
            self.places.insert(place.to_lowercase());
        }
        Ok(())
    }

    fn add_verb<'a>(
        &mut self,
        lemma: &str,
        forms: impl Iterator<Item = &'a str>,
        embedding: Option<Embedding>,
    ) {
        self.verb_forms.insert(lemma.to_string(), lemma.to_string());
        for form in forms {
            self.verb_forms.insert(form.to_string(), lemma.to_string());
        }
        if let Some(e) = embedding {
            self.embeddings.insert(lemma.to_string(), e);
        }
    }

    fn lemma_of<'a>(&'a self, word: &'a str) -> &'a str {
        self.verb_forms.get(word).map(String::as_str).unwrap_or(word)
    }

    fn tag(&self, word: &str) -> Token {
        if let Some(tag) = self.function_words.get(word) {
            return Token::new(word, word, *tag);
        }
        if let Some(lemma) = self.verb_forms.get(word) {
            return Token::new(word, lemma.as_str(), PosTag::Verb);
        }
        if word.chars().all(|c| c.is_ascii_digit()) {
            return Token::new(word, word, PosTag::Numeral);
        }
        if self.places.contains(word) {
            return Token::new(word, word, PosTag::ProperNoun).with_entity(EntityKind::Location);
        }
        if word.chars().any(|c| c.is_ascii_digit()) || word.chars().count() == 1 {
            return Token::new(word, word, PosTag::ProperNoun);
        }
        Token::new(word, word, PosTag::Noun)
    }
}

/// Join a noun with a trailing number or letter ("position two", "dock b") so
/// the part that tells catalog entries apart stays with its head word.
fn merge_labels(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let head = &tokens[i];
        if matches!(head.pos, PosTag::Noun | PosTag::ProperNoun) {
            if let Some(label) = tokens.get(i + 1) {
                if is_label(label, tokens.get(i + 2)) {
                    let text = format!("{} {}", head.text, label.text);
                    let mut merged = Token::new(text.clone(), text, PosTag::ProperNoun);
                    if let Some(kind) = head.entity {
                        merged = merged.with_entity(kind);
                    }
                    out.push(merged);
                    i += 2;
                    continue;
                }
            }
        }
        out.push(head.clone());
        i += 1;
    }
    out
}

fn is_label(token: &Token, following: Option<&Token>) -> bool {
    if token.pos == PosTag::Numeral {
        return true;
    }
    let mut chars = token.text.chars();
    let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    // "a" in front of a noun is an article
    single_letter
        && token.pos != PosTag::Pronoun
        && !following.is_some_and(|t| {
            matches!(t.pos, PosTag::Noun | PosTag::ProperNoun | PosTag::Adjective)
        })
}

fn cosine(a: &Embedding, b: &Embedding) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na * nb)).clamp(0.0, 1.0)
}

impl LanguageModel for LexiconModel {
    fn analyze(&self, text: &str) -> Vec<Token> {
        let lower = text.to_lowercase();
        let tokens = self
            .word_re
            .find_iter(&lower)
            .map(|m| self.tag(m.as_str()))
            .collect();
        merge_labels(tokens)
    }

    fn similarity(&self, a: &str, b: &str) -> f32 {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();
        let la = self.lemma_of(&a);
        let lb = self.lemma_of(&b);
        if la.is_empty() || lb.is_empty() {
            return 0.0;
        }
        if la == lb {
            return 1.0;
        }
        match (self.embeddings.get(la), self.embeddings.get(lb)) {
            (Some(ea), Some(eb)) => cosine(ea, eb),
            _ => 0.0,
        }
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn model() -> LexiconModel {
        LexiconModel::builtin().unwrap()
    }

    #[test]
    fn test_tagging() {
        let tokens = model().analyze("Go to the position A, then run pos1!");
        let tags: Vec<(&str, PosTag)> = tokens.iter().map(|t| (t.text.as_str(), t.pos)).collect();
        assert_eq!(
            tags,
            vec![
                ("go", PosTag::Verb),
                ("to", PosTag::Adposition),
                ("the", PosTag::Determiner),
                ("position a", PosTag::ProperNoun),
                ("then", PosTag::Adverb),
                ("run", PosTag::Verb),
                ("pos1", PosTag::ProperNoun),
            ]
        );
    }

    #[test]
    fn test_labels_stay_with_their_noun() {
        let m = model();
        let texts = |phrase: &str| -> Vec<String> {
            m.analyze(phrase).into_iter().map(|t| t.text).collect()
        };
        assert_eq!(texts("go to position two"), vec!["go", "to", "position two"]);
        assert_eq!(texts("move to the dock B now"), vec!["move", "to", "the", "dock b", "now"]);
        assert_eq!(texts("execute mission 3"), vec!["execute", "mission 3"]);
        // an article before a noun is left alone
        assert_eq!(
            texts("send robot a message"),
            vec!["send", "robot", "a", "message"]
        );
        assert_eq!(texts("go to a dock"), vec!["go", "to", "a", "dock"]);
    }

    #[test]
    fn test_lemmas() {
        let tokens = model().analyze("went moving sent executing 42");
        let lemmas: Vec<&str> = tokens.iter().map(|t| t.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["go", "move", "send", "execute", "42"]);
        assert_eq!(tokens[4].pos, PosTag::Numeral);
    }

    #[test]
    fn test_keeps_underscored_names_whole() {
        let tokens = model().analyze("execute clean_a");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "clean_a");
        assert_eq!(tokens[1].pos, PosTag::Noun);
    }

    #[test]
    fn test_similarity_ranges() {
        let m = model();
        assert_eq!(m.similarity("go", "go"), 1.0);
        assert_eq!(m.similarity("went", "go"), 1.0);
        assert!(m.similarity("move", "go") > 0.9);
        assert!(m.similarity("run", "execute") > 0.9);
        assert!(m.similarity("run", "go") < 0.6);
        assert!(m.similarity("dance", "go") < 0.6);
        assert!(m.similarity("dance", "execute") < 0.6);
        assert_eq!(m.similarity("want", "go"), 0.0);
        assert_eq!(m.similarity("banana", "go"), 0.0);
    }

    #[test]
    fn test_extension_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "verbs:\n  - lemma: roll\n    forms: [rolls, rolled, rolling]\n    embedding: [0.95, 0.2, 0.0, 0.0, 0.0, 0.1]\nplaces: [Kitchen]\n"
        )
        .unwrap();

        let m = LexiconModel::load(Some(file.path())).unwrap();
        assert!(m.similarity("rolling", "go") > 0.9);
        let tokens = m.analyze("roll to the kitchen");
        assert_eq!(tokens[0].pos, PosTag::Verb);
        assert_eq!(tokens[3].pos, PosTag::ProperNoun);
        assert_eq!(tokens[3].entity, Some(EntityKind::Location));
    }

    #[test]
    fn test_extension_errors() {
        assert!(matches!(
            LexiconModel::load(Some(Path::new("/nonexistent/lexicon.yaml"))),
            Err(ModelError::Io { .. })
        ));

        let mut bad_dims = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad_dims, "verbs:\n  - lemma: roll\n    embedding: [1.0, 0.0]\n").unwrap();
        assert!(matches!(
            LexiconModel::load(Some(bad_dims.path())),
            Err(ModelError::Lexicon { .. })
        ));

        let mut zeros = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            zeros,
            "verbs:\n  - lemma: roll\n    embedding: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0]\n"
        )
        .unwrap();
        assert!(matches!(
            LexiconModel::load(Some(zeros.path())),
            Err(ModelError::EmptyEmbedding { .. })
        ));
    }
}
