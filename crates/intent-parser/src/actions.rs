//! Instruction vocabulary and dispatch outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical instructions the router can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instruction {
    /// Navigate to a catalog position.
    Go,
    /// Run a catalog mission.
    Execute,
}

impl Instruction {
    pub const ALL: [Instruction; 2] = [Instruction::Go, Instruction::Execute];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instruction::Go => "go",
            Instruction::Execute => "execute",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A surface word compared against phrase verbs, and the instruction it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    pub surface: String,
    pub instruction: Instruction,
}

/// Ordered anchor terms: every canonical instruction name, then its synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionVocabulary {
    terms: Vec<VocabularyTerm>,
}

impl Default for InstructionVocabulary {
    fn default() -> Self {
        Self::new(&[("send", Instruction::Go), ("move", Instruction::Go)])
    }
}

impl InstructionVocabulary {
    /// Canonical names first, in [`Instruction::ALL`] order, then `synonyms`.
    pub fn new(synonyms: &[(&str, Instruction)]) -> Self {
        let mut terms: Vec<VocabularyTerm> = Instruction::ALL
            .iter()
            .map(|i| VocabularyTerm {
                surface: i.as_str().to_string(),
                instruction: *i,
            })
            .collect();
        for (surface, instruction) in synonyms {
            let surface = surface.to_lowercase();
            if terms.iter().any(|t| t.surface == surface) {
                continue;
            }
            terms.push(VocabularyTerm {
                surface,
                instruction: *instruction,
            });
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[VocabularyTerm] {
        &self.terms
    }

    /// Collapse a surface word to its canonical instruction.
    pub fn normalize(&self, word: &str) -> Option<Instruction> {
        let word = word.trim().to_lowercase();
        self.terms
            .iter()
            .find(|t| t.surface == word)
            .map(|t| t.instruction)
    }
}

/// What the router did with one phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Navigated { position: String },
    MissionQueued { mission: String },
    /// `go` without a matching position.
    NoPosition,
    /// `execute` without a matching mission.
    NoMission,
    /// The operator did not pick one of several missions.
    NoSelection,
    /// No verb resembled an instruction.
    NoInstruction,
    /// The robot refused or never received the request.
    ActionFailed {
        instruction: Instruction,
        target: String,
        reason: String,
    },
}

impl DispatchOutcome {
    /// Whether an external action was accepted.
    pub fn is_dispatched(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Navigated { .. } | DispatchOutcome::MissionQueued { .. }
        )
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Navigated { position } => {
                write!(f, "robot sent to position '{}'", position)
            }
            DispatchOutcome::MissionQueued { mission } => {
                write!(f, "mission '{}' sent to robot", mission)
            }
            DispatchOutcome::NoPosition => f.write_str("no valid position found"),
            DispatchOutcome::NoMission => f.write_str("no valid mission found"),
            DispatchOutcome::NoSelection => f.write_str("no mission selected"),
            DispatchOutcome::NoInstruction => {
                f.write_str("no instruction found: instruction not recognized")
            }
            DispatchOutcome::ActionFailed {
                instruction,
                target,
                reason,
            } => write!(f, "{} '{}' failed: {}", instruction, target, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_order() {
        let vocab = InstructionVocabulary::default();
        let surfaces: Vec<&str> = vocab.terms().iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["go", "execute", "send", "move"]);
    }

    #[test]
    fn test_synonym_normalization() {
        let vocab = InstructionVocabulary::default();
        assert_eq!(vocab.normalize("send"), Some(Instruction::Go));
        assert_eq!(vocab.normalize("Move"), Some(Instruction::Go));
        assert_eq!(vocab.normalize("execute"), Some(Instruction::Execute));
        assert_eq!(vocab.normalize("dance"), None);
    }

    #[test]
    fn test_synonym_cannot_shadow_canonical() {
        let vocab = InstructionVocabulary::new(&[("go", Instruction::Execute)]);
        assert_eq!(vocab.terms().len(), 2);
        assert_eq!(vocab.normalize("go"), Some(Instruction::Go));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            DispatchOutcome::NoPosition.to_string(),
            "no valid position found"
        );
        assert!(DispatchOutcome::NoInstruction
            .to_string()
            .contains("instruction not recognized"));
        let failed = DispatchOutcome::ActionFailed {
            instruction: Instruction::Execute,
            target: "patrol".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(failed.to_string(), "execute 'patrol' failed: HTTP 500");
        assert!(!failed.is_dispatched());
    }

    #[test]
    fn test_instruction_serde() {
        let json = serde_json::to_string(&Instruction::Execute).unwrap();
        assert_eq!(json, "\"execute\"");
    }
}
