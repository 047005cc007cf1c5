//! Phrase-to-action orchestration

use crate::actions::{DispatchOutcome, Instruction};
use crate::classifier::InstructionClassifier;
use crate::disambiguate::{Disambiguator, OperatorIo};
use crate::entities::EntityResolver;
use crate::fuzzy::WeightedRatio;
use crate::model::LanguageModel;
use crate::parser::{extract, normalize, Extraction, IntentResult};
use crate::IntentConfig;
use robot_client::{Catalogs, RobotClient};
use std::sync::Arc;

/// Result of interpreting one phrase, before dispatch.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Normalized phrase.
    pub phrase: String,
    /// Robot the catalogs were fetched from.
    pub robot: String,
    pub result: IntentResult,
}

/// Interprets phrases and drives a robot client.
///
/// The router owns the client but never extends it: catalogs are fetched once
/// per phrase and handed to the resolution steps as an immutable snapshot.
pub struct IntentRouter<C: RobotClient> {
    model: Arc<dyn LanguageModel>,
    classifier: InstructionClassifier,
    resolver: EntityResolver,
    disambiguator: Disambiguator,
    client: C,
}

impl<C: RobotClient> IntentRouter<C> {
    pub fn new(config: &IntentConfig, model: Arc<dyn LanguageModel>, client: C) -> Self {
        let classifier = InstructionClassifier::new(
            model.clone(),
            config.vocabulary.clone(),
            config.similarity_threshold,
        );
        let resolver = EntityResolver::new(Box::new(WeightedRatio), config.fuzzy_threshold);
        Self {
            model,
            classifier,
            resolver,
            disambiguator: Disambiguator::new("mission"),
            client,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn classifier(&self) -> &InstructionClassifier {
        &self.classifier
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }

    /// Interpret a phrase and act on it.
    pub fn route(&mut self, phrase: &str, operator: &mut dyn OperatorIo) -> DispatchOutcome {
        let resolution = self.resolve(phrase);
        self.dispatch(&resolution.result, operator)
    }

    /// Interpret a phrase against freshly fetched catalogs without dispatching.
    pub fn resolve(&mut self, phrase: &str) -> Resolution {
        let phrase = normalize(phrase);
        let extraction = extract(self.model.as_ref(), &phrase);
        tracing::debug!(
            "'{}': verbs={:?} entities={:?}",
            phrase,
            extraction.verbs,
            extraction.entities
        );

        self.switch_robot_if_named(&phrase);
        let catalogs = self.refresh_catalogs();
        let result = self.resolve_with(&extraction, &catalogs);
        tracing::info!(
            "'{}' -> instruction={:?} positions={:?} missions={:?}",
            phrase,
            result.instruction,
            result.position_candidates,
            result.mission_candidates
        );

        Resolution {
            phrase,
            robot: self.client.active_robot().to_string(),
            result,
        }
    }

    /// Classify and resolve an extraction against a catalog snapshot.
    pub fn resolve_with(&self, extraction: &Extraction, catalogs: &Catalogs) -> IntentResult {
        IntentResult {
            instruction: self.classifier.classify(&extraction.verbs),
            position_candidates: self
                .resolver
                .resolve(&extraction.entities, &catalogs.positions.names()),
            mission_candidates: self
                .resolver
                .resolve(&extraction.entities, &catalogs.missions.names()),
        }
    }

    /// Perform the action an intent asks for.
    pub fn dispatch(
        &mut self,
        result: &IntentResult,
        operator: &mut dyn OperatorIo,
    ) -> DispatchOutcome {
        let outcome = match result.instruction {
            Some(Instruction::Go) => self.go(result.position_candidates.as_deref()),
            Some(Instruction::Execute) => {
                self.execute(result.mission_candidates.as_deref(), operator)
            }
            None => DispatchOutcome::NoInstruction,
        };
        if outcome.is_dispatched() {
            tracing::info!("{}", outcome);
        } else {
            tracing::warn!("{}", outcome);
        }
        outcome
    }

    // Positions are not disambiguated: the first match is used.
    fn go(&mut self, candidates: Option<&[String]>) -> DispatchOutcome {
        let Some(position) = candidates.and_then(|c| c.first()) else {
            return DispatchOutcome::NoPosition;
        };
        match self.client.navigate_to(position) {
            Ok(()) => DispatchOutcome::Navigated {
                position: position.clone(),
            },
            Err(e) => DispatchOutcome::ActionFailed {
                instruction: Instruction::Go,
                target: position.clone(),
                reason: e.to_string(),
            },
        }
    }

    fn execute(
        &mut self,
        candidates: Option<&[String]>,
        operator: &mut dyn OperatorIo,
    ) -> DispatchOutcome {
        let candidates = match candidates {
            Some(c) if !c.is_empty() => c,
            _ => return DispatchOutcome::NoMission,
        };
        let Some(mission) = self.disambiguator.select(candidates, operator) else {
            return DispatchOutcome::NoSelection;
        };
        match self.client.execute_mission(&mission) {
            Ok(()) => DispatchOutcome::MissionQueued { mission },
            Err(e) => DispatchOutcome::ActionFailed {
                instruction: Instruction::Execute,
                target: mission,
                reason: e.to_string(),
            },
        }
    }

    fn switch_robot_if_named(&mut self, phrase: &str) {
        let tokens = self.model.analyze(phrase);
        let named = tokens
            .iter()
            .flat_map(|t| t.text.split_whitespace())
            .find_map(|word| {
                self.client
                    .robots()
                    .iter()
                    .find(|r| r.matches(word))
                    .map(|r| r.name.clone())
            });
        let Some(robot) = named else {
            return;
        };
        if robot == self.client.active_robot() {
            return;
        }
        match self.client.select_robot(&robot) {
            Ok(()) => tracing::info!("active robot is now {}", robot),
            Err(e) => tracing::warn!("could not switch to robot {}: {}", robot, e),
        }
    }

    fn refresh_catalogs(&mut self) -> Catalogs {
        match self.client.refresh() {
            Ok(catalogs) => {
                tracing::debug!(
                    "{}: {} positions, {} missions",
                    self.client.active_robot(),
                    catalogs.positions.len(),
                    catalogs.missions.len()
                );
                catalogs
            }
            Err(e) => {
                tracing::warn!(
                    "catalog refresh failed for {}: {}",
                    self.client.active_robot(),
                    e
                );
                Catalogs::default()
            }
        }
    }
}
