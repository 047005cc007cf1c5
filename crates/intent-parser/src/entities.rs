//! Entity resolution against a robot catalog

use crate::fuzzy::FuzzyMatcher;

/// Matches entity candidates to catalog names by fuzzy score.
pub struct EntityResolver {
    matcher: Box<dyn FuzzyMatcher>,
    /// Minimum score (exclusive, 0-100) for a match to count.
    threshold: f32,
}

impl EntityResolver {
    pub fn new(matcher: Box<dyn FuzzyMatcher>, threshold: f32) -> Self {
        Self { matcher, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Best catalog names for each entity that matches well enough, in entity order.
    ///
    /// Names tied for an entity's top score are all kept, in catalog order, so
    /// the caller can choose between them. The same name may appear more than
    /// once when several entities hit it. Returns `None` rather than an empty
    /// list.
    pub fn resolve(&self, entities: &[String], catalog: &[String]) -> Option<Vec<String>> {
        if entities.is_empty() || catalog.is_empty() {
            return None;
        }
        let mut matches = Vec::new();
        for entity in entities {
            match self.matcher.best_matches(entity, catalog) {
                Some((tied, score)) if score > self.threshold => {
                    for idx in tied {
                        tracing::debug!("'{}' matched '{}' ({:.0})", entity, catalog[idx], score);
                        matches.push(catalog[idx].clone());
                    }
                }
                Some((tied, score)) => {
                    tracing::trace!(
                        "'{}' best {} candidate(s) ({:.0}) rejected",
                        entity,
                        tied.len(),
                        score
                    );
                }
                None => {}
            }
        }
        if matches.is_empty() {
            None
        } else {
            Some(matches)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::WeightedRatio;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn resolver() -> EntityResolver {
        EntityResolver::new(Box::new(WeightedRatio), 70.0)
    }

    /// Scores equal names 100 and everything else a fixed value.
    struct Flat(f32);

    impl FuzzyMatcher for Flat {
        fn score(&self, query: &str, choice: &str) -> f32 {
            if query == choice {
                100.0
            } else {
                self.0
            }
        }
    }

    #[test]
    fn test_resolve_picks_best_per_entity() {
        let catalog = strings(&["position one", "position two"]);
        let out = resolver().resolve(&strings(&["position two"]), &catalog);
        assert_eq!(out, Some(strings(&["position two"])));
    }

    #[test]
    fn test_resolve_keeps_tied_names() {
        let catalog = strings(&["clean_a", "patrol", "clean_b"]);
        let out = resolver().resolve(&strings(&["clean"]), &catalog);
        assert_eq!(out, Some(strings(&["clean_a", "clean_b"])));

        let catalog = strings(&["position one", "position two"]);
        let out = resolver().resolve(&strings(&["position"]), &catalog);
        assert_eq!(out, Some(catalog.clone()));
    }

    #[test]
    fn test_resolve_keeps_duplicates() {
        let catalog = strings(&["footprint", "patrol"]);
        let out = resolver().resolve(&strings(&["footprint", "footprints"]), &catalog);
        assert_eq!(out, Some(strings(&["footprint", "footprint"])));
    }

    #[test]
    fn test_resolve_empty_inputs() {
        let r = resolver();
        assert_eq!(r.resolve(&[], &strings(&["dock"])), None);
        assert_eq!(r.resolve(&strings(&["dock"]), &[]), None);
    }

    #[test]
    fn test_resolve_nothing_above_threshold() {
        let r = EntityResolver::new(Box::new(Flat(70.0)), 70.0);
        assert_eq!(r.resolve(&strings(&["kitchen"]), &strings(&["dock"])), None);
    }

    #[test]
    fn test_resolve_only_returns_catalog_names() {
        let r = EntityResolver::new(Box::new(Flat(71.0)), 70.0);
        let catalog = strings(&["dock", "lab"]);
        let out = r.resolve(&strings(&["kitchen", "lab", "garage"]), &catalog);
        let out = out.unwrap();
        assert_eq!(out, strings(&["dock", "lab", "lab", "dock", "lab"]));
        assert!(out.iter().all(|n| catalog.contains(n)));
    }
}
