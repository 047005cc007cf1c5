//! Fuzzy string scoring on a 0-100 scale

/// Scores how well a query matches candidate strings.
pub trait FuzzyMatcher: Send + Sync {
    /// Match quality of `choice` for `query`, 0 to 100.
    fn score(&self, query: &str, choice: &str) -> f32;

    /// Index and score of the best choice; the earliest choice wins ties.
    fn best_match(&self, query: &str, choices: &[String]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, choice) in choices.iter().enumerate() {
            let score = self.score(query, choice);
            match best {
                Some((_, s)) if s >= score => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    /// Indices of every choice sharing the top score, in choice order, and
    /// that score.
    fn best_matches(&self, query: &str, choices: &[String]) -> Option<(Vec<usize>, f32)> {
        let mut best: Option<(Vec<usize>, f32)> = None;
        for (i, choice) in choices.iter().enumerate() {
            let score = self.score(query, choice);
            match &mut best {
                Some((tied, s)) if *s == score => tied.push(i),
                Some((_, s)) if *s > score => {}
                _ => best = Some((vec![i], score)),
            }
        }
        best
    }
}

/// Case-insensitive blend of whole-string, word-order-insensitive and
/// substring similarity.
///
/// Strings of similar length are compared whole (and with their words sorted,
/// discounted to 95%). When one string is at least 1.5x longer the shorter is
/// also slid across the longer and the best window counts, discounted to 90%
/// (60% from 8x).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl WeightedRatio {
    fn ratio(a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b) * 100.0
    }

    fn token_sort(s: &str) -> String {
        let mut words: Vec<&str> = s.split_whitespace().collect();
        words.sort_unstable();
        words.join(" ")
    }

    fn partial_ratio(short: &str, long: &str) -> f64 {
        let long_chars: Vec<char> = long.chars().collect();
        let width = short.chars().count();
        if width == 0 || width > long_chars.len() {
            return Self::ratio(short, long);
        }
        let mut best = 0.0_f64;
        for start in 0..=(long_chars.len() - width) {
            let window: String = long_chars[start..start + width].iter().collect();
            let r = Self::ratio(short, &window);
            if r > best {
                best = r;
                if best >= 100.0 {
                    break;
                }
            }
        }
        best
    }
}

impl FuzzyMatcher for WeightedRatio {
    fn score(&self, query: &str, choice: &str) -> f32 {
        let a = query.trim().to_lowercase();
        let b = choice.trim().to_lowercase();
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let base = Self::ratio(&a, &b);
        let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
        let len_ratio = len_a.max(len_b) / len_a.min(len_b);

        let score = if len_ratio < 1.5 {
            let sorted = Self::ratio(&Self::token_sort(&a), &Self::token_sort(&b)) * 0.95;
            base.max(sorted)
        } else {
            let scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
            let (short, long) = if len_a <= len_b { (&a, &b) } else { (&b, &a) };
            base.max(Self::partial_ratio(short, long) * scale)
        };
        score.round() as f32
    }
}
