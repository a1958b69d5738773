//! Trigger matching.
//!
//! Rules are evaluated in order and the first matching rule decides what kind
//! of reply is produced. New reply kinds are added as rules, the dispatch path
//! only branches on [`TriggerDecision`].

use regex::Regex;
use tracing::debug;

use crate::event::types::MentionEvent;

/// Pattern for joke requests. The hashtag must end at an ASCII word boundary,
/// so a non-ASCII letter right after the tag still counts as a boundary.
pub const DADJOKE_PATTERN: &str = r"#dadjoke(?-u:\b)";

/// Outcome of matching a mention against the trigger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Reply with a joke from the content provider
    JokeRequest,
    /// Nothing to do
    NoMatch,
}

/// A single `(predicate, reply kind)` entry.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub decision: TriggerDecision,
}

impl TriggerRule {
    pub fn new(
        name: &'static str,
        pattern: &str,
        decision: TriggerDecision,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            decision,
        })
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered trigger table.
#[derive(Debug, Clone)]
pub struct TriggerMatcher {
    rules: Vec<TriggerRule>,
}

impl TriggerMatcher {
    pub fn new(rules: Vec<TriggerRule>) -> Self {
        Self { rules }
    }

    /// Table with the built-in rules.
    pub fn with_default_rules() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![TriggerRule::new(
            "dadjoke",
            DADJOKE_PATTERN,
            TriggerDecision::JokeRequest,
        )?]))
    }

    /// Decide what to do with a mention.
    pub fn decide(&self, event: &MentionEvent) -> TriggerDecision {
        match self.rules.iter().find(|rule| rule.matches(&event.text)) {
            Some(rule) => {
                debug!(rule = rule.name, "trigger_rule_matched");
                rule.decision
            }
            None => TriggerDecision::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(text: &str) -> MentionEvent {
        MentionEvent {
            text: text.to_string(),
            reply_target_id: "1".to_string(),
            author_handle: "alice".to_string(),
        }
    }

    fn decide(text: &str) -> TriggerDecision {
        TriggerMatcher::with_default_rules()
            .unwrap()
            .decide(&mention(text))
    }

    #[test]
    fn test_dadjoke_matches() {
        assert_eq!(decide("check out #dadjoke please"), TriggerDecision::JokeRequest);
        assert_eq!(decide("#dadjoke"), TriggerDecision::JokeRequest);
        assert_eq!(decide("@bot #dadjoke!"), TriggerDecision::JokeRequest);
    }

    #[test]
    fn test_dadjoke_requires_word_boundary() {
        assert_eq!(decide("more #dadjokes please"), TriggerDecision::NoMatch);
        assert_eq!(decide("#dadjoke_fan"), TriggerDecision::NoMatch);
    }

    #[test]
    fn test_dadjoke_boundary_is_ascii() {
        assert_eq!(decide("#dadjokeé please"), TriggerDecision::JokeRequest);
        assert_eq!(decide("#dadjoke日本"), TriggerDecision::JokeRequest);
        assert_eq!(decide("#dadjoke9"), TriggerDecision::NoMatch);
    }

    #[test]
    fn test_dadjoke_is_case_sensitive() {
        assert_eq!(decide("#DadJoke"), TriggerDecision::NoMatch);
    }

    #[test]
    fn test_no_trigger() {
        assert_eq!(decide("no trigger here"), TriggerDecision::NoMatch);
        assert_eq!(decide(""), TriggerDecision::NoMatch);
    }

    #[test]
    fn test_first_rule_wins() {
        let matcher = TriggerMatcher::new(vec![
            TriggerRule::new("silence", r"#quiet\b", TriggerDecision::NoMatch).unwrap(),
            TriggerRule::new("dadjoke", DADJOKE_PATTERN, TriggerDecision::JokeRequest).unwrap(),
        ]);

        assert_eq!(
            matcher.decide(&mention("#quiet #dadjoke")),
            TriggerDecision::NoMatch
        );
        assert_eq!(
            matcher.decide(&mention("#dadjoke")),
            TriggerDecision::JokeRequest
        );
    }

    #[test]
    fn test_empty_table_never_matches() {
        let matcher = TriggerMatcher::new(Vec::new());
        assert_eq!(matcher.decide(&mention("#dadjoke")), TriggerDecision::NoMatch);
    }
}
