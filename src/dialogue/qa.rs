//! Scripted Q&A — keyword-matched canned answers about the organization.

use serde::{Deserialize, Serialize};

use super::responses::{ResponseSelector, choose};

/// One keyword rule: if any keyword is contained in the question, answer
/// from `responses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRule {
    pub keywords: Vec<String>,
    pub responses: Vec<String>,
}

impl QaRule {
    pub fn new<K, R>(keywords: K, responses: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Ordered keyword rules plus a fallback pool. The first matching rule wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaScript {
    pub greeting: String,
    pub rules: Vec<QaRule>,
    pub fallback: Vec<String>,
}

impl QaScript {
    /// Answer a question. Never fails: unmatched questions get a fallback.
    pub fn answer(&self, question: &str, selector: &dyn ResponseSelector) -> String {
        let lower = question.to_lowercase();
        let pool = self
            .rules
            .iter()
            .find(|rule| rule.matches(&lower) && !rule.responses.is_empty())
            .map(|rule| rule.responses.as_slice())
            .unwrap_or(self.fallback.as_slice());

        choose(selector, pool).cloned().unwrap_or_default()
    }

    /// The demo script for the organization dashboard.
    pub fn tilo_default(assistant_name: &str) -> Self {
        Self {
            greeting: format!(
                "Hi, I'm {assistant_name}. Ask me about your agents, approvals, compliance or spending."
            ),
            rules: vec![
                QaRule::new(
                    ["agent", "team", "roster"],
                    [
                        "You have 24 active agents across 5 departments. Operations is the busiest this week.",
                        "All 24 agents are online. Two are in onboarding and one is paused for review.",
                    ],
                ),
                QaRule::new(
                    ["approval", "pending", "queue"],
                    [
                        "There are 3 items waiting for your approval. The largest is the GPU capacity increase.",
                        "Your approval queue has 3 pending items, one of them flagged as urgent.",
                    ],
                ),
                QaRule::new(
                    ["compliance", "audit", "policy"],
                    [
                        "The organization compliance score is 94%. One data-retention policy needs attention.",
                        "Compliance is at 94%. The last audit finished without critical findings.",
                    ],
                ),
                QaRule::new(
                    ["cost", "spend", "budget", "finops", "money"],
                    [
                        "Spending this month is $42,300, which is 8% under budget.",
                        "FinOps summary: $42,300 spent of a $46,000 monthly budget.",
                    ],
                ),
                QaRule::new(
                    ["hello", "hi ", "hey"],
                    ["Hello! What would you like to know?", "Hi there. How can I help?"],
                ),
            ],
            fallback: vec![
                "I'm not sure about that one. Try asking about agents, approvals, compliance or spending.".to_string(),
                "I don't have an answer for that yet. I can tell you about agents, approvals, compliance or costs.".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::responses::{FixedTemplate, RandomFromSet};

    #[test]
    fn keyword_rules_match_case_insensitively() {
        let script = QaScript::tilo_default("Tilo");
        let answer = script.answer("How many AGENTS do we have?", &FixedTemplate);
        assert!(answer.starts_with("You have 24 active agents"));

        let answer = script.answer("what's our monthly spend", &FixedTemplate);
        assert!(answer.contains("$42,300"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let script = QaScript::tilo_default("Tilo");
        // mentions both agents and compliance; the agent rule comes first
        let answer = script.answer("are the agents compliant with policy?", &FixedTemplate);
        assert!(answer.contains("agents"));
    }

    #[test]
    fn unmatched_questions_fall_back() {
        let script = QaScript::tilo_default("Tilo");
        let answer = script.answer("what's the weather like?", &RandomFromSet);
        assert!(script.fallback.contains(&answer));
    }

    #[test]
    fn random_answers_come_from_the_matched_rule() {
        let script = QaScript::tilo_default("Tilo");
        for _ in 0..20 {
            let answer = script.answer("any pending approvals?", &RandomFromSet);
            assert!(script.rules[1].responses.contains(&answer));
        }
    }

    #[test]
    fn rules_without_responses_are_skipped() {
        let script = QaScript {
            greeting: "hi".into(),
            rules: vec![
                QaRule::new(["budget"], Vec::<String>::new()),
                QaRule::new(["Budget"], ["Budget is fine."]),
            ],
            fallback: vec!["fallback".into()],
        };
        assert_eq!(script.answer("budget?", &FixedTemplate), "Budget is fine.");
        assert_eq!(script.answer("unrelated", &FixedTemplate), "fallback");
    }

    #[test]
    fn empty_fallback_yields_empty_answer() {
        let script = QaScript {
            greeting: String::new(),
            rules: Vec::new(),
            fallback: Vec::new(),
        };
        assert_eq!(script.answer("anything", &FixedTemplate), "");
    }

    #[test]
    fn greeting_names_the_assistant() {
        assert!(QaScript::tilo_default("Ephrya").greeting.contains("Ephrya"));
    }
}
