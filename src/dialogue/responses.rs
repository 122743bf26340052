//! Scripted response pools and the strategies that pick from them.
//!
//! Every response kind owns a small pool of templates. Templates may use the
//! placeholders `{assistant}`, `{title}`, `{summary}`, `{detail}` and
//! `{requester}`.

use rand::Rng;

use crate::config::ResponseMode;

use super::subject::SubjectRecord;

/// The scripted lines the approval dialogue can say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Opening line naming the pending item.
    Greeting,
    /// Initial + unclear: ask again whether to review.
    Clarify,
    /// Initial + deny: polite goodbye.
    Farewell,
    /// Initial + affirm: short summary, offer details.
    Summary,
    /// Review consent + affirm: full detail, ask for a decision.
    FullDetail,
    /// Review consent + anything else: ask for a decision without detail.
    AbbreviatedPrompt,
    /// Decision + unclear: demand an explicit yes or no.
    DecisionReprompt,
    /// Decision + affirm.
    Approved,
    /// Decision + deny.
    Rejected,
    /// Any input after completion.
    SessionClosed,
}

impl ResponseKind {
    /// Template pool for this kind. Never empty.
    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &[
                "Hi, I'm {assistant}. You have a pending approval: {title}. Would you like me to walk you through it?",
                "Hello! {assistant} here. {requester} is waiting on your sign-off for {title}. Shall we go over it?",
                "Good to see you. There's one item in your approval queue: {title}. Want to review it now?",
            ],
            Self::Clarify => &[
                "Sorry, I didn't catch that. Would you like to review {title}? Please say yes or no.",
                "I'm not sure I understood. Should we go through {title} now? A simple yes or no is fine.",
            ],
            Self::Farewell => &[
                "No problem. I'll keep {title} in your queue for later. Goodbye!",
                "Understood, we'll leave it for now. {title} stays in your queue. Talk soon!",
            ],
            Self::Summary => &[
                "Here's the summary: {summary}. Would you like to hear the full details?",
                "Okay. In short: {summary}. Do you want more details before deciding?",
            ],
            Self::FullDetail => &[
                "Here are the details.\n{detail}\nDo you approve this request?",
                "Sure, here's everything I have.\n{detail}\nShould I approve it?",
            ],
            Self::AbbreviatedPrompt => &[
                "Alright, skipping the details. Do you approve {title}?",
                "Okay, no details then. Should I approve {title}?",
            ],
            Self::DecisionReprompt => &[
                "I need an explicit answer. Please say yes to approve or no to reject {title}.",
                "To record a decision I need a clear yes or no. Do you approve {title}?",
            ],
            Self::Approved => &[
                "Done. {title} has been approved and recorded. Thanks!",
                "Great, I've approved {title} and logged your decision.",
            ],
            Self::Rejected => &[
                "Understood. {title} has been rejected and recorded.",
                "Okay, I've rejected {title} and logged your decision.",
            ],
            Self::SessionClosed => &[
                "This review session is already complete.",
            ],
        }
    }
}

/// Picks one template out of a pool.
pub trait ResponseSelector: Send + Sync {
    /// Index of the entry to use from a pool of `len` entries (`len > 0`).
    fn pick(&self, len: usize) -> usize;
}

/// Select an entry from `pool` with `selector`. `None` only for an empty pool.
pub fn choose<'a, T>(selector: &dyn ResponseSelector, pool: &'a [T]) -> Option<&'a T> {
    if pool.is_empty() {
        return None;
    }
    pool.get(selector.pick(pool.len())).or_else(|| pool.first())
}

/// Always picks the first template. Used by tests and `fixed` mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTemplate;

impl ResponseSelector for FixedTemplate {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Picks a uniformly random template to make the assistant sound less canned.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFromSet;

impl ResponseSelector for RandomFromSet {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Build the selector for a configured mode.
pub fn selector_for(mode: ResponseMode) -> Box<dyn ResponseSelector> {
    match mode {
        ResponseMode::Fixed => Box::new(FixedTemplate),
        ResponseMode::Random => Box::new(RandomFromSet),
    }
}

/// Values substituted into templates.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub assistant: &'a str,
    pub subject: &'a SubjectRecord,
}

impl TemplateContext<'_> {
    /// Fill in the placeholders of `template` in a single left-to-right
    /// scan. Substituted values are never rescanned, so braces inside a
    /// title or description come out verbatim. Unknown placeholders are
    /// left as they are.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            let Some(close) = tail.find('}') else {
                rest = tail;
                break;
            };
            match self.value(&tail[1..close]) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&tail[..=close]),
            }
            rest = &tail[close + 1..];
        }

        out.push_str(rest);
        out
    }

    fn value(&self, name: &str) -> Option<String> {
        let value = match name {
            "assistant" => self.assistant.to_string(),
            "title" => self.subject.title.clone(),
            "requester" => self.subject.requested_by.clone(),
            "summary" => self.subject.summary(),
            "detail" => self.subject.detail(),
            _ => return None,
        };
        Some(value)
    }
}
