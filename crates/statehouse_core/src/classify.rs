//! Maps status-table action text onto the normalized action taxonomy.
//!
//! Rules are tried top to bottom and the first match wins, so more specific
//! phrasings (`passed 2nd & 3rd readings`) sit above looser ones (`2nd reading`).

use crate::error::ScrapeError;
use crate::schema::{ActionType, Actor, Chamber};
use regex::Regex;
use tracing::warn;

const LFA: &str = "Office of the Legislative Fiscal Analyst";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub actor: Actor,
    pub description: String,
    pub types: Vec<ActionType>,
    pub committee: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl Matcher {
    fn matches(self, text: &str) -> bool {
        match self {
            Matcher::Exact(value) => text == value,
            Matcher::Prefix(value) => text.starts_with(value),
            Matcher::Contains(value) => text.contains(value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Tags(&'static [ActionType]),
    /// The executive acts no matter which chamber prefixed the row.
    Executive(&'static [ActionType]),
    CommitteeReferral,
}

const RULES: &[(Matcher, Outcome)] = &[
    (Matcher::Exact("Governor Signed"), Outcome::Executive(&[ActionType::GovernorSigned])),
    (Matcher::Exact("Governor Vetoed"), Outcome::Executive(&[ActionType::GovernorVetoed])),
    (
        Matcher::Prefix("1st reading"),
        Outcome::Tags(&[ActionType::Introduced, ActionType::Reading1]),
    ),
    (Matcher::Exact("to Governor"), Outcome::Tags(&[ActionType::GovernorReceived])),
    (Matcher::Exact("passed 3rd reading"), Outcome::Tags(&[ActionType::Passed])),
    (Matcher::Prefix("passed 2nd & 3rd readings"), Outcome::Tags(&[ActionType::Passed])),
    (Matcher::Exact("to standing committee"), Outcome::CommitteeReferral),
    (Matcher::Prefix("2nd reading"), Outcome::Tags(&[ActionType::Reading2])),
    (Matcher::Prefix("3rd reading"), Outcome::Tags(&[ActionType::Reading3])),
    (Matcher::Exact("failed"), Outcome::Tags(&[ActionType::Failed])),
    (
        Matcher::Prefix("2nd & 3rd readings"),
        Outcome::Tags(&[ActionType::Reading2, ActionType::Reading3]),
    ),
    (Matcher::Exact("passed 2nd reading"), Outcome::Tags(&[ActionType::Reading2])),
    (
        Matcher::Contains("Comm - Favorable Recommendation"),
        Outcome::Tags(&[ActionType::CommitteePassedFavorable]),
    ),
    (
        Matcher::Exact("committee report favorable"),
        Outcome::Tags(&[ActionType::CommitteePassedFavorable]),
    ),
];

pub struct Classifier {
    committee_hover: Regex,
}

impl Classifier {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            committee_hover: Regex::new(r"^writetxt\('(.*)'\)")?,
        })
    }

    /// Classifies one action cell.
    ///
    /// `hover` is the `onmouseover` payload of the row's committee link, if the
    /// row has one; it is only consulted for committee referrals.
    pub fn classify(&self, raw: &str, home: Chamber, hover: Option<&str>) -> Classification {
        let (mut actor, text) = split_actor(raw, home);
        let mut description = text.to_string();
        let mut committee = None;

        let outcome = RULES
            .iter()
            .find(|(matcher, _)| matcher.matches(text))
            .map(|(_, outcome)| *outcome);

        let types = match outcome {
            Some(Outcome::Tags(tags)) => tags.to_vec(),
            Some(Outcome::Executive(tags)) => {
                actor = Actor::Executive;
                tags.to_vec()
            }
            Some(Outcome::CommitteeReferral) => {
                match hover.and_then(|payload| self.committee_name(payload)) {
                    Some(name) => {
                        description = format!("to {name}");
                        committee = Some(name);
                    }
                    None => warn!(action = text, "committee referral without committee link"),
                }
                vec![ActionType::ReferredToCommittee]
            }
            None => vec![ActionType::Other],
        };

        Classification {
            actor,
            description,
            types,
            committee,
        }
    }

    fn committee_name(&self, hover: &str) -> Option<String> {
        self.committee_hover
            .captures(hover)
            .and_then(|caps| caps.get(1))
            .map(|name| name.as_str().to_string())
    }
}

/// Splits `"House/to standing committee"` into its actor and action text.
pub fn split_actor(raw: &str, home: Chamber) -> (Actor, &str) {
    let Some((token, rest)) = raw.split_once('/') else {
        return (Actor::from(home), raw.trim());
    };

    let actor = match token.trim() {
        "House" => Actor::Lower,
        "Senate" => Actor::Upper,
        "LFA" => Actor::Office(LFA.to_string()),
        "" => Actor::Unknown,
        other => Actor::Office(other.to_string()),
    };
    (actor, rest.trim())
}
