use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Lower,
    Upper,
}

impl Chamber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }

    /// Bill listing ids start with `H` for House bills and `S` for Senate bills.
    pub fn from_bill_index(index: &str) -> Result<Self> {
        if index.starts_with('H') {
            Ok(Self::Lower)
        } else if index.starts_with('S') {
            Ok(Self::Upper)
        } else {
            Err(anyhow!("Unknown bill type found: {index}"))
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Chamber {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "lower" | "house" => Ok(Self::Lower),
            "upper" | "senate" => Ok(Self::Upper),
            _ => Err(anyhow!("Unknown chamber: {value}")),
        }
    }
}

/// The party responsible for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Lower,
    Upper,
    Executive,
    /// A named office such as "Office of the Legislative Fiscal Analyst".
    Office(String),
    Unknown,
}

impl Actor {
    pub fn chamber(&self) -> Option<Chamber> {
        match self {
            Self::Lower => Some(Chamber::Lower),
            Self::Upper => Some(Chamber::Upper),
            _ => None,
        }
    }
}

impl From<Chamber> for Actor {
    fn from(chamber: Chamber) -> Self {
        match chamber {
            Chamber::Lower => Self::Lower,
            Chamber::Upper => Self::Upper,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lower => f.write_str("lower"),
            Self::Upper => f.write_str("upper"),
            Self::Executive => f.write_str("executive"),
            Self::Office(name) => f.write_str(name),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ActionType {
    #[serde(rename = "introduced")]
    Introduced,
    #[serde(rename = "reading:1")]
    Reading1,
    #[serde(rename = "reading:2")]
    Reading2,
    #[serde(rename = "reading:3")]
    Reading3,
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "referred-to-committee")]
    ReferredToCommittee,
    #[serde(rename = "committee:passed-favorable")]
    CommitteePassedFavorable,
    #[serde(rename = "governor:received")]
    GovernorReceived,
    #[serde(rename = "governor:signed")]
    GovernorSigned,
    #[serde(rename = "governor:vetoed")]
    GovernorVetoed,
    #[serde(rename = "other")]
    Other,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Introduced => "introduced",
            Self::Reading1 => "reading:1",
            Self::Reading2 => "reading:2",
            Self::Reading3 => "reading:3",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::ReferredToCommittee => "referred-to-committee",
            Self::CommitteePassedFavorable => "committee:passed-favorable",
            Self::GovernorReceived => "governor:received",
            Self::GovernorSigned => "governor:signed",
            Self::GovernorVetoed => "governor:vetoed",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Action {
    pub actor: Actor,
    pub description: String,
    pub date: NaiveDate,
    pub types: Vec<ActionType>,
    pub sequence_id: u32,
    pub committee: Option<String>, // set for committee referrals
    /// Every roll call linked from the action's row, in link order.
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BallotKind {
    Yes,
    No,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Ballots {
    pub yes: Vec<String>,
    pub no: Vec<String>,
    pub other: Vec<String>,
}

impl Ballots {
    pub fn get(&self, kind: BallotKind) -> &[String] {
        match kind {
            BallotKind::Yes => &self.yes,
            BallotKind::No => &self.no,
            BallotKind::Other => &self.other,
        }
    }
}

/// A recorded roll-call. Exactly one of `chamber` and `location` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Vote {
    pub chamber: String,
    pub location: String,
    pub date: NaiveDate,
    pub motion: String,
    pub passed: bool,
    pub yes_count: u32,
    pub no_count: u32,
    pub other_count: u32,
    pub ballots: Ballots,
    pub committee: Option<String>,
    pub sources: Vec<String>,
    pub sequence_id: u32,
}

impl Vote {
    pub fn count(&self, kind: BallotKind) -> u32 {
        match kind {
            BallotKind::Yes => self.yes_count,
            BallotKind::No => self.no_count,
            BallotKind::Other => self.other_count,
        }
    }
}

/// One heading/table pair of a vote page before it is folded into a [`Vote`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteCategory {
    pub label: Option<String>,
    pub count: Option<u32>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    Bill,
    Resolution,
    ConcurrentResolution,
    JointResolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sponsor {
    pub role: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BillVersion {
    pub name: String,
    pub url: String,
    pub mimetype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BillDocument {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bill {
    pub session: String,
    pub chamber: Chamber,
    pub bill_id: String,
    pub title: String,
    pub bill_type: BillType,
    pub sponsors: Vec<Sponsor>,
    pub versions: Vec<BillVersion>,
    pub documents: Vec<BillDocument>,
    pub subjects: Vec<String>,
    pub sources: Vec<String>,
    pub actions: Vec<Action>,
}

impl Bill {
    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.actions.iter().flat_map(|action| action.votes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chamber_from_bill_index() {
        assert_eq!(Chamber::from_bill_index("HB0012").unwrap(), Chamber::Lower);
        assert_eq!(Chamber::from_bill_index("SJR002").unwrap(), Chamber::Upper);
        assert!(Chamber::from_bill_index("LFA").is_err());
    }

    #[test]
    fn chamber_accepts_chamber_names() {
        assert_eq!("house".parse::<Chamber>().unwrap(), Chamber::Lower);
        assert_eq!("upper".parse::<Chamber>().unwrap(), Chamber::Upper);
        assert!("joint".parse::<Chamber>().is_err());
    }

    #[test]
    fn action_types_serialize_to_taxonomy_tags() {
        let tags = [ActionType::Reading1, ActionType::CommitteePassedFavorable];
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["reading:1","committee:passed-favorable"]"#);
        assert_eq!(ActionType::GovernorVetoed.to_string(), "governor:vetoed");
    }

    #[test]
    fn vote_counts_by_ballot_kind() {
        let vote = Vote {
            chamber: "upper".to_string(),
            location: String::new(),
            date: NaiveDate::from_ymd_opt(2015, 2, 20).unwrap(),
            motion: "passed 2nd reading".to_string(),
            passed: true,
            yes_count: 2,
            no_count: 0,
            other_count: 1,
            ballots: Ballots {
                yes: vec!["Evans".to_string(), "Fox".to_string()],
                no: Vec::new(),
                other: vec!["Grant".to_string()],
            },
            committee: None,
            sources: Vec::new(),
            sequence_id: 5,
        };
        for kind in [BallotKind::Yes, BallotKind::No, BallotKind::Other] {
            assert_eq!(vote.count(kind) as usize, vote.ballots.get(kind).len());
        }
    }
}
