use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three interrogation tactics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    Probe,
    Pry,
    Provoke,
}

impl Approach {
    pub fn as_str(self) -> &'static str {
        match self {
            Approach::Probe => "probe",
            Approach::Pry => "pry",
            Approach::Provoke => "provoke",
        }
    }
}

impl FromStr for Approach {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "probe" => Ok(Approach::Probe),
            "pry" => Ok(Approach::Pry),
            "provoke" => Ok(Approach::Provoke),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which table of a node a player choice is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Approach,
    Evidence,
}

/// Special terminal outcome of an end node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeResult {
    Victory,
    Strike,
}

/// What happens when a node reacts to an approach or a piece of evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Outcome {
    /// The detective's line, replayed by the UI.
    pub query: Option<String>,
    /// The suspect's reply.
    pub text: Option<String>,
    /// Mask integrity lost.
    pub damage: i32,
    /// Stress gained (may be negative).
    pub stress: i32,
    /// Node to move to. `None` keeps the current node.
    pub next: Option<String>,
    /// Knowledge flag granted by this outcome.
    pub unlock: Option<String>,
}

/// A single node in a suspect's dialogue graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueNode {
    /// The suspect's baseline line at this node.
    pub text: String,
    pub approaches: BTreeMap<Approach, Outcome>,
    /// Keyed by evidence item id.
    pub evidence: BTreeMap<String, Outcome>,
    #[serde(rename = "isEnd")]
    pub is_end: bool,
    pub result: Option<NodeResult>,
    /// Knowledge flag granted on reaching this node.
    pub unlock: Option<String>,
    #[serde(rename = "rewardText")]
    pub reward_text: Option<String>,
}

impl DialogueNode {
    /// Find the outcome for a player choice. Unknown approach names never match.
    pub fn reaction(&self, kind: ActionKind, choice_id: &str) -> Option<&Outcome> {
        match kind {
            ActionKind::Approach => choice_id
                .parse::<Approach>()
                .ok()
                .and_then(|a| self.approaches.get(&a)),
            ActionKind::Evidence => self.evidence.get(choice_id),
        }
    }

    /// All `next` ids referenced by this node's outcomes.
    pub fn next_ids(&self) -> impl Iterator<Item = &str> {
        self.approaches
            .values()
            .chain(self.evidence.values())
            .filter_map(|o| o.next.as_deref())
    }
}
