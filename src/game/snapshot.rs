use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::game::node::ActionKind;
use crate::game::script::{CaseFile, EvidenceItem, ScriptStore, Suspect};
use crate::game::session::{Session, Stage};

/// Hub screen: roster and everything gathered so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubView {
    #[serde(rename = "isHub")]
    pub is_hub: bool,
    pub case: CaseFile,
    pub suspects: Vec<Suspect>,
    pub strikes: u32,
    pub evidence: Vec<EvidenceItem>,
    pub knowledge: BTreeMap<String, bool>,
    pub is_game_over: bool,
    pub game_result: Option<String>,
}

/// Active interrogation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterrogationView {
    #[serde(rename = "isHub")]
    pub is_hub: bool,
    pub suspect: Suspect,
    pub current_dialogue_id: String,
    /// The suspect's current line.
    pub text: String,
    pub last_query: Option<String>,
    pub reward_text: Option<String>,
    pub mask_integrity: i32,
    pub suspect_stress: i32,
    pub stage: Stage,
    pub strikes: u32,
    pub evidence: Vec<EvidenceItem>,
    pub knowledge: BTreeMap<String, bool>,
    pub last_action: Option<ActionKind>,
    pub is_game_over: bool,
    pub game_result: Option<String>,
}

/// Read-only view for presentation layers, built fresh on every read.
/// JSON carries both a `view` tag and an `isHub` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Snapshot {
    Hub(HubView),
    Interrogation(InterrogationView),
}

impl Snapshot {
    pub fn project(session: &Session, store: &ScriptStore) -> Self {
        let Some(suspect_id) = session.current_suspect_id.as_deref() else {
            return Snapshot::Hub(hub(session, store));
        };
        let Some(suspect) = store.suspect(suspect_id) else {
            warn!("Active suspect {suspect_id} is not on the roster");
            return Snapshot::Hub(hub(session, store));
        };

        let node = store
            .script_for(suspect_id)
            .and_then(|s| s.get(&session.current_dialogue_id));
        if node.is_none() {
            debug!(
                "Projecting {suspect_id} without a node at {}",
                session.current_dialogue_id
            );
        }

        let text = session
            .last_response
            .clone()
            .or_else(|| node.map(|n| n.text.clone()))
            .unwrap_or_default();

        Snapshot::Interrogation(InterrogationView {
            is_hub: false,
            suspect: suspect.clone(),
            current_dialogue_id: session.current_dialogue_id.clone(),
            text,
            last_query: session.last_query.clone(),
            reward_text: node.and_then(|n| n.reward_text.clone()),
            mask_integrity: session.mask_integrity,
            suspect_stress: session.suspect_stress,
            stage: session.stage(),
            strikes: session.strikes,
            evidence: session.evidence.clone(),
            knowledge: session.knowledge.clone(),
            last_action: session.last_action,
            is_game_over: session.is_game_over,
            game_result: session.game_result.clone(),
        })
    }

    pub fn is_hub(&self) -> bool {
        matches!(self, Snapshot::Hub(_))
    }

    pub fn strikes(&self) -> u32 {
        match self {
            Snapshot::Hub(h) => h.strikes,
            Snapshot::Interrogation(i) => i.strikes,
        }
    }

    pub fn evidence(&self) -> &[EvidenceItem] {
        match self {
            Snapshot::Hub(h) => &h.evidence,
            Snapshot::Interrogation(i) => &i.evidence,
        }
    }

    pub fn game_result(&self) -> Option<&str> {
        match self {
            Snapshot::Hub(h) => h.game_result.as_deref(),
            Snapshot::Interrogation(i) => i.game_result.as_deref(),
        }
    }
}

fn hub(session: &Session, store: &ScriptStore) -> HubView {
    HubView {
        is_hub: true,
        case: store.case.clone(),
        suspects: store.suspects.clone(),
        strikes: session.strikes,
        evidence: session.evidence.clone(),
        knowledge: session.knowledge.clone(),
        is_game_over: session.is_game_over,
        game_result: session.game_result.clone(),
    }
}
