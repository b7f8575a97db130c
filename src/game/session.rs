use std::collections::BTreeMap;

use log::{debug, info};
use serde::Serialize;

use crate::game::node::ActionKind;
use crate::game::script::{EvidenceItem, ROOT_NODE_ID};

pub const METER_MAX: i32 = 100;
pub const METER_MIN: i32 = 0;

/// Presentation label derived from mask integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Pristine,
    Cracked,
    Shattered,
}

impl Stage {
    /// Lower bounds are inclusive: 70 is still pristine, 30 is still cracked.
    pub fn from_integrity(integrity: i32) -> Self {
        if integrity < 30 {
            Stage::Shattered
        } else if integrity < 70 {
            Stage::Cracked
        } else {
            Stage::Pristine
        }
    }
}

/// Mutable state for one play session. Owned by the engine and mutated only
/// through navigation calls and the resolver.
#[derive(Debug, Clone)]
pub struct Session {
    /// `None` means the player is at the hub.
    pub current_suspect_id: Option<String>,
    pub current_dialogue_id: String,
    pub mask_integrity: i32,
    pub suspect_stress: i32,
    /// Session-scoped, not reset per suspect.
    pub strikes: u32,
    pub knowledge: BTreeMap<String, bool>,
    pub evidence: Vec<EvidenceItem>,
    pub last_query: Option<String>,
    /// Suspect's reply to the last strong action, shown instead of the node's baseline text.
    pub last_response: Option<String>,
    pub last_action: Option<ActionKind>,
    pub is_game_over: bool,
    pub game_result: Option<String>,
    /// Bumped on every navigation so stale deferred returns can be recognised.
    pub visit: u64,
}

impl Session {
    pub fn new(starter_evidence: &[EvidenceItem]) -> Self {
        Self {
            current_suspect_id: None,
            current_dialogue_id: ROOT_NODE_ID.into(),
            mask_integrity: METER_MAX,
            suspect_stress: METER_MIN,
            strikes: 0,
            knowledge: BTreeMap::new(),
            evidence: starter_evidence.to_vec(),
            last_query: None,
            last_response: None,
            last_action: None,
            is_game_over: false,
            game_result: None,
            visit: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        Stage::from_integrity(self.mask_integrity)
    }

    pub fn is_at_hub(&self) -> bool {
        self.current_suspect_id.is_none()
    }

    pub fn knows(&self, flag: &str) -> bool {
        self.knowledge.get(flag).copied().unwrap_or(false)
    }

    pub fn has_evidence(&self, id: &str) -> bool {
        self.evidence.iter().any(|e| e.id == id)
    }

    /// Reset the run-level outcome. Evidence and knowledge are left alone.
    pub fn start(&mut self) {
        self.strikes = 0;
        self.is_game_over = false;
        self.game_result = None;
        self.current_suspect_id = None;
        self.visit += 1;
        info!("Session started");
    }

    /// Begin interrogating `suspect_id`. Roster membership is checked by the caller.
    pub fn enter(&mut self, suspect_id: &str) {
        self.current_suspect_id = Some(suspect_id.to_string());
        self.current_dialogue_id = ROOT_NODE_ID.into();
        self.mask_integrity = METER_MAX;
        self.suspect_stress = METER_MIN;
        self.last_query = None;
        self.last_response = None;
        self.last_action = None;
        self.visit += 1;
        info!("Interrogating {suspect_id}");
    }

    pub fn return_to_hub(&mut self) {
        if let Some(id) = self.current_suspect_id.take() {
            info!("Left {id}, back at hub");
        }
        self.visit += 1;
    }

    pub fn clamp_meters(&mut self) {
        let integrity = self.mask_integrity.clamp(METER_MIN, METER_MAX);
        let stress = self.suspect_stress.clamp(METER_MIN, METER_MAX);
        if integrity != self.mask_integrity || stress != self.suspect_stress {
            debug!(
                "Clamped meters: integrity {} -> {integrity}, stress {} -> {stress}",
                self.mask_integrity, self.suspect_stress
            );
        }
        self.mask_integrity = integrity;
        self.suspect_stress = stress;
    }

    /// Set a knowledge flag. Returns `true` if it was not already known.
    pub fn learn(&mut self, flag: &str) -> bool {
        let fresh = !self.knows(flag);
        self.knowledge.insert(flag.to_string(), true);
        if fresh {
            info!("Learned {flag}");
        }
        fresh
    }

    /// Append an evidence item unless one with the same id is already held.
    pub fn add_evidence(&mut self, item: &EvidenceItem) -> bool {
        if self.has_evidence(&item.id) {
            debug!("Evidence {} already held", item.id);
            return false;
        }
        info!("Evidence added: {} ({})", item.name, item.id);
        self.evidence.push(item.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter() -> Vec<EvidenceItem> {
        vec![EvidenceItem::new("key_log", "Keycard Log", "Door access records.")]
    }

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(Stage::from_integrity(100), Stage::Pristine);
        assert_eq!(Stage::from_integrity(70), Stage::Pristine);
        assert_eq!(Stage::from_integrity(69), Stage::Cracked);
        assert_eq!(Stage::from_integrity(30), Stage::Cracked);
        assert_eq!(Stage::from_integrity(29), Stage::Shattered);
        assert_eq!(Stage::from_integrity(0), Stage::Shattered);
    }

    #[test]
    fn test_stage_derivation_exhaustive() {
        for integrity in 0..=100 {
            let stage = Stage::from_integrity(integrity);
            assert_eq!(stage == Stage::Shattered, integrity < 30);
            assert_eq!(stage == Stage::Cracked, (30..70).contains(&integrity));
            assert_eq!(stage == Stage::Pristine, integrity >= 70);
        }
    }

    #[test]
    fn test_enter_resets_meters_but_not_progress() {
        let mut session = Session::new(&starter());
        session.strikes = 2;
        session.mask_integrity = 10;
        session.suspect_stress = 90;
        session.current_dialogue_id = "elsewhere".into();
        session.learn("knows_red_coat");

        session.enter("jean");

        assert_eq!(session.current_suspect_id.as_deref(), Some("jean"));
        assert_eq!(session.current_dialogue_id, ROOT_NODE_ID);
        assert_eq!(session.mask_integrity, 100);
        assert_eq!(session.suspect_stress, 0);
        assert_eq!(session.stage(), Stage::Pristine);
        assert_eq!(session.strikes, 2);
        assert!(session.knows("knows_red_coat"));
    }

    #[test]
    fn test_start_keeps_evidence_and_knowledge() {
        let mut session = Session::new(&starter());
        session.learn("knows_cctv");
        session.add_evidence(&EvidenceItem::new("cctv_still", "Still", "Red coat."));
        session.enter("elena");
        session.strikes = 3;
        session.is_game_over = true;
        session.game_result = Some("GAME OVER".into());

        session.start();

        assert_eq!(session.strikes, 0);
        assert!(!session.is_game_over);
        assert!(session.game_result.is_none());
        assert!(session.is_at_hub());
        assert!(session.knows("knows_cctv"));
        assert_eq!(session.evidence.len(), 2);
    }

    #[test]
    fn test_add_evidence_is_unique() {
        let mut session = Session::new(&starter());
        let item = EvidenceItem::new("cctv_still", "Still", "Red coat.");
        assert!(session.add_evidence(&item));
        assert!(!session.add_evidence(&item));
        assert!(!session.add_evidence(&starter()[0]));
        assert_eq!(session.evidence.iter().filter(|e| e.id == "cctv_still").count(), 1);
        assert_eq!(session.evidence.len(), 2);
    }

    #[test]
    fn test_clamp_meters() {
        let mut session = Session::new(&[]);
        session.mask_integrity = -40;
        session.suspect_stress = 130;
        session.clamp_meters();
        assert_eq!(session.mask_integrity, 0);
        assert_eq!(session.suspect_stress, 100);
    }

    #[test]
    fn test_visit_bumps_on_navigation() {
        let mut session = Session::new(&[]);
        let v0 = session.visit;
        session.enter("beatrice");
        let v1 = session.visit;
        session.return_to_hub();
        assert!(v1 > v0);
        assert!(session.visit > v1);
    }
}
