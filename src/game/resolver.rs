use log::{debug, info, warn};

use crate::game::engine::EngineConfig;
use crate::game::node::{ActionKind, NodeResult};
use crate::game::script::{ScriptStore, SHUTDOWN_NODE_ID};
use crate::game::session::{Session, METER_MAX, METER_MIN};

pub const DEFEAT_MESSAGE: &str = "GAME OVER: TOO MANY MISTAKES";
pub const VICTORY_RESULT: &str = "VICTORY";

/// Shown as the detective's line when an outcome has no query of its own.
const SILENT_QUERY: &str = "...";

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// How a line of questioning finished on this action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndKind {
    Victory,
    Strike,
    /// An ordinary ending with reward text; the engine schedules the return.
    Reward,
}

/// UI-facing deltas of a strong action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub from: String,
    pub to: String,
    pub query: String,
    pub damage: i32,
    pub stress: i32,
    /// A strike was awarded by this action.
    pub strike: bool,
    pub game_over: bool,
    pub ended: Option<EndKind>,
    pub unlocked: Vec<String>,
    pub evidence_added: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReport {
    /// Nothing to act on: hub, game over, or unresolved node.
    Ignored,
    /// The node does not react to this choice. Carries stress after the penalty.
    Weak { stress: i32 },
    Strong(Resolution),
}

impl ActionReport {
    /// Whether the engine should schedule the delayed return to the hub.
    pub fn schedules_return(&self) -> bool {
        matches!(
            self,
            ActionReport::Strong(Resolution {
                ended: Some(EndKind::Reward),
                game_over: false,
                ..
            })
        )
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Apply one player choice to the session.
pub fn resolve(
    session: &mut Session,
    store: &ScriptStore,
    config: &EngineConfig,
    kind: ActionKind,
    choice_id: &str,
) -> ActionReport {
    if session.is_game_over {
        debug!("Ignoring {kind:?} '{choice_id}': game is over");
        return ActionReport::Ignored;
    }
    let Some(suspect_id) = session.current_suspect_id.clone() else {
        debug!("Ignoring {kind:?} '{choice_id}': no suspect selected");
        return ActionReport::Ignored;
    };
    let Some(script) = store.script_for(&suspect_id) else {
        warn!("No script for suspect {suspect_id}");
        return ActionReport::Ignored;
    };
    let Some(node) = script.get(&session.current_dialogue_id) else {
        warn!(
            "Node {} missing from {suspect_id}'s script",
            session.current_dialogue_id
        );
        return ActionReport::Ignored;
    };

    session.last_action = Some(kind);

    let Some(outcome) = node.reaction(kind, choice_id) else {
        session.suspect_stress = session.suspect_stress.saturating_add(config.weak_action_stress);
        session.clamp_meters();
        debug!(
            "{suspect_id} ignores {kind:?} '{choice_id}' at {} (stress {})",
            session.current_dialogue_id, session.suspect_stress
        );
        return ActionReport::Weak {
            stress: session.suspect_stress,
        };
    };

    let mut res = Resolution {
        from: session.current_dialogue_id.clone(),
        query: outcome.query.clone().unwrap_or_else(|| SILENT_QUERY.into()),
        damage: outcome.damage,
        stress: outcome.stress,
        ..Default::default()
    };

    session.mask_integrity = session.mask_integrity.saturating_sub(outcome.damage);
    session.suspect_stress = session.suspect_stress.saturating_add(outcome.stress);
    session.last_query = Some(res.query.clone());
    if let Some(text) = &outcome.text {
        session.last_response = Some(text.clone());
    }

    // Checked on the raw value, before clamping.
    if session.suspect_stress >= METER_MAX && outcome.next.as_deref() == Some(SHUTDOWN_NODE_ID) {
        info!("{suspect_id} shuts down (stress {})", session.suspect_stress);
        session.suspect_stress = METER_MIN;
        strike(session, config, &mut res);
        if res.game_over {
            session.clamp_meters();
            return ActionReport::Strong(res);
        }
    }

    session.clamp_meters();

    if let Some(flag) = &outcome.unlock {
        grant(session, store, flag, &mut res);
    }

    if let Some(next) = &outcome.next {
        session.current_dialogue_id = next.clone();
    }
    res.to = session.current_dialogue_id.clone();
    info!(
        "Transition: {suspect_id} {} -> {} (integrity {}, stress {}, {:?})",
        res.from,
        res.to,
        session.mask_integrity,
        session.suspect_stress,
        session.stage()
    );

    // A shutdown strike already ended this interrogation.
    if res.strike {
        return ActionReport::Strong(res);
    }

    let Some(arrived) = script.get(&session.current_dialogue_id) else {
        warn!(
            "{suspect_id}: transition to missing node {}",
            session.current_dialogue_id
        );
        return ActionReport::Strong(res);
    };

    if outcome.next.is_some() {
        if let Some(flag) = &arrived.unlock {
            grant(session, store, flag, &mut res);
        }
    }

    if arrived.is_end {
        match arrived.result {
            Some(NodeResult::Victory) => {
                info!("{suspect_id} unmasked: victory");
                session.is_game_over = true;
                session.game_result = Some(VICTORY_RESULT.into());
                res.game_over = true;
                res.ended = Some(EndKind::Victory);
            }
            Some(NodeResult::Strike) => {
                res.ended = Some(EndKind::Strike);
                strike(session, config, &mut res);
            }
            None => {
                debug!("{suspect_id}: line of questioning closed at {}", res.to);
                res.ended = Some(EndKind::Reward);
            }
        }
    }

    ActionReport::Strong(res)
}

fn strike(session: &mut Session, config: &EngineConfig, res: &mut Resolution) {
    session.strikes += 1;
    res.strike = true;
    info!("Strike {} of {}", session.strikes, config.strike_limit);
    session.return_to_hub();
    if session.strikes >= config.strike_limit {
        info!("Strike limit reached, game over");
        session.is_game_over = true;
        session.game_result = Some(DEFEAT_MESSAGE.into());
        res.game_over = true;
    }
}

/// Set a knowledge flag and hand out whatever evidence the case ties to it.
fn grant(session: &mut Session, store: &ScriptStore, flag: &str, res: &mut Resolution) {
    if session.learn(flag) {
        res.unlocked.push(flag.to_string());
    }
    if let Some(item) = store.evidence_for_flag(flag) {
        if session.add_evidence(item) {
            res.evidence_added.push(item.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::case404::case_404;
    use crate::game::node::{Approach, DialogueNode, Outcome};
    use crate::game::script::{Script, Suspect, ROOT_NODE_ID};
    use crate::game::session::Stage;

    fn setup(suspect: &str) -> (Session, ScriptStore, EngineConfig) {
        let store = case_404();
        let mut session = Session::new(&store.starter_evidence);
        session.enter(suspect);
        (session, store, EngineConfig::default())
    }

    fn approach(s: &mut Session, store: &ScriptStore, cfg: &EngineConfig, a: &str) -> ActionReport {
        resolve(s, store, cfg, ActionKind::Approach, a)
    }

    fn present(s: &mut Session, store: &ScriptStore, cfg: &EngineConfig, e: &str) -> ActionReport {
        resolve(s, store, cfg, ActionKind::Evidence, e)
    }

    #[test]
    fn test_beatrice_confession() {
        let (mut s, store, cfg) = setup("beatrice");

        approach(&mut s, &store, &cfg, "pry");
        assert_eq!(s.mask_integrity, 70);
        assert_eq!(s.suspect_stress, 30);
        assert_eq!(s.stage(), Stage::Pristine);
        assert_eq!(s.current_dialogue_id, "beatrice_theft");

        let report = approach(&mut s, &store, &cfg, "probe");
        assert_eq!(s.mask_integrity, 0);
        assert_eq!(s.stage(), Stage::Shattered);
        assert_eq!(s.current_dialogue_id, "beatrice_confess");
        assert!(s.knows("knows_red_coat"));
        assert!(report.schedules_return());
        match report {
            ActionReport::Strong(res) => {
                assert_eq!(res.ended, Some(EndKind::Reward));
                assert_eq!(res.unlocked, vec!["knows_red_coat".to_string()]);
                assert!(res.evidence_added.is_empty());
            }
            other => panic!("expected strong action, got {other:?}"),
        }
        // Knowledge only, no new evidence.
        assert_eq!(s.evidence.len(), 3);
        assert!(!s.is_game_over);
    }

    #[test]
    fn test_unrecognized_evidence_at_jean_root() {
        let (mut s, store, cfg) = setup("jean");
        let report = present(&mut s, &store, &cfg, "wrapper");
        assert_eq!(report, ActionReport::Weak { stress: 5 });
        assert_eq!(s.current_dialogue_id, ROOT_NODE_ID);
        assert_eq!(s.suspect_stress, 5);
        assert_eq!(s.mask_integrity, 100);
        assert!(s.last_query.is_none());
    }

    #[test]
    fn test_weak_action_keeps_last_query() {
        let (mut s, store, cfg) = setup("jean");
        approach(&mut s, &store, &cfg, "pry");
        let query = s.last_query.clone();
        assert!(query.is_some());
        approach(&mut s, &store, &cfg, "pry");
        assert_eq!(s.current_dialogue_id, "jean_desk");
        assert_eq!(s.last_query, query);
        assert_eq!(s.suspect_stress, 25);
    }

    #[test]
    fn test_weak_action_stress_is_clamped() {
        let (mut s, store, cfg) = setup("jean");
        for _ in 0..30 {
            present(&mut s, &store, &cfg, "autopsy");
            assert!(s.suspect_stress <= 100);
            assert_eq!(s.current_dialogue_id, ROOT_NODE_ID);
        }
        assert_eq!(s.suspect_stress, 100);
    }

    #[test]
    fn test_unknown_approach_name_is_weak() {
        let (mut s, store, cfg) = setup("beatrice");
        let report = approach(&mut s, &store, &cfg, "flatter");
        assert_eq!(report, ActionReport::Weak { stress: 5 });
    }

    #[test]
    fn test_jean_unlocks_cctv_evidence() {
        let (mut s, store, cfg) = setup("jean");
        present(&mut s, &store, &cfg, "key_log");
        assert_eq!(s.current_dialogue_id, "jean_cameras");
        let report = approach(&mut s, &store, &cfg, "probe");
        assert!(s.knows("knows_cctv"));
        assert!(s.has_evidence("cctv_still"));
        assert_eq!(s.evidence.len(), 4);
        assert!(report.schedules_return());
    }

    #[test]
    fn test_unlock_twice_adds_evidence_once() {
        let (mut s, store, cfg) = setup("jean");
        present(&mut s, &store, &cfg, "key_log");
        approach(&mut s, &store, &cfg, "probe");

        s.enter("jean");
        present(&mut s, &store, &cfg, "key_log");
        let report = approach(&mut s, &store, &cfg, "probe");

        assert_eq!(s.evidence.iter().filter(|e| e.id == "cctv_still").count(), 1);
        match report {
            ActionReport::Strong(res) => {
                assert!(res.unlocked.is_empty());
                assert!(res.evidence_added.is_empty());
            }
            other => panic!("expected strong action, got {other:?}"),
        }
    }

    #[test]
    fn test_shutdown_by_stress_strikes_once() {
        let (mut s, store, cfg) = setup("beatrice");
        approach(&mut s, &store, &cfg, "provoke");
        assert_eq!(s.suspect_stress, 45);
        let report = approach(&mut s, &store, &cfg, "provoke");

        assert_eq!(s.strikes, 1);
        assert!(s.is_at_hub());
        assert_eq!(s.suspect_stress, 0);
        assert!(!s.is_game_over);
        match report {
            ActionReport::Strong(res) => {
                assert!(res.strike);
                // The shutdown node's STRIKE result must not count again.
                assert_eq!(res.ended, None);
            }
            other => panic!("expected strong action, got {other:?}"),
        }
    }

    #[test]
    fn test_shutdown_node_below_max_stress_strikes_once() {
        let (mut s, store, cfg) = setup("jean");
        approach(&mut s, &store, &cfg, "pry");
        let report = approach(&mut s, &store, &cfg, "provoke");

        assert_eq!(s.strikes, 1);
        assert!(s.is_at_hub());
        match report {
            ActionReport::Strong(res) => {
                assert!(res.strike);
                assert_eq!(res.ended, Some(EndKind::Strike));
            }
            other => panic!("expected strong action, got {other:?}"),
        }
    }

    #[test]
    fn test_three_strikes_end_the_session() {
        let (mut s, store, cfg) = setup("beatrice");
        for round in 1..=3 {
            s.enter("beatrice");
            approach(&mut s, &store, &cfg, "provoke");
            approach(&mut s, &store, &cfg, "provoke");
            assert_eq!(s.strikes, round);
            assert_eq!(s.is_game_over, round >= 3);
        }
        assert_eq!(s.game_result.as_deref(), Some(DEFEAT_MESSAGE));

        s.enter("jean");
        assert_eq!(approach(&mut s, &store, &cfg, "pry"), ActionReport::Ignored);
    }

    #[test]
    fn test_elena_victory() {
        let (mut s, store, cfg) = setup("elena");
        s.add_evidence(store.evidence_for_flag("knows_cctv").unwrap());
        s.add_evidence(store.evidence_for_flag("knows_penthouse").unwrap());

        present(&mut s, &store, &cfg, "cctv_still");
        assert_eq!(s.current_dialogue_id, "elena_cornered");
        let report = present(&mut s, &store, &cfg, "room_service_slip");

        assert!(s.is_game_over);
        assert_eq!(s.game_result.as_deref(), Some(VICTORY_RESULT));
        assert!(!report.schedules_return());
    }

    #[test]
    fn test_hub_is_ignored() {
        let (mut s, store, cfg) = setup("jean");
        s.return_to_hub();
        assert_eq!(approach(&mut s, &store, &cfg, "pry"), ActionReport::Ignored);
        assert_eq!(s.suspect_stress, 0);
    }

    #[test]
    fn test_meters_stay_in_range() {
        let (mut s, store, cfg) = setup("elena");
        let moves = ["provoke", "probe", "pry", "probe", "provoke", "probe", "pry", "pry"];
        for m in moves {
            if s.is_at_hub() {
                s.enter("elena");
            }
            approach(&mut s, &store, &cfg, m);
            assert!((0..=100).contains(&s.mask_integrity));
            assert!((0..=100).contains(&s.suspect_stress));
        }
    }

    fn one_node_store(outcome: Outcome) -> ScriptStore {
        let mut root = DialogueNode::default();
        root.approaches.insert(Approach::Pry, outcome);
        let mut script = Script::default();
        script.nodes.insert(ROOT_NODE_ID.into(), root);
        let mut store = ScriptStore::default();
        store.suspects.push(Suspect {
            id: "x".into(),
            name: "X".into(),
            role: "Test".into(),
        });
        store.scripts.insert("x".into(), script);
        store
    }

    #[test]
    fn test_dangling_next_is_safe() {
        let store = one_node_store(Outcome {
            damage: 10,
            next: Some("nowhere".into()),
            ..Default::default()
        });
        let cfg = EngineConfig::default();
        let mut s = Session::new(&[]);
        s.enter("x");

        let report = resolve(&mut s, &store, &cfg, ActionKind::Approach, "pry");
        assert!(matches!(report, ActionReport::Strong(_)));
        assert_eq!(s.current_dialogue_id, "nowhere");
        assert_eq!(s.mask_integrity, 90);

        // The node no longer resolves, so nothing more happens.
        let report = resolve(&mut s, &store, &cfg, ActionKind::Approach, "pry");
        assert_eq!(report, ActionReport::Ignored);
        assert_eq!(s.mask_integrity, 90);
    }

    #[test]
    fn test_final_shutdown_still_clamps() {
        let store = one_node_store(Outcome {
            damage: 150,
            stress: 150,
            next: Some(SHUTDOWN_NODE_ID.into()),
            ..Default::default()
        });
        let cfg = EngineConfig::default();
        let mut s = Session::new(&[]);
        s.enter("x");
        s.strikes = cfg.strike_limit - 1;

        let report = resolve(&mut s, &store, &cfg, ActionKind::Approach, "pry");
        assert!(matches!(report, ActionReport::Strong(Resolution { game_over: true, .. })));
        assert!(s.is_game_over);
        assert_eq!(s.mask_integrity, 0);
        assert_eq!(s.suspect_stress, 0);
        assert_eq!(s.stage(), Stage::Shattered);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let store = one_node_store(Outcome {
            damage: i32::MIN,
            stress: i32::MAX,
            ..Default::default()
        });
        let cfg = EngineConfig::default();
        let mut s = Session::new(&[]);
        s.enter("x");

        resolve(&mut s, &store, &cfg, ActionKind::Approach, "pry");
        assert_eq!(s.mask_integrity, 100);
        assert_eq!(s.suspect_stress, 100);

        let weak = EngineConfig {
            weak_action_stress: i32::MAX,
            ..EngineConfig::default()
        };
        let report = resolve(&mut s, &store, &weak, ActionKind::Approach, "probe");
        assert_eq!(report, ActionReport::Weak { stress: 100 });
    }

    #[test]
    fn test_missing_query_defaults() {
        let store = one_node_store(Outcome {
            stress: 10,
            ..Default::default()
        });
        let cfg = EngineConfig::default();
        let mut s = Session::new(&[]);
        s.enter("x");

        resolve(&mut s, &store, &cfg, ActionKind::Approach, "pry");
        assert_eq!(s.last_query.as_deref(), Some("..."));
        assert_eq!(s.current_dialogue_id, ROOT_NODE_ID);
        assert_eq!(s.suspect_stress, 10);
    }
}
