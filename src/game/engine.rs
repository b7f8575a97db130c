use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::game::node::ActionKind;
use crate::game::resolver::{self, ActionReport};
use crate::game::script::ScriptStore;
use crate::game::session::Session;
use crate::game::snapshot::Snapshot;

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long reward text stays up before the automatic return to the hub.
    pub auto_return_delay: Duration,
    /// Stress added when a node does not react to the player's choice.
    pub weak_action_stress: i32,
    /// Strikes that end the session in defeat.
    pub strike_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_return_delay: Duration::from_millis(4000),
            weak_action_stress: 5,
            strike_limit: 3,
        }
    }
}

/// A return to the hub waiting for its deadline. Only valid for the visit
/// it was scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingReturn {
    due: Instant,
    visit: u64,
}

// ---------------------------------------------------------------------------
// Interrogation engine
// ---------------------------------------------------------------------------

/// Owns the case content and the live session, and is the only way to change
/// either.
pub struct Interrogation {
    store: ScriptStore,
    session: Session,
    config: EngineConfig,
    pending_return: Option<PendingReturn>,
}

impl Interrogation {
    pub fn new(store: ScriptStore, config: EngineConfig) -> Self {
        let session = Session::new(&store.starter_evidence);
        Self {
            store,
            session,
            config,
            pending_return: None,
        }
    }

    pub fn store(&self) -> &ScriptStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn start_session(&mut self) {
        self.cancel_pending_return();
        self.session.start();
    }

    /// Unknown suspects and finished games are ignored.
    pub fn select_suspect(&mut self, id: &str) {
        if self.session.is_game_over {
            warn!("Cannot select {id}: game is over");
            return;
        }
        if self.store.suspect(id).is_none() {
            warn!("Unknown suspect {id}");
            return;
        }
        self.cancel_pending_return();
        self.session.enter(id);
    }

    pub fn return_to_hub(&mut self) {
        self.cancel_pending_return();
        self.session.return_to_hub();
    }

    pub fn perform_action(&mut self, kind: ActionKind, choice_id: &str) -> ActionReport {
        self.perform_action_at(kind, choice_id, Instant::now())
    }

    /// Like [`perform_action`](Self::perform_action), with the clock reading
    /// used to schedule any automatic return.
    pub fn perform_action_at(
        &mut self,
        kind: ActionKind,
        choice_id: &str,
        now: Instant,
    ) -> ActionReport {
        let report = resolver::resolve(
            &mut self.session,
            &self.store,
            &self.config,
            kind,
            choice_id,
        );

        if self.session.is_at_hub() || self.session.is_game_over {
            self.cancel_pending_return();
        }
        if report.schedules_return() {
            let due = now + self.config.auto_return_delay;
            debug!("Auto-return scheduled in {:?}", self.config.auto_return_delay);
            self.pending_return = Some(PendingReturn {
                due,
                visit: self.session.visit,
            });
        }
        report
    }

    /// When the pending automatic return will fire, if one is scheduled.
    pub fn pending_return_deadline(&self) -> Option<Instant> {
        self.pending_return.map(|p| p.due)
    }

    /// Fire the automatic return if it is due. Returns `true` if it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending_return else {
            return false;
        };
        if now < pending.due {
            return false;
        }
        self.pending_return = None;
        if pending.visit != self.session.visit {
            debug!("Dropping stale auto-return");
            return false;
        }
        info!("Auto-return to hub");
        self.session.return_to_hub();
        true
    }

    pub fn get_state(&self) -> Snapshot {
        Snapshot::project(&self.session, &self.store)
    }

    fn cancel_pending_return(&mut self) {
        if self.pending_return.take().is_some() {
            debug!("Cancelled pending auto-return");
        }
    }
}
