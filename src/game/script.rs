use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::game::node::DialogueNode;

/// Every script starts here when a suspect is selected.
pub const ROOT_NODE_ID: &str = "root";

/// Conventional target for outcomes that end an interrogation in a shutdown.
pub const SHUTDOWN_NODE_ID: &str = "shutdown";

/// Roster entry shown in the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspect {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// A clue the detective can present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl EvidenceItem {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Header text for the hub screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    pub title: String,
    pub synopsis: String,
}

/// One suspect's dialogue graph: a map of node-id -> DialogueNode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub nodes: HashMap<String, DialogueNode>,
}

impl Script {
    pub fn get(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&DialogueNode> {
        self.get(ROOT_NODE_ID)
    }

    /// Check that the root exists and every `next` id resolves.
    pub fn validate(&self) -> Result<()> {
        if self.root().is_none() {
            bail!("script has no '{ROOT_NODE_ID}' node");
        }
        for (id, node) in &self.nodes {
            for next in node.next_ids() {
                if !self.nodes.contains_key(next) {
                    bail!("node '{id}' points to missing node '{next}'");
                }
            }
        }
        Ok(())
    }
}

/// All static content for one mystery: roster, scripts, starter evidence and
/// the table of knowledge flags that hand out new evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptStore {
    #[serde(default)]
    pub case: CaseFile,
    /// Hub order.
    pub suspects: Vec<Suspect>,
    pub scripts: HashMap<String, Script>,
    #[serde(default)]
    pub starter_evidence: Vec<EvidenceItem>,
    /// Knowledge flag -> evidence item added when the flag is first set.
    #[serde(default)]
    pub unlocks: HashMap<String, EvidenceItem>,
}

impl ScriptStore {
    pub fn script_for(&self, suspect_id: &str) -> Option<&Script> {
        self.scripts.get(suspect_id)
    }

    pub fn suspect(&self, suspect_id: &str) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.id == suspect_id)
    }

    pub fn evidence_for_flag(&self, flag: &str) -> Option<&EvidenceItem> {
        self.unlocks.get(flag)
    }

    /// Validate every script and the evidence tables.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for suspect in &self.suspects {
            if !seen.insert(suspect.id.as_str()) {
                bail!("suspect '{}' is listed twice", suspect.id);
            }
            let script = self
                .script_for(&suspect.id)
                .with_context(|| format!("suspect '{}' has no script", suspect.id))?;
            script
                .validate()
                .with_context(|| format!("invalid script for '{}'", suspect.id))?;
        }

        let mut ids = HashSet::new();
        for item in &self.starter_evidence {
            if !ids.insert(item.id.as_str()) {
                bail!("starter evidence '{}' is listed twice", item.id);
            }
        }
        for (flag, item) in &self.unlocks {
            if !ids.insert(item.id.as_str()) {
                bail!("flag '{flag}' unlocks evidence '{}' which already exists", item.id);
            }
        }

        debug!(
            "Validated {} suspects, {} starter evidence, {} unlocks",
            self.suspects.len(),
            self.starter_evidence.len(),
            self.unlocks.len()
        );
        Ok(())
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let store: ScriptStore =
            serde_json::from_str(raw).context("failed to parse case JSON")?;
        store.validate()?;
        Ok(store)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read case file {}", path.display()))?;
        let store = Self::from_json_str(&raw)
            .with_context(|| format!("failed to load case file {}", path.display()))?;
        info!(
            "Loaded case '{}' from {} ({} suspects)",
            store.case.title,
            path.display(),
            store.suspects.len()
        );
        Ok(store)
    }
}
