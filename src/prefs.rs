//! The persisted consensus-tab preference and its change broadcast.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::error::{DemoError, DemoResult};

/// Storage key of the selected consensus-demo tab.
pub const CONSENSUS_TAB_KEY: &str = "demochain.consensus.tab";

/// Tab shown when nothing has been stored yet.
pub const DEFAULT_CONSENSUS_TAB: &str = "pow";

pub const CONSENSUS_TABS: [&str; 5] = ["pow", "pos", "dpos", "bft", "poh"];

/// Sent to every subscriber after a successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceChanged {
    pub key: String,
    pub value: String,
}

/// String preferences, optionally mirrored to a JSON file.
pub struct PreferenceStore {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
    subscribers: Mutex<Vec<Sender<PreferenceChanged>>>,
}

impl PreferenceStore {
    /// Load from `path` if it exists. A missing or unreadable file starts empty.
    pub fn open(path: Option<PathBuf>) -> Self {
        let values: BTreeMap<String, String> = path
            .as_ref()
            .and_then(|p| match fs::read_to_string(p) {
                Ok(raw) => match serde_json::from_str(&raw) {
                    Ok(map) => Some(map),
                    Err(e) => {
                        warn!("PREFS - ignoring corrupt {}: {e}", p.display());
                        None
                    }
                },
                Err(_) => None,
            })
            .unwrap_or_default();
        Self {
            path,
            values: Mutex::new(values),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("mutex poisoned")
            .get(key)
            .cloned()
    }

    pub fn consensus_tab(&self) -> String {
        self.get(CONSENSUS_TAB_KEY)
            .unwrap_or_else(|| DEFAULT_CONSENSUS_TAB.to_string())
    }

    pub fn set_consensus_tab(&self, tab: &str) -> DemoResult<()> {
        if !CONSENSUS_TABS.contains(&tab) {
            return Err(DemoError::InvalidInput(format!(
                "unknown consensus tab '{tab}'"
            )));
        }
        self.set(CONSENSUS_TAB_KEY, tab)
    }

    /// Persist, store, then notify subscribers. The file is written under the
    /// lock and the new value is only kept once the write succeeded.
    /// Disconnected subscribers are dropped.
    pub fn set(&self, key: &str, value: &str) -> DemoResult<()> {
        {
            let mut values = self.values.lock().expect("mutex poisoned");
            if let Some(path) = &self.path {
                let mut next = values.clone();
                next.insert(key.to_string(), value.to_string());
                fs::write(path, serde_json::to_vec_pretty(&next)?)?;
                *values = next;
            } else {
                values.insert(key.to_string(), value.to_string());
            }
        }
        info!("PREFS - {key}={value}");

        let event = PreferenceChanged {
            key: key.to_string(),
            value: value.to_string(),
        };
        let mut subs = self.subscribers.lock().expect("mutex poisoned");
        subs.retain(|tx| tx.send(event.clone()).is_ok());
        Ok(())
    }

    pub fn subscribe(&self) -> Receiver<PreferenceChanged> {
        let (tx, rx) = channel();
        self.subscribers.lock().expect("mutex poisoned").push(tx);
        rx
    }
}
