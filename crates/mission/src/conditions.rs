//! Player condition store.
//!
//! Conditions are named integers that missions read and write. A condition
//! that has never been set reads as zero. Keys are kept ordered so saved
//! games diff cleanly.

use std::collections::BTreeMap;

use crate::data_file::DataNode;
use crate::data_writer::DataWriter;

/// String-keyed numeric conditions, persisted with the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionStore {
    values: BTreeMap<String, i64>,
}

impl ConditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, zero when unset.
    pub fn get(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), value);
    }

    /// Add to a condition, creating it at zero first.
    pub fn add(&mut self, key: impl Into<String>, amount: i64) {
        let entry = self.values.entry(key.into()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Remove a condition. Returns its last value, if it was set.
    pub fn erase(&mut self, key: &str) -> Option<i64> {
        self.values.remove(key)
    }

    /// Read a `conditions` block: one `<name> [<value>]` child per condition.
    /// A missing value means 1.
    pub fn load(&mut self, node: &DataNode) {
        for child in node {
            let value = if child.size() > 1 { child.value(1) as i64 } else { 1 };
            self.set(child.token(0), value);
        }
    }

    pub fn save(&self, out: &mut DataWriter) {
        if self.values.is_empty() {
            return;
        }
        out.write(["conditions"]);
        out.begin_child();
        for (key, value) in &self.values {
            if *value == 1 {
                out.write([key.as_str()]);
            } else {
                out.write([key.as_str(), &value.to_string()]);
            }
        }
        out.end_child();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_file::DataFile;

    #[test]
    fn unset_conditions_read_zero() {
        let mut store = ConditionStore::new();
        assert_eq!(store.get("missing"), 0);
        store.add("count", 2);
        store.add("count", 3);
        assert_eq!(store.get("count"), 5);
        assert_eq!(store.erase("count"), Some(5));
        assert!(!store.has("count"));
    }

    #[test]
    fn conditions_save_then_load() {
        let mut store = ConditionStore::new();
        store.set("timer: watch: complete", 1);
        store.set("reputation", -4);

        let mut out = DataWriter::new();
        store.save(&mut out);
        let file = DataFile::parse(out.as_str());

        let mut loaded = ConditionStore::new();
        loaded.load(&file.nodes()[0]);
        assert_eq!(loaded, store);
    }
}
