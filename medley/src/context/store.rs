//! The shared execution context.

use crate::core::InvocationStatus;
use crate::pipeline::InvocationRecord;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Bookkeeping keys that never merge into the context, even if a stage
/// echoes them in its payload.
pub const RESERVED_KEYS: [&str; 4] = ["status", "stage", "input", "error"];

/// Run-scoped key/value state shared across stages.
///
/// Created empty at run start, discarded at run end, never persisted.
/// The executor is the single writer: it calls [`RunContext::merge`]
/// exactly once per successful invocation. Stages only ever read. Keys
/// are global for the whole run, so a later stage's payload silently
/// overwrites an earlier entry under the same key (last-write-wins).
#[derive(Debug, Default)]
pub struct RunContext {
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl RunContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.read().get(key).cloned()
    }

    /// Gets a value by key, or the given default.
    #[must_use]
    pub fn get_or(&self, key: &str, default: serde_json::Value) -> serde_json::Value {
        self.get(key).unwrap_or(default)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// Merges a successful invocation's payload into the context.
    ///
    /// Every payload key except the reserved bookkeeping keys is copied,
    /// overwriting any existing entry. Error records are ignored.
    pub fn merge(&self, record: &InvocationRecord) {
        if record.status != InvocationStatus::Success {
            return;
        }
        let mut values = self.values.write();
        for (key, value) in &record.payload {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            values.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, serde_json::Value> {
        self.values.read().clone()
    }

    /// Returns all keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InputRef;
    use std::collections::HashMap;

    fn success(stage: &str, entries: &[(&str, serde_json::Value)]) -> InvocationRecord {
        let payload: HashMap<String, serde_json::Value> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        InvocationRecord::success(stage, InputRef::Batch, payload)
    }

    #[test]
    fn test_get_or_default() {
        let ctx = RunContext::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.get_or("tempo", serde_json::json!(120)), serde_json::json!(120));
    }

    #[test]
    fn test_merge_copies_payload() {
        let ctx = RunContext::new();
        ctx.merge(&success("beats", &[("tempo", serde_json::json!(96))]));
        assert_eq!(ctx.get("tempo"), Some(serde_json::json!(96)));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_merge_is_last_write_wins() {
        let ctx = RunContext::new();
        ctx.merge(&success("beats", &[("tempo", serde_json::json!(96))]));
        ctx.merge(&success("refine", &[("tempo", serde_json::json!(97.3))]));
        assert_eq!(ctx.get("tempo"), Some(serde_json::json!(97.3)));
    }

    #[test]
    fn test_merge_skips_reserved_keys() {
        let ctx = RunContext::new();
        ctx.merge(&success(
            "beats",
            &[
                ("status", serde_json::json!("sneaky")),
                ("stage", serde_json::json!("sneaky")),
                ("key_signature", serde_json::json!("F#m")),
            ],
        ));
        assert!(ctx.get("status").is_none());
        assert!(ctx.get("stage").is_none());
        assert_eq!(ctx.get("key_signature"), Some(serde_json::json!("F#m")));
    }

    #[test]
    fn test_merge_ignores_error_records() {
        let ctx = RunContext::new();
        let record = InvocationRecord::failure("beats", InputRef::Batch, "decode error");
        ctx.merge(&record);
        assert!(ctx.is_empty());
    }
}
