use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::status::{classify, Phase};

/// A remote stack as last described by the provider.
///
/// `phase` is derived from `status` and the two are only ever set together,
/// through [`Stack::new`] or [`Stack::set_status`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Stack {
    pub name: String,
    phase: Phase,
    status: String,
    pub reason: String,
    pub description: String,
    pub disable_rollback: bool,
    pub termination_protection: bool,
    pub capabilities: Vec<String>,
    pub notification_topics: Vec<String>,
    pub parameters: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl Stack {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        let status = status.into();
        Self {
            name: name.into(),
            phase: classify(&status),
            status,
            reason: String::new(),
            description: String::new(),
            disable_rollback: false,
            termination_protection: false,
            capabilities: Vec::new(),
            notification_topics: Vec::new(),
            parameters: BTreeMap::new(),
            outputs: BTreeMap::new(),
            tags: BTreeMap::new(),
            created: None,
            updated: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The raw status string reported by the provider.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.phase = classify(&self.status);
    }

    /// Time of the most recent update, falling back to creation time.
    #[must_use]
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.created)
    }
}

impl Display for Stack {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)
    }
}

/// A point-in-time progress record emitted by the provider during a stack
/// operation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub resource: String,
    pub status: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub token: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub logical_id: String,
    pub physical_id: String,
    pub resource_type: String,
    pub status: String,
    pub reason: String,
    pub updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phase_follows_status() {
        let mut stack = Stack::new("demo", "CREATE_IN_PROGRESS");
        assert_eq!(stack.phase(), Phase::InProgress);

        stack.set_status("CREATE_COMPLETE");
        assert_eq!(stack.phase(), Phase::Ok);
        assert_eq!(stack.status(), "CREATE_COMPLETE");

        stack.set_status("SOMETHING_NEW");
        assert_eq!(stack.phase(), Phase::Error);
    }

    #[test]
    fn test_last_changed_prefers_update_time() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let mut stack = Stack::new("demo", "CREATE_COMPLETE");
        assert_eq!(stack.last_changed(), None);

        stack.created = Some(created);
        assert_eq!(stack.last_changed(), Some(created));

        stack.updated = Some(updated);
        assert_eq!(stack.last_changed(), Some(updated));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(Stack::new("demo", "CREATE_COMPLETE").to_string(), "demo");
    }

    #[test]
    fn test_serialized_stack_carries_phase() {
        let stack = Stack::new("demo", "UPDATE_IN_PROGRESS");
        let yaml = serde_yaml::to_string(&stack).unwrap();
        assert!(yaml.contains("phase: in-progress"));
        assert!(yaml.contains("status: UPDATE_IN_PROGRESS"));

        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(serde_yaml::Value::as_str)
            .collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "phase",
                "status",
                "reason",
                "description",
                "disable_rollback",
                "termination_protection",
                "capabilities",
                "notification_topics",
                "parameters",
                "outputs",
                "tags",
                "created",
                "updated",
            ]
        );
    }
}
