//! Shared status record for managed Azure resources
//!
//! Every managed kind uses the same `ResourceStatus<O>` shape: a condition
//! list with replace-by-type semantics, the reconcile state of the last
//! pass, and the provider-side fields observed on the last successful Get.
//! `O` is the kind-specific bag of read-only fields the provider assigns
//! (e.g. the allocated IP of a PublicIPAddress).

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type. The create/available/delete lifecycle shares the single
/// `Ready` type and is distinguished by reason, so replacing by type keeps
/// exactly one lifecycle condition on the record at all times.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionType {
    /// Whether the external resource is ready for use.
    Ready,
}

/// Condition status, following the Kubernetes convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// The condition holds.
    True,
    /// The condition does not hold.
    False,
    /// The condition cannot be determined.
    Unknown,
}

/// Why a condition has its current status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionReason {
    /// The external resource is being created.
    Creating,
    /// The external resource exists and was observed.
    Available,
    /// The external resource is being deleted.
    Deleting,
}

/// A single status condition with lifecycle semantics.
///
/// Failure detail rides in `message` rather than in new condition types, so
/// a resource in a failing Create keeps its `Creating` condition with the
/// error attached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of this condition.
    pub r#type: ConditionType,
    /// Status of this condition.
    pub status: ConditionStatus,
    /// Machine-readable reason for the status.
    pub reason: ConditionReason,
    /// Human-readable detail, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the condition last changed.
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    /// Condition set immediately before a provider Create call is issued.
    #[must_use]
    pub fn creating() -> Self {
        Self::new(ConditionStatus::False, ConditionReason::Creating)
    }

    /// Condition set after the external resource was observed to exist.
    #[must_use]
    pub fn available() -> Self {
        Self::new(ConditionStatus::True, ConditionReason::Available)
    }

    /// Condition set immediately before a provider Delete call is issued.
    #[must_use]
    pub fn deleting() -> Self {
        Self::new(ConditionStatus::False, ConditionReason::Deleting)
    }

    /// Attach a human-readable message (e.g. a provider error string).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn new(status: ConditionStatus, reason: ConditionReason) -> Self {
        Self {
            r#type: ConditionType::Ready,
            status,
            reason,
            message: None,
            last_transition_time: Utc::now(),
        }
    }

    /// True when `other` carries the same type, status, reason and message,
    /// regardless of transition time.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Reconcile state of a managed resource as of the last pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum ResourceState {
    /// Not reconciled yet.
    #[default]
    Unknown,
    /// Observed in the provider and up to date.
    Exists,
    /// A create has been issued and not yet confirmed by Observe.
    Creating,
    /// An update has been issued and not yet confirmed by Observe.
    Updating,
    /// A delete has been issued and not yet confirmed.
    Deleting,
    /// Observed to not exist in the provider.
    Absent,
}

/// Status of a managed resource.
///
/// The reconciler exclusively owns this record; users own `spec`. The
/// observed fields (`provisioning_state`, `id`, `etag`, `resource_type`,
/// and the kind-specific `observed` bag) are written only after a
/// successful Get against the provider, never zeroed on partial responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus<O> {
    /// Status conditions, at most one entry per condition type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Reconcile state as of the last pass.
    #[serde(default)]
    pub state: ResourceState,

    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    /// Provider-assigned resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Entity tag of the last observed revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Provider resource type string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Kind-specific read-only fields assigned by the provider.
    #[serde(flatten)]
    pub observed: O,
}

impl<O> ResourceStatus<O> {
    /// Set a condition, replacing any existing condition of the same type
    /// in place. Setting a condition identical to the current one keeps the
    /// original transition time, so repeated passes do not flap the
    /// timestamp.
    pub fn set_condition(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.r#type == condition.r#type)
        {
            Some(existing) => {
                if existing.matches(&condition) {
                    return;
                }
                *existing = condition;
            }
            None => self.conditions.push(condition),
        }
    }

    /// Look up the condition of the given type, if set.
    #[must_use]
    pub fn condition(&self, r#type: ConditionType) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == r#type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Empty;

    #[test]
    fn set_condition_replaces_by_type() {
        let mut status = ResourceStatus::<Empty>::default();
        status.set_condition(Condition::creating());
        status.set_condition(Condition::available());

        assert_eq!(status.conditions.len(), 1);
        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason, ConditionReason::Available);
        assert_eq!(ready.status, ConditionStatus::True);
    }

    #[test]
    fn set_condition_keeps_transition_time_for_identical_condition() {
        let mut status = ResourceStatus::<Empty>::default();
        let first = Condition::creating();
        let original_time = first.last_transition_time;
        status.set_condition(first);
        status.set_condition(Condition::creating());

        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.last_transition_time, original_time);
    }

    #[test]
    fn set_condition_updates_transition_time_on_reason_change() {
        let mut status = ResourceStatus::<Empty>::default();
        status.set_condition(Condition::creating());
        status.set_condition(Condition::deleting());

        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason, ConditionReason::Deleting);
    }

    #[test]
    fn message_change_replaces_condition() {
        let mut status = ResourceStatus::<Empty>::default();
        status.set_condition(Condition::creating());
        status.set_condition(Condition::creating().with_message("quota exceeded"));

        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason, ConditionReason::Creating);
        assert_eq!(ready.message.as_deref(), Some("quota exceeded"));
        assert_eq!(status.conditions.len(), 1);
    }

    #[test]
    fn default_state_is_unknown() {
        let status = ResourceStatus::<Empty>::default();
        assert_eq!(status.state, ResourceState::Unknown);
        assert!(status.conditions.is_empty());
    }
}
