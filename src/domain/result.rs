//! Plan-preview result as written by `pipectl plan-preview --out`.
//!
//! Field names follow pipectl's JSON exactly. The `*Info` structs are
//! flattened into their owners, so `ApplicationName` sits next to
//! `PlanSummary` in the document rather than under a nested object.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Outcome of one plan-preview run across every touched application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPreviewResult {
    #[serde(rename = "Applications", default, deserialize_with = "null_as_default")]
    pub applications: Vec<ApplicationResult>,
    #[serde(rename = "FailureApplications", default, deserialize_with = "null_as_default")]
    pub failure_applications: Vec<FailureApplication>,
    #[serde(rename = "FailurePipeds", default, deserialize_with = "null_as_default")]
    pub failure_pipeds: Vec<FailurePiped>,
}

impl PlanPreviewResult {
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Number of entries across all three lists.
    pub fn total(&self) -> usize {
        self.applications.len() + self.failure_applications.len() + self.failure_pipeds.len()
    }

    /// True when the pull request touches no application at all.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    #[serde(rename = "ApplicationID", default)]
    pub id: String,
    #[serde(rename = "ApplicationName", default)]
    pub name: String,
    #[serde(rename = "ApplicationURL", default)]
    pub url: String,
    #[serde(rename = "EnvID", default)]
    pub env_id: String,
    #[serde(rename = "EnvName", default)]
    pub env_name: String,
    #[serde(rename = "EnvURL", default)]
    pub env_url: String,
    #[serde(rename = "ApplicationKind")]
    pub kind: ApplicationKind,
    #[serde(rename = "ApplicationDirectory", default)]
    pub directory: String,
}

/// A successfully planned application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationResult {
    #[serde(flatten)]
    pub info: ApplicationInfo,
    #[serde(rename = "SyncStrategy")]
    pub sync_strategy: SyncStrategy,
    #[serde(rename = "PlanSummary", default)]
    pub plan_summary: String,
    #[serde(rename = "PlanDetails", default)]
    pub plan_details: String,
}

/// An application whose plan could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureApplication {
    #[serde(flatten)]
    pub info: ApplicationInfo,
    #[serde(rename = "Reason", default)]
    pub reason: String,
    /// Partial planner output, empty when there is none.
    #[serde(rename = "PlanDetails", default)]
    pub plan_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipedInfo {
    #[serde(rename = "PipedID", default)]
    pub id: String,
    #[serde(rename = "PipedURL", default)]
    pub url: String,
}

/// A piped that failed before any of its applications could be planned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePiped {
    #[serde(flatten)]
    pub info: PipedInfo,
    #[serde(rename = "Reason", default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationKind {
    #[default]
    #[serde(rename = "KUBERNETES")]
    Kubernetes,
    #[serde(rename = "TERRAFORM")]
    Terraform,
    #[serde(rename = "CLOUDRUN")]
    CloudRun,
    #[serde(rename = "LAMBDA")]
    Lambda,
    #[serde(rename = "ECS")]
    Ecs,
}

impl ApplicationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kubernetes => "KUBERNETES",
            Self::Terraform => "TERRAFORM",
            Self::CloudRun => "CLOUDRUN",
            Self::Lambda => "LAMBDA",
            Self::Ecs => "ECS",
        }
    }
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncStrategy {
    #[serde(rename = "QUICK_SYNC")]
    QuickSync,
    #[serde(rename = "PIPELINE")]
    Pipeline,
}

impl SyncStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuickSync => "QUICK_SYNC",
            Self::Pipeline => "PIPELINE",
        }
    }
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// pipectl is written in Go, where an empty slice is encoded as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
