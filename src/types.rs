//!
//! Typed views of the JSON documents returned by the deployments API.
//!
//! The resource functions return the raw `serde_json::Value`, use
//! `serde_json::from_value` to convert into these types.
use serde::Deserialize;
use std::collections::HashMap;

/// Links to related objects
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DeploymentLinks {
    /// Application id the deployment belongs to
    pub application: u64,
}

/// A deployment record
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    /// Server assigned id
    pub id: u64,
    /// Revision, such as a git SHA
    pub revision: String,
    #[allow(missing_docs)]
    pub changelog: Option<String>,
    #[allow(missing_docs)]
    pub description: Option<String>,
    /// User that recorded the deployment
    pub user: Option<String>,
    /// Time of the deployment, set by the server unless provided
    pub timestamp: chrono::DateTime<chrono::FixedOffset>,
    #[allow(missing_docs)]
    pub links: Option<DeploymentLinks>,
}

/// Returned from create and delete
#[derive(Clone, Debug, Deserialize)]
pub struct DeploymentResponse {
    #[allow(missing_docs)]
    pub deployment: Deployment,
}

/// Returned from list
#[derive(Clone, Debug, Deserialize)]
pub struct DeploymentList {
    #[allow(missing_docs)]
    #[serde(default)]
    pub deployments: Vec<Deployment>,
    /// Pagination links keyed by relation, present for paginated results
    #[serde(default)]
    pub pages: HashMap<String, crate::pagination::Link>,
}

impl DeploymentList {
    /// URL of the next page, if any
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.pages.get("next").map(|l| l.url.as_str())
    }
}
