use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::GuestId;

/// A guest to be seated.
///
/// Only seat membership changes during a run; everything else here is
/// read by constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tags: SmallVec<[String; 4]>,
}

impl Guest {
    pub fn new(id: impl Into<GuestId>) -> Self {
        Self {
            id: id.into(),
            full_name: String::new(),
            group: None,
            tags: SmallVec::new(),
        }
    }

    pub fn with_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
