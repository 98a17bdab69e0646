use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named chat room. Ids are assigned by the group store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl Group {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Case-sensitive name match used for client-side uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_is_case_sensitive() {
        let group = Group {
            id: GroupId::new("g-1"),
            name: "Alpha".to_owned(),
            members: vec![UserId::new("u-1"), UserId::new("u-2")],
        };

        assert!(group.has_name("Alpha"));
        assert!(!group.has_name("alpha"));
        assert_eq!(group.member_count(), 2);
    }
}
