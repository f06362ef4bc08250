//! Lookup tables for the user-profile and project dimensions.
//!
//! Both are left-joined: a miss leaves the dependent report fields empty and
//! never drops the record.

use std::collections::HashMap;

use crate::model::{Project, UserProfile};
use crate::types::DbId;

/// Nicknames by member id. A member appears once per role (worker and
/// checker) on each row, so lookups are by plain id.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    nicknames: HashMap<DbId, Option<String>>,
}

impl MemberDirectory {
    /// Build from dimension rows. When a member id appears more than once,
    /// the first row wins.
    pub fn from_profiles<'a, I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = &'a UserProfile>,
    {
        let mut nicknames = HashMap::new();
        let mut duplicates = 0usize;
        for profile in profiles {
            if nicknames.contains_key(&profile.member_id) {
                duplicates += 1;
                continue;
            }
            nicknames.insert(profile.member_id, profile.nickname.clone());
        }
        if duplicates > 0 {
            tracing::debug!(duplicates, "Duplicate member ids in user-profile dimension");
        }
        Self { nicknames }
    }

    /// Returns `true` when the member exists in the dimension.
    pub fn contains(&self, member_id: DbId) -> bool {
        self.nicknames.contains_key(&member_id)
    }

    /// Nickname for `member_id`, `None` when the id is absent, unknown, or
    /// the profile has no nickname.
    pub fn nickname(&self, member_id: Option<DbId>) -> Option<&str> {
        member_id
            .and_then(|id| self.nicknames.get(&id))
            .and_then(|n| n.as_deref())
    }

    pub fn len(&self) -> usize {
        self.nicknames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nicknames.is_empty()
    }
}

/// Project attributes by id. Joined for every record but not projected
/// into the report row.
#[derive(Debug, Clone, Default)]
pub struct ProjectDirectory {
    projects: HashMap<DbId, Project>,
}

impl ProjectDirectory {
    pub fn from_projects<'a, I>(projects: I) -> Self
    where
        I: IntoIterator<Item = &'a Project>,
    {
        let mut map = HashMap::new();
        for project in projects {
            map.entry(project.project_id)
                .or_insert_with(|| project.clone());
        }
        Self { projects: map }
    }

    pub fn get(&self, project_id: DbId) -> Option<&Project> {
        self.projects.get(&project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: DbId, nickname: Option<&str>) -> UserProfile {
        UserProfile {
            member_id: id,
            nickname: nickname.map(str::to_string),
        }
    }

    #[test]
    fn nickname_lookup() {
        let dir = MemberDirectory::from_profiles(&[profile(1, Some("kim")), profile(2, None)]);
        assert_eq!(dir.nickname(Some(1)), Some("kim"));
        assert_eq!(dir.nickname(Some(2)), None);
        assert!(dir.contains(2));
        assert_eq!(dir.nickname(Some(3)), None);
        assert!(!dir.contains(3));
        assert_eq!(dir.nickname(None), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let dir = MemberDirectory::from_profiles(&[
            profile(1, Some("first")),
            profile(1, Some("second")),
        ]);
        assert_eq!(dir.nickname(Some(1)), Some("first"));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn project_lookup() {
        let dir = ProjectDirectory::from_projects(&[Project {
            project_id: 26946,
            project_name: Some("segmentation".to_string()),
            start_date: None,
        }]);
        assert!(dir.get(26946).is_some());
        assert!(dir.get(1).is_none());
    }
}
