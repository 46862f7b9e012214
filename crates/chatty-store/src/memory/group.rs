//! In-memory group and membership store.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use chatty_core::result::AppResult;
use chatty_core::types::{GroupId, UserId};
use chatty_entity::group::{Group, NewGroup};

use crate::repository::GroupRepository;

#[derive(Debug, Default)]
struct GroupTables {
    next_id: i64,
    groups: BTreeMap<GroupId, Group>,
    members: BTreeMap<GroupId, BTreeSet<UserId>>,
}

impl GroupTables {
    fn is_member(&self, id: GroupId, user_id: UserId) -> bool {
        self.members
            .get(&id)
            .is_some_and(|members| members.contains(&user_id))
    }
}

/// Group repository backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryGroupRepository {
    tables: RwLock<GroupTables>,
}

impl MemoryGroupRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for MemoryGroupRepository {
    async fn find_by_id(&self, id: GroupId) -> AppResult<Option<Group>> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn find_for_member(&self, id: GroupId, user_id: UserId) -> AppResult<Option<Group>> {
        let tables = self.tables.read().await;
        if !tables.is_member(id, user_id) {
            return Ok(None);
        }
        Ok(tables.groups.get(&id).cloned())
    }

    async fn is_member(&self, id: GroupId, user_id: UserId) -> AppResult<bool> {
        Ok(self.tables.read().await.is_member(id, user_id))
    }

    async fn member_ids(&self, id: GroupId) -> AppResult<Vec<UserId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .get(&id)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn groups_for_user(&self, user_id: UserId) -> AppResult<Vec<Group>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|(_, members)| members.contains(&user_id))
            .filter_map(|(id, _)| tables.groups.get(id).cloned())
            .collect())
    }

    async fn group_ids_for_user(&self, user_id: UserId) -> AppResult<HashSet<GroupId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|(_, members)| members.contains(&user_id))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn create(&self, new_group: NewGroup) -> AppResult<Group> {
        let mut tables = self.tables.write().await;
        tables.next_id += 1;
        let group = Group {
            id: GroupId(tables.next_id),
            name: new_group.name,
            created_at: Utc::now(),
        };
        tables.groups.insert(group.id, group.clone());
        tables
            .members
            .insert(group.id, new_group.member_ids.into_iter().collect());
        Ok(group)
    }

    async fn rename(&self, id: GroupId, name: &str) -> AppResult<Option<Group>> {
        let mut tables = self.tables.write().await;
        Ok(tables.groups.get_mut(&id).map(|group| {
            group.name = name.to_string();
            group.clone()
        }))
    }

    async fn remove_member(&self, id: GroupId, user_id: UserId) -> AppResult<usize> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .members
            .get_mut(&id)
            .map(|members| {
                members.remove(&user_id);
                members.len()
            })
            .unwrap_or(0))
    }

    async fn delete(&self, id: GroupId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        tables.members.remove(&id);
        Ok(tables.groups.remove(&id).is_some())
    }
}
