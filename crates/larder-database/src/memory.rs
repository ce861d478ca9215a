//! In-memory repository implementations.
//!
//! Used by tests and by the `memory` database profile. They enforce the
//! same uniqueness rules as the Postgres schema, checked and applied
//! under one write lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_entity::account::{Account, CreateAccount, SealedField};
use larder_entity::group::{CreateGroup, Group, UpdateGroup};
use larder_entity::membership::{CreateMembership, GroupRole, Membership};

use crate::repositories::{AccountRepository, GroupRepository, MembershipRepository};

/// In-memory account table.
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> AppResult<Account>
    where
        F: FnOnce(&mut Account) + Send,
    {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;
        apply(account);
        account.updated_at = Utc::now();
        Ok(account.clone())
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &SealedField) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn find_by_invitation_token(&self, token: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.invitation_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == data.email) {
            return Err(AppError::already_exists("Email already registered"));
        }
        if accounts.values().any(|a| a.username == data.username) {
            return Err(AppError::already_exists("Username already taken"));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::now_v7(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            is_active: true,
            email_verified: false,
            invitation_token: Some(data.invitation_token.clone()),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<Account> {
        self.update(id, |a| {
            a.email_verified = true;
            a.invitation_token = None;
        })
        .await
    }

    async fn set_invitation_token(&self, id: Uuid, token: &str) -> AppResult<Account> {
        let token = token.to_string();
        self.update(id, move |a| {
            a.invitation_token = Some(token);
            a.email_verified = false;
        })
        .await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Account> {
        self.update(id, |a| a.is_active = active).await
    }
}

/// In-memory membership table keyed by `(account_id, group_id)`.
#[derive(Debug, Default)]
pub struct MemoryMembershipRepository {
    memberships: RwLock<HashMap<(Uuid, Uuid), Membership>>,
}

impl MemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, account_id: Uuid, group_id: Uuid, apply: F) -> AppResult<Membership>
    where
        F: FnOnce(&mut Membership) + Send,
    {
        let mut memberships = self.memberships.write().await;
        let membership = memberships.get_mut(&(account_id, group_id)).ok_or_else(|| {
            AppError::not_found(format!(
                "Account {account_id} is not a member of household {group_id}"
            ))
        })?;
        apply(membership);
        membership.updated_at = Utc::now();
        Ok(membership.clone())
    }

    async fn remove_group(&self, group_id: Uuid) {
        self.memberships
            .write()
            .await
            .retain(|_, m| m.group_id != group_id);
    }

    fn sorted(mut rows: Vec<Membership>) -> Vec<Membership> {
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl MembershipRepository for MemoryMembershipRepository {
    async fn find(&self, account_id: Uuid, group_id: Uuid) -> AppResult<Option<Membership>> {
        Ok(self
            .memberships
            .read()
            .await
            .get(&(account_id, group_id))
            .cloned())
    }

    async fn find_by_group(&self, group_id: Uuid) -> AppResult<Vec<Membership>> {
        let rows = self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Vec<Membership>> {
        let rows = self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn create(&self, data: &CreateMembership) -> AppResult<Membership> {
        let mut memberships = self.memberships.write().await;
        let key = (data.account_id, data.group_id);
        if memberships.contains_key(&key) {
            return Err(AppError::already_exists(
                "Account is already a member of this household",
            ));
        }

        let now = Utc::now();
        let membership = Membership {
            id: Uuid::now_v7(),
            account_id: data.account_id,
            group_id: data.group_id,
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        memberships.insert(key, membership.clone());
        Ok(membership)
    }

    async fn update_role(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        role: GroupRole,
    ) -> AppResult<Membership> {
        self.update(account_id, group_id, |m| m.role = role).await
    }

    async fn set_active(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        active: bool,
    ) -> AppResult<Membership> {
        self.update(account_id, group_id, |m| m.is_active = active)
            .await
    }

    async fn delete(&self, account_id: Uuid, group_id: Uuid) -> AppResult<()> {
        self.memberships
            .write()
            .await
            .remove(&(account_id, group_id))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Account {account_id} is not a member of household {group_id}"
                ))
            })
    }
}

/// In-memory group table. Owner memberships land in the shared
/// membership repository.
#[derive(Debug)]
pub struct MemoryGroupRepository {
    groups: RwLock<HashMap<Uuid, Group>>,
    memberships: Arc<MemoryMembershipRepository>,
}

impl MemoryGroupRepository {
    pub fn new(memberships: Arc<MemoryMembershipRepository>) -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            memberships,
        }
    }
}

/// Whether an active group other than `except` already uses `name`.
fn name_taken(groups: &HashMap<Uuid, Group>, name: &str, except: Option<Uuid>) -> bool {
    let name = name.to_lowercase();
    groups
        .values()
        .any(|g| g.is_active && Some(g.id) != except && g.name.to_lowercase() == name)
}

fn missing_group(id: Uuid) -> AppError {
    AppError::not_found(format!("Household {id} not found"))
}

#[async_trait]
impl GroupRepository for MemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn create_with_owner(&self, data: &CreateGroup) -> AppResult<(Group, Membership)> {
        let mut groups = self.groups.write().await;
        if name_taken(&groups, &data.name, None) {
            return Err(AppError::already_exists(format!(
                "Household '{}' already exists",
                data.name
            )));
        }

        let now = Utc::now();
        let group = Group {
            id: Uuid::now_v7(),
            name: data.name.clone(),
            address: data.address.clone(),
            is_active: true,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };

        let owner = self
            .memberships
            .create(&CreateMembership {
                account_id: data.created_by,
                group_id: group.id,
                role: GroupRole::Owner,
            })
            .await?;

        groups.insert(group.id, group.clone());
        Ok((group, owner))
    }

    async fn update(&self, id: Uuid, data: &UpdateGroup) -> AppResult<Group> {
        let mut groups = self.groups.write().await;
        let is_active = groups.get(&id).ok_or_else(|| missing_group(id))?.is_active;
        if let Some(name) = &data.name {
            if is_active && name_taken(&groups, name, Some(id)) {
                return Err(AppError::already_exists(format!(
                    "Household '{name}' already exists"
                )));
            }
        }

        let group = groups.get_mut(&id).ok_or_else(|| missing_group(id))?;
        if let Some(name) = &data.name {
            group.name = name.clone();
        }
        if let Some(address) = &data.address {
            group.address = Some(address.clone());
        }
        group.updated_at = Utc::now();
        Ok(group.clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Group> {
        let mut groups = self.groups.write().await;
        let name = groups.get(&id).ok_or_else(|| missing_group(id))?.name.clone();
        if active && name_taken(&groups, &name, Some(id)) {
            return Err(AppError::already_exists(
                "Another active household already uses this name",
            ));
        }

        let group = groups.get_mut(&id).ok_or_else(|| missing_group(id))?;
        group.is_active = active;
        group.updated_at = Utc::now();
        Ok(group.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut groups = self.groups.write().await;
        groups.remove(&id).ok_or_else(|| missing_group(id))?;
        self.memberships.remove_group(id).await;
        Ok(())
    }
}
