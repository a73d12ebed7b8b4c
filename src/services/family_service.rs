use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::domain::FamilyError;
use crate::stores::{DishStore, FamilyStore, UserStore};
use crate::types::dto::family::{
    CreateFamilyRequest, FamilyCreateResponse, FamilyInfoResponse, FamilyJoinResponse,
    FamilyMemberInfo, FamilyMembersResponse, JoinFamilyRequest,
};

const DEFAULT_MAX_DISHES: i32 = 30;
const FAMILY_NAME_MAX_CHARS: usize = 100;
const FAMILY_DESCRIPTION_MAX_CHARS: usize = 500;
const MAX_FAMILY_MEMBERS: u64 = 10;

/// Family membership rules: one active family per user, owner assigned once
/// at creation, invite acceptance, member cap.
///
/// Membership is binary — a user is in exactly one family or none. Invites
/// are capability payloads carried client-side; nothing is stored until
/// acceptance, and there is no pending state.
pub struct FamilyService {
    family_store: Arc<FamilyStore>,
    dish_store: Arc<DishStore>,
    user_store: Arc<UserStore>,
}

impl FamilyService {
    pub fn new(family_store: Arc<FamilyStore>, dish_store: Arc<DishStore>, user_store: Arc<UserStore>) -> Self {
        Self {
            family_store,
            dish_store,
            user_store,
        }
    }

    /// Create a family with the requester as owner.
    ///
    /// The family row and the owner membership row are inserted in a single
    /// transaction; a family with no owner row must never be observable.
    pub async fn create_family(
        &self,
        user_id: &str,
        req: CreateFamilyRequest,
    ) -> Result<FamilyCreateResponse, FamilyError> {
        let name = req.name.trim().to_string();
        if name.is_empty() || name.chars().count() > FAMILY_NAME_MAX_CHARS {
            return Err(FamilyError::InvalidName);
        }

        let description = normalize_optional(req.description);
        if let Some(description) = &description {
            if description.chars().count() > FAMILY_DESCRIPTION_MAX_CHARS {
                return Err(FamilyError::InvalidDescription);
            }
        }

        if self.family_store.is_user_in_family(user_id).await? {
            return Err(FamilyError::AlreadyInFamily);
        }

        let family = self
            .family_store
            .create_family_with_owner(name, description, user_id, DEFAULT_MAX_DISHES)
            .await?;

        tracing::info!(family_id = %family.id, owner_id = %user_id, "family created");

        Ok(FamilyCreateResponse {
            family_id: family.id,
            name: family.name,
            description: family.description,
            member_count: 1,
            max_dishes: family.max_dishes,
        })
    }

    /// Resolve the requester's family and return it with live counts. The
    /// counts are computed per call, never cached.
    pub async fn get_family_info(&self, user_id: &str) -> Result<FamilyInfoResponse, FamilyError> {
        let family = self
            .family_store
            .find_family_by_user(user_id)
            .await?
            .ok_or(FamilyError::NotFound)?;

        let member_count = self.family_store.count_active_members(&family.id).await?;
        let dish_count = self.dish_store.count_by_family(&family.id).await?;

        Ok(FamilyInfoResponse {
            family_id: family.id,
            name: family.name,
            description: family.description,
            owner_id: family.owner_id,
            member_count,
            dish_count,
            max_dishes: family.max_dishes,
        })
    }

    /// Accept an out-of-band invite and join the family as a member.
    ///
    /// The family id is authoritative; the name hint only defends against
    /// stale or forged invite payloads. The inviter must still be an active
    /// member, so revoked members cannot keep pulling people in.
    pub async fn join_via_invite(
        &self,
        user_id: &str,
        req: JoinFamilyRequest,
    ) -> Result<FamilyJoinResponse, FamilyError> {
        if !req.action.trim().eq_ignore_ascii_case("accept") {
            return Err(FamilyError::InvalidInviteAction);
        }

        if self.family_store.is_user_in_family(user_id).await? {
            return Err(FamilyError::AlreadyInFamily);
        }

        let family = self
            .family_store
            .find_family_by_id(&req.family_id)
            .await?
            .ok_or(FamilyError::NotFound)?;

        if let Some(hint) = req.family_name.as_deref() {
            if !hint.is_empty() && hint != family.name {
                return Err(FamilyError::NameMismatch);
            }
        }

        if !self.family_store.is_member_of(&req.inviter_id, &family.id).await? {
            return Err(FamilyError::InviterNotInFamily);
        }

        let member_count = self.family_store.count_active_members(&family.id).await?;
        if member_count >= MAX_FAMILY_MEMBERS {
            return Err(FamilyError::MemberLimitReached);
        }

        let member = self
            .family_store
            .add_member(&family.id, user_id)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    FamilyError::AlreadyInFamily
                } else {
                    FamilyError::Internal(e)
                }
            })?;

        tracing::info!(family_id = %family.id, user_id = %user_id, "member joined via invite");

        Ok(FamilyJoinResponse {
            family_id: member.family_id,
            member_role: member.role,
            joined_at: member.joined_at,
        })
    }

    /// Active members of the requester's family, owner first, then by join
    /// time ascending.
    pub async fn list_members(&self, user_id: &str) -> Result<FamilyMembersResponse, FamilyError> {
        let family = self
            .family_store
            .find_family_by_user(user_id)
            .await?
            .ok_or(FamilyError::NotFound)?;

        let members = self.family_store.list_active_members(&family.id).await?;

        let ids: Vec<String> = members.iter().map(|m| m.user_id.clone()).collect();
        let users = self.user_store.find_by_ids(&ids).await?;
        let profiles: HashMap<&str, &crate::types::db::user::Model> =
            users.iter().map(|u| (u.id.as_str(), u)).collect();

        let members = members
            .iter()
            .map(|m| {
                let profile = profiles.get(m.user_id.as_str());
                FamilyMemberInfo {
                    user_id: m.user_id.clone(),
                    nickname: profile.map(|u| u.nickname.clone()).unwrap_or_default(),
                    avatar: profile.and_then(|u| u.avatar.clone()),
                    role: m.role.clone(),
                    joined_at: m.joined_at,
                }
            })
            .collect();

        Ok(FamilyMembersResponse { members })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
