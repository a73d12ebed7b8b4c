use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for creating a family
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateFamilyRequest {
    /// Family name, at most 100 characters
    pub name: String,

    /// Optional description, at most 500 characters
    pub description: Option<String>,
}

/// Response model for family creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FamilyCreateResponse {
    pub family_id: String,
    pub name: String,
    pub description: Option<String>,
    pub member_count: u64,
    pub max_dishes: i32,
}

/// Response model for family info, with live counts
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FamilyInfoResponse {
    pub family_id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub member_count: u64,
    pub dish_count: u64,
    pub max_dishes: i32,
}

/// Request model for accepting an out-of-band invite. The invite itself is a
/// capability carried client-side (shared link / QR); nothing is persisted
/// until acceptance.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct JoinFamilyRequest {
    /// Target family id, the source of truth
    pub family_id: String,

    /// Advisory name hint from the invite payload; rejected if stale
    pub family_name: Option<String>,

    /// User id of the member who issued the invite
    pub inviter_id: String,

    /// Display name carried in the invite payload, informational only
    pub inviter_nickname: Option<String>,

    /// Must be "accept" (case-insensitive)
    pub action: String,
}

/// Response model for a successful join
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FamilyJoinResponse {
    pub family_id: String,
    pub member_role: String,
    pub joined_at: i64,
}

/// One member in the member listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FamilyMemberInfo {
    pub user_id: String,
    pub nickname: String,
    pub avatar: Option<String>,
    pub role: String,
    pub joined_at: i64,
}

/// Response model for the member listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FamilyMembersResponse {
    pub members: Vec<FamilyMemberInfo>,
}
