use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::item::ItemPath;

/// Niveles de permiso de una membresía, del más débil al más fuerte
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Read,
    Write,
    Admin,
}

impl Display for PermissionLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PermissionLevel::Read => write!(f, "read"),
            PermissionLevel::Write => write!(f, "write"),
            PermissionLevel::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(PermissionLevel::Read),
            "write" => Ok(PermissionLevel::Write),
            "admin" => Ok(PermissionLevel::Admin),
            other => Err(format!("Unknown permission level: {}", other)),
        }
    }
}

/// Permiso de un miembro sobre el subárbol de un elemento; pertenece al host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMembership {
    pub id: Uuid,
    pub member_id: Uuid,
    pub item_path: ItemPath,
    pub permission: PermissionLevel,
    pub creator: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ItemMembership {
    pub fn allows(&self, required: PermissionLevel) -> bool {
        self.permission >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_ordering() {
        assert!(PermissionLevel::Admin > PermissionLevel::Write);
        assert!(PermissionLevel::Write > PermissionLevel::Read);
    }

    #[test]
    fn test_permission_round_trip_through_text() {
        for level in [PermissionLevel::Read, PermissionLevel::Write, PermissionLevel::Admin] {
            assert_eq!(level.to_string().parse::<PermissionLevel>().unwrap(), level);
        }
        assert!("owner".parse::<PermissionLevel>().is_err());
    }
}
