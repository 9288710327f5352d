//! Managers, and the roles users hold

use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::event::{required, Event};
use crate::ids::ManagerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Stakeholder,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Stakeholder => "stakeholder",
        }
    }
}

/// A row of the `user_roles` table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: ManagerId,
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerStatus {
    Active,
    Inactive,
}

impl Default for ManagerStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A manager profile, as stored in the `profiles` table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    #[serde(rename = "user_id")]
    pub id: ManagerId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub status: ManagerStatus,
    /// Number of live events assigned to this manager.
    /// This is computed by the sources when they read profiles, and is never stored.
    #[serde(default, skip_serializing)]
    pub assigned_events_count: usize,
}

impl Manager {
    /// The name shown in the assignment dropdowns
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref()
            .or_else(|| self.email.as_deref())
            .unwrap_or("Unknown Manager")
    }
}

/// The content of the "create/edit manager" form
#[derive(Clone, Debug, Default)]
pub struct ManagerDraft {
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub status: ManagerStatus,
}

impl ManagerDraft {
    pub fn validate(self, id: ManagerId) -> Result<Manager, DeskError> {
        let full_name = required(&self.full_name, "manager name")?;
        let email = required(&self.email, "email")?;
        if email.contains('@') == false {
            return Err(DeskError::validation(format!("{:?} is not a valid email address", email)));
        }
        let mobile = self.mobile
            .map(|m| m.trim().to_string())
            .filter(|m| m.is_empty() == false);

        Ok(Manager {
            id,
            full_name: Some(full_name),
            email: Some(email),
            mobile,
            status: self.status,
            assigned_events_count: 0,
        })
    }
}

/// Count the live (i.e. not deleted) events assigned to a manager
pub fn count_assignments<'a, I>(events: I, manager_id: &ManagerId) -> usize
where
    I: IntoIterator<Item = &'a Event>,
{
    events.into_iter()
        .filter(|e| e.is_deleted() == false)
        .filter(|e| e.assigned_manager_id.as_ref() == Some(manager_id))
        .count()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let mut m = Manager {
            id: ManagerId::from("1"),
            full_name: None,
            email: Some("sarah.johnson@example.com".to_string()),
            mobile: None,
            status: ManagerStatus::Active,
            assigned_events_count: 0,
        };
        assert_eq!(m.display_name(), "sarah.johnson@example.com");
        m.email = None;
        assert_eq!(m.display_name(), "Unknown Manager");
    }

    #[test]
    fn profile_row_uses_user_id() {
        let m: Manager = serde_json::from_str(r#"{"user_id": "7", "full_name": "John Smith", "email": null}"#).unwrap();
        assert_eq!(m.id, ManagerId::from("7"));
        assert_eq!(m.status, ManagerStatus::Active);
        let back = serde_json::to_value(&m).unwrap();
        assert_eq!(back["user_id"], "7");
        assert!(back.get("assigned_events_count").is_none());
    }

    #[test]
    fn draft_checks_email() {
        let draft = ManagerDraft {
            full_name: "Michael Brown".to_string(),
            email: "michael.brown".to_string(),
            ..ManagerDraft::default()
        };
        assert!(draft.validate(ManagerId::random()).unwrap_err().is_validation());
    }
}
