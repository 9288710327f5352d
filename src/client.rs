//! This module provides a client to the remote table service (a PostgREST-like HTTP API)
//!
//! Tables are reached at `{base}/rest/v1/{table}`, and filtered with query parameters such as `id=eq.1` or `user_id=in.("1","2")`.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::event::Event;
use crate::ids::{EventId, ManagerId};
use crate::manager::{Manager, Role, RoleAssignment};
use crate::resource::Resource;
use crate::task::Task;
use crate::tasks::TaskStore;
use crate::traits::{DirectorySource, EventSource, TaskSource};

const EVENTS: &str = "events";
const USER_ROLES: &str = "user_roles";
const PROFILES: &str = "profiles";
const TASKS: &str = "tasks";

/// The body of the service replies, when a request failed
#[derive(Deserialize)]
struct ServiceError {
    message: String,
}

#[derive(Deserialize)]
struct UserIdRow {
    user_id: ManagerId,
}

#[derive(Deserialize)]
struct AssignmentRow {
    assigned_manager_id: Option<ManagerId>,
}

/// A filter on a column
fn eq<T: ToString>(value: T) -> String {
    format!("eq.{}", value.to_string())
}

/// A filter on a column, that matches any of the values
fn in_list<T: ToString>(values: &[T]) -> String {
    let quoted: Vec<String> = values.iter()
        .map(|v| format!("\"{}\"", v.to_string()))
        .collect();
    format!("in.({})", quoted.join(","))
}


/// A client to the remote table service
#[derive(Debug, Clone)]
pub struct Client {
    resource: Resource,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start any connection
    pub fn new<S: AsRef<str>, T: ToString>(url: S, api_key: T) -> Result<Self, DeskError> {
        let resource = Resource::new(url, api_key)?;
        Ok(Self::from_resource(resource))
    }

    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            http: reqwest::Client::new(),
        }
    }

    pub fn resource(&self) -> &Resource { &self.resource }

    fn request(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.resource.table(table))
            .header("apikey", self.resource.api_key())
            .bearer_auth(self.resource.api_key())
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<T>, DeskError> {
        let response = self.request(reqwest::Method::GET, table)
            .query(filters)
            .send()
            .await?;
        let response = check_response(response).await?;
        let rows = response.json().await?;
        Ok(rows)
    }

    async fn insert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> Result<(), DeskError> {
        let response = self.request(reqwest::Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    /// Insert rows, or replace the ones that have the same primary key
    async fn upsert<T: Serialize + ?Sized>(&self, table: &str, rows: &T) -> Result<(), DeskError> {
        let response = self.request(reqwest::Method::POST, table)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    /// Returns the number of updated rows
    async fn update<T: Serialize + ?Sized>(&self, table: &str, filters: &[(&str, String)], row: &T) -> Result<usize, DeskError> {
        let response = self.request(reqwest::Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(filters)
            .json(row)
            .send()
            .await?;
        let response = check_response(response).await?;
        let updated: Vec<serde_json::Value> = response.json().await?;
        Ok(updated.len())
    }

    async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<(), DeskError> {
        let response = self.request(reqwest::Method::DELETE, table)
            .query(filters)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}

/// Turn a failed reply into a `Remote` error that carries the message of the service
async fn check_response(response: Response) -> Result<Response, DeskError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ServiceError>(&body) {
        Ok(err) => err.message,
        Err(_) => format!("Unexpected HTTP status code {:?}", status),
    };
    log::warn!("Request failed ({}): {}", status, message);
    Err(DeskError::remote(message))
}

#[async_trait]
impl EventSource for Client {
    async fn list_events(&self) -> Result<Vec<Event>, DeskError> {
        let events: Vec<Event> = self.select(EVENTS, &[("select", "*".to_string())]).await?;
        log::debug!("Fetched {} events", events.len());
        Ok(events)
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DeskError> {
        let events: Vec<Event> = self.select(EVENTS, &[
            ("select", "*".to_string()),
            ("id", eq(id)),
        ]).await?;
        Ok(events.into_iter().next())
    }

    async fn insert_event(&mut self, event: Event) -> Result<(), DeskError> {
        self.insert(EVENTS, &event).await
    }

    async fn update_event(&mut self, event: Event) -> Result<(), DeskError> {
        let n_updated = self.update(EVENTS, &[("id", eq(&event.id))], &event).await?;
        if n_updated == 0 {
            return Err(DeskError::not_found("event", &event.id));
        }
        Ok(())
    }

    async fn remove_event(&mut self, id: &EventId) -> Result<(), DeskError> {
        self.delete(EVENTS, &[("id", eq(id))]).await
    }
}

#[async_trait]
impl DirectorySource for Client {
    async fn user_ids_with_role(&self, role: Role) -> Result<Vec<ManagerId>, DeskError> {
        let rows: Vec<UserIdRow> = self.select(USER_ROLES, &[
            ("select", "user_id".to_string()),
            ("role", eq(role.as_str())),
        ]).await?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    async fn profiles(&self, ids: &[ManagerId]) -> Result<Vec<Manager>, DeskError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut profiles: Vec<Manager> = self.select(PROFILES, &[
            ("select", "*".to_string()),
            ("user_id", in_list(ids)),
        ]).await?;

        let assignments: Vec<AssignmentRow> = self.select(EVENTS, &[
            ("select", "assigned_manager_id".to_string()),
            ("assigned_manager_id", in_list(ids)),
            ("status", "neq.deleted".to_string()),
        ]).await?;
        let mut counts: HashMap<ManagerId, usize> = HashMap::new();
        for row in assignments {
            if let Some(id) = row.assigned_manager_id {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        for profile in profiles.iter_mut() {
            profile.assigned_events_count = counts.get(&profile.id).copied().unwrap_or(0);
        }

        Ok(profiles)
    }

    async fn insert_profile(&mut self, profile: Manager, role: Role) -> Result<(), DeskError> {
        self.insert(PROFILES, &profile).await?;
        let granted = self.insert(USER_ROLES, &RoleAssignment{ user_id: profile.id.clone(), role }).await;
        if let Err(err) = granted {
            log::warn!("Unable to grant role {} to {}, removing its profile", role.as_str(), profile.id);
            if let Err(rollback_err) = self.delete(PROFILES, &[("user_id", eq(&profile.id))]).await {
                log::error!("Profile {} is left without a role: {}", profile.id, rollback_err);
            }
            return Err(err);
        }
        Ok(())
    }

    async fn update_profile(&mut self, profile: Manager) -> Result<(), DeskError> {
        let n_updated = self.update(PROFILES, &[("user_id", eq(&profile.id))], &profile).await?;
        if n_updated == 0 {
            return Err(DeskError::not_found("manager", &profile.id));
        }
        Ok(())
    }

    async fn remove_profile(&mut self, id: &ManagerId) -> Result<(), DeskError> {
        // Roles reference profiles, so they go first. They are put back if the profile cannot be deleted
        let roles: Vec<RoleAssignment> = self.select(USER_ROLES, &[
            ("select", "user_id,role".to_string()),
            ("user_id", eq(id)),
        ]).await?;
        self.delete(USER_ROLES, &[("user_id", eq(id))]).await?;

        if let Err(err) = self.delete(PROFILES, &[("user_id", eq(id))]).await {
            log::warn!("Unable to delete profile {}, restoring its roles", id);
            if roles.is_empty() == false {
                if let Err(rollback_err) = self.insert(USER_ROLES, &roles).await {
                    log::error!("Roles of {} are lost: {}", id, rollback_err);
                }
            }
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn load_tasks(&self) -> Result<TaskStore, DeskError> {
        let tasks: Vec<Task> = self.select(TASKS, &[("select", "*".to_string())]).await?;
        log::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks.into_iter().collect())
    }

    async fn save_tasks(&mut self, tasks: &TaskStore) -> Result<(), DeskError> {
        let rows: Vec<&Task> = tasks.iter().collect();
        if rows.is_empty() {
            return Ok(());
        }
        self.upsert(TASKS, &rows).await
    }
}
