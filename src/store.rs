// ============================================================================
// Data-Access Interfaces
// ============================================================================
//
// Persistent storage is an external collaborator: the services talk to
// opaque CRUD stores through these traits, owned and wired by the
// composing process. The in-memory implementations back tests and demo
// deployments; a real deployment would supply database-backed ones.
//
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(String),
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
}

/// Opaque user store. Credential-hashing mechanics live inside the
/// implementation; the services only see create/find/authenticate.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, email: &str, password: &str) -> Result<UserRecord, StoreError>;
    async fn find_by_email(&self, email: &str) -> Option<UserRecord>;
    /// Returns the user when the email exists and the password matches
    async fn authenticate(&self, email: &str, password: &str) -> Option<UserRecord>;
}

struct StoredUser {
    id: i64,
    email: String,
    password: String,
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<StoredUser>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, email: &str, password: &str) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("Email already registered".to_string()));
        }
        let id = users.len() as i64 + 1;
        users.push(StoredUser {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(UserRecord {
            id,
            email: email.to_string(),
        })
    }

    async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let users = self.users.read().await;
        users.iter().find(|u| u.email == email).map(|u| UserRecord {
            id: u.id,
            email: u.email.clone(),
        })
    }

    async fn authenticate(&self, email: &str, password: &str) -> Option<UserRecord> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| UserRecord {
                id: u.id,
                email: u.email.clone(),
            })
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// One profile per user; a second create for the same user is a duplicate
    async fn create(&self, user_id: i64, name: &str, bio: Option<&str>)
        -> Result<Profile, StoreError>;
    async fn find_by_user(&self, user_id: i64) -> Option<Profile>;
    async fn find_by_id(&self, profile_id: i64) -> Option<Profile>;
    /// Returns None when the user has no profile to update
    async fn update(&self, user_id: i64, name: &str, bio: Option<&str>) -> Option<Profile>;
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create(
        &self,
        user_id: i64,
        name: &str,
        bio: Option<&str>,
    ) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.user_id == user_id) {
            return Err(StoreError::Duplicate(
                "Profile already exists for this user".to_string(),
            ));
        }
        let now = Utc::now();
        let profile = Profile {
            id: profiles.len() as i64 + 1,
            user_id,
            name: name.to_string(),
            bio: bio.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_by_user(&self, user_id: i64) -> Option<Profile> {
        let profiles = self.profiles.read().await;
        profiles.iter().find(|p| p.user_id == user_id).cloned()
    }

    async fn find_by_id(&self, profile_id: i64) -> Option<Profile> {
        let profiles = self.profiles.read().await;
        profiles.iter().find(|p| p.id == profile_id).cloned()
    }

    async fn update(&self, user_id: i64, name: &str, bio: Option<&str>) -> Option<Profile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.iter_mut().find(|p| p.user_id == user_id)?;
        profile.name = name.to_string();
        profile.bio = bio.map(str::to_string);
        profile.updated_at = Utc::now();
        Some(profile.clone())
    }
}

// ============================================================================
// Analytics Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub user_id: Option<i64>,
    pub event_type: String,
    #[serde(default)]
    pub event_data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub event_type: String,
    pub count: usize,
}

/// Append-only event log with filter and aggregate reads
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append(&self, event: AnalyticsEvent);
    /// Most recent events first, optionally filtered by type
    async fn list(&self, event_type: Option<&str>, limit: usize) -> Vec<AnalyticsEvent>;
    async fn summary(&self) -> Vec<EventSummary>;
    async fn clear(&self);
}

#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<AnalyticsEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: AnalyticsEvent) {
        self.events.write().await.push(event);
    }

    async fn list(&self, event_type: Option<&str>, limit: usize) -> Vec<AnalyticsEvent> {
        let events = self.events.read().await;
        let mut filtered: Vec<AnalyticsEvent> = events
            .iter()
            .filter(|e| event_type.map_or(true, |t| e.event_type == t))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        filtered.truncate(limit);
        filtered
    }

    async fn summary(&self) -> Vec<EventSummary> {
        let events = self.events.read().await;
        let mut counts: Vec<EventSummary> = Vec::new();
        for event in events.iter() {
            match counts.iter_mut().find(|s| s.event_type == event.event_type) {
                Some(entry) => entry.count += 1,
                None => counts.push(EventSummary {
                    event_type: event.event_type.clone(),
                    count: 1,
                }),
            }
        }
        counts
    }

    async fn clear(&self) {
        self.events.write().await.clear();
    }
}

/// Populate a store with demo events. Invoked explicitly by the composing
/// process (the analytics binary), not by a hidden startup hook.
pub async fn seed_demo_events(store: &Arc<dyn EventStore>) {
    let demo: Vec<(Option<i64>, &str, serde_json::Value)> = vec![
        (Some(1), "login", json!({ "ip": "192.168.1.1" })),
        (Some(2), "page_view", json!({ "page": "home" })),
        (Some(1), "profile_update", json!({ "fields": ["name", "bio"] })),
        (Some(3), "login", json!({ "ip": "192.168.1.5" })),
        (Some(2), "logout", json!({})),
    ];

    let count = demo.len();
    for (user_id, event_type, event_data) in demo {
        store
            .append(AnalyticsEvent {
                id: Uuid::new_v4(),
                user_id,
                event_type: event_type.to_string(),
                event_data,
                timestamp: Utc::now(),
            })
            .await;
    }

    tracing::info!("Added {} demo events", count);
}
