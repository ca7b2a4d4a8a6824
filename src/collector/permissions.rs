//! Permission state collector.
//!
//! The only asynchronous collector. Queries run one after another; a query
//! that the host rejects (unknown permission name, missing registry) leaves
//! that entry absent without affecting the others.

use super::available;
use super::types::PermissionRecord;
use crate::env::{EnvironmentProvider, PermissionName, PermissionState};

async fn query(env: &dyn EnvironmentProvider, name: PermissionName) -> Option<PermissionState> {
    available(name.as_str(), env.query_permission(name).await)
}

pub async fn collect_permissions(env: &dyn EnvironmentProvider) -> PermissionRecord {
    PermissionRecord {
        geolocation: query(env, PermissionName::Geolocation).await,
        notifications: query(env, PermissionName::Notifications).await,
        camera: query(env, PermissionName::Camera).await,
        microphone: query(env, PermissionName::Microphone).await,
        clipboard: query(env, PermissionName::ClipboardRead).await,
        midi: query(env, PermissionName::Midi).await,
        persistent_storage: query(env, PermissionName::PersistentStorage).await,
        push: query(env, PermissionName::Push).await,
    }
}
