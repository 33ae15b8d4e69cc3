//! Demo session context.
//!
//! Production sign-in is delegated to the external identity provider; demo
//! mode fabricates a per-role profile instead. Session state lives in an
//! explicit [`SessionStore`] owned by the application state and passed by
//! reference to whoever needs the active profile — there is no ambient
//! global.

use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::{UserProfile, UserRole};

/// Fabricated profile for a demo session of the given role.
pub fn demo_profile(role: UserRole) -> UserProfile {
    let name = match role {
        UserRole::Admin => "Demo Admin",
        UserRole::Pmo => "Demo PMO",
        UserRole::Pm => "Demo Manager",
        UserRole::DeliveryHead => "Demo Delivery Head",
        UserRole::Employee => "Demo Employee",
        UserRole::Management => "Demo Management",
    };
    UserProfile { name: name.to_string(), app_role: role }
}

/// Token-keyed session state with an explicit load/save/clear lifecycle.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, UserProfile>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a demo session and return its token together with the profile.
    pub fn login_demo(&self, role: UserRole) -> (String, UserProfile) {
        let token = Uuid::new_v4().to_string();
        let profile = demo_profile(role);
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(token.clone(), profile.clone());
        }
        (token, profile)
    }

    /// Look up the profile for a token.
    pub fn load(&self, token: &str) -> Option<UserProfile> {
        self.sessions.lock().ok()?.get(token).cloned()
    }

    /// End the session for a token. Unknown tokens are a no-op.
    pub fn clear(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(token);
        }
    }

    /// Resolve a token to a profile that may manage resources.
    ///
    /// Import commits go through here: a missing or unknown token is an
    /// invalid session, a known session with the wrong role is forbidden.
    pub fn authorize_manager(&self, token: Option<&str>) -> Result<UserProfile, SessionError> {
        let token = token.ok_or(SessionError::InvalidToken)?;
        let profile = self.load(token).ok_or(SessionError::InvalidToken)?;
        if !profile.app_role.can_manage_resources() {
            return Err(SessionError::Forbidden(profile.app_role.as_str().to_string()));
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_load_clear_lifecycle() {
        let store = SessionStore::new();
        let (token, profile) = store.login_demo(UserRole::Pmo);

        assert_eq!(profile.name, "Demo PMO");
        assert_eq!(store.load(&token), Some(profile));

        store.clear(&token);
        assert_eq!(store.load(&token), None);
    }

    #[test]
    fn test_unknown_token_loads_nothing() {
        let store = SessionStore::new();
        assert_eq!(store.load("not-a-token"), None);
        store.clear("not-a-token");
    }

    #[test]
    fn test_tokens_are_unique_per_login() {
        let store = SessionStore::new();
        let (a, _) = store.login_demo(UserRole::Admin);
        let (b, _) = store.login_demo(UserRole::Admin);
        assert_ne!(a, b);
    }

    #[test]
    fn test_demo_profiles_per_role() {
        assert_eq!(demo_profile(UserRole::Employee).name, "Demo Employee");
        assert_eq!(demo_profile(UserRole::Management).app_role, UserRole::Management);
    }

    #[test]
    fn test_authorize_manager() {
        let store = SessionStore::new();

        assert_eq!(store.authorize_manager(None), Err(SessionError::InvalidToken));
        assert_eq!(store.authorize_manager(Some("bogus")), Err(SessionError::InvalidToken));

        let (employee_token, _) = store.login_demo(UserRole::Employee);
        assert_eq!(
            store.authorize_manager(Some(&employee_token)),
            Err(SessionError::Forbidden("employee".into()))
        );

        let (pmo_token, _) = store.login_demo(UserRole::Pmo);
        let profile = store.authorize_manager(Some(&pmo_token)).unwrap();
        assert_eq!(profile.app_role, UserRole::Pmo);
    }
}
