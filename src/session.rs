use tracing::{info, warn};

use crate::domain::{Identity, KeyValueStore};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

/// Who is using the client right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(Identity),
}

/// Owns the in-memory session and mirrors it into a [`KeyValueStore`].
///
/// The in-memory copy is authoritative; a store that fails to read or write
/// is logged and otherwise ignored.
#[derive(Debug)]
pub struct SessionState<S>
where
    S: KeyValueStore,
{
    store: S,
    session: Session,
}

impl<S> SessionState<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: Session::LoggedOut,
        }
    }

    /// Picks up a previously persisted identity. Anything unreadable or
    /// malformed leaves the session logged out.
    pub fn restore(&mut self) -> &Session {
        let raw = match self.store.load(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return &self.session,
            Err(e) => {
                warn!(error = %e, "Could not read persisted identity");
                return &self.session;
            }
        };

        match Identity::from_json(&raw) {
            Some(identity) => {
                info!(user = %identity.id, "Restored session");
                self.session = Session::LoggedIn(identity);
            }
            None => warn!("Ignoring malformed persisted identity"),
        }

        &self.session
    }

    pub fn establish(&mut self, identity: Identity) {
        match identity.to_json() {
            Ok(raw) => {
                if let Err(e) = self.store.save(USER_KEY, &raw) {
                    warn!(error = %e, "Could not persist identity");
                }
            }
            Err(e) => warn!(error = %e, "Could not serialize identity"),
        }

        info!(user = %identity.id, "Session established");
        self.session = Session::LoggedIn(identity);
    }

    /// Login responses carry a bearer credential next to the identity. It is
    /// kept for the network collaborators and never looked at here.
    pub fn establish_with_token(&mut self, identity: Identity, token: &str) {
        if let Err(e) = self.store.save(TOKEN_KEY, token) {
            warn!(error = %e, "Could not persist token");
        }
        self.establish(identity);
    }

    pub fn clear(&mut self) {
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(error = %e, key, "Could not erase persisted session value");
            }
        }

        if let Session::LoggedIn(identity) = &self.session {
            info!(user = %identity.id, "Session cleared");
        }
        self.session = Session::LoggedOut;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.session {
            Session::LoggedIn(identity) => Some(identity),
            Session::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity().is_some()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.store.load(TOKEN_KEY).ok().flatten()
    }

    /// The identity, but only while a bearer credential is also on hand.
    /// Flows that call the payment service need both.
    pub fn require_identity(&self) -> Option<&Identity> {
        let identity = self.identity()?;
        self.bearer_token().map(|_| identity)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, IdentityId};
    use crate::storage::MemoryStore;

    fn asha() -> Identity {
        Identity::new(IdentityId::Number(7), "Asha").with_field("upiId", "asha@upi")
    }

    #[test]
    fn starts_logged_out() {
        let state = SessionState::new(MemoryStore::new());
        assert_eq!(state.session(), &Session::LoggedOut);
        assert!(!state.is_logged_in());
    }

    #[test]
    fn establish_persists_for_restore() {
        let mut state = SessionState::new(MemoryStore::new());
        state.establish(asha());
        assert_eq!(state.identity(), Some(&asha()));

        let mut restored = SessionState::new(state.store().clone());
        assert_eq!(restored.restore(), &Session::LoggedIn(asha()));
    }

    #[test]
    fn clear_then_restore_stays_logged_out() {
        let mut state = SessionState::new(MemoryStore::new());
        state.establish_with_token(asha(), "tok");
        state.clear();
        state.clear();
        assert_eq!(state.session(), &Session::LoggedOut);
        assert_eq!(state.restore(), &Session::LoggedOut);
        assert_eq!(state.bearer_token(), None);
    }

    #[test]
    fn malformed_persisted_identity_is_no_session() {
        for raw in ["not json", "{}", r#"{"id":1}"#, "42", ""] {
            let mut store = MemoryStore::new();
            store.save(USER_KEY, raw).unwrap();
            let mut state = SessionState::new(store);
            assert_eq!(state.restore(), &Session::LoggedOut, "input {raw:?}");
        }
    }

    #[test]
    fn require_identity_needs_a_token() {
        let mut state = SessionState::new(MemoryStore::new());
        state.establish(asha());
        assert!(state.is_logged_in());
        assert_eq!(state.require_identity(), None);

        state.establish_with_token(asha(), "tok");
        assert_eq!(state.require_identity(), Some(&asha()));
        assert_eq!(state.bearer_token().as_deref(), Some("tok"));
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, Error> {
            Err(Error::Ingestion("disk gone".to_string()))
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), Error> {
            Err(Error::Ingestion("disk gone".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), Error> {
            Err(Error::Ingestion("disk gone".to_string()))
        }
    }

    #[test]
    fn store_failures_do_not_block_transitions() {
        let mut state = SessionState::new(BrokenStore);
        assert_eq!(state.restore(), &Session::LoggedOut);
        state.establish(asha());
        assert!(state.is_logged_in());
        state.clear();
        assert!(!state.is_logged_in());
    }
}
