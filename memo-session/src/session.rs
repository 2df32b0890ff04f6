use memo_auth::User;

/// In-memory session state for one running client instance.
///
/// `user` present means authenticated; `loading` marks session operations in
/// flight (including the initial hydration); `error` holds the last failure
/// message for display. Only the session manager writes this struct,
/// everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
