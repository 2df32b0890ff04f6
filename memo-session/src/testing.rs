use crate::manager::Authenticator;
use memo_auth::{AuthError, Credential, User};
use secrecy::{ExposeSecret, SecretString};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory authenticator for session tests (no network, no filesystem)
///
/// Follows the real backend contract: registered accounts can log in, a held
/// credential resolves to its user, an unknown credential is dropped like a
/// rejected one. Failure modes are switchable per test, and call counters
/// let tests assert which operations actually ran.
pub struct MockAuth {
    accounts: RefCell<HashMap<String, MockAccount>>,
    credential: RefCell<Option<Credential>>,
    next_id: Cell<i64>,
    pub login_calls: Cell<usize>,
    pub register_calls: Cell<usize>,
    pub profile_calls: Cell<usize>,
    pub fail_login: RefCell<Option<String>>,
    pub fail_profile: Cell<bool>,
    pub reject_registration: RefCell<Option<String>>,
}

struct MockAccount {
    password: String,
    user: User,
}

impl MockAuth {
    pub fn new() -> Self {
        Self {
            accounts: RefCell::new(HashMap::new()),
            credential: RefCell::new(None),
            next_id: Cell::new(1),
            login_calls: Cell::new(0),
            register_calls: Cell::new(0),
            profile_calls: Cell::new(0),
            fail_login: RefCell::new(None),
            fail_profile: Cell::new(false),
            reject_registration: RefCell::new(None),
        }
    }

    /// Create an account directly, bypassing the registration counter.
    pub fn add_account(&self, username: &str, email: &str, password: &str) -> User {
        let user = User {
            id: self.next_id.replace(self.next_id.get() + 1),
            username: username.to_string(),
            email: email.to_string(),
            is_active: true,
        };

        self.accounts.borrow_mut().insert(
            username.to_string(),
            MockAccount {
                password: password.to_string(),
                user: user.clone(),
            },
        );

        user
    }

    /// Pretend an earlier run logged in as `username`.
    pub fn seed_credential_for(&self, username: &str) {
        *self.credential.borrow_mut() = Some(token_for(username));
    }

    /// Pretend an earlier run left behind a credential the server no longer
    /// accepts.
    pub fn seed_stale_credential(&self) {
        *self.credential.borrow_mut() = Some(Credential {
            access_token: "stale".to_string(),
            token_type: "bearer".to_string(),
        });
    }

    pub fn stored_credential(&self) -> Option<Credential> {
        self.credential.borrow().clone()
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new()
    }
}

fn token_for(username: &str) -> Credential {
    Credential {
        access_token: format!("token-{}", username),
        token_type: "bearer".to_string(),
    }
}

impl Authenticator for MockAuth {
    async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential, AuthError> {
        self.login_calls.set(self.login_calls.get() + 1);

        if let Some(detail) = self.fail_login.borrow().clone() {
            return Err(AuthError::LoginRejected(detail));
        }

        let known = matches!(
            self.accounts.borrow().get(username),
            Some(account) if account.password == password.expose_secret()
        );
        if !known {
            return Err(AuthError::LoginRejected(
                "Incorrect username or password".to_string(),
            ));
        }

        let credential = token_for(username);
        *self.credential.borrow_mut() = Some(credential.clone());
        Ok(credential)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        self.register_calls.set(self.register_calls.get() + 1);

        if let Some(detail) = self.reject_registration.borrow().clone() {
            return Err(AuthError::RegistrationRejected(detail));
        }
        if self.accounts.borrow().contains_key(username) {
            return Err(AuthError::RegistrationRejected(
                "Username already registered".to_string(),
            ));
        }

        Ok(self.add_account(username, email, password.expose_secret()))
    }

    fn logout(&self) {
        *self.credential.borrow_mut() = None;
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(credential) = self.stored_credential() else {
            return Ok(None);
        };

        self.profile_calls.set(self.profile_calls.get() + 1);

        if self.fail_profile.get() {
            return Err(AuthError::ProfileFetch("connection reset".to_string()));
        }

        let user = self
            .accounts
            .borrow()
            .values()
            .find(|account| token_for(&account.user.username) == credential)
            .map(|account| account.user.clone());

        match user {
            Some(user) => Ok(Some(user)),
            None => {
                // A credential the server does not recognize gets dropped,
                // matching the real client's handling of a 401
                self.logout();
                Ok(None)
            }
        }
    }

    fn is_authenticated(&self) -> bool {
        self.credential.borrow().is_some()
    }
}
