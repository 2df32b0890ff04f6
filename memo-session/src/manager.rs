use crate::session::Session;
use memo_auth::{AuthClient, AuthError, Credential, User};
use secrecy::SecretString;

/// Trait for the authentication operations the session manager drives
/// (production = HTTP client + on-disk store, test = in-memory mock)
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    async fn login(&self, username: &str, password: &SecretString)
        -> Result<Credential, AuthError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError>;

    fn logout(&self);

    async fn current_user(&self) -> Result<Option<User>, AuthError>;

    fn is_authenticated(&self) -> bool;
}

impl Authenticator for AuthClient {
    async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential, AuthError> {
        AuthClient::login(self, username, password).await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        AuthClient::register(self, username, email, password).await
    }

    fn logout(&self) {
        AuthClient::logout(self)
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        AuthClient::current_user(self).await
    }

    fn is_authenticated(&self) -> bool {
        AuthClient::is_authenticated(self)
    }
}

/// Session state machine for one running client.
///
/// Generic over A (authenticator) for zero-cost abstraction. Constructed
/// once at startup and handed to whoever needs it; the `&mut self`
/// operations make it the single writer to the session state, so there is
/// no last-write-wins between concurrent auth flows.
pub struct SessionManager<A: Authenticator> {
    auth: A,
    session: Session,
}

impl<A: Authenticator> SessionManager<A> {
    /// Create a manager in the hydrating state. Call [`Self::hydrate`] to
    /// reconcile any persisted credential into the session.
    pub fn new(auth: A) -> Self {
        Self {
            auth,
            session: Session {
                loading: true,
                ..Session::default()
            },
        }
    }

    /// Read-only access to the current session state (for rendering or
    /// assertions).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying authenticator, for wiring up resource clients.
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Reconcile persisted credential state into the in-memory session.
    ///
    /// Always completes: a credential the server rejects resolves to the
    /// anonymous state, and an unreachable server records an error. Either
    /// way `loading` ends up false, never stuck.
    pub async fn hydrate(&mut self) {
        self.session.loading = true;
        self.session.error = None;

        if self.auth.is_authenticated() {
            match self.auth.current_user().await {
                Ok(Some(user)) => {
                    tracing::info!("Restored session for {}", user.username);
                    self.session.user = Some(user);
                }
                Ok(None) => {
                    tracing::info!("Stored credential no longer valid, starting anonymous");
                    self.session.user = None;
                }
                Err(e) => {
                    tracing::warn!("Failed to restore session: {}", e);
                    self.session.error = Some("Failed to authenticate".to_string());
                }
            }
        } else {
            // Store may have been cleared out-of-band; the session follows it
            tracing::debug!("No stored credential, starting anonymous");
            self.session.user = None;
        }

        self.session.loading = false;
    }

    /// Log in and load the signed-in profile.
    ///
    /// On failure the session keeps its previous user, the error message is
    /// recorded for display, and the failure is still returned so callers
    /// can branch on the kind.
    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        self.session.loading = true;
        self.session.error = None;

        let result = self.login_inner(username, password).await;
        if let Err(e) = &result {
            self.session.error = Some(e.to_string());
        }
        self.session.loading = false;

        result
    }

    async fn login_inner(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        self.auth.login(username, password).await?;
        self.session.user = self.auth.current_user().await?;
        Ok(())
    }

    /// Register a new account and, on success, immediately log in with the
    /// same credentials. A failure in the embedded login surfaces exactly
    /// like a direct login failure.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        self.session.loading = true;
        self.session.error = None;

        if let Err(e) = self.auth.register(username, email, password).await {
            self.session.error = Some(e.to_string());
            self.session.loading = false;
            return Err(e);
        }

        tracing::info!("Registered {}, logging in", username);
        self.login(username, password).await
    }

    /// Clear the credential and the in-memory user. Never fails and has no
    /// loading phase.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.session.user = None;
        tracing::info!("Logged out");
    }
}
