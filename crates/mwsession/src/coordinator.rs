//! Session coordination for wiki account login state.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use mwsession_core::error::{Error, InvalidInputError, TransportError};
use mwsession_core::{
    AccountLogin, AccountLogout, CookieStore, CredentialStore, Credentials, CurrentUserFetcher,
    LoginObserver, LoginOptions, LoginSubmission, LoginSuccess, Result, SavedCredentials,
    SavedLoginOutcome, SiteUrl, SyncController, TokenFetcher, TokenKind,
};

use crate::cookies::MemoryCookieJar;
use crate::store::MemoryCredentialStore;
use crate::sync::NoopSyncController;

/// Coordinates login, saved-credential reuse, and logout for a wiki account.
///
/// The coordinator owns the logged-in flag, keeps it reconciled with the
/// server session and the credential store, and publishes every change to
/// registered observers.
///
/// # Thread Safety
///
/// Coordinators are cheap to clone (they use an internal `Arc`) and safe to
/// share across tasks. [`login`](Self::login),
/// [`login_with_saved_credentials`](Self::login_with_saved_credentials),
/// [`logout`](Self::logout) and
/// [`reset_server_session`](Self::reset_server_session) are serialized per
/// instance; concurrent callers queue in arrival order.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use mwsession::{Credentials, LoginOptions, SessionCoordinator, SiteUrl};
/// use mwsession_action::ActionApi;
///
/// # async fn example() -> Result<(), mwsession::Error> {
/// let site = SiteUrl::new("https://en.wikipedia.org")?;
/// let coordinator = SessionCoordinator::builder(site)
///     .api(Arc::new(ActionApi::new()))
///     .build()?;
///
/// let success = coordinator
///     .login(Credentials::new("Alice", "hunter2"), LoginOptions::default())
///     .await?;
/// assert_eq!(coordinator.logged_in_username().as_deref(), Some(success.username.as_str()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    default_site: SiteUrl,
    language_prefix: Option<String>,
    operation_timeout: Option<Duration>,
    token_fetcher: Arc<dyn TokenFetcher>,
    account_login: Arc<dyn AccountLogin>,
    account_logout: Arc<dyn AccountLogout>,
    current_user: Arc<dyn CurrentUserFetcher>,
    credential_store: Arc<dyn CredentialStore>,
    cookie_store: Arc<dyn CookieStore>,
    sync: Arc<dyn SyncController>,
    observers: RwLock<Vec<Arc<dyn LoginObserver>>>,
    state: RwLock<Option<String>>,
    op_lock: Mutex<()>,
}

/// What the timed portion of a saved-credential login produced.
///
/// A rejected retry comes back as a value instead of an error: the caller
/// runs the local logout after the timeout window has closed, so expiry can
/// neither interrupt the wipe nor relabel the rejection as a timeout.
enum SavedLoginAttempt {
    Completed(SavedLoginOutcome),
    RetryRejected(Error),
}

impl SessionCoordinator {
    /// Start building a coordinator for the given default site.
    pub fn builder(default_site: SiteUrl) -> SessionCoordinatorBuilder {
        SessionCoordinatorBuilder::new(default_site)
    }

    // ========================================================================
    // State & Observers
    // ========================================================================

    /// Whether a user is currently logged in.
    pub fn is_logged_in(&self) -> bool {
        self.inner.state.read().unwrap().is_some()
    }

    /// The logged-in username, in the server-normalized form.
    pub fn logged_in_username(&self) -> Option<String> {
        self.inner.state.read().unwrap().clone()
    }

    /// The site used when no stored host overrides it.
    pub fn default_site(&self) -> &SiteUrl {
        &self.inner.default_site
    }

    /// Register an observer for logged-in state changes.
    pub fn register_observer(&self, observer: Arc<dyn LoginObserver>) {
        self.inner.observers.write().unwrap().push(observer);
    }

    /// Whether a complete saved credential record exists.
    ///
    /// A pure query: no network traffic, no state mutation. Store read
    /// failures read as `false`.
    pub async fn has_stored_credentials(&self) -> bool {
        matches!(self.inner.credential_store.load().await, Ok(Some(_)))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Log in with the given credentials.
    ///
    /// Resolves the target site from the stored host (falling back to the
    /// default site), fetches a login token, and submits the login. On
    /// success the credential record is persisted first, then the logged-in
    /// state flips, session cookies are reconciled, and observers are
    /// notified, in that order. A credential store failure aborts the login:
    /// state is never published ahead of durable credentials.
    ///
    /// # Errors
    ///
    /// Collaborator failures surface verbatim; see
    /// [`LoginError`](mwsession_core::error::LoginError) for the
    /// server-reported cases a caller may want to handle interactively.
    #[instrument(skip(self, credentials, options), fields(username = %credentials.username()))]
    pub async fn login(
        &self,
        credentials: Credentials,
        options: LoginOptions,
    ) -> Result<LoginSuccess> {
        let _guard = self.inner.op_lock.lock().await;
        self.with_timeout(self.login_locked(credentials, options))
            .await
    }

    /// Log in using the saved credential record.
    ///
    /// Asks the server who the current session belongs to before
    /// resubmitting anything: a still-authenticated session short-circuits
    /// to [`SavedLoginOutcome::AlreadyLoggedIn`]. Otherwise the logged-in
    /// flag is dropped and a fresh login runs with the stored credentials.
    ///
    /// A retry that fails with a connectivity error leaves the saved
    /// credentials in place; any other retry failure runs a full local
    /// logout before the error propagates. That logout is not subject to
    /// the operation timeout: once the rejection is in hand, the wipe
    /// always completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] without touching any state when
    /// the store holds no record. A store read failure surfaces as
    /// [`Error::Store`] before anything is contacted.
    #[instrument(skip(self))]
    pub async fn login_with_saved_credentials(&self) -> Result<SavedLoginOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let attempt = self.with_timeout(self.saved_login_locked()).await?;
        self.finish_saved_login(attempt).await
    }

    /// Log out and clear every piece of local account state.
    ///
    /// Clears the logged-in flag, the stored credentials, and all cookies,
    /// disables sync without deleting data, and re-arms one-time onboarding
    /// prompts. Never fails: collaborator errors are logged and the
    /// remaining steps still run. Returns only after all steps have
    /// completed, with the observer notification last.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _guard = self.inner.op_lock.lock().await;
        self.logout_locked().await;
    }

    /// Invalidate the server-side session, then re-establish it from the
    /// saved credentials.
    ///
    /// Used when server tokens or cookies are suspected stale: the
    /// CSRF-authorized logout clears them on the server, and the
    /// saved-credential flow brings the account back.
    #[instrument(skip(self))]
    pub async fn reset_server_session(&self) -> Result<SavedLoginOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let attempt = self.with_timeout(self.reset_server_session_locked()).await?;
        self.finish_saved_login(attempt).await
    }

    // ========================================================================
    // Operation bodies (op_lock held)
    // ========================================================================

    async fn login_locked(
        &self,
        credentials: Credentials,
        options: LoginOptions,
    ) -> Result<LoginSuccess> {
        let site = self.resolve_site().await;
        info!(site = %site, "Logging in");

        let token = self
            .inner
            .token_fetcher
            .fetch_token(TokenKind::Login, &site)
            .await?;
        debug!("Login token obtained");

        let submission = LoginSubmission::new(credentials.clone(), token, options);
        let success = self.inner.account_login.submit(&submission, &site).await?;

        // The server may normalize the username; its form is what gets
        // persisted and published.
        let saved =
            SavedCredentials::new(success.username.clone(), credentials.password().to_string())?;
        let saved = match site.host() {
            Some(host) => saved.with_host(host),
            None => saved,
        };
        self.inner.credential_store.store(&saved).await?;
        debug!("Credentials persisted");

        self.set_logged_in(Some(success.username.clone()));
        self.reconcile_cookies().await;
        self.notify_observers(true);

        info!(username = %success.username, "Login complete");
        Ok(success)
    }

    async fn saved_login_locked(&self) -> Result<SavedLoginAttempt> {
        let Some(saved) = self.inner.credential_store.load().await? else {
            debug!("No saved credentials");
            return Err(Error::MissingCredentials);
        };

        let site = self.site_for(&saved);
        info!(site = %site, "Reconciling saved session");

        match self.inner.current_user.fetch(&site).await {
            Ok(Some(identity)) => {
                debug!(username = %identity.username, "Server session still valid");
                self.set_logged_in(Some(identity.username.clone()));
                self.notify_observers(true);
                return Ok(SavedLoginAttempt::Completed(
                    SavedLoginOutcome::AlreadyLoggedIn(identity),
                ));
            }
            Ok(None) => {
                debug!("Server session is anonymous, retrying login");
            }
            Err(e) => {
                debug!(error = %e, "Current-user check failed, retrying login");
            }
        }

        // The local flag no longer reflects the server; drop it before the
        // retry so observers see the transition.
        self.set_logged_in(None);
        self.notify_observers(false);

        let credentials = saved.to_credentials();
        match self.login_locked(credentials, LoginOptions::default()).await {
            Ok(success) => Ok(SavedLoginAttempt::Completed(SavedLoginOutcome::LoggedIn(
                success,
            ))),
            Err(e) if e.is_connectivity() => {
                info!("Connectivity failure during credential retry, keeping saved credentials");
                Err(e)
            }
            Err(e) => Ok(SavedLoginAttempt::RetryRejected(e)),
        }
    }

    /// The untimed tail of a saved-credential operation: a rejected retry
    /// wipes local state before the error propagates.
    async fn finish_saved_login(&self, attempt: SavedLoginAttempt) -> Result<SavedLoginOutcome> {
        match attempt {
            SavedLoginAttempt::Completed(outcome) => Ok(outcome),
            SavedLoginAttempt::RetryRejected(e) => {
                warn!(error = %e, "Credential retry rejected, logging out");
                self.logout_locked().await;
                Err(e)
            }
        }
    }

    async fn logout_locked(&self) {
        info!("Logging out");

        self.set_logged_in(None);

        if let Err(e) = self.inner.credential_store.clear().await {
            warn!(error = %e, "Could not clear stored credentials");
        }
        if let Err(e) = self.inner.cookie_store.clear().await {
            warn!(error = %e, "Could not clear cookies");
        }
        if let Err(e) = self.inner.sync.set_enabled(false, false, false).await {
            warn!(error = %e, "Could not disable sync");
        }
        if let Err(e) = self.inner.sync.reset_onboarding().await {
            warn!(error = %e, "Could not reset onboarding prompts");
        }

        self.notify_observers(false);
        debug!("Logout complete");
    }

    async fn reset_server_session_locked(&self) -> Result<SavedLoginAttempt> {
        let site = self.resolve_site().await;
        info!(site = %site, "Resetting server session");

        let token = self
            .inner
            .token_fetcher
            .fetch_token(TokenKind::Csrf, &site)
            .await?;
        self.inner.account_logout.submit(&token, &site).await?;
        debug!("Server session invalidated");

        self.saved_login_locked().await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// The login target: the stored host when present and parseable,
    /// otherwise the configured default site.
    async fn resolve_site(&self) -> SiteUrl {
        match self.inner.credential_store.load().await {
            Ok(Some(saved)) => self.site_for(&saved),
            Ok(None) => self.inner.default_site.clone(),
            Err(e) => {
                warn!(error = %e, "Could not read stored credentials, using default site");
                self.inner.default_site.clone()
            }
        }
    }

    fn site_for(&self, saved: &SavedCredentials) -> SiteUrl {
        match saved.host() {
            Some(host) => match SiteUrl::from_host(host) {
                Ok(site) => site,
                Err(e) => {
                    warn!(error = %e, host, "Stored host is invalid, using default site");
                    self.inner.default_site.clone()
                }
            },
            None => self.inner.default_site.clone(),
        }
    }

    fn set_logged_in(&self, username: Option<String>) {
        *self.inner.state.write().unwrap() = username;
    }

    /// Publish the logged-in flag to every registered observer.
    fn notify_observers(&self, logged_in: bool) {
        // Snapshot first; callbacks must not run under the lock
        let observers = self.inner.observers.read().unwrap().clone();
        for observer in observers {
            observer.login_state_changed(logged_in);
        }
    }

    /// Recreate session cookies from their longer-lived identity templates.
    ///
    /// Best effort: misses and store failures are logged, never propagated.
    async fn reconcile_cookies(&self) {
        let Some(prefix) = self.inner.language_prefix.as_deref() else {
            debug!("No language prefix configured, skipping cookie reconciliation");
            return;
        };

        let pairs = [
            (
                format!("{}wikiSession", prefix),
                format!("{}wikiUserID", prefix),
            ),
            (
                "centralauth_Session".to_string(),
                "centralauth_User".to_string(),
            ),
        ];

        for (name, template) in &pairs {
            match self.inner.cookie_store.recreate(name, template).await {
                Ok(true) => debug!(cookie = %name, "Recreated session cookie"),
                Ok(false) => debug!(cookie = %name, "No cookie to recreate"),
                Err(e) => warn!(cookie = %name, error = %e, "Cookie recreation failed"),
            }
        }
    }

    /// Bound a serialized operation by the configured timeout.
    ///
    /// Expiry surfaces as a transport timeout, which counts as a
    /// connectivity failure, so a timed-out credential retry never wipes the
    /// saved record. The operation is abandoned at its current await point;
    /// steps that already completed stay applied, and no observer signal is
    /// published for work that did not finish.
    async fn with_timeout<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match self.inner.operation_timeout {
            Some(limit) => match tokio::time::timeout(limit, operation).await {
                Ok(result) => result,
                Err(_) => Err(Error::Transport(TransportError::Timeout {
                    duration_ms: limit.as_millis() as u64,
                })),
            },
            None => operation.await,
        }
    }
}

impl fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("default_site", &self.inner.default_site)
            .field("logged_in_username", &self.logged_in_username())
            .finish()
    }
}

/// Builder for [`SessionCoordinator`].
///
/// The four network collaborators are required (or supplied at once via
/// [`api`](Self::api)); the credential store, cookie store and sync
/// controller default to the in-crate memory and no-op implementations.
pub struct SessionCoordinatorBuilder {
    default_site: SiteUrl,
    language_prefix: Option<String>,
    operation_timeout: Option<Duration>,
    token_fetcher: Option<Arc<dyn TokenFetcher>>,
    account_login: Option<Arc<dyn AccountLogin>>,
    account_logout: Option<Arc<dyn AccountLogout>>,
    current_user: Option<Arc<dyn CurrentUserFetcher>>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    cookie_store: Option<Arc<dyn CookieStore>>,
    sync: Option<Arc<dyn SyncController>>,
    observers: Vec<Arc<dyn LoginObserver>>,
}

impl SessionCoordinatorBuilder {
    fn new(default_site: SiteUrl) -> Self {
        Self {
            default_site,
            language_prefix: None,
            operation_timeout: None,
            token_fetcher: None,
            account_login: None,
            account_logout: None,
            current_user: None,
            credential_store: None,
            cookie_store: None,
            sync: None,
            observers: Vec::new(),
        }
    }

    /// Use one implementation for all four network collaborators.
    pub fn api<A>(self, api: Arc<A>) -> Self
    where
        A: TokenFetcher + AccountLogin + AccountLogout + CurrentUserFetcher + 'static,
    {
        self.token_fetcher(api.clone())
            .account_login(api.clone())
            .account_logout(api.clone())
            .current_user_fetcher(api)
    }

    /// Set the token fetcher.
    pub fn token_fetcher(mut self, fetcher: Arc<dyn TokenFetcher>) -> Self {
        self.token_fetcher = Some(fetcher);
        self
    }

    /// Set the login submitter.
    pub fn account_login(mut self, login: Arc<dyn AccountLogin>) -> Self {
        self.account_login = Some(login);
        self
    }

    /// Set the server-side logout submitter.
    pub fn account_logout(mut self, logout: Arc<dyn AccountLogout>) -> Self {
        self.account_logout = Some(logout);
        self
    }

    /// Set the current-user fetcher.
    pub fn current_user_fetcher(mut self, fetcher: Arc<dyn CurrentUserFetcher>) -> Self {
        self.current_user = Some(fetcher);
        self
    }

    /// Set the credential store. Defaults to [`MemoryCredentialStore`].
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    /// Set the cookie store. Defaults to [`MemoryCookieJar`].
    pub fn cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.cookie_store = Some(store);
        self
    }

    /// Set the sync controller. Defaults to [`NoopSyncController`].
    pub fn sync_controller(mut self, sync: Arc<dyn SyncController>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Set the wiki language prefix used for cookie reconciliation
    /// (for example `"en"` for `enwikiSession`).
    ///
    /// Without a prefix the reconciliation step is skipped entirely.
    pub fn language_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.language_prefix = Some(prefix.into());
        self
    }

    /// Bound each network-facing operation by a timeout.
    ///
    /// Expiry surfaces as a transport timeout error, which counts as a
    /// connectivity failure. Local cleanup ([`logout`], the wipe after a
    /// rejected credential retry) never runs under the timer.
    ///
    /// [`logout`]: SessionCoordinator::logout
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Register an observer up front.
    pub fn observer(mut self, observer: Arc<dyn LoginObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the coordinator.
    ///
    /// # Errors
    ///
    /// Returns an invalid-configuration error if any network collaborator
    /// is missing.
    pub fn build(self) -> Result<SessionCoordinator> {
        let token_fetcher = self.token_fetcher.ok_or_else(|| missing("token fetcher"))?;
        let account_login = self.account_login.ok_or_else(|| missing("account login"))?;
        let account_logout = self
            .account_logout
            .ok_or_else(|| missing("account logout"))?;
        let current_user = self
            .current_user
            .ok_or_else(|| missing("current-user fetcher"))?;

        let credential_store = self
            .credential_store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let cookie_store = self
            .cookie_store
            .unwrap_or_else(|| Arc::new(MemoryCookieJar::new()));
        let sync = self.sync.unwrap_or_else(|| Arc::new(NoopSyncController));

        Ok(SessionCoordinator {
            inner: Arc::new(CoordinatorInner {
                default_site: self.default_site,
                language_prefix: self.language_prefix,
                operation_timeout: self.operation_timeout,
                token_fetcher,
                account_login,
                account_logout,
                current_user,
                credential_store,
                cookie_store,
                sync,
                observers: RwLock::new(self.observers),
                state: RwLock::new(None),
                op_lock: Mutex::new(()),
            }),
        })
    }
}

fn missing(part: &str) -> Error {
    Error::InvalidInput(InvalidInputError::Builder {
        message: format!("{} is required", part),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_network_collaborators() {
        let site = SiteUrl::new("https://test.example.org").unwrap();
        let result = SessionCoordinator::builder(site).build();
        assert!(matches!(
            result,
            Err(Error::InvalidInput(InvalidInputError::Builder { .. }))
        ));
    }
}
