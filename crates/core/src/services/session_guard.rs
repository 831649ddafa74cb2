use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::route::Route;
use crate::navigation::Navigator;
use crate::storage::credential_store::CredentialStore;

/// Keeps protected views from rendering without a credential.
///
/// The check is synchronous and touches nothing but the credential store,
/// so it always runs before any network call of the protected view.
pub struct SessionGuard {
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(credentials: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            credentials,
            navigator,
        }
    }

    /// Gate entry to a protected view.
    ///
    /// Anonymous sessions are redirected to login and get
    /// `ClientError::NotAuthenticated`.
    pub fn enter_protected(&self) -> Result<(), ClientError> {
        if self.credentials.is_authenticated() {
            return Ok(());
        }
        tracing::info!("No credential, redirecting to login");
        self.navigator.navigate(Route::Login);
        Err(ClientError::NotAuthenticated)
    }

    /// Gate entry to an arbitrary route.
    pub fn enter(&self, route: Route) -> Result<(), ClientError> {
        if route.is_protected() {
            self.enter_protected()
        } else {
            Ok(())
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }
}
