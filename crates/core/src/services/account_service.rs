use reqwest::Method;

use crate::api::endpoints;
use crate::api::gateway::Gateway;
use crate::api::traits::RequestBody;
use crate::errors::ClientError;
use crate::models::route::Route;
use crate::models::user::{Credentials, StatusMessage, TokenResponse, User};

/// Shown after a successful registration.
pub const REGISTERED_NOTICE: &str = "Registration successful! Please log in.";

/// Login, registration, logout and account lifecycle.
///
/// Stateless: the credential lives in the gateway's store.
pub struct AccountService;

impl AccountService {
    pub fn new() -> Self {
        Self
    }

    /// Exchange username/password for a bearer token and store it.
    /// Navigates home on success.
    pub async fn login(&self, gateway: &Gateway, credentials: &Credentials) -> Result<(), ClientError> {
        credentials.validate()?;

        let token: TokenResponse = gateway
            .call_public(
                Method::POST,
                endpoints::TOKEN,
                Some(RequestBody::Form(credentials.as_form())),
                "Login failed",
            )
            .await?;

        if token.access_token.is_empty() {
            return Err(ClientError::Api {
                status: 200,
                message: "Login failed".into(),
            });
        }

        gateway.credentials().save(&token.access_token)?;
        tracing::info!(username = %credentials.username.trim(), "Logged in");
        gateway.navigator().navigate(Route::Home);
        Ok(())
    }

    /// Create an account. Does not log in; navigates to the login view.
    pub async fn register(&self, gateway: &Gateway, credentials: &Credentials) -> Result<User, ClientError> {
        credentials.validate()?;

        let body = RequestBody::json(&Credentials::new(
            credentials.username.trim(),
            credentials.password.clone(),
        ))?;
        let user: User = gateway
            .call_public(Method::POST, endpoints::REGISTER, Some(body), "Registration failed")
            .await?;

        tracing::info!(username = %user.username, "Registered");
        gateway.navigator().navigate(Route::Login);
        Ok(user)
    }

    /// The user the current credential belongs to.
    pub async fn current_user(&self, gateway: &Gateway) -> Result<User, ClientError> {
        gateway.call(Method::GET, endpoints::CURRENT_USER, None).await
    }

    /// Forget the credential and go back to login.
    pub fn logout(&self, gateway: &Gateway) -> Result<(), ClientError> {
        gateway.credentials().clear()?;
        tracing::info!("Logged out");
        gateway.navigator().navigate(Route::Login);
        Ok(())
    }

    /// Delete the account and all of its transactions, then log out.
    /// Returns the server's confirmation message.
    pub async fn delete_account(&self, gateway: &Gateway) -> Result<String, ClientError> {
        let status: StatusMessage = gateway
            .call(Method::DELETE, endpoints::CURRENT_USER, None)
            .await?;
        self.logout(gateway)?;
        Ok(status.message)
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}
