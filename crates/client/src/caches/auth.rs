//! Login state as seen by views.

use tokio::sync::RwLock;

use shelfline_auth::{LoginRequest, RegisterRequest, UserProfile};
use shelfline_inventory::get_initials;

use crate::caches::{HasStatus, Status, begin, record_failure};
use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Debug, Default)]
struct AuthState {
    status: Status,
}

impl HasStatus for AuthState {
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

#[derive(Debug)]
pub struct AuthCache {
    api: ApiClient,
    state: RwLock<AuthState>,
}

impl AuthCache {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    /// Re-read token storage and refresh the flag.
    pub fn check_auth(&self) -> bool {
        self.api.session().check_auth()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.api.session().user()
    }

    /// Avatar initials of the signed-in user.
    pub fn initials(&self) -> Option<String> {
        self.current_user().map(|u| get_initials(&u.email))
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status.clone()
    }

    /// Exchange credentials for a token and remember it. When the login
    /// response carries no profile, `/auth/verify` is asked for one.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let req = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        begin(&self.state).await;
        let result: Result<UserProfile, ClientError> = async {
            let token = self.api.login(&req).await?;
            self.api
                .session()
                .establish(&token.access_token, token.user.clone())?;
            match token.user {
                Some(user) => Ok(user),
                None => self.verify().await,
            }
        }
        .await;

        match result {
            Ok(user) => {
                self.state.write().await.status = Status::default();
                tracing::info!(username = %user.username, "signed in");
                Ok(user)
            }
            Err(err) => {
                record_failure(&self.state, "login", &err).await;
                Err(err)
            }
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<UserProfile, ClientError> {
        begin(&self.state).await;
        match self.api.register(&req).await {
            Ok(user) => {
                self.state.write().await.status = Status::default();
                Ok(user)
            }
            Err(err) => {
                record_failure(&self.state, "register", &err).await;
                Err(err)
            }
        }
    }

    /// Ask the backend who the stored token belongs to.
    pub async fn verify(&self) -> Result<UserProfile, ClientError> {
        let user = self.api.verify().await?;
        self.api.session().set_user(user.clone());
        Ok(user)
    }

    /// Tell the backend, then forget the token and return to the login route
    /// even if the backend call failed.
    pub async fn logout(&self) {
        if self.api.session().token().is_some() {
            if let Err(err) = self.api.logout().await {
                tracing::warn!(error = %err, "logout call failed; clearing local session anyway");
            }
        }
        self.api.session().clear();
        self.state.write().await.status = Status::default();
        self.api.redirect_to_login();
    }
}
