use serde::Deserialize;

/// User identity as returned by the auth service's verify endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("auth service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// HTTP client for the auth service. Tokens are opaque here; the remote
/// service owns validation.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/users/verify", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let user = response
            .json::<AuthUser>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(user)
    }
}
