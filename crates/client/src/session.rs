use tokio::sync::RwLock;

/// Who is logged in and the bearer token sent with every request.
///
/// Shared by reference with the transport; login fills it, logout and [`clear`](Self::clear)
/// empty it, and a token refresh replaces the token.
#[derive(Debug, Default)]
pub struct SessionContext {
    token: RwLock<Option<String>>,
    username: RwLock<Option<String>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn username(&self) -> Option<String> {
        self.username.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub(crate) async fn begin(&self, username: &str, token: String) {
        *self.username.write().await = Some(username.to_string());
        *self.token.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
        *self.username.write().await = None;
    }
}
