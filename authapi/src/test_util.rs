//! Doubles shared by the unit tests of this crate

use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use authapi_clock::DurationSecs;

use crate::{AuthApi, AuthApiError, AuthToken};

pub(crate) const LOGIN_LIFETIME: DurationSecs = DurationSecs(60);
pub(crate) const REFRESH_LIFETIME: DurationSecs = DurationSecs(3600);

/// An AuthApi double that issues `login:<username>` tokens and
/// `refresh:<content>` tokens, counting every call
#[derive(Debug, Default)]
pub(crate) struct ScriptedAuthApi {
    failing: bool,
    get_token_calls: AtomicUsize,
    login_calls: AtomicUsize,
    refreshed: Mutex<Vec<String>>,
}

impl ScriptedAuthApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub(crate) fn get_token_calls(&self) -> usize {
        self.get_token_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Contents of every token passed to `refresh`, in order
    pub(crate) fn refreshed(&self) -> Vec<String> {
        self.refreshed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for ScriptedAuthApi {
    async fn get_token(
        &self,
        username: &str,
        password: &str,
        refresh: bool,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        self.get_token_calls.fetch_add(1, Ordering::SeqCst);
        let token = self.login(username, password).await?;
        if refresh {
            self.refresh(&token).await
        } else {
            Ok(token)
        }
    }

    async fn login(&self, username: &str, _password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(AuthApiError::request(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "authority unreachable",
            )));
        }

        Ok(Arc::new(AuthToken::new(
            format!("login:{}", username),
            LOGIN_LIFETIME,
        )))
    }

    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
        self.refreshed
            .lock()
            .unwrap()
            .push(token.content().as_str().to_owned());
        Ok(Arc::new(AuthToken::new(
            format!("refresh:{}", token.content().as_str()),
            REFRESH_LIFETIME,
        )))
    }
}
