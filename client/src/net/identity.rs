//! Identity-provider seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sign-in, sign-out, session-change notifications, and bearer credentials
//! come from an external identity provider. The session services depend only
//! on the [`IdentityProvider`] trait; the browser build binds it to a
//! page-supplied `window.clinicalAuth` object:
//!
//! ```text
//! clinicalAuth.signIn()            -> Promise<User>
//! clinicalAuth.signOut()           -> Promise<void>
//! clinicalAuth.idToken()           -> Promise<string>
//! clinicalAuth.onSessionChange(cb) -> () => void   // cb(User | null)
//! ```
//!
//! `User` is any object whose JSON form carries `uid`, and optionally
//! `displayName` and `email`.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures become [`AuthProviderError`]. Callers log them; they are
//! never surfaced to the user beyond diagnostics.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Authenticated user handle issued by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-issued stable user ID.
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    /// Name shown in greetings: display name, then email, then uid.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthProviderError {
    #[error("sign-in failed: {0}")]
    SignIn(String),
    #[error("sign-out failed: {0}")]
    SignOut(String),
    #[error("credential unavailable: {0}")]
    Token(String),
    #[error("identity payload malformed: {0}")]
    Payload(String),
}

/// Callback invoked with the current identity on every session change,
/// including once at subscription time.
pub type SessionCallback = Box<dyn Fn(Option<Identity>)>;

/// Handle for an active session-change subscription.
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self { teardown: Some(Box::new(teardown)) }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }

    /// Stop receiving notifications. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

/// Operations consumed from the external identity provider.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Run the interactive sign-in flow.
    async fn sign_in(&self) -> Result<Identity, AuthProviderError>;

    /// End the provider session. Idempotent.
    async fn sign_out(&self) -> Result<(), AuthProviderError>;

    /// Register for session-change notifications.
    fn subscribe(&self, on_change: SessionCallback) -> Subscription;

    /// Fetch a short-lived bearer credential for the current session.
    async fn id_token(&self) -> Result<String, AuthProviderError>;
}

/// Decode the JSON form of a provider user object. `null` means signed out.
#[cfg(any(test, feature = "hydrate"))]
fn parse_identity_json(raw: &str) -> Result<Option<Identity>, AuthProviderError> {
    serde_json::from_str::<Option<Identity>>(raw).map_err(|e| AuthProviderError::Payload(e.to_string()))
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserIdentity;

#[cfg(feature = "hydrate")]
mod browser {
    use async_trait::async_trait;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{AuthProviderError, Identity, IdentityProvider, SessionCallback, Subscription, parse_identity_json};

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_namespace = clinicalAuth, js_name = signIn)]
        async fn js_sign_in() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch, js_namespace = clinicalAuth, js_name = signOut)]
        async fn js_sign_out() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch, js_namespace = clinicalAuth, js_name = idToken)]
        async fn js_id_token() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_namespace = clinicalAuth, js_name = onSessionChange)]
        fn js_on_session_change(callback: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;
    }

    /// [`IdentityProvider`] backed by `window.clinicalAuth`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserIdentity;

    fn js_error_message(value: &JsValue) -> String {
        if let Some(error) = value.dyn_ref::<js_sys::Error>() {
            return String::from(error.message());
        }
        value.as_string().unwrap_or_else(|| format!("{value:?}"))
    }

    fn identity_from_js(value: &JsValue) -> Result<Option<Identity>, AuthProviderError> {
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        let raw = js_sys::JSON::stringify(value)
            .map_err(|e| AuthProviderError::Payload(js_error_message(&e)))?;
        parse_identity_json(&String::from(raw))
    }

    #[async_trait(?Send)]
    impl IdentityProvider for BrowserIdentity {
        async fn sign_in(&self) -> Result<Identity, AuthProviderError> {
            let user = js_sign_in().await.map_err(|e| AuthProviderError::SignIn(js_error_message(&e)))?;
            identity_from_js(&user)?.ok_or_else(|| AuthProviderError::SignIn("no user returned".to_owned()))
        }

        async fn sign_out(&self) -> Result<(), AuthProviderError> {
            js_sign_out()
                .await
                .map(|_| ())
                .map_err(|e| AuthProviderError::SignOut(js_error_message(&e)))
        }

        fn subscribe(&self, on_change: SessionCallback) -> Subscription {
            let closure = Closure::<dyn FnMut(JsValue)>::new(move |user: JsValue| match identity_from_js(&user) {
                Ok(identity) => on_change(identity),
                Err(e) => {
                    leptos::logging::warn!("ignoring session change: {e}");
                    on_change(None);
                }
            });
            let unsubscribe = js_on_session_change(&closure);
            Subscription::new(move || {
                let _ = unsubscribe.call0(&JsValue::NULL);
                drop(closure);
            })
        }

        async fn id_token(&self) -> Result<String, AuthProviderError> {
            let token = js_id_token().await.map_err(|e| AuthProviderError::Token(js_error_message(&e)))?;
            token
                .as_string()
                .ok_or_else(|| AuthProviderError::Token("token is not a string".to_owned()))
        }
    }
}
