//! Cookie-backed session store.
//!
//! Cookies are the only state that survives between requests: the login flow
//! keeps the PKCE verifier and CSRF state for ten minutes, a signed-in session
//! keeps the access token and user info for one hour.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::constants::{
    COOKIE_ACCESS_TOKEN, COOKIE_OAUTH_STATE, COOKIE_PKCE_VERIFIER, COOKIE_USER_INFO,
    LOGIN_FLOW_DURATION, SESSION_DURATION,
};
use crate::models::UserInfo;

/// Values stashed at login start and consumed by the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFlow {
    pub verifier: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy)]
pub struct CookieStore {
    secure: bool,
}

impl CookieStore {
    pub fn new(secure: bool) -> Self {
        CookieStore { secure }
    }

    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::seconds(max_age.as_secs() as i64))
            .into()
    }

    fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.build(name, String::new(), Duration::ZERO);
        cookie.make_removal();
        cookie
    }

    pub fn start_login(&self, jar: CookieJar, flow: &LoginFlow) -> CookieJar {
        jar.add(self.build(
            COOKIE_PKCE_VERIFIER,
            flow.verifier.clone(),
            LOGIN_FLOW_DURATION,
        ))
        .add(self.build(COOKIE_OAUTH_STATE, flow.state.clone(), LOGIN_FLOW_DURATION))
    }

    pub fn clear_login(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal(COOKIE_PKCE_VERIFIER))
            .add(self.removal(COOKIE_OAUTH_STATE))
    }

    pub fn start_session(&self, jar: CookieJar, access_token: &str, user: &UserInfo) -> CookieJar {
        jar.add(self.build(
            COOKIE_ACCESS_TOKEN,
            access_token.to_owned(),
            SESSION_DURATION,
        ))
        .add(self.build(COOKIE_USER_INFO, encode_user_info(user), SESSION_DURATION))
    }

    pub fn clear_session(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal(COOKIE_ACCESS_TOKEN))
            .add(self.removal(COOKIE_USER_INFO))
    }
}

pub fn verifier(jar: &CookieJar) -> Option<&str> {
    non_empty(jar, COOKIE_PKCE_VERIFIER)
}

pub fn state(jar: &CookieJar) -> Option<&str> {
    non_empty(jar, COOKIE_OAUTH_STATE)
}

pub fn access_token(jar: &CookieJar) -> Option<&str> {
    non_empty(jar, COOKIE_ACCESS_TOKEN)
}

pub fn user_info(jar: &CookieJar) -> Option<UserInfo> {
    non_empty(jar, COOKIE_USER_INFO).and_then(decode_user_info)
}

fn non_empty<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(|c| c.value()).filter(|x| !x.is_empty())
}

// JSON is not a valid cookie value, so it travels base64url encoded.
fn encode_user_info(user: &UserInfo) -> String {
    let json = serde_json::to_vec(user).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode_user_info(value: &str) -> Option<UserInfo> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}
