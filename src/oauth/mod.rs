use oauth2::basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError};
use oauth2::{AuthType, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeVerifier, RequestTokenError, Scope};
use oauth2::{HttpRequest, HttpResponse, TokenResponse};

use crate::config::{Config, ConfigError};
use crate::constants::TOKEN_SCOPES;
use crate::misc::error::AuthError;
use crate::pkce::PkcePair;
use crate::session::LoginFlow;

pub fn build_oauth_client(config: &Config) -> Result<BasicClient, ConfigError> {
    let invalid = |key: &'static str| {
        move |err: url::ParseError| ConfigError::Invalid {
            key,
            reason: err.to_string(),
        }
    };

    let client_id = ClientId::new(config.client_id.clone());
    let client_secret = ClientSecret::new(config.client_secret.clone());
    let auth_url = AuthUrl::new(config.authorize_endpoint()).map_err(invalid("AZURE_AUTHORITY"))?;
    let token_url = TokenUrl::new(config.token_endpoint()).map_err(invalid("AZURE_AUTHORITY"))?;
    let redirect_url = RedirectUrl::new(config.redirect_uri()).map_err(invalid("BASE_URL"))?;

    // Microsoft expects the client secret in the form body, not as basic auth
    let client = BasicClient::new(client_id, Some(client_secret), auth_url, Some(token_url))
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(redirect_url);

    Ok(client)
}

/// A provider authorize url plus the values the callback needs to finish the flow.
#[derive(Debug)]
pub struct AuthorizationRequest {
    pub url: url::Url,
    pub flow: LoginFlow,
}

pub fn authorization_request(client: &BasicClient, scopes: &[String]) -> AuthorizationRequest {
    let pkce = PkcePair::generate();
    let state = crate::pkce::generate_state();

    let (url, csrf_state) = client
        .authorize_url(|| CsrfToken::new(state))
        .add_scopes(scopes.iter().cloned().map(Scope::new))
        .set_pkce_challenge(pkce.code_challenge())
        .url();

    AuthorizationRequest {
        url,
        flow: LoginFlow {
            verifier: pkce.verifier,
            state: csrf_state.secret().to_owned(),
        },
    }
}

/// Redeems an authorization code for an access token with a single POST,
/// sent through the shared client so it carries the upstream timeout.
pub async fn exchange_code(
    client: &BasicClient,
    http: &reqwest::Client,
    code: String,
    verifier: &str,
) -> Result<String, AuthError> {
    let token_response = client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(PkceCodeVerifier::new(verifier.to_owned()))
        .add_extra_param("scope", TOKEN_SCOPES.join(" "))
        .request_async(|request| send_token_request(http, request))
        .await
        .map_err(|err| AuthError::TokenExchange(describe_token_error(&err)))?;

    Ok(token_response.access_token().secret().to_owned())
}

async fn send_token_request(
    http: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = http
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().to_owned();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

fn describe_token_error(err: &BasicRequestTokenError<reqwest::Error>) -> String {
    match err {
        RequestTokenError::ServerResponse(response) => describe_error_response(response),
        RequestTokenError::Request(err) => format!("request failed: {err}"),
        RequestTokenError::Parse(err, body) => format!(
            "unexpected response ({err}): {}",
            String::from_utf8_lossy(body)
        ),
        RequestTokenError::Other(message) => message.to_owned(),
    }
}

fn describe_error_response(response: &BasicErrorResponse) -> String {
    match response.error_description() {
        Some(description) => format!("{}: {description}", response.error()),
        None => response.error().to_string(),
    }
}
