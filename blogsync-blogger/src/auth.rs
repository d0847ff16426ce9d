//! Credentials for the blog service.
//!
//! Two ways in: a password login through the ClientLogin endpoint, which
//! answers with `key=value` lines and hands back an `Auth` token, or a
//! pre-issued OAuth access token sent as a bearer token.
use blogsync_common::{Result, SyncError};
use blogsync_http::{Auth, HttpClient, RequestOpts};
use reqwest::header::{AUTHORIZATION, HeaderValue};

const SERVICE: &str = "blogger";

#[derive(Clone)]
pub enum Credential {
    GoogleLogin(String),
    Bearer(String),
}

impl Credential {
    pub(crate) fn as_auth(&self) -> Result<Auth<'_>> {
        match self {
            Credential::Bearer(tok) => Ok(Auth::Bearer(tok)),
            Credential::GoogleLogin(tok) => {
                let value = HeaderValue::from_str(&format!("GoogleLogin auth={tok}"))
                    .map_err(|e| SyncError::Auth(format!("unusable auth token: {e}")))?;
                Ok(Auth::Header {
                    name: AUTHORIZATION,
                    value,
                })
            }
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Credential::GoogleLogin(_) => "GoogleLogin",
            Credential::Bearer(_) => "Bearer",
        };
        write!(f, "Credential::{kind}(<redacted>)")
    }
}

/// Exchange an email/password pair for a service token.
pub(crate) async fn client_login(
    http: &HttpClient,
    login_url: &str,
    source: &str,
    email: &str,
    password: &str,
) -> Result<Credential> {
    let fields = [
        ("accountType", "GOOGLE"),
        ("Email", email),
        ("Passwd", password),
        ("service", SERVICE),
        ("source", source),
    ];
    let body = http
        .post_form_text(
            login_url,
            &fields,
            RequestOpts {
                allow_absolute: true,
                retries: Some(0),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| SyncError::Auth(e.to_string()))?;

    let token = parse_auth_token(&body)
        .ok_or_else(|| SyncError::Auth("login response carried no Auth token".into()))?;
    tracing::info!(target: "blogger.auth", "blogger.login.ok");
    Ok(Credential::GoogleLogin(token))
}

fn parse_auth_token(body: &str) -> Option<String> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == "Auth")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
