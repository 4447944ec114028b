//! Login transport and its reqwest implementation.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{header, redirect, Client, ClientBuilder, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint of the Meu Alelo web API
pub const LOGIN_URL: &str =
    "https://www.meualelo.com.br/api/meualelo-web-api/s/p/authentication/login";

/// Header the gateway reads the signed gateway token from
const GATEWAY_KEY_HEADER: &str = "X-api-key";

/// The gateway rejects requests without a browser-like user agent
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:72.0) Gecko/20100101 Firefox/72.0";

/// HTTP request timeout in seconds.
/// Bounds the one blocking network call made per invocation.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Body of the login POST
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub cpf: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("cpf", &self.cpf)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw outcome of a login call. Status mapping and body parsing belong to
/// the authentication flow.
#[derive(Debug, Clone)]
pub struct LoginReply {
    pub status: StatusCode,
    pub body: String,
}

/// Performs the login round-trip.
pub trait LoginTransport {
    fn login(
        &self,
        request: &LoginRequest,
        gateway_token: &str,
    ) -> impl Future<Output = Result<LoginReply>> + Send;
}

/// Stateless client: no cookie store, redirects are not followed.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    login_url: String,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        Self::with_login_url(LOGIN_URL)
    }

    /// Client that posts logins to `login_url` instead of the production endpoint
    pub fn with_login_url(login_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Self::builder().build()?,
            login_url: login_url.into(),
        })
    }

    fn builder() -> ClientBuilder {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
    }
}

impl LoginTransport for ApiClient {
    async fn login(&self, request: &LoginRequest, gateway_token: &str) -> Result<LoginReply> {
        debug!(url = %self.login_url, cpf = %request.cpf, "Sending login request");

        let response = self
            .client
            .post(&self.login_url)
            .header(GATEWAY_KEY_HEADER, gateway_token)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Login response received");

        Ok(LoginReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP exchange and hand back the raw request text.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/login", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&raw).into_owned()
        });

        (url, handle)
    }

    /// Talks to the local stub directly, regardless of proxy settings in the environment
    fn local_client(url: String) -> ApiClient {
        ApiClient {
            client: ApiClient::builder().no_proxy().build().unwrap(),
            login_url: url,
        }
    }

    fn request() -> LoginRequest {
        LoginRequest {
            cpf: "12345678900".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_sends_gateway_header_and_json_body() {
        let (url, server) = one_shot_server("HTTP/1.1 200 OK", r#"{"token":"abc123"}"#).await;
        let client = local_client(url);

        let reply = client.login(&request(), "gateway-jwt").await.unwrap();
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, r#"{"token":"abc123"}"#);

        let raw = server.await.unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /login HTTP/1.1"));
        assert!(lower.contains("x-api-key: gateway-jwt"));
        assert!(lower.contains("user-agent: mozilla/5.0 (macintosh; intel mac os x 10.15; rv:72.0)"));
        assert!(lower.contains("content-type: application/json"));
        assert!(raw.ends_with(r#"{"cpf":"12345678900","password":"secret"}"#));
        assert!(!lower.contains("cookie:"));
    }

    #[tokio::test]
    async fn test_login_reports_rejection_status() {
        let (url, server) = one_shot_server("HTTP/1.1 401 Unauthorized", r#"{"message":"denied"}"#).await;
        let client = local_client(url);

        let reply = client.login(&request(), "gateway-jwt").await.unwrap();
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_login_does_not_follow_redirects() {
        let (url, server) = one_shot_server("HTTP/1.1 302 Found\r\nLocation: http://127.0.0.1:9/elsewhere", "").await;
        let client = local_client(url);

        let reply = client.login(&request(), "gateway-jwt").await.unwrap();
        assert_eq!(reply.status, StatusCode::FOUND);
        server.await.unwrap();
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let debug = format!("{:?}", request());
        assert!(debug.contains("12345678900"));
        assert!(!debug.contains("secret"));
    }
}
