use super::error::{self, Error, ErrorResp};
use super::login;
use serde::de::DeserializeOwned;
use url::Url;

/// Client for the auth API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// The server to connect to, e.g. `https://collabtalk.example.com`. May
    /// include a path prefix (`https://example.com/api`), which is kept when
    /// building endpoint URLs.
    pub server: String,
}

impl Client {
    /// Construct a new client
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
        }
    }

    /// Log into the server.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`, plus `Error::UrlParse` if the
    /// server URL is invalid.
    pub async fn login(
        &self,
        client: &reqwest::Client,
        req: &login::Req,
    ) -> error::Result<login::Resp> {
        let url = self.url(login::PATH)?;

        Self::handle_response(client.post(url).json(req)).await
    }

    /// Build the URL for an endpoint, treating the server URL as a directory
    /// so any path prefix survives.
    ///
    /// ## Errors
    ///
    /// Returns `Error::UrlParse` if the server URL is not a valid absolute URL.
    pub fn url(&self, path: &str) -> error::Result<Url> {
        let mut base = Url::parse(&self.server)?;

        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }

        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Convert an HTTP response into a result, interpreting errors in a
    /// standard way.
    ///
    /// ## Errors
    ///
    /// - `Ok(..)` if the server returned a success (2xx) with a body we can
    ///   decode
    /// - `Error::Http` if we couldn't reach the server or decode a success body
    /// - `Error::Rejected` for anything else, carrying the body's `message`
    ///   field if there was one
    async fn handle_response<T>(req: reqwest::RequestBuilder) -> error::Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = req.send().await?;

        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            // A body we can't read is the same as a body with no message.
            let body = resp.bytes().await.unwrap_or_default();

            Err(Error::Rejected {
                status,
                message: ErrorResp::message_from_body(&body),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auth::error::FALLBACK_MESSAGE;
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn req() -> login::Req {
        login::Req {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    async fn server_responding(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(login::PATH))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;

        server
    }

    #[test]
    fn url_joins_onto_bare_host() {
        let client = Client::new("https://collabtalk.example.com");

        assert_eq!(
            client.url(login::PATH).unwrap().as_str(),
            "https://collabtalk.example.com/users/login"
        );
    }

    #[test]
    fn url_keeps_path_prefix() {
        let client = Client::new("https://example.com/api");

        assert_eq!(
            client.url(login::PATH).unwrap().as_str(),
            "https://example.com/api/users/login"
        );
    }

    #[test]
    fn url_keeps_path_prefix_with_trailing_slash() {
        let client = Client::new("https://example.com/api/");

        assert_eq!(
            client.url(login::PATH).unwrap().as_str(),
            "https://example.com/api/users/login"
        );
    }

    #[test]
    fn url_rejects_relative_server() {
        let client = Client::new("collabtalk.example.com");

        assert!(matches!(client.url(login::PATH), Err(Error::UrlParse(_))));
    }

    #[tokio::test]
    async fn login_sends_credentials_and_returns_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(login::PATH))
            .and(body_json(json!({
                "email": "ada@example.com",
                "password": "hunter2",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "abc.def.ghi",
                "user": { "_id": "1", "email": "ada@example.com" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = Client::new(server.uri())
            .login(&reqwest::Client::new(), &req())
            .await
            .unwrap();

        assert_eq!(resp.token, "abc.def.ghi");
        assert_eq!(resp.user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn login_failure_carries_server_message() {
        let server = server_responding(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .await;

        let err = Client::new(server.uri())
            .login(&reqwest::Client::new(), &req())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Rejected {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        ));
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_failure_without_message_falls_back() {
        let server = server_responding(ResponseTemplate::new(500)).await;

        let err = Client::new(server.uri())
            .login(&reqwest::Client::new(), &req())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn login_failure_with_non_string_message_falls_back() {
        let server = server_responding(
            ResponseTemplate::new(400).set_body_json(json!({ "message": ["too", "many"] })),
        )
        .await;

        let err = Client::new(server.uri())
            .login(&reqwest::Client::new(), &req())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn success_without_token_is_an_error() {
        let server = server_responding(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "email": "ada@example.com" },
        })))
        .await;

        let err = Client::new(server.uri())
            .login(&reqwest::Client::new(), &req())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)), "{err:?}");
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_server_falls_back() {
        // Grab a free port, then let go of it so nothing is listening there.
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let err = Client::new(uri)
            .login(&reqwest::Client::new(), &req())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)), "{err:?}");
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }
}
