//! # 📡 THE HTTP TRANSPORT
//!
//! 🎬 INT. SERVER ROOM — 3:47 AM. A lone `reqwest::Client` is built, once, with a connect
//! timeout and, only if the config asks for one, a request timeout. It will be reused for every GET this process ever makes, because spinning up a
//! new client per request is the networking equivalent of buying a new car every time you
//! need to go to the grocery store.
//!
//! It does not retry. It does not check status codes. It fetches text and hands it back.
//! Judgement is the decoder's job. 🦆

use async_trait::async_trait;
use tracing::{debug, trace};

use super::Transport;
use crate::app_config::ApiConfig;
use crate::errors::FeedError;

/// 📡 GETs against a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// 🚀 Build the client from config. Fails only if reqwest can't assemble a client
    /// (TLS backend trouble, mostly), and that failure is a transport failure.
    pub fn new(config: &ApiConfig) -> Result<Self, FeedError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            // -- 🔧 `https://host/` + `/posts` would be `https://host//posts`. one slash of difference.
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, path: &str) -> Result<String, FeedError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("📡 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        // -- 📬 text first, JSON later. a body that isn't text is a transport problem.
        let body = response.text().await?;
        trace!("📬 {} answered {} with {} bytes", url, status, body.len());

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: String) -> ApiConfig {
        ApiConfig {
            base_url,
            ..ApiConfig::default()
        }
    }

    #[tokio::test]
    async fn the_one_where_the_body_comes_back_as_plain_text() {
        let the_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"id":1}]"#))
            .expect(1)
            .mount(&the_server)
            .await;

        let the_transport = HttpTransport::new(&config_for(format!("{}/", the_server.uri())))
            .expect("💀 client should build");
        assert_eq!(the_transport.base_url(), the_server.uri());

        let the_body = the_transport
            .get_text("/posts")
            .await
            .expect("💀 mock server should answer");
        assert_eq!(the_body, r#"[{"id":1}]"#);
    }

    #[tokio::test]
    async fn the_one_where_a_404_is_still_just_text() {
        let the_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/999"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
            .mount(&the_server)
            .await;

        let the_transport =
            HttpTransport::new(&config_for(the_server.uri())).expect("💀 client should build");

        let the_body = the_transport
            .get_text("/posts/999")
            .await
            .expect("💀 status codes are the decoder's problem");
        assert_eq!(the_body, "{}");
    }

    #[tokio::test]
    async fn the_one_where_a_slow_answer_is_waited_for_by_default() {
        let the_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(std::time::Duration::from_millis(1500)),
            )
            .mount(&the_server)
            .await;

        let the_patient = HttpTransport::new(&config_for(the_server.uri()))
            .expect("💀 client should build");
        let the_body = the_patient
            .get_text("/users")
            .await
            .expect("💀 no request timeout is configured, so we wait");
        assert_eq!(the_body, "[]");

        let the_impatient = HttpTransport::new(&ApiConfig {
            timeout_secs: Some(1),
            ..config_for(the_server.uri())
        })
        .expect("💀 client should build");
        let the_error = the_impatient
            .get_text("/users")
            .await
            .expect_err("💀 one second is not enough for this server");
        match the_error {
            FeedError::Transport(the_reqwest_error) => assert!(the_reqwest_error.is_timeout()),
            honestly_who_knows => panic!("💀 expected a timeout, got {honestly_who_knows:?}"),
        }
    }

    #[tokio::test]
    async fn the_one_where_nobody_is_listening_and_we_say_so_verbatim() {
        // 🔌 port 1 on loopback: reserved, refused, reliably disappointing.
        let the_transport = HttpTransport::new(&config_for("http://127.0.0.1:1".to_string()))
            .expect("💀 client should build");

        let the_error = the_transport
            .get_text("/posts")
            .await
            .expect_err("💀 nothing listens on port 1");
        assert!(the_error.is_transport());
    }
}
