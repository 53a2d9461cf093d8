//! Blocking HTTP loader built on `ureq`.
//!
//! Each fetch runs on its own worker thread and reports back through a
//! oneshot channel, so a batch of requests overlaps even though `ureq` is
//! synchronous. The body is decoded according to
//! [`LoadOptions::response_type`].

use std::io::Read;
use std::thread;
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::TransportError;
use crate::loader::Loader;
use crate::payload::{LoadOptions, Payload, ResponseType};

/// `GET`s each resource as a URL.
///
/// Every `load` spawns its own OS thread and there is no cap on how many run
/// at once. When a batch fails fast, the fetches still in flight keep their
/// threads until they finish or hit the configured timeout, and their results
/// are discarded.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    agent: ureq::Agent,
}

impl HttpLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&LoaderConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &LoaderConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .build();
        Self { agent }
    }

    fn fetch(
        agent: &ureq::Agent,
        url: &str,
        response_type: ResponseType,
    ) -> Result<Payload, TransportError> {
        let response = agent.get(url).call().map_err(|err| TransportError::Request {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        match response_type {
            ResponseType::Text => response
                .into_string()
                .map(Payload::Text)
                .map_err(|source| TransportError::Body {
                    url: url.to_string(),
                    source,
                }),
            ResponseType::Json => response
                .into_json::<serde_json::Value>()
                .map(Payload::Json)
                .map_err(|source| TransportError::Decode {
                    url: url.to_string(),
                    source,
                }),
            ResponseType::Binary => {
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|source| TransportError::Body {
                        url: url.to_string(),
                        source,
                    })?;
                Ok(Payload::Binary(bytes))
            }
        }
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for HttpLoader {
    type Output = Payload;
    type Error = TransportError;

    fn load(
        &self,
        resource: &str,
        opts: &LoadOptions,
    ) -> LocalBoxFuture<'_, Result<Self::Output, Self::Error>> {
        let (tx, rx) = oneshot::channel();
        let agent = self.agent.clone();
        let url = resource.to_string();
        let response_type = opts.response_type;

        debug!(url = %url, response_type = response_type.as_str(), "starting fetch");
        let spawned = thread::Builder::new()
            .name("relkit-fetch".to_string())
            .spawn(move || {
                let result = Self::fetch(&agent, &url, response_type);
                let _ = tx.send(result);
            });

        let url = resource.to_string();
        if let Err(source) = spawned {
            return future::ready(Err(TransportError::Spawn { url, source })).boxed_local();
        }

        rx.map(move |received| received.unwrap_or_else(|_| Err(TransportError::Canceled { url })))
            .boxed_local()
    }
}
