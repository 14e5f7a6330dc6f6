use crate::BlockSource;
use anyhow::{anyhow, Context};
use bytes::Bytes;
use futures_core::future::BoxFuture;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use std::fmt::{Debug, Formatter};
use tracing::{debug, instrument};
use url::Url;


pub const NOW_BLOCK_PATH: [&str; 2] = ["wallet", "getnowblock"];


pub fn default_http_client() -> anyhow::Result<Client> {
    let client = Client::builder()
        .gzip(true)
        .build()
        .context("failed to build http client")?;
    Ok(client)
}


#[derive(Clone)]
pub struct NodeClient {
    http: Client,
    url: Url,
}


impl Debug for NodeClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("url", &self.url.as_str())
            .finish()
    }
}


impl NodeClient {
    pub fn from_url(node_url: &Url) -> anyhow::Result<Self> {
        let http = default_http_client()?;
        Self::new(http, node_url)
    }

    pub fn new(http: Client, node_url: &Url) -> anyhow::Result<Self> {
        let mut url = node_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("node url {} can not be used as a base", node_url))?
            .pop_if_empty()
            .extend(NOW_BLOCK_PATH);
        Ok(Self {
            http,
            url
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    #[instrument(level = "debug", skip_all, err(Debug), fields(url = %self.url.as_str()))]
    pub async fn get_now_block(&self) -> anyhow::Result<Bytes> {
        let req = self.http
            .post(self.url.clone())
            .header(ACCEPT, "application/json")
            .build()
            .context("failed to build getnowblock request")?;

        debug!("send request");

        let res = self.http.execute(req).await.context("getnowblock request failed")?;

        if !res.status().is_success() {
            return Err(response_error(res).await)
        }

        let body = res.bytes().await.context("failed to read getnowblock response body")?;
        debug!(size = body.len(), "got response");
        Ok(body)
    }
}


async fn response_error(response: Response) -> anyhow::Error {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(text) => anyhow!("got HTTP {}: {}", status, text),
        Err(_) => anyhow!("got HTTP {}", status)
    }
}


impl BlockSource for NodeClient {
    fn get_now_block(&self) -> BoxFuture<'_, anyhow::Result<Bytes>> {
        Box::pin(self.get_now_block())
    }
}
