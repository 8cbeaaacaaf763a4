//! 诊断抓取

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Url};
use std::time::Duration;

/// 抓取结果
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: String,
    pub truncated: bool,
}

#[async_trait]
pub trait UrlFetcher: Send + Sync {
    async fn fetch(&self, url: Url) -> Result<Fetched, reqwest::Error>;
}

/// 基于 reqwest 的实现：不跟随重定向，限制读取的字节数
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }
}

#[async_trait]
impl UrlFetcher for HttpFetcher {
    async fn fetch(&self, url: Url) -> Result<Fetched, reqwest::Error> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await? {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Fetched {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
            truncated,
        })
    }
}
