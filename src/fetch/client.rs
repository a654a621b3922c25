use async_trait::async_trait;
use reqwest::{Request, Response};
use std::sync::Arc;

/// Transport seam for fetching the call sheet; tests and the session swap implementations here.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req).await
    }
}
