use crate::error::UpstreamError;
use crate::model::{ReleaseInfo, RepoMeta};
use std::future::Future;
use std::pin::Pin;

pub type UpstreamFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, UpstreamError>> + Send + 'a>>;

pub trait UpstreamClient: Send + Sync {
    fn fetch_repo_info<'a>(&'a self, owner: &'a str, name: &'a str)
    -> UpstreamFuture<'a, RepoMeta>;

    fn fetch_latest_release<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> UpstreamFuture<'a, ReleaseInfo>;
}
