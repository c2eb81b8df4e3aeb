//! Remote feed loading over HTTP.

pub mod mapper;

use std::sync::Arc;

use async_trait::async_trait;
use feedkit_core::task::{LoadTask, live_owner};
use feedkit_core::{Error, FeedLoader, LoadFeedResult};
use url::Url;

use crate::http::{HttpClient, HttpClientError, HttpResponse};

/// Loads the feed from a fixed endpoint.
///
/// Every call issues exactly one GET; nothing is retried or shared between
/// overlapping calls.
#[derive(Debug)]
pub struct RemoteFeedLoader<C: ?Sized> {
    url: Url,
    client: Arc<C>,
}

impl<C: HttpClient + ?Sized + 'static> RemoteFeedLoader<C> {
    pub fn new(url: Url, client: Arc<C>) -> Self {
        Self { url, client }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn load(&self) -> LoadFeedResult {
        map_response(self.client.get(&self.url).await)
    }

    /// Spawn a load and hand the result to `completion`.
    ///
    /// `completion` runs at most once, and not at all if this loader is
    /// dropped or the task is cancelled before the response arrives.
    pub fn spawn_load<F>(self: &Arc<Self>, completion: F) -> LoadTask
    where
        F: FnOnce(LoadFeedResult) + Send + 'static,
    {
        let owner = Arc::downgrade(self);
        let client = Arc::clone(&self.client);
        let url = self.url.clone();
        LoadTask::spawn(move |token| async move {
            let response = client.get(&url).await;
            if live_owner(&owner, &token).is_some() {
                completion(map_response(response));
            }
        })
    }
}

fn map_response(response: Result<HttpResponse, HttpClientError>) -> LoadFeedResult {
    match response {
        Ok(HttpResponse { status, body }) => mapper::map(&body, status),
        Err(e) => {
            tracing::debug!(error = %e, "feed request failed");
            Err(Error::Connectivity(e.to_string()))
        }
    }
}

#[async_trait]
impl<C: HttpClient + ?Sized + 'static> FeedLoader for RemoteFeedLoader<C> {
    async fn load(&self) -> LoadFeedResult {
        RemoteFeedLoader::load(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedkit_core::FeedImage;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;
    use uuid::Uuid;

    type Pending = Mutex<VecDeque<oneshot::Sender<Result<HttpResponse, HttpClientError>>>>;

    /// Transport double that records requested URLs and holds each request
    /// open until the test completes it.
    #[derive(Default)]
    struct HttpClientSpy {
        requested_urls: Mutex<Vec<Url>>,
        pending: Pending,
    }

    impl HttpClientSpy {
        fn requested_urls(&self) -> Vec<Url> {
            self.requested_urls.lock().unwrap().clone()
        }

        async fn complete(&self, result: Result<HttpResponse, HttpClientError>) {
            let sender = tokio::time::timeout(std::time::Duration::from_secs(1), async {
                loop {
                    if let Some(sender) = self.pending.lock().unwrap().pop_front() {
                        return sender;
                    }
                    tokio::task::yield_now().await;
                }
            })
            .await
            .expect("request was never issued");
            let _ = sender.send(result);
        }

        async fn complete_with_status(&self, status: u16, body: Vec<u8>) {
            self.complete(Ok(HttpResponse::new(status, body))).await;
        }
    }

    #[async_trait]
    impl HttpClient for HttpClientSpy {
        async fn get(&self, url: &Url) -> Result<HttpResponse, HttpClientError> {
            self.requested_urls.lock().unwrap().push(url.clone());
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push_back(tx);
            rx.await.unwrap_or(Err(HttpClientError::Timeout))
        }
    }

    fn any_url() -> Url {
        Url::parse("https://a-given-url.com/feed").unwrap()
    }

    fn make_sut(url: Url) -> (Arc<RemoteFeedLoader<HttpClientSpy>>, Arc<HttpClientSpy>) {
        let client = Arc::new(HttpClientSpy::default());
        let sut = Arc::new(RemoteFeedLoader::new(url, Arc::clone(&client)));
        (sut, client)
    }

    fn items_json(items: &[FeedImage]) -> Vec<u8> {
        let items: Vec<_> = items
            .iter()
            .map(|i| {
                json!({
                    "id": i.id.to_string(),
                    "description": i.description,
                    "location": i.location,
                    "image": i.url.as_str(),
                })
            })
            .collect();
        serde_json::to_vec(&json!({ "items": items })).unwrap()
    }

    type Received = Arc<Mutex<Vec<LoadFeedResult>>>;

    fn recorder() -> (Received, impl FnOnce(LoadFeedResult) + Send + 'static) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        (received, move |result| sink.lock().unwrap().push(result))
    }

    async fn expect_spawned(
        sut: &Arc<RemoteFeedLoader<HttpClientSpy>>, client: &HttpClientSpy,
        response: Result<HttpResponse, HttpClientError>,
    ) -> LoadFeedResult {
        let (received, completion) = recorder();
        let task = sut.spawn_load(completion);
        client.complete(response).await;
        task.finished().await;

        let mut received = received.lock().unwrap();
        assert_eq!(received.len(), 1, "completion must run exactly once");
        received.remove(0)
    }

    #[tokio::test]
    async fn test_init_does_not_request_data() {
        let (_sut, client) = make_sut(any_url());
        assert!(client.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_load_requests_data_from_url() {
        let url = any_url();
        let (sut, client) = make_sut(url.clone());

        let task = sut.spawn_load(|_| {});
        client.complete_with_status(200, items_json(&[])).await;
        task.finished().await;

        assert_eq!(client.requested_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_load_twice_requests_data_twice() {
        let url = any_url();
        let (sut, client) = make_sut(url.clone());

        let first = sut.spawn_load(|_| {});
        let second = sut.spawn_load(|_| {});
        client.complete_with_status(200, items_json(&[])).await;
        client.complete_with_status(200, items_json(&[])).await;
        first.finished().await;
        second.finished().await;

        assert_eq!(client.requested_urls(), vec![url.clone(), url]);
    }

    #[tokio::test]
    async fn test_load_delivers_connectivity_error_on_client_error() {
        let (sut, client) = make_sut(any_url());

        let result = expect_spawned(&sut, &client, Err(HttpClientError::Timeout)).await;

        assert!(matches!(result, Err(Error::Connectivity(_))));
    }

    #[tokio::test]
    async fn test_load_delivers_invalid_data_on_non_200_response() {
        let (sut, client) = make_sut(any_url());

        for status in [199, 201, 300, 400, 500] {
            let response = Ok(HttpResponse::new(status, items_json(&[])));
            let result = expect_spawned(&sut, &client, response).await;
            assert!(matches!(result, Err(Error::InvalidData(_))), "status {status}");
        }
    }

    #[tokio::test]
    async fn test_load_delivers_invalid_data_on_200_with_invalid_json() {
        let (sut, client) = make_sut(any_url());

        let result = expect_spawned(&sut, &client, Ok(HttpResponse::new(200, b"invalid json".to_vec()))).await;

        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_load_delivers_no_items_on_200_with_empty_list() {
        let (sut, client) = make_sut(any_url());

        let result = expect_spawned(&sut, &client, Ok(HttpResponse::new(200, items_json(&[])))).await;

        assert_eq!(result.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn test_load_delivers_items_on_200_with_items() {
        let (sut, client) = make_sut(any_url());
        let items = vec![
            FeedImage::new(Uuid::new_v4(), None, None, Url::parse("http://a-url.com/").unwrap()),
            FeedImage::new(
                Uuid::new_v4(),
                Some("a description".into()),
                Some("a location".into()),
                Url::parse("http://another-url.com/").unwrap(),
            ),
        ];

        let result = expect_spawned(&sut, &client, Ok(HttpResponse::new(200, items_json(&items)))).await;

        assert_eq!(result.unwrap(), items);
    }

    #[tokio::test]
    async fn test_awaited_load_maps_response() {
        let (sut, client) = make_sut(any_url());

        let load = tokio::spawn({
            let sut = Arc::clone(&sut);
            async move { sut.load().await }
        });
        client.complete_with_status(200, items_json(&[])).await;

        assert_eq!(load.await.unwrap().unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn test_load_does_not_deliver_after_release() {
        let (sut, client) = make_sut(any_url());
        let (received, completion) = recorder();

        let task = sut.spawn_load(completion);
        drop(sut);
        client.complete_with_status(200, items_json(&[])).await;
        task.finished().await;

        assert!(received.lock().unwrap().is_empty());
        assert_eq!(client.requested_urls().len(), 1);
    }

    #[tokio::test]
    async fn test_load_does_not_deliver_after_cancel() {
        let (sut, client) = make_sut(any_url());
        let (received, completion) = recorder();

        let task = sut.spawn_load(completion);
        task.cancel();
        client.complete(Err(HttpClientError::Timeout)).await;
        task.finished().await;

        assert!(received.lock().unwrap().is_empty());
    }
}
