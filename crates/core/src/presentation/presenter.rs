use std::sync::Arc;

use super::{FeedErrorView, FeedErrorViewModel, FeedLoadingView, FeedLoadingViewModel, FeedView, FeedViewModel};
use crate::Error;
use crate::feed::{FeedImage, FeedLoader};

/// Drives the feed, loading and error views through one load cycle.
#[derive(Clone)]
pub struct FeedPresenter {
    feed_view: Arc<dyn FeedView>,
    loading_view: Arc<dyn FeedLoadingView>,
    error_view: Arc<dyn FeedErrorView>,
}

impl FeedPresenter {
    pub const TITLE: &'static str = "My Feed";

    pub const FEED_LOAD_ERROR: &'static str = "Couldn't connect to server";

    pub fn new(
        feed_view: Arc<dyn FeedView>, loading_view: Arc<dyn FeedLoadingView>, error_view: Arc<dyn FeedErrorView>,
    ) -> Self {
        Self { feed_view, loading_view, error_view }
    }

    pub fn did_start_loading_feed(&self) {
        self.error_view.display(FeedErrorViewModel::no_error());
        self.loading_view.display(FeedLoadingViewModel { is_loading: true });
    }

    pub fn did_finish_loading_feed(&self, feed: Vec<FeedImage>) {
        self.feed_view.display(FeedViewModel { feed });
        self.loading_view.display(FeedLoadingViewModel { is_loading: false });
    }

    pub fn did_finish_loading_feed_with_error(&self, error: &Error) {
        tracing::debug!(error = %error, "feed load failed");
        self.loading_view.display(FeedLoadingViewModel { is_loading: false });
        self.error_view.display(FeedErrorViewModel::error(Self::FEED_LOAD_ERROR));
    }
}

/// Runs a [`FeedLoader`] and reports the outcome to a [`FeedPresenter`].
pub struct FeedLoaderPresentationAdapter<L> {
    loader: L,
    presenter: FeedPresenter,
}

impl<L: FeedLoader> FeedLoaderPresentationAdapter<L> {
    pub fn new(loader: L, presenter: FeedPresenter) -> Self {
        Self { loader, presenter }
    }

    pub async fn did_request_feed_refresh(&self) {
        self.presenter.did_start_loading_feed();
        match self.loader.load().await {
            Ok(feed) => self.presenter.did_finish_loading_feed(feed),
            Err(e) => self.presenter.did_finish_loading_feed_with_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::LoadFeedResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use url::Url;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    enum Message {
        DisplayErrorMessage(Option<String>),
        DisplayIsLoading(bool),
        DisplayFeed(Vec<FeedImage>),
    }

    #[derive(Default)]
    struct ViewSpy {
        messages: Mutex<Vec<Message>>,
    }

    impl ViewSpy {
        fn messages(&self) -> Vec<Message> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl FeedView for ViewSpy {
        fn display(&self, view_model: FeedViewModel) {
            self.messages.lock().unwrap().push(Message::DisplayFeed(view_model.feed));
        }
    }

    impl FeedLoadingView for ViewSpy {
        fn display(&self, view_model: FeedLoadingViewModel) {
            self.messages.lock().unwrap().push(Message::DisplayIsLoading(view_model.is_loading));
        }
    }

    impl FeedErrorView for ViewSpy {
        fn display(&self, view_model: FeedErrorViewModel) {
            self.messages.lock().unwrap().push(Message::DisplayErrorMessage(view_model.message));
        }
    }

    fn make_sut() -> (FeedPresenter, Arc<ViewSpy>) {
        let view = Arc::new(ViewSpy::default());
        let sut = FeedPresenter::new(view.clone(), view.clone(), view.clone());
        (sut, view)
    }

    fn unique_feed() -> Vec<FeedImage> {
        vec![FeedImage::new(Uuid::new_v4(), Some("a description".into()), None, Url::parse("https://any-url.com").unwrap())]
    }

    #[test]
    fn test_init_does_not_send_messages_to_view() {
        let (_sut, view) = make_sut();
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_did_start_loading_displays_no_error_and_starts_loading() {
        let (sut, view) = make_sut();

        sut.did_start_loading_feed();

        assert_eq!(view.messages(), vec![Message::DisplayErrorMessage(None), Message::DisplayIsLoading(true)]);
    }

    #[test]
    fn test_did_finish_loading_feed_displays_feed_and_stops_loading() {
        let (sut, view) = make_sut();
        let feed = unique_feed();

        sut.did_finish_loading_feed(feed.clone());

        assert_eq!(view.messages(), vec![Message::DisplayFeed(feed), Message::DisplayIsLoading(false)]);
    }

    #[test]
    fn test_did_finish_loading_with_error_displays_error_and_stops_loading() {
        let (sut, view) = make_sut();

        sut.did_finish_loading_feed_with_error(&Error::Connectivity("offline".into()));

        assert_eq!(
            view.messages(),
            vec![
                Message::DisplayIsLoading(false),
                Message::DisplayErrorMessage(Some(FeedPresenter::FEED_LOAD_ERROR.to_string())),
            ]
        );
    }

    struct LoaderStub(fn() -> LoadFeedResult);

    #[async_trait]
    impl FeedLoader for LoaderStub {
        async fn load(&self) -> LoadFeedResult {
            (self.0)()
        }
    }

    #[tokio::test]
    async fn test_adapter_brackets_successful_load() {
        let (presenter, view) = make_sut();
        let sut = FeedLoaderPresentationAdapter::new(LoaderStub(|| Ok(Vec::new())), presenter);

        sut.did_request_feed_refresh().await;

        assert_eq!(
            view.messages(),
            vec![
                Message::DisplayErrorMessage(None),
                Message::DisplayIsLoading(true),
                Message::DisplayFeed(Vec::new()),
                Message::DisplayIsLoading(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_adapter_brackets_failed_load() {
        let (presenter, view) = make_sut();
        let sut =
            FeedLoaderPresentationAdapter::new(LoaderStub(|| Err(Error::InvalidData("status 500".into()))), presenter);

        sut.did_request_feed_refresh().await;

        assert_eq!(
            view.messages(),
            vec![
                Message::DisplayErrorMessage(None),
                Message::DisplayIsLoading(true),
                Message::DisplayIsLoading(false),
                Message::DisplayErrorMessage(Some(FeedPresenter::FEED_LOAD_ERROR.to_string())),
            ]
        );
    }
}
