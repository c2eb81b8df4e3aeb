//! Terminal rendering of the feed view states.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use feedkit_core::presentation::{
    FeedErrorView, FeedErrorViewModel, FeedLoadingView, FeedLoadingViewModel, FeedView, FeedViewModel,
};

/// Writes feed states to a sink (stdout in the binary).
///
/// Loading state goes to the log rather than the sink so piped output only
/// carries the feed itself.
pub struct ConsoleView<W> {
    out: Mutex<W>,
    failed: AtomicBool,
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out), failed: AtomicBool::new(false) }
    }

    /// Whether an error message was displayed.
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn write_lines(&self, lines: impl IntoIterator<Item = String>) {
        let Ok(mut out) = self.out.lock() else { return };
        for line in lines {
            if let Err(e) = writeln!(out, "{line}") {
                tracing::warn!(error = %e, "failed to write feed output");
                return;
            }
        }
    }
}

impl<W: Write + Send> FeedView for ConsoleView<W> {
    fn display(&self, view_model: FeedViewModel) {
        if view_model.feed.is_empty() {
            self.write_lines(["(no images)".to_string()]);
            return;
        }

        let lines = view_model.feed.into_iter().flat_map(|image| {
            let mut lines = vec![format!("{}  {}", image.id, image.url)];
            if let Some(location) = image.location {
                lines.push(format!("    location: {location}"));
            }
            if let Some(description) = image.description {
                lines.push(format!("    {description}"));
            }
            lines
        });
        self.write_lines(lines);
    }
}

impl<W: Write + Send> FeedLoadingView for ConsoleView<W> {
    fn display(&self, view_model: FeedLoadingViewModel) {
        tracing::debug!(is_loading = view_model.is_loading, "feed loading state");
    }
}

impl<W: Write + Send> FeedErrorView for ConsoleView<W> {
    fn display(&self, view_model: FeedErrorViewModel) {
        if let Some(message) = view_model.message {
            self.failed.store(true, Ordering::SeqCst);
            self.write_lines([format!("error: {message}")]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedkit_core::FeedImage;
    use url::Url;

    fn rendered(view: ConsoleView<Vec<u8>>) -> String {
        String::from_utf8(view.out.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_feed_renders_placeholder() {
        let view = ConsoleView::new(Vec::new());
        FeedView::display(&view, FeedViewModel { feed: Vec::new() });
        assert_eq!(rendered(view), "(no images)\n");
    }

    #[test]
    fn test_feed_renders_one_block_per_image() {
        let view = ConsoleView::new(Vec::new());
        let first = FeedImage::new(
            "0c1a1e2b-3f4d-4a5b-8c6d-7e8f9a0b1c2d".parse().unwrap(),
            Some("a description".into()),
            Some("a location".into()),
            Url::parse("https://a-url.com/1.png").unwrap(),
        );
        let second = FeedImage::new(
            "1d2b2f3c-4a5e-4b6c-9d7e-8f9a0b1c2d3e".parse().unwrap(),
            None,
            None,
            Url::parse("https://a-url.com/2.png").unwrap(),
        );

        FeedView::display(&view, FeedViewModel { feed: vec![first, second] });

        assert_eq!(
            rendered(view),
            "0c1a1e2b-3f4d-4a5b-8c6d-7e8f9a0b1c2d  https://a-url.com/1.png\n    location: a location\n    a description\n\
             1d2b2f3c-4a5e-4b6c-9d7e-8f9a0b1c2d3e  https://a-url.com/2.png\n"
        );
    }

    #[test]
    fn test_error_marks_view_failed() {
        let view = ConsoleView::new(Vec::new());

        FeedErrorView::display(&view, FeedErrorViewModel::no_error());
        assert!(!view.failed());

        FeedErrorView::display(&view, FeedErrorViewModel::error("Couldn't connect to server"));
        assert!(view.failed());
        assert_eq!(rendered(view), "error: Couldn't connect to server\n");
    }
}
