//! Translation of feed load outcomes into view states.
//!
//! The presenter knows nothing about rendering; it pushes plain view models
//! to whatever implements the view traits.

mod presenter;

pub use presenter::{FeedLoaderPresentationAdapter, FeedPresenter};

use crate::feed::FeedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLoadingViewModel {
    pub is_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedErrorViewModel {
    pub message: Option<String>,
}

impl FeedErrorViewModel {
    pub fn no_error() -> Self {
        Self { message: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedViewModel {
    pub feed: Vec<FeedImage>,
}

pub trait FeedView: Send + Sync {
    fn display(&self, view_model: FeedViewModel);
}

pub trait FeedLoadingView: Send + Sync {
    fn display(&self, view_model: FeedLoadingViewModel);
}

pub trait FeedErrorView: Send + Sync {
    fn display(&self, view_model: FeedErrorViewModel);
}
