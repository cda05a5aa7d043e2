//! Segment filter over the published view models.

use crate::source::FeedKind;
use crate::view_model::FeedViewModel;

/// Which category of items the list shows.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum FilterSelection {
    #[default]
    All,
    Text,
    Image,
    Other,
}

impl FilterSelection {
    /// Every selection, in tab-bar order.
    pub const ALL: [FilterSelection; 4] = [
        FilterSelection::All,
        FilterSelection::Text,
        FilterSelection::Image,
        FilterSelection::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterSelection::All => "All",
            FilterSelection::Text => "Text",
            FilterSelection::Image => "Image",
            FilterSelection::Other => "Other",
        }
    }

    /// Position in [`FilterSelection::ALL`].
    pub fn index(self) -> usize {
        match self {
            FilterSelection::All => 0,
            FilterSelection::Text => 1,
            FilterSelection::Image => 2,
            FilterSelection::Other => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn matches(self, kind: &FeedKind) -> bool {
        matches!(
            (self, kind),
            (FilterSelection::All, _)
                | (FilterSelection::Text, FeedKind::Text(_))
                | (FilterSelection::Image, FeedKind::Image(_))
                | (FilterSelection::Other, FeedKind::Other(_))
        )
    }

    /// Keep the items matching this selection, preserving order.
    pub fn apply(self, all: &[FeedViewModel]) -> Vec<FeedViewModel> {
        all.iter().filter(|vm| self.matches(&vm.kind)).cloned().collect()
    }
}
