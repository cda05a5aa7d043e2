//! Application state for the terminal front end.
//!
//! `App` owns the sync controller plus the purely visual bits (list cursor,
//! detail pane, quit flag).  It only ever talks to the controller through
//! `sync`, `set_filter` and `select_item`.

use ratatui::widgets::ListState;

use crate::filter::FilterSelection;
use crate::sync::FeedSyncController;
use crate::view_model::FeedViewModel;

pub struct App {
    pub sync: FeedSyncController,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Item shown in the detail pane, if open.
    pub detail: Option<FeedViewModel>,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new(sync: FeedSyncController) -> Self {
        Self {
            sync,
            list_state: ListState::default(),
            detail: None,
            quit: false,
        }
    }

    /// Apply finished syncs.  Called once per UI tick.
    pub fn tick(&mut self) {
        if self.sync.pump() > 0 {
            self.clamp_selection();
        }
    }

    pub fn refresh(&mut self) {
        self.sync.sync();
    }

    fn visible_len(&self) -> usize {
        self.sync.filtered().len()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    // -- filter --------------------------------------------------------------

    pub fn set_filter(&mut self, selection: FilterSelection) {
        if selection == self.sync.filter() {
            return;
        }
        self.sync.set_filter(selection);
        self.list_state.select(None);
        self.clamp_selection();
    }

    pub fn next_filter(&mut self) {
        self.set_filter(self.sync.filter().next());
    }

    pub fn previous_filter(&mut self) {
        self.set_filter(self.sync.filter().previous());
    }

    // -- detail --------------------------------------------------------------

    /// Open the detail pane for the highlighted item.
    pub fn open_detail(&mut self) {
        let Some(index) = self.list_state.selected() else {
            return;
        };
        if index >= self.visible_len() {
            return;
        }
        self.detail = self.sync.select_item(index).cloned();
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}
