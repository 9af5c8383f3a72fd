use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::config::{Config, MAX_COLUMNS};
use crate::error::Result;
use crate::feed::{DecodedFeed, FeedFetcher, FeedSource};
use crate::layout::GridLayout;
use crate::models::FeedItem;
use crate::tui::AppAction;

pub struct App {
    pub feed: DecodedFeed,
    pub layout: GridLayout,
    pub columns: u16,
    pub selected: usize,
    pub status: String,
    pub show_help: bool,
    pub is_refreshing: bool,
    sources: Vec<FeedSource>,
    fetcher: Arc<FeedFetcher>,
    refresh_rx: Option<oneshot::Receiver<DecodedFeed>>,
}

impl App {
    pub fn new(config: &Config, sources: Vec<FeedSource>) -> Result<Self> {
        Ok(Self {
            feed: DecodedFeed::default(),
            layout: GridLayout::default(),
            columns: config.columns,
            selected: 0,
            status: String::new(),
            show_help: false,
            is_refreshing: false,
            sources,
            fetcher: Arc::new(FeedFetcher::new()?),
            refresh_rx: None,
        })
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.feed.items.get(self.selected)
    }

    /// Replace the whole feed. Items from the previous load are dropped.
    pub fn set_feed(&mut self, feed: DecodedFeed) {
        self.status = if feed.rejected.is_empty() {
            format!("Loaded {} items", feed.items.len())
        } else {
            format!(
                "Loaded {} items, skipped {} invalid records",
                feed.items.len(),
                feed.rejected.len()
            )
        };
        self.feed = feed;
        self.selected = self.selected.min(self.feed.items.len().saturating_sub(1));
        self.rebuild_layout();
    }

    fn rebuild_layout(&mut self) {
        self.layout = GridLayout::build(&self.feed.items, self.columns);
    }

    fn set_columns(&mut self, columns: u16) {
        let columns = columns.clamp(1, MAX_COLUMNS);
        if columns != self.columns {
            self.columns = columns;
            self.rebuild_layout();
            self.status = format!("{columns} columns");
        }
    }

    /// Kick off a background refresh; the result is picked up by
    /// [`App::poll_refresh_result`].
    pub fn start_refresh(&mut self) {
        if self.is_refreshing {
            return;
        }
        if self.sources.is_empty() {
            self.status = "No feed sources configured".to_string();
            return;
        }

        let (tx, rx) = oneshot::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let sources = self.sources.clone();

        tokio::spawn(async move {
            let records = fetcher.fetch_all(&sources).await;
            let _ = tx.send(DecodedFeed::from_records(&records));
        });

        self.refresh_rx = Some(rx);
        self.is_refreshing = true;
        self.status = format!("Refreshing {} sources...", self.sources.len());
    }

    pub fn poll_refresh_result(&mut self) {
        let Some(mut rx) = self.refresh_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(feed) => {
                self.is_refreshing = false;
                self.set_feed(feed);
            }
            Err(TryRecvError::Empty) => self.refresh_rx = Some(rx),
            Err(TryRecvError::Closed) => {
                self.is_refreshing = false;
                tracing::error!("Refresh task ended without a result");
                self.status = "Refresh failed".to_string();
            }
        }
    }

    /// Fetch and decode all sources on the current task.
    pub async fn refresh_blocking(&mut self) {
        let records = self.fetcher.fetch_all(&self.sources).await;
        self.set_feed(DecodedFeed::from_records(&records));
    }

    fn open_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let kind = item.kind();

        match item.link().map(str::to_string) {
            Some(link) => match open::that(&link) {
                Ok(()) => self.status = format!("Opened {link}"),
                Err(e) => {
                    tracing::warn!("Failed to open {}: {}", link, e);
                    self.status = format!("Could not open {link}");
                }
            },
            None => self.status = format!("{kind} has no link"),
        }
    }

    /// Apply an action. Returns `true` when the app should quit.
    pub fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),
            AppAction::Move(direction) => {
                if let Some(next) = self.layout.neighbour(self.selected, direction) {
                    self.selected = next;
                }
            }
            AppAction::MoveToTop => self.selected = 0,
            AppAction::MoveToBottom => {
                self.selected = self.feed.items.len().saturating_sub(1);
            }
            AppAction::RefreshFeed => self.start_refresh(),
            AppAction::OpenLink => self.open_selected(),
            AppAction::MoreColumns => self.set_columns(self.columns.saturating_add(1)),
            AppAction::FewerColumns => self.set_columns(self.columns.saturating_sub(1)),
            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
        }
        Ok(false)
    }
}
