// src/app.rs

use crate::config::Config;
use crate::search::SearchClient;
use crate::session::{ChatSession, SubmitRejection};
use crate::suggestions::{self, SUGGESTIONS};
use std::time::{Duration, Instant};

pub struct App {
    pub session: ChatSession,
    pub input: String,
    pub scroll: u16,
    pub should_quit: bool,
    pub selected_suggestion: usize,
    pub tips_dismissed: bool,
    pub follow_bottom: bool,
    pub last_spinner_update: Instant,
}

impl App {
    pub fn new(config: &Config) -> App {
        let client = SearchClient::new(config.search_url.clone());
        let session = ChatSession::new(client, Duration::from_secs(config.typing_timeout_secs));

        App {
            session,
            input: String::new(),
            scroll: 0,
            should_quit: false,
            selected_suggestion: 0,
            tips_dismissed: false,
            follow_bottom: true,
            last_spinner_update: Instant::now(),
        }
    }

    pub fn scroll_up(&mut self) {
        self.follow_bottom = false;
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    /// Resolves the scroll offset against the rendered timeline height.
    /// While following the bottom this pins to `max_scroll` and keeps the
    /// stored offset in sync, so a later `scroll_up` moves off the bottom
    /// immediately.
    pub fn clamp_scroll(&mut self, max_scroll: u16) -> u16 {
        if self.follow_bottom || self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        self.scroll
    }

    pub fn next_suggestion(&mut self) {
        self.selected_suggestion = (self.selected_suggestion + 1) % SUGGESTIONS.len();
    }

    pub fn tips_visible(&self) -> bool {
        suggestions::tips_visible(self.session.has_searched()) && !self.tips_dismissed
    }

    pub fn dismiss_tips(&mut self) {
        self.tips_dismissed = true;
    }

    /// Submits the typed input, or the highlighted suggestion chip when the
    /// input box is empty. Input starting with `/advice ` goes to the
    /// career advisor instead of the job search. Rejections leave the
    /// state untouched.
    pub fn submit(&mut self) -> Result<(), SubmitRejection> {
        if self.input.trim().is_empty() {
            let suggestion = SUGGESTIONS[self.selected_suggestion].to_string();
            self.session.submit(&suggestion)?;
        } else {
            let input = self.input.clone();
            if let Some(question) = input.strip_prefix("/advice ") {
                self.session.submit_advice(question)?;
            } else {
                self.session.submit(&input)?;
            }
            self.input.clear();
        }
        // Follow the conversation as it grows.
        self.follow_bottom = true;
        Ok(())
    }

    pub fn update_spinner_animation(&mut self) {
        if self.session.indicator().is_pending()
            && self.last_spinner_update.elapsed() >= Duration::from_millis(80)
        {
            self.session.indicator_mut().update_spinner();
            self.last_spinner_update = Instant::now();
        }
    }
}
