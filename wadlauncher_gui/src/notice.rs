use std::collections::VecDeque;

use eframe::egui;
use egui::{Align2, Color32, RichText};
use tracing::{error, info, warn, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    fn color(self) -> Color32 {
        match self {
            NoticeLevel::Info => Color32::from_rgb(59, 130, 246),
            NoticeLevel::Warning => Color32::from_rgb(249, 115, 22),
            NoticeLevel::Error => Color32::from_rgb(239, 68, 68),
        }
    }

    fn log_level(self) -> Level {
        match self {
            NoticeLevel::Info => Level::INFO,
            NoticeLevel::Warning => Level::WARN,
            NoticeLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

/// Modal messages shown one at a time, oldest first.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, level: NoticeLevel, title: impl Into<String>, body: impl Into<String>) {
        let notice = Notice {
            level,
            title: title.into(),
            body: body.into(),
        };
        match level.log_level() {
            Level::ERROR => error!(title = %notice.title, "{}", notice.body),
            Level::WARN => warn!(title = %notice.title, "{}", notice.body),
            _ => info!(title = %notice.title, "{}", notice.body),
        }
        self.pending.push_back(notice);
    }

    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeLevel::Info, title, body);
    }

    pub fn warning(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeLevel::Warning, title, body);
    }

    pub fn error(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeLevel::Error, title, body);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn front(&self) -> Option<&Notice> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) {
        self.pending.pop_front();
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.pending.front() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.clone())
            .id(egui::Id::new("launcher_notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&notice.body).color(notice.level.color()));
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_are_shown_in_order() {
        let mut queue = NoticeQueue::default();
        queue.warning("first", "a");
        queue.error("second", "b");
        assert_eq!(queue.front().map(|n| n.title.as_str()), Some("first"));
        queue.dismiss();
        assert_eq!(queue.front().map(|n| n.level), Some(NoticeLevel::Error));
        queue.dismiss();
        assert!(queue.is_empty());
    }

    #[test]
    fn notices_log_at_their_own_severity() {
        assert_eq!(NoticeLevel::Info.log_level(), Level::INFO);
        assert_eq!(NoticeLevel::Warning.log_level(), Level::WARN);
        assert_eq!(NoticeLevel::Error.log_level(), Level::ERROR);
    }
}
