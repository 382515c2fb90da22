//! Screen-reader announcement sink contracts.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Urgency of a live-region announcement.
pub enum AnnouncePriority {
    /// Announced when the reader is idle (`aria-live="polite"`).
    Polite,
    /// Interrupts current speech (`aria-live="assertive"`).
    Assertive,
}

impl AnnouncePriority {
    /// Value used for the `aria-live` attribute.
    pub fn aria_live(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// Host sink for accessibility announcements.
pub trait Announcer {
    /// Announces `message` with the given priority.
    fn announce(&self, message: &str, priority: AnnouncePriority);
}

#[derive(Debug, Clone, Copy, Default)]
/// Announcer that drops every message.
pub struct NoopAnnouncer;

impl Announcer for NoopAnnouncer {
    fn announce(&self, _message: &str, _priority: AnnouncePriority) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One recorded announcement.
pub struct Announcement {
    /// Announced text.
    pub message: String,
    /// Priority it was announced with.
    pub priority: AnnouncePriority,
}

#[derive(Debug, Clone, Default)]
/// Announcer that records every message in order. Clones share the same log.
pub struct MemoryAnnouncer {
    log: Rc<RefCell<Vec<Announcement>>>,
}

impl MemoryAnnouncer {
    /// Returns all announcements recorded so far.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.log.borrow().clone()
    }

    /// Returns the most recent announcement.
    pub fn last(&self) -> Option<Announcement> {
        self.log.borrow().last().cloned()
    }
}

impl Announcer for MemoryAnnouncer {
    fn announce(&self, message: &str, priority: AnnouncePriority) {
        self.log.borrow_mut().push(Announcement {
            message: message.to_string(),
            priority,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_announcer_clones_share_log() {
        let announcer = MemoryAnnouncer::default();
        let sink: Box<dyn Announcer> = Box::new(announcer.clone());
        sink.announce("Calculator focused", AnnouncePriority::Polite);
        sink.announce("Disk full", AnnouncePriority::Assertive);

        assert_eq!(announcer.announcements().len(), 2);
        assert_eq!(
            announcer.last(),
            Some(Announcement {
                message: "Disk full".to_string(),
                priority: AnnouncePriority::Assertive,
            })
        );
        assert_eq!(AnnouncePriority::Assertive.aria_live(), "assertive");
    }
}
