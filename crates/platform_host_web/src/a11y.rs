//! ARIA live-region announcer.

use platform_host::{AnnouncePriority, Announcer};

const POLITE_REGION_ID: &str = "wm-live-polite";
const ASSERTIVE_REGION_ID: &str = "wm-live-assertive";

#[derive(Debug, Clone, Copy, Default)]
/// Announcer writing into hidden `aria-live` regions appended to the document body.
///
/// One region exists per priority; regions are created lazily on first use.
pub struct LiveRegionAnnouncer;

impl LiveRegionAnnouncer {
    fn region_id(priority: AnnouncePriority) -> &'static str {
        match priority {
            AnnouncePriority::Polite => POLITE_REGION_ID,
            AnnouncePriority::Assertive => ASSERTIVE_REGION_ID,
        }
    }
}

impl Announcer for LiveRegionAnnouncer {
    fn announce(&self, message: &str, priority: AnnouncePriority) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(region) = live_region(Self::region_id(priority), priority) else {
                return;
            };
            // Clearing first makes readers re-announce identical consecutive messages.
            region.set_text_content(None);
            region.set_text_content(Some(message));
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (message, Self::region_id(priority));
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn live_region(id: &str, priority: AnnouncePriority) -> Option<web_sys::Element> {
    let document = web_sys::window()?.document()?;
    if let Some(existing) = document.get_element_by_id(id) {
        return Some(existing);
    }
    let region = document.create_element("div").ok()?;
    region.set_id(id);
    let _ = region.set_attribute("aria-live", priority.aria_live());
    let _ = region.set_attribute("role", "status");
    let _ = region.set_attribute("class", "visually-hidden");
    document.body()?.append_child(&region).ok()?;
    Some(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_priority_gets_its_own_region() {
        assert_ne!(
            LiveRegionAnnouncer::region_id(AnnouncePriority::Polite),
            LiveRegionAnnouncer::region_id(AnnouncePriority::Assertive)
        );
        LiveRegionAnnouncer.announce("ignored natively", AnnouncePriority::Polite);
    }
}
