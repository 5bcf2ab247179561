use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::ui::panel::{Panel, animation_panel};

/// Display label of the tab as shown by the host.
pub const TAB_LABEL: &str = "GIF/MP4 Maker";
/// Stable element id of the tab inside the host UI.
pub const TAB_ID: &str = "gif_movie_maker_tab";

/// Zero-argument factory the host invokes to build the tab's UI.
pub type TabFactory = fn() -> Panel;

/// Host collaborator: the UI-tab registry the plugin registers into.
pub trait TabRegistry {
    /// Register a tab with a display label, a stable element id, and a
    /// factory the host calls when the tab is first shown.
    fn register_tab(&mut self, label: &str, id: &str, factory: TabFactory);
}

static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register the animation tab with the host, exactly once per process.
///
/// The host may construct the plugin more than once per load; every call
/// after the first is skipped regardless of how many constructions happen.
/// Returns `true` when this call performed the registration.
pub fn register_animation_tab(registry: &mut dyn TabRegistry) -> bool {
    if REGISTERED.swap(true, Ordering::SeqCst) {
        debug!("animation tab already registered, skipping");
        return false;
    }
    debug!(label = TAB_LABEL, id = TAB_ID, "registering animation tab");
    registry.register_tab(TAB_LABEL, TAB_ID, animation_panel);
    true
}
