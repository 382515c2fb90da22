//! Host-side execution of the effects the window manager queues.
//!
//! The manager only records intents; [`DesktopHost`] drains them after each batch of operations
//! and carries them out. Persistence is fire-and-forget: failures are logged and never surface to
//! the user.

use std::{future::Future, rc::Rc};

use leptos::logging;

use crate::{
    config::WindowManagerConfig,
    effects::RuntimeEffect,
    model::{WindowContent, WindowId, WindowState},
    persistence::{PersistOutcome, PersistenceBridge},
    window_manager::WindowManager,
};

type SoundCue = Rc<dyn Fn(&str)>;

/// Effect executor wired to a persistence bridge and an optional sound player.
#[derive(Clone)]
pub struct DesktopHost {
    bridge: PersistenceBridge,
    sound_cue: Option<SoundCue>,
}

impl DesktopHost {
    pub fn new(bridge: PersistenceBridge) -> Self {
        Self {
            bridge,
            sound_cue: None,
        }
    }

    /// Host persisting to browser local storage under the configured key.
    pub fn browser(config: &WindowManagerConfig) -> Self {
        Self::new(PersistenceBridge::browser(config.storage_key.clone()))
    }

    /// Plays UI sound cues (such as `"error"`) through `cue`.
    pub fn with_sound_cue(mut self, cue: impl Fn(&str) + 'static) -> Self {
        self.sound_cue = Some(Rc::new(cue));
        self
    }

    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    /// Drains and executes every queued effect in order, returning how many ran.
    pub fn run_runtime_effects(&self, wm: &mut WindowManager) -> usize {
        let effects = wm.drain_effects();
        let count = effects.len();
        for effect in effects {
            self.run_runtime_effect(wm, effect);
        }
        count
    }

    /// Executes a single [`RuntimeEffect`].
    pub fn run_runtime_effect(&self, wm: &WindowManager, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistWindowStates => {
                let snapshot = wm.persisted_snapshot();
                let bridge = self.bridge.clone();
                spawn_detached(async move {
                    match bridge.save(&snapshot).await {
                        Ok(PersistOutcome::Stored) => {}
                        Ok(PersistOutcome::StoredViaFallback) => {
                            logging::log!("window states saved through the sync fallback");
                        }
                        Err(err) => logging::warn!("persist window states failed: {err}"),
                    }
                });
            }
            RuntimeEffect::PlaySound(name) => {
                if let Some(cue) = self.sound_cue.as_ref() {
                    cue(name);
                }
            }
        }
    }

    /// Loads the persisted snapshot and replays it into `wm`.
    ///
    /// A missing or unreadable snapshot restores nothing.
    pub async fn restore_session<F>(
        &self,
        wm: &mut WindowManager,
        content_for: F,
    ) -> Vec<WindowId>
    where
        F: FnMut(&WindowState) -> Option<WindowContent>,
    {
        match self.bridge.load().await {
            Ok(Some(snapshot)) => wm.restore_windows(snapshot, content_for),
            Ok(None) => Vec::new(),
            Err(err) => {
                logging::warn!("window state restore failed: {err}");
                Vec::new()
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_detached(fut: impl Future<Output = ()> + 'static) {
    leptos::spawn_local(fut);
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_detached(fut: impl Future<Output = ()> + 'static) {
    futures::executor::block_on(fut);
}
