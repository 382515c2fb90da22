//! Side-effect intents the window manager queues for its host to execute.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEffect {
    /// Write the persistable window states through the persistence bridge.
    PersistWindowStates,
    /// Play a named UI sound cue.
    PlaySound(&'static str),
}

/// Ordered effect queue. Persist requests coalesce: at most one is pending at a time, since the
/// write always carries the latest full state.
#[derive(Debug, Default)]
pub(crate) struct EffectQueue {
    pending: Vec<RuntimeEffect>,
}

impl EffectQueue {
    pub(crate) fn push(&mut self, effect: RuntimeEffect) {
        if effect == RuntimeEffect::PersistWindowStates && self.pending.contains(&effect) {
            return;
        }
        self.pending.push(effect);
    }

    pub(crate) fn drain(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
