use super::timing::SampleClock;
use crate::render::{Highlight, ProxySet};
use crate::scene::{ObjectId, SceneStore};
use std::time::{Duration, Instant};

/// Reconciles the selected proxy's live transform back into the store.
///
/// The manipulation handle edits proxies without reporting anything, so
/// while a selection exists the proxy is sampled once per interval and
/// copied into the owning record and the highlight.
#[derive(Debug)]
pub struct TransformSync {
    clock: SampleClock,
    target: Option<ObjectId>,
}

impl TransformSync {
    pub fn new(interval: Duration) -> Self {
        Self {
            clock: SampleClock::new(interval),
            target: None,
        }
    }

    pub fn target(&self) -> Option<&ObjectId> {
        self.target.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn samples(&self) -> u64 {
        self.clock.samples()
    }

    /// Track the current selection. Sampling runs only while it is `Some`.
    pub fn follow(&mut self, selected: Option<&ObjectId>, now: Instant) {
        match selected {
            Some(id) => {
                if self.target.as_ref() != Some(id) {
                    log::debug!("Sampling transform of {}", id);
                    self.target = Some(id.clone());
                }
                self.clock.start(now);
            }
            None => self.stop(),
        }
    }

    pub fn stop(&mut self) {
        if self.clock.is_running() {
            log::debug!("Transform sampling stopped");
        }
        self.target = None;
        self.clock.stop();
    }

    /// Take a sample if one is due. Returns whether the store changed.
    pub fn tick(
        &mut self,
        now: Instant,
        proxies: &ProxySet,
        store: &mut SceneStore,
        highlight: &mut Option<Highlight>,
    ) -> bool {
        if !self.clock.poll(now) {
            return false;
        }
        let Some(target) = &self.target else {
            return false;
        };
        let Some(proxy) = proxies.get(target) else {
            return false;
        };
        if let Some(highlight) = highlight.as_mut().filter(|h| h.target == *target) {
            highlight.transform = proxy.transform;
        }
        if store.transform(target) == Some(proxy.transform) {
            return false;
        }
        store.set_transform(target, proxy.transform)
    }
}
