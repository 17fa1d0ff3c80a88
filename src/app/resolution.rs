//! First-frame activation of the resolution fan-out

use super::App;
use crate::feed;
use tracing::info;

impl App {
    /// Dispatch one resolution task per configured reference. Runs once
    /// per app lifetime, on the first frame after the window is up;
    /// later calls are no-ops.
    pub fn begin_resolution(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;

        info!(
            count = self.references.len(),
            "Activating subscription resolution"
        );
        feed::activate(
            self.references.clone(),
            self.resolver.clone(),
            self.feed.clone(),
            self.runtime.handle(),
        );
    }
}
