/// Configuration descriptor for a RaySonic world
#[derive(Debug, Clone, Default)]
pub struct RaySonicWorldDesc {
    /// Seed for the direction sampler. `None` seeds from OS entropy.
    ///
    /// Fixing the seed makes every sampling pass reproducible for a given
    /// sequence of updates.
    pub seed: Option<u64>,
    /// Publish `RaySonicEvent`s on the world's event channel
    pub emit_events: bool,
}

impl RaySonicWorldDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn emit_events(mut self, enable: bool) -> Self {
        self.emit_events = enable;
        self
    }
}
