use std::time::Duration;

pub const DEFAULT_SESSION_DURATION: Duration = Duration::from_secs(60 * 60 * 5);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_ACTIVATION_PATH: &str = "/apidemo";
pub const DEFAULT_ROOT_PATH: &str = "/";

/// Tunables for the demo access bundle.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// Lifetime of a freshly activated session
    pub session_duration: Duration,
    /// Period between expiry sweeps
    pub sweep_interval: Duration,
    /// Path serving and accepting activation
    pub activation_path: String,
    /// Where activated (or just-expired) clients are sent
    pub root_path: String,
    /// Paths that bypass the gate entirely (health probes, robots)
    pub ungated_paths: Vec<String>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            session_duration: DEFAULT_SESSION_DURATION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            activation_path: DEFAULT_ACTIVATION_PATH.to_string(),
            root_path: DEFAULT_ROOT_PATH.to_string(),
            ungated_paths: Vec::new(),
        }
    }
}

impl DemoSettings {
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_ungated_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ungated_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Session duration as a chrono span for timestamp arithmetic.
    /// Saturates at the largest representable span.
    pub(crate) fn session_span(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_duration).unwrap_or(chrono::Duration::MAX)
    }
}
