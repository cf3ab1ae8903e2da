use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::{LazyLock, Once};

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Demo session counters
pub static DEMO_ACTIVATIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gateway_demo_activations_total",
            "Activation requests by outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

pub static DEMO_GATE_REDIRECTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gateway_demo_gate_redirects_total",
            "Requests redirected by the demo gate, by session state",
        ),
        &["state"],
    )
    .unwrap()
});

pub static DEMO_SESSIONS_SWEPT: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_demo_sessions_swept_total",
        "Expired demo sessions removed by the sweeper",
    )
    .unwrap()
});

pub static DEMO_SESSIONS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "gateway_demo_sessions",
        "Demo sessions currently held in the store",
    )
    .unwrap()
});

// Crash containment
pub static PANICS_CONTAINED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_panics_contained_total",
        "Panics observed and contained without terminating the process",
    )
    .unwrap()
});

static REGISTER: Once = Once::new();

/// Register all metrics with the registry. Safe to call more than once.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY.register(Box::new(DEMO_ACTIVATIONS.clone())).unwrap();
        REGISTRY
            .register(Box::new(DEMO_GATE_REDIRECTS.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(DEMO_SESSIONS_SWEPT.clone()))
            .unwrap();
        REGISTRY.register(Box::new(DEMO_SESSIONS.clone())).unwrap();
        REGISTRY
            .register(Box::new(PANICS_CONTAINED.clone()))
            .unwrap();
    });
}
