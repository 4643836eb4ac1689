/// Installs the global `tracing` subscriber.
///
/// Verbosity comes from `RUST_LOG`, e.g. `RUST_LOG=quickbite=debug,actor_framework=info`.
/// Output is compact and omits targets; actor and client spans carry the context.
///
/// Panics if a global subscriber is already set, so call it once from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
