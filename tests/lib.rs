mod errors;

/// Set up `env_logger` once per test binary, so `RUST_LOG=trace` shows the
/// compiler's log messages when the `logging` feature is enabled.
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
