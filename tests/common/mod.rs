use once_cell::sync::Lazy;

static LOGGING: Lazy<()> = Lazy::new(|| {
    // The fmt subscriber's log bridge also captures log:: macro output
    // from the crate under test.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
});

/// Install the test log subscriber once per test binary.
pub fn init_logging() {
    Lazy::force(&LOGGING);
}
