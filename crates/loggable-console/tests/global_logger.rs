//! The capturing console installed as the process-wide `log` backend.

use log::LevelFilter;
use loggable_console::testing::TestConsole;

#[test]
fn facade_records_reach_the_console() {
    let tc = TestConsole::new();
    tc.install_global(LevelFilter::Info).unwrap();
    assert_eq!(log::max_level(), LevelFilter::Info);

    log::info!(target: "app::Ledger", "#deposit([10]): 110 in {}ms", 3);
    log::debug!(target: "app::Ledger", "dropped");
    log::error!(target: "app::Ledger", "#withdraw([500]): thrown app::Overdrawn(no funds)");

    assert_eq!(
        tc.output(),
        vec![
            "INFO app::Ledger - #deposit([10]): 110 in 3ms",
            "ERROR app::Ledger - #withdraw([500]): thrown app::Overdrawn(no funds)",
        ]
    );
    assert!(TestConsole::new().install_global(LevelFilter::Trace).is_err());
}
