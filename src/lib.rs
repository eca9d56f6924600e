use pretty_env_logger;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        let _ = pretty_env_logger::try_init();
    });
}

pub const VERSION: &str = env!("RESERVOIR_CORE_VERSION");

pub mod contour;
pub mod curves;
pub mod summary;
pub mod units;
pub mod visibility;
