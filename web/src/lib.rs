use wasm_bindgen::prelude::*;

pub use config::*;
pub use session::*;

mod config;
mod session;
mod utils;

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let args = LaunchArgs::from_location();
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("Launched with {:?}", args);

    // `WebSession::from_location` picks these up instead of reading the hash again
    LaunchOptions::current_or_else(|| args);
}
