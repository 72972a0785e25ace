//! Test mode flag for developer sites.

use crate::errors::Result;
use crate::request::Request;
use serde_json::json;

/// Marks requests from a site in dev mode with `test_mode`.
pub trait ModeFlag: Request {
    /// Sets `test_mode` to true when the site runs in dev mode.
    ///
    /// Outside dev mode the parameter is left unset so the remote side
    /// decides.
    fn apply_mode_flag(&mut self) -> Result<()> {
        if self.core().site().dev_mode {
            self.core_mut().set_param("test_mode", json!(true))?;
        }
        Ok(())
    }
}
