//! Account dashboard login links.

use super::BASE_REQUEST;
use crate::capabilities::ModeFlag;
use crate::contracts::{HttpMethod, RequestDescriptor};
use crate::errors::Result;
use crate::request::{Request, RequestCore, RequestType};
use crate::validation::{validate_identifier, validate_redirect_url, validate_route};
use serde_json::json;

static GET_ACCOUNT_LOGIN: RequestDescriptor = RequestDescriptor {
    name: "get_account_login",
    parent: Some(&BASE_REQUEST),
    required: &["redirect_url"],
    method: Some(HttpMethod::Post),
    endpoint: Some("accounts/login_links"),
    extension_point: Some("payreq_get_account_login_request"),
    ..RequestDescriptor::BLANK
};

/// Requests a one-time login link to the account dashboard.
///
/// Signed with the user's token and scoped to the connected site.
#[derive(Debug)]
pub struct GetAccountLogin {
    core: RequestCore,
}

impl GetAccountLogin {
    /// Where the dashboard sends the user back to; must be on this site.
    pub fn set_redirect_url(&mut self, url: &str) -> Result<()> {
        let site = self.core.site();
        let url = validate_redirect_url(url, "redirect_url", &site)?;
        self.core_mut().set_param("redirect_url", json!(url.as_str()))
    }

    /// Dashboard page to open, e.g. `payments/overview`.
    pub fn set_dashboard_route(&mut self, route: &str) -> Result<()> {
        validate_route(route, "dashboard_route")?;
        self.core_mut().set_param("dashboard_route", json!(route))
    }

    /// Login hint for the dashboard's sign-in form.
    pub fn set_login_hint(&mut self, login: &str) -> Result<()> {
        validate_identifier(login, "login_hint")?;
        self.core_mut().set_param("login_hint", json!(login))
    }
}

impl Request for GetAccountLogin {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn should_use_user_token(&self) -> bool {
        true
    }

    fn is_site_specific(&self) -> bool {
        true
    }
}

impl RequestType for GetAccountLogin {
    fn type_descriptor() -> &'static RequestDescriptor {
        &GET_ACCOUNT_LOGIN
    }

    fn from_core(core: RequestCore) -> Self {
        Self { core }
    }
}

impl ModeFlag for GetAccountLogin {}
