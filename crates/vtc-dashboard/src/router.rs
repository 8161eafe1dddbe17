//! Client side routes of the dashboard and the mapping to and from locations
//! (path plus query) used in the address bar

use std::borrow::Cow;

use strum::IntoEnumIterator as _;
use tracing::{info, warn};
use vtc_shared::{
    const_config::navigation::{NAV_REDIRECT_PARAM, NAV_ROUTE_HOME, NAV_ROUTE_LOGIN},
    id::DbId,
    resource::ResourceKind,
};

use crate::location;

/// Roles allowed on the administration pages (in addition to super admins)
pub const ADMIN_ROLES: &[&str] = &["admin"];

const ROUTE_FORGOT_PASSWORD: &str = "/forgot-password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login { redirect: Option<String> },
    ForgotPassword,
    Resources(ResourceKind),
    Agent(DbId),
    NotFound(String),
}

/// Where the list page of each collection lives. Nested under a protected
/// prefix so navigations to them are always checked.
pub fn resource_page_path(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Drivers => "/drivers",
        ResourceKind::Partners => "/partners",
        ResourceKind::Agents => "/agents",
        ResourceKind::Evaluations => "/evaluations",
        ResourceKind::EvaluationCriteria => "/evaluations/criteria",
        ResourceKind::EvaluationTemplates => "/evaluations/templates",
        ResourceKind::Roles => "/admin/roles",
        ResourceKind::Permissions => "/admin/permissions",
        ResourceKind::Sessions => "/admin/sessions",
    }
}

/// Only same site absolute paths are followed after login
fn sanitize_redirect(redirect: &str) -> Option<String> {
    let is_local = redirect.starts_with('/') && !redirect.starts_with("//");
    if is_local && !redirect.starts_with(NAV_ROUTE_LOGIN) {
        Some(redirect.to_string())
    } else {
        None
    }
}

fn query_value<'a>(query: &'a str, key: &str) -> Option<Cow<'a, str>> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
}

impl Route {
    pub fn parse(location: &str) -> Self {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = match path.trim_end_matches('/') {
            "" => NAV_ROUTE_HOME,
            trimmed => trimmed,
        };

        if path == NAV_ROUTE_HOME {
            return Self::Home;
        }
        if path == NAV_ROUTE_LOGIN {
            let redirect = query_value(query, NAV_REDIRECT_PARAM)
                .and_then(|x| sanitize_redirect(&x));
            return Self::Login { redirect };
        }
        if path == ROUTE_FORGOT_PASSWORD {
            return Self::ForgotPassword;
        }
        if let Some(kind) = ResourceKind::iter().find(|x| resource_page_path(*x) == path) {
            return Self::Resources(kind);
        }
        if let Some(id) = path
            .strip_prefix(resource_page_path(ResourceKind::Agents))
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|id| id.parse::<u64>().ok())
        {
            return Self::Agent(id.into());
        }
        Self::NotFound(path.to_string())
    }

    pub fn to_location(&self) -> String {
        match self {
            Self::Home => NAV_ROUTE_HOME.to_string(),
            Self::Login { redirect: None } => NAV_ROUTE_LOGIN.to_string(),
            Self::Login {
                redirect: Some(redirect),
            } => format!(
                "{NAV_ROUTE_LOGIN}?{NAV_REDIRECT_PARAM}={}",
                urlencoding::encode(redirect)
            ),
            Self::ForgotPassword => ROUTE_FORGOT_PASSWORD.to_string(),
            Self::Resources(kind) => resource_page_path(*kind).to_string(),
            Self::Agent(id) => format!("{}/{id}", resource_page_path(ResourceKind::Agents)),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// The login route that comes back here once logged in
    pub fn login_returning_here(&self) -> Self {
        let redirect = match self {
            Self::Home | Self::Login { .. } | Self::ForgotPassword => None,
            _ => sanitize_redirect(&self.to_location()),
        };
        Self::Login { redirect }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::ForgotPassword)
    }

    /// Role allow-list for the page, empty means any logged in user
    pub fn required_roles(&self) -> &'static [&'static str] {
        match self {
            Self::Resources(ResourceKind::Roles | ResourceKind::Permissions | ResourceKind::Sessions) => {
                ADMIN_ROLES
            }
            _ => &[],
        }
    }

    pub fn title(&self) -> Cow<'static, str> {
        match self {
            Self::Home => "Home".into(),
            Self::Login { .. } => "Login".into(),
            Self::ForgotPassword => "Forgot Password".into(),
            Self::Resources(kind) => kind.title().into(),
            Self::Agent(id) => format!("Agent #{id}").into(),
            Self::NotFound(_) => "Not Found".into(),
        }
    }
}

/// The current route, kept in step with the address bar on the web
#[derive(Debug)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Adds an entry to the browser history
    pub fn navigate(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        info!(from = ?self.current, to = ?route, "navigate");
        location::push(&route.to_location());
        self.current = route;
    }

    /// Used for redirects so "back" does not return to the page that redirected
    pub fn replace(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        info!(from = ?self.current, to = ?route, "redirect");
        location::replace(&route.to_location());
        self.current = route;
    }

    /// Picks up changes made outside the app (browser back and forward)
    pub fn sync_from_location(&mut self) {
        let Some(location) = location::current() else {
            return;
        };
        if location != self.current.to_location() {
            let route = Route::parse(&location);
            if route != self.current {
                warn!(?route, "location changed outside of the router");
                self.current = route;
            }
        }
    }
}
