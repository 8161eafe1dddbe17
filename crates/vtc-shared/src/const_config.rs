//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub const PANIC_ON_RARE_ERR: bool = true;

pub mod uac {
    use crate::uac::OwnershipRule;

    /// Holders of this permission pass every access check
    pub const UAC_ALL_ACCESS_GUARD: &str = "all_access";

    /// Holders of this role pass every role restricted page
    pub const UAC_SUPER_ADMIN_ROLE: &str = "super_admin";

    pub const UAC_AGENT_VIEW: OwnershipRule<'static> = OwnershipRule {
        broad: "view_any_agent",
        narrow: "view_own_agent",
    };
    pub const UAC_AGENT_UPDATE: OwnershipRule<'static> = OwnershipRule {
        broad: "update_any_agent",
        narrow: "update_own_agent",
    };
    pub const UAC_AGENT_DELETE: OwnershipRule<'static> = OwnershipRule {
        broad: "delete_any_agent",
        narrow: "delete_own_agent",
    };
}

pub mod client {
    /// Used when neither the environment nor the command line provide one
    pub const CLIENT_DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
    pub const CLIENT_API_BASE_URL_ENV_VAR: &str = "VTC_API_BASE_URL";
    /// Key the bearer token is persisted under (browser local storage)
    pub const CLIENT_TOKEN_STORAGE_KEY: &str = "auth_token";
    pub const CLIENT_DEFAULT_PAGE_SIZE: u32 = 20;
}

pub mod navigation {
    pub const NAV_ROUTE_LOGIN: &str = "/login";
    pub const NAV_ROUTE_HOME: &str = "/";
    /// Query parameter carrying the originally requested path through login
    pub const NAV_REDIRECT_PARAM: &str = "redirect";
    pub const NAV_TOKEN_COOKIE_NAME: &str = "auth_token";
    pub const NAV_PUBLIC_PREFIXES: &[&str] = &["/login", "/forgot-password"];
    pub const NAV_PROTECTED_PREFIXES: &[&str] = &[
        "/",
        "/drivers",
        "/partners",
        "/evaluations",
        "/agents",
        "/admin",
        "/settings",
        "/reporting",
        "/notifications",
        "/import-export",
        "/audit",
    ];
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_AUTH_FORGOT_PASSWORD: PathSpec = PathSpec::post("/auth/forgot-password");
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_AUTH_LOGOUT: PathSpec = PathSpec::post("/auth/logout");
    pub const PATH_AUTH_ME: PathSpec = PathSpec::get("/auth/me");
    pub const PATH_AUTH_RESET_PASSWORD: PathSpec = PathSpec::post("/auth/reset-password");
    pub const PATH_AUTH_VERIFY_OTP: PathSpec = PathSpec::post("/auth/verify-otp");
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health_check");
    pub const PATH_VERSION: PathSpec = PathSpec::get("/version");
}
