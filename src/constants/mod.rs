use std::time::Duration;

pub const COOKIE_PKCE_VERIFIER: &str = "pkce_verifier";
pub const COOKIE_OAUTH_STATE: &str = "oauth_state";
pub const COOKIE_ACCESS_TOKEN: &str = "access_token";
pub const COOKIE_USER_INFO: &str = "user_info";

pub const LOGIN_FLOW_DURATION: Duration = Duration::from_secs(60 * 10); // 10 minutes
pub const SESSION_DURATION: Duration = Duration::from_secs(60 * 60); // 1 hour

pub const LOGIN_CALLBACK_PATH: &str = "/login-callback";

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common";
pub const DEFAULT_GRAPH_API_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_SCOPES: &str =
    "User.Read Schedule.Read.All MailboxSettings.Read Calendars.ReadWrite Calendars.Read.Shared";

// Scopes requested again when redeeming the code
pub const TOKEN_SCOPES: &[&str] = &["Calendars.ReadWrite.Shared", "User.Read"];

pub const DEFAULT_AVAILABILITY_INTERVAL: u32 = 30;
pub const DEFAULT_TIME_ZONE: &str = "UTC";
