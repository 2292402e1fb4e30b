pub const DEFAULT_API_PREFIX: &str = "/api/v0";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

#[derive(Debug, Clone)]
pub struct ApiRoutes {
    prefix: String,
}

impl ApiRoutes {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn path(&self, relative: &str) -> String {
        format!("{}/{}", self.prefix, relative.trim_start_matches('/'))
    }

    pub fn login(&self) -> String {
        self.path("auth/login")
    }

    pub fn register(&self) -> String {
        self.path("auth/register")
    }

    pub fn logout(&self) -> String {
        self.path("auth/logout")
    }

    pub fn refresh(&self) -> String {
        self.path("auth/refresh")
    }
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_API_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_prefix_without_double_slashes() {
        let routes = ApiRoutes::new("/api/v0/");
        assert_eq!(routes.refresh(), "/api/v0/auth/refresh");
        assert_eq!(routes.path("/cards"), "/api/v0/cards");
        assert_eq!(ApiRoutes::default().login(), "/api/v0/auth/login");
    }
}
