//! Backend endpoints and HTTP constants

/// Backend used when neither the config file nor `FORAGE_API_URL` names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("forage-cli/", env!("CARGO_PKG_VERSION"));

pub mod headers {
    pub const X_CORRELATION_ID: &str = "X-Correlation-ID";
}

/// Resource paths, relative to the base URL
pub mod endpoints {
    pub const PUITS: &str = "/puits";
    pub const FORAGES: &str = "/forages";
    pub const PHASES: &str = "/phases";
    pub const OPERATIONS: &str = "/operations";
    pub const TYPE_OPERATIONS: &str = "/type-operations";
    pub const TYPE_INDICATEURS: &str = "/type-indicateurs";
    pub const INDICATEURS: &str = "/indicateurs";
    pub const DAILY_REPORTS: &str = "/daily-reports";
    pub const PROBLEMES: &str = "/problemes";
    pub const PROBLEMES_DETECT: &str = "/problemes/detect";
    pub const UTILISATEURS: &str = "/utilisateurs";
    pub const REGISTER: &str = "/utilisateurs/register";
    pub const LOGIN: &str = "/utilisateurs/login";
    pub const DASHBOARD_DATA: &str = "/dashboard/data";
}

/// `/phases/42`
pub fn record_path(collection: &str, id: i64) -> String {
    format!("{}/{}", collection, id)
}

/// `/phases/forage/42`
pub fn child_path(collection: &str, parent: &str, parent_id: i64) -> String {
    format!("{}/{}/{}", collection, parent, parent_id)
}

/// Metrics bucket for a path: its first segment
pub fn resource_name(path: &str) -> &str {
    path.trim_start_matches('/')
        .split(['/', '?'])
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("root")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(record_path(endpoints::PHASES, 7), "/phases/7");
        assert_eq!(child_path(endpoints::OPERATIONS, "phase", 3), "/operations/phase/3");
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("/operations/phase/3"), "operations");
        assert_eq!(resource_name("/daily-reports?puitId=1"), "daily-reports");
        assert_eq!(resource_name("/"), "root");
    }
}
