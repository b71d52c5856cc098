//! Page objects for the career-search journey.
//!
//! Each page type models one logical page: it borrows the active
//! [`crate::session::Session`], declares a fixed set of locators, and
//! exposes the navigation and verification operations the scenario
//! composes. Pages share behavior by composition (every page holds the
//! same session handle), not by inheritance.

mod careers;
mod home;
mod qa_careers;

pub use careers::CareersPage;
pub use home::HomePage;
pub use qa_careers::QaCareersPage;

/// Minimal identity trait for page objects, used in log lines.
pub trait PageObject {
    /// Page name for logging/debugging
    fn page_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::mock::MockDriver;
    use crate::session::Session;
    use crate::wait::WaitPolicy;

    #[tokio::test]
    async fn test_page_names() {
        let mock = MockDriver::new();
        let session = Session::new(Box::new(mock), WaitPolicy::default());
        let config = SuiteConfig::default();

        assert_eq!(HomePage::new(&session, &config).page_name(), "home");
        assert_eq!(CareersPage::new(&session, &config).page_name(), "careers");
        assert_eq!(QaCareersPage::new(&session, &config).page_name(), "qa-careers");
    }
}
