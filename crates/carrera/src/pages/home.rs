//! Home page of the site under test.

use super::PageObject;
use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::session::Session;
use tracing::info;

/// Brand string the home page title must carry (case-sensitive)
const BRAND: &str = "Insider";

/// Home page object: entry point of the journey.
#[derive(Debug)]
pub struct HomePage<'a> {
    session: &'a Session,
    url: String,
    /// Company dropdown in the navigation bar
    pub company_menu: Locator,
    /// Careers link nested under the company dropdown
    pub careers_link: Locator,
    /// Consent banner accept button
    pub cookie_button: Locator,
}

impl<'a> HomePage<'a> {
    /// Build the page object against an active session
    #[must_use]
    pub fn new(session: &'a Session, config: &SuiteConfig) -> Self {
        Self {
            session,
            url: config.base_url.clone(),
            company_menu: Locator::xpath("(//*[@id='navbarDropdownMenuLink'])[5]"),
            careers_link: Locator::xpath("//*[@id='navbarNavDropdown']/ul[1]/li[6]/div/div[2]/a[2]"),
            cookie_button: Locator::xpath("//*[@id='wt-cli-accept-all-btn']"),
        }
    }

    /// Navigate to the base URL and wait for the document to settle
    pub async fn open(&self) {
        info!(url = %self.url, "accessing main portal");
        self.session.navigate(&self.url).await;
        self.session.document_ready().await;
    }

    /// True iff the page title carries the brand string
    pub async fn is_accessible(&self) -> bool {
        let title = self.session.title().await;
        info!(%title, "site identification");
        title.contains(BRAND)
    }

    /// Best-effort consent dismissal; a missing banner is not an error
    pub async fn accept_cookies(&self) -> bool {
        info!("checking for cookie consent prompt");
        self.session
            .dismiss_if_clickable(&self.cookie_button, self.session.waits().timeout())
            .await
    }

    /// Open the company menu, then follow the nested careers link
    pub async fn navigate_to_careers(&self) {
        info!("accessing company information");
        self.session.click(&self.company_menu).await;
        info!("selecting career opportunities");
        self.session.click(&self.careers_link).await;
    }
}

impl PageObject for HomePage<'_> {
    fn page_name(&self) -> &'static str {
        "home"
    }
}
