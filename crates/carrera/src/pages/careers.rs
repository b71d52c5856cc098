//! Careers overview page.

use super::PageObject;
use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::result::CarreraError;
use crate::session::Session;
use crate::wait::Condition;
use std::time::Duration;
use tracing::{info, warn};

/// How long to wait for the QA-jobs confirmation element after the
/// team-navigation click chain
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(10);

/// Careers page object: section verification and the hop into the QA
/// department.
#[derive(Debug)]
pub struct CareersPage<'a> {
    session: &'a Session,
    pause: Duration,
    settle: Duration,
    /// Locations block
    pub locations: Locator,
    /// Teams block
    pub teams: Locator,
    /// Company-culture heading
    pub life_at_insider: Locator,
    /// "See all teams" control
    pub see_all_teams: Locator,
    /// Quality Assurance department heading
    pub qa_heading: Locator,
    /// "Open Positions" link adjacent to the QA heading
    pub qa_open_positions: Locator,
    /// Confirmation link that the QA jobs page rendered
    pub see_all_qa_jobs: Locator,
}

impl<'a> CareersPage<'a> {
    /// Build the page object against an active session
    #[must_use]
    pub fn new(session: &'a Session, config: &SuiteConfig) -> Self {
        Self {
            session,
            pause: config.pause(),
            settle: config.settle(),
            locations: Locator::xpath("//*[@id='career-our-location']/div/div/div/div[1]"),
            teams: Locator::xpath("//*[@id='career-find-our-calling']/div/div/a"),
            life_at_insider: Locator::xpath("//h2[contains(text(), 'Life at Insider')]"),
            see_all_teams: Locator::xpath("//a[contains(text(), 'See all teams')]"),
            qa_heading: Locator::xpath("//h3[contains(text(), 'Quality Assurance')]"),
            qa_open_positions: Locator::xpath(
                "//h3[contains(text(), 'Quality Assurance')]/following-sibling::a[contains(text(), 'Open Positions')]",
            ),
            see_all_qa_jobs: Locator::xpath("//a[contains(text(), 'See all QA jobs')]"),
        }
    }

    /// True if the title or URL looks career-related (any-of,
    /// case-insensitive substring match)
    pub async fn is_accessible(&self) -> bool {
        info!("assessing careers portal accessibility");
        self.session.document_ready().await;
        let title = self.session.title().await.to_lowercase();
        let url = self.session.current_url().await.to_lowercase();
        info!(%title, %url, "careers portal identification");
        title.contains("careers") || title.contains("quality assurance") || url.contains("/careers")
    }

    /// True only if the locations, teams, and culture sections are all
    /// located within their timeouts. Short-circuits on the first missing
    /// section with a logged reason.
    pub async fn verify_sections(&self) -> bool {
        let sections = [
            ("locations", &self.locations),
            ("teams", &self.teams),
            ("company culture", &self.life_at_insider),
        ];
        for (name, locator) in sections {
            info!(section = name, "searching for section");
            if !self.session.wait_for_element(locator).await.is_found() {
                warn!(section = name, "section missing");
                return false;
            }
            info!(section = name, "section identified");
        }
        true
    }

    /// Multi-step navigation into the QA careers page.
    ///
    /// Scrolls to the "See all teams" control twice with pauses (lazy
    /// layouts animate on first scroll), clicks it, lets the page settle,
    /// then prefers the "Open Positions" link next to the QA heading and
    /// falls back to a script-click on the heading itself. Failures are
    /// logged, not propagated; the caller's accessibility check on the
    /// destination page is the real gate.
    pub async fn go_to_qa_careers(&self) {
        info!("locating the teams overview control");
        let teams_control = self
            .session
            .wait_for(&Condition::Clickable(self.see_all_teams.clone()))
            .await;

        self.session.scroll_into_view(&self.see_all_teams).await;
        tokio::time::sleep(self.pause).await;
        self.session.scroll_into_view(&self.see_all_teams).await;
        tokio::time::sleep(self.pause).await;

        if teams_control.is_found() {
            self.session.click(&self.see_all_teams).await;
            info!("teams overview selected");
        } else {
            warn!("teams overview control unavailable");
        }

        info!("allowing page content to load");
        self.session.document_ready().await;
        tokio::time::sleep(self.settle).await;

        info!("finding the Quality Assurance department");
        self.session.scroll_into_view(&self.qa_heading).await;
        tokio::time::sleep(self.pause).await;

        let open_link = self
            .session
            .wait_for(&Condition::Clickable(self.qa_open_positions.clone()))
            .await;
        if open_link.is_found() {
            info!("selecting open positions for the QA team");
            self.session.scroll_into_view(&self.qa_open_positions).await;
            tokio::time::sleep(self.pause).await;
            self.session.click(&self.qa_open_positions).await;
        } else {
            warn!("alternative navigation required, attempting direct selection");
            self.session.script_click(&self.qa_heading).await;
        }

        if !self
            .session
            .wait_until(&Condition::Present(self.see_all_qa_jobs.clone()), CONFIRM_TIMEOUT)
            .await
            .is_found()
        {
            let stale = CarreraError::StaleState {
                message: "QA jobs confirmation element did not appear".to_string(),
            };
            warn!(%stale, "proceeding to the accessibility gate");
        }
    }
}

impl PageObject for CareersPage<'_> {
    fn page_name(&self) -> &'static str {
        "careers"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::mock::{ClickEffect, MockDriver, MockElement};
    use crate::wait::WaitPolicy;

    fn fast_session(mock: &MockDriver) -> Session {
        Session::new(
            Box::new(mock.clone()),
            WaitPolicy::new().with_timeout(100).with_poll_interval(10),
        )
    }

    fn fast_config() -> SuiteConfig {
        SuiteConfig::default().with_pause(5).with_settle(5)
    }

    mod accessibility_tests {
        use super::*;

        #[tokio::test]
        async fn test_accessible_by_title_keyword() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            mock.set_title("Insider Careers");
            mock.set_url("https://useinsider.com/some-page");
            assert!(page.is_accessible().await);
        }

        #[tokio::test]
        async fn test_accessible_by_url_fragment() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            mock.set_title("Insider");
            mock.set_url("https://useinsider.com/careers/quality-assurance/");
            assert!(page.is_accessible().await);
        }

        #[tokio::test]
        async fn test_inaccessible_when_no_keyword_matches() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            mock.set_title("Insider");
            mock.set_url("https://useinsider.com/about");
            assert!(!page.is_accessible().await);
        }
    }

    mod section_tests {
        use super::*;

        fn insert_all_sections(mock: &MockDriver, page: &CareersPage<'_>) {
            mock.insert(page.locations.clone(), MockElement::labeled("Our Locations"));
            mock.insert(page.teams.clone(), MockElement::labeled("Find your calling"));
            mock.insert(page.life_at_insider.clone(), MockElement::labeled("Life at Insider"));
        }

        #[tokio::test]
        async fn test_all_sections_present() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            insert_all_sections(&mock, &page);
            assert!(page.verify_sections().await);
        }

        #[tokio::test]
        async fn test_short_circuits_on_first_missing_section() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            insert_all_sections(&mock, &page);
            mock.remove(&page.life_at_insider);
            assert!(!page.verify_sections().await);

            mock.remove(&page.locations);
            assert!(!page.verify_sections().await);
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_preferred_path_scrolls_twice_then_clicks_open_positions() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            mock.insert(page.see_all_teams.clone(), MockElement::labeled("See all teams"));
            mock.insert(page.qa_heading.clone(), MockElement::labeled("Quality Assurance"));
            mock.insert(
                page.qa_open_positions.clone(),
                MockElement::labeled("Open Positions"),
            );
            mock.on_click(
                page.qa_open_positions.clone(),
                vec![
                    ClickEffect::SetUrl(
                        "https://useinsider.com/careers/quality-assurance/".to_string(),
                    ),
                    ClickEffect::Insert(
                        page.see_all_qa_jobs.clone(),
                        MockElement::labeled("See all QA jobs"),
                    ),
                ],
            );

            page.go_to_qa_careers().await;

            assert_eq!(mock.scroll_count(&page.see_all_teams), 2);
            assert!(mock.was_clicked(&page.qa_open_positions));
            assert!(mock
                .current_url()
                .await
                .unwrap()
                .contains("quality-assurance"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_fallback_script_clicks_the_heading() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = CareersPage::new(&session, &config);

            mock.insert(page.see_all_teams.clone(), MockElement::labeled("See all teams"));
            mock.insert(page.qa_heading.clone(), MockElement::labeled("Quality Assurance"));
            // no Open Positions link on this layout
            mock.on_click(
                page.qa_heading.clone(),
                vec![ClickEffect::Insert(
                    page.see_all_qa_jobs.clone(),
                    MockElement::labeled("See all QA jobs"),
                )],
            );

            page.go_to_qa_careers().await;
            assert!(mock.was_script_clicked(&page.qa_heading));
        }
    }
}
