//! QA careers page: filtering, listing verification, and the external
//! job-board redirect.

use super::PageObject;
use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::result::CarreraError;
use crate::session::Session;
use crate::wait::Condition;
use std::time::Duration;
use tracing::{info, warn};

/// Department label the filter display must settle on
const QA_DEPARTMENT: &str = "Quality Assurance";

/// Location option selected once the department filter is confirmed
const ISTANBUL_OPTION: &str = "Istanbul, Turkiye";

/// External job board the View Role control must land on
const JOB_BOARD_DOMAIN: &str = "lever.co";

/// Timeout for each department-filter confirmation attempt
const CONFIRM_TEXT_TIMEOUT: Duration = Duration::from_secs(5);

/// QA careers page object.
///
/// Flow state: landed → filtered(QA) → location selected (Istanbul) →
/// listings refreshed → verified. Each transition is gated by a bounded
/// wait; the one deliberate exception is the retry-then-abandon loop in
/// [`Self::select_location_if_department_is_qa`], which can leave the
/// filter unapplied and relies on later gates to surface that.
#[derive(Debug)]
pub struct QaCareersPage<'a> {
    session: &'a Session,
    retry_attempts: u32,
    retry_backoff: Duration,
    pause: Duration,
    /// Rendered department-filter display
    pub department_display: Locator,
    /// Rendered location-filter display
    pub location_display: Locator,
    /// Istanbul option inside the opened location dropdown
    pub location_istanbul: Locator,
    /// Raw location select element
    pub location_dropdown: Locator,
    /// Raw department select element
    pub department_dropdown: Locator,
    /// Per-listing View Role control
    pub view_role: Locator,
    /// "See all QA jobs" control
    pub see_all_qa_jobs: Locator,
    /// One rendered job card
    pub job_card: Locator,
    /// Job cards within the listing container
    pub job_list: Locator,
    /// Bulk text-extraction selector over all cards (one page round trip)
    pub job_card_bulk: Locator,
    /// Any link labeled with "jobs", for the heuristic fallback scan
    pub jobs_links: Locator,
}

impl<'a> QaCareersPage<'a> {
    /// Build the page object against an active session
    #[must_use]
    pub fn new(session: &'a Session, config: &SuiteConfig) -> Self {
        Self {
            session,
            retry_attempts: config.retry_attempts,
            retry_backoff: config.retry_backoff(),
            pause: config.pause(),
            department_display: Locator::id("select2-filter-by-department-container"),
            location_display: Locator::id("select2-filter-by-location-container"),
            location_istanbul: Locator::xpath(format!(
                "//li[contains(@class, 'select2-results__option') and normalize-space(text())='{ISTANBUL_OPTION}']"
            )),
            location_dropdown: Locator::xpath("//select[@id='location']"),
            department_dropdown: Locator::xpath("//select[@id='department']"),
            view_role: Locator::xpath("//a[contains(text(), 'View Role')]"),
            see_all_qa_jobs: Locator::xpath("//a[contains(text(), 'See all QA jobs')]"),
            job_card: Locator::xpath("//div[contains(@class, 'position-list-item')]"),
            job_list: Locator::xpath(
                "//div[@id='jobs-list']//div[contains(@class, 'position-list-item')]",
            ),
            job_card_bulk: Locator::css(".position-list-item"),
            jobs_links: Locator::xpath("//a[contains(text(), 'jobs')]"),
        }
    }

    /// Page-ready wait + View Role presence + URL fragment check
    pub async fn is_accessible(&self) -> bool {
        info!("examining QA careers page elements");
        self.session.document_ready().await;
        self.session.wait_for_element(&self.view_role).await;
        let url = self.session.current_url().await;
        info!(%url, "currently at URL");
        let url = url.to_lowercase();
        url.contains("quality-assurance") || url.contains("qa")
    }

    /// Best-effort value injection into the two filter controls
    pub async fn filter_jobs(&self, location: &str, department: &str) {
        self.session.set_value(&self.location_dropdown, location).await;
        self.session
            .set_value(&self.department_dropdown, department)
            .await;
    }

    /// Confirm the department filter reads "Quality Assurance", then pick
    /// Istanbul from the location dropdown.
    ///
    /// Up to `retry_attempts` confirmation attempts with a fixed backoff.
    /// When every attempt fails the operation abandons silently (logs
    /// only); callers must not assume the location filter was applied,
    /// and the dropdown is guaranteed untouched on that path.
    pub async fn select_location_if_department_is_qa(&self) {
        info!("confirming department filter shows QA");

        for attempt in 1..=self.retry_attempts {
            self.session.scroll_into_view(&self.department_display).await;
            let confirmed = self
                .session
                .wait_for_text_equals(&self.department_display, QA_DEPARTMENT, CONFIRM_TEXT_TIMEOUT)
                .await;

            if confirmed {
                info!("department filter verified, selecting location");
                self.wait_for_job_cards_to_be_replaced().await;
                self.session.click(&self.location_display).await;
                info!("selecting Istanbul from location dropdown");
                self.session.click(&self.location_istanbul).await;
                info!("Istanbul location selected");
                info!("waiting for job listings to update");
                self.session.wait_for_element(&self.job_card).await;
                return;
            }

            warn!(attempt, "department filter not yet set, retrying");
            tokio::time::sleep(self.retry_backoff).await;
        }

        let stale = CarreraError::StaleState {
            message: format!("department filter never read '{QA_DEPARTMENT}'"),
        };
        warn!(%stale, "continuing unfiltered");
    }

    /// Two-phase wait for an asynchronous list refresh: previous cards
    /// vanish (best-effort; a refresh faster than the poll is tolerated),
    /// then the rendered card count must exceed zero. The count check is
    /// the real correctness gate.
    pub async fn wait_for_job_cards_to_be_replaced(&self) {
        info!("monitoring for listing refresh");
        if self
            .session
            .wait_for(&Condition::Invisible(self.job_card.clone()))
            .await
            .is_found()
        {
            info!("previous listings cleared");
        } else {
            warn!("previous listings state unclear, proceeding");
        }

        if self
            .session
            .wait_for(&Condition::CountAbove {
                locator: self.job_card.clone(),
                min: 0,
            })
            .await
            .is_found()
        {
            info!("new listing data rendered");
        }
    }

    /// Presence wait on the job-list container
    pub async fn wait_for_job_cards_to_load(&self, timeout: Duration) -> bool {
        info!("awaiting job listing data");
        let loaded = self
            .session
            .wait_until(&Condition::Present(self.job_list.clone()), timeout)
            .await
            .is_found();
        if loaded {
            info!("job listings data received");
        }
        loaded
    }

    /// True iff at least one card mentions both the QA department and the
    /// Istanbul location. Card texts are pulled in one bulk extraction;
    /// every card's verdict is logged for diagnosis.
    pub async fn verify_job_listings(&self) -> bool {
        info!("scanning listings for QA positions in Istanbul");
        let texts = self.session.all_texts(&self.job_card_bulk).await;

        let mut valid_jobs = 0;
        for (index, text) in texts.iter().enumerate() {
            let listing = index + 1;
            let lower = text.to_lowercase();
            if lower.contains("quality assurance") && lower.contains("istanbul") {
                info!(listing, "listing matches criteria");
                valid_jobs += 1;
            } else {
                info!(listing, "listing does not match criteria");
            }
        }

        info!(matching = valid_jobs, "matching positions found");
        valid_jobs > 0
    }

    /// Click the first View Role control (retried on transient failure)
    /// and verify the resulting page belongs to the external job board.
    /// Switches into a newly opened window when one appears.
    pub async fn verify_view_role_redirects(&self) -> bool {
        info!("locating job details link");
        self.session.wait_for_element(&self.job_card).await;

        let mut clicked = false;
        for attempt in 1..=self.retry_attempts {
            if self.session.count(&self.view_role).await == 0 {
                warn!("job details link not found");
                return false;
            }
            self.session.scroll_into_view(&self.view_role).await;
            tokio::time::sleep(self.pause / 2).await;

            if self.session.click(&self.view_role).await {
                info!("job details link activated");
                clicked = true;
                break;
            }
            warn!(attempt, "job details click unsuccessful");
            tokio::time::sleep(self.pause).await;
        }
        if !clicked {
            warn!("job details link never activated, checking destination anyway");
        }

        if self.session.switch_to_latest_window().await {
            info!(url = %self.session.current_url().await, "switched to job details tab");
        }
        self.session.document_ready().await;
        self.session
            .current_url()
            .await
            .contains(JOB_BOARD_DOMAIN)
    }

    /// Click the "See all QA jobs" control; when the named control is
    /// absent, scan all jobs-labeled links for one mentioning QA/quality
    /// and script-click it (layout-drift fallback).
    pub async fn click_see_all_qa_jobs(&self) {
        info!("searching for the see-all-QA-jobs control");
        if self
            .session
            .wait_for(&Condition::Clickable(self.see_all_qa_jobs.clone()))
            .await
            .is_found()
        {
            info!("see-all-QA-jobs control detected, activating");
            self.session.click(&self.see_all_qa_jobs).await;
            return;
        }

        warn!("primary control not found, searching for alternatives");
        let texts = self.session.all_texts(&self.jobs_links).await;
        for (index, text) in texts.iter().enumerate() {
            let lower = text.to_lowercase();
            if lower.contains("qa") || lower.contains("quality") {
                info!(link = %text, "alternative QA jobs link located");
                self.session.script_click_nth(&self.jobs_links, index).await;
                break;
            }
        }
    }
}

impl PageObject for QaCareersPage<'_> {
    fn page_name(&self) -> &'static str {
        "qa-careers"
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
            WaitPolicy::new().with_timeout(150).with_poll_interval(10),
        )
    }

    fn fast_config() -> SuiteConfig {
        SuiteConfig::default()
            .with_pause(10)
            .with_settle(10)
            .with_retry_backoff(20)
    }

    mod accessibility_tests {
        use super::*;

        #[tokio::test]
        async fn test_accessible_on_qa_url_with_view_role() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.set_url("https://useinsider.com/careers/quality-assurance/");
            mock.insert(page.view_role.clone(), MockElement::labeled("View Role"));
            assert!(page.is_accessible().await);
        }

        #[tokio::test]
        async fn test_inaccessible_on_unrelated_url() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.set_url("https://useinsider.com/about-us/");
            assert!(!page.is_accessible().await);
        }
    }

    mod filter_tests {
        use super::*;
        use crate::mock::MockEvent;

        #[tokio::test]
        async fn test_filter_jobs_injects_both_values() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.insert(page.location_dropdown.clone(), MockElement::labeled(""));
            mock.insert(page.department_dropdown.clone(), MockElement::labeled(""));

            page.filter_jobs("Istanbul", "Quality Assurance").await;
            let journal = mock.journal();
            assert!(journal.contains(&MockEvent::ValueSet(
                page.location_dropdown.clone(),
                "Istanbul".to_string()
            )));
            assert!(journal.contains(&MockEvent::ValueSet(
                page.department_dropdown.clone(),
                "Quality Assurance".to_string()
            )));
        }
    }

    mod location_selection_tests {
        use super::*;

        fn scripted_filter_page(mock: &MockDriver, page: &QaCareersPage<'_>, department: &str) {
            mock.insert(
                page.department_display.clone(),
                MockElement::labeled(department),
            );
            mock.insert(page.location_display.clone(), MockElement::labeled("All"));
            mock.on_click(
                page.location_display.clone(),
                vec![ClickEffect::Insert(
                    page.location_istanbul.clone(),
                    MockElement::labeled("Istanbul, Turkiye"),
                )],
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_selects_istanbul_once_department_is_confirmed() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            scripted_filter_page(&mock, &page, "Quality Assurance");
            mock.insert(
                page.job_card.clone(),
                MockElement::with_instances(["Senior QA Engineer\nIstanbul, Turkiye"]).hidden(),
            );
            mock.on_click(
                page.location_istanbul.clone(),
                vec![ClickEffect::Insert(
                    page.job_card.clone(),
                    MockElement::with_instances(["Senior QA Engineer\nIstanbul, Turkiye"]),
                )],
            );

            page.select_location_if_department_is_qa().await;
            assert!(mock.was_clicked(&page.location_display));
            assert!(mock.was_clicked(&page.location_istanbul));
        }

        #[tokio::test(start_paused = true)]
        async fn test_abandons_silently_after_three_failed_confirmations() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            // display never reads "Quality Assurance"
            scripted_filter_page(&mock, &page, "All");

            page.select_location_if_department_is_qa().await;

            // the dropdown must never have been opened on the abandon path
            assert!(!mock.was_clicked(&page.location_display));
            assert!(!mock.was_clicked(&page.location_istanbul));
        }
    }

    mod listing_tests {
        use super::*;

        #[tokio::test]
        async fn test_listings_pass_with_one_matching_card() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.insert(
                page.job_card_bulk.clone(),
                MockElement::with_instances([
                    "Quality Assurance Engineer\nIstanbul, Turkiye",
                    "Backend Engineer\nRemote",
                ]),
            );
            assert!(page.verify_job_listings().await);
        }

        #[tokio::test]
        async fn test_listings_fail_with_no_matching_card() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.insert(
                page.job_card_bulk.clone(),
                MockElement::with_instances(["Backend Engineer\nRemote"]),
            );
            assert!(!page.verify_job_listings().await);
        }

        #[tokio::test]
        async fn test_listings_fail_with_no_cards_at_all() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            assert!(!page.verify_job_listings().await);
        }

        #[tokio::test]
        async fn test_replacement_wait_tolerates_missed_staleness() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            // cards are already the fresh set: invisibility never observed,
            // count gate passes immediately
            mock.insert(
                page.job_card.clone(),
                MockElement::with_instances(["QA Engineer\nIstanbul"]),
            );
            page.wait_for_job_cards_to_be_replaced().await;
        }
    }

    mod redirect_tests {
        use super::*;

        fn page_with_view_role(mock: &MockDriver, page: &QaCareersPage<'_>, target: &str) {
            mock.set_url("https://useinsider.com/careers/quality-assurance/");
            mock.insert(
                page.job_card.clone(),
                MockElement::with_instances(["QA Engineer\nIstanbul"]),
            );
            mock.insert(page.view_role.clone(), MockElement::labeled("View Role"));
            mock.on_click(
                page.view_role.clone(),
                vec![ClickEffect::OpenWindow(target.to_string())],
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_redirect_to_job_board_passes() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            page_with_view_role(&mock, &page, "https://jobs.lever.co/insider/abc123");
            assert!(page.verify_view_role_redirects().await);
            assert!(mock
                .current_url()
                .await
                .unwrap()
                .contains("jobs.lever.co"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_redirect_elsewhere_fails() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            page_with_view_role(&mock, &page, "https://example.com/job/abc123");
            assert!(!page.verify_view_role_redirects().await);
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_view_role_fails_fast() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.set_url("https://useinsider.com/careers/quality-assurance/");
            mock.insert(
                page.job_card.clone(),
                MockElement::with_instances(["QA Engineer\nIstanbul"]),
            );
            assert!(!page.verify_view_role_redirects().await);
        }
    }

    mod see_all_qa_jobs_tests {
        use super::*;

        #[tokio::test]
        async fn test_named_control_is_preferred() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            mock.insert(
                page.see_all_qa_jobs.clone(),
                MockElement::labeled("See all QA jobs"),
            );
            page.click_see_all_qa_jobs().await;
            assert!(mock.was_clicked(&page.see_all_qa_jobs));
        }

        #[tokio::test]
        async fn test_heuristic_fallback_scans_jobs_links() {
            let mock = MockDriver::new();
            let session = fast_session(&mock);
            let config = fast_config();
            let page = QaCareersPage::new(&session, &config);

            // no named control; second jobs link mentions quality
            mock.insert(
                page.jobs_links.clone(),
                MockElement::with_instances(["All engineering jobs", "All quality assurance jobs"]),
            );
            page.click_see_all_qa_jobs().await;
            assert!(mock.was_script_clicked(&page.jobs_links));
        }
    }
}
