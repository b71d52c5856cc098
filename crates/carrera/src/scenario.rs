//! Scenario orchestration: the full career-search journey.
//!
//! A single ordered script composing page-object calls, with assertion
//! gates between steps. Gates are the only fatal boundary in the suite:
//! a failed gate aborts the remaining journey immediately (Andon Cord),
//! and the runner turns the failure into a recorded outcome plus a
//! screenshot.

use crate::config::SuiteConfig;
use crate::pages::{CareersPage, HomePage, QaCareersPage};
use crate::result::{CarreraError, CarreraResult};
use crate::session::Session;
use tracing::info;

/// Named steps of the journey, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyStep {
    /// Open the home page
    OpenHome,
    /// Home accessibility gate
    HomeAccessible,
    /// Consent banner dismissal
    AcceptCookies,
    /// Menu navigation into careers
    NavigateToCareers,
    /// Careers accessibility gate
    CareersAccessible,
    /// Careers section-structure gate
    VerifySections,
    /// Team navigation into QA careers
    GoToQaCareers,
    /// QA careers accessibility gate
    QaCareersAccessible,
    /// Expand the full QA job list
    SeeAllQaJobs,
    /// Istanbul selection under a confirmed QA filter
    SelectLocation,
    /// Listing-refresh wait
    AwaitListingRefresh,
    /// Listing-load wait
    AwaitListings,
    /// Listing-content gate
    VerifyListings,
    /// External-redirect gate
    VerifyRedirect,
}

impl JourneyStep {
    /// Step name as recorded in failures
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenHome => "open home page",
            Self::HomeAccessible => "home page accessibility",
            Self::AcceptCookies => "cookie consent",
            Self::NavigateToCareers => "navigate to careers",
            Self::CareersAccessible => "careers page accessibility",
            Self::VerifySections => "careers page sections",
            Self::GoToQaCareers => "navigate to QA careers",
            Self::QaCareersAccessible => "QA careers accessibility",
            Self::SeeAllQaJobs => "see all QA jobs",
            Self::SelectLocation => "select Istanbul location",
            Self::AwaitListingRefresh => "await listing refresh",
            Self::AwaitListings => "await listings",
            Self::VerifyListings => "verify job listings",
            Self::VerifyRedirect => "verify job detail redirect",
        }
    }
}

impl std::fmt::Display for JourneyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The end-to-end journey: home → careers → QA careers → filtered
/// listings → external job detail.
#[derive(Debug)]
pub struct CareerJourney<'a> {
    session: &'a Session,
    config: &'a SuiteConfig,
}

impl<'a> CareerJourney<'a> {
    /// Bind the journey to a session and configuration
    #[must_use]
    pub const fn new(session: &'a Session, config: &'a SuiteConfig) -> Self {
        Self { session, config }
    }

    fn gate(step: JourneyStep, held: bool, reason: &str) -> CarreraResult<()> {
        if held {
            Ok(())
        } else {
            Err(CarreraError::StepFailed {
                step: step.as_str().to_string(),
                reason: reason.to_string(),
            })
        }
    }

    /// Run every step in order. The first failed gate aborts the rest.
    pub async fn run(&self) -> CarreraResult<()> {
        info!(step = %JourneyStep::OpenHome, "starting journey");
        let home = HomePage::new(self.session, self.config);
        home.open().await;
        Self::gate(
            JourneyStep::HomeAccessible,
            home.is_accessible().await,
            "unable to access the home page",
        )?;

        info!(step = %JourneyStep::AcceptCookies, "handling consent");
        home.accept_cookies().await;

        info!(step = %JourneyStep::NavigateToCareers, "proceeding to careers");
        home.navigate_to_careers().await;
        let careers = CareersPage::new(self.session, self.config);
        Self::gate(
            JourneyStep::CareersAccessible,
            careers.is_accessible().await,
            "cannot access the careers portal",
        )?;

        info!(step = %JourneyStep::VerifySections, "validating careers page structure");
        Self::gate(
            JourneyStep::VerifySections,
            careers.verify_sections().await,
            "required content sections missing",
        )?;

        info!(step = %JourneyStep::GoToQaCareers, "navigating to QA positions");
        careers.go_to_qa_careers().await;
        let qa = QaCareersPage::new(self.session, self.config);
        Self::gate(
            JourneyStep::QaCareersAccessible,
            qa.is_accessible().await,
            "QA careers section inaccessible",
        )?;

        info!(step = %JourneyStep::SeeAllQaJobs, "expanding to all QA positions");
        qa.click_see_all_qa_jobs().await;

        info!(step = %JourneyStep::SelectLocation, "filtering for Istanbul");
        qa.select_location_if_department_is_qa().await;

        info!(step = %JourneyStep::AwaitListingRefresh, "awaiting refreshed listings");
        qa.wait_for_job_cards_to_be_replaced().await;

        info!(step = %JourneyStep::AwaitListings, "awaiting listing data");
        qa.wait_for_job_cards_to_load(self.config.default_timeout())
            .await;

        info!(step = %JourneyStep::VerifyListings, "analyzing listings");
        Self::gate(
            JourneyStep::VerifyListings,
            qa.verify_job_listings().await,
            "no matching QA positions found in Istanbul",
        )?;

        info!(step = %JourneyStep::VerifyRedirect, "testing job detail link");
        Self::gate(
            JourneyStep::VerifyRedirect,
            qa.verify_view_role_redirects().await,
            "job detail link redirection failed",
        )?;

        info!(
            final_url = %self.session.current_url().await,
            "journey completed successfully"
        );
        Ok(())
    }
}
