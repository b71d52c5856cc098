//! End-to-end journey tests against a scripted site model.
//!
//! The full scenario runs here exactly as it would against the live
//! site, with the mock driver standing in for the browser: every click,
//! scroll, and wait goes through the same session primitives.

use carrera::{
    CareerJourney, CareersPage, ClickEffect, HomePage, MockDriver, MockElement, QaCareersPage,
    Session, SuiteConfig, WaitPolicy,
};

const BASE: &str = "https://useinsider.com";
const CAREERS_URL: &str = "https://useinsider.com/careers/";
const QA_URL: &str = "https://useinsider.com/careers/quality-assurance/";
const LEVER_URL: &str = "https://jobs.lever.co/insider/abc123";

fn fast_config() -> SuiteConfig {
    SuiteConfig::default()
        .with_pause(5)
        .with_settle(5)
        .with_retry_backoff(10)
        .with_retry_attempts(1)
}

fn fast_session(mock: &MockDriver) -> Session {
    Session::new(
        Box::new(mock.clone()),
        WaitPolicy::new().with_timeout(150).with_poll_interval(10),
    )
}

/// Script the whole happy-path site into the mock: home page with consent
/// banner and company menu, careers page with all three sections, the
/// teams overview, and a QA listing page whose View Role control opens
/// the external job board.
fn script_happy_site(mock: &MockDriver, session: &Session, config: &SuiteConfig) {
    let home = HomePage::new(session, config);
    let careers = CareersPage::new(session, config);
    let qa = QaCareersPage::new(session, config);

    // home
    mock.title_for(BASE, "#1 AI-native Omnichannel Experience — Insider");
    mock.insert(home.cookie_button.clone(), MockElement::labeled("Accept All"));
    mock.insert(home.company_menu.clone(), MockElement::labeled("Company"));
    mock.insert(home.careers_link.clone(), MockElement::labeled("Careers"));
    mock.on_click(
        home.careers_link.clone(),
        vec![
            ClickEffect::SetUrl(CAREERS_URL.to_string()),
            ClickEffect::SetTitle("Insider Careers".to_string()),
            ClickEffect::Insert(careers.locations.clone(), MockElement::labeled("Our Locations")),
            ClickEffect::Insert(careers.teams.clone(), MockElement::labeled("Find your calling")),
            ClickEffect::Insert(
                careers.life_at_insider.clone(),
                MockElement::labeled("Life at Insider"),
            ),
            ClickEffect::Insert(
                careers.see_all_teams.clone(),
                MockElement::labeled("See all teams"),
            ),
            ClickEffect::Insert(
                careers.qa_heading.clone(),
                MockElement::labeled("Quality Assurance"),
            ),
            ClickEffect::Insert(
                careers.qa_open_positions.clone(),
                MockElement::labeled("Open Positions"),
            ),
        ],
    );

    // careers → QA landing
    mock.on_click(
        careers.qa_open_positions.clone(),
        vec![
            ClickEffect::SetUrl(QA_URL.to_string()),
            ClickEffect::SetTitle("Quality Assurance — Insider Careers".to_string()),
            ClickEffect::Insert(
                careers.see_all_qa_jobs.clone(),
                MockElement::labeled("See all QA jobs"),
            ),
            ClickEffect::Insert(qa.view_role.clone(), MockElement::labeled("View Role")),
            ClickEffect::Insert(
                qa.department_display.clone(),
                MockElement::labeled("Quality Assurance"),
            ),
            ClickEffect::Insert(qa.location_display.clone(), MockElement::labeled("All")),
        ],
    );

    // QA landing → full listing with unfiltered cards
    mock.on_click(
        qa.see_all_qa_jobs.clone(),
        vec![ClickEffect::Insert(
            qa.job_card.clone(),
            MockElement::with_instances(["Quality Assurance Engineer\nAnkara, Turkiye"]),
        )],
    );

    // opening the location filter reveals the Istanbul option
    mock.on_click(
        qa.location_display.clone(),
        vec![ClickEffect::Insert(
            qa.location_istanbul.clone(),
            MockElement::labeled("Istanbul, Turkiye"),
        )],
    );

    // selecting Istanbul swaps the listing for the filtered set
    mock.on_click(
        qa.location_istanbul.clone(),
        vec![
            ClickEffect::Insert(
                qa.job_card.clone(),
                MockElement::with_instances([
                    "Software Quality Assurance Engineer\nIstanbul, Turkiye",
                    "Senior Quality Assurance Engineer\nIstanbul, Turkiye",
                ]),
            ),
            ClickEffect::Insert(
                qa.job_list.clone(),
                MockElement::with_instances([
                    "Software Quality Assurance Engineer\nIstanbul, Turkiye",
                    "Senior Quality Assurance Engineer\nIstanbul, Turkiye",
                ]),
            ),
            ClickEffect::Insert(
                qa.job_card_bulk.clone(),
                MockElement::with_instances([
                    "Software Quality Assurance Engineer\nIstanbul, Turkiye\nQuality Assurance\nView Role",
                    "Senior Quality Assurance Engineer\nIstanbul, Turkiye\nQuality Assurance\nView Role",
                ]),
            ),
        ],
    );

    // View Role opens the job board in a new tab
    mock.on_click(
        qa.view_role.clone(),
        vec![ClickEffect::OpenWindow(LEVER_URL.to_string())],
    );
}

#[tokio::test]
async fn full_journey_passes_against_scripted_site() {
    let mock = MockDriver::new();
    let session = fast_session(&mock);
    let config = fast_config();
    script_happy_site(&mock, &session, &config);

    let journey = CareerJourney::new(&session, &config);
    journey.run().await.expect("journey should pass");

    // the journey ends on the external job board, in the new tab
    assert_eq!(session.current_url().await, LEVER_URL);
}

#[tokio::test]
async fn journey_fails_at_home_gate_on_blank_site() {
    let mock = MockDriver::new();
    let session = fast_session(&mock);
    let config = fast_config();

    let err = CareerJourney::new(&session, &config)
        .run()
        .await
        .expect_err("blank site cannot pass the home gate");
    assert!(err.to_string().contains("home page accessibility"));
}

#[tokio::test]
async fn journey_fails_at_listing_gate_without_matching_jobs() {
    let mock = MockDriver::new();
    let session = fast_session(&mock);
    let config = fast_config();
    script_happy_site(&mock, &session, &config);

    // Istanbul selection leaves only non-matching listings behind
    let qa = QaCareersPage::new(&session, &config);
    mock.on_click(
        qa.location_istanbul.clone(),
        vec![
            ClickEffect::Insert(
                qa.job_card.clone(),
                MockElement::with_instances(["Backend Engineer\nRemote"]),
            ),
            ClickEffect::Insert(
                qa.job_list.clone(),
                MockElement::with_instances(["Backend Engineer\nRemote"]),
            ),
            ClickEffect::Insert(
                qa.job_card_bulk.clone(),
                MockElement::with_instances(["Backend Engineer\nRemote"]),
            ),
        ],
    );

    let err = CareerJourney::new(&session, &config)
        .run()
        .await
        .expect_err("non-matching listings cannot pass the listing gate");
    assert!(err.to_string().contains("verify job listings"));
}

#[tokio::test]
async fn journey_survives_obscured_careers_link() {
    let mock = MockDriver::new();
    let session = fast_session(&mock);
    let config = fast_config();
    script_happy_site(&mock, &session, &config);

    // an overlay intercepts the native click; the script fallback lands
    // and still triggers the navigation effects
    let home = HomePage::new(&session, &config);
    mock.insert(
        home.careers_link.clone(),
        MockElement::labeled("Careers").obscured(),
    );

    CareerJourney::new(&session, &config)
        .run()
        .await
        .expect("script-click fallback should keep the journey alive");
}

#[cfg(feature = "browser")]
mod live {
    use super::*;
    use carrera::{BrowserEngine, MySqlContainerSink, Runner};

    /// Full journey against the live site in a real browser. Requires a
    /// local Chromium, network access, and (for recording) the results
    /// container.
    #[tokio::test(flavor = "multi_thread")]
    #[ignore = "requires chromium, network access, and the mysql-qa container"]
    async fn career_journey_in_real_browsers() {
        carrera::init_tracing();
        let config = SuiteConfig::default();
        let sink = MySqlContainerSink::new(config.db.clone());
        let runner = Runner::new(config).with_sink(Box::new(sink));

        let outcomes = runner
            .run_all(&[BrowserEngine::Chrome, BrowserEngine::Firefox])
            .await;
        assert!(outcomes.iter().all(|outcome| outcome.status.is_passed()));
    }
}
