//! Carrera: page-object E2E suite for a career-search journey.
//!
//! Drives a real browser through a recruiting site's career flow
//! (home → careers → QA careers → job filtering → job-detail redirect)
//! and records pass/fail outcomes to a result sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     CARRERA Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌────────────┐            │
//! │   │ Scenario   │───►│ Page        │───►│ Session    │            │
//! │   │ (gates)    │    │ Objects     │    │ (waits)    │            │
//! │   └────────────┘    └─────────────┘    └─────┬──────┘            │
//! │        │                                     ▼                   │
//! │   ┌────────────┐                       ┌────────────┐            │
//! │   │ Runner     │                       │ Driver     │            │
//! │   │ + Sink     │                       │ (CDP/mock) │            │
//! │   └────────────┘                       └────────────┘            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The wait/retry discipline lives in [`session::Session`]: every
//! interaction primitive is bounded, best-effort, and non-throwing, so
//! asynchronous page rendering degrades to logged falsy results instead
//! of exceptions. Scenario gates in [`scenario::CareerJourney`] are the
//! only fatal boundary.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod config;
pub mod driver;
pub mod locator;
pub mod mock;
pub mod pages;
pub mod report;
pub mod result;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod wait;

pub use config::{BrowserEngine, DbConfig, SuiteConfig};
pub use driver::Driver;
#[cfg(feature = "browser")]
pub use driver::CdpDriver;
pub use locator::{Locator, Selector};
pub use mock::{ClickEffect, MockDriver, MockElement, MockEvent};
pub use pages::{CareersPage, HomePage, PageObject, QaCareersPage};
pub use report::{LogSink, MySqlContainerSink, ResultSink, TestOutcome, TestStatus};
pub use result::{CarreraError, CarreraResult};
pub use runner::{init_tracing, Runner};
pub use scenario::{CareerJourney, JourneyStep};
pub use session::Session;
pub use wait::{Condition, WaitOutcome, WaitPolicy};
