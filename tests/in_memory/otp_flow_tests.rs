//! One-time-code flow integration tests.

use luach::auth::{
    adapters::memory::{InMemoryOtpRepository, RecordingMailer},
    services::{OtpAuthError, OtpService},
};
use luach::board::domain::EmailAddress;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

type TestService = OtpService<InMemoryOtpRepository, RecordingMailer, DefaultClock>;

struct OtpFixture {
    service: TestService,
    mailer: Arc<RecordingMailer>,
}

#[fixture]
fn otp() -> OtpFixture {
    let mailer = Arc::new(RecordingMailer::new());
    let service = OtpService::new(
        Arc::new(InMemoryOtpRepository::new()),
        Arc::clone(&mailer),
        Arc::new(DefaultClock),
    );
    OtpFixture { service, mailer }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn the_mailed_code_verifies_exactly_once(otp: OtpFixture) -> Result<(), eyre::Report> {
    let email = EmailAddress::new("noa@example.com")?;

    otp.service.request_code(email.clone()).await?;

    // the user types the digits they received by mail
    let sent = otp.mailer.sent();
    let digits = sent
        .first()
        .map(|(_, digits)| digits.clone())
        .ok_or_else(|| eyre::eyre!("expected one mailed code"))?;

    otp.service.verify(&email, digits.as_str()).await?;
    eyre::ensure!(
        matches!(
            otp.service.verify(&email, digits.as_str()).await,
            Err(OtpAuthError::InvalidOrExpired)
        ),
        "replayed code should be rejected"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_codes_fail_with_the_single_public_error(otp: OtpFixture) {
    let email = EmailAddress::new("noa@example.com").expect("valid address");

    let result = otp.service.verify(&email, "000000").await;

    let error = result.expect_err("no code was issued");
    assert_eq!(error.to_string(), "Invalid or expired code");
}
