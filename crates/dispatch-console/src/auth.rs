//! Sign-in and vendor registration flows

use crate::error::ConsoleResult;
use crate::session::{Portal, SessionContext};
use dispatch_client::{ApiError, ConsoleApi};
use dispatch_model::{
    Credentials, OtpRequest, OtpVerification, RegistrationDetails, ServiceType, SignupRequest,
};
use tracing::{info, warn};

/// Authenticate and open a session for `portal`
///
/// # Errors
/// Backend failures, or `UnauthorizedRole` when the account may not use
/// the portal.
pub async fn login(
    api: &dyn ConsoleApi,
    portal: Portal,
    credentials: &Credentials,
) -> ConsoleResult<SessionContext> {
    let user = api.login(credentials).await?;
    let role = user.role.clone();
    SessionContext::open(user, portal).map_err(|err| {
        warn!(%role, portal = portal.name(), "role rejected by portal");
        err
    })
}

/// Text a one-time code to `phone`
///
/// # Errors
/// `ValidationRejected` for a short phone, or the backend failure.
pub async fn send_login_code(api: &dyn ConsoleApi, phone: &str) -> ConsoleResult<()> {
    let request = OtpRequest::new(phone).map_err(ApiError::from)?;
    api.send_otp(&request).await?;
    info!("one-time code sent");
    Ok(())
}

/// Everything a vendor enters on the registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRegistration {
    /// Owner name
    pub full_name: String,
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
    /// Phone the code is sent to
    pub phone: String,
    /// Trading name
    pub business_name: String,
    /// Food or logistics
    pub service_type: ServiceType,
    /// City, licences and description
    pub details: RegistrationDetails,
    /// Logo URL, may be empty
    pub logo_url: String,
}

impl VendorRegistration {
    /// Signup payload with the extra details packed into `description`
    #[must_use]
    pub fn to_request(&self) -> SignupRequest {
        SignupRequest::vendor(
            self.full_name.clone(),
            self.email.clone(),
            self.password.clone(),
            self.phone.clone(),
            self.business_name.clone(),
            self.service_type,
            &self.details,
            self.logo_url.clone(),
        )
    }
}

/// First step: check the form and send a code to the vendor's phone
///
/// # Errors
/// `ValidationRejected` for missing fields, or the backend failure.
pub async fn start_signup(api: &dyn ConsoleApi, registration: &VendorRegistration) -> ConsoleResult<()> {
    registration.to_request().validate().map_err(ApiError::from)?;
    send_login_code(api, &registration.phone).await
}

/// Second step: verify the code, then create the account
///
/// # Errors
/// `ValidationRejected` for a malformed code, or the backend failure. The
/// account is not created when verification fails.
pub async fn complete_signup(
    api: &dyn ConsoleApi,
    registration: &VendorRegistration,
    otp: &str,
) -> ConsoleResult<()> {
    let verification = OtpVerification::new(registration.phone.clone(), otp).map_err(ApiError::from)?;
    api.verify_otp(&verification).await?;
    api.signup(&registration.to_request()).await?;
    info!(business = %registration.business_name, "vendor registered");
    Ok(())
}
