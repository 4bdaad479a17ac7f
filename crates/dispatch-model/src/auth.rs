//! Auth request and reply payloads

use crate::session::{Role, ServiceType, SessionUser};
use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Minimum phone length accepted before an OTP is requested
const MIN_PHONE_LEN: usize = 10;

/// Length of a one-time password
const OTP_LEN: usize = 6;

/// Login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    /// Email and password, sent to `/auth/login`
    Password {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Phone and one-time code, sent to `/auth/login-otp`
    Otp {
        /// Account phone
        phone: String,
        /// Six digit code
        otp: String,
    },
}

impl Credentials {
    /// Endpoint the credentials are posted to
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Password { .. } => "/auth/login",
            Self::Otp { .. } => "/auth/login-otp",
        }
    }

    /// Check required fields
    ///
    /// # Errors
    /// `ModelError` naming the first empty or malformed field.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Password { email, password } => {
                require("email", email)?;
                require("password", password)
            }
            Self::Otp { phone, otp } => {
                check_phone(phone)?;
                check_otp(otp)
            }
        }
    }
}

/// Body of `POST /auth/send-otp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRequest {
    /// Phone to text the code to
    pub phone: String,
}

impl OtpRequest {
    /// Build and validate an OTP request
    ///
    /// # Errors
    /// `ModelError::InvalidField` when the phone is shorter than ten characters.
    pub fn new(phone: impl Into<String>) -> Result<Self, ModelError> {
        let phone = phone.into();
        check_phone(&phone)?;
        Ok(Self { phone })
    }
}

/// Body of `POST /auth/verify-otp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerification {
    /// Phone the code was sent to
    pub phone: String,
    /// Code entered by the user
    pub otp: String,
}

impl OtpVerification {
    /// Build and validate a verification request
    ///
    /// # Errors
    /// `ModelError` for a short phone or a code that is not six digits.
    pub fn new(phone: impl Into<String>, otp: impl Into<String>) -> Result<Self, ModelError> {
        let (phone, otp) = (phone.into(), otp.into());
        check_phone(&phone)?;
        check_otp(&otp)?;
        Ok(Self { phone, otp })
    }
}

/// Registration fields the backend schema has no columns for
///
/// They travel packed into `description` as a small JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDetails {
    /// Free-text business description
    #[serde(rename = "desc")]
    pub description: String,
    /// Operating city
    pub city: String,
    /// Food-safety licence number
    #[serde(rename = "fssai")]
    pub fssai_license: String,
    /// Tax registration number
    #[serde(rename = "gst")]
    pub gst_number: String,
}

impl RegistrationDetails {
    /// Pack into the string stored in `description`
    #[must_use]
    pub fn pack(&self) -> String {
        // Plain strings only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Recover details from a packed `description`, if it is one
    #[must_use]
    pub fn unpack(description: &str) -> Option<Self> {
        serde_json::from_str(description).ok()
    }
}

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Owner name
    pub full_name: String,
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
    /// Verified phone
    pub phone_number: String,
    /// Trading name
    pub business_name: String,
    /// Packed [`RegistrationDetails`]
    pub description: String,
    /// Operating city
    pub city: String,
    /// Food-safety licence number
    pub fssai_license: String,
    /// Tax registration number
    pub gst_number: String,
    /// Logo URL
    pub logo_url: String,
    /// Always `vendor_admin` for console signups
    pub role: Role,
    /// Food or logistics
    pub service_type: ServiceType,
}

impl SignupRequest {
    /// Build a vendor-admin signup with extra details packed into `description`
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn vendor(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        phone_number: impl Into<String>,
        business_name: impl Into<String>,
        service_type: ServiceType,
        details: &RegistrationDetails,
        logo_url: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            phone_number: phone_number.into(),
            business_name: business_name.into(),
            description: details.pack(),
            city: details.city.clone(),
            fssai_license: details.fssai_license.clone(),
            gst_number: details.gst_number.clone(),
            logo_url: logo_url.into(),
            role: Role::VendorAdmin,
            service_type,
        }
    }

    /// Check required fields
    ///
    /// # Errors
    /// `ModelError` naming the first empty or malformed field.
    pub fn validate(&self) -> Result<(), ModelError> {
        require("full_name", &self.full_name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("business_name", &self.business_name)?;
        check_phone(&self.phone_number)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UserHolder {
    #[serde(default)]
    user: Option<SessionUser>,
}

/// Reply of the login and signup endpoints
///
/// The user shows up either at the top level or inside `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthReply {
    /// Envelope flag, when the endpoint sends one
    #[serde(default)]
    pub status: Option<crate::EnvelopeStatus>,
    #[serde(default)]
    user: Option<SessionUser>,
    #[serde(default)]
    data: Option<UserHolder>,
    /// Failure message
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthReply {
    /// The authenticated user, wherever the backend put it
    #[must_use]
    pub fn into_user(self) -> Option<SessionUser> {
        self.user.or_else(|| self.data.and_then(|d| d.user))
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        Err(ModelError::MissingField(field))
    } else {
        Ok(())
    }
}

fn check_phone(phone: &str) -> Result<(), ModelError> {
    require("phone", phone)?;
    if phone.trim().chars().count() < MIN_PHONE_LEN {
        return Err(ModelError::InvalidField {
            field: "phone",
            reason: format!("must be at least {MIN_PHONE_LEN} characters"),
        });
    }
    Ok(())
}

fn check_otp(otp: &str) -> Result<(), ModelError> {
    if otp.len() != OTP_LEN || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::InvalidField {
            field: "otp",
            reason: format!("must be {OTP_LEN} digits"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn credentials_pick_their_endpoint() {
        let pw = Credentials::Password {
            email: "apollo@tacos.com".into(),
            password: "password".into(),
        };
        let otp = Credentials::Otp {
            phone: "9876543210".into(),
            otp: "123456".into(),
        };

        assert_eq!(pw.endpoint(), "/auth/login");
        assert_eq!(otp.endpoint(), "/auth/login-otp");
        assert_eq!(
            serde_json::to_value(&otp).unwrap(),
            serde_json::json!({"phone": "9876543210", "otp": "123456"})
        );
    }

    #[test]
    fn short_phone_and_bad_otp_are_rejected() {
        assert!(OtpRequest::new("12345").is_err());
        assert!(OtpVerification::new("9876543210", "12a456").is_err());
        assert!(OtpVerification::new("9876543210", "123456").is_ok());
    }

    #[test]
    fn registration_details_pack_round_trip() {
        let details = RegistrationDetails {
            description: "Street tacos".into(),
            city: "Chennai".into(),
            fssai_license: "FS-1".into(),
            gst_number: "GST-9".into(),
        };

        let packed = details.pack();
        assert!(packed.contains("\"fssai\":\"FS-1\""));
        assert_eq!(RegistrationDetails::unpack(&packed), Some(details));
        assert_eq!(RegistrationDetails::unpack("plain text"), None);
    }

    #[test]
    fn auth_reply_finds_user_at_top_or_in_data() {
        let top: AuthReply =
            serde_json::from_str(r#"{"user":{"id":"u-1","role":"super_admin"}}"#).unwrap();
        let nested: AuthReply = serde_json::from_str(
            r#"{"status":"success","data":{"user":{"id":"u-2","role":"vendor_admin"}}}"#,
        )
        .unwrap();
        let failed: AuthReply =
            serde_json::from_str(r#"{"error":"Invalid credentials"}"#).unwrap();

        assert_eq!(top.into_user().unwrap().role, Role::SuperAdmin);
        assert_eq!(nested.into_user().unwrap().role, Role::VendorAdmin);
        assert!(failed.into_user().is_none());
    }
}
