use std::{collections::BTreeMap, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::macros::nutype_string;

/// The contact form as typed by the user.
///
/// Values are kept verbatim; [`ContactFormInput::validate`] turns a complete
/// form into a [`ContactSubmission`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub legal_service: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    LegalService,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::LegalService,
        Self::Message,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::LegalService => "legalService",
            Self::Message => "message",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Self::Phone)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl ContactFormInput {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::LegalService => &self.legal_service,
            ContactField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: ContactField, value: String) {
        let slot = match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::LegalService => &mut self.legal_service,
            ContactField::Message => &mut self.message,
        };
        *slot = value;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Checks every field independently and returns the errors of all
    /// fields that fail their rule. An empty result means the form is valid.
    pub fn field_errors(&self) -> FieldErrors {
        self.validate().err().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        let first_name = errors.collect(
            ContactField::FirstName,
            required(&self.first_name).and_then(parse_name),
        );
        let last_name = errors.collect(
            ContactField::LastName,
            required(&self.last_name).and_then(parse_name),
        );
        let email = errors.collect(
            ContactField::Email,
            required(&self.email)
                .and_then(|email| EmailAddress::try_new(email).map_err(|_| FieldError::InvalidEmail)),
        );
        let phone = errors.collect(ContactField::Phone, parse_phone(&self.phone));
        let legal_service = errors.collect(
            ContactField::LegalService,
            required(&self.legal_service).and_then(|service| {
                service
                    .parse::<LegalService>()
                    .map_err(|_| FieldError::UnknownLegalService)
            }),
        );
        let message = errors.collect(
            ContactField::Message,
            required(&self.message).and_then(|message| {
                ContactMessageContent::try_new(message).map_err(|_| FieldError::MessageTooLong)
            }),
        );

        match (first_name, last_name, email, phone, legal_service, message) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(phone),
                Some(legal_service),
                Some(message),
            ) if errors.is_empty() => Ok(ContactSubmission {
                first_name,
                last_name,
                email,
                phone,
                legal_service,
                message,
            }),
            _ => Err(errors),
        }
    }
}

fn required(value: &str) -> Result<&str, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(value)
    }
}

fn parse_name(name: &str) -> Result<ContactName, FieldError> {
    ContactName::try_new(name).map_err(|_| FieldError::NameTooLong)
}

fn parse_phone(phone: &str) -> Result<Option<PhoneNumber>, FieldError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(None);
    }
    PhoneNumber::try_new(phone)
        .map(Some)
        .map_err(|_| FieldError::InvalidPhone)
}

/// Validation failures of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    Required,
    NameTooLong,
    InvalidEmail,
    InvalidPhone,
    UnknownLegalService,
    MessageTooLong,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            Self::Required => "This field is required",
            Self::NameTooLong => "Name is too long",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::InvalidPhone => "Please enter a valid phone number",
            Self::UnknownLegalService => "Please select a valid legal service",
            Self::MessageTooLong => "Message must be at most 1000 characters",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message().fmt(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<ContactField, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: ContactField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: ContactField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: ContactField, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: ContactField) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = ContactField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, FieldError)> + '_ {
        self.0.iter().map(|(&field, &error)| (field, error))
    }

    fn collect<T>(&mut self, field: ContactField, result: Result<T, FieldError>) -> Option<T> {
        result.inspect_err(|&err| self.insert(field, err)).ok()
    }
}

impl FromIterator<(ContactField, FieldError)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (ContactField, FieldError)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A contact form that passed validation. Only values of this type can be
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub first_name: ContactName,
    pub last_name: ContactName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub legal_service: LegalService,
    pub message: ContactMessageContent,
}

impl ContactSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", *self.first_name, *self.last_name)
    }
}

nutype_string!(ContactName(
    sanitize(trim),
    validate(not_empty, len_char_max = 256)
));

nutype_string!(ContactMessageContent(
    sanitize(trim),
    validate(not_empty, len_char_max = 1000)
));

nutype_string!(EmailAddress(sanitize(trim), validate(regex = EMAIL_REGEX)));

nutype_string!(PhoneNumber(sanitize(trim), validate(regex = PHONE_REGEX)));

pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalService {
    #[serde(rename = "Civil and Criminal Litigation")]
    CivilAndCriminalLitigation,
    #[serde(rename = "Alternative Dispute Resolution")]
    AlternativeDisputeResolution,
    #[serde(rename = "Commercial and Corporate Law")]
    CommercialAndCorporateLaw,
    #[serde(rename = "Bank Securities and Real Estate")]
    BankSecuritiesAndRealEstate,
    #[serde(rename = "Employment Law")]
    EmploymentLaw,
    #[serde(rename = "Family Law")]
    FamilyLaw,
    #[serde(rename = "Energy Law")]
    EnergyLaw,
    #[serde(rename = "Construction Law")]
    ConstructionLaw,
    #[serde(rename = "Health and Medical Law")]
    HealthAndMedicalLaw,
    #[serde(rename = "Finance and Banking Law")]
    FinanceAndBankingLaw,
    #[serde(rename = "Insurance and Personal Injury")]
    InsuranceAndPersonalInjury,
    #[serde(rename = "Agricultural Law")]
    AgriculturalLaw,
    #[serde(rename = "Legal Consultancy")]
    LegalConsultancy,
    Other,
}

impl LegalService {
    pub const ALL: [Self; 14] = [
        Self::CivilAndCriminalLitigation,
        Self::AlternativeDisputeResolution,
        Self::CommercialAndCorporateLaw,
        Self::BankSecuritiesAndRealEstate,
        Self::EmploymentLaw,
        Self::FamilyLaw,
        Self::EnergyLaw,
        Self::ConstructionLaw,
        Self::HealthAndMedicalLaw,
        Self::FinanceAndBankingLaw,
        Self::InsuranceAndPersonalInjury,
        Self::AgriculturalLaw,
        Self::LegalConsultancy,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CivilAndCriminalLitigation => "Civil and Criminal Litigation",
            Self::AlternativeDisputeResolution => "Alternative Dispute Resolution",
            Self::CommercialAndCorporateLaw => "Commercial and Corporate Law",
            Self::BankSecuritiesAndRealEstate => "Bank Securities and Real Estate",
            Self::EmploymentLaw => "Employment Law",
            Self::FamilyLaw => "Family Law",
            Self::EnergyLaw => "Energy Law",
            Self::ConstructionLaw => "Construction Law",
            Self::HealthAndMedicalLaw => "Health and Medical Law",
            Self::FinanceAndBankingLaw => "Finance and Banking Law",
            Self::InsuranceAndPersonalInjury => "Insurance and Personal Injury",
            Self::AgriculturalLaw => "Agricultural Law",
            Self::LegalConsultancy => "Legal Consultancy",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LegalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label().fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownLegalService;

impl FromStr for LegalService {
    type Err = UnknownLegalService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|service| service.label() == s)
            .ok_or(UnknownLegalService)
    }
}

nutype_string!(CrmItemId(validate(not_empty)));

/// Outcome of a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The CRM created a record for the submission.
    Success { item_id: CrmItemId },
    /// The CRM rejected the submission. `mailto` is a pre-filled email draft
    /// addressed to the firm which the user can send instead.
    EmailFallback { mailto: String, reason: String },
    ValidationError { field_errors: FieldErrors },
    /// The CRM could not be reached, even after retrying.
    NetworkError { retries_left: u32 },
}
