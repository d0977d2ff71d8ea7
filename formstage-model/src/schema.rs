use crate::field::{FieldSpec, RoutingNumberRule};

/// Api names of the bank-details form on the `Account` object.
pub mod bank_fields {
    pub const OBJECT_TYPE: &str = "Account";

    pub const REGISTRATION_NUMBER: &str = "Registration_No_Of_Company__c";
    pub const BANK_NAME: &str = "Bank_Name__c";
    pub const BANK_COUNTRY: &str = "Bank_Country__c";
    pub const BANK_ADDRESS: &str = "Bank_Address__c";
    pub const ROUTING_NUMBER: &str = "Routing_Number__c";
    pub const ACCOUNT_NUMBER: &str = "AccountNumber";
    pub const SWIFT_CODE: &str = "Swift_Code__c";
    pub const IBAN: &str = "Iban__c";
    pub const CURRENCY: &str = "Currency__c";
}

/// Ordered field table for one record type, plus the attachment requirement.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub object_type: String,
    pub fields: Vec<FieldSpec>,
    /// Minimum number of attachments (staged + existing − pending deletion)
    /// for the form to be saveable.
    pub min_files: usize,
}

impl FormSchema {
    /// An empty schema requiring one attachment.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            fields: Vec::new(),
            min_files: 1,
        }
    }

    /// Appends a field. A later spec with the same api name replaces the earlier one.
    #[must_use]
    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.api_name == spec.api_name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    #[must_use]
    pub fn with_min_files(mut self, min_files: usize) -> Self {
        self.min_files = min_files;
        self
    }

    /// Looks up a field by api name.
    pub fn field(&self, api_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.api_name == api_name)
    }

    pub fn contains(&self, api_name: &str) -> bool {
        self.field(api_name).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn api_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.api_name.as_str())
    }

    /// The bank-details form: registration number, bank name/country/address,
    /// routing number, account number, SWIFT, IBAN and currency.
    pub fn bank_details() -> Self {
        use bank_fields::*;

        Self::new(OBJECT_TYPE)
            .with_field(FieldSpec::optional(REGISTRATION_NUMBER))
            .with_field(FieldSpec::required(BANK_NAME))
            .with_field(FieldSpec::required(BANK_COUNTRY))
            .with_field(FieldSpec::optional(BANK_ADDRESS))
            .with_field(FieldSpec::optional(ROUTING_NUMBER).with_rule(RoutingNumberRule))
            .with_field(FieldSpec::required(ACCOUNT_NUMBER))
            .with_field(FieldSpec::required(SWIFT_CODE))
            .with_field(FieldSpec::required(IBAN))
            .with_field(FieldSpec::required(CURRENCY))
    }
}
