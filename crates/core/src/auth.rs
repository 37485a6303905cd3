use crate::ValidationErrors;
use frontdesk_types::NonEmptyText;
use serde::Serialize;

/// Login credentials: customer code, user name and password, all required.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    customer_code: NonEmptyText,
    username: NonEmptyText,
    password: NonEmptyText,
}

impl Credentials {
    /// Validates the three login fields.
    ///
    /// # Errors
    ///
    /// Returns one field error per blank input.
    pub fn new(
        customer_code: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let customer_code = NonEmptyText::new(customer_code)
            .map_err(|_| errors.add("customerCode", "Customer code is required"))
            .ok();
        let username = NonEmptyText::new(username)
            .map_err(|_| errors.add("username", "Username is required"))
            .ok();
        let password = NonEmptyText::new(password)
            .map_err(|_| errors.add("password", "Password is required"))
            .ok();

        match (customer_code, username, password) {
            (Some(customer_code), Some(username), Some(password)) => Ok(Self {
                customer_code,
                username,
                password,
            }),
            _ => Err(errors),
        }
    }

    pub fn customer_code(&self) -> &str {
        self.customer_code.as_str()
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("customer_code", &self.customer_code.as_str())
            .field("username", &self.username.as_str())
            .field("password", &"<redacted>")
            .finish()
    }
}
