//! Sign-in screen.

use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use crate::session::Session;

/// Table holding valid credentials
pub const LOGIN_TABLE: &str = "Login";

/// Table holding invalid credentials
pub const INVALID_LOGIN_TABLE: &str = "InvalidLogin";

/// Login form and the signed-in user menu
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: Session,
    /// Username input
    pub username_input: Locator,
    /// Password input
    pub password_input: Locator,
    /// Sign-in button
    pub login_button: Locator,
    /// Banner shown after a rejected sign-in
    pub login_error_message: Locator,
    /// User menu, present only while signed in
    pub admin: Locator,
    /// Log-out entry of the user menu
    pub log_out: Locator,
}

impl LoginPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            username_input: Locator::id("username input", "username_id"),
            password_input: Locator::id("password input", "password"),
            login_button: Locator::id("login button", "login"),
            login_error_message: Locator::xpath(
                "login error banner",
                "//div[contains(text(),\"Invalid credentials !\")]",
            ),
            admin: Locator::xpath("admin menu", "//li[@class=\"dropdown dropdown-user\"]"),
            log_out: Locator::xpath("log out link", "//a[text() = ' Log Out ']"),
        }
    }

    /// Open the application root
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Navigation`] when the page cannot be loaded.
    pub async fn navigate(&self) -> MedResult<()> {
        self.session.goto("/").await
    }

    /// Sign in with the first row of the `Login` table.
    ///
    /// Returns `true` once the admin menu is visible.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::DataNotFound`] when the credentials are missing,
    /// [`MedError::Interaction`] when the form cannot be used, and
    /// [`MedError::Timeout`] when the admin menu never appears.
    pub async fn perform_login(&self) -> MedResult<bool> {
        let row = self
            .session
            .fixture_row(LOGIN_TABLE, &["ValidUserName", "ValidPassword"])?;
        let username = row.require("ValidUserName")?;
        let password = row.require("ValidPassword")?;

        self.submit(username, password).await?;

        self.session.wait_visible(&self.admin).await?;
        let signed_in = self.session.is_visible(&self.admin).await?;
        tracing::info!(signed_in, "login attempted");
        Ok(signed_in)
    }

    /// Attempt a sign-in with the first row of `InvalidLogin` and return the
    /// trimmed error banner text.
    ///
    /// Signs out first when a user is signed in.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`MedError::LoginMessageUnavailable`]
    /// with the underlying cause as its source.
    pub async fn perform_login_with_invalid_credentials(&self) -> MedResult<String> {
        let result = self.try_invalid_login().await;
        match result {
            Ok(message) => {
                tracing::info!(%message, "error message displayed");
                Ok(message)
            }
            Err(source) => {
                tracing::error!(error = %source, "login with invalid credentials failed");
                Err(MedError::LoginMessageUnavailable {
                    source: Box::new(source),
                })
            }
        }
    }

    async fn try_invalid_login(&self) -> MedResult<String> {
        let row = self
            .session
            .fixture_row(INVALID_LOGIN_TABLE, &["InvalidUserName", "InvalidPassword"])?;
        let username = row.require("InvalidUserName")?;
        let password = row.require("InvalidPassword")?;

        if self.is_signed_in().await? {
            self.sign_out().await?;
        }

        self.submit(username, password).await?;
        self.session.text(&self.login_error_message).await
    }

    /// Whether the admin menu is currently shown
    ///
    /// # Errors
    ///
    /// Returns the driver's error when visibility cannot be queried.
    pub async fn is_signed_in(&self) -> MedResult<bool> {
        self.session.is_visible(&self.admin).await
    }

    /// Open the user menu, choose Log Out, and wait for the login form
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] or [`MedError::Timeout`] naming the
    /// element that could not be used.
    pub async fn sign_out(&self) -> MedResult<()> {
        self.session.click(&self.admin).await?;
        self.session.click(&self.log_out).await?;
        self.session.wait_visible(&self.login_button).await?;
        tracing::info!("signed out");
        Ok(())
    }

    async fn submit(&self, username: &str, password: &str) -> MedResult<()> {
        self.session.fill(&self.username_input, username).await?;
        self.session.fill(&self.password_input, password).await?;
        self.session.click(&self.login_button).await
    }
}
