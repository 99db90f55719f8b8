use serde::{Deserialize, Serialize};

/// Ordered candidate CSS selectors for one semantic target.
///
/// Order encodes preference: the locator tries candidates front to back and
/// stops at the first one that is present and visible.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorGroup(Vec<String>);

impl SelectorGroup {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(candidates.into_iter().map(Into::into).collect())
    }

    pub fn candidates(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a SelectorGroup {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<String>> for SelectorGroup {
    fn from(candidates: Vec<String>) -> Self {
        Self(candidates)
    }
}

/// The selector groups used by the login workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSet {
    pub username: SelectorGroup,
    pub password: SelectorGroup,
    pub login_button: SelectorGroup,
    pub success_indicators: SelectorGroup,
    pub error_indicators: SelectorGroup,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            username: SelectorGroup::new([
                "#username",
                "[name=\"username\"]",
                "input[type=\"text\"]",
                "input[placeholder*=\"username\"]",
                "input[placeholder*=\"用户名\"]",
            ]),
            password: SelectorGroup::new([
                "#password",
                "[name=\"password\"]",
                "input[type=\"password\"]",
                "input[placeholder*=\"password\"]",
                "input[placeholder*=\"密码\"]",
            ]),
            login_button: SelectorGroup::new([
                "#login-button",
                "#submit",
                "#login",
                ".btn-primary",
                ".btn-login",
                "button[type=\"submit\"]",
                "input[type=\"submit\"]",
                ".login-btn",
            ]),
            success_indicators: SelectorGroup::new([
                ".dashboard",
                ".main-content",
                "[data-testid=\"dashboard\"]",
                ".user-info",
                ".welcome-message",
                "[data-role=\"main\"]",
            ]),
            error_indicators: SelectorGroup::new([
                ".error-message",
                ".alert-danger",
                ".login-error",
                "[data-testid=\"error\"]",
                ".notification.error",
            ]),
        }
    }
}
