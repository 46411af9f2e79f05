//! OpenID auto-submit form discovery and field extraction.

use reqwest::multipart::Form;
use tracing::{debug, instrument, warn};

use crate::constants::{LOGIN_FORM_ID, OPENID_FORM_ID};
use crate::error::LoginError;
use crate::html::{HtmlDocument, HtmlNode, NodeId};

/// Fields of the provider's `#openidForm`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenIdForm {
    fields: Vec<(String, String)>,
}

impl OpenIdForm {
    /// Checks the page for the provider sign-in form, then extracts the single
    /// `#openidForm`.
    ///
    /// # Errors
    ///
    /// - [`LoginError::NotAuthenticated`] if any `#loginForm` element exists
    ///   (checked first, so it wins over a present `#openidForm`).
    /// - [`LoginError::OpenIdFormNotFound`] unless exactly one `#openidForm` exists.
    #[instrument(level = "debug", skip(document))]
    pub fn from_document(document: &HtmlDocument) -> Result<Self, LoginError> {
        if document.contains_id(LOGIN_FORM_ID) {
            return Err(LoginError::NotAuthenticated);
        }

        let forms = document.elements_by_id(OPENID_FORM_ID);
        let [form] = forms.as_slice() else {
            return Err(LoginError::OpenIdFormNotFound { found: forms.len() });
        };

        let extracted = Self::from_form_node(document, *form);
        debug!(fields = extracted.len(), "extracted OpenID form fields");
        Ok(extracted)
    }

    /// Collects `(name, value)` from every `<input>` element below `form`.
    ///
    /// Text nodes never produce fields. An input without `name` is skipped;
    /// a missing `value` becomes the empty string.
    #[must_use]
    pub fn from_form_node(document: &HtmlDocument, form: NodeId) -> Self {
        let mut fields = Vec::new();
        for node in document.descendants(form) {
            let HtmlNode::Element { name: tag, .. } = node else {
                continue;
            };
            if tag != "input" {
                continue;
            }
            let Some(name) = node.attr("name") else {
                warn!("skipping OpenID form input without a name attribute");
                continue;
            };
            let value = node.attr("value").unwrap_or_default();
            fields.push((name.to_string(), value.to_string()));
        }
        Self { fields }
    }

    /// Field pairs in document order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the form had no named inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a fresh multipart body. Called once per POST hop since
    /// `multipart::Form` cannot be replayed.
    #[must_use]
    pub fn to_multipart(&self) -> Form {
        self.fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
    }
}
