//! Site URL composition

use crate::contract::{BootstrapError, SiteUrls};

impl SiteUrls {
    /// Derive the base and admin URLs
    ///
    /// The admin URL is the base URL, the admin path and a trailing `/`,
    /// joined as plain strings. A missing trailing `/` on the base is added
    /// first so the admin path never fuses with the last base segment.
    pub fn compose(base_url: &str, admin_path: &str) -> Result<Self, BootstrapError> {
        let base_url = base_url.trim();
        let parsed = url::Url::parse(base_url)
            .map_err(|e| BootstrapError::invalid("site.base_url", e.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BootstrapError::invalid(
                "site.base_url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(BootstrapError::invalid(
                "site.base_url",
                "must not contain a query or fragment",
            ));
        }

        let admin_path = admin_path.trim().trim_matches('/');
        if admin_path.is_empty() {
            return Err(BootstrapError::invalid("site.admin_path", "must not be empty"));
        }

        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let admin = format!("{base}{admin_path}/");

        Ok(Self { base, admin })
    }

    /// Link to a public page below the base URL
    pub fn page(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Link to an admin page below the admin URL
    pub fn admin_page(&self, path: &str) -> String {
        format!("{}{}", self.admin, path.trim_start_matches('/'))
    }
}
