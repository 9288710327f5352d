use url::Url;

use crate::error::DeskError;

/// Environment variable that holds the base URL of the table service
pub const URL_VAR: &str = "EVENT_DESK_URL";
/// Environment variable that holds the API key of the table service
pub const API_KEY_VAR: &str = "EVENT_DESK_API_KEY";

/// Just a wrapper around a URL and credentials
#[derive(Clone)]
pub struct Resource {
    url: Url,
    api_key: String,
}

impl Resource {
    pub fn new<S: AsRef<str>, T: ToString>(url: S, api_key: T) -> Result<Self, DeskError> {
        let url = Url::parse(url.as_ref())
            .map_err(|err| DeskError::validation(format!("Invalid service URL {:?}: {}", url.as_ref(), err)))?;
        if url.cannot_be_a_base() {
            return Err(DeskError::validation(format!("Invalid service URL {:?}", url.as_str())));
        }
        Ok(Self { url, api_key: api_key.to_string() })
    }

    /// Build a resource from the `EVENT_DESK_URL` and `EVENT_DESK_API_KEY` environment variables.
    ///
    /// The URL is mandatory, the key defaults to an empty string.
    pub fn from_env() -> Result<Self, DeskError> {
        let url = std::env::var(URL_VAR)
            .map_err(|_| DeskError::validation(format!("{} is not set", URL_VAR)))?;
        let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
        Self::new(url, api_key)
    }

    pub fn url(&self) -> &Url { &self.url }
    pub fn api_key(&self) -> &str { &self.api_key }

    /// The URL of a table, e.g. `https://host/rest/v1/events`
    pub fn table(&self, name: &str) -> Url {
        let mut built = self.url.clone();
        if let Ok(mut segments) = built.path_segments_mut() {
            segments.pop_if_empty().extend(&["rest", "v1", name]);
        }
        built
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the key is a secret
        f.debug_struct("Resource")
            .field("url", &self.url.as_str())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_urls() {
        let r = Resource::new("https://project.example.com", "key").unwrap();
        assert_eq!(r.table("events").as_str(), "https://project.example.com/rest/v1/events");

        let nested = Resource::new("https://example.com/api/", "key").unwrap();
        assert_eq!(nested.table("profiles").as_str(), "https://example.com/api/rest/v1/profiles");
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(Resource::new("not a url", "key").unwrap_err().is_validation());
        assert!(Resource::new("mailto:someone@example.com", "key").unwrap_err().is_validation());
    }
}
