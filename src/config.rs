use serde::Deserialize;

/// Fallback secret for cookie encryption when a deployment does not set one.
///
/// This is fail-open behavior: every deployment left on the default shares
/// the same key, so any client can forge security cookies. It exists so that
/// development setups work out of the box; production settings files must
/// override `cookie_secret`.
pub const DEFAULT_COOKIE_SECRET: &str = "httpwrap-dev-cookie-secret";

/// Read-only deployment settings, shared across requests.
///
/// The host application loads these once and hands them to every
/// [`Envelope`](crate::http::envelope::Envelope) as an `Arc<Settings>`.
/// Nothing in this crate mutates them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Secret keying the cookie cipher. See [`DEFAULT_COOKIE_SECRET`].
    pub cookie_secret: String,

    /// Root directory prepended to template paths passed to
    /// [`Envelope::render`](crate::http::envelope::Envelope::render).
    pub template_root: String,

    /// Value of the server identification header opening every response
    /// header block.
    pub server_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cookie_secret: DEFAULT_COOKIE_SECRET.to_string(),
            template_root: "./templates".to_string(),
            server_name: "httpwrap/0.1".to_string(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Fail to read {}: {err}", path);
                log::warn!("Fall back to default settings");
                return Settings::default();
            }
        };

        match toml::from_str::<Settings>(content.as_str()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Fail to deserialize settings file {}: {err}", path);
                log::warn!("Fall back to default settings");
                Settings::default()
            }
        }
    }
}
