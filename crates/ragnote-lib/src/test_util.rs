use crate::settings::Settings;

/// Default settings pointed at a mock service.
pub fn settings_for(base_url: &str) -> Settings {
    Settings {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Settings::default()
    }
}
