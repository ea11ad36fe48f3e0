use std::fs;

use ragnote_lib::context::RagContext;
use ragnote_lib::runtime::Runtime;
use ragnote_lib::settings::Settings;
use tempfile::TempDir;

/// Runtime rooted in a fresh temp dir: settings under `data/`, an empty
/// vault as the working directory, and the service at `base_url`.
pub fn runtime_with_service(base_url: &str) -> (TempDir, Runtime) {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    let vault_dir = tmp.path().join("vault");
    fs::create_dir_all(&vault_dir).unwrap();

    let settings = Settings {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Settings::default()
    };
    let runtime = Runtime {
        context: RagContext::new(data_dir, vault_dir),
        settings,
    };
    (tmp, runtime)
}
