use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub billing_api: BillingApiSettings,
    pub draft: DraftSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Remote item/invoice storage API.
#[derive(Deserialize, Clone)]
pub struct BillingApiSettings {
    /// Base URL including the API prefix, e.g. `http://localhost:4000/api`.
    pub url: String,
}

/// Locally persisted draft bill.
#[derive(Deserialize, Clone)]
pub struct DraftSettings {
    /// File holding the draft key-value records.
    #[serde(default = "default_draft_path")]
    pub path: String,
}

fn default_draft_path() -> String {
    "data/draft.json".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in billing-frontend directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("billing-frontend") {
        base_path.join("config")
    } else {
        base_path.join("billing-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
