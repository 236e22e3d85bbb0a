use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub model_path: String,
    pub data_path: String,
    pub bind_addr: String,
    pub port: u16,
}

/// Default location of the serialized premium model artifact.
pub const DEFAULT_MODEL_PATH: &str = "artifacts/premium_model.json";

/// Default location of the reference dataset the model was trained on.
pub const DEFAULT_DATA_PATH: &str = "artifacts/cleaned_data.csv";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
                .trim()
                .to_string(),
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string())
                .trim()
                .to_string(),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0".to_string())
                .trim()
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
        };

        if config.model_path.is_empty() {
            anyhow::bail!("MODEL_PATH cannot be empty");
        }
        if config.data_path.is_empty() {
            anyhow::bail!("DATA_PATH cannot be empty");
        }
        if config.bind_addr.is_empty() {
            anyhow::bail!("BIND_ADDR cannot be empty");
        }

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Model artifact path: {}", config.model_path);
        tracing::debug!("Reference dataset path: {}", config.data_path);
        tracing::debug!("Server bind: {}:{}", config.bind_addr, config.port);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_are_non_empty() {
        assert!(!DEFAULT_MODEL_PATH.is_empty());
        assert!(!DEFAULT_DATA_PATH.is_empty());
        assert!(DEFAULT_MODEL_PATH.ends_with(".json"));
    }
}
