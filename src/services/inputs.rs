use std::collections::HashMap;
use std::env;

use crate::error::{UploadError, UploadResult};

/// Source of the named string parameters a run is configured with.
pub trait InputProvider: Send + Sync {
    /// Returns the value of `name`, or an empty string when it is not set.
    fn get_input(&self, name: &str) -> UploadResult<String>;

    /// Like [`InputProvider::get_input`], but an empty value is an error.
    fn get_required_input(&self, name: &str) -> UploadResult<String> {
        let value = self.get_input(name)?;
        if value.is_empty() {
            return Err(UploadError::MissingInput(format!(
                "Input required and not supplied: {}",
                name
            )));
        }
        Ok(value)
    }
}

/// Inputs handed over by the automation platform as `INPUT_<NAME>` variables.
#[derive(Debug, Default, Clone)]
pub struct PlatformInputs;

impl PlatformInputs {
    pub fn env_key(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputProvider for PlatformInputs {
    fn get_input(&self, name: &str) -> UploadResult<String> {
        Ok(env::var(Self::env_key(name))
            .map(|v| v.trim().to_string())
            .unwrap_or_default())
    }
}

/// Local development inputs: credentials and bucket from the usual AWS
/// variables, everything else fixed.
#[derive(Debug, Clone)]
pub struct LocalInputs {
    values: HashMap<&'static str, String>,
}

impl LocalInputs {
    const REQUIRED_ENV: [(&'static str, &'static str); 3] = [
        ("aws-access-key-id", "AWS_ACCESS_KEY_ID"),
        ("aws-secret-access-key", "AWS_SECRET_ACCESS_KEY"),
        ("aws-bucket", "AWS_BUCKET"),
    ];

    const DEFAULTS: [(&'static str, &'static str); 12] = [
        ("aws-region", "ap-northeast-1"),
        ("file-path", "./README.md"),
        ("destination-dir", ""),
        ("bucket-root", ""),
        ("output-file-url", "true"),
        ("content-type", ""),
        ("output-qr-url", "true"),
        ("qr-width", "120"),
        ("public", "false"),
        ("expire", "180"),
        ("alternative-domain-public", ""),
        ("alternative-domain-private", ""),
    ];

    pub fn from_env() -> UploadResult<Self> {
        let mut values = HashMap::new();
        for (name, var) in Self::REQUIRED_ENV {
            let value = env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| UploadError::MissingInput(format!("{} is required", var)))?;
            values.insert(name, value);
        }
        for (name, value) in Self::DEFAULTS {
            values.insert(name, value.to_string());
        }
        Ok(Self { values })
    }
}

impl InputProvider for LocalInputs {
    fn get_input(&self, name: &str) -> UploadResult<String> {
        Ok(self.values.get(name).cloned().unwrap_or_default())
    }
}

/// Fixed key/value inputs, handy for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct StaticInputs {
    values: HashMap<String, String>,
}

impl StaticInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl InputProvider for StaticInputs {
    fn get_input(&self, name: &str) -> UploadResult<String> {
        Ok(self.values.get(name).cloned().unwrap_or_default())
    }
}

/// How inputs are sourced for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputMode {
    Platform,
    Local,
}

/// Picks the provider for `mode`. Called once at start-up.
pub fn create_input_provider(mode: InputMode) -> UploadResult<Box<dyn InputProvider>> {
    match mode {
        InputMode::Platform => Ok(Box::new(PlatformInputs)),
        InputMode::Local => {
            tracing::info!("Using local inputs from AWS_* environment variables");
            Ok(Box::new(LocalInputs::from_env()?))
        }
    }
}
