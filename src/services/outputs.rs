use std::collections::BTreeMap;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use anyhow::Result;
use tracing::{error, info};
use uuid::Uuid;

pub const OUTPUT_FILE_URL: &str = "file-url";
pub const OUTPUT_QR_URL: &str = "qr-url";
pub const OUTPUT_RESULT: &str = "result";

/// Where named run outputs and the failure marker are reported.
pub trait OutputSink: Send {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;

    fn set_failed(&mut self, message: &str);

    fn has_failed(&self) -> bool;

    /// Called once after the outcome has been reported.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Escapes data for a `::command::` line.
fn escape_command_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_command_property(value: &str) -> String {
    escape_command_data(value)
        .replace(':', "%3A")
        .replace(',', "%2C")
}

/// Reports through the automation platform's output file and workflow
/// commands.
#[derive(Debug, Default)]
pub struct PlatformOutputs {
    failed: bool,
}

impl PlatformOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heredoc-style entry for the `GITHUB_OUTPUT` file.
    pub fn file_command_entry(name: &str, value: &str) -> String {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    }
}

impl OutputSink for PlatformOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        match env::var("GITHUB_OUTPUT").ok().filter(|p| !p.is_empty()) {
            Some(path) => {
                let mut file = OpenOptions::new().append(true).create(true).open(&path)?;
                file.write_all(Self::file_command_entry(name, value).as_bytes())?;
            }
            None => {
                println!(
                    "::set-output name={}::{}",
                    escape_command_property(name),
                    escape_command_data(value)
                );
            }
        }
        info!("Output set: {}", name);
        Ok(())
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        println!("::error::{}", escape_command_data(message));
    }

    fn has_failed(&self) -> bool {
        self.failed
    }
}

/// Collects outputs in memory and prints them as JSON at the end.
#[derive(Debug, Default)]
pub struct LocalOutputs {
    outputs: BTreeMap<String, String>,
    failure: Option<String>,
    print_summary: bool,
}

impl LocalOutputs {
    pub fn new() -> Self {
        Self {
            print_summary: true,
            ..Self::default()
        }
    }

    /// Same as [`LocalOutputs::new`] but never writes to stdout.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

impl OutputSink for LocalOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        info!("Output {} = {}", name, value);
        self.outputs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_failed(&mut self, message: &str) {
        error!("Run failed: {}", message);
        self.failure = Some(message.to_string());
    }

    fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    fn finish(&mut self) -> Result<()> {
        if self.print_summary {
            let summary = serde_json::json!({
                "outputs": self.outputs,
                "failure": self.failure,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Ok(())
    }
}
