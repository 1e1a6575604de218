use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// The seven JSON snapshots produced by one collection run.
///
/// Each artifact has a fixed filename and is overwritten in full on every
/// run; there are no incremental or merge semantics. A consumer must treat
/// the set as valid only after a whole run has succeeded, not file by file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    DeviceConfig,
    PerformanceData,
    WifiScans,
    RfEnvironment,
    ClientDevices,
    HistoricalData,
    ChannelUtilization,
}

impl Artifact {
    pub const ALL: [Artifact; 7] = [
        Artifact::DeviceConfig,
        Artifact::PerformanceData,
        Artifact::WifiScans,
        Artifact::RfEnvironment,
        Artifact::ClientDevices,
        Artifact::HistoricalData,
        Artifact::ChannelUtilization,
    ];

    /// Artifacts handed to the advisor for analysis, in delivery order.
    pub const ADVISOR_INPUTS: [Artifact; 5] = [
        Artifact::DeviceConfig,
        Artifact::PerformanceData,
        Artifact::WifiScans,
        Artifact::RfEnvironment,
        Artifact::ClientDevices,
    ];

    pub fn filename(&self) -> &'static str {
        match self {
            Artifact::DeviceConfig => "device_config.json",
            Artifact::PerformanceData => "performance_data.json",
            Artifact::WifiScans => "wifi_scans.json",
            Artifact::RfEnvironment => "rf_environment.json",
            Artifact::ClientDevices => "client_devices.json",
            Artifact::HistoricalData => "historical_data.json",
            Artifact::ChannelUtilization => "channel_utilization.json",
        }
    }
}

/// Write one artifact, replacing any previous run's file.
///
/// The value is fully serialized before anything touches the filesystem, so
/// a file on disk always reflects a complete, parsed response.
pub async fn write(dir: &Path, artifact: Artifact, value: &Value) -> Result<()> {
    let body = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", artifact.filename()))?;

    let path = dir.join(artifact.filename());
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(file = artifact.filename(), "Artifact written");
    Ok(())
}

/// Read one artifact back from disk.
pub async fn read(dir: &Path, artifact: Artifact) -> Result<Value> {
    let path = dir.join(artifact.filename());
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn filenames_are_distinct() {
        let names: HashSet<_> = Artifact::ALL.iter().map(|a| a.filename()).collect();
        assert_eq!(names.len(), Artifact::ALL.len());
    }

    #[test]
    fn advisor_inputs_are_a_subset_of_all() {
        for input in Artifact::ADVISOR_INPUTS {
            assert!(Artifact::ALL.contains(&input));
        }
        assert!(!Artifact::ADVISOR_INPUTS.contains(&Artifact::HistoricalData));
        assert!(!Artifact::ADVISOR_INPUTS.contains(&Artifact::ChannelUtilization));
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let value = json!([{"mac": "aa:bb", "type": "uap"}]);

        write(dir.path(), Artifact::DeviceConfig, &value).await.unwrap();
        let back = read(dir.path(), Artifact::DeviceConfig).await.unwrap();
        assert_eq!(back, value);
    }

    #[tokio::test]
    async fn write_is_pretty_printed_with_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let value = json!({"key": "value"});

        write(dir.path(), Artifact::WifiScans, &value).await.unwrap();
        let raw = tokio::fs::read_to_string(dir.path().join("wifi_scans.json"))
            .await
            .unwrap();
        assert!(raw.contains("\n  \"key\": \"value\""));
    }

    #[tokio::test]
    async fn write_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();

        write(dir.path(), Artifact::ClientDevices, &json!([1, 2, 3]))
            .await
            .unwrap();
        write(dir.path(), Artifact::ClientDevices, &json!([4]))
            .await
            .unwrap();

        let back = read(dir.path(), Artifact::ClientDevices).await.unwrap();
        assert_eq!(back, json!([4]));
    }
}
