use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::Collector;
use crate::error::CollectError;

/// Device `type` marker identifying access points in the device list.
const AP_TYPE: &str = "uap";

impl Collector {
    /// Build the RF environment map: one spectrum scan per access point,
    /// keyed by the AP's MAC address.
    ///
    /// This is the only partial-failure-tolerant step in the pipeline: an AP
    /// whose scan returns a non-success status is logged and skipped. An
    /// empty resulting map still fails the run with [`CollectError::NoData`].
    pub async fn rf_environment(&self, devices: &Value) -> Result<Map<String, Value>, CollectError> {
        let aps = access_points(devices);
        debug!(count = aps.len(), "Collecting spectrum scans");

        let mut scans = Vec::with_capacity(aps.len());
        for mac in aps {
            scans.push((mac.to_string(), self.spectrum_scan(mac).await?));
        }

        assemble_map(scans)
    }

    /// Fetch one AP's spectrum scan. Returns `Ok(None)` on a non-success
    /// status; transport errors and malformed bodies still abort the run.
    async fn spectrum_scan(&self, mac: &str) -> Result<Option<Value>, CollectError> {
        let resp = self
            .client
            .get(self.site_url(&format!("stat/spectrum-scan/{}", mac)))
            .send()
            .await
            .map_err(|source| {
                error!(ap = mac, error = %source, "Spectrum scan request failed");
                CollectError::Fetch {
                    resource: "spectrum scan",
                    source,
                }
            })?;

        if !resp.status().is_success() {
            warn!(ap = mac, status = %resp.status(), "Spectrum scan failed, skipping AP");
            return Ok(None);
        }

        let text = resp.text().await.map_err(|source| {
            error!(ap = mac, error = %source, "Failed to read spectrum scan body");
            CollectError::Fetch {
                resource: "spectrum scan",
                source,
            }
        })?;

        let data = super::decode_body("spectrum scan", &text)?;
        debug!(ap = mac, "Spectrum scan collected");
        Ok(Some(data))
    }
}

/// MAC addresses of the access points in a controller device list.
/// Non-AP devices (switches, gateways) and records without a MAC are ignored.
fn access_points(devices: &Value) -> Vec<&str> {
    devices
        .as_array()
        .into_iter()
        .flatten()
        .filter(|d| d.get("type").and_then(Value::as_str) == Some(AP_TYPE))
        .filter_map(|d| d.get("mac").and_then(Value::as_str))
        .collect()
}

/// Fold per-AP scan outcomes into the RF map, dropping skipped APs.
fn assemble_map(scans: Vec<(String, Option<Value>)>) -> Result<Map<String, Value>, CollectError> {
    let map: Map<String, Value> = scans
        .into_iter()
        .filter_map(|(mac, scan)| scan.map(|s| (mac, s)))
        .collect();

    if map.is_empty() {
        error!("No access point returned spectrum scan data");
        return Err(CollectError::NoData);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_list() -> Value {
        json!([
            {"mac": "AA:BB", "type": "uap", "name": "office-ap"},
            {"mac": "CC:DD", "type": "uap", "name": "garage-ap"},
            {"mac": "EE:FF", "type": "usw", "name": "core-switch"},
        ])
    }

    #[test]
    fn access_points_filters_by_type() {
        let devices = device_list();
        assert_eq!(access_points(&devices), vec!["AA:BB", "CC:DD"]);
    }

    #[test]
    fn access_points_skips_records_without_mac() {
        let devices = json!([
            {"type": "uap"},
            {"mac": "AA:BB", "type": "uap"},
        ]);
        assert_eq!(access_points(&devices), vec!["AA:BB"]);
    }

    #[test]
    fn access_points_handles_non_array_payload() {
        let devices = json!({"unexpected": true});
        assert!(access_points(&devices).is_empty());
    }

    #[test]
    fn one_failed_scan_is_omitted_from_the_map() {
        let scans = vec![
            ("AA:BB".to_string(), Some(json!({"channel": 36}))),
            ("CC:DD".to_string(), None),
        ];

        let map = assemble_map(scans).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["AA:BB"], json!({"channel": 36}));
        assert!(!map.contains_key("CC:DD"));
    }

    #[test]
    fn all_scans_failing_is_no_data() {
        let scans = vec![("AA:BB".to_string(), None), ("CC:DD".to_string(), None)];
        assert!(matches!(assemble_map(scans), Err(CollectError::NoData)));
    }

    #[test]
    fn zero_access_points_is_no_data() {
        assert!(matches!(assemble_map(vec![]), Err(CollectError::NoData)));
    }
}
