use anyhow::Result;
use serde_json::Value;

/// Opening prompt framing the analysis task. The data files are delivered in
/// separate follow-up messages, one per artifact.
pub const ANALYSIS_PROMPT: &str = r#"You are a network optimization expert specializing in UniFi networks. Analyze the following datasets to provide specific recommendations for optimizing WiFi performance. Your recommendations should aim to improve coverage, reduce interference, and enhance client connectivity and throughput. However, be mindful to avoid any new problems, such as overlapping channels or suboptimal configurations. Ensure that each recommendation considers potential side effects and mitigates them.

Datasets:
1. RF Environment Data (rf_environment.json): This dataset includes information about the radio frequency environment, such as:
- Channels
- Interference levels
- Channel utilization
- Channel width

2. WiFi Scans (wifi_scans.json): This dataset provides WiFi configuration details, including:
- Enabled WLAN bands (wlan_band)
- DTIM intervals for various bands (dtim_ng, dtim_na, dtim_6e)
- Minimum data rates (minrate_na_data_rate_kbps, minrate_ng_data_rate_kbps)
- Band steering settings and security configurations

3. Device Configuration (device_config.json): This dataset provides details on device configurations, such as:
- AP group configurations (ap_group_ids)
- Network configurations (networkconf_id)
- Rate setting preferences (minrate_setting_preference)

4. Performance Data (performance_data.json): This dataset includes performance metrics for various sites, such as:
- Latency (latency)
- Throughput (throughput)
- Overall site performance metrics

5. Client Data (client_devices.json): This dataset provides details on client devices, such as:
- Signal strength (rssi)
- Noise level (noise)
- Transmit rate (tx_rate)
- Receive rate (rx_rate)
- Tx retries (tx_retries)
- Rx retries (rx_retries)
- Tx retry percentage (wifi_tx_retries_percentage)

The analysis you will perform must adhere to the following requirements:
- Channel Selection and Interference Mitigation: Analyze the RF Environment Data to identify channels with the least interference and utilization. Recommend a channel and a channel width for each band on each access point to minimize overlap and interference while ensuring coverage.
- Prevent Overlapping Channels or New Issues: Ensure that all recommended changes do not introduce new problems, such as overlapping channels (e.g. recommending the same channel on multiple access points), excessive power levels causing interference, or settings that may impact specific types of devices negatively (e.g., disabling 2.4 GHz for IoT devices).

I will now provide you with the data files in separate messages. After receiving all the data, please provide your analysis and recommendations."#;

/// System message framing the analyst conversation.
pub const SYSTEM_MESSAGE: &str =
    "You analyze network data and provide recommendations based on the given prompt.";

/// One data-delivery message. The JSON is compact-encoded to keep the
/// message as small as the payload allows.
pub fn data_message(filename: &str, value: &Value) -> Result<String> {
    let compact = serde_json::to_string(value)?;
    Ok(format!("Here is the content of {}:\n{}", filename, compact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_messages_are_compact_encoded() {
        let value = json!({"a": [1, 2], "b": "x"});
        let msg = data_message("rf_environment.json", &value).unwrap();
        assert_eq!(
            msg,
            "Here is the content of rf_environment.json:\n{\"a\":[1,2],\"b\":\"x\"}"
        );
    }

    #[test]
    fn analysis_prompt_names_every_delivered_artifact() {
        for name in [
            "rf_environment.json",
            "wifi_scans.json",
            "device_config.json",
            "performance_data.json",
            "client_devices.json",
        ] {
            assert!(ANALYSIS_PROMPT.contains(name), "prompt is missing {}", name);
        }
    }
}
