//! Runtime limits and feature toggles.
//!
//! [`Flags`] mirrors the flag table of the reporting client. Field names
//! serialize to the external names (`feature-xna`, `max_attribution_filters`,
//! ...), so a configuration file only lists the values it overrides:
//!
//! ```yaml
//! feature-attribution-scopes: true
//! max_attribution_filters: 10
//! ```

use crate::enums::{HeaderType, SourceType};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const DAY_SECONDS: u64 = 24 * 60 * 60;
const HOUR_SECONDS: u64 = 60 * 60;

/// Limits and feature toggles consulted by the field rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Flags {
    // ─── Feature toggles ────────────────────────────────────────────────────
    #[serde(rename = "feature-lookback-window-filter")]
    pub lookback_window_filter: bool,
    #[serde(rename = "feature-trigger-data-matching")]
    pub trigger_data_matching: bool,
    #[serde(rename = "feature-coarse-event-report-destination")]
    pub coarse_event_report_destination: bool,
    #[serde(rename = "feature-shared-source-debug-key")]
    pub shared_source_debug_key: bool,
    #[serde(rename = "feature-xna")]
    pub xna: bool,
    #[serde(rename = "feature-shared-filter-data-keys")]
    pub shared_filter_data_keys: bool,
    #[serde(rename = "feature-preinstall-check")]
    pub preinstall_check: bool,
    #[serde(rename = "feature-attribution-scopes")]
    pub attribution_scopes: bool,
    #[serde(rename = "feature-aggregation-coordinator-origin")]
    pub aggregation_coordinator_origin: bool,
    #[serde(rename = "feature-source-registration-time-optional-for-agg-reports")]
    pub source_registration_time_optional_for_agg_reports: bool,
    #[serde(rename = "feature-trigger-context-id")]
    pub trigger_context_id: bool,
    #[serde(rename = "feature-enable-update-trigger-header-limit")]
    pub enable_update_trigger_header_limit: bool,
    #[serde(rename = "feature-enable-reinstall-reattribution")]
    pub enable_reinstall_reattribution: bool,

    // ─── Filters ────────────────────────────────────────────────────────────
    pub max_attribution_filters: u64,
    pub max_bytes_per_attribution_filter_string: u64,
    pub max_values_per_attribution_filter: u64,
    pub max_filter_maps_per_filter_set: u64,

    // ─── Web destinations ───────────────────────────────────────────────────
    pub max_distinct_web_destinations_in_source_registration: u64,
    pub max_web_destination_hostname_character_length: u64,
    pub max_web_destination_hostname_parts: u64,
    pub min_web_destination_hostname_part_character_length: u64,
    pub max_web_destination_hostname_part_character_length: u64,

    // ─── Aggregation ────────────────────────────────────────────────────────
    pub max_aggregate_keys_per_source_registration: u64,
    pub max_bytes_per_attribution_aggregate_key_id: u64,
    pub min_bytes_per_aggregate_value: u64,
    pub max_bytes_per_aggregate_value: u64,
    pub max_aggregate_keys_per_trigger_registration: u64,
    pub max_sum_of_aggregate_values_per_source: u64,
    pub max_aggregate_deduplication_keys_per_registration: u64,

    // ─── Event reports ──────────────────────────────────────────────────────
    pub max_report_states_per_source_registration: u64,
    pub max_bucket_threshold: u64,
    pub max_trigger_context_id_string_length: u64,
    pub max_32_bit_integer: u64,

    // ─── Windows (seconds) ──────────────────────────────────────────────────
    pub min_reporting_register_source_expiration_in_seconds: u64,
    pub max_reporting_register_source_expiration_in_seconds: u64,
    pub minimum_event_report_window_in_seconds: u64,
    pub minimum_aggregatable_report_window_in_seconds: u64,
    pub min_install_attribution_window: u64,
    pub max_install_attribution_window: u64,
    pub min_post_install_exclusivity_window: u64,
    pub max_post_install_exclusivity_window: u64,
    pub max_reinstall_reattribution_window_seconds: u64,

    // ─── Redirects ──────────────────────────────────────────────────────────
    pub max_registration_redirects: u64,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            lookback_window_filter: true,
            trigger_data_matching: true,
            coarse_event_report_destination: true,
            shared_source_debug_key: true,
            xna: true,
            shared_filter_data_keys: true,
            preinstall_check: true,
            attribution_scopes: false,
            aggregation_coordinator_origin: true,
            source_registration_time_optional_for_agg_reports: true,
            trigger_context_id: true,
            enable_update_trigger_header_limit: false,
            enable_reinstall_reattribution: false,

            max_attribution_filters: 50,
            max_bytes_per_attribution_filter_string: 25,
            max_values_per_attribution_filter: 50,
            max_filter_maps_per_filter_set: 20,

            max_distinct_web_destinations_in_source_registration: 3,
            max_web_destination_hostname_character_length: 253,
            max_web_destination_hostname_parts: 127,
            min_web_destination_hostname_part_character_length: 1,
            max_web_destination_hostname_part_character_length: 63,

            max_aggregate_keys_per_source_registration: 50,
            max_bytes_per_attribution_aggregate_key_id: 25,
            min_bytes_per_aggregate_value: 3,
            max_bytes_per_aggregate_value: 34,
            max_aggregate_keys_per_trigger_registration: 50,
            max_sum_of_aggregate_values_per_source: 65536,
            max_aggregate_deduplication_keys_per_registration: 50,

            max_report_states_per_source_registration: u64::from(u32::MAX),
            max_bucket_threshold: u64::from(u32::MAX),
            max_trigger_context_id_string_length: 64,
            max_32_bit_integer: i32::MAX as u64,

            min_reporting_register_source_expiration_in_seconds: DAY_SECONDS,
            max_reporting_register_source_expiration_in_seconds: 30 * DAY_SECONDS,
            minimum_event_report_window_in_seconds: HOUR_SECONDS,
            minimum_aggregatable_report_window_in_seconds: HOUR_SECONDS,
            min_install_attribution_window: DAY_SECONDS,
            max_install_attribution_window: 30 * DAY_SECONDS,
            min_post_install_exclusivity_window: 0,
            max_post_install_exclusivity_window: 30 * DAY_SECONDS,
            max_reinstall_reattribution_window_seconds: 90 * DAY_SECONDS,

            max_registration_redirects: 20,
        }
    }
}

impl Flags {
    /// Load flag overrides from YAML. Absent keys keep their defaults.
    pub fn from_yaml(input: &str) -> Result<Flags, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Flags::default());
        }
        serde_saphyr::from_str(input).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    /// Load flag overrides from a JSON object. Absent keys keep their defaults.
    pub fn from_json(input: &str) -> Result<Flags, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Whether filter keys and trigger key counts are size-checked at trigger
    /// level. The update-trigger-header-limit feature lifts those checks.
    pub fn trigger_size_checks(&self) -> bool {
        !self.enable_update_trigger_header_limit
    }
}

/// Per-call description of the header being validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderOptions {
    pub header_type: HeaderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
}

impl HeaderOptions {
    pub fn source(source_type: Option<SourceType>) -> Self {
        Self {
            header_type: HeaderType::Source,
            source_type,
        }
    }

    pub fn trigger() -> Self {
        Self {
            header_type: HeaderType::Trigger,
            source_type: None,
        }
    }

    pub fn redirect() -> Self {
        Self {
            header_type: HeaderType::Redirect,
            source_type: None,
        }
    }
}
