//! Centralized configuration for Switchyard.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Switchyard components.
///
/// Groups related configuration settings into logical sections.
#[derive(Debug, Clone, Default)]
pub struct SwitchyardConfig {
    pub session: SessionConfig,
    pub health: HealthConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

/// Playback session and failover behavior.
///
/// Controls stall detection and the actor's command channel sizing.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a candidate may sit in `Loading` before auto-advance
    pub stall_timeout: Duration,
    /// Capacity of the session actor's command channel
    pub command_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stall_timeout: Duration::from_secs(14),
            command_buffer: 64,
        }
    }
}

/// Provider health tracking configuration.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Capacity of the broadcast channel fanning out health updates.
    ///
    /// Slow subscribers past this depth see a lag error and miss updates;
    /// they recover on the next update since writes are last-write-wins.
    pub update_buffer: usize,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { update_buffer: 128 }
    }
}

/// Persistent storage backend configuration.
///
/// Points the REST backend at a PostgREST-compatible API and controls
/// request timeouts and the health change-feed poll cadence.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the REST API
    pub base_url: String,
    /// API key sent as `apikey` and bearer token
    pub api_key: String,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Interval between health change-feed polls
    pub health_poll_interval: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(10),
            health_poll_interval: Duration::from_secs(30),
        }
    }
}

/// Failure report telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// When false, broken-source reports are dropped locally
    pub enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
