//! Centralized constants for environment names, defaults, and limits.

/// Environment variable holding the dashboard API key.
pub const API_KEY_ENV_VAR: &str = "MERAKI_API_KEY";

/// Environment variable holding the target network identifier.
pub const NETWORK_ID_ENV_VAR: &str = "NETWORK_ID";

/// Environment variable holding the group policy identifier.
pub const GROUP_POLICY_ID_ENV_VAR: &str = "GROUP_POLICY_ID";

/// Default path of the unit list input file.
pub const DEFAULT_APARTMENT_FILE: &str = "apartments.txt";

/// Default path of the provisioning report.
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

/// Default number of provisioning attempts per unit.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default generated passphrase length.
pub const DEFAULT_PASSPHRASE_LENGTH: usize = 8;

/// Minimum passphrase length able to hold one character of each class.
pub const MIN_PASSPHRASE_LENGTH: usize = 4;

/// Default dashboard API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// SSID slot credentials are created under.
pub const DEFAULT_SSID_NUMBER: u8 = 0;

/// File name prefix for the timestamped archive copy of the report.
pub const ARCHIVE_PREFIX: &str = "subnet";

/// Timestamp format used in archive file names (second granularity).
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Permission mode for the report and archive files (they hold passphrases).
pub const REPORT_FILE_MODE: u32 = 0o600;

/// HTTP timeout for dashboard API calls, in seconds.
pub const API_TIMEOUT_SECS: u64 = 30;
