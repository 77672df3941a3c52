/// Fallback monthly preset amounts in minor units ($20, $30, $40, $50)
pub const DEFAULT_PRESET_AMOUNTS_CENTS: [i64; 4] = [2000, 3000, 4000, 5000];

/// Minimum one-time gift in minor units when the campaign omits one
pub const DEFAULT_MIN_ONE_TIME_CENTS: i64 = 1000;

/// Campaign currency when the backend omits one
pub const DEFAULT_CURRENCY: &str = "CAD";

/// Donor country when the form omits one
pub const DEFAULT_COUNTRY: &str = "CA";

/// Charity display name before login provides one
pub const DEFAULT_CHARITY_NAME: &str = "Your Charity";

/// Delay between SMS verification status polls, in milliseconds
pub const SMS_POLL_INTERVAL_MS: u64 = 2000;
