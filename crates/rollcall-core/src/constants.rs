/// Bounds on a single lesson's length, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;
pub const MAX_DURATION_MINUTES: u32 = 360;

/// Length of one "month" when stepping a monthly series.
pub const MONTHLY_STEP_DAYS: i64 = 30;

/// Upper bound on occurrences produced by a single expansion.
pub const DEFAULT_MAX_OCCURRENCES: usize = 10_000;

/// How long an attendance QR pass stays redeemable after issue.
pub const DEFAULT_PASS_MINUTES: u32 = 5;

/// Photo captures allowed per lesson before face matching is refused.
pub const DEFAULT_MAX_PHOTO_REQUESTS: u32 = 2;

/// Week view cells span an hour minus one minute so adjacent cells don't share an instant.
pub const CALENDAR_CELL_SPAN_MINUTES: i64 = 59;

/// Route component constants for links handed out to students
pub const ATTENDANCE_ROUTE_COMPONENT: &str = "attendance";
pub const ATTENDANCE_ROUTE_PREFIX: &str = const_str::concat!("/", ATTENDANCE_ROUTE_COMPONENT);
