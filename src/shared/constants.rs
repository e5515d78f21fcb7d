/// Default page size for the JSON list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// VIEW CONSTANTS
// =============================================================================

/// Number of page links shown by the grid paginator
pub const PAGINATOR_SIZE: usize = 5;

/// How long a notification stays on screen
pub const NOTIFICATION_DURATION_MS: u64 = 3000;

/// Text shown in place of a missing category reference
pub const UNDEFINED_CATEGORY: &str = "undefined";

/// Shown when a service call fails while handling a view event
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

// =============================================================================
// VALIDATION MESSAGES
// =============================================================================

/// Bounds on category and beverage names, in printable characters
pub const NAME_MIN_LENGTH: u64 = 3;
pub const NAME_MAX_LENGTH: u64 = 255;

pub const NAME_TOO_LONG: &str = "Name must not exceed 255 characters";

pub const CATEGORY_NAME_TOO_SHORT: &str =
    "Category name must contain at least 3 printable characters";

pub const CATEGORY_NAME_NOT_UNIQUE: &str = "Category name must be unique";

pub const REVIEW_NAME_TOO_SHORT: &str = "Beverage name must consist of at least 3 characters";

pub const REVIEW_SCORE_OUT_OF_RANGE: &str = "The rating must be between 1 and 5";

pub const REVIEW_COUNT_OUT_OF_RANGE: &str = "The number of times tasted must be between 1 and 99";

pub const UNKNOWN_CATEGORY: &str = "The selected category does not exist";
