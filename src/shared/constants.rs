/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 15;

/// Page size for comment listings (root comments per page)
pub const COMMENT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Length of the plaintext bearer token (alphanumeric characters)
pub const ACCESS_TOKEN_LENGTH: usize = 64;
