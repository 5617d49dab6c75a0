//! Unified error codes for the storefront
//!
//! Error codes are shared between the API server and the frontend.
//! Organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Order errors
//! - 6xxx: Product errors
//! - 7xxx: Cart errors
//! - 8xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (phone/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot delete admin user
    CannotDeleteAdmin = 2005,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Phone number already registered
    PhoneExists = 3002,
    /// Gender value not recognized
    InvalidGender = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order item is missing productId/quantity/price
    OrderItemInvalid = 4003,
    /// Client price breakdown does not add up
    OrderTotalMismatch = 4004,
    /// Order status value not recognized
    InvalidOrderStatus = 4005,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Requested quantity exceeds available stock
    InsufficientStock = 6002,

    // ==================== 7xxx: Cart ====================
    /// Cart item not found
    CartItemNotFound = 7001,

    // ==================== 8xxx: Review ====================
    /// Review not found
    ReviewNotFound = 8001,
    /// User already reviewed this product
    ReviewExists = 8002,
    /// Rating outside the 1-5 range
    InvalidRating = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid phone or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotDeleteAdmin => "Cannot delete administrator user",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::PhoneExists => "Phone number already registered",
            ErrorCode::InvalidGender => "Gender value is not recognized",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderItemInvalid => "Order item is missing required fields",
            ErrorCode::OrderTotalMismatch => "Order price breakdown does not add up",
            ErrorCode::InvalidOrderStatus => "Order status is not recognized",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::InsufficientStock => "Requested quantity exceeds available stock",

            // Cart
            ErrorCode::CartItemNotFound => "Cart item not found",

            // Review
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::ReviewExists => "You have already reviewed this product",
            ErrorCode::InvalidRating => "Rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2005 => Ok(ErrorCode::CannotDeleteAdmin),

            // User
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::PhoneExists),
            3003 => Ok(ErrorCode::InvalidGender),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderItemInvalid),
            4004 => Ok(ErrorCode::OrderTotalMismatch),
            4005 => Ok(ErrorCode::InvalidOrderStatus),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::InsufficientStock),

            // Cart
            7001 => Ok(ErrorCode::CartItemNotFound),

            // Review
            8001 => Ok(ErrorCode::ReviewNotFound),
            8002 => Ok(ErrorCode::ReviewExists),
            8003 => Ok(ErrorCode::InvalidRating),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
