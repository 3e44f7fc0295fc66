//! Gateway types module
//!
//! ## Input Types
//! - Request bodies for the session mutation routes
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`SessionSnapshot`]: derived session view returned by every session route
//!
//! ## Submodules
//! - [`requests`]: request bodies
//! - [`response`]: response envelope, error plumbing and error codes
//! - [`snapshot`]: derived session views

pub mod requests;
pub mod response;
pub mod snapshot;

// Re-export commonly used types at module root
pub use requests::{SetDescriptionRequest, SetGroupRequest, SetPayerRequest, UpdateShareRequest};
pub use response::{ApiError, ApiResponse, ApiResult, error_codes, ok};
pub use snapshot::{ItemView, SessionSnapshot, UnassignedData, UserSummaryRow};
