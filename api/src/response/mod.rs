use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// Every endpoint returns this structure:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// Rejections from the attendance pipeline additionally carry a stable
/// machine-readable `error` code and, where useful, a structured `details`
/// object:
/// ```json
/// {
///   "success": false,
///   "data": {},
///   "message": "Attendance already marked for this session",
///   "error": "DUPLICATE_ATTENDANCE",
///   "details": { "first_marked_at": "2026-08-25T09:00:00+00:00" }
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error: None,
            details: None,
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            error: None,
            details: None,
        }
    }

    /// Constructs an error response carrying a machine-readable code and an
    /// optional structured payload alongside the human-readable message.
    pub fn error_with_code(
        message: impl Into<String>,
        code: &'static str,
        details: Option<serde_json::Value>,
    ) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            error: Some(code),
            details,
        }
    }
}
