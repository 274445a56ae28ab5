pub mod admin_user;
pub mod attendance_record;
pub mod attendance_session;
pub mod flagged_log;
pub mod institution;
pub mod venue;
