pub mod m202608250001_create_institutions;
pub mod m202608250002_create_venues;
pub mod m202608250003_create_qr_sessions;
pub mod m202608250004_create_attendances;
pub mod m202608250005_create_flagged_logs;
pub mod m202608250006_create_admin_users;
