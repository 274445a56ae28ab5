pub mod admin_user;
pub mod attendance;
pub mod institution;
pub mod qr_session;
pub mod venue;
