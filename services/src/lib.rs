pub mod attendance_pipeline;
pub mod audit;
pub mod geofence;
pub mod selfie_storage;
pub mod venue_registry;
