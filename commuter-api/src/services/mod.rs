pub mod profile_service;
pub mod report_service;
