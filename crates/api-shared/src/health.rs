use crate::dto::HealthRes;

/// Health check shared by the API surfaces
///
/// This service provides a standardised way to check the health status of the Quill service.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Check health
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Quill is alive".into(),
        }
    }
}
