//! Request validation for journey operations.

use crate::error_handling::ServiceError;
use crate::models::Journey;

/// Largest id or user id the storage layer can hold.
const MAX_STORED_ID: u64 = i64::MAX as u64;

fn invalid(message: impl Into<String>) -> ServiceError {
    ServiceError::InvalidArgument(message.into())
}

/// Checks the fields a new journey must carry.
pub fn validate_new_journey(journey: &Journey) -> Result<(), ServiceError> {
    if journey.user_id == 0 {
        return Err(invalid("user_id must be greater than zero"));
    }
    if journey.user_id > MAX_STORED_ID {
        return Err(invalid(format!("user_id must not exceed {MAX_STORED_ID}")));
    }
    if journey.location.trim().is_empty() {
        return Err(invalid("location must not be blank"));
    }
    if journey.start_time > journey.end_time {
        return Err(invalid(format!(
            "start_time {} is after end_time {}",
            journey.start_time.to_rfc3339(),
            journey.end_time.to_rfc3339()
        )));
    }
    Ok(())
}

/// Like `validate_new_journey`, and the journey must reference a stored row.
pub fn validate_existing_journey(journey: &Journey) -> Result<(), ServiceError> {
    validate_id(journey.id)?;
    validate_new_journey(journey)
}

pub fn validate_id(id: u64) -> Result<(), ServiceError> {
    if id == 0 {
        return Err(invalid("journey id must be greater than zero"));
    }
    if id > MAX_STORED_ID {
        return Err(invalid(format!("journey id must not exceed {MAX_STORED_ID}")));
    }
    Ok(())
}

pub fn validate_limit(limit: u64) -> Result<(), ServiceError> {
    if limit == 0 {
        return Err(invalid("limit must be greater than zero"));
    }
    Ok(())
}

/// A batch must be non-empty and every element valid. Errors name the
/// offending position.
pub fn validate_batch(journeys: &[Journey]) -> Result<(), ServiceError> {
    if journeys.is_empty() {
        return Err(invalid("journeys must not be empty"));
    }
    for (index, journey) in journeys.iter().enumerate() {
        if let Err(ServiceError::InvalidArgument(reason)) = validate_new_journey(journey) {
            return Err(invalid(format!("journeys[{index}]: {reason}")));
        }
    }
    Ok(())
}
