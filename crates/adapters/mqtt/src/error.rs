//! MQTT adapter error types.

use thermohub_domain::error::{ThermohubError, ValidationError};

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// Failed to parse an incoming MQTT payload as JSON.
    #[error("failed to parse MQTT payload: {0}")]
    PayloadParse(#[source] serde_json::Error),

    /// The topic does not end with a sensor address.
    #[error("topic {0:?} does not name a sensor")]
    Topic(String),

    /// A domain-level validation error.
    #[error("domain error: {0}")]
    Domain(#[source] ThermohubError),
}

impl MqttError {
    /// Convert into a [`ThermohubError::Storage`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> ThermohubError {
        match self {
            Self::Domain(err) => err,
            other => ThermohubError::Storage(Box::new(other)),
        }
    }
}

impl From<ValidationError> for MqttError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<MqttError> for ThermohubError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_topic_error() {
        let err = MqttError::Topic("thermobeacon".to_string());
        assert_eq!(err.to_string(), "topic \"thermobeacon\" does not name a sensor");
    }

    #[test]
    fn should_convert_topic_error_to_storage_error() {
        let err: ThermohubError = MqttError::Topic(String::new()).into();
        assert!(matches!(err, ThermohubError::Storage(_)));
    }

    #[test]
    fn should_convert_domain_error_back_to_domain() {
        let mqtt_err = MqttError::from(ValidationError::EmptyName);
        let back: ThermohubError = mqtt_err.into();
        assert!(matches!(back, ThermohubError::Validation(_)));
    }

    #[test]
    fn should_display_payload_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err = MqttError::PayloadParse(json_err);
        assert!(err.to_string().starts_with("failed to parse MQTT payload: "));
    }
}
