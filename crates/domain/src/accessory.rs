//! Logical accessory: the persisted, host-visible record of one sensor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::AccessoryId;
use crate::sensor::SensorIdentity;
use crate::time::{Timestamp, now};

/// A host-visible device entry backed by one physical sensor.
///
/// The `id` is derived from the sensor address and never changes. The
/// `display_name` is set when the accessory is first created and is not
/// overwritten on restore, even if the configured name changed since.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalAccessory {
    pub id: AccessoryId,
    pub display_name: String,
    /// The sensor identity this accessory was created from.
    pub context: SensorIdentity,
    pub created_at: Timestamp,
}

impl LogicalAccessory {
    /// Create a builder for constructing a [`LogicalAccessory`].
    #[must_use]
    pub fn builder() -> LogicalAccessoryBuilder {
        LogicalAccessoryBuilder::default()
    }

    /// A brand-new accessory for a configured sensor.
    #[must_use]
    pub fn from_identity(identity: SensorIdentity) -> Self {
        Self {
            id: identity.accessory_id(),
            display_name: identity.name.clone(),
            context: identity,
            created_at: now(),
        }
    }

    /// Validate domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if the display name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.display_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Step-by-step builder for [`LogicalAccessory`].
#[derive(Debug, Default)]
pub struct LogicalAccessoryBuilder {
    id: Option<AccessoryId>,
    display_name: Option<String>,
    context: Option<SensorIdentity>,
    created_at: Option<Timestamp>,
}

impl LogicalAccessoryBuilder {
    #[must_use]
    pub fn id(mut self, id: AccessoryId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn context(mut self, context: SensorIdentity) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder and return a validated [`LogicalAccessory`].
    ///
    /// The id defaults to the one derived from the context address and the
    /// display name defaults to the context name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when no context was given or
    /// the resulting display name is blank.
    pub fn build(self) -> Result<LogicalAccessory, ValidationError> {
        let context = self.context.ok_or(ValidationError::EmptyName)?;
        let accessory = LogicalAccessory {
            id: self.id.unwrap_or_else(|| context.accessory_id()),
            display_name: self.display_name.unwrap_or_else(|| context.name.clone()),
            context,
            created_at: self.created_at.unwrap_or_else(now),
        };
        accessory.validate()?;
        Ok(accessory)
    }
}
