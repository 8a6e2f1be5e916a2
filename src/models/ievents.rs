//! # Accessory Events

//! Outbound characteristic updates surfaced to observers and inbound events
//! (user commands and sensor readings) routed to the accessory.

use serde::{Deserialize, Serialize};
use derive_more::Display;
use crate::models::{DoorCurrentState, DoorTargetState, LockCurrentState, LockTargetState};

/// The identifier carried by the door-open sensor feed.
pub const DOOR_OPEN_SENSOR_STATE: &str = "door_open_sensor_state";

/// The four characteristics an external observer can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Characteristic {
    #[display("CurrentDoorState")]
    DoorCurrentState,
    #[display("TargetDoorState")]
    DoorTargetState,
    #[display("LockCurrentState")]
    LockCurrentState,
    #[display("LockTargetState")]
    LockTargetState,
}

/// A characteristic together with the value it now holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacteristicUpdate {
    DoorCurrentState(DoorCurrentState),
    DoorTargetState(DoorTargetState),
    LockCurrentState(LockCurrentState),
    LockTargetState(LockTargetState),
}

impl CharacteristicUpdate {
    pub fn characteristic(&self) -> Characteristic {
        match self {
            CharacteristicUpdate::DoorCurrentState(_) => Characteristic::DoorCurrentState,
            CharacteristicUpdate::DoorTargetState(_) => Characteristic::DoorTargetState,
            CharacteristicUpdate::LockCurrentState(_) => Characteristic::LockCurrentState,
            CharacteristicUpdate::LockTargetState(_) => Characteristic::LockTargetState,
        }
    }

    /// The new value rendered for logs.
    pub fn value(&self) -> String {
        match self {
            CharacteristicUpdate::DoorCurrentState(s) => s.to_string(),
            CharacteristicUpdate::DoorTargetState(s) => s.to_string(),
            CharacteristicUpdate::LockCurrentState(s) => s.to_string(),
            CharacteristicUpdate::LockTargetState(s) => s.to_string(),
        }
    }
}

/// A raw message from the sensor feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorEvent {
    /// The topic-like identifier the message arrived on
    pub identifier: String,
    /// The message body, expected to be the text `on` or `off`
    pub payload: Vec<u8>,
}

impl SensorEvent {
    pub fn new(identifier: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            identifier: identifier.into(),
            payload: payload.into(),
        }
    }
}

/// Everything the accessory can be asked to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessoryEvent {
    SetDoorTarget(DoorTargetState),
    SetLockTarget(LockTargetState),
    Sensor(SensorEvent),
}

impl std::str::FromStr for AccessoryEvent {
    type Err = String;

    /// Parses a line of the console driver's command language.
    ///
    /// `open`, `close`, `lock` and `unlock` are user commands (case-insensitive);
    /// `sensor <identifier> <payload>` injects a raw sensor message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or_else(|| "Empty command".to_string())?;

        let event = match verb.to_lowercase().as_str() {
            "open" => AccessoryEvent::SetDoorTarget(DoorTargetState::Open),
            "close" => AccessoryEvent::SetDoorTarget(DoorTargetState::Closed),
            "lock" => AccessoryEvent::SetLockTarget(LockTargetState::Secured),
            "unlock" => AccessoryEvent::SetLockTarget(LockTargetState::Unsecured),
            "sensor" => {
                let identifier = parts.next()
                    .ok_or_else(|| "sensor command requires an identifier".to_string())?;
                let payload = parts.next()
                    .ok_or_else(|| "sensor command requires a payload".to_string())?;
                AccessoryEvent::Sensor(SensorEvent::new(identifier, payload.as_bytes()))
            }
            _ => return Err(format!("Unknown command: {}", s.trim())),
        };

        if let Some(extra) = parts.next() {
            return Err(format!("Unexpected argument: {}", extra));
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_commands() {
        assert_eq!("open".parse::<AccessoryEvent>(), Ok(AccessoryEvent::SetDoorTarget(DoorTargetState::Open)));
        assert_eq!(" CLOSE ".parse::<AccessoryEvent>(), Ok(AccessoryEvent::SetDoorTarget(DoorTargetState::Closed)));
        assert_eq!("unlock".parse::<AccessoryEvent>(), Ok(AccessoryEvent::SetLockTarget(LockTargetState::Unsecured)));
    }

    #[test]
    fn parses_sensor_messages() {
        let event: AccessoryEvent = "sensor door_open_sensor_state on".parse().unwrap();
        assert_eq!(event, AccessoryEvent::Sensor(SensorEvent::new(DOOR_OPEN_SENSOR_STATE, "on")));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!("".parse::<AccessoryEvent>().is_err());
        assert!("sensor door_open_sensor_state".parse::<AccessoryEvent>().is_err());
        assert!("open now".parse::<AccessoryEvent>().is_err());
        assert!("jump".parse::<AccessoryEvent>().is_err());
    }
}
