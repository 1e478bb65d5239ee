//! Sensor identities and the messages exchanged with the rest of the system

/// Position of a rangefinder on the platform.
///
/// The discriminants double as indices into the bank and as the fixed
/// measurement order of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Sensor {
    Front = 0,
    Rear = 1,
    Left = 2,
    Right = 3,
}

impl Sensor {
    /// Number of sensors in the array
    pub const COUNT: usize = 4;

    /// All sensors in measurement order
    pub const ALL: [Sensor; Sensor::COUNT] = [Sensor::Front, Sensor::Rear, Sensor::Left, Sensor::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Sensor> {
        match index {
            0 => Some(Sensor::Front),
            1 => Some(Sensor::Rear),
            2 => Some(Sensor::Left),
            3 => Some(Sensor::Right),
            _ => None,
        }
    }
}

/// One distance reading, published once per sensor per cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub sensor: Sensor,
    /// Distance in millimeters, 0 means no echo within the capture window
    pub distance_mm: u16,
}

impl Reading {
    pub const fn no_echo(sensor: Sensor) -> Self {
        Self { sensor, distance_mm: 0 }
    }

    pub const fn is_no_echo(&self) -> bool {
        self.distance_mm == 0
    }
}

/// Ambient temperature update from whoever owns a thermometer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureUpdate {
    /// Tenths of a degree Celsius. The 16 bits are read as two's complement,
    /// so values above `i16::MAX` are temperatures below zero.
    pub temperature_tenths_celsius: u16,
}

impl TemperatureUpdate {
    pub const fn from_tenths(tenths: i16) -> Self {
        Self {
            temperature_tenths_celsius: tenths as u16,
        }
    }

    pub const fn tenths(&self) -> i16 {
        self.temperature_tenths_celsius as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_measurement_order() {
        for (i, sensor) in Sensor::ALL.iter().enumerate() {
            assert_eq!(sensor.index(), i);
            assert_eq!(Sensor::from_index(i), Some(*sensor));
        }
        assert_eq!(Sensor::from_index(Sensor::COUNT), None);
    }

    #[test]
    fn temperature_wire_value_is_signed() {
        assert_eq!(TemperatureUpdate { temperature_tenths_celsius: 280 }.tenths(), 280);
        let frost = TemperatureUpdate::from_tenths(-55);
        assert_eq!(frost.temperature_tenths_celsius, 0xFFC9);
        assert_eq!(frost.tenths(), -55);
    }
}
