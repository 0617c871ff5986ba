use embassy_time::{Duration, Timer};
use esp_hal::gpio::Input;

use crate::constants::{DEBOUNCE_MAX_READS, DEBOUNCE_MS};

/// Door position as reported by the two reed switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
    /// Neither switch engaged: the door is somewhere in between.
    Ajar,
    /// Both switches engaged at once, which the geometry makes impossible.
    /// Points at a shorted cable or a stuck switch.
    Fault,
}

impl DoorState {
    pub fn from_switches(open_engaged: bool, closed_engaged: bool) -> Self {
        match (open_engaged, closed_engaged) {
            (true, false) => Self::Open,
            (false, true) => Self::Closed,
            (false, false) => Self::Ajar,
            (true, true) => Self::Fault,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Ajar => "ajar",
            Self::Fault => "fault",
        }
    }
}

/// The reed switches connect their pin to ground when engaged, so both
/// inputs are pulled up and read active-low.
pub struct DoorSensors<'d> {
    open_switch: Input<'d>,
    closed_switch: Input<'d>,
}

impl<'d> DoorSensors<'d> {
    pub fn new(open_switch: Input<'d>, closed_switch: Input<'d>) -> Self {
        Self {
            open_switch,
            closed_switch,
        }
    }

    fn sample(&self) -> DoorState {
        DoorState::from_switches(self.open_switch.is_low(), self.closed_switch.is_low())
    }

    /// Reads the switches until two samples taken `DEBOUNCE_MS` apart agree.
    /// A door in motion can rattle the switches longer than we are willing
    /// to wait, so after `DEBOUNCE_MAX_READS` the latest sample wins.
    pub async fn settled_state(&self) -> DoorState {
        let mut last = self.sample();
        for _ in 0..DEBOUNCE_MAX_READS {
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
            let next = self.sample();
            if next == last {
                return next;
            }
            last = next;
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_switch_combinations() {
        assert_eq!(DoorState::from_switches(true, false), DoorState::Open);
        assert_eq!(DoorState::from_switches(false, true), DoorState::Closed);
        assert_eq!(DoorState::from_switches(false, false), DoorState::Ajar);
        assert_eq!(DoorState::from_switches(true, true), DoorState::Fault);
    }

    #[test]
    fn payload_strings_match_states() {
        assert_eq!(DoorState::Open.as_str(), "open");
        assert_eq!(DoorState::Closed.as_str(), "closed");
        assert_eq!(DoorState::Ajar.as_str(), "ajar");
        assert_eq!(DoorState::Fault.as_str(), "fault");
    }
}
