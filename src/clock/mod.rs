use chrono::{Local, Timelike};

/// Hour and minute of a wall-clock reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub hour: u32,
    pub minute: u32,
}

/// A source of the current time of day
pub trait Clock: Send + Sync {
    fn now(&self) -> WallTime;
}

/// Reads the local time of the host, without timezone conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        let now = Local::now();
        WallTime {
            hour: now.hour(),
            minute: now.minute(),
        }
    }
}

/// Always reports the same time
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub WallTime);

#[cfg(test)]
impl FixedClock {
    pub fn at(hour: u32, minute: u32) -> Self {
        Self(WallTime { hour, minute })
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> WallTime {
        self.0
    }
}
