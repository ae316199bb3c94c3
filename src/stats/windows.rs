//! Lookback windows
//!
//! Windows nest: anything inside 5 minutes is also inside 15 minutes, one
//! hour and one day.

use serde::Serialize;

/// One of the four lookback windows used to bucket requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Window {
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    OneDay,
}

impl Window {
    /// All windows, smallest first
    pub const ALL: [Window; 4] = [
        Window::FiveMinutes,
        Window::FifteenMinutes,
        Window::OneHour,
        Window::OneDay,
    ];

    /// Window length in seconds
    pub fn seconds(self) -> f64 {
        match self {
            Window::FiveMinutes => 5.0 * 60.0,
            Window::FifteenMinutes => 15.0 * 60.0,
            Window::OneHour => 60.0 * 60.0,
            Window::OneDay => 24.0 * 60.0 * 60.0,
        }
    }

    /// Column label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Window::FiveMinutes => "5m",
            Window::FifteenMinutes => "15m",
            Window::OneHour => "1h",
            Window::OneDay => "1d",
        }
    }

    /// Smallest window a request `elapsed` seconds old falls into
    ///
    /// Returns `None` for requests a day old or older.
    pub fn smallest_containing(elapsed: f64) -> Option<Window> {
        Self::ALL.into_iter().find(|window| elapsed < window.seconds())
    }
}

/// Request counts per window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowCounts {
    #[serde(rename = "5m")]
    pub five_minutes: u64,
    #[serde(rename = "15m")]
    pub fifteen_minutes: u64,
    #[serde(rename = "1h")]
    pub one_hour: u64,
    #[serde(rename = "1d")]
    pub one_day: u64,
}

impl WindowCounts {
    /// Count a request `elapsed` seconds old in every window containing it
    pub fn record(&mut self, elapsed: f64) {
        let Some(smallest) = Window::smallest_containing(elapsed) else {
            return;
        };
        for window in Window::ALL.into_iter().filter(|w| *w >= smallest) {
            *self.counter_mut(window) += 1;
        }
    }

    /// Count for a single window
    pub fn get(&self, window: Window) -> u64 {
        match window {
            Window::FiveMinutes => self.five_minutes,
            Window::FifteenMinutes => self.fifteen_minutes,
            Window::OneHour => self.one_hour,
            Window::OneDay => self.one_day,
        }
    }

    /// Report ordering key: day, then hour, 15 minutes, 5 minutes
    pub fn sort_key(&self) -> (u64, u64, u64, u64) {
        (
            self.one_day,
            self.one_hour,
            self.fifteen_minutes,
            self.five_minutes,
        )
    }

    fn counter_mut(&mut self, window: Window) -> &mut u64 {
        match window {
            Window::FiveMinutes => &mut self.five_minutes,
            Window::FifteenMinutes => &mut self.fifteen_minutes,
            Window::OneHour => &mut self.one_hour,
            Window::OneDay => &mut self.one_day,
        }
    }
}

impl std::ops::AddAssign for WindowCounts {
    fn add_assign(&mut self, other: Self) {
        for window in Window::ALL {
            *self.counter_mut(window) += other.get(window);
        }
    }
}
