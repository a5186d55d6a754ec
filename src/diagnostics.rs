//! Port and mode probing sweeps.
//!
//! When a hub's layout is unknown (e.g. a new generation), the quickest way to
//! find its devices is to write values to a range of ports and modes and watch
//! what the train does. [`OutputProbe`] and [`InputProbe`] describe such sweeps;
//! [`TrainSession::probe_outputs`] and [`TrainSession::probe_inputs`] run them.
//!
//! | Fixed | Output sweep | Input sweep |
//! |-------|--------------|-------------|
//! | port and value / mode | one frame | one frame |
//! | value / mode only | ports `0x00..=0x1f`, 500 ms apart | ports `0x00..=0x1f`, 500 ms apart |
//! | port only | values `0x00..=0x4f`, 500 ms apart | modes `0x00..=0x4f`, 500 ms apart |
//! | nothing | ports `0x00..=0x4f` × values `0x00..=0x0f` × modes `0..=7`, 100 ms apart | ports `0x00..=0x4f` × modes `0x00..=0x0f`, 100 ms apart |
//!
//! ```rust
//! use duplo_hub::diagnostics::OutputProbe;
//!
//! let probe = OutputProbe::new().with_port(0x11);
//! assert_eq!(probe.steps().count(), 0x50);
//! assert_eq!(probe.pause_ms(), 500);
//! ```
//!
//! [`TrainSession::probe_outputs`]: crate::TrainSession::probe_outputs
//! [`TrainSession::probe_inputs`]: crate::TrainSession::probe_inputs

use core::ops::RangeInclusive;

/// Pause between steps of a targeted sweep.
pub const SWEEP_PAUSE_MS: u32 = 500;

/// Pause between steps of an exhaustive grid.
pub const GRID_PAUSE_MS: u32 = 100;

const PORT_SWEEP: RangeInclusive<u8> = 0x00..=0x1f;
const VALUE_SWEEP: RangeInclusive<u8> = 0x00..=0x4f;
const GRID_PORTS: RangeInclusive<u8> = 0x00..=0x4f;
const GRID_VALUES: RangeInclusive<u8> = 0x00..=0x0f;
const GRID_OUTPUT_MODES: RangeInclusive<u8> = 0x00..=0x07;
const GRID_INPUT_MODES: RangeInclusive<u8> = 0x00..=0x0f;

/// One output write of a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputStep {
    /// Target port.
    pub port: u8,
    /// Output mode.
    pub mode: u8,
    /// Value written.
    pub value: u8,
}

/// One input subscription of a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputStep {
    /// Target port.
    pub port: u8,
    /// Input mode.
    pub mode: u8,
}

/// Sweep of output commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputProbe {
    /// Fixed port, or sweep ports.
    pub port: Option<u8>,
    /// Fixed value, or sweep values.
    pub value: Option<u8>,
    /// Mode used unless the sweep is exhaustive.
    pub mode: u8,
}

impl OutputProbe {
    /// Exhaustive grid over ports, values, and modes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the port.
    pub fn with_port(mut self, port: u8) -> Self {
        self.port = Some(port);
        self
    }

    /// Fix the value.
    pub fn with_value(mut self, value: u8) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the mode for targeted sweeps.
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }

    fn axes(&self) -> (RangeInclusive<u8>, RangeInclusive<u8>, RangeInclusive<u8>) {
        let mode = self.mode..=self.mode;
        match (self.port, self.value) {
            (Some(p), Some(v)) => (p..=p, v..=v, mode),
            (None, Some(v)) => (PORT_SWEEP, v..=v, mode),
            (Some(p), None) => (p..=p, VALUE_SWEEP, mode),
            (None, None) => (GRID_PORTS, GRID_VALUES, GRID_OUTPUT_MODES),
        }
    }

    /// Writes in sweep order: port-major, then value, then mode.
    pub fn steps(&self) -> impl Iterator<Item = OutputStep> {
        let (ports, values, modes) = self.axes();
        ports.flat_map(move |port| {
            let modes = modes.clone();
            values.clone().flat_map(move |value| {
                modes
                    .clone()
                    .map(move |mode| OutputStep { port, mode, value })
            })
        })
    }

    /// Pause after each step.
    pub fn pause_ms(&self) -> u32 {
        if self.port.is_none() && self.value.is_none() {
            GRID_PAUSE_MS
        } else {
            SWEEP_PAUSE_MS
        }
    }
}

/// Sweep of input subscriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputProbe {
    /// Fixed port, or sweep ports.
    pub port: Option<u8>,
    /// Fixed mode, or sweep modes.
    pub mode: Option<u8>,
}

impl InputProbe {
    /// Exhaustive grid over ports and modes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the port.
    pub fn with_port(mut self, port: u8) -> Self {
        self.port = Some(port);
        self
    }

    /// Fix the mode.
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = Some(mode);
        self
    }

    fn axes(&self) -> (RangeInclusive<u8>, RangeInclusive<u8>) {
        match (self.port, self.mode) {
            (Some(p), Some(m)) => (p..=p, m..=m),
            (None, Some(m)) => (PORT_SWEEP, m..=m),
            (Some(p), None) => (p..=p, VALUE_SWEEP),
            (None, None) => (GRID_PORTS, GRID_INPUT_MODES),
        }
    }

    /// Subscriptions in sweep order: port-major, then mode.
    pub fn steps(&self) -> impl Iterator<Item = InputStep> {
        let (ports, modes) = self.axes();
        ports.flat_map(move |port| modes.clone().map(move |mode| InputStep { port, mode }))
    }

    /// Pause after each step.
    pub fn pause_ms(&self) -> u32 {
        if self.port.is_none() && self.mode.is_none() {
            GRID_PAUSE_MS
        } else {
            SWEEP_PAUSE_MS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn single_output_step() {
        let probe = OutputProbe::new().with_port(0x29).with_value(40);
        let steps: Vec<_> = probe.steps().collect();
        assert_eq!(
            steps,
            [OutputStep {
                port: 0x29,
                mode: 0,
                value: 40
            }]
        );
        assert_eq!(probe.pause_ms(), SWEEP_PAUSE_MS);
    }

    #[test]
    fn value_fixed_sweeps_ports() {
        let probe = OutputProbe::new().with_value(9).with_mode(1);
        let steps: Vec<_> = probe.steps().collect();
        assert_eq!(steps.len(), 0x20);
        assert_eq!(steps[0].port, 0x00);
        assert_eq!(steps[0x1f].port, 0x1f);
        assert!(steps.iter().all(|s| s.value == 9 && s.mode == 1));
    }

    #[test]
    fn port_fixed_sweeps_values() {
        let probe = OutputProbe::new().with_port(0x01).with_mode(1);
        let values: Vec<_> = probe.steps().map(|s| s.value).collect();
        assert_eq!(values.len(), 0x50);
        assert_eq!(values.first(), Some(&0));
        assert_eq!(values.last(), Some(&0x4f));
    }

    #[test]
    fn exhaustive_output_grid() {
        let probe = OutputProbe::new();
        assert_eq!(probe.steps().count(), 0x50 * 0x10 * 8);
        assert_eq!(probe.pause_ms(), GRID_PAUSE_MS);

        let first: Vec<_> = probe.steps().take(9).collect();
        // Mode varies fastest
        assert_eq!(first[1], OutputStep { port: 0, mode: 1, value: 0 });
        assert_eq!(first[8], OutputStep { port: 0, mode: 0, value: 1 });
    }

    #[test]
    fn fixed_port_at_top_of_range() {
        let probe = OutputProbe::new().with_port(0xff).with_value(0xff);
        assert_eq!(probe.steps().count(), 1);
    }

    #[test]
    fn input_sweeps() {
        assert_eq!(InputProbe::new().with_port(0x12).with_mode(3).steps().count(), 1);
        assert_eq!(InputProbe::new().with_mode(3).steps().count(), 0x20);
        assert_eq!(InputProbe::new().with_port(0x12).steps().count(), 0x50);

        let grid = InputProbe::new();
        assert_eq!(grid.steps().count(), 0x50 * 0x10);
        assert_eq!(grid.pause_ms(), GRID_PAUSE_MS);
        assert_eq!(InputProbe::new().with_mode(1).pause_ms(), SWEEP_PAUSE_MS);
    }
}
