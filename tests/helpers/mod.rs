/// Test doubles to simulate the CAN-FD controller and the measurement
/// ADC during integration tests.
use powerdist::infra::measure::{PowerMonitorAdc, RawSamples};
use powerdist::protocol::transport::can_frame::FdFrame;
use powerdist::protocol::transport::traits::fdcan_driver::{CanStatus, FdCanDriver};
use std::collections::VecDeque;

#[derive(Default)]
#[allow(dead_code)]
/// In-memory CAN-FD controller reproducing the `FdCanDriver` behavior:
/// sent frames are recorded, received frames are served from a queue.
pub struct MockFdCan {
    pub sent: Vec<(u32, Vec<u8>)>,
    pub inbox: VecDeque<(u32, Vec<u8>)>,
    pub bus_off: bool,
    pub recoveries: usize,
}

#[allow(dead_code)]
impl MockFdCan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame for the next poll.
    pub fn push_rx(&mut self, id: u32, payload: &[u8]) {
        self.inbox.push_back((id, payload.to_vec()));
    }
}

impl FdCanDriver for MockFdCan {
    fn send(&mut self, id: u32, data: &[u8]) {
        self.sent.push((id, data.to_vec()));
    }

    fn poll(&mut self, frame: &mut FdFrame) -> bool {
        match self.inbox.pop_front() {
            Some((id, payload)) => {
                frame.id = id;
                frame.data[..payload.len()].copy_from_slice(&payload);
                frame.len = payload.len();
                true
            }
            None => false,
        }
    }

    fn status(&self) -> CanStatus {
        CanStatus {
            bus_off: self.bus_off,
        }
    }

    fn recover_bus_off(&mut self) {
        self.bus_off = false;
        self.recoveries += 1;
    }
}

#[allow(dead_code)]
/// Scriptable ADC double: serves a fixed sample set and a fixed
/// current-sense idle code for the boot offset capture.
pub struct MockAdc {
    pub samples: RawSamples,
    pub idle_current_code: u16,
}

#[allow(dead_code)]
impl MockAdc {
    /// Quiet board: nothing energized, current sense resting at its
    /// bias point.
    pub fn quiet() -> Self {
        Self {
            samples: RawSamples {
                output_voltage: 0,
                input_voltage: 0,
                current: 2048,
                temperature: 2000,
            },
            idle_current_code: 2048,
        }
    }
}

impl PowerMonitorAdc for MockAdc {
    fn sample(&mut self) -> RawSamples {
        self.samples
    }

    fn sample_current_raw(&mut self) -> u16 {
        self.idle_current_code
    }
}
