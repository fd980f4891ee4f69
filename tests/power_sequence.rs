//! Integration scenarios for the run-loop controller: power-up
//! sequencing, fault handling, lock hold, energy gating, and bus-off
//! supervision.
mod helpers;

use helpers::{MockAdc, MockFdCan};
use powerdist::device::config::NodeConfig;
use powerdist::device::controller::{Controller, LoopInputs};
use powerdist::infra::measure::RawSamples;
use powerdist::protocol::command::handle_command;
use powerdist::protocol::power::{FaultMailbox, PowerState, SHUTDOWN_TIMEOUT_MS};
use powerdist::protocol::transport::datagram::DatagramHeader;

type TestController<'a> = Controller<'a, MockFdCan, fn(DatagramHeader, &[u8]), MockAdc>;

const OFF: LoopInputs = LoopInputs {
    switch_on: false,
    fault_indicator: false,
};
const SWITCH_ON: LoopInputs = LoopInputs {
    switch_on: true,
    fault_indicator: false,
};
const HEALTHY: LoopInputs = LoopInputs {
    switch_on: true,
    fault_indicator: true,
};

/// Drive the loop once per millisecond over `range`.
fn run_span(controller: &mut TestController, inputs: LoopInputs, from_ms: u32, to_ms: u32) {
    for now in from_ms..to_ms {
        controller.run_once(inputs, now);
    }
}

#[test]
/// Boot captures the current-sense offset before anything energizes.
fn test_boot_offset_capture() {
    let mailbox = FaultMailbox::new();
    let controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    assert_eq!(controller.status().current_offset, 2048);
    assert_eq!(controller.status().state, PowerState::PowerOff);

    // Identity defaults are in place for the telemetry collaborator.
    assert_eq!(controller.config().id, NodeConfig::DEFAULT_ID);
    assert!(!controller.firmware().version.is_empty());
}

#[test]
/// Full nominal sequence: off, precharge, on, and back off with the
/// secondary rail held up.
fn test_nominal_power_sequence() {
    let mailbox = FaultMailbox::new();
    let mut controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    controller.run_once(OFF, 1);
    assert_eq!(controller.status().state, PowerState::PowerOff);

    // Switch on: one evaluation arms the precharge window.
    controller.run_once(SWITCH_ON, 2);
    assert_eq!(controller.status().state, PowerState::Precharging);
    assert!(controller.status().precharge_timeout_ms > 0);

    // Hot-swap controller reports healthy: next evaluation energizes.
    controller.run_once(HEALTHY, 3);
    assert_eq!(controller.status().state, PowerState::PowerOn);
    assert_eq!(controller.status().fault_code, 0);
    // The same iteration's millisecond tick may already have run.
    assert!(controller.status().shutdown_timeout_ms >= SHUTDOWN_TIMEOUT_MS - 1);

    // Outputs reflect the energized state on the following cycle.
    let outputs = controller.run_once(HEALTHY, 4);
    assert!(outputs.power_override);
    assert!(outputs.status_led);

    // Switch off: power drops, the secondary rail holds up while the
    // shutdown countdown runs.
    controller.run_once(OFF, 5);
    assert_eq!(controller.status().state, PowerState::PowerOff);
    let outputs = controller.run_once(OFF, 6);
    assert!(!outputs.power_override);
    assert!(outputs.aux_override);
}

#[test]
/// The precharge window expiring without a healthy indicator latches
/// fault code 1 until the switch is cycled.
fn test_precharge_timeout_latches_fault() {
    let mailbox = FaultMailbox::new();
    let mut controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    controller.run_once(SWITCH_ON, 1);
    assert_eq!(controller.status().state, PowerState::Precharging);

    // 100 ms of switch held on, indicator never healthy.
    run_span(&mut controller, SWITCH_ON, 2, 105);
    assert_eq!(controller.status().state, PowerState::Fault);
    assert_eq!(controller.status().fault_code, 1);

    // Holding the switch changes nothing.
    run_span(&mut controller, SWITCH_ON, 105, 150);
    assert_eq!(controller.status().state, PowerState::Fault);

    // Cycling the switch clears the fault.
    controller.run_once(OFF, 150);
    assert_eq!(controller.status().state, PowerState::PowerOff);
}

#[test]
/// Losing the fault indicator while energized faults with code 2.
fn test_indicator_loss_faults() {
    let mailbox = FaultMailbox::new();
    let mut controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    controller.run_once(SWITCH_ON, 1);
    controller.run_once(HEALTHY, 2);
    assert_eq!(controller.status().state, PowerState::PowerOn);

    controller.run_once(SWITCH_ON, 3);
    assert_eq!(controller.status().state, PowerState::Fault);
    assert_eq!(controller.status().fault_code, 2);
}

#[test]
/// An interrupt-posted escalation beats the loop's own evaluation and
/// records fault code 3.
fn test_interrupt_escalation_wins_cycle() {
    let mailbox = FaultMailbox::new();
    let mut controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    controller.run_once(SWITCH_ON, 1);
    controller.run_once(HEALTHY, 2);
    assert_eq!(controller.status().state, PowerState::PowerOn);

    // Falling edge fires between loop iterations.
    mailbox.escalate();

    // Inputs still look healthy, yet the drained escalation wins.
    controller.run_once(HEALTHY, 3);
    assert_eq!(controller.status().state, PowerState::Fault);
    assert_eq!(controller.status().fault_code, 3);
}

#[test]
/// A held lock keeps the output energized after switch-off and
/// releases once its 100 ms ticks count out.
fn test_lock_holds_output() {
    let mailbox = FaultMailbox::new();
    let mut controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    controller.run_once(SWITCH_ON, 1);
    controller.run_once(HEALTHY, 2);
    assert_eq!(controller.status().state, PowerState::PowerOn);

    assert_eq!(handle_command("lock 2", controller.status_mut()), "OK\r\n");

    // Switch off with the lock held: stays energized across the first
    // 100 ms boundary...
    let released = LoopInputs {
        switch_on: false,
        fault_indicator: true,
    };
    run_span(&mut controller, released, 3, 200);
    assert_eq!(controller.status().state, PowerState::PowerOn);

    // ...and powers down once the lock reaches zero.
    run_span(&mut controller, released, 200, 302);
    assert_eq!(controller.status().lock_time_100ms, 0);
    assert_eq!(controller.status().state, PowerState::PowerOff);
}

#[test]
/// With the output rail below the 4 V gate, hours of loop time never
/// move the energy counter.
fn test_energy_never_accumulates_below_gate() {
    let mailbox = FaultMailbox::new();
    let mut adc = MockAdc::quiet();
    // Output measurably alive but under the gate; input rail hot.
    adc.samples = RawSamples {
        output_voltage: 290,  // about 3.7 V through the divider
        input_voltage: 1861,  // about 24 V
        current: 1500,
        temperature: 2000,
    };
    let mut controller: TestController = Controller::new(MockFdCan::new(), adc, &mailbox);

    run_span(&mut controller, HEALTHY, 1, 5000);

    assert_eq!(controller.status().energy_uw_hr, 0);
    assert!(controller.status().output_voltage_v < 4.0);
    assert!(controller.status().output_voltage_v > 3.0);
}

#[test]
/// A bus-off condition is noticed at the 100 ms boundary and recovered
/// exactly once.
fn test_bus_off_recovery() {
    let mailbox = FaultMailbox::new();
    let mut controller: TestController =
        Controller::new(MockFdCan::new(), MockAdc::quiet(), &mailbox);

    controller.transport_mut().driver_mut().bus_off = true;

    // Not yet at a boundary: nothing happens.
    run_span(&mut controller, OFF, 1, 100);
    assert_eq!(controller.transport_mut().driver_mut().recoveries, 0);

    // The boundary triggers the controller's recovery routine.
    controller.run_once(OFF, 100);
    assert_eq!(controller.transport_mut().driver_mut().recoveries, 1);
    assert!(!controller.transport_mut().driver_mut().bus_off);
}
