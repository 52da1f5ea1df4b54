// Licensed under the Apache-2.0 license

#[cfg(test)]
mod common;

use common::{fast_config, observe, setup};
use emulator_consts::{PHY_TRAINING_CYCLES, PLL_MAX_LOCK_TIME_US};
use emulator_crg::{
    ClockDomain, ClockStatus, Crg, CrgConfig, DramPhyInit, HandshakePort, ScriptedPhyInit,
    SequencerState, Soc,
};

#[test]
fn test_48mhz_bring_up() {
    setup();
    let config = CrgConfig::default();
    let mut soc = Soc::new(&config, ScriptedPhyInit::new(PHY_TRAINING_CYCLES)).unwrap();
    let tb = *soc.crg().timebase();

    let pll = soc.crg().pll().config();
    assert_eq!(pll.clkout_freq(), 96e6);
    assert_eq!((pll.idiv, pll.fbdiv, pll.odiv), (9, 32, 8));

    assert!(soc.run_until_state(SequencerState::Running, tb.from_micros(5_000.0)));
    let path: Vec<_> = soc.transitions().iter().map(|t| t.to).collect();
    assert_eq!(path, [SequencerState::PllWait, SequencerState::Running]);

    let entered_wait = soc.transitions()[0].time;
    let running = soc.transitions()[1].time;
    assert_eq!(entered_wait, tb.ref_cycles(65_535));
    assert!(running - entered_wait >= tb.from_micros(PLL_MAX_LOCK_TIME_US));

    let start = soc.crg().now();
    let steps = observe(&mut soc, start + tb.from_micros(10.0));
    let sys_times: Vec<u64> = steps
        .iter()
        .filter(|o| o.step.sys)
        .map(|o| o.step.time)
        .collect();
    assert!((479..=481).contains(&sys_times.len()));
    for pair in sys_times.windows(2) {
        let period = pair[1] - pair[0];
        assert_eq!(period, tb.pll_cycles(2));
        let freq = tb.units_per_second() / period as f64;
        assert!((freq - 48e6).abs() / 48e6 <= config.pll_margin);
    }

    let crg = soc.crg();
    assert!(crg.domain(ClockDomain::Sys).is_usable());
    assert!(crg.domain(ClockDomain::Sys2x).is_usable());
    assert!(!crg.domain(ClockDomain::Init).reset);
    assert_eq!(crg.domain(ClockDomain::Por).clock, ClockStatus::Running);
}

#[test]
fn test_por_delay_for_widths() {
    for width in [1, 3, 8, 12] {
        let config = CrgConfig {
            por_width: width,
            ..Default::default()
        };
        let mut soc = Soc::new(&config, ScriptedPhyInit::new(1)).unwrap();
        let tb = *soc.crg().timebase();
        let stable_at = tb.ref_cycles((1u64 << width) - 1);
        soc.run_until(stable_at - 1);
        assert!(!soc.crg().power_stable(), "W={width}");
        assert_eq!(soc.crg().state(), SequencerState::Init);
        soc.run_until(stable_at);
        assert!(soc.crg().power_stable(), "W={width}");
        assert_eq!(soc.crg().state(), SequencerState::PllWait);
    }
}

#[test]
fn test_stall_for_n_cycles() {
    setup();
    const STALL_AT: u64 = 1_000;
    const STALL_LEN: u64 = 50;
    let config = fast_config();
    let phy = ScriptedPhyInit::new(100).with_calibration(STALL_AT, STALL_LEN);
    let mut soc = Soc::new(&config, phy).unwrap();
    let tb = *soc.crg().timebase();

    assert!(soc.run_until_state(SequencerState::Running, tb.ref_cycles(1_000)));
    assert!(soc.phy().cycle() < STALL_AT);

    let steps = observe(&mut soc, tb.ref_cycles(1_500));
    let stalled_ref_edges = steps
        .iter()
        .filter(|o| o.stalled && o.step.reference)
        .count();
    assert_eq!(stalled_ref_edges as u64, STALL_LEN);

    let mut awaiting_resume = false;
    let mut resumed = 0;
    for o in &steps {
        if o.stalled {
            assert!(!o.step.sys2x && !o.step.sys, "edge at {}", o.step.time);
            awaiting_resume = true;
        } else if awaiting_resume && o.step.pll {
            assert!(o.step.sys2x);
            awaiting_resume = false;
            resumed += 1;
        }
    }
    assert_eq!(resumed, 1);

    // Sys edges track the ungated PLL edges that passed the gate.
    let passed = steps.iter().filter(|o| o.step.sys2x).count();
    let sys = steps.iter().filter(|o| o.step.sys).count();
    assert!((passed as i64 / 2 - sys as i64).abs() <= 1);

    let path: Vec<_> = soc.transitions().iter().map(|t| t.to).collect();
    assert_eq!(
        path,
        [
            SequencerState::PllWait,
            SequencerState::Running,
            SequencerState::Stalled,
            SequencerState::Running
        ]
    );
    assert!(soc.crg().domain(ClockDomain::Sys).is_usable());
}

#[test]
fn test_retraining_resets_sys_domain() {
    setup();
    const RETRAIN_AT: u64 = 1_000;
    const RETRAIN_LEN: u64 = 30;
    let phy = ScriptedPhyInit::new(100).with_retraining(RETRAIN_AT, RETRAIN_LEN);
    let mut soc = Soc::new(&fast_config(), phy).unwrap();
    let tb = *soc.crg().timebase();
    assert!(soc.run_until_state(SequencerState::Running, tb.ref_cycles(1_000)));
    assert!(soc.phy().cycle() < RETRAIN_AT);

    let reset = soc.phy().lines().reset;
    let mut reset_steps = 0;
    let mut observed = Vec::new();
    while soc.crg().next_edge().is_some_and(|t| t <= tb.ref_cycles(1_500)) {
        let stalled = soc.phy().lines().is_active();
        let step = soc.step().unwrap();
        if reset.get() {
            reset_steps += 1;
            // The request resets the sys domain and the divider at once.
            assert!(soc.crg().sys_reset());
            assert_eq!(soc.crg().state(), SequencerState::Stalled);
            assert_eq!(soc.crg().domain(ClockDomain::Sys).clock, ClockStatus::Gated);
        }
        observed.push((stalled, step));
    }
    assert!(reset_steps > 0);

    let last_stalled = observed.iter().rposition(|(stalled, _)| *stalled).unwrap();
    assert!(observed[..=last_stalled]
        .iter()
        .filter(|(stalled, _)| *stalled)
        .all(|(_, step)| !step.sys && !step.sys2x));
    let released = observed
        .iter()
        .position(|(_, step)| {
            step.transitions
                .iter()
                .any(|t| t.from == SequencerState::Stalled && t.to == SequencerState::Running)
        })
        .unwrap();
    // Back to RUNNING on the second sys edge after the request cleared.
    assert!(released > last_stalled);
    assert!(observed[released].1.sys);
    let sys_edges = observed[last_stalled + 1..=released]
        .iter()
        .filter(|(_, step)| step.sys)
        .count();
    assert_eq!(sys_edges, 2);

    let path: Vec<_> = soc.transitions().iter().map(|t| t.to).collect();
    assert_eq!(
        path,
        [
            SequencerState::PllWait,
            SequencerState::Running,
            SequencerState::Stalled,
            SequencerState::Running
        ]
    );
    assert_eq!(soc.crg().domain_resets(), 0);
    assert!(soc.crg().domain(ClockDomain::Sys).is_usable());
}

#[test]
fn test_repeated_calibration_stalls() {
    let config = fast_config();
    let phy = ScriptedPhyInit::new(100)
        .with_calibration(600, 10)
        .with_calibration(700, 10)
        .with_calibration(800, 10);
    let mut soc = Soc::new(&config, phy).unwrap();
    let tb = *soc.crg().timebase();
    soc.run_until(tb.ref_cycles(1_200));
    let stalls = soc
        .transitions()
        .iter()
        .filter(|t| t.to == SequencerState::Stalled)
        .count();
    assert_eq!(stalls, 3);
    assert_eq!(soc.crg().state(), SequencerState::Running);
}

#[test]
fn test_stall_is_zero_latency() {
    let mut port = HandshakePort::default();
    port.set_stop(false);
    port.set_reset(false);
    let mut crg = Crg::new(&fast_config(), port.lines()).unwrap();
    let tb = *crg.timebase();
    crg.run_until(tb.ref_cycles(600));
    assert_eq!(crg.state(), SequencerState::Running);

    assert_eq!(crg.domain(ClockDomain::Sys2x).clock, ClockStatus::Running);
    port.set_stop(true);
    let step = loop {
        let step = crg.step().unwrap();
        if step.pll {
            break step;
        }
    };
    assert!(!step.sys2x);
    assert_eq!(crg.state(), SequencerState::Stalled);
    assert_eq!(crg.domain(ClockDomain::Sys2x).clock, ClockStatus::Gated);
    assert!(!crg.sys_reset());
}
