//! End-to-end timer behaviour driven through the public API.

use std::collections::BTreeMap;

use engine_core::Flagship;
use glam::DVec2;
use mission::{
    Action, DataFile, DataNode, DataWriter, Galaxy, InstantiateContext, Interface, MessageLog,
    PlayerInfo, PlayerState, ProximityCenter, ResetCondition, StarSystem, StellarObject,
    TimerInstance, TimerSpec,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Bumps a condition each time it runs so tests can count executions.
#[derive(Debug, Clone)]
struct Counter {
    key: String,
}

impl Action for Counter {
    fn load(node: &DataNode) -> Self {
        Counter {
            key: format!("ran: {}", node.token(1)),
        }
    }

    fn save(&self, out: &mut DataWriter) {
        out.write(["on", self.key.trim_start_matches("ran: ")]);
    }

    fn instantiate(&self, _context: &InstantiateContext<'_>) -> Self {
        self.clone()
    }

    fn execute(&self, player: &mut dyn PlayerState, _ui: &mut dyn Interface) {
        player.conditions_mut().add(self.key.clone(), 1);
    }
}

fn counter(trigger: &str) -> Option<Counter> {
    Some(Counter {
        key: format!("ran: {}", trigger),
    })
}

fn galaxy() -> Galaxy {
    let mut galaxy = Galaxy::new();
    galaxy.add_system(
        StarSystem::new("Sol")
            .with_link("Vega")
            .with_object(StellarObject::new("Luna", DVec2::new(1000.0, 0.0))),
    );
    galaxy.add_system(StarSystem::new("Vega"));
    galaxy
}

struct Harness<A: Action> {
    timer: TimerInstance<A>,
    player: PlayerInfo,
    ui: MessageLog,
    galaxy: Galaxy,
}

impl<A: Action> Harness<A> {
    fn new(spec: TimerSpec<A>) -> Self {
        Self::seeded(spec, 7)
    }

    fn seeded(spec: TimerSpec<A>, seed: u64) -> Self {
        let galaxy = galaxy();
        let subs = BTreeMap::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let timer = spec
            .into_shared()
            .instantiate(&InstantiateContext::new(&subs), &galaxy, &mut rng);
        Self {
            timer,
            player: PlayerInfo::new(Flagship::new("Bounder", "Sol")),
            ui: MessageLog::new(),
            galaxy,
        }
    }

    fn ship(&mut self) -> &mut Flagship {
        self.player.flagship_mut().expect("harness always has a flagship")
    }

    fn step(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.timer.step(&mut self.player, &mut self.ui, &self.galaxy);
        }
    }

    fn ran(&self, trigger: &str) -> i64 {
        self.player.conditions.get(&format!("ran: {}", trigger))
    }
}

fn spec(name: &str, base: u64, spread: u64) -> TimerSpec<Counter> {
    let mut spec = TimerSpec::new(name, base, spread);
    spec.on_timeup = counter("timeup");
    spec.on_reset = counter("reset");
    spec
}

#[test]
fn completes_exactly_at_rolled_duration() {
    for (base, spread) in [(0, 0), (1, 0), (5, 3), (40, 25)] {
        for seed in 0..8 {
            let mut h = Harness::seeded(spec("t", base, spread), seed);
            let wait = h.timer.time_to_wait();
            assert!(wait >= base && wait <= base + spread);

            for _ in 1..wait {
                h.step(1);
                assert!(!h.timer.is_complete());
            }
            h.step(1);
            assert!(h.timer.is_complete());
        }
    }
}

#[test]
fn stepping_after_completion_changes_nothing() {
    let mut h = Harness::new(spec("t", 2, 0));
    h.step(2);
    assert!(h.timer.is_complete());
    assert_eq!(h.ran("timeup"), 1);
    let elapsed = h.timer.time_elapsed();

    h.ship().thrusting = true;
    h.step(10);
    assert_eq!(h.timer.time_elapsed(), elapsed);
    assert_eq!(h.ran("timeup"), 1);
    assert!(h.timer.is_complete());
}

/// Drive the timer for a few ticks, then break one gate.
fn reset_after(condition: ResetCondition, breaker: impl Fn(&mut Flagship)) -> u64 {
    let mut s = spec("t", 100, 0);
    s.location = mission::LocationGate::System("Sol".into());
    s.require_idle = true;
    s.proximity = 500.0;
    s.proximity_center = ProximityCenter::Landmark("Luna".into());
    s.reset_condition = condition;
    let mut h = Harness::new(s);
    h.ship().position = DVec2::new(1000.0, 100.0);
    h.step(4);
    assert_eq!(h.timer.time_elapsed(), 4);
    breaker(h.ship());
    h.step(1);
    assert!(!h.timer.is_active());
    h.timer.time_elapsed()
}

fn pause(ship: &mut Flagship) {
    ship.thrusting = true;
}

fn leave_zone(ship: &mut Flagship) {
    ship.position = DVec2::ZERO;
}

fn leave_system(ship: &mut Flagship) {
    ship.system = Some("Vega".into());
}

#[test]
fn wider_reset_conditions_cover_narrower_failures() {
    assert_eq!(reset_after(ResetCondition::LeaveSystem, pause), 0);
    assert_eq!(reset_after(ResetCondition::LeaveSystem, leave_zone), 0);
    assert_eq!(reset_after(ResetCondition::LeaveSystem, leave_system), 0);

    assert_eq!(reset_after(ResetCondition::LeaveZone, pause), 0);
    assert_eq!(reset_after(ResetCondition::LeaveZone, leave_zone), 0);
    assert_eq!(reset_after(ResetCondition::LeaveZone, leave_system), 4);

    assert_eq!(reset_after(ResetCondition::Pause, pause), 0);
    assert_eq!(reset_after(ResetCondition::Pause, leave_zone), 4);
    assert_eq!(reset_after(ResetCondition::Pause, leave_system), 4);

    assert_eq!(reset_after(ResetCondition::None, pause), 4);
    assert_eq!(reset_after(ResetCondition::None, leave_system), 4);
}

fn toggle_idle(h: &mut Harness<Counter>, cycles: usize) {
    for _ in 0..cycles {
        h.ship().thrusting = false;
        h.step(2);
        h.ship().thrusting = true;
        h.step(1);
    }
}

#[test]
fn reset_action_fires_once_unless_repeating() {
    let mut s = spec("t", 50, 0);
    s.require_idle = true;
    let mut h = Harness::new(s.clone());
    toggle_idle(&mut h, 4);
    assert_eq!(h.ran("reset"), 1);
    assert!(h.timer.reset_fired());

    s.repeat_reset = true;
    let mut h = Harness::new(s);
    toggle_idle(&mut h, 4);
    assert_eq!(h.ran("reset"), 4);
}

fn save_and_reload(h: &mut Harness<Counter>) -> String {
    let mut out = DataWriter::new();
    h.timer.save(&mut out);
    let text = out.into_string();
    let mut rng = StdRng::seed_from_u64(3);
    h.timer = TimerInstance::load(&DataFile::parse(&text).nodes()[0], &h.galaxy, &mut rng);
    text
}

#[test]
fn one_shot_reset_survives_save_and_load() {
    let mut s = spec("t", 50, 0);
    s.require_idle = true;
    let mut h = Harness::new(s);
    toggle_idle(&mut h, 1);
    assert_eq!(h.ran("reset"), 1);

    let text = save_and_reload(&mut h);
    assert!(text.contains("\t\"reset fired\"\n"));
    assert!(h.timer.reset_fired());

    toggle_idle(&mut h, 3);
    assert_eq!(h.timer.time_elapsed(), 0);
    assert_eq!(h.ran("reset"), 1);
}

#[test]
fn repeating_reset_keeps_firing_after_save_and_load() {
    let mut s = spec("t", 50, 0);
    s.require_idle = true;
    s.repeat_reset = true;
    let mut h = Harness::new(s);
    toggle_idle(&mut h, 1);
    save_and_reload(&mut h);
    toggle_idle(&mut h, 2);
    assert_eq!(h.ran("reset"), 3);
}

#[test]
fn reset_rerolls_within_spread() {
    let mut s = spec("t", 20, 30);
    s.require_idle = true;
    let mut h = Harness::new(s);
    for _ in 0..10 {
        toggle_idle(&mut h, 1);
        let wait = h.timer.time_to_wait();
        assert!((20..=50).contains(&wait));
        assert_eq!(h.timer.time_elapsed(), 0);
    }
}

#[test]
fn save_and_load_preserve_remaining_time() {
    let mut h: Harness<mission::MissionAction> = Harness::new(TimerSpec::new("relay", 90, 0));
    h.step(35);
    assert_eq!(h.timer.remaining(), 55);

    let mut out = DataWriter::new();
    h.timer.save(&mut out);
    let file = DataFile::parse(out.as_str());
    let mut rng = StdRng::seed_from_u64(1);
    let loaded: TimerInstance = TimerInstance::load(&file.nodes()[0], &h.galaxy, &mut rng);
    assert_eq!(loaded.remaining(), 55);
    assert_eq!(loaded.time_elapsed(), 0);

    h.timer = loaded;
    h.step(54);
    assert!(!h.timer.is_complete());
    h.step(1);
    assert!(h.timer.is_complete());
}

#[test]
fn scenario_a_plain_countdown_sets_condition() {
    let mut h: Harness<mission::MissionAction> = Harness::new(TimerSpec::new("X", 10, 0));
    h.step(9);
    assert!(!h.timer.is_complete());
    h.step(1);
    assert!(h.timer.is_complete());
    assert_eq!(h.player.conditions.get("timer: X: complete"), 1);
}

#[test]
fn scenario_b_outside_radius_never_advances() {
    let mut s = spec("t", 10, 0);
    s.proximity = 100.0;
    s.close_to = true;
    s.reset_condition = ResetCondition::LeaveZone;
    let mut h = Harness::new(s);
    h.ship().position = DVec2::new(150.0, 0.0);
    for _ in 0..20 {
        h.step(1);
        assert_eq!(h.timer.time_elapsed(), 0);
        assert!(!h.timer.is_active());
    }

    // Counting inside the zone, then drifting out, starts over.
    h.ship().position = DVec2::new(50.0, 0.0);
    h.step(6);
    assert_eq!(h.timer.time_elapsed(), 6);
    h.ship().position = DVec2::new(150.0, 0.0);
    h.step(1);
    assert_eq!(h.timer.time_elapsed(), 0);
    assert_eq!(h.ran("reset"), 1);
}

#[test]
fn scenario_c_thrusting_keeps_timer_inactive() {
    let mut s = spec("t", 10, 0);
    s.require_idle = true;
    s.require_uncloaked = true;
    s.proximity = 1.0e6;
    let mut h = Harness::new(s);
    h.ship().thrusting = true;
    for _ in 0..15 {
        h.step(1);
        assert!(!h.timer.is_active());
    }
    assert!(!h.timer.is_complete());
}

#[test]
fn scenario_d_no_reset_pauses_and_resumes() {
    let mut s = spec("t", 10, 0);
    s.require_idle = true;
    s.reset_condition = ResetCondition::None;
    let mut h = Harness::new(s);
    h.step(6);
    h.ship().thrusting = true;
    h.step(5);
    assert_eq!(h.timer.time_elapsed(), 6);
    assert_eq!(h.ran("reset"), 0);

    h.ship().thrusting = false;
    h.step(3);
    assert!(!h.timer.is_complete());
    h.step(1);
    assert!(h.timer.is_complete());
}

#[test]
fn loads_timer_from_mission_text() {
    let text = "\
timer \"listen\" 600 120
\tsystem Sol
\tidle 5
\tuncloaked
\tproximity 2000 far
\t\tLuna
\treset \"leave system\"
\trepeat reset
\ton timeup
\ton reset
";
    let file = DataFile::parse(text);
    let spec: TimerSpec<Counter> = TimerSpec::load(&file.nodes()[0]);
    assert_eq!(spec.base_duration, 600);
    assert_eq!(spec.random_spread, 120);
    assert_eq!(spec.idle_max_speed, Some(5.0));
    assert!(spec.require_uncloaked);
    assert!(!spec.close_to);
    assert_eq!(spec.proximity_center, ProximityCenter::Landmark("Luna".into()));
    assert_eq!(spec.reset_condition, ResetCondition::LeaveSystem);
    assert!(spec.repeat_reset);
    assert!(spec.on_timeup.is_some() && spec.on_reset.is_some());
}
