use hexdash::viz::{FixedMetrics, SceneRecorder};
use hexdash::{
    AnimationDriver, Dashboard, DashboardConfig, Dataset, LonLat, ManualClock, PlayState, Record,
    Region,
};
use std::time::Duration;

const PERIOD: Duration = Duration::from_millis(500);

fn dashboard() -> Dashboard<SceneRecorder<FixedMetrics>> {
    let ring = vec![
        LonLat { lon: -84.0, lat: 39.0 },
        LonLat { lon: -82.0, lat: 39.0 },
        LonLat { lon: -83.0, lat: 41.0 },
    ];
    let records = (2012..=2016)
        .map(|y| Record::new("Ohio", y).with("Data.Job Creation.Rate", f64::from(y)))
        .collect();
    let mut dash = Dashboard::new(
        Dataset::new(records, vec![Region::with_ring("OH", "Ohio", ring)]).unwrap(),
        DashboardConfig::default(),
        SceneRecorder::new(FixedMetrics(30.0)),
    )
    .unwrap();
    dash.dispatch_render();
    dash
}

#[test]
fn play_advances_one_year_per_tick_and_wraps() {
    let mut dash = dashboard();
    dash.set_year(2014).unwrap();

    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), PERIOD);
    assert_eq!(driver.toggle(), PlayState::Playing);

    let mut seen = Vec::new();
    for _ in 0..3 {
        clock.advance(PERIOD);
        assert_eq!(dash.pump_animation(&mut driver), 1);
        seen.push(dash.state().year());
    }
    assert_eq!(seen, vec![2015, 2016, 2012]);
    assert_eq!(driver.ticks_fired(), 3);
}

#[test]
fn every_due_tick_is_delivered() {
    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), PERIOD);
    assert_eq!(driver.poll(), 0);

    driver.start();
    clock.advance(Duration::from_millis(499));
    assert_eq!(driver.poll(), 0);
    assert_eq!(driver.time_until_next_tick(), Some(Duration::from_millis(1)));

    clock.advance(Duration::from_millis(751));
    assert_eq!(driver.poll(), 2);
    clock.advance(Duration::from_millis(250));
    assert_eq!(driver.poll(), 1);
    assert_eq!(driver.ticks_fired(), 3);

    // Starting again while playing keeps the schedule.
    driver.start();
    clock.advance(PERIOD);
    assert_eq!(driver.poll(), 1);
}

#[test]
fn no_ticks_after_pause() {
    let mut dash = dashboard();
    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), PERIOD);
    driver.start();
    clock.advance(PERIOD);
    assert_eq!(dash.pump_animation(&mut driver), 1);
    let year = dash.state().year();
    let dispatches = dash.dispatch_count();

    assert_eq!(driver.toggle(), PlayState::Idle);
    assert_eq!(driver.state().button_label(), "Play");
    clock.advance(PERIOD * 10);
    assert_eq!(dash.pump_animation(&mut driver), 0);
    assert_eq!(dash.state().year(), year);
    assert_eq!(dash.dispatch_count(), dispatches);
    assert_eq!(driver.time_until_next_tick(), None);
}

#[test]
fn late_ticks_collapse_into_one_dispatch() {
    let mut dash = dashboard();
    dash.set_year(2012).unwrap();
    let before = dash.dispatch_count();

    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), PERIOD);
    driver.start();
    clock.advance(PERIOD * 4);
    assert_eq!(dash.pump_animation(&mut driver), 4);
    assert_eq!(dash.state().year(), 2016);
    assert_eq!(dash.dispatch_count(), before + 1);
    let d = dash.last_report().unwrap().domain.unwrap();
    assert_eq!((d.min, d.max), (2016.0, 2016.0));
}

#[test]
fn ticks_past_the_span_wrap_repeatedly() {
    let mut dash = dashboard();
    dash.set_year(2014).unwrap();

    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), PERIOD);
    driver.start();
    clock.advance(PERIOD * 12);
    assert_eq!(dash.pump_animation(&mut driver), 12);
    assert_eq!(dash.state().year(), 2016);
}

#[test]
fn waking_after_hours_costs_one_dispatch() {
    let mut dash = dashboard();
    dash.set_year(2013).unwrap();
    dash.port_mut().take_calls();
    let before = dash.dispatch_count();

    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(clock.clone(), PERIOD);
    driver.start();
    clock.advance(Duration::from_secs(8 * 60 * 60));
    // 57600 ticks over 5 years leaves the year where it was.
    assert_eq!(dash.pump_animation(&mut driver), 57_600);
    assert_eq!(dash.state().year(), 2013);
    assert!(dash.dispatch_count() <= before + 1);
    assert!(dash.port().calls().len() <= 5);

    // The schedule resumes from now rather than replaying the gap.
    assert_eq!(driver.time_until_next_tick(), Some(PERIOD));
    clock.advance(PERIOD);
    assert_eq!(dash.pump_animation(&mut driver), 1);
    assert_eq!(dash.state().year(), 2014);
    assert_eq!(dash.dispatch_count(), before + 1);
}
