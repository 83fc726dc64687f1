//! Unit tests for access and egress template generation.

use geo::Point;

use super::*;
use crate::domain::{SECONDS_PER_DAY, ServiceDate};
use crate::flex::test_support::{point_stop, service_date, t, trip, zone};
use crate::flex::{ScheduledDeviatedTrip, ScheduledStopTime, UnscheduledTrip, WindowStopTime};

/// Every ride takes ten minutes.
fn ten_minutes(_: Point<f64>, _: Point<f64>) -> Option<FlexPath> {
    Some(FlexPath::new(5_000.0, 600))
}

fn abc() -> Arc<FlexTrip> {
    let trip = UnscheduledTrip::new(
        trip("abc"),
        vec![
            WindowStopTime::new(point_stop("a", 40.00, -74.0), t("08:00"), t("12:00")),
            WindowStopTime::new(point_stop("b", 40.01, -74.0), t("08:00"), t("12:00")),
            WindowStopTime::new(point_stop("c", 40.02, -74.0), t("08:00"), t("12:00")),
        ],
    )
    .unwrap();
    Arc::new(trip.into())
}

/// Offset of the service date's midnight from `hh:mm` that day.
fn offset_from(time: &str) -> i32 {
    -t(time).seconds()
}

fn nearby(trip: &FlexTrip, index: usize, walk: i32) -> NearbyStop {
    NearbyStop::new(Arc::clone(trip.stop(StopIndex(index)).unwrap()), 100.0, walk)
}

fn pairs<T>(templates: impl Iterator<Item = T>, indices: impl Fn(&T) -> (StopIndex, StopIndex)) -> Vec<(usize, usize)> {
    templates.map(|t| indices(&t)).map(|(b, a)| (b.0, a.0)).collect()
}

fn access_pairs(trip: &Arc<FlexTrip>, nearby: &NearbyStop, offset: i32) -> Vec<(usize, usize)> {
    pairs(
        trip.flex_access_templates(nearby, offset, service_date(), &ten_minutes),
        |t| (t.board_index(), t.alight_index()),
    )
}

fn egress_pairs(trip: &Arc<FlexTrip>, nearby: &NearbyStop, offset: i32) -> Vec<(usize, usize)> {
    pairs(
        trip.flex_egress_templates(nearby, offset, service_date(), &ten_minutes),
        |t| (t.board_index(), t.alight_index()),
    )
}

#[test]
fn access_boards_at_nearby_stop_and_rides_forward() {
    let trip = abc();
    let offset = offset_from("07:00");

    assert_eq!(access_pairs(&trip, &nearby(&trip, 0, 60), offset), [(0, 1), (0, 2)]);
    assert_eq!(access_pairs(&trip, &nearby(&trip, 1, 60), offset), [(1, 2)]);
    assert!(access_pairs(&trip, &nearby(&trip, 2, 60), offset).is_empty());
}

#[test]
fn egress_alights_at_nearby_stop_after_riding() {
    let trip = abc();
    let offset = offset_from("11:00");

    assert_eq!(egress_pairs(&trip, &nearby(&trip, 2, 60), offset), [(0, 2), (1, 2)]);
    assert_eq!(egress_pairs(&trip, &nearby(&trip, 1, 60), offset), [(0, 1)]);
    assert!(egress_pairs(&trip, &nearby(&trip, 0, 60), offset).is_empty());
}

#[test]
fn unrelated_stop_gets_nothing() {
    let trip = abc();
    let elsewhere = NearbyStop::at(point_stop("x", 41.0, -73.0));
    assert!(access_pairs(&trip, &elsewhere, 0).is_empty());
    assert!(egress_pairs(&trip, &elsewhere, 0).is_empty());
}

#[test]
fn overlapping_zones_board_at_either() {
    // Zones A and B both cover the rider; C is well outside both
    let trip: Arc<FlexTrip> = Arc::new(
        UnscheduledTrip::new(
            trip("overlap"),
            vec![
                WindowStopTime::new(zone("a", 40.00, -74.0, 0.01), t("08:00"), t("12:00")),
                WindowStopTime::new(zone("b", 40.01, -74.0, 0.01), t("08:00"), t("12:00")),
                WindowStopTime::new(point_stop("c", 40.05, -74.0), t("08:00"), t("12:00")),
            ],
        )
        .unwrap()
        .into(),
    );
    let rider = NearbyStop::new(point_stop("home", 40.005, -74.0), 50.0, 60);

    let access = access_pairs(&trip, &rider, offset_from("07:00"));
    assert_eq!(access, [(0, 1), (0, 2), (1, 2)]);
    assert!(access.iter().all(|&(board, _)| board == 0 || board == 1));

    let egress = egress_pairs(&trip, &rider, offset_from("11:00"));
    assert_eq!(egress, [(0, 1)]);
}

#[test]
fn access_template_times() {
    let trip = abc();
    let offset = offset_from("07:00");
    let template = trip
        .flex_access_templates(&nearby(&trip, 0, 300), offset, service_date(), &ten_minutes)
        .next()
        .unwrap();

    // Ready at 07:05 but the window opens at 08:00
    assert_eq!(template.departure_time(), t("08:00"));
    assert_eq!(template.departure_search_time(), 3600);
    assert_eq!(template.arrival_search_time(), 4200);
    assert_eq!(template.time_offset(), offset);
    assert_eq!(template.service_date(), service_date());
    assert_eq!(template.flex_path().duration_seconds, 600);
    assert_eq!(template.access().duration_seconds, 300);
    assert_eq!(template.transfer_stop().name, "b");
    assert_eq!(template.trip().id().to_string(), "t:abc");
}

#[test]
fn access_dropped_when_rider_too_late() {
    let trip = abc();
    // Leaves at 11:45 and walks a quarter of an hour: the ride would end
    // after the windows close
    let offset = offset_from("11:45");
    assert!(access_pairs(&trip, &nearby(&trip, 0, 900), offset).is_empty());
    assert_eq!(access_pairs(&trip, &nearby(&trip, 0, 60), offset), [(0, 1), (0, 2)]);
}

#[test]
fn egress_template_times() {
    let trip = abc();
    let offset = offset_from("10:00");
    let template = trip
        .flex_egress_templates(&nearby(&trip, 2, 300), offset, service_date(), &ten_minutes)
        .next()
        .unwrap();

    // Must leave c by 09:55 to walk to the destination by 10:00
    assert_eq!(template.arrival_time(), t("09:55"));
    assert_eq!(template.arrival_search_time(), -300);
    assert_eq!(template.departure_search_time(), -900);
    assert_eq!(template.transfer_stop().name, "a");
    assert_eq!(template.egress().duration_seconds, 300);
}

#[test]
fn egress_dropped_when_deadline_too_early() {
    let trip = abc();
    let offset = offset_from("08:05");
    // Deadline at c is 08:00, so the ride would have to start before 08:00
    assert!(egress_pairs(&trip, &nearby(&trip, 2, 300), offset).is_empty());
}

#[test]
fn templates_reevaluate_for_later_times() {
    let trip = abc();
    let access = trip
        .flex_access_templates(&nearby(&trip, 0, 60), offset_from("07:00"), service_date(), &ten_minutes)
        .next()
        .unwrap();
    assert_eq!(access.earliest_departure_at(t("09:30")), Some(t("09:30")));
    assert_eq!(access.earliest_departure_at(t("11:55")), None);

    let egress = trip
        .flex_egress_templates(&nearby(&trip, 2, 60), offset_from("11:00"), service_date(), &ten_minutes)
        .next()
        .unwrap();
    assert_eq!(egress.latest_arrival_at(t("09:30")), Some(t("09:30")));
    assert_eq!(egress.latest_arrival_at(t("08:05")), None);
}

#[test]
fn area_stop_serves_points_inside() {
    let trip: Arc<FlexTrip> = Arc::new(
        UnscheduledTrip::new(
            trip("zonal"),
            vec![
                WindowStopTime::new(zone("zone", 40.0, -74.0, 0.05), t("06:00"), t("22:00")),
                WindowStopTime::new(point_stop("hub", 40.2, -74.0), t("06:00"), t("22:00")),
            ],
        )
        .unwrap()
        .into(),
    );
    let inside = NearbyStop::new(point_stop("corner", 40.01, -74.01), 80.0, 60);
    let outside = NearbyStop::new(point_stop("far", 40.1, -74.0), 80.0, 60);

    assert_eq!(access_pairs(&trip, &inside, offset_from("09:00")), [(0, 1)]);
    assert!(access_pairs(&trip, &outside, offset_from("09:00")).is_empty());
}

#[test]
fn permissions_respected() {
    let trip: Arc<FlexTrip> = Arc::new(
        UnscheduledTrip::new(
            trip("perm"),
            vec![
                WindowStopTime::new(point_stop("a", 40.00, -74.0), t("08:00"), t("12:00")),
                WindowStopTime::new(point_stop("b", 40.01, -74.0), t("08:00"), t("12:00"))
                    .with_alighting(false),
                WindowStopTime::new(point_stop("c", 40.02, -74.0), t("08:00"), t("12:00"))
                    .with_boarding(false),
            ],
        )
        .unwrap()
        .into(),
    );
    let offset = offset_from("07:00");

    assert_eq!(access_pairs(&trip, &nearby(&trip, 0, 60), offset), [(0, 2)]);
    assert!(egress_pairs(&trip, &nearby(&trip, 1, 60), offset).is_empty());

    let blocked = UnscheduledTrip::new(
        crate::flex::test_support::trip("blocked"),
        vec![
            WindowStopTime::new(point_stop("a", 40.00, -74.0), t("08:00"), t("12:00"))
                .with_boarding(false),
            WindowStopTime::new(point_stop("b", 40.01, -74.0), t("08:00"), t("12:00")),
        ],
    )
    .unwrap();
    let blocked: Arc<FlexTrip> = Arc::new(blocked.into());
    assert!(access_pairs(&blocked, &nearby(&blocked, 0, 60), offset).is_empty());
}

#[test]
fn calculator_bounds_drop_pairs() {
    let trip = abc();
    // Only rides between neighbouring stops are estimated
    let short_only = |from: Point<f64>, to: Point<f64>| -> Option<FlexPath> {
        ((to.y() - from.y()).abs() < 0.015).then(|| FlexPath::new(1_000.0, 120))
    };
    let templates: Vec<_> = trip
        .flex_access_templates(&nearby(&trip, 0, 60), offset_from("07:00"), service_date(), &short_only)
        .collect();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].alight_index(), StopIndex(1));

    let never = |_: Point<f64>, _: Point<f64>| -> Option<FlexPath> { None };
    let mut templates =
        trip.flex_access_templates(&nearby(&trip, 0, 60), offset_from("07:00"), service_date(), &never);
    assert!(templates.next().is_none());
}

#[test]
fn empty_when_not_running() {
    let trip = abc();
    let not_running = ServiceDate::from_ymd(2025, 3, 15).unwrap();
    let access = nearby(&trip, 0, 60);
    let egress = nearby(&trip, 2, 60);

    assert_eq!(
        trip.flex_access_templates(&access, 0, not_running, &ten_minutes)
            .count(),
        0
    );
    assert_eq!(
        trip.flex_egress_templates(&egress, 0, not_running, &ten_minutes)
            .count(),
        0
    );
}

#[test]
fn generation_is_restartable() {
    let trip = abc();
    let access = nearby(&trip, 0, 60);
    let offset = offset_from("07:00");

    let first: Vec<_> = trip
        .flex_access_templates(&access, offset, service_date(), &ten_minutes)
        .collect();
    let second: Vec<_> = trip
        .flex_access_templates(&access, offset, service_date(), &ten_minutes)
        .collect();
    assert_eq!(first, second);

    // Abandoning part way and cloning leaves no shared cursor
    let mut partial = trip.flex_access_templates(&access, offset, service_date(), &ten_minutes);
    let head = partial.next();
    let rest: Vec<_> = partial.clone().collect();
    assert_eq!(head.as_ref(), first.first());
    assert_eq!(rest, first[1..]);
    assert_eq!(partial.count(), rest.len());
}

#[test]
fn scheduled_trip_templates_use_published_times() {
    let trip: Arc<FlexTrip> = Arc::new(
        ScheduledDeviatedTrip::new(
            trip("sched"),
            vec![
                ScheduledStopTime::at(point_stop("a", 40.00, -74.0), t("08:00")),
                ScheduledStopTime::untimed(zone("z", 40.05, -74.0, 0.02)),
                ScheduledStopTime::at(point_stop("c", 40.10, -74.0), t("08:40")),
            ],
        )
        .unwrap()
        .into(),
    );
    let in_zone = NearbyStop::new(point_stop("home", 40.05, -74.01), 50.0, 60);

    // Boarding in the zone inherits the 08:00 departure from a
    let templates: Vec<_> = trip
        .flex_access_templates(&in_zone, offset_from("07:30"), service_date(), &ten_minutes)
        .collect();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].departure_time(), t("08:00"));

    // Missed it
    assert!(
        trip.flex_access_templates(&in_zone, offset_from("08:00"), service_date(), &ten_minutes)
            .next()
            .is_none()
    );

    // Alighting in the zone inherits the 08:40 arrival at c
    let egress: Vec<_> = trip
        .flex_egress_templates(&in_zone, offset_from("09:00"), service_date(), &ten_minutes)
        .collect();
    assert_eq!(egress.len(), 1);
    assert_eq!(egress[0].arrival_time(), t("08:40"));
}

#[test]
fn previous_service_day_offset() {
    // A trip on yesterday's service date, seen from 01:00 today
    let trip: Arc<FlexTrip> = Arc::new(
        UnscheduledTrip::new(
            trip("owl"),
            vec![
                WindowStopTime::new(point_stop("a", 40.00, -74.0), t("23:00"), t("26:00")),
                WindowStopTime::new(point_stop("b", 40.01, -74.0), t("23:00"), t("26:00")),
            ],
        )
        .unwrap()
        .into(),
    );
    let yesterday = service_date().previous().unwrap();
    let offset = -(SECONDS_PER_DAY + t("01:00").seconds());
    let template = trip
        .flex_access_templates(&nearby(&trip, 0, 0), offset, yesterday, &ten_minutes)
        .next()
        .unwrap();

    assert_eq!(template.departure_time(), t("25:00"));
    assert_eq!(template.departure_search_time(), 0);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every access template departs no earlier than the rider is ready
        #[test]
        fn access_never_departs_before_ready(
            leave in 0i32..SECONDS_PER_DAY,
            walk in 0i32..3600,
            board in 0usize..3,
        ) {
            let trip = abc();
            let offset = -leave;
            for template in trip.flex_access_templates(
                &nearby(&trip, board, walk), offset, service_date(), &ten_minutes)
            {
                prop_assert!(template.departure_search_time() >= i64::from(walk));
                prop_assert!(template.board_index() < template.alight_index());
                prop_assert!(template.board_index() == StopIndex(board));
            }
        }

        /// Every egress template arrives early enough to walk to the destination
        #[test]
        fn egress_never_arrives_after_deadline(
            deadline in 0i32..SECONDS_PER_DAY,
            walk in 0i32..3600,
            alight in 0usize..3,
        ) {
            let trip = abc();
            let offset = -deadline;
            for template in trip.flex_egress_templates(
                &nearby(&trip, alight, walk), offset, service_date(), &ten_minutes)
            {
                prop_assert!(template.arrival_search_time() + i64::from(walk) <= 0);
                prop_assert!(template.board_index() < template.alight_index());
                prop_assert!(template.alight_index() == StopIndex(alight));
            }
        }
    }
}
