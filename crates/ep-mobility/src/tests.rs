//! Unit tests for ep-mobility.

use ep_agent::{AgentTable, DestinationTable, HealthState};
use ep_core::{AgentId, Bounds, SimRng};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn unit() -> Bounds {
    Bounds::from_axes([0.0, 1.0], [0.0, 1.0])
}

/// `n` agents at the centre of the unit square, heading nowhere.
fn centred(n: usize) -> AgentTable {
    let mut t = AgentTable::zeroed(n);
    t.x.fill(0.5);
    t.y.fill(0.5);
    t
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use super::*;
    use crate::{
        MAX_SPEED, MIN_SPEED, MotionNoise, freeze_deceased, integrate_positions, inward_heading,
        randomize_motion, reflect_out_of_bounds,
    };

    #[test]
    fn integrate_moves_by_heading_times_speed() {
        let mut t = centred(2);
        t.heading_x[0] = 1.0;
        t.heading_y[0] = -0.5;
        t.speed[0] = 0.1;
        integrate_positions(&mut t);
        assert!((t.x[0] - 0.6).abs() < 1e-12);
        assert!((t.y[0] - 0.45).abs() < 1e-12);
        assert_eq!((t.x[1], t.y[1]), (0.5, 0.5));
    }

    #[test]
    fn reflection_turns_agent_at_right_wall() {
        let mut rng = SimRng::new(7);
        let mut t = centred(1);
        t.x[0] = 0.999;
        t.heading_x[0] = 0.4;
        let wall = Bounds::from_axes([0.0, 0.999], [0.0, 1.0]);
        reflect_out_of_bounds(&mut t, &wall, &mut rng);
        assert!(t.heading_x[0] <= -0.05 && t.heading_x[0] >= -1.0);
    }

    #[test]
    fn reflection_past_wall_in_unit_world() {
        let mut rng = SimRng::new(1);
        let mut t = centred(1);
        t.x[0] = 1.001;
        t.heading_x[0] = 0.9;
        reflect_out_of_bounds(&mut t, &unit(), &mut rng);
        assert!(t.heading_x[0] <= 0.0);
        assert!(t.heading_x[0] >= -1.0);
    }

    #[test]
    fn reflection_ignores_inward_and_interior_agents() {
        let mut rng = SimRng::new(1);
        let mut t = centred(2);
        t.x[0] = -0.01;
        t.heading_x[0] = 0.3; // already heading back in
        t.heading_x[1] = 0.7; // interior
        reflect_out_of_bounds(&mut t, &unit(), &mut rng);
        assert_eq!(t.heading_x[0], 0.3);
        assert_eq!(t.heading_x[1], 0.7);
    }

    #[test]
    fn reflection_skips_agents_with_destination() {
        let mut rng = SimRng::new(1);
        let mut t = centred(1);
        t.y[0] = 1.5;
        t.heading_y[0] = 0.5;
        t.active_destination[0] = 1;
        reflect_out_of_bounds(&mut t, &unit(), &mut rng);
        assert_eq!(t.heading_y[0], 0.5);
    }

    #[test]
    fn corner_resamples_both_axes() {
        let mut rng = SimRng::new(3);
        let mut t = centred(1);
        t.x[0] = 0.0;
        t.y[0] = 0.0;
        t.heading_x[0] = -0.2;
        t.heading_y[0] = -0.2;
        reflect_out_of_bounds(&mut t, &unit(), &mut rng);
        assert!(t.heading_x[0] >= 0.05 && t.heading_x[0] <= 1.0);
        assert!(t.heading_y[0] >= 0.05 && t.heading_y[0] <= 1.0);
    }

    #[test]
    fn inward_heading_sign_and_magnitude() {
        let mut rng = SimRng::new(11);
        for _ in 0..1_000 {
            let up = inward_heading(&mut rng, 1.0);
            let down = inward_heading(&mut rng, -1.0);
            assert!((0.05..=1.0).contains(&up));
            assert!((-1.0..=-0.05).contains(&down));
        }
    }

    #[test]
    fn zero_chance_only_clips_speed() {
        let mut rng = SimRng::new(5);
        let mut t = centred(3);
        t.heading_x.fill(0.25);
        t.speed[0] = 0.0;
        t.speed[1] = 0.01;
        t.speed[2] = 1.0;
        let noise = MotionNoise {
            heading_update_chance: 0.0,
            speed_update_chance: 0.0,
            heading_scale: 1.0,
            speed_scale: 1.0,
            mean_speed: 0.01,
        };
        randomize_motion(&mut t, &noise, &mut rng);
        assert!(t.heading_x.iter().all(|&h| h == 0.25));
        assert_eq!(t.speed, vec![MIN_SPEED, 0.01, MAX_SPEED]);
    }

    #[test]
    fn full_chance_resamples_everything() {
        let mut rng = SimRng::new(5);
        let mut t = centred(200);
        t.heading_x.fill(9.0);
        t.heading_y.fill(9.0);
        randomize_motion(&mut t, &MotionNoise::full(0.01), &mut rng);
        assert!(t.heading_x.iter().all(|&h| h != 9.0));
        assert!(t.heading_y.iter().all(|&h| h != 9.0));
        assert!(t.speed.iter().all(|&s| (MIN_SPEED..=MAX_SPEED).contains(&s)));
    }

    #[test]
    fn freeze_zeroes_only_deceased() {
        let mut t = centred(2);
        t.heading_x.fill(0.3);
        t.speed.fill(0.01);
        t.state[1] = HealthState::Deceased;
        freeze_deceased(&mut t);
        assert_eq!((t.heading_x[0], t.speed[0]), (0.3, 0.01));
        assert_eq!((t.heading_x[1], t.heading_y[1], t.speed[1]), (0.0, 0.0, 0.0));
    }
}

// ── Destination controller ────────────────────────────────────────────────────

#[cfg(test)]
mod destination {
    use super::*;
    use crate::{
        ARRIVED_SPEED, MobilityError, TRAVEL_SPEED, active_slots, confine_to_bounds,
        detect_arrivals, hold_at_destination, release_immune, reset_destinations,
        route_to_destination, steer_travelers,
    };

    fn ward() -> Bounds {
        Bounds::new(0.02, 0.02, 0.1, 0.98)
    }

    #[test]
    fn route_sets_centre_and_extents() {
        let mut t = centred(2);
        let mut d = DestinationTable::new(2, 1);
        route_to_destination(&mut t, &mut d, AgentId(1), 1, &ward()).unwrap();

        let (cx, cy) = d.center(AgentId(1), 1);
        assert!((cx - 0.06).abs() < 1e-12 && (cy - 0.5).abs() < 1e-12);
        assert!((t.wander_x[1] - 0.04).abs() < 1e-12);
        assert!((t.wander_y[1] - 0.48).abs() < 1e-12);
        assert_eq!(t.active_destination[1], 1);
        assert!(!t.arrived[1]);
        assert_eq!(t.active_destination[0], 0);
    }

    #[test]
    fn route_rejects_bad_slot() {
        let mut t = centred(1);
        let mut d = DestinationTable::new(1, 1);
        for slot in [0, 2] {
            let err = route_to_destination(&mut t, &mut d, AgentId(0), slot, &ward()).unwrap_err();
            assert!(matches!(err, MobilityError::SlotOutOfRange { slots: 1, .. }));
        }
        assert_eq!(t.active_destination[0], 0);
    }

    #[test]
    fn active_slots_are_distinct() {
        let mut t = centred(4);
        t.active_destination = vec![0, 2, 1, 2];
        let slots: Vec<u16> = active_slots(&t).into_iter().collect();
        assert_eq!(slots, vec![1, 2]);
        assert!(active_slots(&centred(3)).is_empty());
    }

    #[test]
    fn steering_points_at_centre() {
        let mut t = centred(1);
        let mut d = DestinationTable::new(1, 1);
        route_to_destination(&mut t, &mut d, AgentId(0), 1, &ward()).unwrap();
        steer_travelers(&mut t, &d);
        assert!((t.heading_x[0] - (0.06 - 0.5)).abs() < 1e-12);
        assert!(t.heading_y[0].abs() < 1e-12);
        assert_eq!(t.speed[0], TRAVEL_SPEED);
    }

    #[test]
    fn traveler_eventually_arrives() {
        let mut rng = SimRng::new(2);
        let mut t = centred(1);
        let mut d = DestinationTable::new(1, 1);
        route_to_destination(&mut t, &mut d, AgentId(0), 1, &ward()).unwrap();

        let mut arrived_at = None;
        for tick in 0..500 {
            steer_travelers(&mut t, &d);
            if !detect_arrivals(&mut t, &d, 1.5, 0.01, &mut rng).is_empty() {
                arrived_at = Some(tick);
                break;
            }
            crate::integrate_positions(&mut t);
        }
        assert!(arrived_at.is_some());
        assert!(t.arrived[0]);
    }

    #[test]
    fn arrival_needs_both_axes() {
        let mut rng = SimRng::new(2);
        let mut t = centred(1);
        let mut d = DestinationTable::new(1, 1);
        route_to_destination(&mut t, &mut d, AgentId(0), 1, &ward()).unwrap();
        // Inside on y (|0.5 - 0.5| < 0.48), far outside on x.
        assert!(detect_arrivals(&mut t, &d, 1.0, 0.01, &mut rng).is_empty());
        t.x[0] = 0.07;
        assert_eq!(detect_arrivals(&mut t, &d, 1.0, 0.01, &mut rng), vec![AgentId(0)]);
        // Already arrived agents are not reported again.
        assert!(detect_arrivals(&mut t, &d, 1.0, 0.01, &mut rng).is_empty());
    }

    #[test]
    fn hold_turns_strays_inward_and_damps_speed() {
        let mut rng = SimRng::new(4);
        let mut t = centred(2);
        let mut d = DestinationTable::new(2, 1);
        for a in [AgentId(0), AgentId(1)] {
            route_to_destination(&mut t, &mut d, a, 1, &ward()).unwrap();
            t.arrived[a.index()] = true;
        }
        // Agent 0 strayed right of the ward, agent 1 is inside it.
        t.x[0] = 0.2;
        t.heading_x[0] = 0.5;
        t.x[1] = 0.06;
        t.heading_x[1] = 0.5;
        t.speed.fill(0.04);

        hold_at_destination(&mut t, &d, 1.0, &mut rng);
        assert!(t.heading_x[0] < 0.0);
        assert_eq!(t.heading_x[1], 0.5);
        for i in 0..2 {
            assert!(t.speed[i] >= 0.0 && t.speed[i] < ARRIVED_SPEED * 3.0);
        }
    }

    #[test]
    fn hold_ignores_travelers() {
        let mut rng = SimRng::new(4);
        let mut t = centred(1);
        let mut d = DestinationTable::new(1, 1);
        route_to_destination(&mut t, &mut d, AgentId(0), 1, &ward()).unwrap();
        t.speed[0] = TRAVEL_SPEED;
        hold_at_destination(&mut t, &d, 1.0, &mut rng);
        assert_eq!(t.speed[0], TRAVEL_SPEED);
    }

    #[test]
    fn reset_selected_or_all() {
        let mut t = centred(3);
        t.active_destination = vec![1, 1, 1];
        t.arrived = vec![true, true, true];
        reset_destinations(&mut t, &[AgentId(1)]);
        assert_eq!(t.active_destination, vec![1, 0, 1]);
        assert!(!t.arrived[1]);
        reset_destinations(&mut t, &[]);
        assert_eq!(t.active_destination, vec![0, 0, 0]);
        assert!(t.arrived.iter().all(|&a| !a));
    }

    #[test]
    fn release_only_immune() {
        let mut t = centred(3);
        t.active_destination = vec![1, 1, 1];
        t.state[0] = HealthState::Infected;
        t.state[1] = HealthState::Immune;
        t.state[2] = HealthState::Deceased;
        assert_eq!(release_immune(&mut t), 1);
        assert_eq!(t.active_destination, vec![1, 0, 1]);
    }

    #[test]
    fn confine_teleports_everyone_inside() {
        let mut rng = SimRng::new(8);
        let mut t = centred(50);
        let mut d = DestinationTable::new(50, 1);
        confine_to_bounds(&mut t, &mut d, 1, &ward(), true, &mut rng).unwrap();
        for i in 0..t.count {
            assert!(t.x[i] >= 0.02 && t.x[i] < 0.1);
            assert!(t.arrived[i]);
            assert_eq!(t.active_destination[i], 1);
        }
    }

    #[test]
    fn confine_without_teleport_keeps_positions() {
        let mut rng = SimRng::new(8);
        let mut t = centred(2);
        let mut d = DestinationTable::new(2, 1);
        confine_to_bounds(&mut t, &mut d, 1, &ward(), false, &mut rng).unwrap();
        assert_eq!(t.x, vec![0.5, 0.5]);
        assert!(confine_to_bounds(&mut t, &mut d, 3, &ward(), false, &mut rng).is_err());
    }
}
