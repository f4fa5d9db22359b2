//! Multi-leg planning and transit estimation (C6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub from: f64,
    pub to: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiLegPlan {
    pub legs: Vec<Leg>,
    pub total_distance: f64,
    pub leg_count: usize,
}

/// Builds a plan from ordered waypoints (scalar positions). `leg_count` is
/// always populated — it is a computed invariant, not an optional field
/// callers might forget to set.
pub fn plan_multi_leg(waypoints: &[f64]) -> MultiLegPlan {
    let legs: Vec<Leg> = waypoints
        .windows(2)
        .map(|w| Leg {
            from: w[0],
            to: w[1],
            distance: (w[1] - w[0]).abs(),
        })
        .collect();
    let total_distance = legs.iter().map(|l| l.distance).sum();
    let leg_count = legs.len();
    MultiLegPlan {
        legs,
        total_distance,
        leg_count,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeDistance;

/// `distance_nm / speed`; `speed <= 0` is `+infinity` (unreachable in finite
/// time, not an error); negative distance is rejected outright.
pub fn transit_hours(distance_nm: f64, speed: f64) -> Result<f64, NegativeDistance> {
    if distance_nm < 0.0 {
        return Err(NegativeDistance);
    }
    if speed <= 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(distance_nm / speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_leg_plan_always_populates_leg_count() {
        let plan = plan_multi_leg(&[0.0, 10.0, 25.0, 25.0]);
        assert_eq!(plan.leg_count, 3);
        assert_eq!(plan.legs.len(), plan.leg_count);
        assert_eq!(plan.total_distance, 10.0 + 15.0 + 0.0);
    }

    #[test]
    fn single_waypoint_has_no_legs() {
        let plan = plan_multi_leg(&[5.0]);
        assert_eq!(plan.leg_count, 0);
        assert_eq!(plan.total_distance, 0.0);
    }

    #[test]
    fn transit_hours_rejects_negative_distance() {
        assert_eq!(transit_hours(-1.0, 10.0), Err(NegativeDistance));
    }

    #[test]
    fn transit_hours_is_infinite_at_zero_speed() {
        assert_eq!(transit_hours(100.0, 0.0), Ok(f64::INFINITY));
    }

    #[test]
    fn transit_hours_divides_distance_by_speed() {
        assert_eq!(transit_hours(100.0, 20.0), Ok(5.0));
    }
}
