//! Patrol turnaround
//!
//! Чистые функции: "пора ли развернуться". Применение (flip + скорость): в `EnemyCtx`.

use bevy::prelude::*;

use crate::components::Facing;
use crate::physics::SolidProbe;

/// VelocityPace: стена впереди или обрыв под следующим шагом
pub fn pace_turnaround(
    center: Vec2,
    half_extents: Vec2,
    facing: Facing,
    probe_ahead: f32,
    check_ledges: bool,
    probe: &impl SolidProbe,
) -> bool {
    let ahead_x = center.x + facing.sign() * (half_extents.x + probe_ahead);
    let feet_y = center.y - half_extents.y;

    let obstacle = probe.is_solid_at(Vec2::new(ahead_x, center.y))
        || probe.is_solid_at(Vec2::new(ahead_x, feet_y + 1.0));
    if obstacle {
        return true;
    }

    check_ledges && !probe.is_solid_at(Vec2::new(ahead_x, feet_y - 1.0))
}

/// WaypointOscillate: дошли до края отрезка [origin, origin + extent] по направлению движения
pub fn waypoint_turnaround(x: f32, origin_x: f32, extent: f32, facing: Facing, tolerance: f32) -> bool {
    let low = origin_x.min(origin_x + extent);
    let high = origin_x.max(origin_x + extent);

    match facing {
        Facing::Right => x >= high - tolerance,
        Facing::Left => x <= low + tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::StaticColliders;

    fn platform() -> StaticColliders {
        let mut statics = StaticColliders::default();
        // Платформа x ∈ [0, 300], верх y = 88
        statics.add_rect(Vec2::new(0.0, 56.0), Vec2::new(300.0, 32.0));
        // Стена x ∈ [400, 420] на полу справа
        statics.add_rect(Vec2::new(320.0, 56.0), Vec2::new(200.0, 32.0));
        statics.add_rect(Vec2::new(400.0, 88.0), Vec2::new(20.0, 100.0));
        statics
    }

    const HALF: Vec2 = Vec2::new(12.0, 12.0);

    #[test]
    fn test_open_floor_keeps_going() {
        let statics = platform();
        assert!(!pace_turnaround(Vec2::new(150.0, 100.0), HALF, Facing::Right, 4.0, true, &statics));
        assert!(!pace_turnaround(Vec2::new(150.0, 100.0), HALF, Facing::Left, 4.0, true, &statics));
    }

    #[test]
    fn test_ledge_ahead_turns() {
        let statics = platform();
        // край платформы на x = 300, probe на 290 + 16 = 306: пусто
        assert!(pace_turnaround(Vec2::new(290.0, 100.0), HALF, Facing::Right, 4.0, true, &statics));
        // без проверки обрывов идём дальше
        assert!(!pace_turnaround(Vec2::new(290.0, 100.0), HALF, Facing::Right, 4.0, false, &statics));
    }

    #[test]
    fn test_wall_ahead_turns() {
        let statics = platform();
        assert!(pace_turnaround(Vec2::new(386.0, 100.0), HALF, Facing::Right, 4.0, true, &statics));
        assert!(!pace_turnaround(Vec2::new(386.0, 100.0), HALF, Facing::Left, 4.0, true, &statics));
    }

    #[test]
    fn test_waypoint_bounds() {
        // origin 100, extent +64 → [100, 164]
        assert!(!waypoint_turnaround(150.0, 100.0, 64.0, Facing::Right, 1.0));
        assert!(waypoint_turnaround(163.5, 100.0, 64.0, Facing::Right, 1.0));
        assert!(!waypoint_turnaround(163.5, 100.0, 64.0, Facing::Left, 1.0));
        assert!(waypoint_turnaround(100.5, 100.0, 64.0, Facing::Left, 1.0));

        // отрицательный extent → [36, 100]
        assert!(waypoint_turnaround(36.0, 100.0, -64.0, Facing::Left, 1.0));
        assert!(waypoint_turnaround(100.0, 100.0, -64.0, Facing::Right, 1.0));
    }
}
