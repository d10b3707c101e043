//! Property-style тесты на seeded случайных последовательностях

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use arrowfall_simulation::combat::DamageOutcome;
use arrowfall_simulation::hero::{HeroActionState, HeroCtx, HeroStats, Invincibility, JumpCharges};
use arrowfall_simulation::*;

#[test]
fn test_health_never_negative_or_above_max() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let max = rng.gen_range(1..100);
        let mut health = Health::new(max);

        for _ in 0..30 {
            let before = health.current;
            let damage = rng.gen_range(0..40);
            health.take_damage(damage);
            assert_eq!(health.current, before.saturating_sub(damage));

            if rng.gen_bool(0.3) {
                health.heal(rng.gen_range(0..50));
            }
            assert!(health.current <= health.max);
        }
    }
}

/// Серия ударов в случайные тики: проходит только удар вне окна неуязвимости
#[test]
fn test_hero_invincibility_over_random_hits() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let stats = HeroStats::default();
    let mut state = HeroActionState::default();
    let mut velocity = Velocity::zero();
    let mut facing = Facing::Right;
    let mut animator = SpriteAnimator::default();
    let mut charges = JumpCharges::new(2);
    let mut health = Health::new(1000);
    let mut invincibility = Invincibility::default();

    let window = SimClock::default().ms_to_ticks(stats.invincibility_ms);
    let mut tick = 0;
    let mut last_accepted: Option<u64> = None;

    for _ in 0..300 {
        tick += rng.gen_range(1..40);
        let before = health.current;

        let mut ctx = HeroCtx {
            entity: Entity::from_raw(1),
            clock: SimClock { tick, ..Default::default() },
            position: Vec2::ZERO,
            grounded: true,
            stats: &stats,
            state: &mut state,
            velocity: &mut velocity,
            facing: &mut facing,
            animator: &mut animator,
            charges: &mut charges,
            health: &mut health,
            invincibility: &mut invincibility,
            projectiles: Vec::new(),
        };
        let outcome = ctx.receive_damage(1);

        let expected_accept = last_accepted.is_none_or(|last| tick >= last + window);
        if expected_accept {
            assert_eq!(outcome, DamageOutcome::Hurt { knockback: false });
            assert_eq!(health.current, before - 1);
            last_accepted = Some(tick);
        } else {
            assert_eq!(outcome, DamageOutcome::Rejected);
            assert_eq!(health.current, before);
        }
    }
}
