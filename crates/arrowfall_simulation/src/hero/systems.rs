use bevy::prelude::*;

use crate::clock::SimClock;
use crate::combat::spawn_projectile;

use super::input::ActionInput;
use super::state::HeroQuery;
use super::Hero;

/// Система: input → действия героя, spawn выпущенных стрел
///
/// Без `ActionInput` герой не управляется (damage path работает независимо).
pub fn hero_control(
    mut commands: Commands,
    clock: Res<SimClock>,
    input: Option<ResMut<ActionInput>>,
    mut heroes: Query<HeroQuery, With<Hero>>,
) {
    let Some(mut input) = input else {
        return;
    };

    for mut hero in heroes.iter_mut() {
        let mut ctx = hero.ctx(*clock);
        ctx.drive(&input);

        for spawn in std::mem::take(&mut ctx.projectiles) {
            spawn_projectile(&mut commands, &spawn);
        }
    }

    input.end_frame();
}
