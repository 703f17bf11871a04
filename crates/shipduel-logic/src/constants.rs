//! Game constants: balance tunables and tile/pixel layout values.
//!
//! These are plain numeric constants with no runtime dependency.
//! Both the simulation core and the headless harness use them.

pub mod balance {
    // Ships
    pub const PLAYER_HULL: i32 = 30;
    pub const PLAYER_REACTOR: u32 = 8;
    pub const ENEMY_HULL: i32 = 20;
    pub const ENEMY_REACTOR: u32 = 6;

    // Shields
    /// Seconds of powered recharge needed to restore one shield layer.
    pub const SHIELD_RECHARGE_TIME: f32 = 2.0;
    pub const SHIELD_MAX_LAYERS: u32 = 4;
    /// Fraction of a projectile's flight at which a shield layer catches it.
    pub const SHIELD_INTERCEPT_PROGRESS: f32 = 0.85;

    // Evasion (percent)
    pub const BASE_EVASION: f32 = 5.0;
    pub const EVASION_PER_ENGINE_POWER: f32 = 5.0;
    pub const MANNED_ENGINES_BONUS: f32 = 5.0;
    pub const MANNED_PILOTING_BONUS: f32 = 5.0;
    pub const MAX_EVASION: f32 = 100.0;

    // Weapons
    pub const LASER_CHARGE_TIME: f32 = 10.0;
    pub const LASER_DAMAGE: i32 = 1;
    pub const LASER_POWER: u32 = 1;
    pub const MISSILE_CHARGE_TIME: f32 = 15.0;
    pub const MISSILE_DAMAGE: i32 = 2;
    pub const MISSILE_POWER: u32 = 1;

    // Crew
    /// Pixels per second.
    pub const CREW_MOVE_SPEED: f32 = 120.0;
    pub const CREW_HEALTH: f32 = 100.0;

    // Combat
    pub const SYSTEM_DAMAGE_PER_HIT: u32 = 1;
    /// Pixels per second.
    pub const PROJECTILE_SPEED: f32 = 450.0;

    // Resources at the start of a battle
    pub const STARTING_MISSILES: u32 = 8;
    pub const STARTING_FUEL: u32 = 10;
    pub const STARTING_SCRAP: u32 = 0;
}

pub mod layout {
    /// Edge length of one room tile in pixels.
    pub const TILE_SIZE: f32 = 48.0;
    /// Distance under which a walker counts as having reached a waypoint.
    pub const ARRIVAL_TOLERANCE: f32 = 5.0;

    pub const PLAYER_SHIP_X: f32 = 180.0;
    pub const ENEMY_SHIP_X: f32 = 900.0;
    pub const SHIP_Y: f32 = 100.0;
}

pub mod timing {
    /// Largest frame delta the engine forwards to a single tick.
    pub const MAX_FRAME_DT: f32 = 0.1;
}
