//! Pure simulation logic for shipduel.
//!
//! This crate contains the whole real-time combat simulation between two
//! ships and nothing else: no rendering, no input handling, no clock. The
//! host owns a `GameState`, feeds it frame deltas through `tick::advance`
//! (or an `Engine`), issues player actions through `commands`, and reads the
//! state back to draw it.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`combat`] | Evasion, shield recharge, projectile flight and hit resolution |
//! | [`commands`] | Every state write the view may make (pause, power, crew, weapons, doors) |
//! | [`config`] | Battle configuration: starting resources, frame clamp, layouts |
//! | [`constants`] | Balance tunables and pixel/tile layout constants |
//! | [`crew`] | Crew path planning, movement through doors, system manning |
//! | [`dice`] | Randomness seam: seeded RNG adapter and scripted dice |
//! | [`engine`] | Host convenience wrapper: state + dice + frame clamping |
//! | [`error`] | Template and config loading errors |
//! | [`geometry`] | Tile/pixel placement and ship layout validation |
//! | [`model`] | Ships, rooms, doors, systems, weapons, crew, projectiles |
//! | [`pathfinding`] | A* over the room graph through open doors |
//! | [`power`] | Reactor allocation across systems and weapon slots, system damage |
//! | [`ships`] | Built-in layouts: the Kestrel and the Rebel Fighter |
//! | [`state`] | `GameState`, the single owned simulation value |
//! | [`template`] | Serializable ship layouts and building live ships from them |
//! | [`tick`] | The nine-phase per-frame step |
//! | [`weapons`] | Weapon catalog, charging, player and enemy fire |

pub mod combat;
pub mod commands;
pub mod config;
pub mod constants;
pub mod crew;
pub mod dice;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod model;
pub mod pathfinding;
pub mod power;
pub mod ships;
pub mod state;
pub mod template;
pub mod tick;
pub mod weapons;

pub use config::BattleConfig;
pub use engine::Engine;
pub use error::TemplateError;
pub use state::GameState;
