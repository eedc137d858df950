//! Space Invaders for the terminal.
//!
//! The library holds the whole simulation — entities, the collision sweep,
//! the marching formation, explosions, menus, level loading and the frame
//! `tick` — with no terminal I/O, so it can be driven and tested headless.
//! The binary adds crossterm rendering and input.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod explosion;
pub mod formation;
pub mod level;
pub mod menu;
