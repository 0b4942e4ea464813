//! Temporal Labyrinth: a terminal tile-reveal puzzle game.
//!
//! The crate is split the same way the game loop runs:
//!
//! * [`entities`] / [`geometry`]: plain data (tiles, player, enemies, door, session).
//! * [`level`]: level generation, themes and background scroll.
//! * [`compute`]: per-frame game logic; all randomness is injected.
//! * [`game`]: the screen state machine (title, menus, pause, game over).
//! * [`render`] / [`display`]: the drawing surface and its terminal backend.
//! * [`input`] / [`assets`] / [`config`]: boundary collaborators.

pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod level;
pub mod powers;
pub mod render;
