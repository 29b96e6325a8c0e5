// lib.rs
// Library modules for the tic tac toe client

pub mod defs;
pub mod game;
pub mod board;
pub mod logging;
pub mod config;
pub mod clients;
pub mod poller;
pub mod game_view;
pub mod app;
pub mod controls;
pub mod views;
pub mod terminal;
