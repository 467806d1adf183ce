//! Simulated microcontrollers.

pub mod avr;
