#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod demo;
pub mod vcp;

// These modules depend on the STM32 HAL and embassy, only available with embedded feature
#[cfg(feature = "embedded")]
pub mod board;
#[cfg(feature = "embedded")]
pub mod logger;
#[cfg(feature = "embedded")]
pub mod tasks;
#[cfg(feature = "embedded")]
pub mod usb;
