//! Embassy tasks module
//!
//! Contains the async tasks that stand in for the USB interrupt handlers.

pub mod usb;

pub use usb::{cdc_pump_task, usb_device_task, vcp_start_task};
