//! Romberg integration demo whose parameters and working table are reached
//! through [`alias_core::Alias`] handles.

mod config;
mod errors;
mod input;
mod integrand;
mod table;

pub use config::{RombergConfig, MAX_ROWS};
pub use errors::RombergError;
pub use input::{gather_inputs, prompt_config};
pub use integrand::Integrand;
pub use table::{integrate, render_table, RombergTable};
