//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `config_store` | ConfigPort         | Configuration page (postcard)|
//! | `sim_load`     | LoadPort           | Simulated sink + trigger I/O |
//! |                | ParameterPort      | Setpoints / measurements     |

pub mod config_store;
pub mod sim_load;
