//! Configuration store adapter.
//!
//! Implements [`ConfigPort`] on top of an in-memory blob standing in for
//! the configuration page in flash.  The blob is the `postcard` encoding
//! of [`EventConfig`].
//!
//! - Validation: the configuration is range-checked before it is encoded,
//!   and again after it is decoded (a blob written by older firmware may
//!   no longer fit the current table).
//! - Size: blobs larger than one flash page are refused.

use core::cell::RefCell;

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::EventConfig;
use crate::error::ConfigError;

/// Size of the configuration page.
pub const CONFIG_PAGE_SIZE: usize = 1024;

pub struct ConfigStore {
    page: RefCell<Option<Vec<u8>>>,
}

impl ConfigStore {
    /// An empty store (first boot).
    pub fn new() -> Self {
        info!("ConfigStore: simulation backend");
        Self {
            page: RefCell::new(None),
        }
    }

    /// A store pre-loaded with raw page contents.
    pub fn with_page(bytes: Vec<u8>) -> Self {
        Self {
            page: RefCell::new(Some(bytes)),
        }
    }

    /// Raw page contents, if anything has been written.
    pub fn page(&self) -> Option<Vec<u8>> {
        self.page.borrow().clone()
    }

    /// Forget the stored configuration.
    pub fn erase(&self) {
        self.page.replace(None);
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPort for ConfigStore {
    fn load(&self) -> Result<EventConfig, ConfigError> {
        let page = self.page.borrow();
        let Some(bytes) = page.as_deref() else {
            info!("ConfigStore: no stored config");
            return Err(ConfigError::NotFound);
        };
        let config: EventConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        info!(
            "ConfigStore: loaded config ({} rules, tick {} ms)",
            config.rules.len(),
            config.tick_period_ms
        );
        Ok(config)
    }

    fn save(&self, config: &EventConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        if bytes.len() > CONFIG_PAGE_SIZE {
            return Err(ConfigError::StorageFull);
        }
        info!("ConfigStore: saved {} bytes", bytes.len());
        self.page.replace(Some(bytes));
        Ok(())
    }
}
