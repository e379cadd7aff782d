//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`StoragePort`] and [`ConfigPort`] for the controller.
//!
//! - Typed values: booleans are stored as `u8`, integers as `i32`, the
//!   timing config as a postcard blob.
//! - Atomic writes: every set is followed by `nvs_commit()` on its own.
//!   There is no multi-key transaction.
//! - On the host the same API is backed by a `HashMap` so the domain can
//!   be exercised without flash.

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::ControllerConfig;
use log::info;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;

const CONFIG_NAMESPACE: &str = "light";
const CONFIG_KEY: &str = "timing";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 64;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t
            {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as esp_err_t {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as esp_err_t {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK as esp_err_t {
                return Err(StorageError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    #[cfg(not(target_os = "espidf"))]
    fn get_raw(&self, namespace: &str, key: &str) -> Result<&[u8], StorageError> {
        self.store
            .get(&Self::composite_key(namespace, key))
            .map(Vec::as_slice)
            .ok_or(StorageError::NotFound)
    }

    #[cfg(not(target_os = "espidf"))]
    fn put_raw(&mut self, namespace: &str, key: &str, data: &[u8]) {
        self.store
            .insert(Self::composite_key(namespace, key), data.to_vec());
    }

    /// NVS names are C strings of at most 15 characters.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = name.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    /// Write handles are committed before closing.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let ns = Self::c_name(namespace);
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(ret);
        }

        let mut result = f(handle);
        if write && result.is_ok() {
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK as esp_err_t {
                result = Err(ret);
            }
        }
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn map_err(code: esp_err_t) -> StorageError {
        if code == ESP_ERR_NVS_NOT_FOUND as esp_err_t {
            StorageError::NotFound
        } else if code == ESP_ERR_NVS_TYPE_MISMATCH as esp_err_t {
            StorageError::TypeMismatch
        } else if code == ESP_ERR_NVS_NOT_ENOUGH_SPACE as esp_err_t {
            StorageError::Full
        } else {
            StorageError::IoError
        }
    }

    #[cfg(target_os = "espidf")]
    fn check(ret: esp_err_t) -> Result<(), esp_err_t> {
        if ret == ESP_OK as esp_err_t {
            Ok(())
        } else {
            Err(ret)
        }
    }
}

fn validate_config(cfg: &ControllerConfig) -> Result<(), ConfigError> {
    if !(1..=1000).contains(&cfg.debounce_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "debounce_interval_ms must be 1–1000",
        ));
    }
    if !(50..=5000).contains(&cfg.power_cycle_delay_ms) {
        return Err(ConfigError::ValidationFailed(
            "power_cycle_delay_ms must be 50–5000",
        ));
    }
    if cfg.loop_interval_ms > 20 {
        return Err(ConfigError::ValidationFailed(
            "loop_interval_ms must be 0–20",
        ));
    }
    if cfg.loop_interval_ms >= cfg.debounce_interval_ms {
        return Err(ConfigError::ValidationFailed(
            "loop_interval_ms must be < debounce_interval_ms",
        ));
    }
    Ok(())
}

impl StoragePort for NvsAdapter {
    fn get_bool(&self, namespace: &str, key: &str) -> Result<bool, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            match self.get_raw(namespace, key)? {
                [v] => Ok(*v != 0),
                _ => Err(StorageError::TypeMismatch),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, false, |handle| {
                let mut value: u8 = 0;
                Self::check(unsafe { nvs_get_u8(handle, key.as_ptr().cast(), &mut value) })?;
                Ok(value != 0)
            })
            .map_err(Self::map_err)
        }
    }

    fn set_bool(&mut self, namespace: &str, key: &str, value: bool) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.put_raw(namespace, key, &[u8::from(value)]);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, true, |handle| {
                Self::check(unsafe { nvs_set_u8(handle, key.as_ptr().cast(), u8::from(value)) })
            })
            .map_err(Self::map_err)
        }
    }

    fn get_i32(&self, namespace: &str, key: &str) -> Result<i32, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let bytes: [u8; 4] = self
                .get_raw(namespace, key)?
                .try_into()
                .map_err(|_| StorageError::TypeMismatch)?;
            Ok(i32::from_le_bytes(bytes))
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, false, |handle| {
                let mut value: i32 = 0;
                Self::check(unsafe { nvs_get_i32(handle, key.as_ptr().cast(), &mut value) })?;
                Ok(value)
            })
            .map_err(Self::map_err)
        }
    }

    fn set_i32(&mut self, namespace: &str, key: &str, value: i32) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.put_raw(namespace, key, &value.to_le_bytes());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, true, |handle| {
                Self::check(unsafe { nvs_set_i32(handle, key.as_ptr().cast(), value) })
            })
            .map_err(Self::map_err)
        }
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            match self.get_raw(CONFIG_NAMESPACE, CONFIG_KEY) {
                Ok(bytes) => {
                    let cfg: ControllerConfig =
                        postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsAdapter: loaded config from store");
                    Ok(cfg)
                }
                Err(_) => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(ControllerConfig::default())
                }
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(CONFIG_KEY);
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
                let mut buf = [0u8; MAX_BLOB_SIZE];
                let mut size = buf.len();
                Self::check(unsafe {
                    nvs_get_blob(handle, key.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                })?;
                Ok((buf, size))
            });

            match result {
                Ok((buf, size)) => {
                    let cfg: ControllerConfig =
                        postcard::from_bytes(&buf[..size]).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", size);
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(ControllerConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}, using defaults", e);
                    Ok(ControllerConfig::default())
                }
            }
        }
    }

    fn save(&mut self, config: &ControllerConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.put_raw(CONFIG_NAMESPACE, CONFIG_KEY, &bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(CONFIG_KEY);
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
                Self::check(unsafe {
                    nvs_set_blob(handle, key.as_ptr().cast(), bytes.as_ptr().cast(), bytes.len())
                })
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}
