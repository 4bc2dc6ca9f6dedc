//! Typed configuration grouped by concern, loaded from the environment.

use super::env_keys::{images, observability as obv_keys, registry};
use super::loader::{env_bool, env_or};

/// Logging configuration: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::PACKCTL_QUIET, obv_keys::QUIET_ALIASES, false),
                log_level: env_or(
                    obv_keys::PACKCTL_LOG_LEVEL,
                    obv_keys::LOG_LEVEL_ALIASES,
                    || "packctl=info".to_string(),
                ),
                log_json: env_bool(obv_keys::PACKCTL_LOG_JSON, obv_keys::LOG_JSON_ALIASES, false),
            }
        })
    }
}

/// Registry locations used when composing image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Host of the locally forwarded registry, e.g. `127.0.0.1`.
    pub host: String,
    pub image_tag: String,
    /// `host:port` of the in-cluster registry serving platform base images.
    pub internal_registry: String,
}

impl RegistryConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_TAG: &'static str = "latest";
    pub const DEFAULT_INTERNAL_REGISTRY: &'static str = "nauta-registry-nginx.nauta:5000";

    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        Self {
            host: env_or(
                registry::PACKCTL_REGISTRY_HOST,
                registry::REGISTRY_HOST_ALIASES,
                || Self::DEFAULT_HOST.to_string(),
            ),
            image_tag: env_or(registry::PACKCTL_IMAGE_TAG, &[], || {
                Self::DEFAULT_TAG.to_string()
            }),
            internal_registry: env_or(
                registry::PACKCTL_INTERNAL_REGISTRY,
                registry::INTERNAL_REGISTRY_ALIASES,
                || Self::DEFAULT_INTERNAL_REGISTRY.to_string(),
            ),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            image_tag: Self::DEFAULT_TAG.to_string(),
            internal_registry: Self::DEFAULT_INTERNAL_REGISTRY.to_string(),
        }
    }
}

/// Platform base images that replace the `FROM nauta/...` lines of a pack Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseImageConfig {
    pub tf_py2: String,
    pub tf_py3: String,
    pub horovod_py2: String,
    pub horovod_py3: String,
}

impl BaseImageConfig {
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let defaults = Self::default();
        Self {
            tf_py2: env_or(images::PACKCTL_TF_PY2_IMAGE, &[], || defaults.tf_py2),
            tf_py3: env_or(images::PACKCTL_TF_PY3_IMAGE, &[], || defaults.tf_py3),
            horovod_py2: env_or(images::PACKCTL_HOROVOD_PY2_IMAGE, &[], || {
                defaults.horovod_py2
            }),
            horovod_py3: env_or(images::PACKCTL_HOROVOD_PY3_IMAGE, &[], || {
                defaults.horovod_py3
            }),
        }
    }
}

impl Default for BaseImageConfig {
    fn default() -> Self {
        Self {
            tf_py2: "nauta/tensorflow-py2:latest".to_string(),
            tf_py3: "nauta/tensorflow-py3:latest".to_string(),
            horovod_py2: "nauta/horovod-py2:latest".to_string(),
            horovod_py3: "nauta/horovod-py3:latest".to_string(),
        }
    }
}
