//! Environment variable keys and their aliases.
//!
//! Primary variables use the `PACKCTL_*` prefix; `NCTL_*` names from earlier
//! releases are still honoured as aliases.

/// Logging and output
pub mod observability {
    pub const PACKCTL_QUIET: &str = "PACKCTL_QUIET";
    pub const QUIET_ALIASES: &[&str] = &["NCTL_QUIET"];

    pub const PACKCTL_LOG_LEVEL: &str = "PACKCTL_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &["NCTL_LOG_LEVEL"];

    pub const PACKCTL_LOG_JSON: &str = "PACKCTL_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &[];
}

/// Registry addresses used when composing image references
pub mod registry {
    /// Host the local registry proxy listens on.
    pub const PACKCTL_REGISTRY_HOST: &str = "PACKCTL_REGISTRY_HOST";
    pub const REGISTRY_HOST_ALIASES: &[&str] = &[];

    pub const PACKCTL_IMAGE_TAG: &str = "PACKCTL_IMAGE_TAG";

    /// In-cluster registry that serves platform base images.
    pub const PACKCTL_INTERNAL_REGISTRY: &str = "PACKCTL_INTERNAL_REGISTRY";
    pub const INTERNAL_REGISTRY_ALIASES: &[&str] = &["NAUTA_REGISTRY_ADDRESS"];
}

/// Base images substituted into pack Dockerfiles
pub mod images {
    pub const PACKCTL_TF_PY2_IMAGE: &str = "PACKCTL_TF_PY2_IMAGE";
    pub const PACKCTL_TF_PY3_IMAGE: &str = "PACKCTL_TF_PY3_IMAGE";
    pub const PACKCTL_HOROVOD_PY2_IMAGE: &str = "PACKCTL_HOROVOD_PY2_IMAGE";
    pub const PACKCTL_HOROVOD_PY3_IMAGE: &str = "PACKCTL_HOROVOD_PY3_IMAGE";
}
