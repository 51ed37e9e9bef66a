pub mod defaults {
    /// Where the new system is mounted on the live system
    pub const INSTALL_LOCATION: &str = "/mnt";
    pub const MANIFEST_FILE: &str = "./installation.json";
    pub const LOG_FILTER: &str = "info";
}

/// Overrides [`defaults::INSTALL_LOCATION`]
pub const ENV_OCTOBER_LOC: &str = "OCTOBER_LOC";

/// EFI system partition mount point, relative to the new root
pub const ESP_MOUNTPOINT: &str = "/boot";

pub const CHROOT_SHELL: &str = "/bin/bash";

// Use programs instead of bindings to avoid API dependencies
pub const REQUIRED_COMMANDS: [&str; 3] = ["blkid", "sfdisk", "mount"];
