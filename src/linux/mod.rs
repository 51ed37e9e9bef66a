pub mod archchroot;
pub mod blkid;
pub mod mkfs;
pub mod mount;
pub mod sfdisk;
