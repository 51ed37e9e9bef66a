use crate::install::model::FileSystem;
use crate::utils::shell::Cmd;

/// Executes:
/// ```shell
/// mkfs.fat -F 32 {node}
/// ```
pub fn cmd_fat32(node: &str) -> Cmd {
    Cmd::new("mkfs.fat", &["-F", "32", node])
}

/// Executes:
/// ```shell
/// mkswap {node}
/// ```
pub fn cmd_mkswap(node: &str) -> Cmd {
    Cmd::new("mkswap", &[node])
}

/// Executes:
/// ```shell
/// mkfs.ext4 -F {node}
///
/// # or, for btrfs:
///
/// mkfs.btrfs -f {node}
/// ```
///
/// Forced, so stale signatures on a new partition never prompt.
pub fn cmd_mkfs(fs: FileSystem, node: &str) -> Cmd {
    match fs {
        FileSystem::Ext4 => Cmd::new("mkfs.ext4", &["-F", node]),
        FileSystem::Btrfs => Cmd::new("mkfs.btrfs", &["-f", node]),
    }
}

#[test]
fn test_cmd_mkfs() {
    assert_eq!(cmd_fat32("/dev/sda1").argv(), vec!["mkfs.fat", "-F", "32", "/dev/sda1"]);
    assert_eq!(cmd_mkswap("/dev/sda2").argv(), vec!["mkswap", "/dev/sda2"]);

    assert_eq!(
        cmd_mkfs(FileSystem::Ext4, "/dev/sda3").argv(),
        vec!["mkfs.ext4", "-F", "/dev/sda3"]
    );
    assert_eq!(
        cmd_mkfs(FileSystem::Btrfs, "/dev/sda3").argv(),
        vec!["mkfs.btrfs", "-f", "/dev/sda3"]
    );
}
