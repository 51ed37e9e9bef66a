use crate::constants::CHROOT_SHELL;
use crate::utils::shell::Cmd;

/// Executes:
/// ```shell
/// arch-chroot {location} /bin/bash -c '{command}'
/// ```
///
/// Used by installer stages that configure the new system
/// after its filesystems are mounted under `location`.
pub fn cmd_arch_chroot(location: &str, command: &str) -> Cmd {
    Cmd::new("arch-chroot", &[location, CHROOT_SHELL, "-c", command])
}

#[test]
fn test_cmd_arch_chroot() {
    let cmd = cmd_arch_chroot("/mnt", "grub-mkconfig -o /boot/grub/grub.cfg");

    assert_eq!(
        cmd.argv(),
        vec!["arch-chroot", "/mnt", "/bin/bash", "-c", "grub-mkconfig -o /boot/grub/grub.cfg"]
    );
}
