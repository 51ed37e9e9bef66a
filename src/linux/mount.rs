use crate::utils::shell::Cmd;

/// Executes:
/// ```shell
/// mount {node} {target}
///
/// # or, if mkdir:
///
/// mount --mkdir {node} {target}
/// ```
pub fn cmd_mount(node: &str, target: &str, mkdir: bool) -> Cmd {
    match mkdir {
        true => Cmd::new("mount", &["--mkdir", node, target]),
        false => Cmd::new("mount", &[node, target]),
    }
}

/// Executes:
/// ```shell
/// swapon {node}
/// ```
pub fn cmd_swapon(node: &str) -> Cmd {
    Cmd::new("swapon", &[node])
}

#[test]
fn test_cmd_mount() {
    assert_eq!(
        cmd_mount("/dev/sda1", "/mnt/boot", true).argv(),
        vec!["mount", "--mkdir", "/dev/sda1", "/mnt/boot"]
    );
    assert_eq!(
        cmd_mount("/dev/sda3", "/mnt", false).argv(),
        vec!["mount", "/dev/sda3", "/mnt"]
    );
    assert_eq!(cmd_swapon("/dev/sda2").argv(), vec!["swapon", "/dev/sda2"]);
}
