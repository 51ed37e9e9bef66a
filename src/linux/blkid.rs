use crate::utils::shell::Cmd;

/// Executes:
/// ```shell
/// blkid -o value -s PTTYPE {device}
/// ```
///
/// which prints the partition table type, e.g. `gpt` or `dos`
pub fn cmd_table_type(device: &str) -> Cmd {
    Cmd::new("blkid", &["-o", "value", "-s", "PTTYPE", device])
}

/// Parses `blkid` PTTYPE output. Returns None if blkid printed nothing,
/// i.e. the device has no partition table.
pub fn parse_table_type(output: &str) -> Option<String> {
    let table = output.lines().next()?.trim();
    match table {
        "" => None,
        t => Some(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_type() {
        let tests = vec![
            ("gpt\n", Some("gpt")),
            ("gpt", Some("gpt")),
            ("dos\n", Some("dos")),
            ("  gpt  \n", Some("gpt")),
            ("", None),
            ("\n", None),
        ];

        for (output, expected) in tests {
            assert_eq!(parse_table_type(output).as_deref(), expected, "output {output:?}");
        }
    }

    #[test]
    fn test_cmd_table_type() {
        assert_eq!(
            cmd_table_type("/dev/sda").argv(),
            vec!["blkid", "-o", "value", "-s", "PTTYPE", "/dev/sda"]
        );
    }
}
