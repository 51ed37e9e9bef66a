use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A single external program invocation.
///
/// If `stdin` is set, the file at that path is fed to the program
/// as its standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<PathBuf>,
}

impl Cmd {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            stdin: None,
        }
    }

    pub fn stdin_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        let mut argv = vec![self.program.as_str()];
        argv.extend(self.args.iter().map(|s| s.as_str()));

        argv
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv = self.argv();
        let line = shlex::try_join(argv.iter().copied())
            .unwrap_or_else(|_| argv.join(" "));

        match &self.stdin {
            Some(path) => write!(f, "{line} < {}", path.display()),
            None => write!(f, "{line}"),
        }
    }
}

/// Captured result of a finished command.
/// `status` is None if the process was killed by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    #[cfg(test)]
    pub fn ok(stdout: &str) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Trimmed stderr, or a description of the exit status if stderr is empty
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }

        match self.status {
            Some(code) => format!("exited with non-zero status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Capability to run external programs.
///
/// Everything that touches disks goes through this trait,
/// so that tests can substitute a fake.
pub trait Runner {
    /// Runs `cmd` to completion. Errors only if the program could not
    /// be spawned or its input could not be opened; a non-zero exit
    /// is reported via [`CmdOutput::status`].
    fn run(&self, cmd: &Cmd) -> Result<CmdOutput, std::io::Error>;
}

/// Runs commands on the live system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, cmd: &Cmd) -> Result<CmdOutput, std::io::Error> {
        tracing::debug!(cmd = %cmd, "exec");

        let stdin = match &cmd.stdin {
            Some(path) => Stdio::from(fs::File::open(path)?),
            None => Stdio::null(),
        };

        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(stdin)
            .output()?;

        let result = CmdOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::debug!(
                cmd = %cmd,
                status = ?result.status,
                "command failed: {}",
                result.error_text()
            );
        }

        Ok(result)
    }
}

pub fn in_path(program: &str) -> bool {
    if let Ok(path) = env::var("PATH") {
        for p in path.split(':') {
            let p_str = format!("{}/{}", p, program);
            if fs::metadata(p_str).is_ok() {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
pub mod test_utils {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    enum Reply {
        Output(CmdOutput),
        SpawnError(String),
    }

    struct Rule {
        argv: Vec<String>,
        replies: VecDeque<Reply>,
    }

    /// An invocation seen by [`FakeRunner`], with the content
    /// of its stdin file read at call time.
    #[derive(Debug, Clone)]
    pub struct Call {
        pub line: String,
        pub argv: Vec<String>,
        pub stdin: Option<String>,
        pub stdin_file: Option<PathBuf>,
    }

    /// In-memory [`Runner`]. Replies are matched by argv prefix,
    /// first rule wins. Queued replies are consumed in order,
    /// the last one is sticky. Unmatched commands succeed silently.
    #[derive(Default)]
    pub struct FakeRunner {
        rules: RefCell<Vec<Rule>>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on(self, argv: &[&str], output: CmdOutput) -> Self {
            self.push(argv, Reply::Output(output));
            self
        }

        pub fn on_spawn_error(self, argv: &[&str], msg: &str) -> Self {
            self.push(argv, Reply::SpawnError(msg.to_string()));
            self
        }

        fn push(&self, argv: &[&str], reply: Reply) {
            let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
            let mut rules = self.rules.borrow_mut();

            match rules.iter_mut().find(|r| r.argv == argv) {
                Some(rule) => rule.replies.push_back(reply),
                None => rules.push(Rule {
                    argv,
                    replies: VecDeque::from([reply]),
                }),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub fn lines(&self) -> Vec<String> {
            self.calls().into_iter().map(|c| c.line).collect()
        }
    }

    impl Runner for FakeRunner {
        fn run(&self, cmd: &Cmd) -> Result<CmdOutput, std::io::Error> {
            let stdin = match &cmd.stdin {
                Some(path) => Some(fs::read_to_string(path)?),
                None => None,
            };

            let argv: Vec<String> =
                cmd.argv().into_iter().map(String::from).collect();

            self.calls.borrow_mut().push(Call {
                line: argv.join(" "),
                argv: argv.clone(),
                stdin,
                stdin_file: cmd.stdin.clone(),
            });

            let mut rules = self.rules.borrow_mut();
            let rule = rules
                .iter_mut()
                .find(|r| argv.starts_with(&r.argv) && !r.replies.is_empty());

            let reply = match rule {
                None => return Ok(CmdOutput::ok("")),
                Some(rule) if rule.replies.len() > 1 => rule.replies.pop_front(),
                Some(rule) => rule.replies.front().map(|r| match r {
                    Reply::Output(out) => Reply::Output(out.clone()),
                    Reply::SpawnError(msg) => Reply::SpawnError(msg.clone()),
                }),
            };

            match reply {
                Some(Reply::Output(out)) => Ok(out),
                Some(Reply::SpawnError(msg)) => {
                    Err(std::io::Error::new(std::io::ErrorKind::NotFound, msg))
                }
                None => Ok(CmdOutput::ok("")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::FakeRunner;
    use super::*;

    #[test]
    fn test_cmd_display_quotes_args() {
        let cmd = Cmd::new("arch-chroot", &["/mnt", "/bin/bash", "-c", "echo hi"]);
        assert_eq!(cmd.to_string(), "arch-chroot /mnt /bin/bash -c 'echo hi'");

        let cmd = Cmd::new("sfdisk", &["/dev/sda"]).stdin_file("/tmp/sda");
        assert_eq!(cmd.to_string(), "sfdisk /dev/sda < /tmp/sda");
    }

    #[test]
    fn test_error_text() {
        assert_eq!(CmdOutput::failed(1, "  boom\n").error_text(), "boom");
        assert_eq!(
            CmdOutput::failed(32, "").error_text(),
            "exited with non-zero status 32"
        );
        assert_eq!(
            CmdOutput {
                status: None,
                ..Default::default()
            }
            .error_text(),
            "terminated by signal"
        );
    }

    #[test]
    fn test_fake_runner_queues_and_sticks() {
        let runner = FakeRunner::new()
            .on(&["sfdisk", "--json"], CmdOutput::ok("first"))
            .on(&["sfdisk", "--json"], CmdOutput::ok("second"));

        let cmd = Cmd::new("sfdisk", &["--json", "/dev/sda"]);
        assert_eq!(runner.run(&cmd).unwrap().stdout, "first");
        assert_eq!(runner.run(&cmd).unwrap().stdout, "second");
        assert_eq!(runner.run(&cmd).unwrap().stdout, "second");

        let other = Cmd::new("mount", &["/dev/sda1", "/mnt"]);
        assert!(runner.run(&other).unwrap().success());

        assert_eq!(runner.calls().len(), 4);
        assert_eq!(runner.lines()[3], "mount /dev/sda1 /mnt");
    }

    #[ignore]
    #[test]
    fn test_system_runner() {
        let out = SystemRunner
            .run(&Cmd::new("echo", &["hello, world!"]))
            .expect("failed to execute `echo \"hello, world!\"` command");

        assert!(out.success());
        assert_eq!(out.stdout, "hello, world!\n");

        let out = SystemRunner
            .run(&Cmd::new("sh", &["-c", "echo boom >&2; exit 3"]))
            .expect("failed to spawn sh");

        assert_eq!(out.status, Some(3));
        assert_eq!(out.error_text(), "boom");
    }
}
