// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switching the monitor input by running a DDC/CI tool.

use crate::registry::{Binding, SourceCode};
use log::{debug, warn};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// The MCCS VCP code for Input Select.
pub const VCP_INPUT_SELECT: &str = "0x60";

pub const DEFAULT_DDCCI_TOOL: &str = "/usr/local/bin/ddcci-tool";
pub const DEFAULT_I2C_DEV: &str = "/dev/i2c-1";
pub const DEFAULT_DDCUTIL: &str = "/usr/bin/ddcutil";
pub const DEFAULT_BUS: u32 = 1;
pub const DEFAULT_MCCS: &str = "2.1";

/// The tool used to write the VCP code, and how to address the monitor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Backend {
    /// ddcci-tool, addressing the monitor by I2C device file.
    DdcciTool { program: PathBuf, device: PathBuf },

    /// ddcutil, addressing the monitor by I2C bus number.
    Ddcutil {
        program: PathBuf,
        bus: u32,
        mccs: String,
    },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::DdcciTool {
            program: DEFAULT_DDCCI_TOOL.into(),
            device: DEFAULT_I2C_DEV.into(),
        }
    }
}

impl Backend {
    pub fn program(&self) -> &PathBuf {
        match self {
            Backend::DdcciTool { program, .. } => program,
            Backend::Ddcutil { program, .. } => program,
        }
    }

    /// The arguments that set the input to the source.
    pub fn args(&self, source: SourceCode) -> Vec<String> {
        match self {
            // ddcci-tool takes the value in decimal
            Backend::DdcciTool { device, .. } => vec![
                "-r".into(),
                VCP_INPUT_SELECT.into(),
                "-w".into(),
                source.0.to_string(),
                device.display().to_string(),
            ],
            Backend::Ddcutil { bus, mccs, .. } => vec![
                "--bus".into(),
                bus.to_string(),
                "--mccs".into(),
                mccs.clone(),
                "setvcp".into(),
                VCP_INPUT_SELECT.into(),
                source.to_string(),
            ],
        }
    }

    pub fn command(&self, source: SourceCode) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.args(source))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Something that can switch the monitor to the source of a binding.
///
/// Failures are the implementation's problem - a failed switch must never
/// stop further presses being handled.
pub trait SourceChanger {
    fn change_source(&self, binding: &Binding);
}

/// Switches sources by running the backend tool to completion.
#[derive(Clone, Debug, Default)]
pub struct CommandChanger {
    backend: Backend,
}

impl CommandChanger {
    pub fn new(backend: Backend) -> CommandChanger {
        CommandChanger { backend }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

impl SourceChanger for CommandChanger {
    fn change_source(&self, binding: &Binding) {
        let mut cmd = self.backend.command(binding.source);
        debug!("switch {}: running {:?}", binding.switch, cmd);
        match cmd.output() {
            Ok(out) if out.status.success() => {
                debug!("switch {}: source set to {}", binding.switch, binding.source)
            }
            Ok(out) => warn!(
                "switch {}: {} exited with {}: {}",
                binding.switch,
                self.backend.program().display(),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            ),
            Err(e) => warn!(
                "switch {}: failed to run {}: {}",
                binding.switch,
                self.backend.program().display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Registry, Switch, DEFAULT_BINDINGS};

    fn ddcutil() -> Backend {
        Backend::Ddcutil {
            program: DEFAULT_DDCUTIL.into(),
            bus: DEFAULT_BUS,
            mccs: DEFAULT_MCCS.into(),
        }
    }

    #[test]
    fn ddcci_tool_args() {
        let b = Backend::default();
        assert_eq!(b.program(), &PathBuf::from("/usr/local/bin/ddcci-tool"));
        assert_eq!(
            b.args(SourceCode(0x0f)),
            ["-r", "0x60", "-w", "15", "/dev/i2c-1"]
        );
    }

    #[test]
    fn ddcutil_args() {
        let b = ddcutil();
        assert_eq!(b.program(), &PathBuf::from("/usr/bin/ddcutil"));
        assert_eq!(
            b.args(SourceCode(0x0f)),
            ["--bus", "1", "--mccs", "2.1", "setvcp", "0x60", "0x0f"]
        );
    }

    #[test]
    fn args_follow_switch_table() {
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        let expected = [(0x11, "17"), (0x12, "18"), (0x0f, "15"), (0x13, "19")];
        for (idx, (code, decimal)) in expected.iter().enumerate() {
            let binding = r.binding(Switch(idx)).expect("switch should be bound");
            assert_eq!(binding.source, SourceCode(*code));
            assert_eq!(Backend::default().args(binding.source)[3], *decimal);
            assert_eq!(
                ddcutil().args(binding.source)[6],
                format!("{:#04x}", code)
            );
        }
    }

    #[test]
    fn command_targets_program() {
        let cmd = Backend::default().command(SourceCode(0x11));
        assert_eq!(cmd.get_program(), "/usr/local/bin/ddcci-tool");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-r", "0x60", "-w", "17", "/dev/i2c-1"]);
    }

    fn changer(program: &str) -> CommandChanger {
        CommandChanger::new(Backend::DdcciTool {
            program: program.into(),
            device: DEFAULT_I2C_DEV.into(),
        })
    }

    #[test]
    fn failures_are_not_fatal() {
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        let binding = r.binding(Switch(2)).expect("switch should be bound");
        // non-zero exit
        changer("false").change_source(binding);
        // nothing to run
        changer("/nonexistent/ddcci-tool").change_source(binding);
        // and still able to switch afterwards
        changer("true").change_source(binding);
    }
}
