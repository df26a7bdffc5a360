//! Panel command handling
//!
//! The panel sends ordinary G-code for most things. A handful of codes are
//! answered by the bridge itself instead of the interpreter:
//!
//! | command | meaning |
//! |---|---|
//! | `M408 [S<n>]` / `BUILD_RESPONSE [VARIANT=<n>]` | status query |
//! | `M32 <path>` | select and start a stored print |
//! | `M98 P<path>` | run a macro |
//! | `M20 P<path>` | list a directory |

pub mod handlers;
pub mod macros;
pub mod queue;

pub use handlers::{CommandHandlers, DeviceIdentity, GCODE_DIRECTORY, NUM_TOOLS};
pub use macros::{MacroCatalog, MACRO_DIRECTORY};
pub use queue::{CommandQueue, QueueStats};

/// Commands the bridge answers itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    /// `M408` / `BUILD_RESPONSE`
    StatusQuery,
    /// `M32`
    StartPrint,
    /// `M98`
    RunMacro,
    /// `M20`
    ListDirectory,
}

impl PanelCommand {
    /// Recognise a panel command by its first word; `None` means the command
    /// goes to the interpreter
    pub fn parse(command: &str) -> Option<Self> {
        let keyword = command.split_whitespace().next()?;
        match keyword.to_ascii_uppercase().as_str() {
            "M408" | "BUILD_RESPONSE" => Some(Self::StatusQuery),
            "M32" => Some(Self::StartPrint),
            "M98" => Some(Self::RunMacro),
            "M20" => Some(Self::ListDirectory),
            _ => None,
        }
    }
}

/// Everything after the command word, trimmed
pub fn strip_keyword(command: &str) -> &str {
    let command = command.trim_start();
    match command.find(char::is_whitespace) {
        Some(i) => command[i..].trim(),
        None => "",
    }
}

/// Value of the first `P`-prefixed argument
pub fn path_argument(command: &str) -> Option<&str> {
    command
        .split_whitespace()
        .skip(1)
        .find_map(|token| token.strip_prefix('P').or_else(|| token.strip_prefix('p')))
}

/// Status selector: `S<n>` for `M408`, `VARIANT=<n>` for `BUILD_RESPONSE`
pub fn selector_argument(command: &str) -> Option<i64> {
    command.split_whitespace().skip(1).find_map(|token| {
        let upper = token.to_ascii_uppercase();
        upper
            .strip_prefix("VARIANT=")
            .or_else(|| upper.strip_prefix('S'))
            .and_then(|value| value.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_panel_commands() {
        assert_eq!(PanelCommand::parse("M408 S0"), Some(PanelCommand::StatusQuery));
        assert_eq!(
            PanelCommand::parse("BUILD_RESPONSE VARIANT=1"),
            Some(PanelCommand::StatusQuery)
        );
        assert_eq!(
            PanelCommand::parse("m32 0:/gcodes/a.gcode"),
            Some(PanelCommand::StartPrint)
        );
        assert_eq!(PanelCommand::parse("M98 P0:/macros/x"), Some(PanelCommand::RunMacro));
        assert_eq!(PanelCommand::parse("M20 S2 P0:/gcodes"), Some(PanelCommand::ListDirectory));
        assert_eq!(PanelCommand::parse("M200"), None);
        assert_eq!(PanelCommand::parse("G28"), None);
        assert_eq!(PanelCommand::parse("   "), None);
    }

    #[test]
    fn test_strip_keyword() {
        assert_eq!(strip_keyword("M32 0:/gcodes/test.gcode"), "0:/gcodes/test.gcode");
        assert_eq!(strip_keyword("  M32    a b  "), "a b");
        assert_eq!(strip_keyword("M32"), "");
    }

    #[test]
    fn test_path_argument() {
        assert_eq!(path_argument("M20 S2 P0:/gcodes"), Some("0:/gcodes"));
        assert_eq!(path_argument("M98 P0:/macros/HOME"), Some("0:/macros/HOME"));
        assert_eq!(path_argument("M20 S2"), None);
        // the command word itself is never the path
        assert_eq!(path_argument("PRINT P1"), Some("1"));
    }

    #[test]
    fn test_selector_argument() {
        assert_eq!(selector_argument("M408 S0"), Some(0));
        assert_eq!(selector_argument("M408 s3"), Some(3));
        assert_eq!(selector_argument("BUILD_RESPONSE VARIANT=2"), Some(2));
        assert_eq!(selector_argument("M408"), None);
        assert_eq!(selector_argument("M408 Sx"), None);
    }
}
