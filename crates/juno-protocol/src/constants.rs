//! Protocol constants
//!
//! These constants define the literal prompts, banners and command keywords
//! printed and accepted by the Juno 451 telnet console.

// ============================================================================
// Transport
// ============================================================================

/// Default telnet port of the control console.
pub const DEFAULT_PORT: u16 = 23;

/// Line terminator appended to everything the host writes.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Pattern ending a single echo or result line.
pub const LINE_END: &str = "\n";

// ============================================================================
// Login sequence (firmware → host)
// ============================================================================

/// Greeting fragment printed before the username prompt.
pub const GREETING: &str = "Login Please";
/// Username prompt.
pub const USERNAME_PROMPT: &str = "Username :";
/// Password prompt.
pub const PASSWORD_PROMPT: &str = "Password :";
/// Fragment that must be present once the username was accepted.
pub const PASSWORD_MARKER: &str = "Password";
/// Banner printed after a successful login.
pub const WELCOME_BANNER: &str = "Welcome to TELNET.";
/// Fragment that must be present once the password was accepted.
pub const WELCOME_MARKER: &str = "Welcome to TELNET";

// ============================================================================
// Command keywords (host → firmware)
// ============================================================================

/// Query the power state.
pub const CMD_POWER_STATUS: &str = "PWSTA";
/// Power the matrix on.
pub const CMD_POWER_ON: &str = "PWON";
/// Power the matrix off (standby).
pub const CMD_POWER_OFF: &str = "PWOFF";
/// Query signal presence on every input.
pub const CMD_INPUT_STATUS: &str = "InputStatus";
/// Query the current routing.
pub const CMD_STATUS: &str = "Status";

/// Label the firmware prefixes to the `InputStatus` result.
pub const INPUT_STATUS_LABEL: &str = "InputStatus ";

/// Number of HDMI inputs on the matrix.
pub const INPUT_COUNT: u8 = 4;
