//! Exit codes (BSD sysexits.h subset)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Tree document malformed
pub const DATAERR: i32 = 65;

/// Project directory missing
pub const NOINPUT: i32 = 66;

/// Input/output error while scanning or reading
pub const IOERR: i32 = 74;

/// Settings or log format invalid
pub const CONFIG: i32 = 78;
