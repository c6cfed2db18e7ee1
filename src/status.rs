//! Credential statuses and the process exit codes they map to.

pub const EXIT_SUCCESS: u8 = 0;
/// Usage errors and every creator failure other than a name collision.
pub const EXIT_FAILURE: u8 = 1;
/// Kept clear of the low range shells reserve for themselves.
pub const EXIT_NOT_SUPPORTED: u8 = 170;
/// The platform call itself failed, or stdin/stdout could not be used.
pub const EXIT_PLATFORM_ERROR: u8 = 178;

/// Base added to a status ordinal to form its exit code.
pub const STATUS_EXIT_BASE: u8 = 171;

/// Outcome of a key credential operation as reported by the platform.
///
/// Declaration order is the ordinal order of the exit-code range, so
/// `exit_code() == STATUS_EXIT_BASE + ordinal()` for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialStatus {
    CredentialAlreadyExists,
    NotFound,
    SecurityDeviceLocked,
    Success,
    UnknownError,
    UserCanceled,
    UserPrefersPassword,
}

impl CredentialStatus {
    pub const ALL: [CredentialStatus; 7] = [
        CredentialStatus::CredentialAlreadyExists,
        CredentialStatus::NotFound,
        CredentialStatus::SecurityDeviceLocked,
        CredentialStatus::Success,
        CredentialStatus::UnknownError,
        CredentialStatus::UserCanceled,
        CredentialStatus::UserPrefersPassword,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Exit code reported to the caller. 174 belongs to `Success` and is
    /// never emitted.
    pub fn exit_code(self) -> u8 {
        match self {
            CredentialStatus::CredentialAlreadyExists => 171,
            CredentialStatus::NotFound => 172,
            CredentialStatus::SecurityDeviceLocked => 173,
            CredentialStatus::Success => 174,
            CredentialStatus::UnknownError => 175,
            CredentialStatus::UserCanceled => 176,
            CredentialStatus::UserPrefersPassword => 177,
        }
    }

    pub fn is_success(self) -> bool {
        self == CredentialStatus::Success
    }

    /// Human-readable line printed on stdout when the status ends the run.
    pub fn message(self, name: &str) -> String {
        match self {
            CredentialStatus::CredentialAlreadyExists => {
                format!("The credential '{name}' already exists.")
            }
            CredentialStatus::NotFound => format!("The credential '{name}' does not exist."),
            CredentialStatus::SecurityDeviceLocked => {
                "The Windows Hello security device is locked.".to_string()
            }
            CredentialStatus::Success => "Success.".to_string(),
            CredentialStatus::UnknownError => "Unknown error.".to_string(),
            CredentialStatus::UserCanceled => "The user cancelled.".to_string(),
            CredentialStatus::UserPrefersPassword => {
                "The user prefers to enter a password. Aborted.".to_string()
            }
        }
    }
}
