use std::process::ExitCode;
use xprinter::PrintError;

// sysexits.h values
pub const SUCCESS: u8 = 0;
pub const USAGE: u8 = 64;
pub const DATA_INVALID: u8 = 65;
pub const UNAVAILABLE: u8 = 69;
pub const IO_ERROR: u8 = 74;

pub fn code_for(err: &PrintError) -> u8 {
    match err {
        PrintError::Validation(_) => DATA_INVALID,
        PrintError::TargetUnavailable { .. } => UNAVAILABLE,
        PrintError::WriteFailure { .. } => IO_ERROR,
    }
}

pub fn exit_with(err: &PrintError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(code_for(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xprinter::ValidationError;

    #[test]
    fn test_codes() {
        let err = PrintError::from(ValidationError::UnknownKeyType("12".into()));
        assert_eq!(code_for(&err), DATA_INVALID);

        let err = PrintError::TargetUnavailable {
            target: "/dev/usb/lp0".into(),
            reason: "No such file or directory".into(),
        };
        assert_eq!(code_for(&err), UNAVAILABLE);

        let err = PrintError::WriteFailure {
            target: "192.168.1.100:9100".into(),
            source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
        };
        assert_eq!(code_for(&err), IO_ERROR);
    }
}
